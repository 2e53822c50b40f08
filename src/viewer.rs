//! Display back ends for a built surface.
//!
//! [`BrowserViewer`] is what the `bench-graph` binary uses: it writes a
//! standalone HTML page to the temp directory and hands it to the system
//! browser. [`FileViewer`] writes the chart to a chosen path instead, and
//! with the `terminal` feature [`TerminalViewer`] draws it in the terminal
//! with keyboard rotation and zoom.

use crate::error::{Error, Result};
use crate::output::PngEncoder;
use crate::plots::BuiltSurface;
use std::path::{Path, PathBuf};

/// Something that can present a built surface.
pub trait Viewer {
    /// Present `surface`. Blocks for as long as the viewer needs.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be produced or the viewer
    /// cannot be started.
    fn show(&self, surface: &BuiltSurface) -> Result<()>;
}

/// Opens the chart as an HTML page in the default browser.
#[derive(Debug, Clone)]
pub struct BrowserViewer {
    dir: PathBuf,
    file_name: String,
    launch: bool,
}

impl Default for BrowserViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserViewer {
    /// Page file name inside the output directory.
    pub const PAGE_NAME: &'static str = "bench-surface.html";

    /// Write to the system temp directory and launch the browser.
    #[must_use]
    pub fn new() -> Self {
        Self { dir: std::env::temp_dir(), file_name: Self::PAGE_NAME.to_string(), launch: true }
    }

    /// Write the page into `dir` instead of the temp directory.
    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Whether to launch the browser after writing the page.
    #[must_use]
    pub fn launch(mut self, launch: bool) -> Self {
        self.launch = launch;
        self
    }

    /// Where the page is written.
    #[must_use]
    pub fn page_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

impl Viewer for BrowserViewer {
    fn show(&self, surface: &BuiltSurface) -> Result<()> {
        let path = self.page_path();
        std::fs::write(&path, surface.to_html()?)?;
        crate::info!("viewer", "wrote {}", path.display());

        if self.launch {
            webbrowser::open(&path.to_string_lossy())
                .map_err(|e| Error::Viewer(format!("cannot open {}: {e}", path.display())))?;
            crate::info!("viewer", "opened browser");
        }
        Ok(())
    }
}

/// Output formats a [`FileViewer`] can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Vector image with tooltips.
    Svg,
    /// Raster image without text.
    Png,
    /// Standalone HTML page.
    Html,
}

impl FileFormat {
    /// Format implied by a path's extension, case-insensitively.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

/// Writes the chart to a file, format chosen by extension.
#[derive(Debug, Clone)]
pub struct FileViewer {
    path: PathBuf,
}

impl FileViewer {
    /// Write to `path` (`.svg`, `.png`, `.html`).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Viewer for FileViewer {
    fn show(&self, surface: &BuiltSurface) -> Result<()> {
        let format = FileFormat::from_path(&self.path).ok_or_else(|| {
            Error::Viewer(format!("unsupported output file {}", self.path.display()))
        })?;

        match format {
            FileFormat::Svg => surface.to_svg().write_to_file(&self.path)?,
            FileFormat::Png => PngEncoder::write_to_file(&surface.to_framebuffer()?, &self.path)?,
            FileFormat::Html => std::fs::write(&self.path, surface.to_html()?)?,
        }
        crate::info!("viewer", "wrote {:?} to {}", format, self.path.display());
        Ok(())
    }
}

#[cfg(feature = "terminal")]
pub use terminal::{action_for_key, TerminalViewer, ViewerAction};

#[cfg(feature = "terminal")]
mod terminal {
    use super::Viewer;
    use crate::error::Result;
    use crate::output::{TerminalEncoder, TerminalMode};
    use crate::plots::BuiltSurface;
    use crate::render::Camera;
    use crossterm::cursor::{Hide, MoveTo, Show};
    use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
    use crossterm::style::Print;
    use crossterm::terminal::{
        self as term, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    };
    use crossterm::{queue, ExecutableCommand};
    use std::io::{stdout, Write};

    const HELP: &str = "arrows rotate  +/- zoom  r reset  q quit";

    /// What a key press asks the viewer to do.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum ViewerAction {
        /// Rotate the camera by the given angles in radians.
        Orbit {
            /// Change of azimuth.
            d_azimuth: f32,
            /// Change of elevation.
            d_elevation: f32,
        },
        /// Multiply the zoom factor.
        Zoom(f32),
        /// Return to the initial view.
        Reset,
        /// Leave the viewer.
        Quit,
        /// Key has no binding.
        Ignore,
    }

    /// Map a key press to a viewer action.
    #[must_use]
    pub fn action_for_key(code: KeyCode, modifiers: KeyModifiers) -> ViewerAction {
        let step = 10.0_f32.to_radians();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => ViewerAction::Quit,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => ViewerAction::Quit,
            KeyCode::Left => ViewerAction::Orbit { d_azimuth: -step, d_elevation: 0.0 },
            KeyCode::Right => ViewerAction::Orbit { d_azimuth: step, d_elevation: 0.0 },
            KeyCode::Up => ViewerAction::Orbit { d_azimuth: 0.0, d_elevation: step },
            KeyCode::Down => ViewerAction::Orbit { d_azimuth: 0.0, d_elevation: -step },
            KeyCode::Char('+' | '=') => ViewerAction::Zoom(1.25),
            KeyCode::Char('-' | '_') => ViewerAction::Zoom(0.8),
            KeyCode::Char('r') => ViewerAction::Reset,
            _ => ViewerAction::Ignore,
        }
    }

    /// Apply an action to a camera. Returns whether the view changed.
    pub(super) fn apply(camera: &mut Camera, action: ViewerAction) -> bool {
        match action {
            ViewerAction::Orbit { d_azimuth, d_elevation } => camera.orbit(d_azimuth, d_elevation),
            ViewerAction::Zoom(factor) => camera.zoom_by(factor),
            ViewerAction::Reset => camera.reset(),
            ViewerAction::Quit | ViewerAction::Ignore => return false,
        }
        true
    }

    /// Interactive terminal rendering with 24-bit color half-blocks.
    #[derive(Debug, Clone, Default)]
    pub struct TerminalViewer {
        mode: TerminalMode,
    }

    impl TerminalViewer {
        /// Viewer using half-block color output.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Set the character rendering mode.
        #[must_use]
        pub fn mode(mut self, mode: TerminalMode) -> Self {
            self.mode = mode;
            self
        }

        fn draw(&self, surface: &BuiltSurface) -> Result<()> {
            let (columns, lines) = term::size()?;
            let fb = surface.to_framebuffer()?;
            let encoder = TerminalEncoder::new().mode(self.mode).fit(&fb, columns, lines.saturating_sub(1));

            let mut out = stdout().lock();
            queue!(out, Clear(ClearType::All))?;
            let rendered = encoder.render_lines(&fb);
            for (y, line) in rendered.iter().enumerate() {
                queue!(out, MoveTo(0, y as u16), Print(line))?;
            }
            let title = &surface.config().title;
            queue!(out, MoveTo(0, lines.saturating_sub(1)), Print(format!("{title} | {HELP}")))?;
            out.flush()?;
            Ok(())
        }

        fn run(&self, surface: &BuiltSurface) -> Result<()> {
            let mut camera = surface.scene().camera().clone();
            let mut dirty = true;

            loop {
                if dirty {
                    crate::time_scope!("viewer", "terminal frame");
                    self.draw(&surface.with_camera(camera.clone()))?;
                    dirty = false;
                }

                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        match action_for_key(key.code, key.modifiers) {
                            ViewerAction::Quit => return Ok(()),
                            action => dirty = apply(&mut camera, action),
                        }
                    }
                    Event::Resize(..) => dirty = true,
                    _ => {}
                }
            }
        }
    }

    impl Viewer for TerminalViewer {
        fn show(&self, surface: &BuiltSurface) -> Result<()> {
            enable_raw_mode()?;
            stdout().execute(EnterAlternateScreen)?;
            stdout().execute(Hide)?;

            let result = self.run(surface);

            disable_raw_mode()?;
            stdout().execute(LeaveAlternateScreen)?;
            stdout().execute(Show)?;
            result
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_quit_keys() {
            assert_eq!(action_for_key(KeyCode::Char('q'), KeyModifiers::NONE), ViewerAction::Quit);
            assert_eq!(action_for_key(KeyCode::Esc, KeyModifiers::NONE), ViewerAction::Quit);
            assert_eq!(action_for_key(KeyCode::Char('c'), KeyModifiers::CONTROL), ViewerAction::Quit);
            assert_eq!(action_for_key(KeyCode::Char('c'), KeyModifiers::NONE), ViewerAction::Ignore);
        }

        #[test]
        fn test_arrows_orbit() {
            match action_for_key(KeyCode::Left, KeyModifiers::NONE) {
                ViewerAction::Orbit { d_azimuth, d_elevation } => {
                    assert!(d_azimuth < 0.0);
                    assert!(d_elevation.abs() < f32::EPSILON);
                }
                other => panic!("unexpected {other:?}"),
            }
            assert!(matches!(
                action_for_key(KeyCode::Up, KeyModifiers::NONE),
                ViewerAction::Orbit { d_elevation, .. } if d_elevation > 0.0
            ));
        }

        #[test]
        fn test_zoom_and_reset() {
            let mut camera = Camera::default();
            assert!(apply(&mut camera, action_for_key(KeyCode::Char('+'), KeyModifiers::NONE)));
            assert!(camera.zoom() > 1.0);
            assert!(apply(&mut camera, action_for_key(KeyCode::Right, KeyModifiers::NONE)));
            assert!(apply(&mut camera, action_for_key(KeyCode::Char('r'), KeyModifiers::NONE)));
            assert_eq!(camera, Camera::default());
            assert!(!apply(&mut camera, action_for_key(KeyCode::Char('x'), KeyModifiers::NONE)));
        }
    }
}
