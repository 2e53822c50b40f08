//! Standalone HTML page around an inline SVG chart.
//!
//! The page needs no scripts or network access: hover tooltips come from
//! the SVG `<title>` elements and a CSS outline highlights the face under
//! the pointer. An optional PNG snapshot is embedded as a download link.

use crate::error::Result;
use crate::output::svg::escape_xml;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// Builder for a self-contained HTML chart document.
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    title: String,
    svg: String,
    width: u32,
    height: u32,
    autosize: bool,
    png_data_uri: Option<String>,
}

impl HtmlExporter {
    /// Wrap an SVG document of the given pixel size.
    #[must_use]
    pub fn new(title: impl Into<String>, svg: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            svg: svg.into(),
            width,
            height,
            autosize: false,
            png_data_uri: None,
        }
    }

    /// Stretch the chart to the window width instead of fixed pixels.
    #[must_use]
    pub fn autosize(mut self, autosize: bool) -> Self {
        self.autosize = autosize;
        self
    }

    /// Offer `png` (encoded PNG bytes) as a "Download plot as a png" link.
    #[must_use]
    pub fn png_download(mut self, png: &[u8]) -> Self {
        self.png_data_uri = Some(format!("data:image/png;base64,{}", STANDARD.encode(png)));
        self
    }

    /// Render the complete document.
    #[must_use]
    pub fn render(&self) -> String {
        let mut html = String::with_capacity(self.svg.len() + 2048);
        let title = escape_xml(&self.title);

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        let _ = writeln!(html, "<title>{title}</title>");
        html.push_str(&self.css());
        html.push_str("</head>\n<body>\n");

        html.push_str("<div class=\"chart\">\n");
        if let Some(uri) = &self.png_data_uri {
            let _ = writeln!(
                html,
                "<a class=\"modebar\" download=\"bench-surface.png\" href=\"{uri}\" \
                 title=\"Download plot as a png\">&#128247;</a>"
            );
        }
        html.push_str(&self.svg);
        html.push_str("</div>\n</body>\n</html>\n");
        html
    }

    fn css(&self) -> String {
        let size = if self.autosize {
            "width: 100%;".to_string()
        } else {
            format!("width: {}px; height: {}px;", self.width, self.height)
        };
        let svg_size = if self.autosize { "width: 100%; height: auto;" } else { "" };

        let mut css = String::from("<style>\n");
        css.push_str("body { margin: 0; background: #fff; }\n");
        let _ = writeln!(css, ".chart {{ position: relative; {size} }}");
        let _ = writeln!(css, ".chart svg {{ display: block; {svg_size} }}");
        css.push_str(".chart .face:hover { stroke: #444; stroke-width: 1.5; }\n");
        css.push_str(
            ".modebar { position: absolute; top: 4px; right: 8px; text-decoration: none; \
             opacity: 0.3; font-size: 18px; }\n",
        );
        css.push_str(".modebar:hover { opacity: 1; }\n");
        css.push_str("</style>\n");
        css
    }

    /// Write the document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.render())?;
        Ok(())
    }
}
