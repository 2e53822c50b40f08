//! Chart configuration.
//!
//! `ChartConfig::default()` is the benchmark chart: fixed 1000x1000 canvas,
//! responsive sizing off, margins 65/50/65/90 and the camera at
//! (1.25, 1.25, 1.25). Every field can be overridden from YAML; missing
//! fields fall back to the defaults.

use crate::error::{Error, Result};
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Margin insets in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    /// Left inset.
    #[serde(default = "default_margin_l")]
    pub l: u32,
    /// Right inset.
    #[serde(default = "default_margin_r")]
    pub r: u32,
    /// Bottom inset.
    #[serde(default = "default_margin_b")]
    pub b: u32,
    /// Top inset.
    #[serde(default = "default_margin_t")]
    pub t: u32,
}

fn default_margin_l() -> u32 {
    65
}
fn default_margin_r() -> u32 {
    50
}
fn default_margin_b() -> u32 {
    65
}
fn default_margin_t() -> u32 {
    90
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            l: default_margin_l(),
            r: default_margin_r(),
            b: default_margin_b(),
            t: default_margin_t(),
        }
    }
}

/// 3D scene settings: axis titles and camera eye.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Title of the X (column) axis.
    #[serde(default = "default_xaxis_title")]
    pub xaxis_title: String,
    /// Title of the Y (row) axis.
    #[serde(default = "default_yaxis_title")]
    pub yaxis_title: String,
    /// Title of the Z (value) axis.
    #[serde(default = "default_zaxis_title")]
    pub zaxis_title: String,
    /// Camera position relative to the scene center, in units of the
    /// scene cube's side.
    #[serde(default = "default_camera_eye")]
    pub camera_eye: [f32; 3],
}

fn default_xaxis_title() -> String {
    "Sprites".to_string()
}
fn default_yaxis_title() -> String {
    "Tweens".to_string()
}
fn default_zaxis_title() -> String {
    "Time (s)".to_string()
}
fn default_camera_eye() -> [f32; 3] {
    [1.25, 1.25, 1.25]
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            xaxis_title: default_xaxis_title(),
            yaxis_title: default_yaxis_title(),
            zaxis_title: default_zaxis_title(),
            camera_eye: default_camera_eye(),
        }
    }
}

/// Display configuration for a surface chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Chart title, drawn in the top margin.
    #[serde(default = "default_title")]
    pub title: String,

    /// Scene settings.
    #[serde(default)]
    pub scene: SceneConfig,

    /// Let HTML output stretch to its container instead of fixed pixels.
    #[serde(default)]
    pub autosize: bool,

    /// Canvas width in pixels.
    #[serde(default = "default_size")]
    pub width: u32,

    /// Canvas height in pixels.
    #[serde(default = "default_size")]
    pub height: u32,

    /// Margins around the plot area.
    #[serde(default)]
    pub margin: Margin,
}

fn default_title() -> String {
    "Sprite Tweening Frame Update Performance".to_string()
}
fn default_size() -> u32 {
    1000
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            scene: SceneConfig::default(),
            autosize: false,
            width: default_size(),
            height: default_size(),
            margin: Margin::default(),
        }
    }
}

impl ChartConfig {
    /// Parse and validate a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed YAML or an unusable configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not validate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the three axis titles.
    #[must_use]
    pub fn with_axis_titles(
        mut self,
        x: impl Into<String>,
        y: impl Into<String>,
        z: impl Into<String>,
    ) -> Self {
        self.scene.xaxis_title = x.into();
        self.scene.yaxis_title = y.into();
        self.scene.zaxis_title = z.into();
        self
    }

    /// Set the canvas size.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the margins.
    #[must_use]
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Set the camera eye.
    #[must_use]
    pub fn with_camera_eye(mut self, eye: [f32; 3]) -> Self {
        self.scene.camera_eye = eye;
        self
    }

    /// Check that the canvas and margins leave a plot area.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for a zero-sized canvas and
    /// [`Error::InvalidConfig`] when margins consume the canvas or the
    /// camera sits at the scene center.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }
        let m = self.margin;
        if m.l.saturating_add(m.r) >= self.width || m.t.saturating_add(m.b) >= self.height {
            return Err(Error::InvalidConfig(format!(
                "margins l={} r={} t={} b={} leave no plot area in {}x{}",
                m.l, m.r, m.t, m.b, self.width, self.height
            )));
        }
        let eye = self.scene.camera_eye;
        if !eye.iter().all(|v| v.is_finite()) || eye.iter().all(|v| v.abs() < f32::EPSILON) {
            return Err(Error::InvalidConfig(format!("camera eye {eye:?} is unusable")));
        }
        Ok(())
    }

    /// Canvas minus margins.
    #[must_use]
    pub fn plot_area(&self) -> Rect {
        let m = self.margin;
        Rect::new(
            m.l as f32,
            m.t as f32,
            self.width.saturating_sub(m.l + m.r) as f32,
            self.height.saturating_sub(m.t + m.b) as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_benchmark_chart() {
        let config = ChartConfig::default();
        assert_eq!(config.title, "Sprite Tweening Frame Update Performance");
        assert_eq!(config.scene.xaxis_title, "Sprites");
        assert_eq!(config.scene.yaxis_title, "Tweens");
        assert_eq!(config.scene.zaxis_title, "Time (s)");
        assert!(!config.autosize);
        assert_eq!((config.width, config.height), (1000, 1000));
        assert_eq!(config.margin, Margin { l: 65, r: 50, b: 65, t: 90 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_plot_area() {
        let area = ChartConfig::default().plot_area();
        assert_eq!(area, Rect::new(65.0, 90.0, 885.0, 845.0));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = ChartConfig::from_yaml_str("title: Other\nmargin:\n  l: 10\n").unwrap();
        assert_eq!(config.title, "Other");
        assert_eq!(config.margin.l, 10);
        assert_eq!(config.margin.t, 90);
        assert_eq!(config.width, 1000);
        assert_eq!(config.scene.zaxis_title, "Time (s)");
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = ChartConfig::default().with_title("T").with_size(640, 480);
        let yaml = config.to_yaml().unwrap();
        assert_eq!(ChartConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = ChartConfig::from_yaml_str("width: [not a number]").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        assert!(matches!(
            ChartConfig::default().with_size(0, 100).validate(),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            ChartConfig::default().with_size(100, 100).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(ChartConfig::default().with_camera_eye([0.0, 0.0, 0.0]).validate().is_err());
        assert!(ChartConfig::default().with_camera_eye([f32::NAN, 1.0, 1.0]).validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.yaml");
        std::fs::write(&path, "autosize: true\n").unwrap();

        let config = ChartConfig::load(&path).unwrap();
        assert!(config.autosize);
        assert!(ChartConfig::load(dir.path().join("missing.yaml")).is_err());
    }
}
