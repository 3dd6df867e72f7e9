use crate::device::CameraPosition;
use crate::geometry::Rect;
use crate::overlay::Locale;
use crate::session::{OutputConfig, Symbology};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScannerConfig {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CameraConfig {
    /// Camera the session starts with
    #[serde(default)]
    pub position: CameraPosition,

    /// Focus point of interest (x, y) in unit coordinates
    #[serde(default = "default_focus_point")]
    pub focus_point: (f64, f64),
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScanConfig {
    /// In-bounds hits required before a result is delivered
    #[serde(default = "default_debounce_threshold")]
    pub debounce_threshold: u32,

    /// Reset the hit count on frames without an in-bounds candidate
    #[serde(default)]
    pub reset_on_miss: bool,

    /// Finish the session when a still image contains no code
    #[serde(default = "default_close_on_static_miss")]
    pub close_on_static_miss: bool,

    /// Code types the output reports
    #[serde(default = "default_symbologies")]
    pub symbologies: Vec<Symbology>,

    /// Decoder region of interest (x, y, width, height) in unit coordinates
    #[serde(default = "default_rect_of_interest")]
    pub rect_of_interest: (f64, f64, f64, f64),
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct UiConfig {
    /// Instruction and button language
    #[serde(default)]
    pub locale: Locale,

    /// Visible view size (width, height) in points
    #[serde(default = "default_view_size")]
    pub view_size: (f64, f64),

    #[serde(default)]
    pub icons: IconConfig,
}

/// Optional button icons. A missing icon changes which controls render.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct IconConfig {
    pub camera: Option<String>,
    pub cancel: Option<String>,
    pub torch_on: Option<String>,
    pub torch_off: Option<String>,
}

impl ScannerConfig {
    /// Load configuration from default sources (file + environment variables)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file("qrscan.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default("camera.position", CameraPosition::default().as_str())?
            .set_default(
                "camera.focus_point",
                vec![default_focus_point().0, default_focus_point().1],
            )?
            .set_default("scan.debounce_threshold", default_debounce_threshold())?
            .set_default("scan.reset_on_miss", false)?
            .set_default("scan.close_on_static_miss", default_close_on_static_miss())?
            .set_default(
                "scan.symbologies",
                default_symbologies()
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>(),
            )?
            .set_default("scan.rect_of_interest", {
                let (x, y, w, h) = default_rect_of_interest();
                vec![x, y, w, h]
            })?
            .set_default("ui.locale", Locale::default().code())?
            .set_default(
                "ui.view_size",
                vec![default_view_size().0, default_view_size().1],
            )?
            .add_source(File::with_name(&path_str).required(false))
            // QRSCAN_SCAN__DEBOUNCE_THRESHOLD=20 sets scan.debounce_threshold
            .add_source(
                Environment::with_prefix("QRSCAN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: ScannerConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (fx, fy) = self.camera.focus_point;
        if !(0.0..=1.0).contains(&fx) || !(0.0..=1.0).contains(&fy) {
            return Err(ConfigError::Message(
                "Camera focus_point must lie within the unit square".to_string(),
            ));
        }

        if self.scan.debounce_threshold == 0 {
            return Err(ConfigError::Message(
                "Scan debounce_threshold must be greater than 0".to_string(),
            ));
        }

        if self.scan.symbologies.is_empty() {
            return Err(ConfigError::Message(
                "At least one scan symbology must be enabled".to_string(),
            ));
        }

        let roi = self.rect_of_interest();
        if roi.is_empty() || !roi.is_normalized() {
            return Err(ConfigError::Message(
                "Scan rect_of_interest must be a non-empty rectangle within the unit square"
                    .to_string(),
            ));
        }

        if self.visible_region().is_empty() {
            return Err(ConfigError::Message(
                "UI view_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Serialize the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn rect_of_interest(&self) -> Rect {
        let (x, y, w, h) = self.scan.rect_of_interest;
        Rect::new(x, y, w, h)
    }

    /// View bounds a candidate must lie within to count
    pub fn visible_region(&self) -> Rect {
        let (w, h) = self.ui.view_size;
        Rect::new(0.0, 0.0, w, h)
    }

    pub fn output(&self) -> OutputConfig {
        OutputConfig {
            symbologies: self.scan.symbologies.clone(),
            rect_of_interest: self.rect_of_interest(),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            scan: ScanConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: CameraPosition::default(),
            focus_point: default_focus_point(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            debounce_threshold: default_debounce_threshold(),
            reset_on_miss: false,
            close_on_static_miss: default_close_on_static_miss(),
            symbologies: default_symbologies(),
            rect_of_interest: default_rect_of_interest(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            view_size: default_view_size(),
            icons: IconConfig::default(),
        }
    }
}

// Default value functions
fn default_focus_point() -> (f64, f64) {
    (0.5, 0.45)
}

fn default_debounce_threshold() -> u32 {
    15
}
fn default_close_on_static_miss() -> bool {
    true
}
fn default_symbologies() -> Vec<Symbology> {
    vec![Symbology::Qr]
}
fn default_rect_of_interest() -> (f64, f64, f64, f64) {
    (0.2, 0.2, 0.6, 0.6)
}

fn default_view_size() -> (f64, f64) {
    (390.0, 844.0)
}
