//! Configuration management for RV.
//!
//! Parses `rv.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. Every setting has a
//! default, so running without a config file is the common case.
//!
//! ```toml
//! [output]
//! dir = "."
//! extension = "re"
//!
//! [images]
//! dir = "images"
//!
//! [page]
//! width = "15.1cm"
//!
//! [styles]
//! code = ["Preformatted_20_Text", "Code"]
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "rv.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,
    /// Image extraction configuration (paths are relative strings from TOML).
    images: ImagesConfigRaw,
    /// Reference page geometry.
    pub page: PageConfig,
    /// List rendering configuration.
    pub list: ListConfig,
    /// Paragraph style names mapped to block kinds.
    pub styles: StylesConfig,

    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Resolved image configuration (set after loading).
    #[serde(skip)]
    pub images_resolved: ImagesConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
    extension: Option<String>,
}

/// Resolved output configuration.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Directory receiving the markup file.
    pub dir: PathBuf,
    /// Markup file extension without the leading dot.
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            extension: "re".to_owned(),
        }
    }
}

impl OutputConfig {
    /// Markup file path for a document base name.
    ///
    /// # Examples
    ///
    /// ```
    /// use rv_config::OutputConfig;
    ///
    /// let output = OutputConfig::default();
    /// assert_eq!(output.file_for("chapter1"), std::path::Path::new("./chapter1.re"));
    /// ```
    #[must_use]
    pub fn file_for(&self, basename: &str) -> PathBuf {
        self.dir.join(format!("{basename}.{}", self.extension))
    }
}

/// Raw image configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ImagesConfigRaw {
    dir: Option<String>,
    skip_extensions: Option<Vec<String>>,
    raster_extensions: Option<Vec<String>>,
}

/// Resolved image extraction configuration.
#[derive(Debug, Clone)]
pub struct ImagesConfig {
    /// Directory receiving extracted images.
    pub dir: PathBuf,
    /// Extensions of images that are never extracted (vector formats).
    pub skip_extensions: Vec<String>,
    /// Extensions stripped from image names in markup.
    pub raster_extensions: Vec<String>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./images"),
            skip_extensions: default_skip_extensions(),
            raster_extensions: default_raster_extensions(),
        }
    }
}

fn default_skip_extensions() -> Vec<String> {
    ["svm", "wmf", "emf"].map(str::to_owned).to_vec()
}

fn default_raster_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "gif", "bmp"].map(str::to_owned).to_vec()
}

/// Reference page geometry.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Text area width used as 100% for image widths (e.g. `15.1cm`).
    pub width: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width: "15.1cm".to_owned(),
        }
    }
}

/// List rendering configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Marker character for bulleted items, repeated per depth.
    pub bullet: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            bullet: "*".to_owned(),
        }
    }
}

/// Paragraph style names recognized for each block kind.
///
/// Names are the internal ODF style names, where spaces are encoded as
/// `_20_` (`Text body` is `Text_20_body`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Document title (`=`).
    pub title: Vec<String>,
    /// Subtitle block.
    pub subtitle: Vec<String>,
    /// Code listing region.
    pub code: Vec<String>,
    /// Quotation region.
    pub quote: Vec<String>,
    /// Signature/contact region.
    pub author: Vec<String>,
    /// Plain body paragraphs.
    pub body: Vec<String>,
}

impl Default for StylesConfig {
    fn default() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| (*s).to_owned()).collect();
        Self {
            title: names(&["Title"]),
            subtitle: names(&["Subtitle"]),
            code: names(&["Preformatted_20_Text", "Code"]),
            quote: names(&["Quotations"]),
            author: names(&["Signature", "Sender"]),
            body: names(&[
                "Standard",
                "Text_20_body",
                "Default_20_Paragraph_20_Style",
                "First_20_line_20_indent",
                "Table_20_Contents",
                "Caption",
            ]),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `rv.toml` in current directory and parents,
    /// falling back to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)
        } else {
            Ok(Self::default_with_cwd())
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            output: OutputConfigRaw::default(),
            images: ImagesConfigRaw::default(),
            page: PageConfig::default(),
            list: ListConfig::default(),
            styles: StylesConfig::default(),
            output_resolved: OutputConfig {
                dir: base.to_path_buf(),
                ..OutputConfig::default()
            },
            images_resolved: ImagesConfig {
                dir: base.join("images"),
                ..ImagesConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_output()?;
        self.validate_page()?;
        self.validate_list()?;
        Ok(())
    }

    fn validate_output(&self) -> Result<(), ConfigError> {
        let extension = &self.output_resolved.extension;
        require_non_empty(extension, "output.extension")?;
        if extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "output.extension must not start with '.'".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_page(&self) -> Result<(), ConfigError> {
        let width = self.page.width.trim();
        require_non_empty(width, "page.width")?;
        let numeric = width.trim_end_matches(|c: char| c.is_ascii_alphabetic());
        match numeric.parse::<f64>() {
            Ok(value) if value > 0.0 && numeric.len() < width.len() => Ok(()),
            _ => Err(ConfigError::Validation(format!(
                "page.width must be a positive length with a unit, got {width:?}"
            ))),
        }
    }

    fn validate_list(&self) -> Result<(), ConfigError> {
        if self.list.bullet.chars().count() != 1 {
            return Err(ConfigError::Validation(
                "list.bullet must be a single character".to_owned(),
            ));
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory and apply defaults.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let output_dir = config_dir.join(self.output.dir.as_deref().unwrap_or("."));
        let images_dir = output_dir.join(self.images.dir.as_deref().unwrap_or("images"));

        self.output_resolved = OutputConfig {
            dir: output_dir,
            extension: self
                .output
                .extension
                .clone()
                .unwrap_or_else(|| OutputConfig::default().extension),
        };
        self.images_resolved = ImagesConfig {
            dir: images_dir,
            skip_extensions: self
                .images
                .skip_extensions
                .clone()
                .unwrap_or_else(default_skip_extensions),
            raster_extensions: self
                .images
                .raster_extensions
                .clone()
                .unwrap_or_else(default_raster_extensions),
        };
    }
}
