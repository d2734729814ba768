//! Conversion settings derived from the configuration file.

use rv_config::{Config, StylesConfig};
use rv_odf::Length;

/// Settings that shape the generated markup.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Style names for each block kind.
    pub styles: StylesConfig,
    /// Bullet list marker character.
    pub bullet: String,
    /// Page width images are sized against (`None` disables width output).
    pub page_width: Option<Length>,
    /// Image extensions skipped entirely (vector formats).
    pub skip_extensions: Vec<String>,
    /// Image extensions stripped from emitted image names.
    pub raster_extensions: Vec<String>,
}

impl ConvertOptions {
    /// Build options from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            styles: config.styles.clone(),
            bullet: config.list.bullet.clone(),
            page_width: Length::parse(&config.page.width),
            skip_extensions: config.images_resolved.skip_extensions.clone(),
            raster_extensions: config.images_resolved.raster_extensions.clone(),
        }
    }

    /// Set the page width.
    #[must_use]
    pub fn with_page_width(mut self, width: &str) -> Self {
        self.page_width = Length::parse(width);
        self
    }

    /// Set the bullet marker.
    #[must_use]
    pub fn with_bullet(mut self, bullet: impl Into<String>) -> Self {
        self.bullet = bullet.into();
        self
    }

    pub(crate) fn is_skipped_extension(&self, ext: &str) -> bool {
        self.skip_extensions
            .iter()
            .any(|skip| skip.eq_ignore_ascii_case(ext))
    }

    pub(crate) fn is_raster_extension(&self, ext: &str) -> bool {
        self.raster_extensions
            .iter()
            .any(|raster| raster.eq_ignore_ascii_case(ext))
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
