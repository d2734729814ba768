//! Conversion of one input document.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use rv_config::Config;
use rv_odf::OdfPackage;
use rv_review::Converter;

use crate::error::CliError;
use crate::output::Output;

/// Convert `input` and return the path of the written markup file.
///
/// The document is opened and parsed before the output file is created, so
/// an unreadable input leaves no output behind.
pub(crate) fn run(input: &Path, config: &Config, output: &Output) -> Result<PathBuf, CliError> {
    let basename = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| {
            CliError::Validation(format!("Invalid input file name: {}", input.display()))
        })?;

    let mut package = OdfPackage::open(input)?;
    let document = package.document()?;

    let target = config.output_resolved.file_for(basename);
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(&target).map_err(|e| {
        std::io::Error::new(e.kind(), format!("{e}: {}", target.display()))
    })?;
    tracing::debug!(input = %input.display(), target = %target.display(), "Created output file");

    output.converting(input);
    let converter = Converter::from_config(config);
    let mut images = package.images(config.images_resolved.dir.clone());
    let summary = converter.convert(&document, basename, &mut images, BufWriter::new(file))?;

    output.converted(&target, &summary);
    Ok(target)
}
