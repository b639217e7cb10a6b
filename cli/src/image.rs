//! Turns an image file into the data URI stored in a report.

use anyhow::{Context, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use gtracker_core::types::ImageConfig;
use std::path::Path;

/// MIME type guessed from the file extension.
fn mime_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" => Some("image/jpg"),
        "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

pub fn read_data_uri(path: &Path, config: &ImageConfig) -> anyhow::Result<String> {
    let mime = mime_type(path)
        .filter(|mime| config.accepted_formats.iter().any(|accepted| accepted == mime))
        .with_context(|| {
            format!(
                "{} is not an accepted image ({})",
                path.display(),
                config.accepted_formats.join(", ")
            )
        })?;

    let size = std::fs::metadata(path)
        .with_context(|| format!("cannot read {}", path.display()))?
        .len();
    if size > config.max_file_size {
        bail!(
            "{} is {} bytes, the limit is {} bytes",
            path.display(),
            size,
            config.max_file_size
        );
    }

    let bytes = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}
