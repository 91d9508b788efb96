//! Sibling image lookup for recipe documents.

use std::path::Path;

/// Supported image extensions, in precedence order.
pub const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "png"];

/// Find the image that accompanies a document.
///
/// Checks `<base_name>.jpg` then `<base_name>.png` inside `dir` and returns
/// the file name of the first one that exists.
pub fn locate_image(dir: &Path, base_name: &str) -> Option<String> {
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| format!("{base_name}.{ext}"))
        .find(|file_name| dir.join(file_name).is_file())
}

/// Whether a file name carries one of the supported image extensions.
pub fn is_image_name(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(base, ext)| !base.is_empty() && IMAGE_EXTENSIONS.contains(&ext))
}
