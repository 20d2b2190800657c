/// File-picker and drag-drop ingestion
///
/// Files enter a card's gallery either through the native picker or by
/// being dropped on the window. Either way they pass through the same
/// ingest step: decode the header to confirm the file really is an image
/// (and grab its dimensions), skip it with a warning otherwise.

use std::path::PathBuf;

use tokio::task;

use crate::state::viewer::GalleryImage;

/// Open the native file picker and ingest the selection.
pub async fn pick_images() -> Vec<GalleryImage> {
    let picked = rfd::AsyncFileDialog::new()
        .set_title("Add Images to Gallery")
        .add_filter("Images", &["jpg", "jpeg", "png", "gif", "webp", "bmp"])
        .pick_files()
        .await
        .unwrap_or_default();

    let mut images = Vec::new();
    for file in picked {
        if let Some(image) = ingest_file(file.path().to_path_buf()).await {
            images.push(image);
        }
    }
    images
}

/// Ingest a single picked or dropped file.
/// Returns `None` (with a logged warning) for anything that is not a
/// readable image.
pub async fn ingest_file(path: PathBuf) -> Option<GalleryImage> {
    let probe_path = path.clone();
    let dimensions = task::spawn_blocking(move || image::image_dimensions(&probe_path))
        .await
        .ok()?;

    let (width, height) = match dimensions {
        Ok(d) => d,
        Err(e) => {
            eprintln!("⚠️  Skipping non-image file {}: {}", path.display(), e);
            return None;
        }
    };

    let size = tokio::fs::metadata(&path)
        .await
        .map(|m| m.len())
        .unwrap_or(0);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Some(GalleryImage {
        path,
        name,
        size,
        width,
        height,
    })
}
