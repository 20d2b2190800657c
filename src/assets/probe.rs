/// Image-probe primitive
///
/// The resolver's only I/O contract: "attempt to load an image at path P,
/// report success or failure". Behind a trait so candidate probing can be
/// tested without touching the filesystem.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task;

/// Capability interface for checking whether an image loads at a path.
pub trait ImageProbe: Send + Sync {
    /// Attempt to load the image at `path`. Blocking.
    fn load(&self, path: &str) -> bool;
}

/// Filesystem-backed probe, resolving paths under a site root. Decoding
/// the header (dimensions only) is the native counterpart of an
/// `Image.onload` check: it proves the file exists and is a readable image
/// without decoding any pixels.
#[derive(Debug, Clone, Default)]
pub struct FsImageProbe {
    root: PathBuf,
}

impl FsImageProbe {
    pub fn new(root: PathBuf) -> Self {
        FsImageProbe { root }
    }
}

impl ImageProbe for FsImageProbe {
    fn load(&self, path: &str) -> bool {
        image::image_dimensions(self.root.join(path)).is_ok()
    }
}

/// Probe a single path off the UI thread.
/// Header decoding is blocking I/O, so it runs on the blocking pool.
pub async fn probe_path(probe: Arc<dyn ImageProbe>, path: String) -> bool {
    task::spawn_blocking(move || probe.load(&path))
        .await
        .unwrap_or(false)
}
