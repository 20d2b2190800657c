/// Asset discovery and ingestion
///
/// This module owns everything that touches media files on behalf of the
/// card grid:
/// - Manifest and unlock-code collaborators (manifest.rs)
/// - The image-probe capability (probe.rs)
/// - Animated-preview path resolution (resolver.rs)
/// - File-picker / drag-drop ingestion into a card's gallery (ingest.rs)

pub mod ingest;
pub mod manifest;
pub mod probe;
pub mod resolver;
