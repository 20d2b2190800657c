/// Error taxonomy for the gallery
///
/// Probe failures are deliberately absent: a missing preview asset is a
/// normal outcome handled inside the resolver, never an error the rest of
/// the app sees.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GalleryError {
    /// The unlock input did not match the expected code for the staged card,
    /// no challenge was staged, or the card has no known code.
    #[error("Invalid code for this card")]
    InvalidCode,

    /// The manifest could not be loaded from any known location.
    /// Fatal to the card list; the UI degrades to a banner + placeholder.
    #[error("Error loading content: {0}")]
    ManifestLoad(String),

    /// The code map could not be loaded. Non-fatal: unlocking simply
    /// fails until a reload succeeds.
    #[error("Error loading unlock codes: {0}")]
    CodeMapLoad(String),
}
