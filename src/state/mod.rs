/// State management module
///
/// This module handles all application state, including:
/// - Card records built from the manifest (card.rs)
/// - Per-card pointer tilt/parallax state (tilt.rs)
/// - The per-card unlock gate (unlock.rs)
/// - The full-screen viewer state machine (viewer.rs)

pub mod card;
pub mod tilt;
pub mod unlock;
pub mod viewer;
