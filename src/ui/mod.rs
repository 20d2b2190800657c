/// Canvas programs bridging raw mouse/wheel events to application messages
///
/// - card.rs: per-card background rendering + pointer tracking
/// - viewer.rs: full-screen image rendering + wheel zoom and drag pan

pub mod card;
pub mod viewer;
