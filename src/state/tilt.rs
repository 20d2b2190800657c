/// Pointer-driven tilt/parallax state, one entry per card
///
/// Raw pointer coordinates become offsets from the card center; two visual
/// transforms derive from them: a 3D rotation of the card surface toward
/// the pointer, and an inverse translation of the background layer that
/// creates the depth separation. No smoothing happens here — transforms
/// are recomputed on every move and any easing belongs to the renderer.

use std::collections::HashMap;

/// Maximum surface rotation in degrees, reached at the card's edge.
const MAX_ROTATION_DEG: f32 = 30.0;
/// Background parallax travel in pixels, reached at the card's edge.
const PARALLAX_PX: f32 = 40.0;
/// How long a departed pointer's offsets linger before decaying to center.
pub const RESET_DELAY_MS: u64 = 1000;

/// Transient pointer state for one card.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    /// Pointer offset from the card center, pixels.
    pub offset_x: f32,
    pub offset_y: f32,
    /// Card dimensions, recorded on every move.
    pub width: f32,
    pub height: f32,
    /// Bumped on every enter/leave; a scheduled reset only applies if it
    /// still presents the current value. Spawned delays cannot be revoked,
    /// so cancellation means letting a stale one arrive and be ignored.
    generation: u64,
}

/// Derived visual transform for one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltTransform {
    /// Surface rotation around the vertical axis, degrees.
    pub rotate_y: f32,
    /// Surface rotation around the horizontal axis, degrees.
    /// Sign-inverted so the surface tilts toward the pointer.
    pub rotate_x: f32,
    /// Background layer translation, pixels. Opposite sign and larger
    /// magnitude than the rotation.
    pub translate_x: f32,
    pub translate_y: f32,
}

impl TiltTransform {
    pub const NEUTRAL: TiltTransform = TiltTransform {
        rotate_y: 0.0,
        rotate_x: 0.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };
}

impl PointerState {
    /// Update offsets for a pointer at `(raw_x, raw_y)` over a card whose
    /// top-left corner is at `(origin_x, origin_y)`.
    pub fn pointer_moved(
        &mut self,
        raw_x: f32,
        raw_y: f32,
        origin_x: f32,
        origin_y: f32,
        width: f32,
        height: f32,
    ) {
        self.width = width;
        self.height = height;
        self.offset_x = raw_x - origin_x - width / 2.0;
        self.offset_y = raw_y - origin_y - height / 2.0;
    }

    /// The pointer came back: any pending reset becomes stale.
    pub fn pointer_entered(&mut self) {
        self.generation += 1;
    }

    /// The pointer left. Returns the token a delayed reset must present
    /// when it fires [`RESET_DELAY_MS`] later.
    pub fn pointer_left(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Apply a scheduled reset. A stale token (the pointer re-entered
    /// after it was issued) leaves the offsets untouched.
    pub fn apply_reset(&mut self, token: u64) {
        if token == self.generation {
            self.offset_x = 0.0;
            self.offset_y = 0.0;
        }
    }

    /// Snap to center immediately, invalidating any pending reset.
    pub fn force_reset(&mut self) {
        self.generation += 1;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    /// Offsets normalized by the card dimensions.
    fn normalized(&self) -> (f32, f32) {
        let px = if self.width > 0.0 { self.offset_x / self.width } else { 0.0 };
        let py = if self.height > 0.0 { self.offset_y / self.height } else { 0.0 };
        (px, py)
    }

    /// Derive the current visual transform. Pure; recomputed on demand.
    pub fn transform(&self) -> TiltTransform {
        let (px, py) = self.normalized();
        TiltTransform {
            rotate_y: px * MAX_ROTATION_DEG,
            rotate_x: py * -MAX_ROTATION_DEG,
            translate_x: px * -PARALLAX_PX,
            translate_y: py * -PARALLAX_PX,
        }
    }
}

/// Registry of per-card pointer state, keyed by card id.
/// Owned by the orchestrator; iterated to reset the whole grid when the
/// modal closes and cards re-layout.
#[derive(Debug, Default)]
pub struct TiltRegistry {
    states: HashMap<String, PointerState>,
}

impl TiltRegistry {
    pub fn state_mut(&mut self, card_id: &str) -> &mut PointerState {
        self.states.entry(card_id.to_string()).or_default()
    }

    /// Current transform for a card; neutral if it was never hovered.
    pub fn transform(&self, card_id: &str) -> TiltTransform {
        self.states
            .get(card_id)
            .map(PointerState::transform)
            .unwrap_or(TiltTransform::NEUTRAL)
    }

    /// Snap every card back to center.
    pub fn reset_all(&mut self) {
        for state in self.states.values_mut() {
            state.force_reset();
        }
    }

    /// Drop state for cards that no longer exist (manifest reload).
    pub fn retain_cards(&mut self, exists: impl Fn(&str) -> bool) {
        self.states.retain(|id, _| exists(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_matches_reference_values() {
        let mut state = PointerState::default();
        // Pointer at card-relative (150, 80) on a 200x100 card.
        state.pointer_moved(150.0, 80.0, 0.0, 0.0, 200.0, 100.0);
        assert_eq!(state.offset_x, 50.0);
        assert_eq!(state.offset_y, 30.0);

        let t = state.transform();
        assert_eq!(t.rotate_y, 7.5);
        assert_eq!(t.rotate_x, -9.0);
        assert_eq!(t.translate_x, -10.0);
        assert_eq!(t.translate_y, -12.0);
    }

    #[test]
    fn transform_is_neutral_before_any_move() {
        assert_eq!(PointerState::default().transform(), TiltTransform::NEUTRAL);
    }

    #[test]
    fn reenter_cancels_a_pending_reset() {
        let mut state = PointerState::default();
        state.pointer_moved(150.0, 80.0, 0.0, 0.0, 200.0, 100.0);

        let token = state.pointer_left();
        state.pointer_entered();
        state.apply_reset(token);

        // Stale token: offsets unchanged.
        assert_eq!((state.offset_x, state.offset_y), (50.0, 30.0));
    }

    #[test]
    fn uncancelled_reset_recenters() {
        let mut state = PointerState::default();
        state.pointer_moved(150.0, 80.0, 0.0, 0.0, 200.0, 100.0);

        let token = state.pointer_left();
        state.apply_reset(token);

        assert_eq!((state.offset_x, state.offset_y), (0.0, 0.0));
    }

    #[test]
    fn registry_resets_every_card() {
        let mut registry = TiltRegistry::default();
        registry
            .state_mut("a")
            .pointer_moved(10.0, 10.0, 0.0, 0.0, 200.0, 100.0);
        registry
            .state_mut("b")
            .pointer_moved(190.0, 90.0, 0.0, 0.0, 200.0, 100.0);

        registry.reset_all();

        assert_eq!(registry.transform("a"), TiltTransform::NEUTRAL);
        assert_eq!(registry.transform("b"), TiltTransform::NEUTRAL);
    }
}
