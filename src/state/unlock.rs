/// Per-card unlock gate
///
/// Each card may carry a secret code. The gate stages one challenge at a
/// time while the prompt is open, compares input case-insensitively
/// against the read-only code map, and marks the card unlocked on a match.
/// Unlocking is permanent for the session; there is no re-lock.

use crate::assets::manifest::CodeMap;
use crate::error::GalleryError;
use crate::state::card::CardCollection;

#[derive(Debug, Clone)]
struct Challenge {
    card_id: String,
    input: String,
}

#[derive(Debug, Default)]
pub struct UnlockGate {
    staged: Option<Challenge>,
}

impl UnlockGate {
    /// Stage a challenge for `card_id`, clearing any previous input.
    pub fn open(&mut self, card_id: &str) {
        self.staged = Some(Challenge {
            card_id: card_id.to_string(),
            input: String::new(),
        });
    }

    pub fn is_open(&self) -> bool {
        self.staged.is_some()
    }

    pub fn staged_card(&self) -> Option<&str> {
        self.staged.as_ref().map(|c| c.card_id.as_str())
    }

    pub fn input(&self) -> &str {
        self.staged.as_ref().map(|c| c.input.as_str()).unwrap_or("")
    }

    pub fn set_input(&mut self, value: String) {
        if let Some(challenge) = &mut self.staged {
            challenge.input = value;
        }
    }

    /// Validate the staged input against the code map.
    ///
    /// - `Ok(Some(id))`: match — the card is now unlocked, the challenge is
    ///   cleared, and the caller should proceed to the card's gallery.
    /// - `Ok(None)`: blank input — ignored, the prompt stays open.
    /// - `Err(InvalidCode)`: mismatch, no staged challenge, or no code known
    ///   for the card (treated identically). The challenge stays open for
    ///   retry and no card is mutated.
    pub fn submit(
        &mut self,
        codes: &CodeMap,
        cards: &mut CardCollection,
    ) -> Result<Option<String>, GalleryError> {
        let challenge = self.staged.as_ref().ok_or(GalleryError::InvalidCode)?;

        let input = challenge.input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        let expected = codes
            .get(&challenge.card_id)
            .map(String::as_str)
            .unwrap_or("");
        if expected.is_empty() || expected.to_uppercase() != input.to_uppercase() {
            return Err(GalleryError::InvalidCode);
        }

        let card = cards
            .get_mut(&challenge.card_id)
            .ok_or(GalleryError::InvalidCode)?;
        card.unlocked = true;

        let id = challenge.card_id.clone();
        self.staged = None;
        Ok(Some(id))
    }

    /// Drop the staged challenge without mutating any card.
    pub fn cancel(&mut self) {
        self.staged = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::manifest::ManifestEntry;

    fn one_card(id: &str) -> CardCollection {
        CardCollection::from_manifest(vec![ManifestEntry {
            id: id.to_string(),
            name: "Set".to_string(),
            file: "assets/models/set.jpg".to_string(),
            ..ManifestEntry::default()
        }])
    }

    fn codes(id: &str, code: &str) -> CodeMap {
        let mut map = CodeMap::new();
        map.insert(id.to_string(), code.to_string());
        map
    }

    #[test]
    fn matching_code_is_case_insensitive_and_unlocks() {
        let mut cards = one_card("s1");
        let mut gate = UnlockGate::default();

        gate.open("s1");
        gate.set_input(" abc123 ".to_string());
        let result = gate.submit(&codes("s1", "ABC123"), &mut cards);

        assert_eq!(result, Ok(Some("s1".to_string())));
        assert!(cards.get("s1").unwrap().unlocked);
        assert!(!gate.is_open());
    }

    #[test]
    fn case_folding_covers_non_ascii_codes() {
        let mut cards = one_card("s1");
        let mut gate = UnlockGate::default();

        gate.open("s1");
        gate.set_input("café".to_string());
        let result = gate.submit(&codes("s1", "CAFÉ"), &mut cards);

        assert_eq!(result, Ok(Some("s1".to_string())));
        assert!(cards.get("s1").unwrap().unlocked);
    }

    #[test]
    fn submit_without_a_staged_challenge_fails_and_mutates_nothing() {
        let mut cards = one_card("s1");
        let mut gate = UnlockGate::default();

        let result = gate.submit(&codes("s1", "ABC123"), &mut cards);

        assert_eq!(result, Err(GalleryError::InvalidCode));
        assert!(!cards.get("s1").unwrap().unlocked);
    }

    #[test]
    fn missing_code_entry_is_treated_as_a_mismatch() {
        let mut cards = one_card("s1");
        let mut gate = UnlockGate::default();

        gate.open("s1");
        gate.set_input("anything".to_string());
        let result = gate.submit(&CodeMap::new(), &mut cards);

        assert_eq!(result, Err(GalleryError::InvalidCode));
        assert!(gate.is_open(), "challenge stays open for retry");
        assert!(!cards.get("s1").unwrap().unlocked);
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut cards = one_card("s1");
        let mut gate = UnlockGate::default();

        gate.open("s1");
        gate.set_input("   ".to_string());
        let result = gate.submit(&codes("s1", "ABC123"), &mut cards);

        assert_eq!(result, Ok(None));
        assert!(gate.is_open());
    }

    #[test]
    fn cancel_drops_the_challenge_without_unlocking() {
        let mut cards = one_card("s1");
        let mut gate = UnlockGate::default();

        gate.open("s1");
        gate.set_input("ABC123".to_string());
        gate.cancel();

        assert!(!gate.is_open());
        assert!(!cards.get("s1").unwrap().unlocked);
    }
}
