/// Card records and the collection built from the manifest
///
/// A card represents one media set: its static cover image, an optional
/// animated preview resolved opportunistically after load, and an unlock
/// flag gating access to its gallery. Records live for the application
/// session and are replaced wholesale when the manifest reloads.

use crate::assets::manifest::ManifestEntry;
use crate::assets::resolver;

#[derive(Debug, Clone)]
pub struct CardRecord {
    pub id: String,
    pub name: String,
    /// Primary (static) image path, normalized and percent-encoded.
    pub file: String,
    /// The static image's on-disk path: normalized but never encoded.
    source: String,
    /// Tentative preview path; the resolver probes its variants.
    pub preview_candidate: String,
    /// Verified preview path. Written at most once, never unset.
    preview: Option<String>,
    /// Set only by the unlock gate; never cleared during a session.
    pub unlocked: bool,
    /// Whether the card currently shows its animated preview.
    pub showing_preview: bool,
    // Display metadata straight from the manifest.
    pub scene: String,
    pub photos: u32,
    pub videos: u32,
}

impl CardRecord {
    fn from_entry(entry: ManifestEntry) -> Self {
        let source = entry.file.replace('\\', "/");
        let file = resolver::encode_uri(&source);
        let preview_candidate = resolver::preview_candidate(&file);
        CardRecord {
            id: entry.id,
            name: entry.name,
            file,
            source,
            preview_candidate,
            preview: None,
            unlocked: false,
            showing_preview: false,
            scene: entry.scene,
            photos: entry.photos,
            videos: entry.videos,
        }
    }

    /// Fallback card shown when the manifest cannot be loaded at all.
    pub fn placeholder() -> Self {
        CardRecord {
            id: "debug-1".to_string(),
            name: "Sample card".to_string(),
            file: String::new(),
            source: String::new(),
            preview_candidate: String::new(),
            preview: None,
            unlocked: true,
            showing_preview: false,
            scene: "Manifest failed to load".to_string(),
            photos: 0,
            videos: 0,
        }
    }

    /// Record the resolved preview path. First write wins; a late probe
    /// result for an already-resolved card is ignored.
    pub fn set_preview(&mut self, url: String) {
        if self.preview.is_none() {
            self.preview = Some(url);
        }
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn has_preview(&self) -> bool {
        self.preview.is_some()
    }

    /// Flip between the static image and the animated preview.
    /// Does nothing until a preview has actually been resolved.
    pub fn toggle_preview(&mut self) {
        if self.preview.is_some() {
            self.showing_preview = !self.showing_preview;
        }
    }

    /// The on-disk path of the image the card should currently display,
    /// relative to the site root. A resolved preview is the literal path
    /// the probe matched (a file may really be named with `%20` in it), so
    /// it must never be decoded; the static image uses the manifest path
    /// from before encoding.
    pub fn display_image(&self) -> &str {
        if self.showing_preview {
            self.preview.as_deref().unwrap_or(&self.source)
        } else {
            &self.source
        }
    }
}

/// The ordered list of cards shown in the grid.
#[derive(Debug, Default)]
pub struct CardCollection {
    cards: Vec<CardRecord>,
}

impl CardCollection {
    /// Build records from manifest entries, skipping entries without a file.
    pub fn from_manifest(entries: Vec<ManifestEntry>) -> Self {
        let cards = entries
            .into_iter()
            .filter(|e| !e.file.is_empty())
            .map(CardRecord::from_entry)
            .collect();
        CardCollection { cards }
    }

    /// Collection holding only the fallback placeholder card.
    pub fn placeholder() -> Self {
        CardCollection {
            cards: vec![CardRecord::placeholder()],
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardRecord> {
        self.cards.iter()
    }

    pub fn get(&self, id: &str) -> Option<&CardRecord> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut CardRecord> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Cards whose name contains `query`, case-insensitively.
    /// A blank query matches everything.
    pub fn filtered<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a CardRecord> {
        let needle = query.trim().to_lowercase();
        self.cards
            .iter()
            .filter(move |c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, file: &str) -> ManifestEntry {
        ManifestEntry {
            id: id.to_string(),
            name: name.to_string(),
            file: file.to_string(),
            ..ManifestEntry::default()
        }
    }

    #[test]
    fn collection_skips_entries_without_a_file() {
        let cards = CardCollection::from_manifest(vec![
            entry("a", "One", "assets/models/one.jpg"),
            entry("b", "Two", ""),
        ]);
        assert_eq!(cards.len(), 1);
        assert!(cards.contains("a"));
        assert!(!cards.contains("b"));
    }

    #[test]
    fn paths_are_normalized_and_encoded() {
        let cards =
            CardCollection::from_manifest(vec![entry("a", "One", r"assets\models\my set.jpg")]);
        let card = cards.get("a").unwrap();
        assert_eq!(card.file, "assets/models/my%20set.jpg");
        assert_eq!(card.preview_candidate, "assets/gifs/my%20set.gif");
    }

    #[test]
    fn preview_is_set_at_most_once() {
        let mut card = CardRecord::from_entry(entry("a", "One", "assets/models/one.jpg"));
        card.set_preview("assets/gifs/one.gif".to_string());
        card.set_preview("assets/gif/one.GIF".to_string());
        assert_eq!(card.preview(), Some("assets/gifs/one.gif"));
    }

    #[test]
    fn toggle_requires_a_resolved_preview() {
        let mut card = CardRecord::from_entry(entry("a", "One", "assets/models/one.jpg"));
        card.toggle_preview();
        assert!(!card.showing_preview);
        assert_eq!(card.display_image(), "assets/models/one.jpg");

        card.set_preview("assets/gifs/one.gif".to_string());
        card.toggle_preview();
        assert!(card.showing_preview);
        assert_eq!(card.display_image(), "assets/gifs/one.gif");
        card.toggle_preview();
        assert_eq!(card.display_image(), "assets/models/one.jpg");
    }

    #[test]
    fn display_paths_stay_literal_for_resolved_previews() {
        let mut card = CardRecord::from_entry(entry("a", "One", r"assets\models\set [1].jpg"));
        assert_eq!(card.display_image(), "assets/models/set [1].jpg");

        // Probing matched a file literally named with escapes in it; the
        // display path must be that exact name, not its decoded form.
        card.set_preview("assets/gifs/set%20%5B1%5D.gif".to_string());
        card.toggle_preview();
        assert_eq!(card.display_image(), "assets/gifs/set%20%5B1%5D.gif");

        card.toggle_preview();
        assert_eq!(card.display_image(), "assets/models/set [1].jpg");
    }

    #[test]
    fn filter_matches_name_substring_case_insensitively() {
        let cards = CardCollection::from_manifest(vec![
            entry("a", "Summer Set", "a.jpg"),
            entry("b", "Winter", "b.jpg"),
        ]);
        let hits: Vec<_> = cards.filtered("  SUMM ").map(|c| c.id.as_str()).collect();
        assert_eq!(hits, vec!["a"]);
        assert_eq!(cards.filtered("").count(), 2);
    }
}
