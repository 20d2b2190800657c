/// Animated-preview path resolution
///
/// A card's preview GIF may live under several spellings of the same path:
/// percent-encoded or plain, `.gif` or `.GIF`, `gifs/` or `gif/`, brackets
/// escaped or not. Nobody curates these folders, so instead of trusting one
/// spelling we generate every plausible candidate and probe them in order
/// until one actually loads.

use std::sync::Arc;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::probe::{self, ImageProbe};

/// Directory holding animated previews, relative to the site/assets root.
const PREVIEW_DIR: &str = "assets/gifs";
/// Preview file extension (lower-case canonical form).
const PREVIEW_EXT: &str = "gif";

/// Characters escaped the way `encodeURI` escapes them: everything except
/// alphanumerics, the URI reserved set `;,/?:@&=+$#`, the mark set
/// `-_.!~*'()`, and square brackets (which get their own variant below).
const ENCODE_URI: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'#')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'[')
    .remove(b']');

/// Percent-encode a path, `encodeURI`-style.
pub fn encode_uri(path: &str) -> String {
    utf8_percent_encode(path, ENCODE_URI).to_string()
}

/// Undo percent-encoding. Invalid UTF-8 sequences are replaced rather than
/// rejected; a garbled candidate simply fails its probe.
pub fn decode_uri(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

/// Derive the canonical preview path for a primary image path:
/// query string stripped, directory rewritten to the preview folder,
/// extension replaced, result percent-encoded.
///
/// `"assets/models/My%20Set.jpg"` → `"assets/gifs/My%20Set.gif"`
pub fn preview_candidate(file: &str) -> String {
    if file.is_empty() {
        return String::new();
    }
    let no_query = file.split('?').next().unwrap_or(file);
    let base = no_query.rsplit('/').next().unwrap_or(no_query);
    // Decode before re-encoding so an already-encoded source path does not
    // get double-encoded.
    let decoded = decode_uri(base);
    let stem = match decoded.rfind('.') {
        Some(dot) => &decoded[..dot],
        None => decoded.as_str(),
    };
    encode_uri(&format!("{}/{}.{}", PREVIEW_DIR, stem, PREVIEW_EXT))
}

/// Upper-case-extension sibling (`.gif` → `.GIF`).
fn with_upper_ext(path: &str) -> String {
    let lower_tail = format!(".{}", PREVIEW_EXT);
    if path.to_ascii_lowercase().ends_with(&lower_tail) {
        let cut = path.len() - lower_tail.len();
        format!("{}.{}", &path[..cut], PREVIEW_EXT.to_ascii_uppercase())
    } else {
        path.to_string()
    }
}

/// Singular-folder sibling (`/gifs/` → `/gif/`, first occurrence only).
fn with_singular_dir(path: &str) -> String {
    path.replacen("/gifs/", "/gif/", 1)
}

/// Generate the ordered, deduplicated candidate set for a preview path.
///
/// Three base variants — encoded, decoded, and bracket-escaped encoded —
/// each expanded with the upper-case-extension and singular-folder
/// siblings. Order is first-insertion order and encodes probe priority:
/// encoded spellings first, plural folder before singular.
pub fn resolve_candidates(candidate: &str) -> Vec<String> {
    if candidate.is_empty() {
        return Vec::new();
    }

    let raw = decode_uri(candidate);
    let enc = encode_uri(&raw);
    let bracket = enc.replace('[', "%5B").replace(']', "%5D");

    let mut set: Vec<String> = Vec::with_capacity(12);
    let mut push = |path: String| {
        if !set.contains(&path) {
            set.push(path);
        }
    };

    for base in [enc.as_str(), raw.as_str(), bracket.as_str()] {
        push(base.to_string());
        push(with_upper_ext(base));
        push(with_singular_dir(base));
        push(with_upper_ext(&with_singular_dir(base)));
    }

    set
}

/// Probe candidates strictly in order; the first success wins and the
/// remaining candidates are never attempted. Returns `None` when every
/// candidate fails — the card then keeps its static image, which is a
/// normal outcome, not an error.
///
/// Control returns to the event loop between attempts, so probe chains for
/// different cards interleave freely.
pub async fn resolve(candidates: Vec<String>, probe: Arc<dyn ImageProbe>) -> Option<String> {
    for url in candidates {
        if probe::probe_path(probe.clone(), url.clone()).await {
            return Some(url);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Probe that succeeds only on one configured path and records every
    /// attempt in order.
    struct ScriptedProbe {
        hit: String,
        attempts: Mutex<Vec<String>>,
    }

    impl ImageProbe for ScriptedProbe {
        fn load(&self, path: &str) -> bool {
            self.attempts.lock().unwrap().push(path.to_string());
            path == self.hit
        }
    }

    #[test]
    fn preview_candidate_rewrites_dir_and_extension() {
        assert_eq!(
            preview_candidate("assets/models/My%20Set.jpg"),
            "assets/gifs/My%20Set.gif"
        );
    }

    #[test]
    fn preview_candidate_strips_query_and_handles_bare_names() {
        assert_eq!(
            preview_candidate("photo.png?v=2"),
            "assets/gifs/photo.gif"
        );
        assert_eq!(preview_candidate(""), "");
    }

    #[test]
    fn candidates_collapse_when_variants_coincide() {
        // No spaces or brackets: encoded == decoded == bracket-escaped,
        // leaving only the extension/folder variants.
        let set = resolve_candidates("assets/gifs/foo.gif");
        assert_eq!(
            set,
            vec![
                "assets/gifs/foo.gif",
                "assets/gifs/foo.GIF",
                "assets/gif/foo.gif",
                "assets/gif/foo.GIF",
            ]
        );
    }

    #[test]
    fn candidates_preserve_first_seen_order_and_have_no_duplicates() {
        let set = resolve_candidates("assets/gifs/set%20[1].gif");
        assert_eq!(set.len(), 12);
        // Encoded family first, then decoded, then bracket-escaped.
        assert_eq!(set[0], "assets/gifs/set%20[1].gif");
        assert_eq!(set[1], "assets/gifs/set%20[1].GIF");
        assert_eq!(set[2], "assets/gif/set%20[1].gif");
        assert_eq!(set[4], "assets/gifs/set [1].gif");
        assert_eq!(set[8], "assets/gifs/set%20%5B1%5D.gif");
        for (i, a) in set.iter().enumerate() {
            assert!(!set[i + 1..].contains(a), "duplicate candidate: {}", a);
        }
    }

    #[tokio::test]
    async fn probing_stops_at_first_success() {
        let probe = Arc::new(ScriptedProbe {
            hit: "c".to_string(),
            attempts: Mutex::new(Vec::new()),
        });
        let candidates = vec!["a".into(), "b".into(), "c".into(), "d".into()];

        let shared: Arc<dyn ImageProbe> = probe.clone();
        let resolved = resolve(candidates, shared).await;

        assert_eq!(resolved.as_deref(), Some("c"));
        // "d" must never be attempted.
        assert_eq!(*probe.attempts.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn exhausted_candidates_resolve_to_none() {
        let probe = Arc::new(ScriptedProbe {
            hit: String::new(),
            attempts: Mutex::new(Vec::new()),
        });
        let resolved = resolve(vec!["a".into(), "b".into()], probe).await;
        assert_eq!(resolved, None);
    }
}
