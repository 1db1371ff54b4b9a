//! Text normalization for name-based matching
//!
//! Canonicalizes free-text track and artist names so the same song spelled
//! "Café (feat. Él)" on one side and "CAFE" on the other compares equal.
//! Pure and deterministic; the merger applies it identically to both sides
//! of a name join.
//!
//! **Steps (in order):**
//! 1. Absent input becomes the empty string
//! 2. Lowercase
//! 3. Unicode compatibility decomposition (NFKD), combining marks dropped
//! 4. Featured-artist removal: any parenthesized group starting with
//!    "feat", and anything from a literal "feat" marker to the end
//! 5. Keep only `[a-z0-9 ]`
//! 6. Collapse whitespace and trim
//!
//! The trailing marker is matched as a plain substring, not a word, so a
//! title that itself contains "feat" is cut there too ("Defeated" becomes
//! "de"). Both sides of a name join go through the same cut, and the
//! output never contains "feat".
//!
//! Step 5 can fuse a new "feat" out of punctuation ("fe-at x"), so the
//! trailing removal runs once more on the cleaned text. That keeps
//! `normalize(normalize(x)) == normalize(x)` for every input.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// "(feat. Someone)", "( featuring X )"
static PAREN_FEAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*feat[^)]*\)").expect("valid parenthesized feat pattern"));

/// "feat. Someone" up to the end of the string
static TRAILING_FEAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"feat.*$").expect("valid trailing feat pattern"));

/// Normalize a name for matching
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = strip_accents(&lowered);
    let without_feat = remove_featured(&stripped);
    let cleaned = collapse_whitespace(&keep_match_chars(&without_feat));

    if TRAILING_FEAT.is_match(&cleaned) {
        collapse_whitespace(&TRAILING_FEAT.replace(&cleaned, ""))
    } else {
        cleaned
    }
}

/// Normalize an optional name; absent names normalize to ""
pub fn normalize_opt(text: Option<&str>) -> String {
    normalize(text.unwrap_or_default())
}

fn strip_accents(s: &str) -> String {
    s.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

fn remove_featured(s: &str) -> String {
    let s = PAREN_FEAT.replace_all(s, " ");
    TRAILING_FEAT.replace(&s, "").into_owned()
}

fn keep_match_chars(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
