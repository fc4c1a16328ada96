//! Input sanitization for user-supplied text.
//!
//! # Responsibility
//! - Strip invisible and rendering-control code points before text is
//!   stored or displayed.
//! - Normalize visually-equivalent encodings to one canonical form.
//!
//! # Invariants
//! - `sanitize` is total, deterministic and idempotent.
//! - Interior whitespace (including newlines and tabs) is preserved.
//! - Normalization is NFC, never NFKC: `™`, `©`, `®` and emoji must
//!   survive unchanged.
//!
//! # See also
//! - docs/architecture/text-hygiene.md

use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

/// Cleans arbitrary user-entered text into a storage-safe string.
///
/// Removes, in one pass over the input:
/// - C0 control characters except `\n` (U+000A) and `\t` (U+0009);
/// - DEL and the C1 range (U+007F..=U+009F);
/// - zero-width characters (U+200B..=U+200D);
/// - bidirectional override/embedding characters (U+202A..=U+202E);
/// - the BOM / zero-width no-break space (U+FEFF).
///
/// The survivors are trimmed of leading/trailing Unicode whitespace and
/// recomposed to Unicode NFC, so that combining-sequence and precomposed
/// spellings of the same text compare equal after sanitization.
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter(|ch| !is_disallowed(*ch))
        .collect::<String>()
        .trim()
        .nfc()
        .collect()
}

/// Sanitizes the content of an untyped JSON value.
///
/// Non-string values (null, numbers, booleans, arrays, objects) fail safe
/// to the empty string. Never errors.
pub fn sanitize_value(value: &Value) -> String {
    match value {
        Value::String(text) => sanitize(text),
        _ => String::new(),
    }
}

fn is_disallowed(ch: char) -> bool {
    match ch {
        '\n' | '\t' => false,
        '\u{0000}'..='\u{001F}' => true,
        '\u{007F}'..='\u{009F}' => true,
        '\u{200B}'..='\u{200D}' => true,
        '\u{202A}'..='\u{202E}' => true,
        '\u{FEFF}' => true,
        _ => false,
    }
}
