// WHY: Registry names and user input mix accented Latin, ligatures and full-width forms;
// matching only works once both sides are folded onto the same lowercase ASCII alphabet

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Letters that are distinct code points rather than base + accent, so NFKD leaves them alone
fn fold_special(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'ß' => "ss",
        'ẞ' => "SS",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        'ø' => "o",
        'Ø' => "O",
        'ł' => "l",
        'Ł' => "L",
        'đ' => "d",
        'Đ' => "D",
        'ð' => "d",
        'Ð' => "D",
        'þ' => "th",
        'Þ' => "TH",
        'ı' => "i",
        '\u{2018}' | '\u{2019}' | '\u{02BC}' => "'",
        '\u{201C}' | '\u{201D}' => "\"",
        '\u{2013}' | '\u{2014}' => "-",
        _ => return None,
    };
    Some(folded)
}

/// Transliterate to ASCII and lowercase
///
/// Non-ASCII whitespace becomes a plain space; characters with no ASCII
/// rendition are dropped.
pub fn to_ascii_lower(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for ch in text.nfkd() {
        if ch.is_ascii() {
            result.push(ch.to_ascii_lowercase());
        } else if is_combining_mark(ch) {
            continue;
        } else if let Some(folded) = fold_special(ch) {
            result.push_str(&folded.to_ascii_lowercase());
        } else if ch.is_whitespace() {
            result.push(' ');
        }
    }

    result
}
