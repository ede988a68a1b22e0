//! ASCII / Devanagari digit-glyph transliteration.
//!
//! A static glyph mapping with no calendar involvement: `0`-`9` map to
//! `०`-`९` (U+0966..U+096F) and back, everything else passes through
//! unchanged.

const fn devanagari_digit(c: char) -> Option<char> {
    match c {
        '0' => Some('०'),
        '1' => Some('१'),
        '2' => Some('२'),
        '3' => Some('३'),
        '4' => Some('४'),
        '5' => Some('५'),
        '6' => Some('६'),
        '7' => Some('७'),
        '8' => Some('८'),
        '9' => Some('९'),
        _ => None,
    }
}

const fn ascii_digit(c: char) -> Option<char> {
    match c {
        '०' => Some('0'),
        '१' => Some('1'),
        '२' => Some('2'),
        '३' => Some('3'),
        '४' => Some('4'),
        '५' => Some('5'),
        '६' => Some('6'),
        '७' => Some('7'),
        '८' => Some('8'),
        '९' => Some('9'),
        _ => None,
    }
}

/// Replaces every ASCII digit with its Devanagari glyph; other characters
/// pass through unchanged.
pub fn to_devanagari(input: &str) -> String {
    input
        .chars()
        .map(|c| devanagari_digit(c).unwrap_or(c))
        .collect()
}

/// Replaces every Devanagari digit with its ASCII glyph; other characters
/// pass through unchanged.
pub fn to_ascii(input: &str) -> String {
    input.chars().map(|c| ascii_digit(c).unwrap_or(c)).collect()
}

/// True iff every character of `text` is a Devanagari digit.
/// The empty string vacuously qualifies.
pub fn is_devanagari_digits(text: &str) -> bool {
    text.chars().all(|c| ascii_digit(c).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_devanagari_digits_only() {
        assert_eq!(to_devanagari("0123456789"), "०१२३४५६७८९");
    }

    #[test]
    fn to_devanagari_passes_other_chars_through() {
        assert_eq!(to_devanagari("2078-09-01"), "२०७८-०९-०१");
        assert_eq!(to_devanagari("ward 4, Pokhara"), "ward ४, Pokhara");
    }

    #[test]
    fn to_ascii_digits_only() {
        assert_eq!(to_ascii("०१२३४५६७८९"), "0123456789");
    }

    #[test]
    fn to_ascii_passes_other_chars_through() {
        assert_eq!(to_ascii("२०७८-०९-०१"), "2078-09-01");
    }

    #[test]
    fn transliteration_round_trips() {
        let iso = "2078-09-01";
        assert_eq!(to_ascii(&to_devanagari(iso)), iso);
    }

    #[test]
    fn is_devanagari_digits_predicate() {
        assert!(is_devanagari_digits("२०७८"));
        assert!(!is_devanagari_digits("2078"));
        assert!(!is_devanagari_digits("२०७८-"));
    }

    #[test]
    fn is_devanagari_digits_empty_string() {
        assert!(is_devanagari_digits(""));
    }
}
