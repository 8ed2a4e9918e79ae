//! Folding of arbitrary text into plain lowercase `a`–`z`.
//!
//! ASCII letters are lowercased, accented Latin letters lose their accents,
//! ligatures are expanded (`æ` becomes `ae`, `ß` becomes `ss`) and every other
//! ASCII character is dropped. Non-ASCII characters without a known mapping
//! are rejected rather than silently discarded.

use std::fmt;
use std::ops::Deref;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizationError {
    #[error("invalid UTF-8 in {text:?}")]
    InvalidUtf8 { text: String },

    #[error("cannot normalize character {ch:?} in {text:?}")]
    Unmappable { ch: char, text: String },
}

/// Text made only of the letters `a`–`z`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainText(String);

impl PlainText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for PlainText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlainText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn normalize(text: &str) -> Result<PlainText, NormalizationError> {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii() {
            if ch.is_ascii_alphabetic() {
                out.push(ch.to_ascii_lowercase());
            }
            continue;
        }
        match fold(ch) {
            Some(folded) => out.push_str(folded),
            None => {
                return Err(NormalizationError::Unmappable {
                    ch,
                    text: text.to_owned(),
                })
            }
        }
    }
    Ok(PlainText(out))
}

/// Like [`normalize`], for raw bytes such as a dictionary line.
pub fn normalize_bytes(bytes: &[u8]) -> Result<PlainText, NormalizationError> {
    let text = std::str::from_utf8(bytes).map_err(|_| NormalizationError::InvalidUtf8 {
        text: String::from_utf8_lossy(bytes).into_owned(),
    })?;
    normalize(text)
}

/// Number of whitespace separated words in `text`.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

fn fold(ch: char) -> Option<&'static str> {
    let folded = match ch {
        // Combining diacritical marks are stripped
        '\u{0300}'..='\u{036F}' => "",

        'À'..='Å' | 'à'..='å' | 'Ā'..='ą' => "a",
        'Æ' | 'æ' => "ae",
        'Ç' | 'ç' | 'Ć'..='č' => "c",
        'Ð' | 'ð' | 'Ď'..='đ' => "d",
        'È'..='Ë' | 'è'..='ë' | 'Ē'..='ě' => "e",
        'Ĝ'..='ģ' => "g",
        'Ĥ'..='ħ' => "h",
        'Ì'..='Ï' | 'ì'..='ï' | 'Ĩ'..='ı' => "i",
        'Ĳ' | 'ĳ' => "ij",
        'Ĵ' | 'ĵ' => "j",
        'Ķ' | 'ķ' | 'ĸ' => "k",
        'Ĺ'..='ł' => "l",
        'Ñ' | 'ñ' | 'Ń'..='ŋ' => "n",
        'Ò'..='Ö' | 'Ø' | 'ò'..='ö' | 'ø' | 'Ō'..='ő' => "o",
        'Œ' | 'œ' => "oe",
        'Ŕ'..='ř' => "r",
        'Ś'..='š' | 'Ș' | 'ș' => "s",
        'ß' => "ss",
        'Ţ'..='ŧ' | 'Ț' | 'ț' => "t",
        'Þ' | 'þ' => "th",
        'Ù'..='Ü' | 'ù'..='ü' | 'Ũ'..='ų' => "u",
        'Ŵ' | 'ŵ' => "w",
        'Ý' | 'ý' | 'ÿ' | 'Ŷ'..='Ÿ' => "y",
        'Ź'..='ž' => "z",
        'ſ' => "s",
        'ﬀ' => "ff",
        'ﬁ' => "fi",
        'ﬂ' => "fl",
        'ﬃ' => "ffi",
        'ﬄ' => "ffl",
        'ﬅ' | 'ﬆ' => "st",
        // Typographic punctuation and spacing carry no letters
        '\u{00A0}' | '\u{2010}'..='\u{2015}' | '\u{2018}'..='\u{201F}' | '\u{2026}' => "",
        '«' | '»' | '·' | '×' | '÷' => "",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_and_lowercases_ascii() {
        assert_eq!(normalize("Uncle Pear!").unwrap().as_str(), "unclepear");
        assert_eq!(normalize("it's 42").unwrap().as_str(), "its");
        assert_eq!(normalize("").unwrap().as_str(), "");
        assert_eq!(normalize("  --  ").unwrap().as_str(), "");
    }

    #[test]
    fn folds_accents_and_ligatures() {
        assert_eq!(normalize("per-ché Æßœ çñ ü").unwrap().as_str(), "percheaessoecnu");
        assert_eq!(normalize("dësmentia").unwrap().as_str(), "desmentia");
        assert_eq!(normalize("Ștefan Țara").unwrap().as_str(), "stefantara");
        assert_eq!(normalize("Łódź").unwrap().as_str(), "lodz");
    }

    #[test]
    fn strips_combining_marks() {
        assert_eq!(normalize("e\u{0301}te\u{0301}").unwrap().as_str(), "ete");
    }

    #[test]
    fn rejects_unknown_characters() {
        let err = normalize("日本").unwrap_err();
        assert_eq!(
            err,
            NormalizationError::Unmappable { ch: '日', text: "日本".to_owned() }
        );
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = normalize_bytes(b"ab\xffc").unwrap_err();
        assert!(matches!(err, NormalizationError::InvalidUtf8 { .. }));
        assert_eq!(normalize_bytes("Café".as_bytes()).unwrap().as_str(), "cafe");
    }

    #[test]
    fn counts_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("art"), 1);
        assert_eq!(count_words("  uncle   pear "), 2);
    }
}
