//! Text with language alternatives and BCP47 tag validation.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{HmsaError, Result};

/// ISO 639-1 two-letter language codes.
const ISO_639_1: &[&str] = &[
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az", "ba", "be", "bg",
    "bh", "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch", "co", "cr", "cs", "cu", "cv",
    "cy", "da", "de", "dv", "dz", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi",
    "fj", "fo", "fr", "fy", "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr",
    "ht", "hu", "hy", "hz", "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu", "ja",
    "jv", "ka", "kg", "ki", "kj", "kk", "kl", "km", "kn", "ko", "kr", "ks", "ku", "kv", "kw",
    "ky", "la", "lb", "lg", "li", "ln", "lo", "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml",
    "mn", "mr", "ms", "mt", "my", "na", "nb", "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv",
    "ny", "oc", "oj", "om", "or", "os", "pa", "pi", "pl", "ps", "pt", "qu", "rm", "rn", "ro",
    "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk", "sl", "sm", "sn", "so", "sq", "sr",
    "ss", "st", "su", "sv", "sw", "ta", "te", "tg", "th", "ti", "tk", "tl", "tn", "to", "tr",
    "ts", "tt", "tw", "ty", "ug", "uk", "ur", "uz", "ve", "vi", "vo", "wa", "wo", "xh", "yi",
    "yo", "za", "zh", "zu",
];

/// ISO 3166-1 alpha-2 region codes.
const ISO_3166_1: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX",
    "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ",
    "BR", "BS", "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK",
    "CL", "CM", "CN", "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM",
    "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR",
    "GA", "GB", "GD", "GE", "GF", "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS",
    "GT", "GU", "GW", "GY", "HK", "HM", "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN",
    "IO", "IQ", "IR", "IS", "IT", "JE", "JM", "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN",
    "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK", "LR", "LS", "LT", "LU", "LV",
    "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK", "ML", "MM", "MN", "MO", "MP", "MQ",
    "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA", "NC", "NE", "NF", "NG", "NI",
    "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM",
    "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW", "SA", "SB", "SC",
    "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS", "ST", "SV",
    "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO", "TR",
    "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

/// Validate a `ll` or `ll-RR` language tag and return its canonical casing.
pub fn validate_language_tag(tag: &str) -> Result<String> {
    let invalid = || HmsaError::validation(format!("Invalid language tag: {:?}", tag));
    let mut parts = tag.split('-');

    let language = parts.next().ok_or_else(invalid)?.to_ascii_lowercase();
    if !ISO_639_1.contains(&language.as_str()) {
        return Err(invalid());
    }

    let region = match parts.next() {
        Some(region) => {
            let region = region.to_ascii_uppercase();
            if !ISO_3166_1.contains(&region.as_str()) {
                return Err(invalid());
            }
            Some(region)
        }
        None => None,
    };

    if parts.next().is_some() {
        return Err(invalid());
    }

    Ok(match region {
        Some(region) => format!("{}-{}", language, region),
        None => language,
    })
}

/// A text value with alternative spellings keyed by language tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LangStr {
    text: String,
    alternatives: BTreeMap<String, String>,
}

impl LangStr {
    /// Text without alternatives.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            alternatives: BTreeMap::new(),
        }
    }

    /// Add an alternative in another language.
    pub fn with_alternative(mut self, language: &str, text: impl Into<String>) -> Result<Self> {
        self.set_alternative(language, text)?;
        Ok(self)
    }

    /// Set the alternative for `language`, validating the tag.
    pub fn set_alternative(&mut self, language: &str, text: impl Into<String>) -> Result<()> {
        let language = validate_language_tag(language)?;
        self.alternatives.insert(language, text.into());
        Ok(())
    }

    /// Primary text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Alternatives keyed by canonical language tag.
    pub fn alternatives(&self) -> &BTreeMap<String, String> {
        &self.alternatives
    }

    /// Alternative for a language tag.
    pub fn alternative(&self, language: &str) -> Option<&str> {
        let language = validate_language_tag(language).ok()?;
        self.alternatives.get(&language).map(String::as_str)
    }
}

impl fmt::Display for LangStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for LangStr {
    fn from(text: &str) -> Self {
        LangStr::new(text)
    }
}

impl From<String> for LangStr {
    fn from(text: String) -> Self {
        LangStr::new(text)
    }
}

impl PartialEq<str> for LangStr {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for LangStr {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_tags() {
        assert_eq!(validate_language_tag("ja").unwrap(), "ja");
        assert_eq!(validate_language_tag("en-us").unwrap(), "en-US");
        assert_eq!(validate_language_tag("FR-CA").unwrap(), "fr-CA");
        assert!(validate_language_tag("").is_err());
        assert!(validate_language_tag("xx").is_err());
        assert!(validate_language_tag("en-XX").is_err());
        assert!(validate_language_tag("en-US-x").is_err());
    }

    #[test]
    fn test_langstr_alternatives() {
        let author = LangStr::new("Philippe Pinard")
            .with_alternative("ja", "フィリップ ピナード")
            .unwrap();
        assert_eq!(author, "Philippe Pinard");
        assert_eq!(author.alternative("ja"), Some("フィリップ ピナード"));
        assert_eq!(author.alternative("de"), None);

        assert!(LangStr::new("x").with_alternative("zz", "y").is_err());
    }
}
