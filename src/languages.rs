//! Supported translation languages
//!
//! Every entry carries a home-language term (Swedish) plus translations
//! keyed by the short codes below. The order of `LANGUAGE_ORDER` is the
//! column order of the CSV exchange format.

/// Speech tag used for the home-language side of a card
pub const HOME_SPEECH_TAG: &str = "sv-SE";

/// Display name of the home language
pub const HOME_LANGUAGE_NAME: &str = "Swedish";

/// Fallback translation language when settings name an unknown code
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub native_name: &'static str,
    pub english_name: &'static str,
    pub speech_tag: &'static str,
}

pub const LANGUAGES: &[Language] = &[
    Language { code: "en", native_name: "English", english_name: "English", speech_tag: "en-US" },
    Language { code: "es", native_name: "Español", english_name: "Spanish", speech_tag: "es-ES" },
    Language { code: "fa", native_name: "فارسی", english_name: "Farsi", speech_tag: "fa-IR" },
    Language { code: "el", native_name: "Ελληνικά", english_name: "Greek", speech_tag: "el-GR" },
    Language { code: "uk", native_name: "Українська", english_name: "Ukrainian", speech_tag: "uk-UA" },
    Language { code: "ru", native_name: "Русский", english_name: "Russian", speech_tag: "ru-RU" },
    Language { code: "hi", native_name: "हिन्दी", english_name: "Hindi", speech_tag: "hi-IN" },
    Language { code: "bn", native_name: "বাংলা", english_name: "Bengali", speech_tag: "bn-IN" },
    Language { code: "sq", native_name: "Shqip", english_name: "Albanian", speech_tag: "sq-AL" },
    Language { code: "tr", native_name: "Türkçe", english_name: "Turkish", speech_tag: "tr-TR" },
    Language { code: "ms", native_name: "Bahasa Melayu", english_name: "Malay", speech_tag: "ms-MY" },
    Language { code: "fil", native_name: "Filipino", english_name: "Filipino", speech_tag: "fil-PH" },
];

/// Language codes in canonical (CSV column) order
pub fn language_order() -> impl Iterator<Item = &'static str> {
    LANGUAGES.iter().map(|l| l.code)
}

/// Look up a language by code
pub fn find_language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

/// Look up a language, falling back to English for unknown codes
pub fn language_or_default(code: &str) -> &'static Language {
    find_language(code).unwrap_or(&LANGUAGES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_matches_table() {
        let codes: Vec<&str> = language_order().collect();
        assert_eq!(codes.len(), 12);
        assert_eq!(codes[0], "en");
        assert_eq!(codes[11], "fil");
    }

    #[test]
    fn test_unknown_language_falls_back() {
        assert!(find_language("xx").is_none());
        assert_eq!(language_or_default("xx").code, DEFAULT_LANGUAGE);
        assert_eq!(language_or_default("tr").speech_tag, "tr-TR");
    }
}
