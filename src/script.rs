// SPDX-License-Identifier: MIT
//! Script detection over Unicode range membership

/// Writing scripts the dictionary layer knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Latin,
    Cyrillic,
    Arabic,
    Chinese,
    Japanese,
    Korean,
}

impl Script {
    /// Detect the script of a text by Unicode range membership, tested in
    /// fixed priority order. Latin is the default when nothing matches.
    pub fn detect(text: &str) -> Script {
        const ORDER: [Script; 5] = [
            Script::Cyrillic,
            Script::Arabic,
            Script::Chinese,
            Script::Japanese,
            Script::Korean,
        ];
        for script in ORDER {
            if text.chars().any(|c| script.contains(c)) {
                return script;
            }
        }
        Script::Latin
    }

    /// Resolve an ISO 639-1 style language code to its script.
    /// Unknown codes fall back to Latin.
    pub fn from_language(code: &str) -> Script {
        match code.to_ascii_lowercase().as_str() {
            "ru" | "uk" | "bg" | "sr" => Script::Cyrillic,
            "ar" | "fa" | "ur" => Script::Arabic,
            "zh" => Script::Chinese,
            "ja" => Script::Japanese,
            "ko" => Script::Korean,
            _ => Script::Latin,
        }
    }

    /// Representative language code, used for the embedded dictionary tag
    pub fn language_code(self) -> &'static str {
        match self {
            Script::Latin => "en",
            Script::Cyrillic => "ru",
            Script::Arabic => "ar",
            Script::Chinese => "zh",
            Script::Japanese => "ja",
            Script::Korean => "ko",
        }
    }

    /// Right-to-left scripts are reversed before substitution
    pub fn is_rtl(self) -> bool {
        matches!(self, Script::Arabic)
    }

    /// Whether whole-word contraction entries anchor at word boundaries
    pub fn uses_word_boundaries(self) -> bool {
        matches!(self, Script::Latin | Script::Cyrillic)
    }

    fn contains(self, c: char) -> bool {
        let cp = c as u32;
        match self {
            Script::Latin => c.is_ascii_alphabetic(),
            Script::Cyrillic => (0x0400..=0x04FF).contains(&cp),
            Script::Arabic => (0x0600..=0x06FF).contains(&cp) || (0x0750..=0x077F).contains(&cp),
            Script::Chinese => (0x4E00..=0x9FFF).contains(&cp) || (0x3400..=0x4DBF).contains(&cp),
            Script::Japanese => (0x3040..=0x309F).contains(&cp) || (0x30A0..=0x30FF).contains(&cp),
            Script::Korean => (0xAC00..=0xD7AF).contains(&cp) || (0x1100..=0x11FF).contains(&cp),
        }
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.language_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_priority_order() {
        assert_eq!(Script::detect("привет мир"), Script::Cyrillic);
        assert_eq!(Script::detect("مرحبا"), Script::Arabic);
        assert_eq!(Script::detect("你好"), Script::Chinese);
        assert_eq!(Script::detect("こんにちは"), Script::Japanese);
        assert_eq!(Script::detect("안녕하세요"), Script::Korean);
        assert_eq!(Script::detect("hello"), Script::Latin);
        assert_eq!(Script::detect("1234 !?"), Script::Latin);
    }

    #[test]
    fn test_detect_mixed_text_prefers_priority() {
        // Cyrillic outranks CJK in the fixed order
        assert_eq!(Script::detect("你好 привет"), Script::Cyrillic);
        // Kanji counts as Chinese before kana is considered
        assert_eq!(Script::detect("日本語のテスト"), Script::Chinese);
        assert_eq!(Script::detect("ひらがなのみ"), Script::Japanese);
    }

    #[test]
    fn test_from_language() {
        assert_eq!(Script::from_language("ru"), Script::Cyrillic);
        assert_eq!(Script::from_language("AR"), Script::Arabic);
        assert_eq!(Script::from_language("zh"), Script::Chinese);
        assert_eq!(Script::from_language("en"), Script::Latin);
        assert_eq!(Script::from_language("xx"), Script::Latin);
    }

    #[test]
    fn test_language_code_round_trip() {
        for script in [
            Script::Latin,
            Script::Cyrillic,
            Script::Arabic,
            Script::Chinese,
            Script::Japanese,
            Script::Korean,
        ] {
            assert_eq!(Script::from_language(script.language_code()), script);
        }
    }
}
