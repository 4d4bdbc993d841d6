use regex::Regex;
use std::{fmt, sync::LazyLock};

/// Longitud máxima de una query normalizada, en caracteres
pub const MAX_QUERY_LENGTH: usize = 128;

static DIRECT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?((www|m)\.)?(youtube\.com|youtu\.be)/.+$")
        .expect("direct link pattern is valid")
});

/// Query canónica: cache key y entrada del resolver a la vez.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedQuery(String);

impl NormalizedQuery {
    /// Trims, lowercases and caps the input at `max_len` characters.
    ///
    /// Whitespace exposed by the cut is trimmed too, so normalizing twice gives
    /// the same string.
    pub fn new(input: &str, max_len: usize) -> Self {
        let lowered = input.trim().to_lowercase();
        let truncated = match lowered.char_indices().nth(max_len) {
            Some((cut, _)) => &lowered[..cut],
            None => lowered.as_str(),
        };
        Self(truncated.trim_end().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> QueryKind {
        QueryKind::classify(&self.0)
    }
}

impl fmt::Display for NormalizedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cómo se resuelve una query en un miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Enlace directo, se resuelve sin búsqueda
    DirectLink,
    /// Texto libre: búsqueda y luego fetch del mejor candidato
    FreeText,
}

impl QueryKind {
    pub fn classify(query: &str) -> Self {
        if DIRECT_LINK.is_match(query) {
            Self::DirectLink
        } else {
            Self::FreeText
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn normalize(input: &str) -> String {
        NormalizedQuery::new(input, MAX_QUERY_LENGTH).as_str().to_string()
    }

    #[test]
    fn test_trims_and_lowercases() {
        assert_eq!(normalize(" Never Gonna Give You Up "), "never gonna give you up");
        assert_eq!(normalize("\tHELLO\n"), "hello");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_truncates_to_max_chars() {
        let long = "a".repeat(200);
        assert_eq!(normalize(&long).chars().count(), MAX_QUERY_LENGTH);

        // Caracteres multibyte cuentan como uno
        let accented = "é".repeat(200);
        assert_eq!(normalize(&accented), "é".repeat(MAX_QUERY_LENGTH));
    }

    #[test]
    fn test_trailing_space_at_cut_is_trimmed() {
        let input = format!("{} tail", "a".repeat(MAX_QUERY_LENGTH - 1));
        let once = normalize(&input);
        assert_eq!(once, "a".repeat(MAX_QUERY_LENGTH - 1));
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_shared_prefix_collides() {
        let prefix = "x".repeat(MAX_QUERY_LENGTH);
        assert_eq!(
            normalize(&format!("{prefix}first tail")),
            normalize(&format!("{prefix}SECOND tail"))
        );
    }

    #[test]
    fn test_classify_direct_links() {
        for query in [
            "https://youtube.com/watch?v=abc123",
            "https://www.youtube.com/watch?v=dqw4w9wgxcq",
            "http://m.youtube.com/watch?v=abc123",
            "https://youtu.be/dqw4w9wgxcq",
            "youtu.be/dqw4w9wgxcq",
            "www.youtube.com/shorts/abc",
        ] {
            assert_eq!(QueryKind::classify(query), QueryKind::DirectLink, "{query}");
        }
    }

    #[test]
    fn test_classify_free_text() {
        for query in [
            "some artist song title",
            "never gonna give you up",
            "youtube.com",
            "https://youtube.com/",
            "https://example.com/watch?v=abc123",
            "music from youtube.com/watch",
        ] {
            assert_eq!(QueryKind::classify(query), QueryKind::FreeText, "{query}");
        }
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(input in "\\PC{0,300}") {
            let once = normalize(&input);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_normalized_length_is_bounded(input in ".{0,400}") {
            prop_assert!(normalize(&input).chars().count() <= MAX_QUERY_LENGTH);
        }
    }
}
