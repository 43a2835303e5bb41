//! Locale-aware text ordering for sort keys.

use std::cmp::Ordering;
use std::fmt;

use icu::collator::{Collator, CollatorBorrowed};
use icu::locale::Locale;
use tracing::warn;

pub const DEFAULT_LOCALE: &str = "en-US";

/// Compares text by the collation rules of a locale, so accented letters
/// sort next to their base letter instead of after `z`.
pub struct TextCollator {
    locale: String,
    collator: Option<CollatorBorrowed<'static>>,
}

impl TextCollator {
    /// Builds a collator for a BCP 47 tag; an unparsable or unsupported tag
    /// falls back to the default locale.
    pub fn new(locale: &str) -> Self {
        let parsed = match locale.trim().parse::<Locale>() {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(locale, %err, "invalid locale, using {DEFAULT_LOCALE}");
                return Self::fallback();
            }
        };
        match Collator::try_new(parsed.into(), Default::default()) {
            Ok(collator) => Self {
                locale: locale.trim().to_string(),
                collator: Some(collator),
            },
            Err(err) => {
                warn!(locale, %err, "no collation data, using {DEFAULT_LOCALE}");
                Self::fallback()
            }
        }
    }

    fn fallback() -> Self {
        let collator = DEFAULT_LOCALE
            .parse::<Locale>()
            .ok()
            .and_then(|locale| Collator::try_new(locale.into(), Default::default()).ok());
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            collator,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(left, right),
            None => left.cmp(right),
        }
    }
}

impl Default for TextCollator {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl fmt::Debug for TextCollator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextCollator")
            .field("locale", &self.locale)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accented_letters_sort_with_their_base_letter() {
        let collator = TextCollator::default();
        let mut names = vec!["zed inc", "éclair studio", "acme"];
        names.sort_by(|a, b| collator.compare(a, b));
        assert_eq!(names, vec!["acme", "éclair studio", "zed inc"]);
    }

    #[test]
    fn invalid_locale_falls_back_to_default() {
        let collator = TextCollator::new("not a locale!");
        assert_eq!(collator.locale(), DEFAULT_LOCALE);
        assert_eq!(collator.compare("a", "b"), Ordering::Less);
    }

    #[test]
    fn explicit_locale_is_kept() {
        let collator = TextCollator::new("de-DE");
        assert_eq!(collator.locale(), "de-DE");
        assert_eq!(collator.compare("äpfel", "birne"), Ordering::Less);
    }
}
