use unicode_segmentation::UnicodeSegmentation;

use super::Error;

const MAX_GRAPHEMES: usize = 256;
const FORBIDDEN_CHARACTERS: [char; 9] = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];

#[derive(Clone, Debug)]
pub(crate) struct SubscriberName(String);

impl SubscriberName {
    pub(crate) fn parse(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref().trim();

        if s.is_empty() {
            return Err(Error("a name is required".to_string()));
        }
        if s.graphemes(true).count() > MAX_GRAPHEMES {
            return Err(Error(format!(
                "names are limited to {} characters",
                MAX_GRAPHEMES
            )));
        }
        if s.chars().any(|c| FORBIDDEN_CHARACTERS.contains(&c)) {
            return Err(Error(format!("{} is not a valid name", s)));
        }

        Ok(Self(s.to_string()))
    }

    /// Parses an optional form field, where a blank value means "not given".
    pub(crate) fn parse_optional(s: Option<String>) -> Result<Option<Self>, Error> {
        match s {
            Some(s) if !s.trim().is_empty() => Self::parse(s).map(Some),
            _ => Ok(None),
        }
    }
}

impl AsRef<str> for SubscriberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
