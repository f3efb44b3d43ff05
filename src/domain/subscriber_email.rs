use super::Error;

/// An email address submitted through one of the site's forms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    /// Surrounding whitespace is dropped before validation, since pasted addresses often carry it.
    pub(crate) fn parse(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref().trim();
        if s.is_empty() {
            return Err(Error("an email address is required".to_string()));
        }
        if validator::validate_email(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(Error(format!("{} is not a valid email", s)))
        }
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SubscriberEmail {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).map_err(|error| error.to_string())
    }
}
