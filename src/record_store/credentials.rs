use std::fmt;

const MISSING_TOKEN: &str = "missing_auth_token";

/// How requests to the record store are authenticated.
///
/// Personal access tokens take precedence over legacy API keys. Both travel as a bearer token.
#[derive(Clone)]
pub enum Credentials {
    AccessToken(String),
    ApiKey(String),
    Missing,
}

impl Credentials {
    pub fn from_parts(access_token: Option<String>, api_key: Option<String>) -> Self {
        match (access_token, api_key) {
            (Some(token), _) => Self::AccessToken(token),
            (None, Some(key)) => Self::ApiKey(key),
            (None, None) => Self::Missing,
        }
    }

    pub(crate) fn token(&self) -> &str {
        match self {
            Self::AccessToken(token) | Self::ApiKey(token) => token,
            Self::Missing => MISSING_TOKEN,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::AccessToken(_) => "personal access token",
            Self::ApiKey(_) => "legacy api key",
            Self::Missing => "none",
        }
    }

    /// The first four characters of the secret, enough to tell tokens apart in diagnostics.
    pub(crate) fn hint(&self) -> Option<String> {
        match self {
            Self::AccessToken(token) | Self::ApiKey(token) => {
                Some(format!("{}...", token.chars().take(4).collect::<String>()))
            }
            Self::Missing => None,
        }
    }
}

// Keep secrets out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hint() {
            Some(hint) => write!(f, "Credentials({}, {})", self.kind(), hint),
            None => write!(f, "Credentials(none)"),
        }
    }
}
