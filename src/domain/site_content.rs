use std::collections::BTreeMap;

use serde_json::Value;

use crate::record_store::Record;

const KEY_COLUMN: &str = "Content Key";
const VALUE_COLUMN: &str = "Content Value";

const DEFAULTS: [(&str, &str); 6] = [
    ("discord_link", "https://discord.gg/example"),
    ("twitter_link", "https://twitter.com/example"),
    ("linkedin_link", "https://linkedin.com/company/example"),
    ("github_link", "https://github.com/example"),
    ("privacy_policy", "This is a fallback privacy policy."),
    ("terms_of_service", "These are fallback terms of service."),
];

/// Key/value content for the page chrome: social links and legal text.
#[derive(Clone, Debug, Default, serde::Serialize)]
#[serde(transparent)]
pub(crate) struct SiteContent(BTreeMap<String, String>);

impl SiteContent {
    pub(crate) fn defaults() -> Self {
        Self(
            DEFAULTS
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    /// Folds rows of the content table over the defaults. Rows without a key are skipped; later
    /// rows win over earlier ones.
    pub(crate) fn from_records(records: &[Record]) -> Self {
        let mut content = Self::defaults();
        for record in records {
            let key = match record.text(KEY_COLUMN) {
                Some(key) => key.trim(),
                None => continue,
            };
            let value = match record.fields.get(VALUE_COLUMN) {
                Some(Value::String(value)) => value.clone(),
                Some(Value::Number(value)) => value.to_string(),
                Some(Value::Bool(value)) => value.to_string(),
                _ => continue,
            };
            content.0.insert(key.to_string(), value);
        }
        content
    }

    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}
