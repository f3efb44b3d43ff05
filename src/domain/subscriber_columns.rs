//! Mapping subscriber attributes onto the column names of an externally managed table.
//!
//! The subscribers table is edited by hand in the store's UI, so its column names drift
//! (`Email` vs `email` vs `Email Address`). A [`ColumnLayout`] is one guess at those names.

use std::{borrow::Cow, fmt};

use serde_json::Value;

use super::new_subscriber::{NewSubscriber, SIGNUP_SOURCE};
use crate::record_store::Fields;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ColumnLayout {
    pub(crate) email: Cow<'static, str>,
    pub(crate) date: Option<Cow<'static, str>>,
    pub(crate) source: Option<Cow<'static, str>>,
    pub(crate) name: Option<Cow<'static, str>>,
    pub(crate) active: Option<Cow<'static, str>>,
}

const fn layout(
    email: &'static str,
    date: Option<&'static str>,
    source: Option<&'static str>,
    active: Option<&'static str>,
) -> ColumnLayout {
    ColumnLayout {
        email: Cow::Borrowed(email),
        date: match date {
            Some(date) => Some(Cow::Borrowed(date)),
            None => None,
        },
        source: match source {
            Some(source) => Some(Cow::Borrowed(source)),
            None => None,
        },
        name: None,
        active: match active {
            Some(active) => Some(Cow::Borrowed(active)),
            None => None,
        },
    }
}

/// Layouts tried in order when the table's columns could not be detected.
pub(crate) const FALLBACK_LAYOUTS: [ColumnLayout; 5] = [
    layout("Email", Some("Signup Date"), Some("Source"), Some("Active")),
    layout("email", Some("signup date"), Some("source"), Some("active")),
    layout("Email", Some("Date"), Some("Source"), Some("Active")),
    layout("Email", None, None, None),
    layout("email", None, None, None),
];

impl ColumnLayout {
    /// Infers a layout from the columns of an existing row.
    ///
    /// Each attribute takes the first column whose lowercased name contains its keyword. The email
    /// column is mandatory and never doubles as the name column.
    pub(crate) fn detect<'a>(columns: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let columns: Vec<&str> = columns.into_iter().collect();
        let find = |keyword: &str, except: Option<&str>| {
            columns
                .iter()
                .copied()
                .filter(|column| Some(*column) != except)
                .find(|column| column.to_lowercase().contains(keyword))
                .map(|column| Cow::Owned(column.to_string()))
        };

        let email = find("email", None)?;
        let name = find("name", Some(&*email));
        Some(Self {
            date: find("date", None),
            source: find("source", None),
            active: find("active", None),
            name,
            email,
        })
    }

    /// The record fields for `subscriber` under this layout.
    pub(crate) fn fields(&self, subscriber: &NewSubscriber) -> Fields {
        let mut fields = Fields::new();
        fields.insert(
            self.email.to_string(),
            Value::from(subscriber.email.as_ref()),
        );
        if let (Some(column), Some(name)) = (&self.name, &subscriber.name) {
            fields.insert(column.to_string(), Value::from(name.as_ref()));
        }
        if let Some(column) = &self.date {
            fields.insert(
                column.to_string(),
                Value::from(subscriber.signed_up_at.as_str()),
            );
        }
        if let Some(column) = &self.source {
            fields.insert(column.to_string(), Value::from(SIGNUP_SOURCE));
        }
        if let Some(column) = &self.active {
            fields.insert(column.to_string(), Value::Bool(true));
        }
        fields
    }
}

impl fmt::Display for ColumnLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.email)?;
        for column in [&self.name, &self.date, &self.source, &self.active]
            .into_iter()
            .flatten()
        {
            write!(f, ", {}", column)?;
        }
        write!(f, "]")
    }
}
