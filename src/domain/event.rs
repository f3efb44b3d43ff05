use time::{
    format_description::{well_known::Rfc3339, FormatItem},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime, Time,
};

use crate::record_store::Record;

const DEFAULT_TITLE: &str = "Untitled Event";
const DEFAULT_TIME: &str = "12:00 PM";
const DEFAULT_LOCATION: &str = "TBD";
const DEFAULT_DESCRIPTION: &str = "No description available";

const DATE_ONLY: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const CLOCK_TIME: &[FormatItem<'static>] =
    format_description!("[hour repr:12]:[minute] [period]");

#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Event {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) date: String,
    pub(crate) time: String,
    pub(crate) location: String,
    pub(crate) description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) registration_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) virtual_event: Option<bool>,

    #[serde(skip)]
    starts_at: Option<OffsetDateTime>,
}

impl Event {
    /// Builds an event from a row of the events table, substituting defaults for missing columns.
    pub(crate) fn from_record(record: &Record, now: OffsetDateTime) -> Self {
        let raw_date = record.text("Date");
        let starts_at = raw_date.and_then(parse_date);
        let time = match (raw_date, starts_at) {
            // a bare date carries no time of day
            (Some(raw), Some(starts_at)) if raw.contains('T') => clock_time(starts_at),
            _ => DEFAULT_TIME.to_string(),
        };

        Self {
            id: record.id.clone(),
            title: record.text("Title").unwrap_or(DEFAULT_TITLE).to_string(),
            date: match raw_date {
                Some(raw) => raw.to_string(),
                None => rfc3339(now),
            },
            time,
            location: record.text("Location").unwrap_or(DEFAULT_LOCATION).to_string(),
            description: record
                .text("Description")
                .unwrap_or(DEFAULT_DESCRIPTION)
                .to_string(),
            registration_link: record.text("Registration Link").map(str::to_string),
            virtual_event: record.flag("Virtual Event"),
            starts_at: if raw_date.is_some() { starts_at } else { Some(now) },
        }
    }

    /// Shown in place of the real listing when the store cannot be reached.
    pub(crate) fn fallback(now: OffsetDateTime) -> Self {
        Self {
            id: "fallback1".to_string(),
            title: "Sample Event (Fallback)".to_string(),
            date: rfc3339(now),
            time: "6:00 PM".to_string(),
            location: "Buffalo, NY".to_string(),
            description: "This is a fallback event shown when the record store connection fails."
                .to_string(),
            registration_link: None,
            virtual_event: None,
            starts_at: Some(now),
        }
    }

    /// Orders events by start, earliest first. Events with unparseable dates keep their
    /// relative order at the end.
    pub(crate) fn sort_by_date(events: &mut [Event]) {
        events.sort_by_key(|event| match event.starts_at {
            Some(starts_at) => (0, Some(starts_at)),
            None => (1, None),
        });
    }
}

fn parse_date(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .or_else(|| {
            Date::parse(raw, DATE_ONLY)
                .ok()
                .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc())
        })
}

fn clock_time(at: OffsetDateTime) -> String {
    at.format(CLOCK_TIME)
        .unwrap_or_else(|_| DEFAULT_TIME.to_string())
}

fn rfc3339(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_default()
}
