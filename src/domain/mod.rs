mod conference;
mod event;
mod new_subscriber;
mod site_content;
mod subscriber_columns;
mod subscriber_email;
mod subscriber_name;

use std::fmt;

use time::{format_description::well_known::Rfc3339, OffsetDateTime};

pub(crate) use self::{
    conference::{
        optional_text, NewRegistration, ScheduleItem, SponsorInquiry, SponsorTier, SPONSOR_TIERS,
    },
    event::Event,
    new_subscriber::NewSubscriber,
    site_content::SiteContent,
    subscriber_columns::{ColumnLayout, FALLBACK_LAYOUTS},
    subscriber_name::SubscriberName,
};

pub use self::subscriber_email::SubscriberEmail;

#[derive(Debug)]
pub(crate) struct Error(String);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Error> for crate::Error {
    fn from(error: Error) -> Self {
        Self::Validation(error.to_string())
    }
}

pub(crate) fn now_rfc3339() -> Result<String, time::error::Format> {
    OffsetDateTime::now_utc().format(&Rfc3339)
}
