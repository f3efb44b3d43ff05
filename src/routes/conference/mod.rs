use axum::{extract::Form, response::Html, Extension, Json};
use eyre::WrapErr;

use crate::{
    config::Tables,
    domain::{
        self, optional_text, NewRegistration, ScheduleItem, SponsorInquiry, SponsorTier,
        SubscriberEmail, SubscriberName, SPONSOR_TIERS,
    },
    record_store::{Query, RecordStore},
    Error,
};

const REGISTERED: &str = "Thank you for registering! We will send you confirmation details shortly.";
const REGISTRATION_FAILED: &str = "Unable to complete registration. Please try again.";
const INQUIRY_RECEIVED: &str = "Thank you! We will contact you soon about sponsorship opportunities.";
const INQUIRY_FAILED: &str = "Unable to send your inquiry. Please try again later.";

const MAX_PHONE_LEN: usize = 32;
const MAX_JOB_TITLE_LEN: usize = 128;

#[tracing::instrument(skip_all)]
pub(crate) async fn conference() -> Html<&'static str> {
    Html(include_str!("index.html"))
}

#[tracing::instrument(skip_all)]
pub(crate) async fn schedule(
    Extension(store): Extension<RecordStore>,
    Extension(tables): Extension<Tables>,
) -> Json<Vec<ScheduleItem>> {
    let query = Query::default().sorted_by("Time");
    match store.select(&tables.schedule, &query).await {
        Ok(records) => Json(records.iter().filter_map(ScheduleItem::from_record).collect()),
        Err(error) => {
            tracing::warn!(%error, "failed to load the conference schedule");
            Json(Vec::new())
        }
    }
}

#[derive(serde::Deserialize)]
pub(crate) struct Registration {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    job_title: Option<String>,
}

impl TryFrom<Registration> for NewRegistration {
    type Error = domain::Error;

    fn try_from(value: Registration) -> Result<Self, Self::Error> {
        Ok(NewRegistration {
            name: SubscriberName::parse(&value.name)?,
            email: SubscriberEmail::parse(&value.email)?,
            phone: optional_text("phone", value.phone, MAX_PHONE_LEN)?,
            job_title: optional_text("job title", value.job_title, MAX_JOB_TITLE_LEN)?,
        })
    }
}

#[tracing::instrument(skip_all)]
pub(crate) async fn register(
    Extension(store): Extension<RecordStore>,
    Extension(tables): Extension<Tables>,
    Form(form): Form<Registration>,
) -> Result<&'static str, Error> {
    let registration: NewRegistration = form.try_into()?;
    let registered_at = domain::now_rfc3339().wrap_err("failed to timestamp the registration")?;

    let record = store
        .create(&tables.registrations, &registration.fields(&registered_at))
        .await
        .wrap_err("failed to store the conference registration")
        .map_err(|report| Error::upstream(REGISTRATION_FAILED, report))?;
    tracing::info!(record_id = %record.id, "registered conference attendee");

    Ok(REGISTERED)
}

#[tracing::instrument(skip_all)]
pub(crate) async fn sponsor_tiers() -> Json<&'static [SponsorTier]> {
    Json(&SPONSOR_TIERS[..])
}

#[derive(serde::Deserialize)]
pub(crate) struct Inquiry {
    #[serde(default)]
    email: String,
    #[serde(default)]
    tier: Option<String>,
}

#[tracing::instrument(skip_all)]
pub(crate) async fn sponsor_inquiry(
    Extension(store): Extension<RecordStore>,
    Extension(tables): Extension<Tables>,
    Form(form): Form<Inquiry>,
) -> Result<&'static str, Error> {
    let inquiry = SponsorInquiry::parse(&form.email, form.tier.as_deref())?;
    let submitted_at = domain::now_rfc3339().wrap_err("failed to timestamp the inquiry")?;

    let record = store
        .create(&tables.sponsors, &inquiry.fields(&submitted_at))
        .await
        .wrap_err("failed to store the sponsorship inquiry")
        .map_err(|report| Error::upstream(INQUIRY_FAILED, report))?;
    tracing::info!(
        record_id = %record.id,
        tier = inquiry.tier.map(|tier| tier.name).unwrap_or("unspecified"),
        "received sponsorship inquiry"
    );

    Ok(INQUIRY_RECEIVED)
}
