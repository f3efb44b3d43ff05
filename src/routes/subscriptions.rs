use axum::{extract::Form, Extension};
use eyre::{eyre, WrapErr};

use crate::{
    config::Tables,
    domain::{ColumnLayout, NewSubscriber, SubscriberEmail, SubscriberName, FALLBACK_LAYOUTS},
    record_store::{formula, Query, Record, RecordStore},
    Error,
};

const SUBSCRIBED: &str = "Thank you for subscribing!";
const ALREADY_SUBSCRIBED: &str = "You are already subscribed!";
const SUBSCRIBE_FAILED: &str = "Unable to subscribe. Please try again or contact us directly.";

#[derive(serde::Deserialize)]
pub(crate) struct Subscription {
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: Option<String>,
}

#[tracing::instrument(skip_all)]
pub(crate) async fn subscribe(
    Extension(store): Extension<RecordStore>,
    Extension(tables): Extension<Tables>,
    Form(form): Form<Subscription>,
) -> Result<&'static str, Error> {
    let email = SubscriberEmail::parse(&form.email)?;
    let name = SubscriberName::parse_optional(form.name)?;
    let subscriber =
        NewSubscriber::new(email, name).wrap_err("failed to timestamp the subscription")?;

    if is_subscribed(&store, &tables.subscribers, &subscriber.email).await {
        return Err(Error::Conflict(ALREADY_SUBSCRIBED));
    }

    insert_subscriber(&store, &tables.subscribers, &subscriber)
        .await
        .map_err(|report| Error::upstream(SUBSCRIBE_FAILED, report))?;

    Ok(SUBSCRIBED)
}

/// Best-effort duplicate check. The store has no uniqueness constraint, so concurrent sign-ups
/// with the same address can still both be written.
#[tracing::instrument(skip_all)]
async fn is_subscribed(store: &RecordStore, table: &str, email: &SubscriberEmail) -> bool {
    let query = Query::filter(formula::field_equals("Email", email.as_ref()));
    match store.first_page(table, &query).await {
        Ok(records) => !records.is_empty(),
        Err(error) => {
            tracing::warn!(%error, "duplicate subscriber check failed, continuing");
            false
        }
    }
}

/// Creates the subscriber record, trying the detected column layout first and then each
/// fallback layout until the store accepts one.
#[tracing::instrument(skip_all)]
async fn insert_subscriber(
    store: &RecordStore,
    table: &str,
    subscriber: &NewSubscriber,
) -> Result<Record, eyre::Report> {
    let mut layouts = Vec::with_capacity(FALLBACK_LAYOUTS.len() + 1);
    if let Some(detected) = detect_layout(store, table).await {
        layouts.push(detected);
    }
    for layout in FALLBACK_LAYOUTS.iter() {
        if !layouts.contains(layout) {
            layouts.push(layout.clone());
        }
    }

    let mut last_error = None;
    for layout in &layouts {
        match store.create(table, &layout.fields(subscriber)).await {
            Ok(record) => {
                tracing::info!(record_id = %record.id, %layout, "created subscriber");
                return Ok(record);
            }
            Err(error) => {
                tracing::warn!(%layout, %error, "record store rejected subscriber layout");
                last_error = Some(error);
            }
        }
    }

    Err(match last_error {
        Some(error) => eyre::Report::new(error).wrap_err(format!(
            "all {} subscriber column layouts were rejected",
            layouts.len()
        )),
        None => eyre!("no subscriber column layouts to try"),
    })
}

#[tracing::instrument(skip_all)]
async fn detect_layout(store: &RecordStore, table: &str) -> Option<ColumnLayout> {
    let records = match store.first_page(table, &Query::max_records(1)).await {
        Ok(records) => records,
        Err(error) => {
            tracing::warn!(%error, "could not read a sample subscriber row");
            return None;
        }
    };
    let sample = records.first()?;

    let layout = ColumnLayout::detect(sample.fields.keys().map(String::as_str));
    match &layout {
        Some(layout) => tracing::debug!(%layout, "detected subscriber columns"),
        None => tracing::debug!(
            columns = ?sample.fields.keys().collect::<Vec<_>>(),
            "sample row has no email column"
        ),
    }
    layout
}
