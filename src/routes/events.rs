use axum::{extract::Query, Extension, Json};
use time::OffsetDateTime;

use crate::{
    config::Tables,
    domain::Event,
    record_store::{self, formula, RecordStore},
};

#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct EventsParams {
    #[serde(default)]
    featured: bool,
}

#[derive(serde::Serialize)]
pub(crate) struct Events {
    events: Vec<Event>,
    /// Set when the listing could not be read and a placeholder is shown instead.
    fallback: bool,
}

#[tracing::instrument(skip(store, tables))]
pub(crate) async fn events(
    Extension(store): Extension<RecordStore>,
    Extension(tables): Extension<Tables>,
    Query(params): Query<EventsParams>,
) -> Json<Events> {
    let mut query = record_store::Query::default().sorted_by("Date");
    if params.featured {
        query.filter_by_formula = Some(formula::field_is_true("Featured"));
    }

    let now = OffsetDateTime::now_utc();
    match store.select(&tables.events, &query).await {
        Ok(records) => {
            let mut events: Vec<Event> = records
                .iter()
                .map(|record| Event::from_record(record, now))
                .collect();
            Event::sort_by_date(&mut events);
            Json(Events {
                events,
                fallback: false,
            })
        }
        Err(error) => {
            tracing::warn!(%error, "failed to load events, serving the fallback listing");
            Json(Events {
                events: vec![Event::fallback(now)],
                fallback: true,
            })
        }
    }
}
