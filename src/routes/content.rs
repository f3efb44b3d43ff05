use axum::{extract::Path, http::StatusCode, Extension, Json};

use crate::{
    config::Tables,
    domain::SiteContent,
    record_store::{Query, RecordStore},
};

#[tracing::instrument(skip_all)]
pub(crate) async fn site_content(
    Extension(store): Extension<RecordStore>,
    Extension(tables): Extension<Tables>,
) -> Json<SiteContent> {
    Json(load(&store, &tables).await)
}

#[tracing::instrument(skip(store, tables))]
pub(crate) async fn site_content_value(
    Extension(store): Extension<RecordStore>,
    Extension(tables): Extension<Tables>,
    Path(key): Path<String>,
) -> Result<String, StatusCode> {
    load(&store, &tables)
        .await
        .get(&key)
        .map(str::to_string)
        .ok_or(StatusCode::NOT_FOUND)
}

/// The content table folded over the defaults, or just the defaults if it cannot be read.
async fn load(store: &RecordStore, tables: &Tables) -> SiteContent {
    match store.select(&tables.content, &Query::default()).await {
        Ok(records) => SiteContent::from_records(&records),
        Err(error) => {
            tracing::warn!(%error, "failed to load site content, using defaults");
            SiteContent::defaults()
        }
    }
}
