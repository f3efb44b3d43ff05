use axum::{
    extract::{Path, Query},
    Extension, Json,
};

use crate::{
    config::{Tables, DEFAULT_BASE_ID},
    diagnostics::{self, Mode, Report},
    record_store::RecordStore,
};

#[derive(serde::Serialize)]
pub(crate) struct Environment {
    credentials: &'static str,
    credentials_hint: Option<String>,
    base_id: Option<String>,
    tables: Tables,
}

/// Reports which connection settings are present without revealing them.
#[tracing::instrument(skip_all)]
pub(crate) async fn debug_environment(
    Extension(store): Extension<RecordStore>,
    Extension(tables): Extension<Tables>,
) -> Json<Environment> {
    let base_id = store.base_id();
    Json(Environment {
        credentials: store.credentials().kind(),
        credentials_hint: store.credentials().hint(),
        base_id: (!base_id.is_empty() && base_id != DEFAULT_BASE_ID)
            .then(|| diagnostics::mask(base_id)),
        tables,
    })
}

#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct DebugParams {
    #[serde(default)]
    mode: Mode,
}

#[tracing::instrument(skip(store, tables))]
pub(crate) async fn debug_table(
    Extension(store): Extension<RecordStore>,
    Extension(tables): Extension<Tables>,
    Path(table): Path<String>,
    Query(params): Query<DebugParams>,
) -> Json<Report> {
    let expected = expected_fields(&tables, &table);
    Json(diagnostics::run(&store, &table, expected, params.mode).await)
}

/// The columns the site reads from `table`, when it is one of the configured tables.
fn expected_fields(tables: &Tables, table: &str) -> &'static [&'static str] {
    if table == tables.events {
        &["Title", "Date", "Location", "Description"]
    } else if table == tables.subscribers {
        &["Email"]
    } else if table == tables.content {
        &["Content Key", "Content Value"]
    } else if table == tables.schedule {
        &["Title", "Time"]
    } else {
        &[]
    }
}
