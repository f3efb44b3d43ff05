//! Client for the hosted record store (an Airtable-compatible REST API).
//!
//! The store is addressed as `{api_url}/{base_id}/{table}`. Listing follows the `offset` cursor
//! returned with each page; creation posts a single record at a time.

mod credentials;
pub(crate) mod formula;

use std::{collections::HashSet, time::Duration};

use reqwest::{StatusCode, Url};
use serde_json::{Map, Value};

pub use self::credentials::Credentials;

pub(crate) type Fields = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub(crate) enum StoreError {
    #[error("request to the record store failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("record store responded {status} ({kind}): {message}")]
    Api {
        status: StatusCode,
        kind: String,
        message: String,
    },

    #[error("cannot address table {0:?} under the configured store url")]
    InvalidTable(String),
}

impl StoreError {
    pub(crate) fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport(error) => error.status(),
            Self::Api { status, .. } => Some(*status),
            Self::InvalidTable(_) => None,
        }
    }

    pub(crate) fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status, kind, .. } => {
                *status == StatusCode::NOT_FOUND || kind.contains("NOT_FOUND")
            }
            _ => false,
        }
    }

    pub(crate) fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
pub(crate) struct Record {
    pub(crate) id: String,

    #[serde(default)]
    pub(crate) fields: Fields,
}

impl Record {
    /// Returns a field as a string, treating blank strings as absent.
    pub(crate) fn text(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub(crate) fn flag(&self, field: &str) -> Option<bool> {
        self.fields.get(field).and_then(Value::as_bool)
    }
}

/// Parameters for listing records.
#[derive(Clone, Debug, Default)]
pub(crate) struct Query {
    pub(crate) filter_by_formula: Option<String>,
    pub(crate) max_records: Option<usize>,
    /// Fields to sort by, ascending, in priority order.
    pub(crate) sort: Vec<String>,
}

impl Query {
    pub(crate) fn filter(formula: impl Into<String>) -> Self {
        Self {
            filter_by_formula: Some(formula.into()),
            ..Self::default()
        }
    }

    pub(crate) fn max_records(max_records: usize) -> Self {
        Self {
            max_records: Some(max_records),
            ..Self::default()
        }
    }

    pub(crate) fn sorted_by(mut self, field: impl Into<String>) -> Self {
        self.sort.push(field.into());
        self
    }

    fn to_params(&self, offset: Option<&str>) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(formula) = &self.filter_by_formula {
            params.push(("filterByFormula".to_string(), formula.clone()));
        }
        if let Some(max_records) = self.max_records {
            params.push(("maxRecords".to_string(), max_records.to_string()));
        }
        for (i, field) in self.sort.iter().enumerate() {
            params.push((format!("sort[{}][field]", i), field.clone()));
            params.push((format!("sort[{}][direction]", i), "asc".to_string()));
        }
        if let Some(offset) = offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        params
    }
}

#[derive(serde::Deserialize)]
struct Page {
    records: Vec<Record>,

    #[serde(default)]
    offset: Option<String>,
}

#[derive(serde::Serialize)]
struct CreateRequest<'a> {
    records: [NewRecord<'a>; 1],
}

#[derive(serde::Serialize)]
struct NewRecord<'a> {
    fields: &'a Fields,
}

#[derive(serde::Deserialize)]
struct CreateResponse {
    records: Vec<Record>,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Typed {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        message: Option<String>,
    },
    Bare(String),
}

#[derive(Clone)]
pub struct RecordStore {
    http_client: reqwest::Client,
    api_url: Url,
    base_id: String,
    credentials: Credentials,
}

impl RecordStore {
    pub fn new(
        api_url: Url,
        base_id: String,
        credentials: Credentials,
        request_timeout: Duration,
    ) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .expect("failed to build record store http client");

        Self {
            http_client,
            api_url,
            base_id,
            credentials,
        }
    }

    pub(crate) fn base_id(&self) -> &str {
        &self.base_id
    }

    pub(crate) fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidTable(table.to_string()))?
            .pop_if_empty()
            .push(&self.base_id)
            .push(table);
        Ok(url)
    }

    /// Lists every record matching `query`, following pagination to the end. A repeated offset
    /// ends the listing.
    #[tracing::instrument(skip(self, query), fields(base_id = %self.base_id))]
    pub(crate) async fn select(&self, table: &str, query: &Query) -> Result<Vec<Record>, StoreError> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut seen = HashSet::new();
        loop {
            let page = self.fetch_page(table, query, offset.as_deref()).await?;
            records.extend(page.records);
            match page.offset {
                Some(next) if seen.insert(next.clone()) => offset = Some(next),
                Some(next) => {
                    tracing::warn!(offset = %next, "record store repeated a page offset, stopping");
                    break;
                }
                None => break,
            }
        }
        tracing::debug!(count = records.len(), "listed records");
        Ok(records)
    }

    /// Lists only the first page of records matching `query`.
    #[tracing::instrument(skip(self, query), fields(base_id = %self.base_id))]
    pub(crate) async fn first_page(
        &self,
        table: &str,
        query: &Query,
    ) -> Result<Vec<Record>, StoreError> {
        Ok(self.fetch_page(table, query, None).await?.records)
    }

    async fn fetch_page(
        &self,
        table: &str,
        query: &Query,
        offset: Option<&str>,
    ) -> Result<Page, StoreError> {
        let response = self
            .http_client
            .get(self.table_url(table)?)
            .bearer_auth(self.credentials.token())
            .query(&query.to_params(offset))
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    #[tracing::instrument(skip(self, fields), fields(base_id = %self.base_id, columns = ?fields.keys().collect::<Vec<_>>()))]
    pub(crate) async fn create(&self, table: &str, fields: &Fields) -> Result<Record, StoreError> {
        let response = self
            .http_client
            .post(self.table_url(table)?)
            .bearer_auth(self.credentials.token())
            .json(&CreateRequest {
                records: [NewRecord { fields }],
            })
            .send()
            .await?;

        let created: CreateResponse = check(response).await?.json().await?;
        created
            .records
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Api {
                status: StatusCode::OK,
                kind: "EMPTY_RESPONSE".to_string(),
                message: "no record was returned for the create request".to_string(),
            })
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let (kind, message) = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            error: ErrorDetail::Typed { kind, message },
        }) => (kind, message.unwrap_or_default()),
        Ok(ErrorBody {
            error: ErrorDetail::Bare(kind),
        }) => (kind, String::new()),
        Err(_) => ("UNKNOWN".to_string(), body),
    };
    Err(StoreError::Api {
        status,
        kind,
        message,
    })
}
