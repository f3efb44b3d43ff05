//! Step-by-step connectivity checks against the record store, for the debug routes.
//!
//! Each mode runs the checks of the previous one first: `base` inspects configuration only,
//! `table` reads one record, `record` also dumps that record's fields and compares them against
//! the columns the site expects.

use crate::{
    config::DEFAULT_BASE_ID,
    record_store::{Credentials, Query, Record, RecordStore},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Mode {
    Base,
    Table,
    Record,
}

impl Default for Mode {
    fn default() -> Self {
        Self::Base
    }
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct Step {
    pub(crate) ok: bool,
    pub(crate) message: String,
}

#[derive(Debug, Default, serde::Serialize)]
pub(crate) struct Report {
    pub(crate) success: bool,
    pub(crate) steps: Vec<Step>,
}

impl Report {
    fn pass(&mut self, message: impl Into<String>) {
        self.steps.push(Step {
            ok: true,
            message: message.into(),
        });
    }

    fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "diagnostic step failed");
        self.steps.push(Step { ok: false, message });
    }
}

#[tracing::instrument(skip(store, expected_fields))]
pub(crate) async fn run(
    store: &RecordStore,
    table: &str,
    expected_fields: &[&str],
    mode: Mode,
) -> Report {
    let mut report = Report::default();
    report.pass("Starting record store diagnostics");

    check_base(&mut report, store);
    if mode != Mode::Base {
        let sample = check_table(&mut report, store, table).await;
        if mode == Mode::Record {
            match &sample {
                Some(record) => check_record(&mut report, record, expected_fields),
                None => report.pass("No records to inspect"),
            }
        }
    }

    report.pass("Diagnostics completed");
    report.success = report.steps.iter().all(|step| step.ok);
    report
}

fn check_base(report: &mut Report, store: &RecordStore) {
    match store.credentials() {
        Credentials::Missing => report.fail("No access token or API key is configured"),
        credentials => report.pass(format!(
            "Authenticating with a {} ({})",
            credentials.kind(),
            credentials.hint().unwrap_or_default()
        )),
    }

    let base_id = store.base_id();
    if base_id.is_empty() || base_id == DEFAULT_BASE_ID {
        report.fail("Base ID is not configured");
    } else if !base_id.starts_with("app") {
        report.fail(format!(
            "Base ID {} should start with \"app\"; copy it from the first path segment of the base's URL",
            mask(base_id)
        ));
    } else {
        report.pass(format!("Base ID {} looks valid", mask(base_id)));
    }
}

async fn check_table(report: &mut Report, store: &RecordStore, table: &str) -> Option<Record> {
    report.pass(format!("Querying table \"{}\"", table));

    match store.first_page(table, &Query::max_records(1)).await {
        Ok(records) => {
            report.pass(format!(
                "Table query successful. Found {} record(s).",
                records.len()
            ));
            let record = records.into_iter().next();
            match &record {
                Some(record) => {
                    report.pass(format!("First record ID: {}", record.id));
                    let names: Vec<&str> = record.fields.keys().map(String::as_str).collect();
                    report.pass(format!("Fields found: {}", names.join(", ")));
                }
                None => report.pass("Table exists but contains no records"),
            }
            record
        }
        Err(error) => {
            report.fail(format!("Table access failed: {}", error));
            if error.is_not_found() {
                report.fail(format!(
                    "Table \"{}\" doesn't exist or the token cannot access it",
                    table
                ));
                report.fail("Double-check the table name and base ID (both are case-sensitive)");
            } else if error.is_unauthorized() {
                report.fail("The credentials were rejected; check the token's scopes and base access");
            }
            None
        }
    }
}

fn check_record(report: &mut Report, record: &Record, expected_fields: &[&str]) {
    report.pass("Inspecting record fields");
    for (name, value) in &record.fields {
        report.pass(format!("Field \"{}\": {}", name, value));
    }

    for expected in expected_fields {
        if record.fields.contains_key(*expected) {
            report.pass(format!("Found expected field: {}", expected));
            continue;
        }
        let near_miss = record
            .fields
            .keys()
            .find(|name| name.eq_ignore_ascii_case(expected));
        match near_miss {
            Some(name) => report.fail(format!(
                "Found field \"{}\" but \"{}\" is expected (field names are case-sensitive)",
                name, expected
            )),
            None => report.fail(format!("Missing expected field: {}", expected)),
        }
    }
}

/// Shows enough of an identifier to recognise it without printing it whole.
pub(crate) fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 10 {
        let head: String = chars.iter().take(3).collect();
        return format!("{}...", head);
    }
    let head: String = chars[..5].iter().collect();
    let tail: String = chars[chars.len() - 5..].iter().collect();
    format!("{}...{}", head, tail)
}
