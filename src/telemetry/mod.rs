mod requests;

use std::env;

use tracing::Level;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{
    filter::{ParseError, Targets},
    fmt::MakeWriter,
    layer::SubscriberExt as _,
    util::SubscriberInitExt as _,
};

pub(crate) use self::requests::{id_layer, trace_layer};

/// Installs the global subscriber, writing bunyan-formatted JSON lines to `sink`.
pub fn init<Sink>(name: impl ToString, sink: Sink)
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let name = name.to_string();
    let rust_log = env::var("RUST_LOG").ok();
    let filter = targets(&name, rust_log.as_deref()).expect("invalid configuration for RUST_LOG");

    tracing_subscriber::registry()
        .with(filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(name, sink))
        .init();
}

/// `RUST_LOG` directives, or INFO for everything, with DEBUG always on for this crate and `name`.
fn targets(name: &str, rust_log: Option<&str>) -> Result<Targets, ParseError> {
    let base = match rust_log {
        Some(directives) => directives.parse()?,
        None => Targets::new().with_default(Level::INFO),
    };
    Ok(base
        .with_target(env!("CARGO_PKG_NAME"), Level::DEBUG)
        .with_target(name, Level::DEBUG))
}
