mod app;
mod config;
mod diagnostics;
mod domain;
mod error;
mod record_store;
mod routes;
pub mod telemetry;

pub use self::{
    app::{App, Server},
    config::{Config, ConfigBuilder, ConfigError},
    record_store::{Credentials, RecordStore},
};

pub(crate) use self::error::Error;
