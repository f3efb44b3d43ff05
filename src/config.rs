use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use reqwest::Url;

use crate::record_store::Credentials;

const DEFAULT_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_STORE_URL: &str = "https://api.airtable.com/v0";
pub(crate) const DEFAULT_BASE_ID: &str = "missing_base_id";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration in environment: {0}")]
    Env(#[from] envy::Error),

    #[error("record store url {0} cannot be used as a base url")]
    InvalidStoreUrl(Url),
}

/// Names of the record store tables the site reads and writes.
#[derive(Clone, Debug, serde::Serialize)]
pub(crate) struct Tables {
    pub(crate) subscribers: String,
    pub(crate) events: String,
    pub(crate) content: String,
    pub(crate) schedule: String,
    pub(crate) registrations: String,
    pub(crate) sponsors: String,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            subscribers: "Subscribers".to_string(),
            events: "Events".to_string(),
            content: "Site Content".to_string(),
            schedule: "Conference Schedule".to_string(),
            registrations: "Conference Registrations".to_string(),
            sponsors: "Sponsor Inquiries".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) address: SocketAddr,
    pub(crate) store_url: Url,
    pub(crate) credentials: Credentials,
    pub(crate) base_id: String,
    pub(crate) tables: Tables,
    pub(crate) request_timeout: Duration,
    pub(crate) debug_routes: bool,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn debug_routes(&self) -> bool {
        self.debug_routes
    }
}

#[derive(Default)]
pub struct ConfigBuilder {
    address: Option<IpAddr>,
    port: Option<u16>,
    store_url: Option<Url>,
    access_token: Option<String>,
    api_key: Option<String>,
    base_id: Option<String>,
    tables: Tables,
    request_timeout: Option<Duration>,
    debug_routes: Option<bool>,
}

impl ConfigBuilder {
    pub fn address(mut self, address: SocketAddr) -> Self {
        self.address = Some(address.ip());
        self.port = Some(address.port());
        self
    }

    pub fn store_url(mut self, url: Url) -> Self {
        self.store_url = Some(url);
        self
    }

    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn base_id(mut self, base_id: impl Into<String>) -> Self {
        self.base_id = Some(base_id.into());
        self
    }

    pub fn subscribers_table(mut self, table: impl Into<String>) -> Self {
        self.tables.subscribers = table.into();
        self
    }

    pub fn events_table(mut self, table: impl Into<String>) -> Self {
        self.tables.events = table.into();
        self
    }

    pub fn content_table(mut self, table: impl Into<String>) -> Self {
        self.tables.content = table.into();
        self
    }

    pub fn schedule_table(mut self, table: impl Into<String>) -> Self {
        self.tables.schedule = table.into();
        self
    }

    pub fn registrations_table(mut self, table: impl Into<String>) -> Self {
        self.tables.registrations = table.into();
        self
    }

    pub fn sponsors_table(mut self, table: impl Into<String>) -> Self {
        self.tables.sponsors = table.into();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn debug_routes(mut self, enabled: bool) -> Self {
        self.debug_routes = Some(enabled);
        self
    }

    /// Overrides any values already set with those present in the process environment.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        Ok(self.merge(envy::from_env()?))
    }

    fn merge(mut self, env: EnvConfig) -> Self {
        fn non_empty(value: Option<String>) -> Option<String> {
            value.filter(|value| !value.trim().is_empty())
        }

        self.address = env.address.or(self.address);
        self.port = env.port.or(self.port);
        self.store_url = env.airtable_api_url.or(self.store_url);
        self.access_token = non_empty(env.airtable_access_token).or(self.access_token);
        self.api_key = non_empty(env.airtable_api_key).or(self.api_key);
        self.base_id = non_empty(env.airtable_base_id).or(self.base_id);
        if let Some(table) = non_empty(env.airtable_subscribers_table) {
            self.tables.subscribers = table;
        }
        if let Some(table) = non_empty(env.airtable_events_table) {
            self.tables.events = table;
        }
        if let Some(table) = non_empty(env.airtable_content_table) {
            self.tables.content = table;
        }
        if let Some(table) = non_empty(env.airtable_schedule_table) {
            self.tables.schedule = table;
        }
        if let Some(table) = non_empty(env.airtable_registrations_table) {
            self.tables.registrations = table;
        }
        if let Some(table) = non_empty(env.airtable_sponsors_table) {
            self.tables.sponsors = table;
        }
        self.request_timeout = env
            .airtable_timeout_ms
            .map(Duration::from_millis)
            .or(self.request_timeout);
        self.debug_routes = env.debug_routes.or(self.debug_routes);
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let store_url = match self.store_url {
            Some(url) => url,
            // the default is a constant known to parse
            None => DEFAULT_STORE_URL.parse().expect("invalid default store url"),
        };
        if store_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidStoreUrl(store_url));
        }

        Ok(Config {
            address: SocketAddr::from((
                self.address.unwrap_or(DEFAULT_ADDRESS),
                self.port.unwrap_or(DEFAULT_PORT),
            )),
            store_url,
            credentials: Credentials::from_parts(self.access_token, self.api_key),
            base_id: self.base_id.unwrap_or_else(|| DEFAULT_BASE_ID.to_string()),
            tables: self.tables,
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_TIMEOUT),
            debug_routes: self.debug_routes.unwrap_or(false),
        })
    }
}

#[derive(Default, serde::Deserialize)]
struct EnvConfig {
    #[serde(default, deserialize_with = "ip_addr_from_str")]
    address: Option<IpAddr>,

    #[serde(default)]
    port: Option<u16>,

    #[serde(default, deserialize_with = "url_from_str")]
    airtable_api_url: Option<Url>,

    #[serde(default)]
    airtable_access_token: Option<String>,

    #[serde(default)]
    airtable_api_key: Option<String>,

    #[serde(default)]
    airtable_base_id: Option<String>,

    #[serde(default)]
    airtable_subscribers_table: Option<String>,

    #[serde(default)]
    airtable_events_table: Option<String>,

    #[serde(default)]
    airtable_content_table: Option<String>,

    #[serde(default)]
    airtable_schedule_table: Option<String>,

    #[serde(default)]
    airtable_registrations_table: Option<String>,

    #[serde(default)]
    airtable_sponsors_table: Option<String>,

    #[serde(default)]
    airtable_timeout_ms: Option<u64>,

    #[serde(default)]
    debug_routes: Option<bool>,
}

fn ip_addr_from_str<'de, D>(deserializer: D) -> Result<Option<IpAddr>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let ip_addr: Option<String> = serde::Deserialize::deserialize(deserializer)?;
    ip_addr
        .map(|ip_addr| ip_addr.parse().map_err(serde::de::Error::custom))
        .transpose()
}

fn url_from_str<'de, D>(deserializer: D) -> Result<Option<Url>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let url: Option<String> = serde::Deserialize::deserialize(deserializer)?;
    url.map(|url| url.parse().map_err(serde::de::Error::custom))
        .transpose()
}
