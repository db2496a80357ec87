use crate::error::{Result, SlaError};
use crate::types::LabelNames;
use chrono_tz::Tz;
use std::fmt;
use std::time::Duration;

pub const ENV_TOKEN: &str = "NOTION_TOKEN";
pub const ENV_DATABASE_ID: &str = "DATABASE_ID";
pub const ENV_TIME_ZONE: &str = "TZ";
pub const ENV_STATUS_PROPERTY: &str = "SLA_STATUS_PROPERTY";
pub const ENV_DUE_PROPERTY: &str = "SLA_DUE_PROPERTY";
pub const ENV_SLA_PROPERTY: &str = "SLA_PROPERTY";
pub const ENV_DONE_STATUS: &str = "SLA_DONE_STATUS";
pub const ENV_LABEL_ON_TIME: &str = "SLA_LABEL_ON_TIME";
pub const ENV_LABEL_AT_RISK: &str = "SLA_LABEL_AT_RISK";
pub const ENV_LABEL_BREACHED: &str = "SLA_LABEL_BREACHED";
pub const ENV_API_BASE: &str = "NOTION_API_BASE";
pub const ENV_NOTION_VERSION: &str = "NOTION_VERSION";
pub const ENV_PAGE_SIZE: &str = "SLA_PAGE_SIZE";
pub const ENV_REQUEST_DELAY_MS: &str = "SLA_REQUEST_DELAY_MS";

/// Notion caps `page_size` at 100.
pub const MAX_PAGE_SIZE: u32 = 100;

// ---------------------------------------------------------------------------
// PropertyNames
// ---------------------------------------------------------------------------

/// Human-readable property keys under each page's `properties` map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyNames {
    pub status: String,
    pub due: String,
    pub sla: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            status: "Durum".to_string(),
            due: "Bitiş".to_string(),
            sla: "SLA".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ApiConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub notion_version: String,
    pub page_size: u32,
    /// Pause after every list or update request.
    pub request_delay: Duration,
}

fn default_base_url() -> String {
    "https://api.notion.com/v1".to_string()
}

fn default_notion_version() -> String {
    "2022-06-28".to_string()
}

fn default_request_delay() -> Duration {
    Duration::from_millis(150)
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            notion_version: default_notion_version(),
            page_size: MAX_PAGE_SIZE,
            request_delay: default_request_delay(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn default_time_zone() -> Tz {
    chrono_tz::Europe::Istanbul
}

fn default_done_status() -> String {
    "Bitti".to_string()
}

/// Everything one synchronization run needs, resolved once at startup.
#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub database_id: String,
    pub time_zone: Tz,
    pub properties: PropertyNames,
    pub done_status: String,
    pub labels: LabelNames,
    pub api: ApiConfig,
}

impl Config {
    /// Config with the given credentials and every optional setting at its default.
    pub fn new(token: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            database_id: database_id.into(),
            time_zone: default_time_zone(),
            properties: PropertyNames::default(),
            done_status: default_done_status(),
            labels: LabelNames::default(),
            api: ApiConfig::default(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| get(key).ok_or_else(|| SlaError::MissingEnv(key.to_string()));

        let mut config = Config::new(required(ENV_TOKEN)?, required(ENV_DATABASE_ID)?);

        if let Some(tz) = get(ENV_TIME_ZONE) {
            // POSIX allows `TZ=:Europe/Istanbul`.
            let name = tz.strip_prefix(':').unwrap_or(&tz);
            config.time_zone = name
                .parse::<Tz>()
                .map_err(|_| SlaError::invalid(ENV_TIME_ZONE, format!("unknown time zone '{tz}'")))?;
        }

        let props = &mut config.properties;
        override_with(&mut props.status, get(ENV_STATUS_PROPERTY));
        override_with(&mut props.due, get(ENV_DUE_PROPERTY));
        override_with(&mut props.sla, get(ENV_SLA_PROPERTY));
        override_with(&mut config.done_status, get(ENV_DONE_STATUS));

        let labels = &mut config.labels;
        override_with(&mut labels.on_time, get(ENV_LABEL_ON_TIME));
        override_with(&mut labels.at_risk, get(ENV_LABEL_AT_RISK));
        override_with(&mut labels.breached, get(ENV_LABEL_BREACHED));

        let api = &mut config.api;
        if let Some(base) = get(ENV_API_BASE) {
            api.base_url = base.trim_end_matches('/').to_string();
        }
        override_with(&mut api.notion_version, get(ENV_NOTION_VERSION));

        if let Some(raw) = get(ENV_PAGE_SIZE) {
            let size: u32 = raw
                .parse()
                .map_err(|_| SlaError::invalid(ENV_PAGE_SIZE, format!("'{raw}' is not a number")))?;
            if size == 0 || size > MAX_PAGE_SIZE {
                return Err(SlaError::invalid(
                    ENV_PAGE_SIZE,
                    format!("must be between 1 and {MAX_PAGE_SIZE}, got {size}"),
                ));
            }
            api.page_size = size;
        }

        if let Some(raw) = get(ENV_REQUEST_DELAY_MS) {
            let ms: u64 = raw.parse().map_err(|_| {
                SlaError::invalid(ENV_REQUEST_DELAY_MS, format!("'{raw}' is not a number"))
            })?;
            api.request_delay = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

fn override_with(slot: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *slot = v;
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("database_id", &self.database_id)
            .field("time_zone", &self.time_zone)
            .field("properties", &self.properties)
            .field("done_status", &self.done_status)
            .field("labels", &self.labels)
            .field("api", &self.api)
            .finish()
    }
}
