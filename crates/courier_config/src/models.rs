// --- File: crates/courier_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Channels ---
// The set of message destinations is closed and fixed for the process
// lifetime; an invalid channel is unrepresentable past the serde boundary.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Channel {
    Play,
    Create,
    Draft,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Play, Channel::Create, Channel::Draft];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Play => "PLAY",
            Channel::Create => "CREATE",
            Channel::Draft => "DRAFT",
        }
    }

    /// Name of the per-channel history collection in the document store.
    pub fn history_collection(&self) -> String {
        format!("{}_messages", self.as_str())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLAY" => Ok(Channel::Play),
            "CREATE" => Ok(Channel::Create),
            "DRAFT" => Ok(Channel::Draft),
            other => Err(format!("unknown channel: {other}")),
        }
    }
}

// --- HTTP method for a webhook ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

// --- Webhook Config ---
// One per channel. The URL is absent by default and injected from the
// environment; a missing URL is a per-operation configuration error, not a
// startup failure.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebhookConfig {
    pub label: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub method: HttpMethod,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebhookChannels {
    pub play: WebhookConfig,
    pub create: WebhookConfig,
    pub draft: WebhookConfig,
}

impl WebhookChannels {
    pub fn get(&self, channel: Channel) -> &WebhookConfig {
        match channel {
            Channel::Play => &self.play,
            Channel::Create => &self.create,
            Channel::Draft => &self.draft,
        }
    }

    pub fn get_mut(&mut self, channel: Channel) -> &mut WebhookConfig {
        match channel {
            Channel::Play => &mut self.play,
            Channel::Create => &mut self.create,
            Channel::Draft => &mut self.draft,
        }
    }
}

// --- Firestore Config ---
// Holds non-secret Firestore settings. The service account key lives in the
// file named by key_path; with no key_path requests go out unauthenticated
// (emulator / tests).
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FirestoreConfig {
    pub project_id: String,
    #[serde(default)]
    pub key_path: Option<String>,
    /// Override for the REST base URL (emulator / tests).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Re-query interval for live subscriptions, in seconds.
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    /// When false (or when no Firestore config is present) the backend
    /// falls back to the in-memory store.
    #[serde(default)]
    pub use_firestore: bool,

    #[serde(default)]
    pub firestore: Option<FirestoreConfig>,

    pub webhooks: WebhookChannels,
}

impl AppConfig {
    /// Look up the webhook configuration for a channel.
    pub fn webhook(&self, channel: Channel) -> &WebhookConfig {
        self.webhooks.get(channel)
    }
}
