//! Screen-view analytics.
//!
//! Events go to the measurement-protocol collect endpoint with the
//! configured measurement id. Delivery is fire-and-forget: a failed send is
//! logged and dropped, and a missing measurement id disables tracking
//! entirely without affecting anything else.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use tracing::{debug, warn};

const COLLECT_ENDPOINT: &str = "https://www.google-analytics.com/mp/collect";

pub struct Analytics {
    measurement_id: Option<String>,
    api_secret: Option<String>,
    client_id: String,
    endpoint: String,
    client: reqwest::Client,
}

impl Analytics {
    pub fn new(measurement_id: Option<String>, api_secret: Option<String>) -> Self {
        let measurement_id = measurement_id.filter(|s| !s.is_empty());
        if measurement_id.is_none() {
            warn!("analytics measurement id not configured; tracking disabled");
        }
        Self {
            client_id: if measurement_id.is_some() {
                ensure_client_id()
            } else {
                String::new()
            },
            measurement_id,
            api_secret: api_secret.filter(|s| !s.is_empty()),
            endpoint: COLLECT_ENDPOINT.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.measurement_id.is_some()
    }

    /// Fire a screen_view event for a view switch. Never blocks the caller.
    pub fn track_screen_view(&self, screen_name: &str) {
        let Some(measurement_id) = self.measurement_id.clone() else {
            return;
        };
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let api_secret = self.api_secret.clone();
        let payload = screen_view_payload(&self.client_id, screen_name);
        tokio::spawn(async move {
            let mut request = client
                .post(&endpoint)
                .query(&[("measurement_id", measurement_id.as_str())]);
            if let Some(secret) = &api_secret {
                request = request.query(&[("api_secret", secret.as_str())]);
            }
            if let Err(err) = request.json(&payload).send().await {
                debug!(error = %err, "analytics delivery failed");
            }
        });
    }
}

/// The JSON body for a single screen_view event.
pub fn screen_view_payload(client_id: &str, screen_name: &str) -> serde_json::Value {
    json!({
        "client_id": client_id,
        "events": [
            {
                "name": "screen_view",
                "params": { "screen_name": screen_name }
            }
        ]
    })
}

// --- Persistent client id ---

#[derive(Serialize, Deserialize, Default)]
struct ClientData {
    client_id: Option<String>,
}

fn client_data_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".toolhub").join("analytics.json"))
}

fn load_client_id() -> Option<String> {
    let path = client_data_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    let data: ClientData = serde_json::from_str(&content).ok()?;
    data.client_id
}

fn save_client_id(id: &str) {
    if let Some(path) = client_data_path() {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let data = ClientData {
            client_id: Some(id.to_string()),
        };
        if let Ok(json) = serde_json::to_string_pretty(&data) {
            let _ = std::fs::write(&path, json);
        }
    }
}

/// The client id identifies this installation across runs; generate one on
/// first use and keep it.
fn ensure_client_id() -> String {
    if let Some(id) = load_client_id() {
        return id;
    }
    let id = uuid::Uuid::new_v4().to_string();
    save_client_id(&id);
    id
}
