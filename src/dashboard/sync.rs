use crate::dashboard::string_list;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api/v1/";
pub const DASHBOARD_SETTINGS_PATH: &str = "users/me/dashboard-settings/";

/// Dashboard preferences as returned by the backend. Either field may be
/// absent when the user never saved a layout or the server sent garbage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteSettings {
    pub widget_order: Option<Vec<String>>,
    pub hidden_widgets: Option<Vec<String>>,
}

impl RemoteSettings {
    /// Extract settings from a `{ "dashboard_settings": { .. } }` response body.
    pub fn from_response(body: &Value) -> Self {
        let settings = body.get("dashboard_settings");
        Self {
            widget_order: string_list(settings.and_then(|s| s.get("widgetOrder"))),
            hidden_widgets: string_list(settings.and_then(|s| s.get("hiddenWidgets"))),
        }
    }
}

/// Request body for a full replacement of the stored preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSettingsPayload {
    pub widget_order: Vec<String>,
    pub hidden_widgets: Vec<String>,
}

/// Backend holding the user's dashboard preferences.
pub trait SettingsApi: Send + Sync {
    fn fetch(&self) -> Result<RemoteSettings>;
    fn update(&self, payload: &DashboardSettingsPayload) -> Result<()>;
}

/// [`SettingsApi`] over the intranet REST API.
pub struct HttpSettingsApi {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

impl HttpSettingsApi {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let endpoint = settings_endpoint(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("fond-intra dashboard")
            .build()?;
        Ok(Self {
            client,
            endpoint,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn authorize(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match &self.token {
            Some(token) => req.header(AUTHORIZATION, format!("Bearer {token}")),
            None => req,
        }
    }
}

impl SettingsApi for HttpSettingsApi {
    fn fetch(&self) -> Result<RemoteSettings> {
        let resp = self
            .authorize(self.client.get(self.endpoint.clone()))
            .header(ACCEPT, "application/json")
            .send()
            .with_context(|| format!("GET {}", self.endpoint))?
            .error_for_status()?;
        let body: Value = resp.json().context("decoding dashboard settings")?;
        Ok(RemoteSettings::from_response(&body))
    }

    fn update(&self, payload: &DashboardSettingsPayload) -> Result<()> {
        self.authorize(self.client.put(self.endpoint.clone()))
            .json(payload)
            .send()
            .with_context(|| format!("PUT {}", self.endpoint))?
            .error_for_status()?;
        Ok(())
    }
}

/// Join the settings path onto `base`, tolerating a missing trailing slash.
pub fn settings_endpoint(base_url: &str) -> Result<Url> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let base = Url::parse(&base).with_context(|| format!("invalid API base url '{base_url}'"))?;
    Ok(base.join(DASHBOARD_SETTINGS_PATH)?)
}
