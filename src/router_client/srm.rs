// Synology SRM web API client
//
// Session-id based: logs in lazily through auth.cgi, then passes `_sid` on every
// entry.cgi call. Responses use the `{ success, data, error: { code } }` envelope.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use url::Url;

use super::{ClientError, RouterClient};
use crate::traffic::Period;
use crate::version::user_agent;

/// SRM error codes meaning the session id is no longer valid.
const SESSION_ERROR_CODES: [i64; 4] = [105, 106, 107, 119];

#[derive(Clone)]
pub struct SrmClientConfig {
    pub host: String,
    pub port: u16,
    pub https: bool,
    pub username: String,
    pub password: String,
    pub verify_tls: bool,
    pub timeout: Duration,
}

impl fmt::Debug for SrmClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SrmClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("https", &self.https)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SrmClientConfig {
    pub fn base_url(&self) -> Result<Url, ClientError> {
        let scheme = if self.https { "https" } else { "http" };
        Ok(Url::parse(&format!(
            "{scheme}://{}:{}/webapi/",
            self.host, self.port
        ))?)
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Value,
    error: Option<EnvelopeError>,
}

#[derive(Deserialize)]
struct EnvelopeError {
    code: i64,
}

pub struct SrmClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: String,
    sid: Mutex<Option<String>>,
}

impl SrmClient {
    pub fn new(config: &SrmClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent())
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;
        Ok(Self::with_client(http, config.base_url()?, config))
    }

    /// Build around an existing `reqwest::Client` (tests point this at a mock server).
    pub fn with_client(http: reqwest::Client, base_url: Url, config: &SrmClientConfig) -> Self {
        Self {
            http,
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
            sid: Mutex::new(None),
        }
    }

    async fn request(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, ClientError> {
        let url = self.base_url.join(endpoint)?;
        let resp = self.http.get(url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Envelope(format!("HTTP {status}")));
        }
        let envelope: Envelope = resp.json().await?;
        if envelope.success {
            Ok(envelope.data)
        } else {
            let code = envelope.error.map_or(-1, |e| e.code);
            Err(ClientError::Api { code })
        }
    }

    async fn login(&self) -> Result<String, ClientError> {
        debug!(user = %self.username, "logging in to SRM");
        let data = self
            .request(
                "auth.cgi",
                &[
                    ("api", "SYNO.API.Auth"),
                    ("version", "2"),
                    ("method", "login"),
                    ("account", &self.username),
                    ("passwd", &self.password),
                    ("session", "webui"),
                    ("format", "sid"),
                ],
            )
            .await
            .map_err(|e| match e {
                ClientError::Api { code } => {
                    ClientError::Authentication(format!("login rejected (code {code})"))
                }
                other => other,
            })?;
        data.get("sid")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| ClientError::Authentication("login response carried no sid".into()))
    }

    /// Calls an entry.cgi API with a valid session, re-authenticating once if the
    /// session expired.
    async fn call(
        &self,
        api: &str,
        method: &str,
        version: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, ClientError> {
        let mut sid_guard = self.sid.lock().await;
        let mut relogged = false;
        loop {
            let sid = match sid_guard.as_ref() {
                Some(sid) => sid.clone(),
                None => {
                    let sid = self.login().await?;
                    *sid_guard = Some(sid.clone());
                    relogged = true;
                    sid
                }
            };
            let mut query: Vec<(&str, &str)> = vec![
                ("api", api),
                ("method", method),
                ("version", version),
                ("_sid", &sid),
            ];
            query.extend_from_slice(params);
            match self.request("entry.cgi", &query).await {
                Err(ClientError::Api { code }) if SESSION_ERROR_CODES.contains(&code) => {
                    *sid_guard = None;
                    if relogged {
                        return Err(ClientError::Authentication(format!(
                            "session rejected right after login (code {code})"
                        )));
                    }
                    debug!(code, "SRM session expired, logging in again");
                }
                other => return other,
            }
        }
    }
}

fn into_array(data: Value, key: Option<&str>) -> Result<Vec<Value>, ClientError> {
    let inner = match key {
        Some(k) => data
            .get(k)
            .cloned()
            .ok_or_else(|| ClientError::Envelope(format!("response has no `{k}`")))?,
        None => data,
    };
    match inner {
        Value::Array(items) => Ok(items),
        other => Err(ClientError::Envelope(format!(
            "expected an array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl RouterClient for SrmClient {
    #[instrument(skip(self), fields(api = "SYNO.Core.System"))]
    async fn fetch_system_info(&self) -> Result<Value, ClientError> {
        self.call("SYNO.Core.System", "info", "1", &[]).await
    }

    #[instrument(skip(self), fields(api = "SYNO.Core.System.Utilization"))]
    async fn fetch_system_utilization(&self) -> Result<Value, ClientError> {
        self.call("SYNO.Core.System.Utilization", "get", "1", &[])
            .await
    }

    #[instrument(skip(self), fields(api = "SYNO.Core.Network.NSM.Device"))]
    async fn fetch_device_list(&self) -> Result<Vec<Value>, ClientError> {
        let data = self
            .call(
                "SYNO.Core.Network.NSM.Device",
                "get",
                "4",
                &[("info", "\"basic\"")],
            )
            .await?;
        into_array(data, Some("devices"))
    }

    #[instrument(skip(self), fields(api = "SYNO.Core.NGFW.Traffic"))]
    async fn fetch_traffic(&self, period: Period) -> Result<Vec<Value>, ClientError> {
        let data = self
            .call(
                "SYNO.Core.NGFW.Traffic",
                "get",
                "1",
                &[("mode", "net"), ("interval", period.as_str())],
            )
            .await?;
        into_array(data, None)
    }
}
