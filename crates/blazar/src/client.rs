use std::time::Duration;

use log::debug;
use reqwest::{
    header::{ACCEPT, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::{
    error::{Error, Result},
    resource::ResourceKind,
    v1::{
        allocations::AllocationManager, devices::DeviceManager, floatingips::FloatingIpManager,
        hosts::HostManager, leases::LeaseManager, networks::NetworkManager,
        resource::ResourceManager,
    },
};

pub const DEFAULT_USER_AGENT: &str = concat!("blazar-rs/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const SUPPORTED_VERSIONS: &[&str] = &["1", "1a0"];

/// Everything needed to talk to the reservation service.
#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub endpoint: Option<Url>,
    pub auth_token: Option<String>,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        ClientOptions {
            endpoint: None,
            auth_token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientOptions {
    pub fn new(endpoint: Url, auth_token: impl Into<String>) -> ClientOptions {
        ClientOptions {
            endpoint: Some(endpoint),
            auth_token: Some(auth_token.into()),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<(Url, String)> {
        match (&self.endpoint, &self.auth_token) {
            (Some(endpoint), Some(token)) if !token.is_empty() => {
                Ok((endpoint.clone(), token.clone()))
            }
            _ => Err(Error::InsufficientAuthInformation),
        }
    }
}

/// Sends JSON requests to the service and maps error statuses to [`Error::Client`].
pub struct RequestManager {
    agent: Client,
    endpoint: Url,
    auth_token: String,
}

impl RequestManager {
    pub fn new(options: &ClientOptions) -> Result<RequestManager> {
        let (endpoint, auth_token) = options.validate()?;
        let agent = Client::builder()
            .user_agent(options.user_agent.clone())
            .timeout(options.timeout)
            .build()?;
        Ok(RequestManager {
            agent,
            endpoint,
            auth_token,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        // paths are appended to the endpoint, keeping any version prefix it carries
        let base = self.endpoint.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}", base, path))?)
    }

    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<Value>> {
        let url = self.url(path)?;
        debug!("{} {}", method, url);
        let mut req = self
            .agent
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header("x-auth-token", &self.auth_token);
        if let Some(body) = body {
            req = req
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(body)?);
        }

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let decoded = serde_json::from_str::<Value>(&text).ok();

        if status.as_u16() >= 400 {
            return Err(Error::Client {
                message: error_message(decoded, text),
                code: status.as_u16(),
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        Ok(decoded)
    }

    pub async fn get(&self, path: &str) -> Result<Option<Value>> {
        self.request::<Value>(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Option<Value>> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Option<Value>> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<Value>> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Option<Value>> {
        self.request::<Value>(Method::DELETE, path, None).await
    }
}

fn error_message(decoded: Option<Value>, text: String) -> String {
    match decoded {
        Some(Value::Object(mut body)) => match body.remove("error_message") {
            Some(Value::String(message)) => message,
            Some(message) => message.to_string(),
            None => Value::Object(body).to_string(),
        },
        Some(body) => body.to_string(),
        None => text,
    }
}

/// Entry point of the library, bound to one API version.
pub struct BlazarClient {
    request: RequestManager,
    version: &'static str,
}

impl BlazarClient {
    pub fn new(version: &str, options: ClientOptions) -> Result<BlazarClient> {
        let Some(version) = SUPPORTED_VERSIONS.iter().find(|x| **x == version) else {
            return Err(Error::UnsupportedVersion(format!(
                "Invalid client version '{}'. Must be one of: {}",
                version,
                SUPPORTED_VERSIONS.join(", ")
            )));
        };
        Ok(BlazarClient {
            request: RequestManager::new(&options)?,
            version: *version,
        })
    }

    pub fn version(&self) -> &str {
        self.version
    }

    pub fn resource(&self, kind: ResourceKind) -> ResourceManager<'_> {
        ResourceManager::new(&self.request, kind)
    }

    pub fn leases(&self) -> LeaseManager<'_> {
        LeaseManager::new(&self.request)
    }

    pub fn hosts(&self) -> HostManager<'_> {
        HostManager::new(&self.request)
    }

    pub fn networks(&self) -> NetworkManager<'_> {
        NetworkManager::new(&self.request)
    }

    pub fn devices(&self) -> DeviceManager<'_> {
        DeviceManager::new(&self.request)
    }

    pub fn floatingips(&self) -> FloatingIpManager<'_> {
        FloatingIpManager::new(&self.request)
    }

    pub fn allocations(&self) -> AllocationManager<'_> {
        AllocationManager::new(&self.request)
    }
}
