//! Blocking HTTP client for the Neocities web API

use reqwest::blocking::{multipart, Client, RequestBuilder};
use serde_json::{json, Value};

use crate::config::{Auth, Config};
use crate::error::{Result, SyncError};
use crate::fs_enum::FileEntry;
use crate::transport::{
    parse_ack, parse_info, parse_listing, ApiResponse, Listing, SiteInfo, Transport,
};

/// [`Transport`] over `https://neocities.org/api` (or any compatible base URL)
pub struct HttpTransport {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("neosync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Use a preconfigured reqwest client
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            auth: config.auth.clone(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Auth::ApiKey(key) => req.bearer_auth(key),
            Auth::Basic { user, password } => req.basic_auth(user, Some(password)),
            Auth::Anonymous => req,
        }
    }

    /// Send and decode the body. Error statuses still carry a JSON body, so
    /// status codes are not inspected; non-JSON bodies are wrapped raw.
    fn send(&self, req: RequestBuilder) -> Result<Value> {
        let response = self.authorize(req).send()?;
        let status = response.status();
        let text = response.text()?;
        Ok(serde_json::from_str(&text).unwrap_or_else(|_| {
            json!({
                "result": "error",
                "status": status.as_u16(),
                "body": text,
            })
        }))
    }
}

impl Transport for HttpTransport {
    fn info(&self, site: Option<&str>) -> Result<ApiResponse<SiteInfo>> {
        let mut req = self.client.get(self.url("info"));
        if let Some(site) = site {
            req = req.query(&[("sitename", site)]);
        }
        Ok(parse_info(self.send(req)?))
    }

    /// The list endpoint only serves the authenticated site; the argument is
    /// forwarded as its `path` filter.
    fn list_items(&self, site: Option<&str>) -> Result<ApiResponse<Listing>> {
        let mut req = self.client.get(self.url("list"));
        if let Some(path) = site {
            req = req.query(&[("path", path)]);
        }
        Ok(parse_listing(self.send(req)?))
    }

    fn upload(&self, files: &[FileEntry]) -> Result<ApiResponse<()>> {
        let mut form = multipart::Form::new();
        for entry in files {
            // The part name is the destination path on the site
            form = form
                .file(entry.remote_path.clone(), &entry.local_path)
                .map_err(|e| SyncError::filesystem(&entry.local_path, e))?;
        }
        let req = self.client.post(self.url("upload")).multipart(form);
        Ok(parse_ack(self.send(req)?))
    }

    fn delete(&self, paths: &[String]) -> Result<ApiResponse<()>> {
        let fields: Vec<(&str, &str)> = paths.iter().map(|p| ("filenames[]", p.as_str())).collect();
        let req = self.client.post(self.url("delete")).form(&fields);
        Ok(parse_ack(self.send(req)?))
    }
}
