use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder};
use tracing::{debug, warn};

use super::traits::{ImageSource, LoadRequest, LoadedImage};
use crate::config::CrossOrigin;
use crate::detect::image::detect_image_format;

/// Headers that carry credentials and are withheld from anonymous cross-origin loads.
const CREDENTIAL_HEADERS: [&str; 2] = ["cookie", "authorization"];

/// Loads images over HTTP(S) with reqwest.
pub struct HttpSource {
    client: Client,
    headers: Arc<RwLock<HashMap<String, String>>>,
}

impl HttpSource {
    pub fn new(headers: HashMap<String, String>) -> Self {
        Self::with_client(Client::new(), headers)
    }

    pub fn with_client(client: Client, headers: HashMap<String, String>) -> Self {
        Self {
            client,
            headers: Arc::new(RwLock::new(headers)),
        }
    }

    /// Replace the default headers (e.g. after a session cookie refresh).
    pub fn update_headers(&self, new_headers: HashMap<String, String>) {
        *self.headers.write() = new_headers;
    }

    /// Build a GET request for `request`, applying the cross-origin credentials mode.
    fn build_request(&self, request: &LoadRequest) -> RequestBuilder {
        let headers = self.headers.read().clone();
        let strip_credentials = request.cross_origin == Some(CrossOrigin::Anonymous);

        let mut req = self.client.get(&request.url);
        for (k, v) in &headers {
            if strip_credentials && CREDENTIAL_HEADERS.contains(&k.to_ascii_lowercase().as_str()) {
                continue;
            }
            req = req.header(k.as_str(), v.as_str());
        }
        req
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

#[async_trait]
impl ImageSource for HttpSource {
    async fn load(&self, request: &LoadRequest) -> Result<LoadedImage> {
        let resp = self.build_request(request).send().await?;

        let status = resp.status();
        debug!(
            "http image status={} url={} cross_origin={}",
            status.as_u16(),
            request.url,
            request.cross_origin.map_or("none", CrossOrigin::as_str)
        );
        if !status.is_success() {
            warn!("http image failed status={} url={}", status.as_u16(), request.url);
            return Err(anyhow!("HTTP {}", status.as_u16()));
        }

        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let data = resp.bytes().await?;
        if data.is_empty() {
            return Err(anyhow!("empty response body"));
        }

        let format = detect_image_format(&data);
        if !format.is_known() {
            return Err(anyhow!(
                "response is not a decodable image (content-type={})",
                content_type.as_deref().unwrap_or("unknown")
            ));
        }

        Ok(LoadedImage {
            url: request.url.clone(),
            cross_origin: request.cross_origin,
            content_type,
            format,
            data,
        })
    }
}
