//! HTTP client for the review backend
//!
//! Every call is a single request with no retry: a failed call simply means
//! the UI update it was meant to drive doesn't happen.

use super::{
    parse_file_tree, parse_fix_draw, parse_fix_list, EndpointError, FixGeometry, Request,
};
use crate::filetree::FileNode;
use crate::fix::FixRecord;
use crate::util::unescape_html;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone)]
pub struct EndpointClient {
    http: reqwest::Client,
    base: Url,
}

impl EndpointClient {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, EndpointError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Raw source text of `file`, unescaped for display
    pub async fn source(&self, file: &str) -> Result<String, EndpointError> {
        let response = self
            .http
            .get(self.base.clone())
            .query(&[("file", file)])
            .send()
            .await?;
        let body = read_body(response).await?;
        Ok(unescape_html(&body))
    }

    pub async fn fix_list(&self, request: &Request) -> Result<Vec<FixRecord>, EndpointError> {
        let body = self.post(request).await?;
        parse_fix_list(&body)
    }

    pub async fn fix_draw(&self, request: &Request) -> Result<FixGeometry, EndpointError> {
        let body = self.post(request).await?;
        parse_fix_draw(&body)
    }

    pub async fn file_tree(&self) -> Result<Vec<FileNode>, EndpointError> {
        let body = self.post(&Request::FileTree).await?;
        parse_file_tree(&body)
    }

    /// Send a request whose response body we don't need (cache, close, clear)
    pub async fn send(&self, request: &Request) -> Result<(), EndpointError> {
        self.post(request).await.map(|_| ())
    }

    async fn post(&self, request: &Request) -> Result<String, EndpointError> {
        let Some(form) = request.form() else {
            return Err(EndpointError::Malformed(format!(
                "{} is not a POST request",
                request.name()
            )));
        };
        debug!(request = request.name(), "posting to endpoint");
        let response = self
            .http
            .post(self.base.clone())
            .form(&form)
            .send()
            .await?;
        read_body(response).await
    }
}

async fn read_body(response: reqwest::Response) -> Result<String, EndpointError> {
    let status = response.status();
    if !status.is_success() {
        return Err(EndpointError::Status(status.as_u16()));
    }
    Ok(response.text().await?)
}
