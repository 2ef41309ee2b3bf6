/// Remote submission of export tables
///
/// `ExportSink` is the narrow seam the app talks to. `GitHubUploader` creates
/// one new file per submission through the GitHub contents API; there is no
/// update path, so a repeated path is reported as a conflict.

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use super::table::ExportTable;
use crate::config::RemoteSettings;

const GITHUB_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("storm-labeler/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Remote upload is not configured")]
    Disabled,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Repository rejected the token")]
    Unauthorized,

    #[error("File already exists: {0}")]
    Conflict(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),
}

/// Receiver of finished export tables
pub trait ExportSink {
    fn is_enabled(&self) -> bool {
        true
    }

    fn submit_export(&self, table: &ExportTable) -> Result<(), UploadError>;
}

/// Sink used when remote upload is switched off
pub struct NullSink;

impl ExportSink for NullSink {
    fn is_enabled(&self) -> bool {
        false
    }

    fn submit_export(&self, _table: &ExportTable) -> Result<(), UploadError> {
        Err(UploadError::Disabled)
    }
}

/// `<directory>/storm_labels_<session>_<YYYYmmdd_HHMMSS>.csv`
pub fn remote_path(directory: &str, session_tag: &str, at: DateTime<Local>) -> String {
    let name = format!(
        "storm_labels_{}_{}.csv",
        session_tag,
        at.format("%Y%m%d_%H%M%S")
    );
    let dir = directory.trim_matches('/');
    if dir.is_empty() {
        name
    } else {
        format!("{}/{}", dir, name)
    }
}

#[derive(Debug, Serialize)]
pub struct CreateFileRequest {
    pub message: String,
    pub content: String,
}

impl CreateFileRequest {
    pub fn new(path: &str, csv: &str) -> Self {
        Self {
            message: format!("Add {}", path),
            content: general_purpose::STANDARD.encode(csv.as_bytes()),
        }
    }
}

pub struct GitHubUploader {
    http_client: reqwest::blocking::Client,
    settings: RemoteSettings,
    session_tag: String,
    api_base: String,
}

impl GitHubUploader {
    pub fn new(settings: RemoteSettings, session_tag: &str) -> Result<Self, UploadError> {
        let http_client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| UploadError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            settings,
            session_tag: session_tag.to_string(),
            api_base: GITHUB_API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_api_base(mut self, base: &str) -> Self {
        self.http_client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(5))
            .no_proxy()
            .build()
            .expect("local test client");
        self.api_base = base.trim_end_matches('/').to_string();
        self
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, self.settings.owner, self.settings.repo, path
        )
    }
}

impl ExportSink for GitHubUploader {
    fn submit_export(&self, table: &ExportTable) -> Result<(), UploadError> {
        let path = remote_path(&self.settings.directory, &self.session_tag, Local::now());
        let body = CreateFileRequest::new(&path, &table.to_csv());

        log::info!(
            "Uploading {} rows to {}/{}:{}",
            table.len(),
            self.settings.owner,
            self.settings.repo,
            path
        );

        let response = self
            .http_client
            .put(self.contents_url(&path))
            .bearer_auth(&self.settings.token)
            .header("Accept", "application/vnd.github+json")
            .json(&body)
            .send()
            .map_err(|e| UploadError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            log::info!("Upload complete: {}", path);
            return Ok(());
        }

        let text = response.text().unwrap_or_default();
        log::warn!("Upload failed ({}): {}", status, text);
        match status.as_u16() {
            401 | 403 => Err(UploadError::Unauthorized),
            422 => Err(UploadError::Conflict(path)),
            code => Err(UploadError::Api(code, text)),
        }
    }
}
