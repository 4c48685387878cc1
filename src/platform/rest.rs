//! Blocking REST implementation of [`PlatformClient`].
//!
//! Endpoints are the platform's v1.1 REST surface; media uploads go to the
//! dedicated upload host as multipart form data. Every call gets a fresh
//! OAuth header and a 30 second timeout — the original never timed out at
//! all, which left a hung connection hanging the whole run.

use super::client::{ApiError, PlatformClient};
use super::oauth;
use super::types::{AuthIdentity, Follower, FollowerPage, MediaUpload, PostReceipt};
use crate::config::Credentials;
use std::path::Path;
use std::time::Duration;

const API_BASE: &str = "https://api.twitter.com/1.1";
const UPLOAD_BASE: &str = "https://upload.twitter.com/1.1";
const CALL_TIMEOUT: Duration = Duration::from_secs(30);

pub struct RestClient {
    http: reqwest::blocking::Client,
    credentials: Credentials,
}

impl RestClient {
    pub fn new(credentials: Credentials) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("valentine/", env!("CARGO_PKG_VERSION")))
            .timeout(CALL_TIMEOUT)
            .build()?;
        Ok(Self { http, credentials })
    }

    fn auth_header(&self, method: &str, url: &str, params: &[(&str, &str)]) -> String {
        oauth::authorization_header(
            method,
            url,
            params,
            &self.credentials,
            &oauth::nonce(),
            oauth::timestamp(),
        )
    }

    fn send(
        &self,
        url: &str,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<reqwest::blocking::Response, ApiError> {
        request.send().map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(url.to_string())
            } else {
                ApiError::Http(e)
            }
        })
    }

    /// Map a non-success response into the auth/rejection taxonomy.
    fn check(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let code = status.as_u16();
        let body = response.text().unwrap_or_default();
        if code == 401 {
            Err(ApiError::Unauthorized { status: code, body })
        } else {
            Err(ApiError::Rejected { status: code, body })
        }
    }
}

impl PlatformClient for RestClient {
    fn verify_credentials(&self) -> Result<AuthIdentity, ApiError> {
        let url = format!("{}/account/verify_credentials.json", API_BASE);
        let header = self.auth_header("GET", &url, &[]);

        let response = self.send(
            &url,
            self.http.get(&url).header(reqwest::header::AUTHORIZATION, header),
        )?;
        Ok(Self::check(response)?.json()?)
    }

    fn list_followers(&self, count: u32) -> Result<Vec<Follower>, ApiError> {
        let url = format!("{}/followers/list.json", API_BASE);
        let count = count.to_string();
        let params = [("count", count.as_str())];
        let header = self.auth_header("GET", &url, &params);

        let response = self.send(
            &url,
            self.http
                .get(&url)
                .query(&params)
                .header(reqwest::header::AUTHORIZATION, header),
        )?;
        let page: FollowerPage = Self::check(response)?.json()?;
        Ok(page.users)
    }

    fn upload_media(&self, path: &Path) -> Result<MediaUpload, ApiError> {
        let url = format!("{}/media/upload.json", UPLOAD_BASE);
        // Multipart body parameters are excluded from the OAuth signature.
        let header = self.auth_header("POST", &url, &[]);

        let form = reqwest::blocking::multipart::Form::new().file("media", path)?;
        let response = self.send(
            &url,
            self.http
                .post(&url)
                .multipart(form)
                .header(reqwest::header::AUTHORIZATION, header),
        )?;
        let upload: MediaUpload = Self::check(response)?.json()?;
        if upload.media_id.is_empty() {
            return Err(ApiError::MissingMediaId);
        }
        Ok(upload)
    }

    fn post_status(&self, text: &str, media_id: &str) -> Result<PostReceipt, ApiError> {
        let url = format!("{}/statuses/update.json", API_BASE);
        let params = [("status", text), ("media_ids", media_id)];
        let header = self.auth_header("POST", &url, &params);

        let response = self.send(
            &url,
            self.http
                .post(&url)
                .form(&params)
                .header(reqwest::header::AUTHORIZATION, header),
        )?;
        Ok(Self::check(response)?.json()?)
    }
}
