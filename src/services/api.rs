// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Blocking REST client for the portfolio API.

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response, multipart};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::Config;
use crate::models::work::{Category, NewWork, Work};

/// Failures talking to the API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered with status {0}")]
    Status(StatusCode),
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("failed to read upload: {0}")]
    Upload(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status for rejections, `None` for transport-level failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status(status) => Some(*status),
            ApiError::Transport(err) => err.status(),
            ApiError::Endpoint(_) | ApiError::Upload(_) => None,
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[allow(dead_code)]
    user_id: Option<u64>,
    token: String,
}

/// Thin wrapper over a shared `reqwest` client rooted at the API base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base: Url,
    http: Client,
}

impl ApiClient {
    /// Build a client with the configured base URL and timeout.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self {
            base: config.api_base.clone(),
            http,
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    /// `GET works`.
    pub fn works(&self) -> Result<Vec<Work>, ApiError> {
        let resp = send(self.http.get(self.endpoint("works")?))?;
        Ok(resp.json()?)
    }

    /// `GET categories` (server categories only, without "Tous").
    pub fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let resp = send(self.http.get(self.endpoint("categories")?))?;
        Ok(resp.json()?)
    }

    /// `POST users/login`; returns the bearer token.
    pub fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let request = self
            .http
            .post(self.endpoint("users/login")?)
            .json(&LoginRequest { email, password });
        let resp: LoginResponse = send(request)?.json()?;
        Ok(resp.token)
    }

    /// `DELETE works/{id}` with the bearer token.
    pub fn delete_work(&self, id: u64, token: &str) -> Result<(), ApiError> {
        let request = self
            .http
            .delete(self.endpoint(&format!("works/{id}"))?)
            .bearer_auth(token);
        send(request)?;
        Ok(())
    }

    /// `POST works` as multipart (`image`, `title`, `category`); returns the created work.
    pub fn create_work(&self, work: &NewWork, token: &str) -> Result<Work, ApiError> {
        let form = multipart::Form::new()
            .text("title", work.title.clone())
            .text("category", work.category_id.to_string())
            .file("image", &work.image)?;
        let request = self
            .http
            .post(self.endpoint("works")?)
            .bearer_auth(token)
            .multipart(form);
        Ok(send(request)?.json()?)
    }
}

fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let resp = request.send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }
    Ok(resp)
}
