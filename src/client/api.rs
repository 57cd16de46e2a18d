use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::accounts::dto::{
    AccountResponse, DeleteResponse, LoginRequest, LoginResponse, RegisterRequest,
    UpdateAccountRequest,
};
use crate::error::ErrorResponse;

#[derive(Debug, Error)]
pub enum ClientError {
    /// A service-side failure. `message` is the service's `error` field,
    /// verbatim, so the UI can show it directly in an alert.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Typed client for the account service HTTP surface.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` runs up to and including the API prefix,
    /// e.g. `http://localhost:8080/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<AccountResponse, ClientError> {
        let resp = self
            .http
            .post(self.endpoint("/user/register"))
            .json(request)
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let request = LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        };
        let resp = self
            .http
            .post(self.endpoint("/user/login"))
            .json(&request)
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn list_accounts(&self) -> Result<Vec<AccountResponse>, ClientError> {
        let resp = self.http.get(self.endpoint("/user")).send().await?;
        Self::decode(resp).await
    }

    pub async fn get_account(&self, id: &str) -> Result<AccountResponse, ClientError> {
        let resp = self
            .http
            .get(self.endpoint(&format!("/user/{id}")))
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn update_account(
        &self,
        id: &str,
        request: &UpdateAccountRequest,
    ) -> Result<AccountResponse, ClientError> {
        let resp = self
            .http
            .put(self.endpoint(&format!("/user/{id}")))
            .json(request)
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn delete_account(&self, id: &str) -> Result<DeleteResponse, ClientError> {
        let resp = self
            .http
            .delete(self.endpoint(&format!("/user/{id}")))
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }
        let message = resp
            .json::<ErrorResponse>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
