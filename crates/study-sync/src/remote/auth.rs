//! Auth Client
//!
//! `/auth/login` and `/auth/register`. Persisting the returned user is the
//! session gate's job, not this client's.

use tracing::info;

use super::http::HttpClient;
use crate::config::ApiConfig;
use crate::domain::{Credentials, Registration, User};
use crate::error::SyncResult;

const NETWORK_ERROR: &str = "Network error";

#[derive(Debug, Clone)]
pub struct AuthClient {
    http: HttpClient,
    login_url: String,
    register_url: String,
}

impl AuthClient {
    pub fn new(http: HttpClient, config: &ApiConfig) -> Self {
        Self {
            http,
            login_url: config.endpoint("auth/login"),
            register_url: config.endpoint("auth/register"),
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> SyncResult<User> {
        credentials.validate()?;
        let request = self.http.inner().post(&self.login_url).json(credentials);
        let response = self.http.execute_with(request, NETWORK_ERROR, "Login failed").await?;
        let user: User = HttpClient::decode(response, "Login failed").await?;
        info!(user = %user.id, "signed in");
        Ok(user)
    }

    pub async fn register(&self, registration: &Registration) -> SyncResult<User> {
        registration.validate()?;
        let request = self.http.inner().post(&self.register_url).json(registration);
        let response = self.http.execute_with(request, NETWORK_ERROR, "Registration failed").await?;
        let user: User = HttpClient::decode(response, "Registration failed").await?;
        info!(user = %user.id, "registered");
        Ok(user)
    }
}
