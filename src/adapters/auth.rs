use crate::adapters::rest::RestClient;
use crate::domain::model::{AuthUser, Session};
use crate::domain::ports::AuthProvider;
use crate::utils::error::{CmsError, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: i64,
    user: AuthUser,
}

/// Password auth under `/auth/v1`. A successful sign-in also authorizes the
/// shared [`RestClient`], so table writes run as the signed-in admin.
#[derive(Debug, Clone)]
pub struct RestAuth {
    http: RestClient,
}

impl RestAuth {
    pub fn new(http: RestClient) -> Self {
        Self { http }
    }
}

fn auth_error(err: CmsError) -> CmsError {
    match err {
        CmsError::BackendError { message, .. } => CmsError::AuthError { message },
        other => other,
    }
}

#[async_trait]
impl AuthProvider for RestAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let mut url = self.http.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .http
            .request(Method::POST, url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let response = RestClient::check(response, "sign in")
            .await
            .map_err(auth_error)?;

        let token: TokenResponse = response.json().await?;
        let session = Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
            user: token.user,
        };

        self.http.set_access_token(Some(session.access_token.clone()));
        Ok(session)
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        let url = self.http.endpoint("auth/v1/logout")?;
        let response = self
            .http
            .request_with_token(Method::POST, url, &session.access_token)
            .send()
            .await;

        // The local token is dropped even if the server call fails.
        self.http.set_access_token(None);

        RestClient::check(response?, "sign out")
            .await
            .map_err(auth_error)?;
        Ok(())
    }

    async fn send_password_reset(&self, email: &str, redirect_to: Option<&str>) -> Result<()> {
        let mut url = self.http.endpoint("auth/v1/recover")?;
        if let Some(redirect_to) = redirect_to {
            url.query_pairs_mut().append_pair("redirect_to", redirect_to);
        }

        let response = self
            .http
            .request(Method::POST, url)
            .json(&json!({ "email": email }))
            .send()
            .await?;
        RestClient::check(response, "password reset")
            .await
            .map_err(auth_error)?;
        Ok(())
    }

    async fn update_password(&self, session: &Session, new_password: &str) -> Result<()> {
        let url = self.http.endpoint("auth/v1/user")?;
        let response = self
            .http
            .request_with_token(Method::PUT, url, &session.access_token)
            .json(&json!({ "password": new_password }))
            .send()
            .await?;
        RestClient::check(response, "update password")
            .await
            .map_err(auth_error)?;
        Ok(())
    }

    fn clear_local_session(&self) {
        self.http.set_access_token(None);
    }
}
