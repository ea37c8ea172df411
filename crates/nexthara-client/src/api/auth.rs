//! Auth API.

use serde_json::Value;

use crate::call::CallArgs;
use crate::client::NextharaClient;
use crate::error::Result;
use crate::types::{ChangePasswordRequest, LoginRequest, LoginResponse};

/// Auth API client.
pub struct AuthApi {
    client: NextharaClient,
}

impl AuthApi {
    pub(crate) fn new(client: NextharaClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token and store it in the session.
    ///
    /// Bad credentials come back as `RequestFailed`; they do not count as a
    /// session expiry.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .client
            .call_as("auth.login", CallArgs::new().body(&request)?)
            .await?;

        let session = self.client.session();
        session.set_token(response.token.clone())?;
        if let Some(user) = &response.user {
            session.set_current_user(user.clone());
        }
        tracing::info!("Logged in");
        Ok(response)
    }

    /// Fetch the signed-in user and cache it on the session.
    ///
    /// Accepts either a bare user object or one wrapped as `{ "user": .. }`.
    pub async fn me(&self) -> Result<Value> {
        let body: Value = self.client.call("auth.me", CallArgs::new()).await?;
        let user = match body {
            Value::Object(mut map) if map.get("user").is_some_and(Value::is_object) => {
                map.remove("user").unwrap_or(Value::Null)
            }
            other => other,
        };
        self.client.session().set_current_user(user.clone());
        Ok(user)
    }

    /// Change the signed-in user's password.
    pub async fn change_password(&self, current: &str, new: &str) -> Result<Value> {
        let request = ChangePasswordRequest {
            current_password: current.to_string(),
            new_password: new.to_string(),
        };
        self.client
            .call("auth.change_password", CallArgs::new().body(&request)?)
            .await
    }

    /// Drop the local session and notify logout listeners.
    pub fn logout(&self) -> Result<()> {
        self.client.session().logout()
    }
}
