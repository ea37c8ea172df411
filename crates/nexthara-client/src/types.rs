//! Request and response types for the auth surface and status changes.
//!
//! The rest of the backend is exchanged as `serde_json::Value`; callers pick
//! their own shapes with [`NextharaClient::call_as`](crate::NextharaClient::call_as).

use serde::{Deserialize, Serialize};

/// Credentials for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The signed-in user, when the backend includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

/// Body for `POST /api/auth/change-password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Body for `PATCH /api/applications/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
    /// Left out of the body entirely when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Generic `{ "success": true, "message": ".." }` acknowledgement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_update_omits_missing_remarks() {
        let body = StatusUpdateRequest {
            status: "SANCTIONED".to_string(),
            remarks: None,
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"status": "SANCTIONED"}));

        let body = StatusUpdateRequest {
            status: "REJECTED".to_string(),
            remarks: Some("CIBIL below cut-off".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"status": "REJECTED", "remarks": "CIBIL below cut-off"})
        );
    }
}
