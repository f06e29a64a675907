//! Account HTTP handlers.
//!
//! Registration and login against the users table. There is no session
//! or token layer; after a successful login the client simply keeps the
//! user id for later requests.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::{non_empty, ApiError, AppState};
use sightdex_core::UserRepository;

/// Request body shared by registration and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub password: Option<String>,
}

/// Create an account under the default organization.
///
/// # Returns
/// - 201 Created on success
/// - 400 Bad Request when fields are missing or the id is taken
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let (user_id, password) = match (non_empty(body.user_id), non_empty(body.password)) {
        (Some(user_id), Some(password)) => (user_id, password),
        _ => {
            return Err(ApiError::BadRequest(
                "Username and password are required".to_string(),
            ))
        }
    };

    state.db.users.register(&user_id, &password).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Registration successful",
        })),
    ))
}

/// Authenticate a user.
///
/// Missing fields get the same response as a wrong password, so the
/// endpoint never hints at which part was rejected.
///
/// # Returns
/// - 200 OK with the user row (digest excluded)
/// - 401 Unauthorized on bad credentials
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (user_id, password) = match (non_empty(body.user_id), non_empty(body.password)) {
        (Some(user_id), Some(password)) => (user_id, password),
        _ => {
            return Err(ApiError::Unauthorized(
                "Invalid username or password. Please try again.".to_string(),
            ))
        }
    };

    let user = state.db.users.verify_credentials(&user_id, &password).await?;

    Ok(Json(serde_json::json!({
        "message": "Login successful",
        "user": user,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_body_uses_camel_case_user_id() {
        let body: CredentialsBody =
            serde_json::from_str(r#"{"userId": "ash", "password": "pikachu"}"#).unwrap();
        assert_eq!(body.user_id.as_deref(), Some("ash"));
        assert_eq!(body.password.as_deref(), Some("pikachu"));
    }

    #[test]
    fn test_credentials_body_tolerates_missing_fields() {
        let body: CredentialsBody = serde_json::from_str("{}").unwrap();
        assert!(body.user_id.is_none());
        assert!(body.password.is_none());
    }
}
