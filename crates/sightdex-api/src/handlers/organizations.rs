//! Organization HTTP handlers.
//!
//! The directory itself is small, but deletion carries the most policy
//! of any endpoint: admins force-delete and kick members back to the
//! default organization, regular users only remove unreferenced rows,
//! and the default organization is never deletable.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{non_empty, ApiError, AppState};
use sightdex_core::{
    defaults, Error, OrganizationDelete, OrganizationRepository, OrganizationSummary,
    UserOrganization,
};

/// All organizations with member counts, ordered by name.
///
/// # Returns
/// - 200 OK with an array of directory rows
pub async fn list_organizations(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrganizationSummary>>, ApiError> {
    let organizations = state.db.organizations.list().await?;
    Ok(Json(organizations))
}

/// Request body for creating an organization.
#[derive(Debug, Deserialize)]
pub struct CreateOrganizationBody {
    #[serde(rename = "organizationName")]
    pub organization_name: Option<String>,
}

/// Create an organization.
///
/// # Returns
/// - 201 Created echoing the trimmed name
/// - 400 Bad Request when the name is blank or already taken
pub async fn create_organization(
    State(state): State<AppState>,
    Json(body): Json<CreateOrganizationBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let organization_name = body
        .organization_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::BadRequest("organizationName is required".to_string()))?;

    state.db.organizations.create(&organization_name).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Organization created successfully",
            "organizationName": organization_name,
        })),
    ))
}

/// Request body naming the user requesting a delete.
#[derive(Debug, Deserialize)]
pub struct DeleteOrganizationBody {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Delete an organization, subject to the requester's role.
///
/// # Returns
/// - 200 OK with reference counts (and the kicked-member count when an
///   admin forced the delete)
/// - 400 Bad Request when the delete is blocked by references, the name
///   is the protected default, or fields are missing
/// - 404 Not Found for an unknown requester or organization
pub async fn delete_organization(
    State(state): State<AppState>,
    Path(org_name): Path<String>,
    Json(body): Json<DeleteOrganizationBody>,
) -> Result<axum::response::Response, ApiError> {
    let organization_name = org_name.trim().to_string();
    if organization_name.is_empty() {
        return Err(ApiError::BadRequest("Invalid organization name".to_string()));
    }

    let user_id = non_empty(body.user_id)
        .ok_or_else(|| ApiError::BadRequest("userId is required".to_string()))?;

    match state
        .db
        .organizations
        .delete(&organization_name, &user_id)
        .await
    {
        Ok(OrganizationDelete::Blocked {
            message,
            user_count,
            event_count,
        }) => Ok((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "message": message,
                "userCount": user_count,
                "eventCount": event_count,
            })),
        )
            .into_response()),
        Ok(OrganizationDelete::Deleted {
            message,
            user_count,
            event_count,
            kicked_members,
        }) => {
            let body = match kicked_members {
                Some(kicked) => serde_json::json!({
                    "message": message,
                    "organizationName": organization_name,
                    "kickedMembers": kicked,
                    "eventCount": event_count,
                }),
                None => serde_json::json!({
                    "message": message,
                    "organizationName": organization_name,
                    "userCount": user_count,
                    "eventCount": event_count,
                }),
            };
            Ok(Json(body).into_response())
        }
        Err(Error::UserNotFound(_)) => {
            Err(ApiError::NotFound("Requesting user not found".to_string()))
        }
        Err(Error::OrganizationNotFound(_)) => {
            Err(ApiError::NotFound("Organization not found".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// A user's current organization membership.
///
/// # Returns
/// - 200 OK with the membership row
/// - 404 Not Found for an unknown user
pub async fn get_user_organization(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserOrganization>, ApiError> {
    match state.db.organizations.membership(&user_id).await {
        Ok(membership) => Ok(Json(membership)),
        Err(Error::UserNotFound(_)) => Err(ApiError::NotFound("User not found".to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Request body for a membership change.
#[derive(Debug, Deserialize)]
pub struct UpdateOrganizationBody {
    #[serde(rename = "organizationName")]
    pub organization_name: Option<String>,
}

/// Move a user to another organization.
///
/// A blank or absent name means leaving, which lands the user back in
/// the default organization.
///
/// # Returns
/// - 200 OK echoing the new membership
/// - 400 Bad Request when the target organization does not exist
/// - 404 Not Found for an unknown user
pub async fn update_user_organization(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<UpdateOrganizationBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let target = body
        .organization_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| defaults::DEFAULT_ORGANIZATION.to_string());
    let leaving = target == defaults::DEFAULT_ORGANIZATION;

    match state.db.organizations.update_membership(&user_id, &target).await {
        Ok(()) => {}
        Err(Error::UserNotFound(_)) => {
            return Err(ApiError::NotFound("User not found".to_string()))
        }
        Err(e) => return Err(e.into()),
    }

    let message = if leaving {
        "User left organization"
    } else {
        "User organization updated successfully"
    };

    Ok(Json(serde_json::json!({
        "message": message,
        "userId": user_id,
        "organizationName": target,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body_uses_camel_case_name() {
        let body: CreateOrganizationBody =
            serde_json::from_str(r#"{"organizationName": "Team Rocket"}"#).unwrap();
        assert_eq!(body.organization_name.as_deref(), Some("Team Rocket"));
    }

    #[test]
    fn test_update_body_tolerates_missing_name() {
        let body: UpdateOrganizationBody = serde_json::from_str("{}").unwrap();
        assert!(body.organization_name.is_none());
    }
}
