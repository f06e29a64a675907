//! Event HTTP handlers.
//!
//! Events are listed publicly; joining and leaving maintain both a join
//! report and the event's participant counter, which the repository
//! keeps in step inside one transaction.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{non_empty, ApiError, AppState};
use sightdex_core::{CreateEventRequest, Event, EventRepository, EventSummary};

/// All events, newest first, with live participant counts.
///
/// # Returns
/// - 200 OK with an array of event rows
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventSummary>>, ApiError> {
    let events = state.db.events.list().await?;
    Ok(Json(events))
}

/// Events the user currently holds a join report for.
pub async fn list_user_events(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = state.db.events.list_for_user(&user_id).await?;
    Ok(Json(events))
}

/// Create an event under a freshly generated id.
///
/// # Returns
/// - 201 Created with the new event id
pub async fn create_event(
    State(state): State<AppState>,
    Json(body): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let event_id = state.db.events.create(body).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Event created successfully.",
            "eventId": event_id,
        })),
    ))
}

/// Request body naming the joining or leaving user.
#[derive(Debug, Deserialize)]
pub struct EventMemberBody {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Join an event.
///
/// # Returns
/// - 201 Created with the join report id
/// - 400 Bad Request when userId is missing
/// - 404 Not Found for an unknown event
pub async fn join_event(
    State(state): State<AppState>,
    Path(event_id): Path<i32>,
    Json(body): Json<EventMemberBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let user_id = non_empty(body.user_id)
        .ok_or_else(|| ApiError::BadRequest("userId is required".to_string()))?;

    let report_id = state.db.events.join(event_id, &user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Successfully joined event.",
            "reportId": report_id,
        })),
    ))
}

/// Leave an event, dropping the user's join report(s).
///
/// # Returns
/// - 200 OK on success
/// - 400 Bad Request when userId is missing
pub async fn leave_event(
    State(state): State<AppState>,
    Path(event_id): Path<i32>,
    Json(body): Json<EventMemberBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = non_empty(body.user_id)
        .ok_or_else(|| ApiError::BadRequest("userId is required".to_string()))?;

    state.db.events.leave(event_id, &user_id).await?;

    Ok(Json(serde_json::json!({
        "message": "Successfully left event.",
    })))
}

/// Delete an event and its join reports.
///
/// # Returns
/// - 200 OK on success
/// - 404 Not Found for an unknown event
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.events.delete(event_id).await?;

    Ok(Json(serde_json::json!({
        "message": "Event deleted successfully.",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_event_body_parses_wire_names() {
        let body: CreateEventRequest = serde_json::from_str(
            r#"{
                "eventName": "Raid Night",
                "description": "Weekly raid",
                "location": "Pier 39",
                "time": "2026-03-01T18:00:00Z",
                "organizationName": "Team Valor"
            }"#,
        )
        .unwrap();
        assert_eq!(body.event_name, "Raid Night");
        assert_eq!(body.organization_name.as_deref(), Some("Team Valor"));
        assert_eq!(body.participant_count, 0);
        assert!(body.event_time.is_some());
    }

    #[test]
    fn test_create_event_body_defaults_optional_fields() {
        let body: CreateEventRequest =
            serde_json::from_str(r#"{"eventName": "Meetup"}"#).unwrap();
        assert_eq!(body.description, "");
        assert_eq!(body.location, "");
        assert!(body.event_time.is_none());
        assert!(body.organization_name.is_none());
    }
}
