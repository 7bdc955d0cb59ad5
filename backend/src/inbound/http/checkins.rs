//! Check-in HTTP handlers.
//!
//! ```text
//! POST   /api/v1/checkins
//! PUT    /api/v1/checkins/{id}/checkout
//! DELETE /api/v1/checkins/{id}
//! GET    /api/v1/checkins/venue/{venueId}
//! GET    /api/v1/checkins/user/{userId}
//! ```
//!
//! Failures of check-in and checkout pass through the configured
//! [`ErrorStatusPolicy`](crate::inbound::http::ErrorStatusPolicy) before they
//! reach the client.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CheckInRequest, CheckinView};
use crate::domain::{Checkin, CheckinId, Error, UserId, VenueId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, require_id};

const CHECKIN_ID: FieldName = FieldName::new("id");
const USER_ID: FieldName = FieldName::new("userId");
const VENUE_ID: FieldName = FieldName::new("venueId");

/// Request payload for checking a user in.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckinRequestBody {
    #[schema(format = "uuid")]
    pub user_id: Option<String>,
    #[schema(format = "uuid")]
    pub venue_id: Option<String>,
}

/// Check-in joined with the username and venue name.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckinResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    pub username: Option<String>,
    #[schema(format = "uuid")]
    pub venue_id: String,
    pub venue_name: Option<String>,
    #[schema(format = "date-time")]
    pub checkin_time: String,
    /// Absent while the user is still checked in.
    #[schema(format = "date-time")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_time: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<CheckinView> for CheckinResponseBody {
    fn from(view: CheckinView) -> Self {
        let CheckinView {
            checkin,
            username,
            venue_name,
        } = view;
        Self {
            id: checkin.id().to_string(),
            user_id: checkin.user_id().to_string(),
            username,
            venue_id: checkin.venue_id().to_string(),
            venue_name,
            checkin_time: checkin.checkin_time().to_rfc3339(),
            checkout_time: checkin.checkout_time().map(|at| at.to_rfc3339()),
            created_at: checkin.created_at().to_rfc3339(),
            updated_at: checkin.updated_at().to_rfc3339(),
        }
    }
}

/// Active check-ins at one venue.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCheckinsResponseBody {
    pub count: usize,
    pub checkins: Vec<CheckinResponseBody>,
}

async fn describe_all(
    state: &HttpState,
    checkins: Vec<Checkin>,
) -> ApiResult<Vec<CheckinResponseBody>> {
    let views = state.checkins_query.describe(checkins).await?;
    Ok(views.into_iter().map(CheckinResponseBody::from).collect())
}

async fn describe_one(state: &HttpState, checkin: Checkin) -> ApiResult<CheckinResponseBody> {
    describe_all(state, vec![checkin])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::internal("checkin view missing from describe result"))
}

/// Check a user in to a venue.
///
/// Any other active check-in of the user is closed at the same instant.
#[utoipa::path(
    post,
    path = "/api/v1/checkins",
    request_body = CheckinRequestBody,
    responses(
        (status = 201, description = "Checked in", body = CheckinResponseBody),
        (status = 400, description = "Invalid request, or rule violation under the legacy status policy", body = ErrorSchema),
        (status = 404, description = "Unknown user or venue (unified status policy)", body = ErrorSchema),
        (status = 409, description = "Already checked in or cooling down (unified status policy)", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["checkins"],
    operation_id = "checkIn"
)]
#[post("/checkins")]
pub async fn check_in(
    state: web::Data<HttpState>,
    payload: web::Json<CheckinRequestBody>,
) -> ApiResult<HttpResponse> {
    let CheckinRequestBody { user_id, venue_id } = payload.into_inner();
    let request = CheckInRequest {
        user_id: require_id::<UserId>(user_id, USER_ID)?,
        venue_id: require_id::<VenueId>(venue_id, VENUE_ID)?,
    };

    let checkin = state
        .checkins
        .check_in(request)
        .await
        .map_err(|error| state.error_status.for_check_in(error))?;
    let body = describe_one(&state, checkin).await?;
    Ok(HttpResponse::Created().json(body))
}

/// Check a user out.
#[utoipa::path(
    put,
    path = "/api/v1/checkins/{id}/checkout",
    params(("id" = String, Path, format = "uuid", description = "Check-in identifier")),
    responses(
        (status = 200, description = "Checked out", body = CheckinResponseBody),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Unknown check-in, or already closed under the legacy status policy", body = ErrorSchema),
        (status = 409, description = "Already checked out (unified status policy)", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["checkins"],
    operation_id = "checkOut"
)]
#[put("/checkins/{id}/checkout")]
pub async fn check_out(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CheckinResponseBody>> {
    let checkin_id: CheckinId = parse_id(path.into_inner(), CHECKIN_ID)?;
    let checkin = state
        .checkins
        .check_out(checkin_id)
        .await
        .map_err(|error| state.error_status.for_check_out(error))?;
    Ok(web::Json(describe_one(&state, checkin).await?))
}

/// Delete a check-in record.
#[utoipa::path(
    delete,
    path = "/api/v1/checkins/{id}",
    params(("id" = String, Path, format = "uuid", description = "Check-in identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Unknown check-in", body = ErrorSchema)
    ),
    tags = ["checkins"],
    operation_id = "deleteCheckin"
)]
#[delete("/checkins/{id}")]
pub async fn delete_checkin(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let checkin_id: CheckinId = parse_id(path.into_inner(), CHECKIN_ID)?;
    state.checkins.delete_checkin(checkin_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List who is currently checked in at a venue.
#[utoipa::path(
    get,
    path = "/api/v1/checkins/venue/{venueId}",
    params(("venueId" = String, Path, format = "uuid", description = "Venue identifier")),
    responses(
        (status = 200, description = "Active check-ins", body = ActiveCheckinsResponseBody),
        (status = 400, description = "Invalid identifier", body = ErrorSchema)
    ),
    tags = ["checkins"],
    operation_id = "activeCheckinsByVenue"
)]
#[get("/checkins/venue/{venue_id}")]
pub async fn active_by_venue(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ActiveCheckinsResponseBody>> {
    let venue_id: VenueId = parse_id(path.into_inner(), VENUE_ID)?;
    let active = state.checkins_query.active_for_venue(venue_id).await?;
    let checkins = describe_all(&state, active).await?;
    Ok(web::Json(ActiveCheckinsResponseBody {
        count: checkins.len(),
        checkins,
    }))
}

/// A user's check-in history, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/checkins/user/{userId}",
    params(("userId" = String, Path, format = "uuid", description = "User identifier")),
    responses(
        (status = 200, description = "Check-in history", body = [CheckinResponseBody]),
        (status = 400, description = "Invalid identifier", body = ErrorSchema)
    ),
    tags = ["checkins"],
    operation_id = "checkinHistoryByUser"
)]
#[get("/checkins/user/{user_id}")]
pub async fn history_by_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<CheckinResponseBody>>> {
    let user_id: UserId = parse_id(path.into_inner(), USER_ID)?;
    let history = state.checkins_query.history_for_user(user_id).await?;
    Ok(web::Json(describe_all(&state, history).await?))
}

#[cfg(test)]
#[path = "checkins_tests.rs"]
mod tests;
