use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::{bookings::StatusUpdate, user::OrganizerSettingsInput};
use crate::services::organizer_service;
use crate::state::AppState;

/*
    /api/organizer/bookings
*/
pub async fn list_bookings(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let result = organizer_service::organizer_bookings(state.store.as_ref(), &user.user_id).await?;
    Ok(HttpResponse::Ok().json(result))
}

/*
    /api/organizer/bookings/{id}/status
*/
pub async fn update_booking_status(
    path: web::Path<String>,
    user: AuthenticatedUser,
    body: web::Json<StatusUpdate>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let booking_id = path.into_inner();
    let status = body.into_inner().status;

    organizer_service::update_booking_status(
        state.store.as_ref(),
        &user.user_id,
        &booking_id,
        status,
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "id": booking_id, "status": status })))
}

/*
    /api/organizer/settings
*/
pub async fn update_settings(
    user: AuthenticatedUser,
    body: web::Json<OrganizerSettingsInput>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    organizer_service::update_settings(state.store.as_ref(), &user.user_id, &body).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Settings updated" })))
}
