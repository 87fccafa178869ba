use actix_web::{web, HttpResponse};

use crate::db::store::BOOKINGS;
use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::bookings::{BookingDocument, BookingView};
use crate::state::AppState;

/*
    /api/bookings/{id}
*/
pub async fn get_by_id(
    path: web::Path<String>,
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let booking_id = path.into_inner();

    let stored = state
        .store
        .get(BOOKINGS, &booking_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    let booking: BookingDocument = stored.decode(BOOKINGS)?;
    if booking.user_id.as_deref() != Some(user.user_id.as_str()) {
        return Err(ApiError::Forbidden(
            "This booking belongs to another user".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(BookingView::from_document(stored.key, booking)))
}
