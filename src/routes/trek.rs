use actix_web::{http::header, web, HttpResponse};
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::bookings::BookingInput;
use crate::services::booking_service::HandoffOutcome;
use crate::state::AppState;

/*
    /api/treks/{id}
*/
pub async fn get_by_id(path: web::Path<String>, state: web::Data<AppState>) -> HttpResponse {
    let id = path.into_inner();

    match state.resolver.resolve(&id).await {
        Ok(trek) => {
            if !trek.resolution.is_authoritative() {
                log::info!("Serving placeholder content for trek {}", id);
            }
            HttpResponse::Ok().json(trek)
        }
        Err(e) => {
            log::warn!("{}", e);
            HttpResponse::NotFound().json(json!({ "error": "Trek Not Found", "home": "/" }))
        }
    }
}

fn parse_booking_input(body: &[u8]) -> Result<BookingInput, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(BookingInput::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid booking details: {}", e)))
}

/*
    /api/treks/{id}/bookings
*/
pub async fn create_booking(
    path: web::Path<String>,
    user: Option<AuthenticatedUser>,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let identity = user.map(|u| u.identity());

    // Anonymous callers are sent to log in before any booking input is read.
    let input = match identity {
        Some(_) => parse_booking_input(&body)?,
        None => BookingInput::default(),
    };

    let outcome = state.handoff.submit(&id, identity.as_ref(), input).await?;

    Ok(match outcome {
        HandoffOutcome::LoginRequired {
            login_path,
            redirect_to,
        } => HttpResponse::Unauthorized().json(json!({
            "login": login_path,
            "redirectTo": redirect_to,
        })),
        HandoffOutcome::Confirmed {
            booking_id,
            confirmation_path,
        } => HttpResponse::Created()
            .insert_header((header::LOCATION, confirmation_path.clone()))
            .json(json!({
                "id": booking_id,
                "confirmation": confirmation_path,
            })),
    })
}
