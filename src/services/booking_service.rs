use async_trait::async_trait;
use bson::{DateTime, Document};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use thiserror::Error;

use crate::db::store::{DocumentStore, StoreError, BOOKINGS};
use crate::models::{
    bookings::{BookingInput, BookingRecord, BookingStatus, SavedBooking},
    trek::TrekView,
    user::UserIdentity,
};
use crate::services::{
    content_generation_service::title_from_identifier,
    pricing_service::PricingService,
    trek_resolution_service::{ResolutionError, TrekResolver},
};

pub const LOGIN_PATH: &str = "/login";
pub const BOOKING_PLATFORM: &str = "web";

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("participants must be at least 1")]
    InvalidParticipants,
    #[error("booking details could not be encoded: {0}")]
    Encode(#[from] bson::ser::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    TrekUnavailable(#[from] ResolutionError),
}

/// Durably records a booking and hands back its identifier.
#[async_trait]
pub trait BookingService: Send + Sync {
    async fn save_booking(&self, record: BookingRecord) -> Result<SavedBooking, BookingError>;
}

pub struct StoreBookingService {
    store: Arc<dyn DocumentStore>,
}

impl StoreBookingService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BookingService for StoreBookingService {
    async fn save_booking(&self, record: BookingRecord) -> Result<SavedBooking, BookingError> {
        let document = record.into_document()?;
        let id = self.store.add(BOOKINGS, document).await?;
        log::info!("Saved booking {}", id);
        Ok(SavedBooking { id })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HandoffOutcome {
    /// No signed-in user: send them to log in and come back to the trek.
    LoginRequired {
        login_path: String,
        redirect_to: String,
    },
    Confirmed {
        booking_id: String,
        confirmation_path: String,
    },
}

pub fn trek_path(identifier: &str) -> String {
    format!("/treks/{}", identifier)
}

pub fn confirmation_path(booking_id: &str) -> String {
    format!("/booking-confirmation/{}", booking_id)
}

fn details_document(input: &BookingInput) -> Result<Document, BookingError> {
    Ok(bson::to_document(&input.details)?)
}

/// Merge the user's booking parameters, the resolved trek and the user's
/// identity into one record.
pub fn compose_booking(
    identifier: &str,
    trek: &TrekView,
    user: &UserIdentity,
    input: &BookingInput,
) -> Result<BookingRecord, BookingError> {
    let participants = input.participants.unwrap_or(1);
    if participants == 0 {
        return Err(BookingError::InvalidParticipants);
    }

    let source = &trek.source;
    let trek_name = source
        .display_name()
        .map(str::to_string)
        .unwrap_or_else(|| title_from_identifier(identifier));
    let raw = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

    Ok(BookingRecord {
        user_id: Some(user.id.clone()),
        user_email: user.email.clone(),
        user_display_name: user.display_name.clone(),
        trek_id: trek.id.clone(),
        trek_title: trek_name.clone(),
        trek_name,
        trek_image: trek.image.clone(),
        trek_days: trek.days,
        trek_price: trek.price.clone(),
        trek_location: trek.location.clone(),
        trek_difficulty: raw(&source.difficulty),
        trek_country: raw(&source.country),
        trek_season: raw(&source.season),
        trek_capacity: source.capacity.as_ref().map(|c| c.to_display()),
        trek_altitude: source.altitude.as_ref().map(|a| a.to_display()),
        organizer_id: raw(&source.organizer_id),
        participants,
        amount: PricingService::total_cost(source.price.as_ref(), participants),
        booking_timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        booking_platform: BOOKING_PLATFORM.to_string(),
        status: BookingStatus::Pending,
        created_at: DateTime::now(),
        details: details_document(input)?,
    })
}

/// Resolves the trek, builds the booking and submits it.
#[derive(Clone)]
pub struct BookingHandoff {
    resolver: TrekResolver,
    bookings: Arc<dyn BookingService>,
}

impl BookingHandoff {
    pub fn new(resolver: TrekResolver, bookings: Arc<dyn BookingService>) -> Self {
        Self { resolver, bookings }
    }

    pub async fn submit(
        &self,
        identifier: &str,
        user: Option<&UserIdentity>,
        input: BookingInput,
    ) -> Result<HandoffOutcome, BookingError> {
        let user = match user {
            Some(user) => user,
            None => {
                return Ok(HandoffOutcome::LoginRequired {
                    login_path: LOGIN_PATH.to_string(),
                    redirect_to: trek_path(identifier),
                })
            }
        };

        let trek = self.resolver.resolve(identifier).await?;
        let record = compose_booking(identifier, &trek, user, &input)?;

        match self.bookings.save_booking(record).await {
            Ok(saved) => Ok(HandoffOutcome::Confirmed {
                confirmation_path: confirmation_path(&saved.id),
                booking_id: saved.id,
            }),
            Err(e) => {
                log::error!("Error saving booking for {}: {}", identifier, e);
                Err(e)
            }
        }
    }
}
