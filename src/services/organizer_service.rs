use bson::{doc, DateTime};
use serde::Serialize;
use thiserror::Error;

use crate::db::store::{DocumentStore, Filter, StoreError, BOOKINGS, USERS};
use crate::models::{
    bookings::{BookingDocument, BookingStats, BookingStatus, BookingView},
    user::OrganizerSettingsInput,
};

#[derive(Debug, Error)]
pub enum OrganizerError {
    #[error("Booking not found")]
    BookingNotFound,
    #[error("Only the trek organizer may change this booking")]
    NotOwner,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Serialize)]
pub struct OrganizerBookings {
    pub bookings: Vec<BookingView>,
    pub stats: BookingStats,
}

pub fn booking_stats(bookings: &[BookingDocument]) -> BookingStats {
    let status = |b: &BookingDocument, wanted: &str| b.status.as_deref() == Some(wanted);

    BookingStats {
        total: bookings.len(),
        pending: bookings.iter().filter(|b| status(b, "pending")).count(),
        revenue: bookings
            .iter()
            .filter(|b| status(b, "confirmed"))
            .filter_map(|b| b.amount.as_ref().and_then(|a| a.as_f64()))
            .filter(|a| a.is_finite())
            .sum(),
    }
}

/// Every booking on the organizer's treks, newest first, plus dashboard stats.
pub async fn organizer_bookings(
    store: &dyn DocumentStore,
    organizer_id: &str,
) -> Result<OrganizerBookings, StoreError> {
    let stored = store
        .find(BOOKINGS, Filter::eq("organizerId", organizer_id))
        .await?;

    let mut bookings = Vec::with_capacity(stored.len());
    for document in stored {
        match document.decode::<BookingDocument>(BOOKINGS) {
            Ok(booking) => bookings.push((document.key, booking)),
            Err(e) => log::warn!("Skipping unreadable booking: {}", e),
        }
    }
    bookings.sort_by(|(_, a), (_, b)| b.created_at.cmp(&a.created_at));

    let (ids, documents): (Vec<String>, Vec<BookingDocument>) = bookings.into_iter().unzip();
    let stats = booking_stats(&documents);

    Ok(OrganizerBookings {
        bookings: ids
            .into_iter()
            .zip(documents)
            .map(|(id, b)| BookingView::from_document(id, b))
            .collect(),
        stats,
    })
}

pub async fn update_booking_status(
    store: &dyn DocumentStore,
    organizer_id: &str,
    booking_id: &str,
    status: BookingStatus,
) -> Result<(), OrganizerError> {
    let stored = store
        .get(BOOKINGS, booking_id)
        .await?
        .ok_or(OrganizerError::BookingNotFound)?;

    if stored.str_field("organizerId") != Some(organizer_id) {
        log::warn!(
            "User {} tried to change booking {} they do not organize",
            organizer_id,
            booking_id
        );
        return Err(OrganizerError::NotOwner);
    }

    let value = bson::to_bson(&status).map_err(StoreError::from)?;
    store
        .update(
            BOOKINGS,
            booking_id,
            doc! { "status": value, "updatedAt": DateTime::now() },
        )
        .await?;
    log::info!("Booking {} status set to {:?}", booking_id, status);
    Ok(())
}

pub async fn update_settings(
    store: &dyn DocumentStore,
    user_id: &str,
    input: &OrganizerSettingsInput,
) -> Result<(), StoreError> {
    store
        .update(
            USERS,
            user_id,
            doc! {
                "displayName": &input.display_name,
                "organizationDetails.phone": &input.phone,
                "organizationDetails.website": &input.website,
                "updatedAt": DateTime::now(),
            },
        )
        .await
}
