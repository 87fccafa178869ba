use bson::{DateTime, Document};
use serde::{Deserialize, Serialize};

use super::trek::FlexValue;
use crate::db::store::strip_absent;
use crate::services::pricing_service::PricingService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// What the booking modal posts for a trek.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    pub participants: Option<u32>,
    /// Remaining modal fields (dates, contact details, notes) are copied into
    /// the booking as-is.
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// The record handed to the booking service. `None` fields are never written.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_display_name: Option<String>,
    pub trek_id: String,
    pub trek_name: String,
    pub trek_title: String,
    pub trek_image: String,
    pub trek_days: u32,
    pub trek_price: String,
    pub trek_location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trek_difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trek_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trek_season: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trek_capacity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trek_altitude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer_id: Option<String>,
    pub participants: u32,
    pub amount: f64,
    pub booking_timestamp: String,
    pub booking_platform: String,
    pub status: BookingStatus,
    pub created_at: DateTime,
    /// Extra booking-modal fields. Composed fields take precedence on clashes.
    #[serde(skip)]
    pub details: Document,
}

impl BookingRecord {
    /// Flatten into the stored shape with every absent value removed.
    pub fn into_document(self) -> Result<Document, bson::ser::Error> {
        let mut document = bson::to_document(&self)?;
        for (key, value) in self.details {
            if !document.contains_key(&key) {
                document.insert(key, value);
            }
        }
        strip_absent(&mut document);
        Ok(document)
    }
}

/// A booking as read back from the `bookings` collection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingDocument {
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub user_display_name: Option<String>,
    pub trek_id: Option<String>,
    pub trek_name: Option<String>,
    pub trek_image: Option<String>,
    pub trek_days: Option<FlexValue>,
    pub trek_price: Option<String>,
    pub trek_location: Option<String>,
    pub organizer_id: Option<String>,
    pub participants: Option<FlexValue>,
    pub amount: Option<FlexValue>,
    pub booking_timestamp: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trek_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trek_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trek_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trek_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trek_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<String>,
    pub amount: f64,
    pub formatted_amount: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl BookingView {
    pub fn from_document(id: String, booking: BookingDocument) -> Self {
        let amount = booking
            .amount
            .as_ref()
            .and_then(|a| a.as_f64())
            .unwrap_or(0.0);
        Self {
            id,
            trek_id: booking.trek_id,
            trek_name: booking.trek_name,
            trek_image: booking.trek_image,
            trek_price: booking.trek_price,
            trek_location: booking.trek_location,
            user_email: booking.user_email,
            user_display_name: booking.user_display_name,
            participants: booking.participants.map(|p| p.to_display()),
            amount,
            formatted_amount: PricingService::format_amount(amount),
            status: booking.status.unwrap_or_else(|| "unknown".to_string()),
            booking_timestamp: booking.booking_timestamp,
            created_at: booking
                .created_at
                .and_then(|d| d.try_to_rfc3339_string().ok()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    pub total: usize,
    pub revenue: f64,
    pub pending: usize,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBooking {
    pub id: String,
}
