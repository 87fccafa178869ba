use std::sync::Arc;

use crate::db::store::DocumentStore;
use crate::services::{
    booking_service::{BookingHandoff, StoreBookingService},
    trek_resolution_service::{ResolutionConfig, TrekResolver},
};

/// Shared handler state, registered once as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub resolver: TrekResolver,
    pub handoff: BookingHandoff,
    /// Callers with these emails may moderate any blog.
    pub admin_emails: Vec<String>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, resolution: ResolutionConfig) -> Self {
        let resolver = TrekResolver::with_config(store.clone(), resolution);
        let bookings = Arc::new(StoreBookingService::new(store.clone()));
        Self {
            handoff: BookingHandoff::new(resolver.clone(), bookings),
            resolver,
            store,
            admin_emails: Vec::new(),
        }
    }

    pub fn with_admin_emails(mut self, admin_emails: Vec<String>) -> Self {
        self.admin_emails = admin_emails;
        self
    }
}
