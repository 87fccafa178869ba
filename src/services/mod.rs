pub mod blog_service;
pub mod booking_service;
pub mod content_generation_service;
pub mod gallery_service;
pub mod image_service;
pub mod organizer_service;
pub mod pricing_service;
pub mod trek_resolution_service;
pub mod trek_view_service;
