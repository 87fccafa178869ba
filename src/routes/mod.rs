use actix_web::web;

use crate::middleware::auth::AuthMiddleware;

pub mod blog;
pub mod booking;
pub mod health;
pub mod organizer;
pub mod trek;

/// Registers every route. Shared by the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig, jwt_secret: &str) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                // Public routes; signed-in callers are recognised when a token is sent
                .service(
                    web::scope("/treks")
                        .wrap(AuthMiddleware::optional(jwt_secret))
                        .route("/{id}", web::get().to(trek::get_by_id))
                        .route("/{id}/bookings", web::post().to(trek::create_booking)),
                )
                .service(
                    web::scope("/blogs")
                        .wrap(AuthMiddleware::optional(jwt_secret))
                        .route("", web::get().to(blog::get_all))
                        .route("", web::post().to(blog::create))
                        .route("/{id}", web::get().to(blog::get_by_id))
                        .route("/{id}", web::delete().to(blog::delete)),
                )
                // Protected routes
                .service(
                    web::scope("/bookings")
                        .wrap(AuthMiddleware::required(jwt_secret))
                        .route("/{id}", web::get().to(booking::get_by_id)),
                )
                .service(
                    web::scope("/organizer")
                        .wrap(AuthMiddleware::required(jwt_secret))
                        .route("/bookings", web::get().to(organizer::list_bookings))
                        .route(
                            "/bookings/{id}/status",
                            web::put().to(organizer::update_booking_status),
                        )
                        .route("/settings", web::put().to(organizer::update_settings)),
                ),
        );
}
