use std::future::{ready, Ready};

use actix_web::{dev::Payload, Error, FromRequest, HttpMessage, HttpRequest};

use crate::error::ApiError;
use crate::middleware::auth::Claims;
use crate::models::user::UserIdentity;

/// The signed-in caller. Use `Option<AuthenticatedUser>` behind the optional
/// auth middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.user_id.clone(),
            email: Some(self.email.clone()).filter(|e| !e.is_empty()),
            display_name: self.display_name.clone(),
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(claims) = req.extensions().get::<Claims>() {
            ready(Ok(AuthenticatedUser {
                user_id: claims.user_id.clone(),
                email: claims.sub.clone(),
                display_name: claims.name.clone(),
            }))
        } else {
            ready(Err(
                ApiError::Unauthorized("User not authenticated".to_string()).into()
            ))
        }
    }
}
