#![allow(dead_code)]

use actix_web::{web, App};
use bson::Document;
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;

use trek_api::{
    db::MemoryDocumentStore,
    middleware::auth::Claims,
    routes,
    services::trek_resolution_service::ResolutionConfig,
    state::AppState,
};

pub const TEST_JWT_SECRET: &str = "test_jwt_secret";

pub struct TestApp {
    pub store: Arc<MemoryDocumentStore>,
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        let state = web::Data::new(AppState::new(store.clone(), ResolutionConfig::default()));
        Self { store, state }
    }

    pub async fn with_document(self, collection: &str, key: &str, data: Document) -> Self {
        self.store.put(collection, key, data).await;
        self
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .configure(|cfg| routes::configure(cfg, TEST_JWT_SECRET))
    }
}

pub fn get_test_user_id() -> String {
    "test-user-1".to_string()
}

pub fn get_test_email() -> String {
    "hiker@example.com".to_string()
}

/// `Authorization` header value for a freshly signed token.
pub fn bearer_for(user_id: &str, email: &str, name: Option<&str>) -> String {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: email.to_string(),
        exp: now + 3600,
        iat: now,
        user_id: user_id.to_string(),
        name: name.map(str::to_string),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("token should encode");
    format!("Bearer {}", token)
}

pub fn test_bearer() -> String {
    bearer_for(&get_test_user_id(), &get_test_email(), Some("Test Hiker"))
}
