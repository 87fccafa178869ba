use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::blog::BlogInput;
use crate::services::blog_service;
use crate::state::AppState;

/*
    /api/blogs
*/
pub async fn get_all(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let blogs = blog_service::list_blogs(state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(blogs))
}

/*
    /api/blogs/{id}
*/
pub async fn get_by_id(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    match blog_service::get_blog(state.store.as_ref(), &path).await? {
        Some(blog) => Ok(HttpResponse::Ok().json(blog)),
        None => Err(ApiError::NotFound("Blog not found".to_string())),
    }
}

pub async fn create(
    user: Option<AuthenticatedUser>,
    body: web::Json<BlogInput>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let author = user.map(|u| u.identity());
    let blog = blog_service::create_blog(state.store.as_ref(), &body, author.as_ref()).await?;
    Ok(HttpResponse::Created().json(blog))
}

pub async fn delete(
    path: web::Path<String>,
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    blog_service::delete_blog(
        state.store.as_ref(),
        &path,
        &user.identity(),
        &state.admin_emails,
    )
    .await?;
    Ok(HttpResponse::NoContent().finish())
}
