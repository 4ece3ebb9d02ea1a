//! Editing surface for staff: categories and posts.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use quill_core::ports::AuthError;
use quill_core::services::{CategoryForm, PostForm, Principal};
use quill_shared::ApiResponse;
use quill_shared::dto::{CategoryDeletedResponse, CategoryRequest, PostRequest};

use super::posts::PageQuery;
use super::render;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DeleteCategoryQuery {
    /// Also delete the category's posts.
    #[serde(default)]
    pub cascade: bool,
}

fn category_form(req: CategoryRequest) -> CategoryForm {
    CategoryForm {
        name: req.name,
        description: req.description,
    }
}

fn post_form(req: PostRequest) -> PostForm {
    PostForm {
        title: req.title,
        content: req.content,
        excerpt: req.excerpt,
        created_at: req.created_at,
        category_id: req.category_id,
        author_id: req.author_id,
    }
}

fn staff(identity: &Identity) -> AppResult<Principal> {
    let principal = identity.principal();
    if !principal.is_staff {
        return Err(AuthError::InsufficientPermissions.into());
    }
    Ok(principal)
}

/// GET /api/admin/categories
pub async fn list_categories(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let categories = state.editor.list_categories(&identity.principal()).await?;
    let body: Vec<_> = categories.into_iter().map(render::category).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/admin/categories
pub async fn create_category(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .editor
        .create_category(&identity.principal(), category_form(body.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(render::category(category)))
}

/// PUT /api/admin/categories/{id}
pub async fn update_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i32>,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .editor
        .update_category(
            &identity.principal(),
            path.into_inner(),
            category_form(body.into_inner()),
        )
        .await?;
    Ok(HttpResponse::Ok().json(render::category(category)))
}

/// DELETE /api/admin/categories/{id}?cascade=true
pub async fn delete_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i32>,
    query: web::Query<DeleteCategoryQuery>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let posts_removed = state
        .editor
        .delete_category(&identity.principal(), id, query.cascade)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        CategoryDeletedResponse { id, posts_removed },
        format!("Category {id} deleted along with {posts_removed} post(s)"),
    )))
}

/// GET /api/admin/posts - same order as the public index, without counting views.
pub async fn list_posts(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    staff(&identity)?;
    let page = state.listing.list_all(query.number()).await?;
    Ok(HttpResponse::Ok().json(render::post_page(page)))
}

/// POST /api/admin/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .editor
        .create_post(&identity.principal(), post_form(body.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(render::post(post)))
}

/// PUT /api/admin/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i32>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .editor
        .update_post(
            &identity.principal(),
            path.into_inner(),
            post_form(body.into_inner()),
        )
        .await?;
    Ok(HttpResponse::Ok().json(render::post(post)))
}

/// DELETE /api/admin/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    state
        .editor
        .delete_post(&identity.principal(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
