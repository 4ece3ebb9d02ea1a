//! Public read path: post index, category listing, post detail.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use super::render;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// `?page=n`, 1-based.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

impl PageQuery {
    pub fn number(&self) -> u64 {
        self.page.unwrap_or(1)
    }
}

/// GET /api/posts
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.listing.list_all(query.number()).await?;
    Ok(HttpResponse::Ok().json(render::post_page(page)))
}

/// GET /api/categories/{id}/posts
pub async fn by_category(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let (category, page) = state
        .listing
        .list_by_category(path.into_inner(), query.number())
        .await?;
    Ok(HttpResponse::Ok().json(render::category_posts(category, page)))
}

/// GET /api/posts/{id} - counts as one view.
pub async fn detail(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let post = state.listing.fetch_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(render::post(post)))
}
