//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod health;
mod posts;
mod render;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            // Public read path
            .route("/posts", web::get().to(posts::index))
            .route("/posts/{id}", web::get().to(posts::detail))
            .route("/categories/{id}/posts", web::get().to(posts::by_category))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Editing surface
            .service(
                web::scope("/admin")
                    .route("/categories", web::get().to(admin::list_categories))
                    .route("/categories", web::post().to(admin::create_category))
                    .route("/categories/{id}", web::put().to(admin::update_category))
                    .route("/categories/{id}", web::delete().to(admin::delete_category))
                    .route("/posts", web::get().to(admin::list_posts))
                    .route("/posts", web::post().to(admin::create_post))
                    .route("/posts/{id}", web::put().to(admin::update_post))
                    .route("/posts/{id}", web::delete().to(admin::delete_post)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::{Value, json};
    use uuid::Uuid;

    use quill_core::domain::User;
    use quill_core::ports::{BaseRepository, STAFF_ROLE, TokenService, UserRepository};
    use quill_infra::{InMemoryDatabase, JwtConfig, JwtTokenService};

    use super::configure_routes;
    use crate::config::AdminBootstrap;
    use crate::state::AppState;

    struct Fixture {
        db: InMemoryDatabase,
        state: AppState,
        staff_id: Uuid,
        staff_token: String,
    }

    async fn fixture() -> Fixture {
        let db = InMemoryDatabase::new();
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "handler-tests".to_string(),
            ..JwtConfig::default()
        }));
        let state = AppState::in_memory(&db, tokens.clone(), 10);

        let staff = db
            .users()
            .create(User::new("editor@example.com".into(), "unused".into(), true))
            .await
            .unwrap();
        let staff_token = tokens
            .generate_token(staff.id, &staff.email, vec![STAFF_ROLE.to_string()])
            .unwrap();

        Fixture {
            db,
            state,
            staff_id: staff.id,
            staff_token,
        }
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {token}"))
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health() {
        let fx = fixture().await;
        let app = app!(fx.state);

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn test_read_path_scenario() {
        let fx = fixture().await;
        let app = app!(fx.state);

        let req = test::TestRequest::post()
            .uri("/api/admin/categories")
            .insert_header(bearer(&fx.staff_token))
            .set_json(json!({ "name": "Tech" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let category: Value = test::read_body_json(resp).await;
        assert_eq!(category["id"], 1);

        let req = test::TestRequest::post()
            .uri("/api/admin/posts")
            .insert_header(bearer(&fx.staff_token))
            .set_json(json!({ "title": "Hello", "content": "First post", "category_id": 1 }))
            .to_request();
        let post: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(post["views"], 0);

        for expected in [1, 2] {
            let req = test::TestRequest::get().uri("/api/posts/1").to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["title"], "Hello");
            assert_eq!(body["views"], expected);
        }

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let page: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(page["posts"].as_array().unwrap().len(), 1);
        assert_eq!(page["posts"][0]["views"], 2);
        assert_eq!(page["total_pages"], 1);

        let req = test::TestRequest::get()
            .uri("/api/categories/1/posts")
            .to_request();
        let listing: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listing["category"]["name"], "Tech");
        assert_eq!(listing["posts"][0]["title"], "Hello");

        let req = test::TestRequest::get()
            .uri("/api/categories/2/posts")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let problem: Value = test::read_body_json(resp).await;
        assert_eq!(problem["status"], 404);
        assert_eq!(problem["detail"], "Category with id 2 not found");
    }

    #[actix_web::test]
    async fn test_unknown_post_and_page_are_not_found() {
        let fx = fixture().await;
        let app = app!(fx.state);

        let req = test::TestRequest::get().uri("/api/posts/7").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/api/posts?page=2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/api/posts?page=18446744073709551615")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/api/posts?page=0").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_admin_requires_token() {
        let fx = fixture().await;
        let app = app!(fx.state);

        let req = test::TestRequest::get()
            .uri("/api/admin/categories")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_admin_requires_staff() {
        let fx = fixture().await;
        let reader_token = fx
            .state
            .tokens
            .generate_token(Uuid::new_v4(), "reader@example.com", vec![])
            .unwrap();
        let app = app!(fx.state);

        let req = test::TestRequest::get()
            .uri("/api/admin/posts")
            .insert_header(bearer(&reader_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_spoofed_author_over_http() {
        let fx = fixture().await;
        let app = app!(fx.state);

        let req = test::TestRequest::post()
            .uri("/api/admin/categories")
            .insert_header(bearer(&fx.staff_token))
            .set_json(json!({ "name": "Tech" }))
            .to_request();
        test::call_service(&app, req).await;

        let spoofed = Uuid::new_v4();
        let req = test::TestRequest::post()
            .uri("/api/admin/posts")
            .insert_header(bearer(&fx.staff_token))
            .set_json(json!({
                "title": "Mine",
                "content": "Body",
                "category_id": 1,
                "author_id": spoofed,
            }))
            .to_request();
        let post: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(post["author_id"], fx.staff_id.to_string());

        let req = test::TestRequest::put()
            .uri("/api/admin/posts/1")
            .insert_header(bearer(&fx.staff_token))
            .set_json(json!({
                "title": "Still mine",
                "content": "Body",
                "category_id": 1,
                "author_id": spoofed,
            }))
            .to_request();
        let post: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(post["title"], "Still mine");
        assert_eq!(post["author_id"], fx.staff_id.to_string());
    }

    #[actix_web::test]
    async fn test_post_with_unknown_category_is_unprocessable() {
        let fx = fixture().await;
        let app = app!(fx.state);

        let req = test::TestRequest::post()
            .uri("/api/admin/posts")
            .insert_header(bearer(&fx.staff_token))
            .set_json(json!({ "title": "Lost", "content": "Body", "category_id": 5 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_category_delete_needs_cascade_flag() {
        let fx = fixture().await;
        let app = app!(fx.state);

        for req in [
            test::TestRequest::post()
                .uri("/api/admin/categories")
                .set_json(json!({ "name": "Tech" })),
            test::TestRequest::post()
                .uri("/api/admin/posts")
                .set_json(json!({ "title": "Hello", "content": "Body", "category_id": 1 })),
        ] {
            let req = req.insert_header(bearer(&fx.staff_token)).to_request();
            assert!(test::call_service(&app, req).await.status().is_success());
        }

        let req = test::TestRequest::delete()
            .uri("/api/admin/categories/1")
            .insert_header(bearer(&fx.staff_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::delete()
            .uri("/api/admin/categories/1?cascade=true")
            .insert_header(bearer(&fx.staff_token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["posts_removed"], 1);

        let req = test::TestRequest::get().uri("/api/posts/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_login_with_bootstrapped_admin() {
        let fx = fixture().await;
        fx.state
            .bootstrap_admin(&AdminBootstrap {
                email: "root@example.com".to_string(),
                password: "s3cret-pass".to_string(),
            })
            .await
            .unwrap();
        let app = app!(fx.state);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "root@example.com", "password": "wrong" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "nobody@example.com", "password": "s3cret-pass" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "root@example.com", "password": "s3cret-pass" }))
            .to_request();
        let auth: Value = test::call_and_read_body_json(&app, req).await;
        let token = auth["access_token"].as_str().unwrap().to_string();
        assert_eq!(auth["token_type"], "Bearer");

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&token))
            .to_request();
        let me: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(me["email"], "root@example.com");
        assert_eq!(me["is_staff"], true);

        let stored = fx.db.users().find_by_email("root@example.com").await.unwrap();
        assert!(stored.unwrap().is_staff);
    }
}
