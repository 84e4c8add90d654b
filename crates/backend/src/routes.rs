use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::shared::app_state::AppState;
use crate::system::auth::middleware::{require_admin, require_auth};
use crate::{handlers, system};

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    let gate = state.gate.clone();

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES
        // ========================================
        .route(
            "/api/system/auth/sign-in",
            post(system::handlers::auth::sign_in),
        )
        .route("/api/system/auth/login", post(system::handlers::auth::login))
        .route(
            "/api/system/auth/logout",
            post(system::handlers::auth::logout),
        )
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_user)
                .layer(middleware::from_fn_with_state(gate.clone(), require_auth)),
        )
        // ========================================
        // A001 COMPANY (upsert только для администратора)
        // ========================================
        .route(
            "/api/company",
            get(handlers::a001_company::search).merge(
                post(handlers::a001_company::upsert)
                    .layer(middleware::from_fn_with_state(gate, require_admin)),
            ),
        )
        .route("/api/company/:id", get(handlers::a001_company::get_by_id))
        // A002 Booking
        .route(
            "/api/company/:id/slots/:slot_id/book",
            post(handlers::a002_booking::book),
        )
        .route(
            "/api/company/:id/slots/:slot_id/cancel",
            post(handlers::a002_booking::cancel),
        )
        .route("/api/bookings", get(handlers::a002_booking::history))
        .route("/api/bookings/summary", get(handlers::a002_booking::summary))
        // A003 Insight
        .route("/api/insight/select", post(handlers::a003_insight::select))
        .route(
            "/api/insight/:viewer_id",
            get(handlers::a003_insight::get).merge(delete(handlers::a003_insight::clear)),
        )
        .route("/api/notification", get(handlers::notification::current))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::Duration;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::a001_company::seed;
    use crate::domain::a003_insight::generator::InsightGenerator;
    use crate::system::auth::verifier::DemoVerifier;
    use crate::system::auth::AccessGate;

    struct EchoGenerator;

    #[async_trait]
    impl InsightGenerator for EchoGenerator {
        async fn generate(&self, company_name: &str, _industry: &str) -> String {
            format!("About {}", company_name)
        }
    }

    fn app() -> Router {
        let gate = AccessGate::new(Box::new(DemoVerifier), "test-secret", Duration::hours(1));
        let state = AppState::new(
            seed::initial_ledger().unwrap(),
            gate,
            Arc::new(EchoGenerator),
            Duration::seconds(5),
        );
        configure_routes(state)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn contact(name: &str) -> Value {
        json!({ "occupant": { "kind": "contact", "name": name, "email": "jane@mail.example" } })
    }

    async fn token(app: &Router) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/api/system/auth/sign-in",
            Some(json!({ "username": "jane", "password": "pw" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let ticket = body["ticket"].as_str().unwrap().to_string();

        let (status, body) = send(
            app,
            "POST",
            "/api/system/auth/login",
            Some(json!({ "ticket": ticket })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["accessToken"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_search_and_get() {
        let app = app();
        let (status, body) = send(&app, "GET", "/api/company?q=PUNE", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, all) = send(&app, "GET", "/api/company", None, None).await;
        assert_eq!(all.as_array().unwrap().len(), seed::initial_companies().len());

        let (status, body) = send(&app, "GET", "/api/company/c-1", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slots"].as_array().unwrap().len(), 3);

        let (status, _) = send(&app, "GET", "/api/company/c-404", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "GET", "/api/company/nope", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_book_twice_conflicts_and_posts_notices() {
        let app = app();
        let uri = "/api/company/c-1/slots/s-1-2/book";

        let (status, body) = send(&app, "POST", uri, Some(contact("Jane")), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slots"][1]["isBooked"], json!(true));

        let (_, notice) = send(&app, "GET", "/api/notification", None, None).await;
        assert_eq!(notice["kind"], json!("success"));
        assert!(notice["message"].as_str().unwrap().ends_with("for Jane!"));

        let (status, body) = send(&app, "POST", uri, Some(contact("Bob")), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("already booked"));

        let (_, notice) = send(&app, "GET", "/api/notification", None, None).await;
        assert_eq!(notice["kind"], json!("error"));

        let (_, history) = send(&app, "GET", "/api/bookings", None, None).await;
        assert_eq!(history.as_array().unwrap().len(), 1);
        assert_eq!(history[0]["occupantName"], json!("Jane"));
    }

    #[tokio::test]
    async fn test_cancel_without_body_and_not_booked() {
        let app = app();
        let uri = "/api/company/c-2/slots/s-2-1/cancel";

        let (status, _) = send(&app, "POST", uri, None, None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        send(&app, "POST", "/api/company/c-2/slots/s-2-1/book", Some(contact("Jane")), None).await;
        let (status, body) = send(&app, "POST", uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slots"][0]["isBooked"], json!(false));

        let (_, summary) = send(&app, "GET", "/api/bookings/summary", None, None).await;
        assert_eq!(summary["totalBooked"], json!(0));
    }

    #[tokio::test]
    async fn test_upsert_requires_admin_token() {
        let app = app();
        let company = json!({
            "name": "Acme",
            "industry": "Robotics",
            "location": "Kochi",
            "website": "acme.example",
            "established": "2021",
            "description": "Robots"
        });

        let (status, _) = send(&app, "POST", "/api/company", Some(company.clone()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let token = token(&app).await;
        let (status, body) = send(&app, "POST", "/api/company", Some(company), Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        let id = body["id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, "GET", &format!("/api/company/{}", id), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], json!("Acme"));

        let (status, me) = send(&app, "GET", "/api/system/auth/me", None, Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["username"], json!("jane"));
        assert_eq!(me["isAdmin"], json!(true));

        let (status, _) = send(&app, "POST", "/api/system/auth/logout", None, Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "GET", "/api/system/auth/me", None, Some(&token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_insight_select_and_clear() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/insight/select",
            Some(json!({ "viewerId": "v1", "companyId": "c-1" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["companyId"], json!("c-1"));

        let (status, _) = send(&app, "GET", "/api/insight/v1", None, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "DELETE", "/api/insight/v1", None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", "/api/insight/v1", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "POST",
            "/api/insight/select",
            Some(json!({ "viewerId": "v1", "companyId": "c-404" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
