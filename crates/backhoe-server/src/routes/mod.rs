//! HTTP routes.

pub mod api;
pub mod assets;
pub mod map;
pub mod pages;

use std::sync::Arc;

use axum::http::{HeaderValue, Method, header};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble every route with the shared middleware stack.
pub fn build_router(state: Arc<AppState>) -> Router {
    // The mail endpoint is called cross-origin by embedded forms.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = api::router()
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new()
        .merge(pages::router())
        .merge(map::router())
        .merge(assets::router(&state.public_dir))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode};
    use tokio::sync::RwLock;
    use tower::ServiceExt;

    use backhoe_core::lead::{LeadService, MailFailurePolicy};
    use backhoe_core::service_areas::ServiceAreaDirectory;
    use backhoe_core::topology::{STATES_OBJECT, Topology};
    use backhoe_mail::MemoryMailer;

    use super::*;

    pub(crate) const MINI_STATES: &str = include_str!("../../tests/fixtures/mini-states.json");

    fn build_state(
        mailer: MemoryMailer,
        with_atlas: bool,
        failure_policy: MailFailurePolicy,
        public_dir: PathBuf,
    ) -> Arc<AppState> {
        let atlas = with_atlas.then(|| {
            Arc::new(
                Topology::from_slice(MINI_STATES.as_bytes())
                    .unwrap()
                    .atlas(STATES_OBJECT)
                    .unwrap(),
            )
        });
        Arc::new(AppState {
            atlas: RwLock::new(atlas),
            leads: LeadService::new(Arc::new(mailer)),
            directory: ServiceAreaDirectory::bundled().unwrap(),
            failure_policy,
            public_dir,
        })
    }

    pub(crate) fn test_state(mailer: MemoryMailer, with_atlas: bool) -> Arc<AppState> {
        build_state(
            mailer,
            with_atlas,
            MailFailurePolicy::ShowError,
            PathBuf::from("./public"),
        )
    }

    async fn send(state: Arc<AppState>, request: Request<Body>) -> Response<Body> {
        build_router(state).oneshot(request).await.unwrap()
    }

    async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, String) {
        let response = send(state, Request::get(uri).body(Body::empty()).unwrap()).await;
        let status = response.status();
        (status, body_text(response).await)
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    const EXCAVATOR_JSON: &str = r#"{"name":"Dana","email":"dana@example.com","rentalPeriod":"1 week","categoryName":"Excavator","categoryId":"excavator"}"#;

    // ── Mail endpoint ────────────────────────────────────────────────

    #[tokio::test]
    async fn rental_request_is_mailed_once() {
        let mailer = MemoryMailer::new();
        let state = test_state(mailer.clone(), false);
        let response = send(state, post_json("/api/send-rental-request", EXCAVATOR_JSON)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "message": "Email sent successfully"}));

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "New Rental Request: Excavator");
        assert!(sent[0].html_body.contains("<p><strong>Phone:</strong> Not provided</p>"));
    }

    #[tokio::test]
    async fn api_root_mirrors_the_endpoint() {
        let mailer = MemoryMailer::new();
        let response = send(test_state(mailer.clone(), false), post_json("/api", EXCAVATOR_JSON)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(mailer.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn transport_failure_is_a_500_envelope() {
        let state = test_state(MemoryMailer::failing("connection refused"), false);
        let response = send(state, post_json("/api/send-rental-request", EXCAVATOR_JSON)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("connection refused"));
        assert!(json.get("message").is_none());
    }

    #[tokio::test]
    async fn malformed_json_is_a_500_envelope() {
        let mailer = MemoryMailer::new();
        let response = send(
            test_state(mailer.clone(), false),
            post_json("/api/send-rental-request", "{not json"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["success"], false);
        assert!(mailer.sent().await.is_empty());
    }

    #[tokio::test]
    async fn missing_fields_still_send() {
        let mailer = MemoryMailer::new();
        let response = send(test_state(mailer.clone(), false), post_json("/api", "{}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(mailer.sent().await[0].subject, "New Rental Request: ");
    }

    // ── Pages ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn home_shows_placeholder_until_the_atlas_loads() {
        let (status, html) = get(test_state(MemoryMailer::new(), false), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("usa-map-loading"));
        assert!(!html.contains(r#"id="state-CA""#));

        let (_, loaded) = get(test_state(MemoryMailer::new(), true), "/").await;
        assert!(loaded.contains(r#"id="state-CA""#));
        assert!(!loaded.contains("usa-map-loading"));
    }

    #[tokio::test]
    async fn category_link_opens_the_rental_dialog() {
        let state = test_state(MemoryMailer::new(), false);
        let (_, choice) = get(Arc::clone(&state), "/?rent=excavator").await;
        assert!(choice.contains("<h2>Rent Excavator</h2>"));
        assert!(choice.contains("Via Email"));

        let (_, phone) = get(Arc::clone(&state), "/?rent=excavator&via=phone").await;
        assert!(phone.contains("Contact us directly"));

        let (status, _) = get(state, "/?rent=excavator&via=fax").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_category_is_404() {
        let state = test_state(MemoryMailer::new(), false);
        let (status, _) = get(Arc::clone(&state), "/?rent=crane").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let response = send(state, post_form("/rent/crane/", "name=Dana")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rental_form_sends_one_email_and_confirms() {
        let mailer = MemoryMailer::new();
        let response = send(
            test_state(mailer.clone(), false),
            post_form(
                "/rent/excavator/",
                "name=Dana&email=dana%40example.com&phone=&rentalPeriod=1+week&message=",
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Request Submitted!"));

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "New Rental Request: Excavator");
        assert!(sent[0].html_body.contains("<p><strong>Email:</strong> dana@example.com</p>"));
    }

    #[tokio::test]
    async fn failed_send_follows_the_policy() {
        let strict = build_state(
            MemoryMailer::failing("relay down"),
            false,
            MailFailurePolicy::ShowError,
            PathBuf::from("./public"),
        );
        let response = send(strict, post_form("/rent/forklift", "name=Dana")).await;
        let html = body_text(response).await;
        assert!(html.contains("modal-error"));
        assert!(html.contains("relay down"));
        assert!(html.contains(r#"value="Dana""#));

        let lenient = build_state(
            MemoryMailer::failing("relay down"),
            false,
            MailFailurePolicy::ConfirmAnyway,
            PathBuf::from("./public"),
        );
        let response = send(lenient, post_form("/rent/forklift", "name=Dana")).await;
        assert!(body_text(response).await.contains("Request Submitted!"));
    }

    #[tokio::test]
    async fn call_back_dialog_round_trip() {
        let mailer = MemoryMailer::new();
        let state = test_state(mailer.clone(), false);
        let (_, open) = get(Arc::clone(&state), "/?call=open").await;
        assert!(open.contains("<h2>Request a Call Back</h2>"));

        let response = send(
            state,
            post_form("/request-call/", "name=Sam&phone=555-0100&email=sam%40example.com&message=Need+a+lift"),
        )
        .await;
        assert!(body_text(response).await.contains("will call you back shortly"));
        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "New Call Back Request: Sam");
    }

    #[tokio::test]
    async fn service_area_pages() {
        let state = test_state(MemoryMailer::new(), false);
        for uri in ["/service-areas", "/service-areas/"] {
            let (status, html) = get(Arc::clone(&state), uri).await;
            assert_eq!(status, StatusCode::OK);
            assert!(html.contains(r#"href="/service-areas/new-york/""#));
        }
        let (status, html) = get(Arc::clone(&state), "/service-areas/new-york/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<li>New York City</li>"));

        let (status, _) = get(state, "/service-areas/atlantis").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // ── Map and assets ───────────────────────────────────────────────

    #[tokio::test]
    async fn map_svg_marks_the_active_location() {
        let state = test_state(MemoryMailer::new(), true);
        let response = send(
            state,
            Request::get("/map.svg?width=960&active=houston").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
        let svg = body_text(response).await;
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="960""#));
        assert!(svg.contains(r#"class="marker marker-active" data-location="houston""#));
    }

    #[tokio::test]
    async fn marker_link_on_home_opens_the_hover_state() {
        let state = test_state(MemoryMailer::new(), true);
        let (status, html) = get(Arc::clone(&state), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!html.contains("marker-active"));

        let start = html.find(r#"href="/?active=houston"#).unwrap() + r#"href=""#.len();
        let end = start + html[start..].find('"').unwrap();
        let link = &html[start..end];
        assert_eq!(link, "/?active=houston#map");

        let path = link.split('#').next().unwrap();
        let (status, html) = get(state, path).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(r#"class="marker marker-active" data-location="houston""#));
        assert!(html.contains(r#"class="state state-highlighted" id="state-TX""#));
        assert!(html.contains("marker-pulse"));
        assert!(html.contains("Houston, TX: 267 units available"));
        assert!(html.contains(r#"<a class="marker-link" href="/#map"><g class="marker marker-active""#));
    }

    #[tokio::test]
    async fn map_svg_is_a_placeholder_without_atlas() {
        let (status, svg) = get(test_state(MemoryMailer::new(), false), "/map.svg").await;
        assert_eq!(status, StatusCode::OK);
        assert!(svg.contains("usa-map-loading"));
        assert!(svg.contains(r#"width="1280""#));
    }

    #[tokio::test]
    async fn stylesheet_and_images_are_served() {
        let public = tempfile::tempdir().unwrap();
        std::fs::create_dir(public.path().join("images")).unwrap();
        std::fs::write(public.path().join("images/hello.txt"), "hello").unwrap();
        let state = build_state(
            MemoryMailer::new(),
            false,
            MailFailurePolicy::ShowError,
            public.path().to_path_buf(),
        );

        let response = send(
            Arc::clone(&state),
            Request::get("/static/site.css").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css; charset=utf-8");
        assert!(body_text(response).await.contains("@keyframes"));

        let (status, body) = get(state, "/images/hello.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "hello");
    }
}
