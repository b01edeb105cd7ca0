use std::net::SocketAddr;
use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::state::AppState;
use crate::{assessments, auth, radar};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1",
              Router::new()
                  .merge(auth::router())
                  .merge(radar::router())
                  .merge(assessments::router())
                  .route("/health", get(|| async { "ok" }))
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
        .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> Router {
        build_app(AppState::fake().await)
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> Response {
        app.clone().oneshot(req).await.unwrap()
    }

    async fn body_json(res: Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(res: Response) -> String {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn full_scores(value: i64) -> Value {
        let map: serde_json::Map<String, Value> = (0..36)
            .map(|i| ((i * 10).to_string(), json!(value)))
            .collect();
        Value::Object(map)
    }

    /// Registers `tester` and returns the auth response body.
    async fn register(app: &Router, email: &str) -> Value {
        let res = send(
            app,
            request(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "username": "tester",
                    "email": email,
                    "password": "Secret1!",
                    "password_confirm": "Secret1!"
                })),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        body_json(res).await
    }

    async fn access_token(app: &Router, email: &str) -> String {
        register(app, email).await["access_token"].as_str().unwrap().to_string()
    }

    async fn preview_status(app: &Router, body: Value) -> (StatusCode, String) {
        let res = send(app, request("POST", "/api/v1/radar/preview", None, Some(body))).await;
        let status = res.status();
        (status, body_text(res).await)
    }

    #[tokio::test]
    async fn health_and_categories_are_public() {
        let app = app().await;
        let res = send(&app, request("GET", "/api/v1/health", None, None)).await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = send(&app, request("GET", "/api/v1/categories", None, None)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let categories = body_json(res).await;
        assert_eq!(categories.as_array().unwrap().len(), 36);
        assert_eq!(categories[1]["tick_label"], "DIRBTINIS INTELEKTAS, MAŠ...");
    }

    #[tokio::test]
    async fn register_login_and_me() {
        let app = app().await;
        register(&app, "Jonas@Example.com ").await;

        let dup = send(
            &app,
            request(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "username": "other",
                    "email": "jonas@example.com",
                    "password": "Secret1!",
                    "password_confirm": "Secret1!"
                })),
            ),
        )
        .await;
        assert_eq!(dup.status(), StatusCode::CONFLICT);

        let bad = send(
            &app,
            request(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(json!({"email": "jonas@example.com", "password": "nope"})),
            ),
        )
        .await;
        assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);

        let ok = send(
            &app,
            request(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(json!({"email": "jonas@example.com", "password": "Secret1!"})),
            ),
        )
        .await;
        assert_eq!(ok.status(), StatusCode::OK);
        let auth = body_json(ok).await;
        assert!(auth["user"]["last_login"].is_string());
        assert!(auth["user"].get("password_hash").is_none());
        let token = auth["access_token"].as_str().unwrap().to_string();

        let me = send(&app, request("GET", "/api/v1/me", Some(&token), None)).await;
        assert_eq!(me.status(), StatusCode::OK);
        assert_eq!(body_json(me).await["email"], "jonas@example.com");

        let anonymous = send(&app, request("GET", "/api/v1/me", None, None)).await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn register_rejects_mismatched_passwords() {
        let app = app().await;
        let res = send(
            &app,
            request(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "username": "x",
                    "email": "x@example.com",
                    "password": "Secret1!",
                    "password_confirm": "Secret2!"
                })),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(res).await, "Passwords do not match");
    }

    #[tokio::test]
    async fn refresh_issues_a_new_pair_and_refresh_tokens_cannot_call_the_api() {
        let app = app().await;
        let auth = register(&app, "r@example.com").await;
        let access = auth["access_token"].as_str().unwrap();
        let refresh = auth["refresh_token"].as_str().unwrap();

        let res = send(
            &app,
            request("POST", "/api/v1/auth/refresh", None, Some(json!({"refresh_token": refresh}))),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let renewed = body_json(res).await;
        assert_eq!(renewed["user"]["email"], "r@example.com");
        let new_access = renewed["access_token"].as_str().unwrap();
        let me = send(&app, request("GET", "/api/v1/me", Some(new_access), None)).await;
        assert_eq!(me.status(), StatusCode::OK);

        let wrong_kind = send(
            &app,
            request("POST", "/api/v1/auth/refresh", None, Some(json!({"refresh_token": access}))),
        )
        .await;
        assert_eq!(wrong_kind.status(), StatusCode::UNAUTHORIZED);

        for uri in ["/api/v1/assessments", "/api/v1/me"] {
            let res = send(&app, request("GET", uri, Some(refresh), None)).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }

        let garbage = send(&app, request("GET", "/api/v1/assessments", Some("abc.def.ghi"), None)).await;
        assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn tokens_of_a_deleted_account_are_refused() {
        let state = AppState::fake().await;
        let app = build_app(state.clone());
        let auth = register(&app, "gone@example.com").await;
        let access = auth["access_token"].as_str().unwrap();
        let refresh = auth["refresh_token"].as_str().unwrap();

        sqlx::query("DELETE FROM users WHERE email = ?1")
            .bind("gone@example.com")
            .execute(&state.db)
            .await
            .unwrap();

        let res = send(&app, request("GET", "/api/v1/assessments", Some(access), None)).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(res).await, "User not found");

        let res = send(
            &app,
            request("POST", "/api/v1/assessments", Some(access), Some(json!({"scores": full_scores(5)}))),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = send(
            &app,
            request("POST", "/api/v1/auth/refresh", None, Some(json!({"refresh_token": refresh}))),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn password_helpers() {
        let app = app().await;
        let res = send(
            &app,
            request(
                "POST",
                "/api/v1/auth/password-strength",
                None,
                Some(json!({"password": "abcdefgh1"})),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let strength = body_json(res).await;
        assert_eq!(strength["score"], 3);
        assert_eq!(strength["level"], "fair");
        let missing: Vec<&str> = strength["missing"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(missing, vec!["an uppercase letter", "a special character (!@#$ etc.)"]);

        let res = send(&app, request("GET", "/api/v1/auth/password-suggestion", None, None)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let suggestion = body_json(res).await["password"].as_str().unwrap().to_string();
        assert_eq!(suggestion.chars().count(), 12);
    }

    #[tokio::test]
    async fn save_list_render_and_export() {
        let app = app().await;
        let token = access_token(&app, "ana@example.com").await;

        let mut scores = full_scores(5);
        scores["0"] = json!(10);
        scores["10"] = json!(1);
        let saved = send(
            &app,
            request(
                "POST",
                "/api/v1/assessments",
                Some(&token),
                Some(json!({"scores": scores, "comment": "first try"})),
            ),
        )
        .await;
        assert_eq!(saved.status(), StatusCode::CREATED);
        let location = saved.headers()[header::LOCATION].to_str().unwrap().to_string();
        let saved = body_json(saved).await;
        let id = saved["id"].as_i64().unwrap();
        assert_eq!(location, format!("/api/v1/assessments/{}", id));
        assert_eq!(saved["summary"]["strongest"]["angle"], 0);
        assert_eq!(saved["summary"]["weakest"]["angle"], 10);

        let listed = body_json(send(&app, request("GET", "/api/v1/assessments", Some(&token), None)).await).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["comment"], "first try");

        let detail = send(&app, request("GET", &location, Some(&token), None)).await;
        assert_eq!(body_json(detail).await["scores"]["10"], 1);

        let svg = send(
            &app,
            request(
                "GET",
                &format!("/api/v1/assessments/{}/chart.svg?style=filled-polygon&compass=true", id),
                Some(&token),
                None,
            ),
        )
        .await;
        assert_eq!(svg.status(), StatusCode::OK);
        assert_eq!(svg.headers()[header::CONTENT_TYPE], "image/svg+xml");
        let svg = body_text(svg).await;
        assert!(svg.contains("<polygon"));
        assert!(svg.contains(&format!("Assessment #{}", id)));

        let export = send(
            &app,
            request("GET", &format!("/api/v1/assessments/{}/export", id), Some(&token), None),
        )
        .await;
        assert_eq!(export.status(), StatusCode::OK);
        let disposition = export.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.starts_with("attachment; filename=\"skills_tester_"));
        assert!(disposition.ends_with(".json\""));
        let export = body_json(export).await;
        assert_eq!(export["user"], "tester");
        assert_eq!(export["skills"]["0"], 10);
        assert_eq!(export["statistics"]["average"], 5.03);
        assert_eq!(export["statistics"]["strongest"]["category"], "MATEMATIKA, KVANTINĖ FIZIKA");
        assert_eq!(export["comment"], "first try");

        let missing = send(&app, request("GET", "/api/v1/assessments/9999", Some(&token), None)).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let other = access_token(&app, "someone-else@example.com").await;
        let foreign = send(&app, request("GET", &location, Some(&other), None)).await;
        assert_eq!(foreign.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn listing_is_newest_first_with_clamped_paging() {
        let app = app().await;
        let token = access_token(&app, "pages@example.com").await;

        let mut ids = Vec::new();
        for (score, comment) in [(3, "older"), (8, "newer")] {
            let res = send(
                &app,
                request(
                    "POST",
                    "/api/v1/assessments",
                    Some(&token),
                    Some(json!({"scores": full_scores(score), "comment": comment})),
                ),
            )
            .await;
            assert_eq!(res.status(), StatusCode::CREATED);
            ids.push(body_json(res).await["id"].as_i64().unwrap());
        }

        let list = |query: &str| {
            let app = app.clone();
            let uri = format!("/api/v1/assessments{}", query);
            let token = token.clone();
            async move {
                let res = send(&app, request("GET", &uri, Some(&token), None)).await;
                assert_eq!(res.status(), StatusCode::OK);
                let items = body_json(res).await;
                items
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|item| item["id"].as_i64().unwrap())
                    .collect::<Vec<_>>()
            }
        };

        assert_eq!(list("").await, vec![ids[1], ids[0]]);
        assert_eq!(list("?limit=1000").await, vec![ids[1], ids[0]]);
        assert_eq!(list("?limit=0").await, vec![ids[1]]);
        assert_eq!(list("?limit=-3").await, vec![ids[1]]);
        assert_eq!(list("?limit=1&offset=1").await, vec![ids[0]]);
        assert_eq!(list("?offset=-5").await, vec![ids[1], ids[0]]);
        assert!(list("?offset=2").await.is_empty());
    }

    #[tokio::test]
    async fn invalid_scores_are_rejected_before_charting() {
        let app = app().await;
        let token = access_token(&app, "v@example.com").await;

        let mut scores = full_scores(5);
        scores["70"] = json!(11);
        let res = send(
            &app,
            request("POST", "/api/v1/assessments", Some(&token), Some(json!({"scores": scores}))),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let mut fractional = full_scores(5);
        fractional["70"] = json!(5.5);
        let res = send(
            &app,
            request("POST", "/api/v1/assessments", Some(&token), Some(json!({"scores": fractional}))),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let mut partial = full_scores(5);
        partial.as_object_mut().unwrap().remove("350");
        let res = send(
            &app,
            request("POST", "/api/v1/export", Some(&token), Some(json!({"scores": partial}))),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(res).await.contains("angle 350"));

        let unauthenticated = send(
            &app,
            request("POST", "/api/v1/assessments", None, Some(json!({"scores": full_scores(5)}))),
        )
        .await;
        assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn preview_separates_bad_input_from_missing_data() {
        let app = app().await;

        let (status, body) = preview_status(&app, json!({"scores": {"0": 5.5}})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("not a whole number"), "{}", body);

        let (status, body) = preview_status(&app, json!({"scores": {"70000": 5}})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("70000"), "{}", body);

        let (status, _) = preview_status(&app, json!({"scores": {"0": 11}})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = preview_status(&app, json!({"scores": [5, 6]})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = preview_status(&app, json!({"scores": {"0": 5}, "chart": {"style": "pie"}})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = preview_status(&app, json!({"scores": {}})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, "no scores to display");
    }

    #[tokio::test]
    async fn preview_handles_partial_input() {
        let app = app().await;
        let res = send(
            &app,
            request(
                "POST",
                "/api/v1/radar/preview",
                None,
                Some(json!({
                    "scores": {"90": 9, "0": 2},
                    "title": "Draft",
                    "chart": {"direction": "counter-clockwise", "scheme": "three"}
                })),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let chart = body_json(res).await;
        let spokes = chart["geometry"]["spokes"].as_array().unwrap();
        assert_eq!(spokes.len(), 2);
        assert_eq!(spokes[0]["angle"], 0);
        assert_eq!(spokes[1]["tier"], "strong");
        assert!(spokes[1]["tip"]["x"].as_f64().unwrap() < 0.0);
        assert_eq!(chart["summary"]["average_display"], "5.5");

        let svg = send(
            &app,
            request("POST", "/api/v1/radar/preview.svg", None, Some(json!({"scores": full_scores(7)}))),
        )
        .await;
        assert_eq!(svg.status(), StatusCode::OK);
        assert!(body_text(svg).await.contains(r#"class="bar""#));
    }
}
