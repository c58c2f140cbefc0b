use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, AuthError,
    auth::{Identity, SessionManager},
    middleware::auth::AuthLayer,
};

pub fn routes(auth: Arc<SessionManager>) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .route_layer(AuthLayer::new(auth));

    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .merge(protected)
}

#[derive(Deserialize)]
struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    success: bool,
    token: String,
    user: Identity,
}

#[derive(Deserialize)]
struct LogoutRequest {
    #[serde(default)]
    token: String,
}

#[derive(Serialize)]
struct StatusResponse {
    success: bool,
}

#[derive(Serialize)]
struct MeResponse {
    success: bool,
    user: Identity,
}

async fn login(
    State(auth): State<Arc<SessionManager>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let session = auth.login(&request.username, &request.password).await?;
    Ok(Json(LoginResponse {
        success: true,
        token: session.token,
        user: session.identity,
    }))
}

async fn logout(
    State(auth): State<Arc<SessionManager>>,
    Json(request): Json<LogoutRequest>,
) -> Json<StatusResponse> {
    auth.logout(&request.token).await;
    Json(StatusResponse { success: true })
}

async fn me(Extension(identity): Extension<Identity>) -> Json<MeResponse> {
    Json(MeResponse {
        success: true,
        user: identity,
    })
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use axum::{
        Router,
        body::Body,
        http::{Request, Response, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::auth::{MemoryStore, RandomTokenGenerator, StaticCredentials};

    fn app() -> Router {
        let users = HashMap::from([
            ("kyle".to_string(), "CMF2025".to_string()),
            ("admin".to_string(), "admin123".to_string()),
        ]);
        let manager = SessionManager::new(
            Arc::new(StaticCredentials::new(users)),
            Arc::new(MemoryStore::new()),
            Arc::new(RandomTokenGenerator),
            Duration::from_secs(28_800),
            "authToken:",
        );
        let state = AppState {
            auth: Arc::new(manager),
        };
        crate::api::routes(&state).with_state(state)
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn get_me(app: &Router, bearer: Option<&str>) -> Response<Body> {
        let mut request = Request::builder().method("GET").uri("/auth/me");
        if let Some(token) = bearer {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        app.clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response<Body>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn login_token(app: &Router) -> String {
        let response = post_json(
            app,
            "/auth/login",
            json!({"username": "kyle", "password": "CMF2025"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn login_returns_token_and_user() {
        let app = app();
        let response = post_json(
            &app,
            "/auth/login",
            json!({"username": "Kyle", "password": "CMF2025"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["user"], json!("kyle"));
        assert!(!body["token"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn bad_logins_get_one_generic_error() {
        let app = app();
        let wrong = post_json(
            &app,
            "/auth/login",
            json!({"username": "kyle", "password": "wrong"}),
        )
        .await;
        let unknown = post_json(
            &app,
            "/auth/login",
            json!({"username": "nosuchuser", "password": "x"}),
        )
        .await;
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);

        let wrong = body_json(wrong).await;
        let unknown = body_json(unknown).await;
        assert_eq!(wrong, unknown);
        assert_eq!(wrong["success"], json!(false));
        assert_eq!(wrong["error"], json!("Invalid username or password."));
        assert!(wrong.get("authRequired").is_none());
    }

    #[tokio::test]
    async fn missing_fields_are_a_bad_request() {
        let app = app();
        let response = post_json(&app, "/auth/login", json!({"username": "kyle"})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], json!("Missing username or password."));
    }

    #[tokio::test]
    async fn me_resolves_a_live_session() {
        let app = app();
        let token = login_token(&app).await;

        let response = get_me(&app, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["user"], json!("kyle"));
    }

    #[tokio::test]
    async fn me_without_a_token_requires_auth() {
        let app = app();
        for response in [
            get_me(&app, None).await,
            get_me(&app, Some("")).await,
            get_me(&app, Some("forged-token")).await,
        ] {
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body = body_json(response).await;
            assert_eq!(body["error"], json!("AUTH_REQUIRED"));
            assert_eq!(body["authRequired"], json!(true));
        }
    }

    #[tokio::test]
    async fn logout_always_succeeds_and_revokes() {
        let app = app();
        let token = login_token(&app).await;

        for _ in 0..2 {
            let response = post_json(&app, "/auth/logout", json!({"token": token})).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_json(response).await, json!({"success": true}));
        }

        // missing token field is fine too
        let response = post_json(&app, "/auth/logout", json!({})).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = get_me(&app, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let app = app();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/auth/unknown")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
