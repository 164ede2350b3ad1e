//! HTTP API route definitions.

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    admin_credit, bet_history, faucet, health, list_bets, metrics, place_bet, ready, score_bet,
    status, wallet, wallet_transactions, AppState,
};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics))
        .route("/api/v1/status", get(status))
        // Bets
        .route("/api/v1/bets", post(place_bet))
        .route("/api/v1/bets/:bet_id/score", put(score_bet))
        .route("/api/v1/users/:user_id/bets", get(list_bets))
        .route("/api/v1/users/:user_id/history", get(bet_history))
        // Wallet
        .route("/api/v1/wallet/:user_id", get(wallet))
        .route("/api/v1/wallet/:user_id/transactions", get(wallet_transactions))
        .route("/api/v1/wallet/:user_id/faucet", post(faucet))
        .route("/api/v1/wallet/admin/credit", post(admin_credit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState::new(Config::default()))
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn wallet_starts_at_zero() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/wallet/alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["balance_minor_units"], 0);
        assert_eq!(body["currency"], "TND");
    }

    #[tokio::test]
    async fn faucet_then_place_bet_flow() {
        let app = app();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/wallet/alice/faucet",
                json!({ "amount_minor_units": 10_000 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/bets",
                json!({
                    "user_id": "alice",
                    "stake_minor_units": 1_000,
                    "selections": [{
                        "event_id": "ev1",
                        "market": "Match result (1X2)",
                        "outcome_key": "home",
                        "price": 2.5,
                    }],
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let receipt = body_json(response).await;
        assert_eq!(receipt["stake_minor_units"], 1_000);
        assert_eq!(receipt["potential_win_minor_units"], 2_500);
        assert_eq!(receipt["balance_after"], 9_000);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/users/alice/bets")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bets = body_json(response).await;
        assert_eq!(bets.as_array().unwrap().len(), 1);
        assert_eq!(bets[0]["status"], "pending");
    }

    #[tokio::test]
    async fn placing_without_funds_is_rejected() {
        let response = app()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/bets",
                json!({
                    "user_id": "alice",
                    "stake_minor_units": 1_000,
                    "selections": [{
                        "event_id": "ev1",
                        "market": "Match result (1X2)",
                        "outcome_key": "home",
                        "price": 2.0,
                    }],
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "insufficient_funds");
    }

    #[tokio::test]
    async fn admin_credit_requires_admin_role() {
        let app = app();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/wallet/admin/credit",
                json!({
                    "caller_role": "user",
                    "target_user_id": "bob",
                    "amount_minor_units": 5_000,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/v1/wallet/admin/credit",
                json!({
                    "caller_role": "admin",
                    "target_user_id": "bob",
                    "amount_minor_units": 5_000,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["balance_minor_units"], 5_000);
    }

    #[tokio::test]
    async fn scoring_unknown_bet_is_404() {
        let response = app()
            .oneshot(json_request(
                Method::PUT,
                "/api/v1/bets/no-such-bet/score",
                json!({ "selections": [] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
