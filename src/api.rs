use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::calculator::{
    self, BatchConfig, CalcError, GoalConfig, ManualSummary, TradeCosts,
};
use crate::types::{
    AppState, ErrorResponse, ManualRequest, ProjectionRequest, TradePnlRequest, TradePnlResponse,
};

/// JSON success body, or 422 with `{"error": ...}`
fn respond<T: Serialize>(result: Result<T, CalcError>) -> (StatusCode, Json<serde_json::Value>) {
    match result {
        Ok(body) => (StatusCode::OK, Json(serde_json::json!(body))),
        Err(e) => {
            warn!("Rejected calculator request: {}", e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!(ErrorResponse::from(&e))),
            )
        }
    }
}

/// Calculator routes, without static files or CORS
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/calculator/defaults", get(get_defaults))
        .route("/api/calculator/manual", post(run_manual))
        .route("/api/calculator/projection", post(run_projection))
        .route("/api/calculator/projection/batch", post(run_batch))
        .route("/api/calculator/goal", post(run_goal))
        .route("/api/trade/pnl", post(run_trade_pnl))
        .with_state(state)
}

/// GET /api/health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// GET /api/calculator/defaults
pub async fn get_defaults(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!(state.config.defaults))
}

fn manual_summary(req: ManualRequest) -> calculator::Result<ManualSummary> {
    let initial = calculator::error::require_finite("initial_capital", req.initial_capital)?;
    let entries = req
        .entries
        .into_iter()
        .map(|e| e.into_entry())
        .collect::<calculator::Result<Vec<_>>>()?;

    let rows = calculator::accumulate(initial, &entries)?;
    Ok(ManualSummary::from_rows(initial, rows))
}

/// POST /api/calculator/manual - Replay manual entries
pub async fn run_manual(Json(req): Json<ManualRequest>) -> impl IntoResponse {
    respond(manual_summary(req))
}

/// POST /api/calculator/projection - Constant or win/loss projection
pub async fn run_projection(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProjectionRequest>,
) -> impl IntoResponse {
    let result = state
        .config
        .limits
        .check_horizon(req.config.horizon_days)
        .and_then(|_| match req.seed {
            Some(seed) => calculator::project_summary(&req.config, &mut StdRng::seed_from_u64(seed)),
            None => calculator::project_summary(&req.config, &mut rand::thread_rng()),
        });

    if let Ok(summary) = &result {
        info!(
            "Projection {}: {} days -> {:.2} ({:+.2}%)",
            req.config.mode, req.config.horizon_days, summary.final_capital, summary.roi_pct
        );
    }

    respond(result)
}

/// POST /api/calculator/projection/batch - Monte Carlo summary
pub async fn run_batch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchConfig>,
) -> impl IntoResponse {
    let limits = state.config.limits;
    if let Err(e) = limits
        .check_horizon(req.projection.horizon_days)
        .and_then(|_| limits.check_runs(req.runs))
    {
        return respond::<()>(Err(e));
    }

    // Large batches are CPU bound; keep them off the async workers
    let result = tokio::task::spawn_blocking(move || calculator::simulate_batch(&req))
        .await
        .unwrap_or_else(|e| Err(CalcError::undefined(format!("batch task failed: {}", e))));

    respond(result)
}

/// POST /api/calculator/goal - Required growth for a target
pub async fn run_goal(Json(req): Json<GoalConfig>) -> impl IntoResponse {
    respond(calculator::solve_goal(&req))
}

/// POST /api/trade/pnl - P/L of a single trade
pub async fn run_trade_pnl(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TradePnlRequest>,
) -> impl IntoResponse {
    let defaults = state.config.defaults.trade_costs;
    let costs = TradeCosts {
        lot_size: req.lot_size.unwrap_or(defaults.lot_size),
        charges: req.charges.unwrap_or(defaults.charges),
    };

    respond(calculator::trade_pnl(&req.trade, &costs).map(|pnl| TradePnlResponse { pnl }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::types::{AmountInput, ManualEntryInput};
    use crate::calculator::ProjectionConfig;

    fn state() -> Arc<AppState> {
        Arc::new(AppState {
            config: PlannerConfig::default(),
        })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_manual_endpoint() {
        let req = ManualRequest {
            initial_capital: 1000.0,
            entries: vec![
                ManualEntryInput {
                    amount: AmountInput::Number(100.0),
                    is_percentage: false,
                    note: String::new(),
                },
                ManualEntryInput {
                    amount: AmountInput::Text("10".to_string()),
                    is_percentage: true,
                    note: "Day 2".to_string(),
                },
            ],
        };

        let response = run_manual(Json(req)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!((body["finalCapital"].as_f64().unwrap() - 1210.0).abs() < 1e-9);
        assert!((body["netPnl"].as_f64().unwrap() - 210.0).abs() < 1e-9);
        assert_eq!(body["rows"][1]["note"], "Day 2");
    }

    #[tokio::test]
    async fn test_manual_rejects_bad_amount() {
        let req = ManualRequest {
            initial_capital: 1000.0,
            entries: vec![ManualEntryInput {
                amount: AmountInput::Text("abc".to_string()),
                is_percentage: false,
                note: String::new(),
            }],
        };

        let response = run_manual(Json(req)).await.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("amount"));
    }

    #[tokio::test]
    async fn test_manual_overflow_is_an_error_not_null() {
        let entry = || ManualEntryInput {
            amount: AmountInput::Number(1e308),
            is_percentage: false,
            note: String::new(),
        };
        let req = ManualRequest {
            initial_capital: 1000.0,
            entries: vec![entry(), entry()],
        };

        let response = run_manual(Json(req)).await.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("overflowed"));
    }

    #[tokio::test]
    async fn test_projection_overflow_is_an_error_not_null() {
        let req = ProjectionRequest {
            config: ProjectionConfig::constant(1000.0, 1100, 100.0),
            seed: None,
        };

        let response = run_projection(State(state()), Json(req)).await.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_projection_endpoint_seeded() {
        let req = ProjectionRequest {
            config: ProjectionConfig::win_loss(1000.0, 30, 50.0, 3.0, 2.0),
            seed: Some(9),
        };

        let a = body_json(run_projection(State(state()), Json(req.clone())).await.into_response()).await;
        let b = body_json(run_projection(State(state()), Json(req)).await.into_response()).await;
        assert_eq!(a, b);
        assert_eq!(a["rows"].as_array().unwrap().len(), 30);
    }

    #[tokio::test]
    async fn test_projection_rejects_zero_horizon() {
        let req = ProjectionRequest {
            config: ProjectionConfig::constant(1000.0, 0, 2.0),
            seed: None,
        };

        let response = run_projection(State(state()), Json(req)).await.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_projection_horizon_limit() {
        let req = ProjectionRequest {
            config: ProjectionConfig::constant(1000.0, 10_000, 2.0),
            seed: None,
        };

        let response = run_projection(State(state()), Json(req)).await.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_batch_endpoint() {
        let req = BatchConfig {
            projection: ProjectionConfig::win_loss(1000.0, 20, 60.0, 2.0, 2.0),
            runs: 200,
            seed: 5,
        };

        let response = run_batch(State(state()), Json(req)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["runs"], 200);
    }

    #[tokio::test]
    async fn test_goal_endpoint() {
        let req = GoalConfig {
            initial_capital: 1000.0,
            target_capital: 1210.0,
            horizon_days: 2,
            win_rate_pct: 0.0,
            loss_pct_per_trade: 5.0,
        };

        let response = run_goal(Json(req)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!((body["requiredDailyGrowthPct"].as_f64().unwrap() - 10.0).abs() < 1e-9);
        assert!(body["requiredWinPct"].is_null());
    }

    #[tokio::test]
    async fn test_goal_total_loss_rejected() {
        let req = GoalConfig {
            initial_capital: 1000.0,
            target_capital: 2000.0,
            horizon_days: 10,
            win_rate_pct: 50.0,
            loss_pct_per_trade: 100.0,
        };

        let response = run_goal(Json(req)).await.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_trade_pnl_uses_default_costs() {
        let req = TradePnlRequest {
            trade: calculator::TradeInput {
                entry_price: 100.0,
                exit_price: 101.0,
                lots: 1.0,
            },
            lot_size: None,
            charges: None,
        };

        let response = run_trade_pnl(State(state()), Json(req)).await.into_response();
        let body = body_json(response).await;
        assert!((body["pnl"].as_f64().unwrap() - 30.0).abs() < 1e-9);
    }
}
