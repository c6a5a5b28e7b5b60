use anyhow::{Context, Result};
use clap::Parser;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use tracing::info;

use compound_planner::{
    api,
    config::{CalculatorDefaults, PlannerConfig, PlannerLimits},
    types::AppState,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Address to bind the web server to
    #[arg(long, env = "PLANNER_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to run the web server on
    #[arg(short, long, env = "PLANNER_PORT", default_value = "3000")]
    port: u16,

    /// Directory with the dashboard frontend
    #[arg(long, env = "PLANNER_STATIC_DIR", default_value = "frontend")]
    static_dir: PathBuf,

    /// Default starting capital shown in the calculator
    #[arg(long, env = "PLANNER_INITIAL_CAPITAL", default_value = "3000")]
    initial_capital: f64,

    /// Default daily growth (%)
    #[arg(long, env = "PLANNER_DAILY_GROWTH_PCT", default_value = "2")]
    daily_growth_pct: f64,

    /// Default projection horizon (days)
    #[arg(long, env = "PLANNER_HORIZON_DAYS", default_value = "20")]
    horizon_days: i64,

    /// Longest projection a request may ask for
    #[arg(long, env = "PLANNER_MAX_HORIZON_DAYS", default_value = "3650")]
    max_horizon_days: i64,

    /// Most Monte Carlo runs a request may ask for
    #[arg(long, env = "PLANNER_MAX_BATCH_RUNS", default_value = "100000")]
    max_batch_runs: usize,
}

impl Args {
    fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            defaults: CalculatorDefaults {
                initial_capital: self.initial_capital,
                daily_growth_pct: self.daily_growth_pct,
                horizon_days: self.horizon_days,
                ..Default::default()
            },
            limits: PlannerLimits {
                max_horizon_days: self.max_horizon_days,
                max_batch_runs: self.max_batch_runs,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("compound_planner=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = args.planner_config();

    info!("Starting compounding planner server");
    info!("Defaults: {:?}", config.defaults);
    info!(
        "Limits: {} days, {} batch runs",
        config.limits.max_horizon_days, config.limits.max_batch_runs
    );

    let state = Arc::new(AppState { config });

    let app = api::router(state)
        .fallback_service(ServeDir::new(&args.static_dir))
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", args.host, args.port))?;
    info!("Server running at http://{}", addr);
    info!("Serving frontend from {:?}", args.static_dir);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
