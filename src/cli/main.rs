use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use compound_planner::config::PlannerLimits;
use compound_planner::calculator::{
    project_summary, simulate_batch, solve_goal, trade_pnl, BatchConfig, GoalConfig, ManualLedger,
    ProjectionConfig, ProjectionSummary, TradeCosts, TradeInput,
};

#[derive(Parser, Debug)]
#[command(name = "calc")]
#[command(about = "Compounding calculator and goal planner")]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Print verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Constant,
    WinLoss,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a day-by-day sequence of P/L adjustments
    Manual {
        /// Starting capital
        #[arg(short, long, default_value = "3000")]
        capital: f64,

        /// Adjustment as AMOUNT[%][:NOTE], e.g. "200", "-1.5%", "3%:Expiry day"
        #[arg(short, long = "entry", allow_hyphen_values = true)]
        entries: Vec<String>,
    },

    /// Project capital day by day
    Project {
        /// Starting capital
        #[arg(short, long, default_value = "3000")]
        capital: f64,

        /// Number of days
        #[arg(short, long, default_value = "20")]
        days: i64,

        #[arg(short, long, value_enum, default_value = "constant")]
        mode: Mode,

        /// Daily growth (%) for constant mode
        #[arg(long, default_value = "2", allow_hyphen_values = true)]
        daily_pct: f64,

        /// Win rate (%) for win/loss mode
        #[arg(long, default_value = "50")]
        win_rate: f64,

        /// Gain per winning day (%)
        #[arg(long, default_value = "2")]
        win_pct: f64,

        /// Loss per losing day (%)
        #[arg(long, default_value = "1")]
        loss_pct: f64,

        /// Seed for a reproducible win/loss run
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Monte Carlo summary of many win/loss projections
    Batch {
        #[arg(short, long, default_value = "3000")]
        capital: f64,

        #[arg(short, long, default_value = "20")]
        days: i64,

        #[arg(long, default_value = "50")]
        win_rate: f64,

        #[arg(long, default_value = "2")]
        win_pct: f64,

        #[arg(long, default_value = "1")]
        loss_pct: f64,

        /// Number of simulated runs
        #[arg(short, long, default_value = "10000")]
        runs: usize,

        #[arg(long, default_value = "0")]
        seed: u64,
    },

    /// Required growth and win size to reach a target
    Goal {
        #[arg(short, long, default_value = "3000")]
        capital: f64,

        /// Target capital
        #[arg(short, long)]
        target: f64,

        #[arg(short, long, default_value = "20")]
        days: i64,

        #[arg(long, default_value = "50")]
        win_rate: f64,

        /// Loss per losing trade (%)
        #[arg(long, default_value = "1")]
        loss_pct: f64,
    },

    /// P/L of one trade
    Pnl {
        #[arg(long)]
        entry: f64,

        #[arg(long)]
        exit: f64,

        #[arg(long, default_value = "1")]
        lots: f64,

        #[arg(long, default_value = "75")]
        lot_size: f64,

        #[arg(long, default_value = "45")]
        charges: f64,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let limits = PlannerLimits::default();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Commands::Manual { capital, entries } => run_manual(capital, &entries),
        Commands::Project {
            capital,
            days,
            mode,
            daily_pct,
            win_rate,
            win_pct,
            loss_pct,
            seed,
        } => {
            limits.check_horizon(days)?;
            let config = match mode {
                Mode::Constant => ProjectionConfig::constant(capital, days, daily_pct),
                Mode::WinLoss => ProjectionConfig::win_loss(capital, days, win_rate, win_pct, loss_pct),
            };
            let summary = match seed {
                Some(seed) => project_summary(&config, &mut StdRng::seed_from_u64(seed))?,
                None => project_summary(&config, &mut rand::thread_rng())?,
            };
            print_projection(&config, &summary);
            Ok(())
        }
        Commands::Batch {
            capital,
            days,
            win_rate,
            win_pct,
            loss_pct,
            runs,
            seed,
        } => {
            limits.check_horizon(days)?;
            limits.check_runs(runs)?;
            let config = BatchConfig {
                projection: ProjectionConfig::win_loss(capital, days, win_rate, win_pct, loss_pct),
                runs,
                seed,
            };
            info!("Running {} simulations...", runs);
            let start = std::time::Instant::now();
            let summary = simulate_batch(&config)?;

            println!("\n{}", "=".repeat(60));
            println!("MONTE CARLO: {}", config.projection.mode);
            println!("{} runs x {} days from {:.2}", summary.runs, days, capital);
            println!("{}", "=".repeat(60));
            println!("  Mean final:         {:>14.2}", summary.mean_final_capital);
            println!("  Median final:       {:>14.2}", summary.median_final_capital);
            println!("  5th percentile:     {:>14.2}", summary.p5_final_capital);
            println!("  95th percentile:    {:>14.2}", summary.p95_final_capital);
            println!("  Finished in loss:   {:>13.2}%", summary.loss_probability_pct);
            println!("  Mean max drawdown:  {:>13.2}%", summary.mean_max_drawdown_pct);
            println!("  Worst max drawdown: {:>13.2}%", summary.worst_max_drawdown_pct);
            println!("\nDone in {:.2}s", start.elapsed().as_secs_f64());
            Ok(())
        }
        Commands::Goal {
            capital,
            target,
            days,
            win_rate,
            loss_pct,
        } => {
            let result = solve_goal(&GoalConfig {
                initial_capital: capital,
                target_capital: target,
                horizon_days: days,
                win_rate_pct: win_rate,
                loss_pct_per_trade: loss_pct,
            })?;

            println!("\n{}", "=".repeat(60));
            println!("GOAL: {:.2} -> {:.2} in {} days", capital, target, days);
            println!("{}", "=".repeat(60));
            println!("  Required daily growth: {:.4}%", result.required_daily_growth_pct);
            match result.required_win_pct {
                Some(win) => println!(
                    "  Required win size:     {:.4}% ({}% WR, -{}% per loss)",
                    win, win_rate, loss_pct
                ),
                None => println!("  Required win size:     undefined (win rate is 0%)"),
            }
            match result.reward_risk_ratio {
                Some(ratio) => println!("  Reward:risk:           {:.2}:1", ratio),
                None => println!("  Reward:risk:           n/a"),
            }
            Ok(())
        }
        Commands::Pnl {
            entry,
            exit,
            lots,
            lot_size,
            charges,
        } => {
            let pnl = trade_pnl(
                &TradeInput {
                    entry_price: entry,
                    exit_price: exit,
                    lots,
                },
                &TradeCosts { lot_size, charges },
            )?;
            println!("P/L: {:+.2}", pnl);
            Ok(())
        }
    }
}

/// Split `AMOUNT[%][:NOTE]` at the first `:`; the note may contain more colons
fn split_entry_arg(raw: &str) -> (&str, &str) {
    raw.split_once(':').unwrap_or((raw, ""))
}

fn run_manual(capital: f64, raw_entries: &[String]) -> Result<()> {
    let mut ledger = ManualLedger::new();

    for raw in raw_entries {
        let (amount, note) = split_entry_arg(raw);
        ledger
            .add_raw(amount, false, note)
            .with_context(|| format!("Bad entry '{}'", raw))?;
    }

    let summary = ledger.summarize(capital)?;

    println!("\n{}", "=".repeat(60));
    println!("MANUAL SEQUENCE from {:.2}", capital);
    println!("{}", "=".repeat(60));
    println!("  {:>4} {:>14} {:>16}  {}", "#", "P/L", "Capital", "Note");
    println!("  {}", "-".repeat(56));
    for row in &summary.rows {
        let note = if row.note.is_empty() { "-" } else { row.note.as_str() };
        println!(
            "  {:>4} {:>+14.2} {:>16.2}  {}",
            row.index, row.change, row.running_capital, note
        );
    }
    if summary.rows.is_empty() {
        println!("  (no entries)");
    }
    println!("  {}", "-".repeat(56));
    println!("  Total days: {}", summary.rows.len());
    println!("  Net P&L:    {:+.2}", summary.net_pnl);
    println!("  Final:      {:.2}", summary.final_capital);
    Ok(())
}

fn print_projection(config: &ProjectionConfig, summary: &ProjectionSummary) {
    println!("\n{}", "=".repeat(70));
    println!("PROJECTION: {} over {} days", config.mode, config.horizon_days);
    println!("{}", "=".repeat(70));
    println!(
        "  {:>5} {:>6} {:>9} {:>14} {:>16} {:>9}",
        "Day", "Kind", "Change%", "Change", "Capital", "DD%"
    );
    println!("  {}", "-".repeat(64));
    for row in &summary.rows {
        println!(
            "  {:>5} {:>6} {:>+9.2} {:>+14.2} {:>16.2} {:>9.2}",
            row.day,
            format!("{:?}", row.outcome),
            row.change_pct,
            row.change_amount,
            row.resulting_capital,
            row.drawdown_pct
        );
    }
    println!("  {}", "-".repeat(64));
    println!("  Final capital: {:.2}", summary.final_capital);
    println!("  ROI:           {:+.2}%", summary.roi_pct);
    println!("  Max drawdown:  {:.2}%", summary.max_drawdown_pct);
}
