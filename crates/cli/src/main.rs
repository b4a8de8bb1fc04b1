use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use storage::{
    Database,
    dto::rules::describe_catalog,
    services::{ReconcileMode, RoundScope, class_results, local_now, reconcile_statuses},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "showring")]
#[command(about = "Show jumping class rules, results and status tooling", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Move shows and classes to the status their schedule calls for
    Reconcile {
        /// Evaluate at this local time instead of now (YYYY-MM-DDTHH:MM:SS)
        #[arg(long)]
        at: Option<NaiveDateTime>,

        #[arg(long)]
        dry_run: bool,
    },
    /// List the class rule catalog
    Rules,
    /// Print the results board of a class
    Standings {
        class_id: Uuid,

        #[arg(long, default_value_t = 1)]
        round: i32,

        #[arg(long)]
        jumpoff: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("showring={},storage={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Reconcile { at, dry_run } => {
            let db = connect(cli.database_url.as_deref()).await?;
            handle_reconcile(&db, at.unwrap_or_else(local_now), dry_run, cli.json).await?;
        }
        Commands::Rules => handle_rules(cli.json)?,
        Commands::Standings {
            class_id,
            round,
            jumpoff,
        } => {
            let db = connect(cli.database_url.as_deref()).await?;
            let scope = RoundScope {
                round_number: round,
                is_jumpoff: jumpoff,
            };
            handle_standings(&db, class_id, scope, cli.json).await?;
        }
    }

    Ok(())
}

async fn connect(database_url: Option<&str>) -> anyhow::Result<Database> {
    let url = database_url.context("DATABASE_URL is required for this command")?;
    Database::connect(url, 2)
        .await
        .context("Failed to connect to database")
}

async fn handle_reconcile(
    db: &Database,
    now: NaiveDateTime,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mode = if dry_run {
        ReconcileMode::DryRun
    } else {
        ReconcileMode::Apply
    };

    tracing::info!("Reconciling statuses at {}", now);
    let report = reconcile_statuses(db, now, mode).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for change in &report.changes {
            println!(
                "{:<6} {} {:<40} {} -> {}",
                format!("{:?}", change.entity).to_lowercase(),
                change.id,
                change.name,
                change.previous_status,
                change.new_status
            );
        }
        println!(
            "{} evaluated, {} changed{}, {} failed",
            report.evaluated,
            report.changes.len(),
            if report.dry_run { " (dry run)" } else { "" },
            report.failures
        );
    }

    if report.failures > 0 {
        anyhow::bail!("{} status update(s) failed", report.failures);
    }

    Ok(())
}

fn handle_rules(json: bool) -> anyhow::Result<()> {
    let catalog = describe_catalog();

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    for rule in &catalog {
        let required: Vec<String> = rule
            .required_parameters
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();
        println!(
            "{:<34} rounds={}{} basis={:?} time={:?} team={} requires=[{}]",
            rule.rule.as_str(),
            rule.main_rounds,
            if rule.allows_jumpoff { "+JO" } else { "" },
            rule.basis,
            rule.time_mode,
            rule.team_aggregate,
            required.join(", ")
        );
    }

    Ok(())
}

async fn handle_standings(
    db: &Database,
    class_id: Uuid,
    scope: RoundScope,
    json: bool,
) -> anyhow::Result<()> {
    let results = class_results(db, class_id, scope).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!(
        "{} ({}) round {}{}",
        results.class_name,
        results.class_rule,
        results.round_number,
        if results.is_jumpoff { " jump-off" } else { "" }
    );

    for row in &results.rows {
        let rank = row
            .rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        let faults = row
            .points
            .or(row.total_faults)
            .map(|v| v.to_string())
            .unwrap_or_default();
        let time = row.final_time.map(|t| t.to_string()).unwrap_or_default();
        println!(
            "{:>3}{} #{:<3} {:<28} {:<24} {:>6} {:>8}",
            rank,
            if row.qualified_for_jumpoff { "*" } else { " " },
            row.start_order,
            row.rider_name,
            row.horse_name,
            faults,
            time
        );
    }

    if !results.teams.is_empty() {
        println!();
        for team in &results.teams {
            println!(
                "{:>3}  {:<28} {:>6} {:>8}",
                team.rank, team.team_name, team.total_faults, team.total_time
            );
        }
    }

    Ok(())
}
