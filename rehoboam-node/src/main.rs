//! rehoboam-node: timeline, checklist, goals, and sync from the terminal.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use rehoboam_core::{
    average_probability, generate_timeline, month_name, predictions, AdoptionStatus, Domain, Goal,
    YearMonth,
};
use rehoboam_narrative::{fallback_summary, NarrativeContext, NarrativeOutcome, NarrativeService, OpenAiBackend};
use rehoboam_node::{ChecklistService, Config, GatewayHandle, LogNotifier};
use rehoboam_store::{GoalStore, KvStore, StateStore};
use rehoboam_sync::{resolve_user_id, AuthSession, GatewayClient};

#[derive(Parser)]
#[command(name = "rehoboam-node")]
#[command(about = "Future prediction timeline and tech adoption tracker")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "rehoboam.toml")]
    config: String,

    /// Data directory (overrides config file)
    #[arg(short, long, env = "REHOBOAM_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the month-by-month prediction timeline
    Timeline {
        /// First year to include (defaults to the catalog start)
        #[arg(long)]
        start_year: Option<i32>,

        /// Last year to include (defaults to the catalog end)
        #[arg(long)]
        end_year: Option<i32>,

        /// Restrict the probability average to these domains
        #[arg(long = "domain", value_parser = parse_domain)]
        domains: Vec<Domain>,
    },

    /// Show the cumulative adoption checklist for a month
    Checklist {
        #[arg(long)]
        year: i32,

        /// Month (1-12)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },

    /// Record an adoption status change effective at a month
    SetStatus {
        node_id: String,

        /// One of: not-started, r-and-d, pilot, early-adopters,
        /// mass-market, ubiquitous, regulated
        #[arg(value_parser = parse_status)]
        status: AdoptionStatus,

        #[arg(long)]
        year: i32,

        /// Month (1-12)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },

    /// Manage personal goals on the timeline
    Goals {
        #[command(subcommand)]
        command: GoalsCommand,
    },

    /// Exchange adoption records with the sync gateway
    Sync {
        #[command(subcommand)]
        command: SyncCommand,
    },

    /// Generate the lived-experience summary for a month
    Narrative {
        #[arg(long)]
        year: i32,

        /// Month (1-12)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },
}

#[derive(Subcommand)]
enum GoalsCommand {
    /// Add a goal targeting a month
    Add {
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        year: i32,

        /// Month (1-12)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,

        /// Related domains
        #[arg(long = "domain", value_parser = parse_domain)]
        domains: Vec<Domain>,
    },

    /// List all goals
    List,

    /// Flip a goal's completion flag
    Toggle { id: String },

    /// Delete a goal
    Remove { id: String },
}

#[derive(Subcommand)]
enum SyncCommand {
    /// Fetch remote records and merge them into the local log
    Pull,

    /// Push queued local records to the gateway
    Push,
}

fn parse_domain(s: &str) -> Result<Domain, String> {
    Domain::parse(s).ok_or_else(|| format!("unknown domain: {s}"))
}

fn parse_status(s: &str) -> Result<AdoptionStatus, String> {
    AdoptionStatus::parse(s).ok_or_else(|| format!("unknown status: {s}"))
}

/// Authenticated gateway session from the environment, when present.
fn session_from_env() -> Option<AuthSession> {
    let user_id = std::env::var("REHOBOAM_USER_ID").ok()?;
    let access_token = std::env::var("REHOBOAM_ACCESS_TOKEN").ok()?;
    Some(AuthSession {
        user_id,
        access_token,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rehoboam=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(std::path::Path::new(&cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.node.data_dir = data_dir;
    }

    let kv = Arc::new(KvStore::open(&config.node.data_dir)?);
    let goals = GoalStore::new(Arc::clone(&kv));
    let states = StateStore::new(Arc::clone(&kv));

    let session = session_from_env();
    let gateway = match &config.gateway {
        Some(gateway_config) => {
            let user_id = resolve_user_id(&kv, session.as_ref())?;
            let mut client = GatewayClient::new(gateway_config.clone())?;
            if let Some(session) = session {
                client = client.with_session(session);
            }
            info!(user_id = %user_id, "Sync gateway configured");
            Some(GatewayHandle { client, user_id })
        }
        None => None,
    };

    let checklist = ChecklistService::new(states, gateway, Arc::new(LogNotifier));

    match cli.command {
        Command::Timeline {
            start_year,
            end_year,
            domains,
        } => {
            let range = predictions::year_range();
            let start = start_year.unwrap_or(range.min_year);
            let end = end_year.unwrap_or(range.max_year);

            for month_data in generate_timeline(start, end) {
                let average = average_probability(&month_data.probabilities, &domains);
                if month_data.predictions.is_empty() {
                    println!(
                        "{} {:<4}  avg {:.2}",
                        month_name(month_data.month),
                        month_data.year,
                        average
                    );
                    continue;
                }
                println!(
                    "{} {:<4}  avg {:.2}  {} prediction(s)",
                    month_name(month_data.month),
                    month_data.year,
                    average,
                    month_data.predictions.len()
                );
                for prediction in &month_data.predictions {
                    println!(
                        "    [{}] {:.0}%  {}",
                        prediction.domain.label(),
                        prediction.probability * 100.0,
                        prediction.title
                    );
                }
            }
        }

        Command::Checklist { year, month } => {
            let month = month - 1;
            checklist.pull_remote().await?;

            let stats = checklist.stats(year, month)?;
            println!(
                "Cumulative breakthroughs through {}: {} of {} tracked ({}%)",
                YearMonth::new(year, month).label(),
                stats.completed,
                stats.total,
                stats.percentage
            );

            for row in checklist.rows(year, month)? {
                println!(
                    "  [{:<14}] {:<10} {}",
                    row.status.label(),
                    row.node.id,
                    row.node.title
                );
            }
        }

        Command::SetStatus {
            node_id,
            status,
            year,
            month,
        } => {
            let month = month - 1;
            checklist.set_status(&node_id, status, year, month).await?;
            println!(
                "{} -> {} (effective {})",
                node_id,
                status.label(),
                YearMonth::new(year, month).label()
            );
        }

        Command::Goals { command } => match command {
            GoalsCommand::Add {
                title,
                description,
                year,
                month,
                domains,
            } => {
                let goal = Goal::new(title, description, year, month - 1, domains);
                println!("Added goal {}", goal.id);
                goals.add(goal)?;
            }
            GoalsCommand::List => {
                let all = goals.list()?;
                if all.is_empty() {
                    println!("No goals yet");
                }
                for goal in all {
                    let mark = if goal.completed { "x" } else { " " };
                    println!(
                        "[{}] {}  {}  ({})",
                        mark,
                        YearMonth::new(goal.target_year, goal.target_month).label(),
                        goal.title,
                        goal.id
                    );
                }
            }
            GoalsCommand::Toggle { id } => {
                if goals.toggle_completed(&id)? {
                    println!("Toggled {}", id);
                } else {
                    println!("No goal with id {}", id);
                }
            }
            GoalsCommand::Remove { id } => {
                if goals.remove(&id)? {
                    println!("Removed {}", id);
                } else {
                    println!("No goal with id {}", id);
                }
            }
        },

        Command::Sync { command } => match command {
            SyncCommand::Pull => {
                checklist.pull_remote().await?;
                println!("Local log holds {} record(s)", checklist.records()?.len());
            }
            SyncCommand::Push => {
                checklist.flush_pending().await?;
            }
        },

        Command::Narrative { year, month } => {
            let month = month - 1;
            let timeline = generate_timeline(year, year);
            let month_data = &timeline[month as usize];
            let context = NarrativeContext::build(month_data, &checklist.records()?);

            let text = match &config.narrative.base_url {
                Some(base_url) => {
                    let api_key = std::env::var("REHOBOAM_NARRATIVE_API_KEY").ok();
                    let backend =
                        OpenAiBackend::new(base_url.clone(), config.narrative.model.clone(), api_key)?;
                    let service = NarrativeService::new(Arc::new(backend));
                    match service.lived_experience(&context).await {
                        NarrativeOutcome::Generated(text) => text,
                        NarrativeOutcome::Fallback { text, reason } => {
                            if let Some(reason) = reason {
                                eprintln!("(offline summary; backend failed: {reason})");
                            } else {
                                eprintln!("(offline summary; backend returned nothing)");
                            }
                            text
                        }
                    }
                }
                None => fallback_summary(&context),
            };

            println!("{text}");
        }
    }

    Ok(())
}
