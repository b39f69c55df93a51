mod adapter;
mod commands;
mod filter;
mod render;
mod session;
mod starter;
mod workspace;

use anyhow::Result;
use clap::{Parser, Subcommand};
use codearena_common::types::{Difficulty, Language, Tag};
use codearena_common::Config;
use filter::{Choice, ProblemFilters, StatusFilter};
use workspace::ResultView;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "codearena")]
#[command(about = "CodeArena CLI - Browse problems, run and submit solutions", long_about = None)]
struct Cli {
    /// Judge backend base URL (overrides CODEARENA_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true, env = "CODEARENA_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List problems
    List {
        /// all, easy, medium, hard
        #[arg(short, long, default_value = "all", value_parser = filter::parse_difficulty)]
        difficulty: Choice<Difficulty>,

        /// all, array, linked-list, graph, dp, string
        #[arg(short, long, default_value = "all", value_parser = filter::parse_tag)]
        tag: Choice<Tag>,

        /// all, solved, unsolved
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,
    },

    /// Show a problem statement
    Show {
        /// Problem identifier
        id: String,

        /// Include reference solutions
        #[arg(long)]
        solutions: bool,
    },

    /// Run code against the example test cases
    Run {
        /// Problem identifier
        id: String,

        /// Language (python, java, cpp); defaults to CODEARENA_LANGUAGE
        #[arg(short, long, value_parser = commands::parse_language)]
        lang: Option<Language>,

        /// Source file; defaults to the problem's starter code
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Tab to print afterwards (code, testcase, result)
        #[arg(long, value_parser = commands::parse_view)]
        view: Option<ResultView>,
    },

    /// Submit code for evaluation
    Submit {
        /// Problem identifier
        id: String,

        #[arg(short, long, value_parser = commands::parse_language)]
        lang: Option<Language>,

        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(long, value_parser = commands::parse_view)]
        view: Option<ResultView>,
    },

    /// Run the examples, then submit if they all pass
    Solve {
        /// Problem identifier
        id: String,

        #[arg(short, long, value_parser = commands::parse_language)]
        lang: Option<Language>,

        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(long, value_parser = commands::parse_view)]
        view: Option<ResultView>,
    },

    /// Create a problem from a JSON draft (admin)
    Create {
        /// Path to the draft
        #[arg(short, long)]
        file: PathBuf,

        /// Validate only
        #[arg(long)]
        dry_run: bool,
    },

    /// Print a problem's editable JSON, or replace it from a draft (admin)
    Update {
        /// Problem identifier
        id: String,

        /// Replacement draft; without it the current document is printed
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Validate only
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete a problem's editorial video (admin)
    DeleteVideo {
        /// Problem identifier
        id: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = Config::from_env();
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    debug!(
        api = %config.api_base_url,
        admission = %config.admission,
        ordering = %config.ordering,
        "configuration loaded"
    );

    let mut ctx = commands::AppContext::new(config)?;

    let outcome = match cli.command {
        Commands::List {
            difficulty,
            tag,
            status,
        } => {
            let filters = ProblemFilters {
                difficulty,
                tag,
                status,
            };
            commands::list_problems(&mut ctx, filters).await
        }
        Commands::Show { id, solutions } => {
            commands::show_problem(&mut ctx, &id, solutions).await
        }
        Commands::Run {
            id,
            lang,
            file,
            view,
        } => commands::run_code(&ctx, &id, lang, file.as_deref(), view).await,
        Commands::Submit {
            id,
            lang,
            file,
            view,
        } => commands::submit_code(&ctx, &id, lang, file.as_deref(), view).await,
        Commands::Solve {
            id,
            lang,
            file,
            view,
        } => commands::solve(&ctx, &id, lang, file.as_deref(), view).await,
        Commands::Create { file, dry_run } => {
            commands::create_problem(&ctx, &file, dry_run).await
        }
        Commands::Update { id, file, dry_run } => {
            commands::update_problem(&ctx, &id, file.as_deref(), dry_run).await
        }
        Commands::DeleteVideo { id, yes } => commands::delete_video(&ctx, &id, yes).await,
    };

    ctx.shutdown();
    outcome
}
