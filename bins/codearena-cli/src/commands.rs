// CLI commands for practicing against the judge
use crate::adapter::ExecutionAdapter;
use crate::filter::{self, ProblemFilters};
use crate::render;
use crate::session::Session;
use crate::workspace::{Applied, ResultView, Workspace};
use anyhow::{bail, Context, Result};
use codearena_common::client::{HttpJudgeClient, ProblemCatalog};
use codearena_common::draft;
use codearena_common::types::{Language, ProblemDraft};
use codearena_common::Config;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Everything a command needs, built once at startup
pub struct AppContext {
    pub config: Config,
    pub session: Session,
    pub client: HttpJudgeClient,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let session = Session::from_credentials(config.user.clone(), config.token.clone());
        let client = HttpJudgeClient::new(
            &config.api_base_url,
            config.request_timeout_ms.map(Duration::from_millis),
        )
        .context("Failed to build HTTP client")?
        .with_token(session.token().map(str::to_string));

        Ok(Self {
            config,
            session,
            client,
        })
    }

    /// Logout on the way out
    pub fn shutdown(mut self) {
        self.session.end();
    }
}

/// clap value parser for `--lang`
pub fn parse_language(s: &str) -> Result<Language, String> {
    Language::from_str(s)
        .ok_or_else(|| format!("unsupported language '{}' (expected python, java, cpp)", s))
}

/// clap value parser for `--view`
pub fn parse_view(s: &str) -> Result<ResultView, String> {
    ResultView::from_str(s)
        .ok_or_else(|| format!("unknown view '{}' (expected code, testcase, result)", s))
}

/// List problems matching the filters
pub async fn list_problems(ctx: &mut AppContext, filters: ProblemFilters) -> Result<()> {
    let problems = ctx
        .client
        .list_problems()
        .await
        .context("Failed to fetch problems")?;

    if let Err(e) = ctx.session.refresh_solved(&ctx.client).await {
        // the list is still useful without solved marks
        warn!(error = %e, "could not fetch solved problems");
    }

    if let Some(user) = ctx.session.user() {
        println!("👤 Signed in as {}\n", user.name);
    }

    let visible = filter::filter_problems(&problems, ctx.session.solved_ids(), &filters);
    if visible.is_empty() {
        println!("No problems match the current filters.");
        return Ok(());
    }

    println!("📋 Problems:\n");
    print!("{}", render::problem_table(&visible, ctx.session.solved_ids()));
    println!("\n✅ Showing {} of {} problem(s)", visible.len(), problems.len());

    Ok(())
}

/// Print a problem statement and its examples
pub async fn show_problem(ctx: &mut AppContext, problem_id: &str, solutions: bool) -> Result<()> {
    let problem = ctx
        .client
        .fetch_problem(problem_id)
        .await
        .with_context(|| format!("Failed to fetch problem {}", problem_id))?;

    if let Err(e) = ctx.session.refresh_solved(&ctx.client).await {
        warn!(error = %e, "could not fetch solved problems");
    }

    print!("{}", render::problem_details(&problem, solutions));
    if ctx.session.has_solved(&problem.id) {
        println!("\n✓ Solved");
    }
    Ok(())
}

/// Run code against the visible test cases
pub async fn run_code(
    ctx: &AppContext,
    problem_id: &str,
    language: Option<Language>,
    file: Option<&Path>,
    view: Option<ResultView>,
) -> Result<()> {
    let mut ws = open_workspace(ctx, problem_id, language, file).await?;
    let adapter = ExecutionAdapter::new(ctx.client.clone());

    println!("🚀 Running {} solution for '{}'...", ws.selected_language().label(), ws.problem().title);
    ws.run(&adapter).await?;

    print!("{}", panel(&mut ws, view));
    Ok(())
}

/// Submit code for scoring against the hidden test cases
pub async fn submit_code(
    ctx: &AppContext,
    problem_id: &str,
    language: Option<Language>,
    file: Option<&Path>,
    view: Option<ResultView>,
) -> Result<()> {
    let mut ws = open_workspace(ctx, problem_id, language, file).await?;
    let adapter = ExecutionAdapter::new(ctx.client.clone());

    println!("📤 Submitting {} solution for '{}'...", ws.selected_language().label(), ws.problem().title);
    ws.submit(&adapter).await?;

    if ws.last_submit_result().is_none() {
        // transport failures leave no result to show
        eprintln!("⚠️  No result received from the judge");
    }
    print!("{}", panel(&mut ws, view));
    Ok(())
}

/// Run first, submit only when every example passes
pub async fn solve(
    ctx: &AppContext,
    problem_id: &str,
    language: Option<Language>,
    file: Option<&Path>,
    view: Option<ResultView>,
) -> Result<()> {
    let mut ws = open_workspace(ctx, problem_id, language, file).await?;
    let adapter = ExecutionAdapter::new(ctx.client.clone());

    println!("🚀 Running examples for '{}'...", ws.problem().title);
    ws.run(&adapter).await?;
    print!("{}", render::active_panel(&ws));

    let all_passed = ws.last_run_result().map(|r| r.success).unwrap_or(false);
    if !all_passed {
        println!("\n⚠️  Fix the failing examples before submitting");
        return Ok(());
    }

    println!("\n📤 Examples passed, submitting...");
    if ws.submit(&adapter).await? == Applied::Stale {
        bail!("Submit response was superseded");
    }
    print!("{}", panel(&mut ws, view));
    Ok(())
}

/// Admin: validate a problem draft and publish it
pub async fn create_problem(ctx: &AppContext, file: &Path, dry_run: bool) -> Result<()> {
    let problem = load_draft(file)?;

    if dry_run {
        println!("\n💡 Dry run, nothing was published");
        return Ok(());
    }
    require_session(ctx, "Creating problems")?;

    ctx.client
        .create_problem(&problem)
        .await
        .context("Failed to create problem")?;

    println!("✅ Problem '{}' created successfully!", problem.title);
    Ok(())
}

/// Admin: print the editable document, or replace it with a draft file
pub async fn update_problem(
    ctx: &AppContext,
    problem_id: &str,
    file: Option<&Path>,
    dry_run: bool,
) -> Result<()> {
    let Some(file) = file else {
        require_session(ctx, "Updating problems")?;
        let current = fetch_admin_problem(ctx, problem_id).await?;
        println!("{}", serde_json::to_string_pretty(&current)?);
        return Ok(());
    };

    let problem = load_draft(file)?;
    if dry_run {
        println!("\n💡 Dry run, nothing was published");
        return Ok(());
    }
    require_session(ctx, "Updating problems")?;

    let current = fetch_admin_problem(ctx, problem_id).await?;
    info!(id = problem_id, from = %current.title, to = %problem.title, "replacing problem");

    ctx.client
        .update_problem(problem_id, &problem)
        .await
        .with_context(|| format!("Failed to update problem {}", problem_id))?;

    println!("✅ Problem '{}' updated successfully!", problem.title);
    Ok(())
}

/// Admin: remove a problem's editorial video
pub async fn delete_video(ctx: &AppContext, problem_id: &str, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("Deleting the video for {} needs --yes", problem_id);
    }
    require_session(ctx, "Deleting videos")?;

    ctx.client
        .delete_video(problem_id)
        .await
        .with_context(|| format!("Failed to delete video for problem {}", problem_id))?;

    println!("🗑️  Video for problem {} deleted", problem_id);
    Ok(())
}

fn require_session(ctx: &AppContext, action: &str) -> Result<()> {
    if !ctx.session.is_active() {
        bail!("{} requires a session; set CODEARENA_TOKEN", action);
    }
    Ok(())
}

/// Read, parse and validate a draft, listing every violation
fn load_draft(file: &Path) -> Result<ProblemDraft> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let problem: ProblemDraft = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    if let Err(e) = draft::validate(&problem) {
        println!("❌ Draft has {} problem(s):", e.violations.len());
        for violation in &e.violations {
            println!("  - {}", violation);
        }
        bail!(e);
    }
    println!("✓ Draft '{}' is valid", problem.title);
    Ok(problem)
}

async fn fetch_admin_problem(ctx: &AppContext, problem_id: &str) -> Result<ProblemDraft> {
    ctx.client
        .fetch_admin_problem(problem_id)
        .await
        .with_context(|| format!("Failed to fetch problem {}", problem_id))
}

/// Switch to the requested tab, if any, and render it
fn panel(ws: &mut Workspace, view: Option<ResultView>) -> String {
    if let Some(view) = view {
        ws.set_active_view(view);
    }
    render::active_panel(ws)
}

async fn open_workspace(
    ctx: &AppContext,
    problem_id: &str,
    language: Option<Language>,
    file: Option<&Path>,
) -> Result<Workspace> {
    let problem = ctx
        .client
        .fetch_problem(problem_id)
        .await
        .with_context(|| format!("Failed to fetch problem {}", problem_id))?;

    let mut ws = Workspace::open(problem, ctx.config.default_language)
        .with_admission(ctx.config.admission)
        .with_ordering(ctx.config.ordering);

    if let Some(language) = language {
        if language != ws.selected_language() {
            ws.select_language(language);
        }
    }

    // the file replaces the starter code, so load it after picking the language
    if let Some(path) = file {
        let code = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        ws.edit_code(code);
    }

    Ok(ws)
}
