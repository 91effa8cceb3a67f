mod http;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use floorplan::analysis::{AnalysisError, parse_model_output};
use floorplan::config::EditorConfig;
use floorplan::doc::{FloorplanDocument, Point};
use floorplan::drag::DragController;
use floorplan::error::EditorError;
use floorplan::job::{FetchError, FloorplanSink, JobSource, JobStatus, ResultView, SaveError, resolve_view};
use floorplan::poller::{JobPoller, PollExit, PollHandle, ProgressDots, run_poller};
use floorplan::scene::build_scene;
use floorplan::svg::to_svg;
use floorplan::viewport::Viewport;
use serde_json::{Value, json};
use tokio::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::http::HttpBackend;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("job {job_id} is still {status}; use `watch` to wait for it")]
    JobRunning { job_id: String, status: JobStatus },
    #[error("stopped polling job {0} before it finished")]
    Cancelled(String),
}

#[derive(Parser, Debug)]
#[command(name = "floorplan", about = "Floorplan analysis jobs and documents")]
struct Cli {
    #[arg(long, env = "FLOORPLAN_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "FLOORPLAN_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    http_timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

struct CliContext {
    backend: HttpBackend,
    config: EditorConfig,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll a job until analysis finishes, then print the editor view.
    Watch {
        job_id: String,

        #[arg(long, help = "Poll interval; defaults to FLOORPLAN_POLL_INTERVAL_MS")]
        interval_ms: Option<u64>,

        #[arg(long, help = "Give up after this many seconds")]
        timeout_secs: Option<u64>,
    },
    /// Fetch a job and print the view the editor would open.
    Show { job_id: String },
    /// Render a floorplan as a standalone SVG.
    ExportSvg {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, help = "Output file; stdout when omitted")]
        out: Option<PathBuf>,
    },
    /// Move one item by a screen-space offset, as a pointer drag would.
    Drag(DragArgs),
    /// Parse raw vision model output into a floorplan.
    Parse {
        #[arg(long, default_value = "-", help = "Input file path, or - for stdin")]
        input: String,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    #[arg(long, conflicts_with = "file", help = "Load the floorplan from this job")]
    job: Option<String>,

    #[arg(long, help = "Load the floorplan from a JSON file")]
    file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DragArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[arg(long)]
    item: usize,

    #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
    dx: f64,

    #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
    dy: f64,

    #[arg(long, help = "Viewport scale during the drag; defaults to FLOORPLAN_INITIAL_SCALE")]
    scale: Option<f64>,

    #[arg(long, default_value_t = false, help = "Save the result back to the job")]
    save: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    init_tracing();

    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cli.http_timeout_secs))
        .build()?;
    let ctx = CliContext {
        backend: HttpBackend::new(client, cli.base_url),
        config: EditorConfig::from_env(),
    };

    match cli.command {
        Command::Watch { job_id, interval_ms, timeout_secs } => run_watch(&ctx, &job_id, interval_ms, timeout_secs).await,
        Command::Show { job_id } => run_show(&ctx, &job_id).await,
        Command::ExportSvg { source, out } => run_export_svg(&ctx, source, out).await,
        Command::Drag(args) => run_drag(&ctx, args).await,
        Command::Parse { input } => run_parse(&input),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run_watch(
    ctx: &CliContext,
    job_id: &str,
    interval_ms: Option<u64>,
    timeout_secs: Option<u64>,
) -> Result<(), CliError> {
    let job = ctx.backend.fetch_job(job_id).await?;
    let mut poller = JobPoller::new(job_id, job.status);
    let handle = PollHandle::new();
    let interval = interval_ms.map_or(ctx.config.poll_interval(), Duration::from_millis);
    let deadline = timeout_secs.map(|secs| Instant::now() + Duration::from_secs(secs));

    let exit = {
        let poll = run_poller(&mut poller, &ctx.backend, interval, &handle, tokio::time::sleep);
        tokio::pin!(poll);
        let mut dots = ProgressDots::new();
        let mut ticker = tokio::time::interval(ctx.config.dots_interval());
        loop {
            tokio::select! {
                exit = &mut poll => break exit,
                _ = ticker.tick() => {
                    dots.advance();
                    eprint!("\r{:<20}", dots.label());
                }
                () = wait_until(deadline), if !handle.is_cancelled() => {
                    warn!(job_id, "timed out; stopping after the current poll");
                    handle.cancel();
                }
            }
        }
    };
    eprintln!();

    match exit {
        PollExit::AlreadyTerminal(status) | PollExit::Reload(status) => {
            info!(job_id, %status, requests = poller.requests(), "reloading job");
            let job = ctx.backend.fetch_job(job_id).await?;
            print_json(&view_json(&resolve_view(Some(&job))))
        }
        PollExit::Cancelled => Err(CliError::Cancelled(job_id.to_owned())),
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn run_show(ctx: &CliContext, job_id: &str) -> Result<(), CliError> {
    let job = ctx.backend.fetch_job(job_id).await?;
    print_json(&view_json(&resolve_view(Some(&job))))
}

async fn run_export_svg(ctx: &CliContext, source: SourceArgs, out: Option<PathBuf>) -> Result<(), CliError> {
    let (doc, _) = load_document(ctx, source).await?;
    let viewport = Viewport::new(&ctx.config);
    let svg = to_svg(&build_scene(&doc, viewport.transform(), None, false));
    match out {
        Some(path) => {
            fs::write(&path, svg)?;
            info!(path = %path.display(), "wrote svg");
        }
        None => println!("{svg}"),
    }
    Ok(())
}

async fn run_drag(ctx: &CliContext, args: DragArgs) -> Result<(), CliError> {
    let (doc, job_id) = load_document(ctx, args.source).await?;
    let mut config = ctx.config;
    if let Some(scale) = args.scale {
        config.initial_scale = scale;
    }
    let viewport = Viewport::new(&config.sanitized());

    let start = doc
        .item(args.item)
        .map_or(Point::default(), |item| viewport.room_to_screen(item.position));
    let mut drag = DragController::new();
    drag.begin_drag(&doc, args.item, start, false)?;
    drag.update_pointer(start.offset(args.dx, args.dy));
    let moved = drag.finish(&doc, &viewport)?.unwrap_or(doc);

    if args.save {
        let job_id = job_id.ok_or(SaveError::NoJob)?;
        ctx.backend.save_floorplan(&job_id, &moved).await?;
        info!(%job_id, item = args.item, "floorplan saved");
    }
    println!("{}", moved.to_json_pretty()?);
    Ok(())
}

fn run_parse(input: &str) -> Result<(), CliError> {
    let text = if input == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        text
    } else {
        fs::read_to_string(input)?
    };
    match parse_model_output(&text) {
        Ok(doc) => {
            println!("{}", doc.to_json_pretty()?);
            Ok(())
        }
        Err(err) => {
            print_json(&err.to_result_payload())?;
            Err(err.into())
        }
    }
}

/// Resolve the document named by `source`: a job result, a JSON file, or the
/// demo room when neither is given.
async fn load_document(ctx: &CliContext, source: SourceArgs) -> Result<(FloorplanDocument, Option<String>), CliError> {
    if let Some(path) = source.file {
        let text = fs::read_to_string(path)?;
        return Ok((FloorplanDocument::from_json(&text)?, None));
    }
    let Some(job_id) = source.job else {
        return Ok((FloorplanDocument::demo(), None));
    };
    let job = ctx.backend.fetch_job(&job_id).await?;
    match resolve_view(Some(&job)) {
        ResultView::Polling { job_id, status } => Err(CliError::JobRunning { job_id, status }),
        ResultView::Editor { document, job_id, error, source } => {
            if let Some(error) = error {
                warn!(%error, badge = source.badge(), "job has no usable analysis");
            }
            Ok((document, job_id))
        }
    }
}

fn view_json(view: &ResultView) -> Value {
    match view {
        ResultView::Polling { job_id, status } => json!({
            "view": "polling",
            "jobId": job_id,
            "status": status,
        }),
        ResultView::Editor { document, source, job_id, error } => json!({
            "view": "editor",
            "source": source.badge(),
            "jobId": job_id,
            "error": error,
            "document": document,
        }),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
