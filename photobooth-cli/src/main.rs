use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use photobooth::{
    ClipOpts, DEFAULT_STYLE, EditOutcome, ExportSettings, FfmpegCamera, FfmpegVideo,
    FrameSequence, GitHubUploader, Orchestrator, PhotoboothConfig, PhotoboothError,
    PresentationMode, PreviewOpts, ProxyStylizer, SampleCount, SessionHandle, StylizeEndpoint,
    UploadKind, build_stylizer, capture_photo, classify_upload, load_image_upload, sample_video,
    save_output, save_pdf, save_preview,
};

#[derive(Parser, Debug)]
#[command(name = "photobooth", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture, stylize, edit and export one piece of artwork.
    Run(RunArgs),
    /// Capture only, and write a looping preview clip of the captured frames.
    Preview(PreviewArgs),
    /// Save the GitHub export destination.
    Github(GithubArgs),
    /// Check that a stylize proxy is up.
    Health(HealthArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Input image or video file.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Take a snapshot from the configured camera instead.
    #[arg(long)]
    camera: bool,
}

#[derive(Args, Debug)]
struct SamplingArgs {
    /// Frames sampled from a video input (values below 1 are raised to 1).
    #[arg(long, allow_negative_numbers = true)]
    samples: Option<i64>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Style label sent to the image service.
    #[arg(long, default_value = DEFAULT_STYLE)]
    style: String,

    #[command(flatten)]
    sampling: SamplingArgs,

    /// Edit applied to the result; repeat to chain edits.
    #[arg(long = "edit")]
    edits: Vec<String>,

    /// Output directory.
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Also write a PDF with one page per output frame.
    #[arg(long, default_value_t = false)]
    pdf: bool,

    /// Also commit the first output frame to the configured GitHub repository.
    #[arg(long, default_value_t = false)]
    upload: bool,

    /// Config JSON file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Route stylize calls through a proxy at this URL.
    #[arg(long)]
    proxy: Option<String>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    sampling: SamplingArgs,

    /// Full passes over the captured frames (defaults to 3).
    #[arg(long)]
    loops: Option<u32>,

    /// Output directory.
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Config JSON file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct GithubArgs {
    /// Destination repository (`owner/name`).
    #[arg(long)]
    repo: String,

    /// Access token with contents write permission.
    #[arg(long)]
    token: String,

    /// Settings file (defaults to `export.settings_path` from `--config`, then the platform
    /// config directory).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Config JSON file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct HealthArgs {
    /// Proxy base URL.
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    url: String,

    /// Request timeout in milliseconds.
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Github(args) => cmd_github(args),
        Command::Health(args) => cmd_health(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PhotoboothConfig> {
    let cfg = match path {
        Some(path) => PhotoboothConfig::from_path(path)?,
        None => PhotoboothConfig::default(),
    };
    Ok(cfg)
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(base_url) = args.proxy.clone() {
        cfg.stylize.endpoint = StylizeEndpoint::Proxy { base_url };
    }

    let session = SessionHandle::new();
    session.load(capture(&args.source, &args.sampling, &cfg)?);

    let orchestrator = Orchestrator::new(build_stylizer(&cfg.stylize));
    match orchestrator.stylize_batch(&session, &args.style) {
        Ok(report) => {
            eprintln!(
                "stylized {}/{} frames ({} skipped)",
                report.produced,
                report.total,
                report.skipped.len()
            );
        }
        Err(PhotoboothError::BatchAborted {
            index,
            produced,
            source,
        }) if produced > 0 => {
            eprintln!("warning: stopped at frame {index} ({source}); keeping {produced} frames");
        }
        Err(e) => return Err(e.into()),
    }

    let edit_failure = apply_edits(&orchestrator, &session, &args.edits);

    let output = session.stylized();
    let mode = PresentationMode::for_sequence(&output);
    eprintln!("presentation: {mode:?}");
    if mode == PresentationMode::Empty {
        anyhow::bail!("the image service returned no output");
    }

    let saved = save_output(&output, &args.out, ClipOpts::from(&cfg.present))?;
    eprintln!("wrote {}", saved.path().display());

    if args.pdf {
        let path = save_pdf(&output, cfg.export.pdf_margin_mm, &args.out)?;
        eprintln!("wrote {}", path.display());
    }

    if args.upload {
        upload_first(&output, &cfg)?;
    }

    match edit_failure {
        Some(err) => Err(err.context("an edit failed; saved the output from before it")),
        None => Ok(()),
    }
}

/// Apply `edits` in order, stopping at the first failure. Output already in the session
/// stays as it was, so the caller can still save it.
fn apply_edits(
    orchestrator: &Orchestrator,
    session: &SessionHandle,
    edits: &[String],
) -> Option<anyhow::Error> {
    for (applied, text) in edits.iter().enumerate() {
        match orchestrator.edit_first(session, text) {
            Ok(EditOutcome::Applied { .. }) => eprintln!("applied edit: {text}"),
            Ok(EditOutcome::NoOutput { advisory }) => eprintln!(
                "edit '{text}' produced no image{}",
                advisory.map(|a| format!(": {a}")).unwrap_or_default()
            ),
            Err(e) => {
                let skipped = edits.len() - applied - 1;
                eprintln!("error: edit '{text}' failed ({e}); skipping {skipped} later edit(s)");
                return Some(anyhow::Error::new(e).context(format!("edit '{text}'")));
            }
        }
    }
    None
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let captured = capture(&args.source, &args.sampling, &cfg)?;
    let mut opts = PreviewOpts::from(&cfg.present);
    if let Some(loops) = args.loops {
        opts.loops = loops;
    }
    let saved = save_preview(&captured, &args.out, opts)?;
    eprintln!("wrote {}", saved.path().display());
    Ok(())
}

fn capture(
    source: &SourceArgs,
    sampling: &SamplingArgs,
    cfg: &PhotoboothConfig,
) -> anyhow::Result<FrameSequence> {
    if source.camera {
        let camera = FfmpegCamera::new(cfg.capture.camera.clone());
        return Ok(capture_photo(&camera, cfg.capture.photo_jpeg_quality)?);
    }
    let path = source
        .in_path
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("pass --in <file> or --camera"))?;
    let seq = match classify_upload(path)? {
        UploadKind::Image { .. } => load_image_upload(path)?,
        UploadKind::Video => {
            let count = SampleCount::new(
                sampling
                    .samples
                    .unwrap_or_else(|| i64::from(cfg.capture.sample_count)),
            );
            let mut video = FfmpegVideo::open(path)?;
            sample_video(&mut video, count, cfg.capture.sample_jpeg_quality)?
        }
    };
    eprintln!("captured {} frame(s) from {}", seq.len(), path.display());
    Ok(seq)
}

fn upload_first(output: &FrameSequence, cfg: &PhotoboothConfig) -> anyhow::Result<()> {
    let settings_path = cfg.export.resolved_settings_path();
    let settings = ExportSettings::load(&settings_path)?;
    if !settings.is_configured() {
        anyhow::bail!(
            "GitHub export is not configured; run `photobooth github --repo <owner/name> --token <token>` first"
        );
    }
    let Some(frame) = output.first() else {
        anyhow::bail!("nothing to upload");
    };
    let uploader = GitHubUploader::new(
        cfg.export.github_api_base.clone(),
        Duration::from_millis(cfg.stylize.timeout_ms),
    );
    let receipt = uploader.upload(frame, &settings)?;
    eprintln!(
        "uploaded {}",
        receipt.html_url.as_deref().unwrap_or(&receipt.path)
    );
    Ok(())
}

fn cmd_github(args: GithubArgs) -> anyhow::Result<()> {
    let path = match args.settings {
        Some(path) => path,
        None => load_config(args.config.as_deref())?
            .export
            .resolved_settings_path(),
    };
    let settings = ExportSettings::new(&args.repo, &args.token);
    if !settings.is_configured() {
        anyhow::bail!("both --repo and --token must be non-empty");
    }
    settings.save(&path)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_health(args: HealthArgs) -> anyhow::Result<()> {
    let proxy = ProxyStylizer::new(args.url, Duration::from_millis(args.timeout_ms));
    let descriptor = proxy.health()?;
    println!(
        "{} {} ({})",
        descriptor.service, descriptor.status, descriptor.version
    );
    Ok(())
}
