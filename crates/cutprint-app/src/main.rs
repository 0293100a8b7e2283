#![warn(missing_docs)]
//! # cutprint binary
//!
//! Command-line entry point for composing, print previews and diagnostics.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand, ValueEnum};
use cutprint_app::{
    AppConfig, AppError, Booth, EditingSession, FinalImage, FinishOutcome, Notice, app_version, memory_source_for,
};
use cutprint_capture::{CapturePlan, PhotoSelection, SyntheticCamera, run_session};
use cutprint_catalog::StyleCatalog;
use cutprint_compose::{CompositionEngine, FileSystemSource, PhotoSource};
use cutprint_core::{CutType, SavedPhoto};
use cutprint_print::{
    CollaboratorError, Orientation, PrintDocument, PrintJob, PrintOutcome, PrintQr, PrintService, ShareOutcome,
    ShareRequest, ShareService, generate,
};
use cutprint_recovery::{RecoveryDecision, decide};

#[derive(Debug, Parser)]
#[command(name = "cutprint", version = cutprint_app::APP_VERSION, about = "Photo booth composition tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Composes photos into one framed image.
    Compose(ComposeArgs),
    /// Writes the print document for an image.
    PrintHtml(PrintArgs),
    /// Classifies an error message and prints the recovery decision.
    Classify {
        /// Error text from a print or share collaborator.
        message: String,
    },
    /// Lists filters and frames as JSON.
    Catalog {
        /// Extra catalog JSON file.
        #[arg(long)]
        extend: Option<PathBuf>,
    },
    /// Prints the version.
    Version,
}

#[derive(Debug, clap::Args)]
struct ComposeArgs {
    /// Layout: vertical4, grid4 or grid6.
    #[arg(long, default_value = "grid4")]
    cut: String,
    /// Filter id.
    #[arg(long, default_value = "original")]
    filter: String,
    /// Frame id.
    #[arg(long, default_value = "no_frame")]
    frame: String,
    /// Label text beneath the frame.
    #[arg(long, default_value = "")]
    label: String,
    /// Album URL of the saved photo to encode as a QR code.
    #[arg(long)]
    qr: Option<String>,
    /// Album id of the photo behind `--qr`.
    #[arg(long, default_value_t = 0)]
    photo_id: i64,
    /// Output file.
    #[arg(long)]
    out: PathBuf,
    /// Shoot with the synthetic camera instead of reading photos.
    #[arg(long)]
    synthetic: bool,
    /// Photo paths or URIs in slot order.
    photos: Vec<String>,
}

#[derive(Debug, clap::Args)]
struct PrintArgs {
    /// Image URI.
    #[arg(long)]
    image: String,
    /// Caption and document title.
    #[arg(long, default_value = "")]
    title: String,
    /// Page orientation.
    #[arg(long, value_enum, default_value_t = OrientationArg::Portrait)]
    orientation: OrientationArg,
    /// The image already contains a QR code.
    #[arg(long)]
    qr_composited: bool,
    /// Page margin in millimetres.
    #[arg(long, default_value_t = 0)]
    margin_mm: u32,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<OrientationArg> for Orientation {
    fn from(value: OrientationArg) -> Self {
        match value {
            OrientationArg::Portrait => Orientation::Portrait,
            OrientationArg::Landscape => Orientation::Landscape,
        }
    }
}

/// Print and share dialogs for a terminal: documents and share requests are
/// written to stdout.
struct Console;

impl PrintService for Console {
    fn print(&self, document: &PrintDocument) -> Result<PrintOutcome, CollaboratorError> {
        match document {
            PrintDocument::Direct { image_uri, orientation } => {
                println!("direct print of {image_uri} ({})", orientation.as_str());
            }
            PrintDocument::Composed { html, .. } => print!("{html}"),
        }
        Ok(PrintOutcome::Completed)
    }
}

impl ShareService for Console {
    fn share(&self, request: &ShareRequest) -> Result<ShareOutcome, CollaboratorError> {
        println!("share {} ({})", request.uri, request.mime_type);
        Ok(ShareOutcome::Shared)
    }
}

/// CLI entry point.
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{}", cutprint_app::redact_sensitive(&error.to_string()));
            eprintln!("cutprint: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Compose(args) => compose(args),
        Command::PrintHtml(args) => print_html(args),
        Command::Classify { message } => {
            println!("{}", to_json(&decide(&message))?);
            Ok(())
        }
        Command::Catalog { extend } => {
            let mut catalog = StyleCatalog::builtin();
            if let Some(path) = extend {
                catalog.extend_from_json(&read_to_string(&path)?)?;
            }
            let listing = serde_json::json!({
                "filters": catalog.filters(),
                "frames": catalog.frames(),
            });
            println!("{}", to_json(&listing)?);
            Ok(())
        }
        Command::Version => {
            println!("cutprint {}", app_version());
            Ok(())
        }
    }
}

fn compose(args: ComposeArgs) -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    log::debug!("loaded {config:?}");
    let cut: CutType = args.cut.parse()?;
    let catalog = cutprint_catalog::global();

    let (source, uris): (Arc<dyn PhotoSource>, Vec<String>) = if args.synthetic {
        let plan = CapturePlan::for_cut_type(cut);
        let shots = run_session(&plan, &SyntheticCamera::default(), now_ms())?;
        let mut selection = PhotoSelection::new(cut, shots.len());
        for index in 0..selection.required() {
            selection.toggle(index)?;
        }
        let uris = selection.resolve(&shots)?.iter().map(|shot| shot.uri.clone()).collect();
        let source: Arc<dyn PhotoSource> = Arc::new(memory_source_for(&shots));
        (source, uris)
    } else {
        let source: Arc<dyn PhotoSource> = Arc::new(FileSystemSource);
        (source, args.photos)
    };

    let mut engine = CompositionEngine::new(config.engine_options(), source.clone());
    if let Some(font) = &config.label_font {
        engine = engine.with_font_bytes(std::fs::read(font).map_err(|error| io_error(font, error))?)?;
    }

    let mut session = EditingSession::new(cut, uris, catalog)?;
    session.select_filter(catalog, &args.filter)?;
    session.select_frame(catalog, &args.frame)?;
    session.set_label(args.label)?;
    if let Some(url) = args.qr {
        session.request_qr(true);
        session.record_save(SavedPhoto { id: args.photo_id, url });
    }

    let console = Arc::new(Console);
    let booth = Booth::new(engine, console.clone(), console)
        .with_qr_policy(config.qr_without_save)
        .with_output(config.output)
        .with_print_margin(config.print_margin_mm);
    let finished = match booth.finish(&session) {
        FinishOutcome::Ready(finished) => finished,
        FinishOutcome::SaveRequired => {
            return Err(AppError::Session("save the photo before adding a qr code".to_string()));
        }
    };
    for notice in &finished.notices {
        report_notice(notice)?;
    }

    let bytes = match &finished.image {
        FinalImage::Composed(image) => image.bytes.clone(),
        FinalImage::Original { uri } => source
            .load(uri)
            .map_err(|error| AppError::Io(format!("{uri}: {error}")))?,
    };
    std::fs::write(&args.out, &bytes).map_err(|error| io_error(&args.out, error))?;
    match &finished.image {
        FinalImage::Composed(image) => println!(
            "wrote {} ({}x{}, {})",
            args.out.display(),
            image.width,
            image.height,
            image.mime_type()
        ),
        FinalImage::Original { uri } => println!("wrote {} (original photo {uri})", args.out.display()),
    }
    Ok(())
}

fn report_notice(notice: &Notice) -> Result<(), AppError> {
    match notice {
        Notice::QrOmittedUntilSaved => eprintln!("qr code omitted: the photo is not saved yet"),
        Notice::QrDropped { detail, .. } => eprintln!("qr code dropped: {detail}"),
        Notice::CompositionFailed { kind, detail } => {
            eprintln!("composition failed, using the original photo: {detail}");
            eprintln!("{}", to_json(&RecoveryDecision::for_kind(*kind))?);
        }
    }
    Ok(())
}

fn print_html(args: PrintArgs) -> Result<(), AppError> {
    let job = PrintJob {
        image_uri: args.image,
        title: args.title,
        orientation: args.orientation.into(),
        qr: if args.qr_composited { PrintQr::Composited } else { PrintQr::None },
        margin_mm: args.margin_mm,
    };
    Console
        .print(&generate(&job)?)
        .map_err(|error| AppError::Io(error.message))?;
    Ok(())
}

fn read_to_string(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|error| io_error(path, error))
}

fn io_error(path: &Path, error: std::io::Error) -> AppError {
    AppError::Io(format!("{}: {error}", path.display()))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|error| AppError::Io(error.to_string()))
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
