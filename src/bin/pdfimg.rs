//! CLI binary for edgequake-pdfimg.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `RepageConfig` and prints results.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use edgequake_pdfimg::{
    convert_to_file, inspect, ExtractedImage, ExtractionProgressCallback, ExtractionReport,
    ProgressCallback, RepageConfig, StagingOrder,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Exit status for usage errors.
const USAGE_EXIT_CODE: i32 = 1;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over the source pages plus a log line
/// per extracted image.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// The bar's length is set by `on_extraction_start` once the page
    /// count is known.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Extracting");
        self.bar.set_message("");
        self.bar
            .println(bold(&format!("PDF Num Pages: {total_pages}")));
    }

    fn on_image_extracted(&self, image: &ExtractedImage) {
        self.bar.println(format!(
            "  {} Image {:>3}  {}  X: {:.2} Y: {:.2}, Width: {:.2}, Height: {:.2}",
            green("✓"),
            image.ordinal,
            dim(&format!("p{}#{}", image.page, image.index)),
            image.x,
            image.y,
            image.width,
            image.height,
        ));
    }

    fn on_page_complete(&self, page_num: usize, _total_pages: usize, image_count: usize) {
        self.bar
            .set_message(format!("page {page_num}: {image_count} images"));
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, total_images: usize) {
        self.bar.finish_and_clear();
        eprintln!("{} Total: {} images", green("✔"), bold(&total_images.to_string()));
    }

    fn on_file_skipped(&self, path: &Path) {
        eprintln!(
            "{} extension not supported, skipped: {}",
            yellow("⚠"),
            path.display()
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Re-page every image of a scan, one per page
  pdfimg scanned.pdf images.pdf

  # Keep the staged-file name order instead of page order
  pdfimg --order name scanned.pdf images.pdf

  # List images and their placement without writing anything
  pdfimg --list scanned.pdf

  # Machine-readable run statistics
  pdfimg --json scanned.pdf images.pdf

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         libpdfium file, or the directory holding it (required)
  PDFIMG_PASSWORD         Password for encrypted input
  PDFIMG_ORDER            page | name | directory
  PDFIMG_STAGING_DIR      Parent directory for the temporary staging directory
  RUST_LOG                Overrides the log filter (e.g. edgequake_pdfimg=debug)

Pre-built pdfium libraries: https://github.com/bblanchon/pdfium-binaries/releases
"#;

/// Extract the images of a PDF into a new PDF, one image per page.
#[derive(Parser, Debug)]
#[command(
    name = "pdfimg",
    version,
    about = "Extract the images of a PDF into a new PDF, one image per page",
    long_about = "Extract every raster image embedded in a PDF and re-page them into a new \
PDF, one image per page, each scaled to the page width minus a 10 pt margin on either side.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Source PDF.
    input: PathBuf,

    /// Destination PDF (created or overwritten). Not needed with --list.
    output: Option<PathBuf>,

    /// pdfium shared library, or the directory containing it.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDFIMG_PASSWORD")]
    password: Option<String>,

    /// Output page order: page (source page, then position), name, directory.
    #[arg(long, env = "PDFIMG_ORDER", value_enum, default_value = "page")]
    order: OrderArg,

    /// Create the temporary staging directory under this directory.
    #[arg(long, env = "PDFIMG_STAGING_DIR")]
    staging_dir: Option<PathBuf>,

    /// List images and their placement only; nothing is written.
    #[arg(long)]
    list: bool,

    /// Print the run statistics (or the --list report) as JSON on stdout.
    #[arg(long, env = "PDFIMG_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDFIMG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFIMG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFIMG_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OrderArg {
    Page,
    Name,
    Directory,
}

impl From<OrderArg> for StagingOrder {
    fn from(v: OrderArg) -> Self {
        match v {
            OrderArg::Page => StagingOrder::PageThenIndex,
            OrderArg::Name => StagingOrder::Name,
            OrderArg::Directory => StagingOrder::Directory,
        }
    }
}

/// Parse arguments; anything but `--help`/`--version` that fails exits with
/// [`USAGE_EXIT_CODE`] after printing usage.
fn parse_cli() -> Cli {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(USAGE_EXIT_CODE);
        }
    };

    if cli.output.is_none() && !cli.list {
        let _ = Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "the following required arguments were not provided:\n  <OUTPUT>",
            )
            .print();
        std::process::exit(USAGE_EXIT_CODE);
    }
    cli
}

fn main() -> Result<()> {
    let cli = parse_cli();

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO-level library logs duplicate what the progress bar prints.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.list;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as ProgressCallback)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── List mode ────────────────────────────────────────────────────────
    if cli.list {
        let report = inspect(&cli.input, &config).context("Failed to inspect PDF")?;
        print_report(&cli, &report)?;
        return Ok(());
    }

    // ── Run conversion ───────────────────────────────────────────────────
    let output_path = cli
        .output
        .as_deref()
        .context("missing <OUTPUT> argument")?;
    let stats = convert_to_file(&cli.input, output_path, &config).context("Conversion failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise statistics")?
        );
    } else if !cli.quiet {
        eprintln!(
            "{}  {} images  →  {} pages  {}ms  →  {}",
            green("✔"),
            stats.images_extracted,
            stats.pages_written,
            stats.total_duration_ms,
            bold(&output_path.display().to_string()),
        );
        if stats.files_skipped > 0 {
            eprintln!(
                "   {} staged files skipped",
                yellow(&stats.files_skipped.to_string())
            );
        }
    }

    Ok(())
}

/// Map CLI args to `RepageConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<RepageConfig> {
    let mut builder = RepageConfig::builder().staging_order(cli.order.into());

    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(lib);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(ref dir) = cli.staging_dir {
        builder = builder.staging_root(dir);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_report(cli: &Cli, report: &ExtractionReport) -> Result<()> {
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).context("Failed to serialise report")?
        );
        return Ok(());
    }

    println!("File:    {}", cli.input.display());
    println!("Pages:   {}", report.page_count);
    println!("Images:  {}", report.images.len());
    for page in 1..=report.page_count {
        let on_page: Vec<_> = report.images_on_page(page).collect();
        if on_page.is_empty() {
            continue;
        }
        println!("-----\nPage {page}: {} images", on_page.len());
        for img in on_page {
            println!(
                "  Image {} - X: {:.2} Y: {:.2}, Width: {:.2}, Height: {:.2}  ({}x{} px)",
                img.ordinal, img.x, img.y, img.width, img.height, img.pixel_width, img.pixel_height
            );
        }
    }
    Ok(())
}
