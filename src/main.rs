use anyhow::Result;
use clap::{Parser, Subcommand};
use image::{DynamicImage, GenericImageView};
use qrscan::{
    ChannelDelegate, Decoder, FileImageSource, KeyboardInputHandler, MockCaptureBackend,
    RqrrDecoder, ScanCandidate, ScanResult, ScannerCommand, ScannerConfig,
    ScannerControllerBuilder, ScannerError, TracingView,
};
use qrscan::geometry::Rect;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "qrscan")]
#[command(about = "QR code scan sessions with debounced live detection and still-image scanning")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file
    #[arg(short, long, default_value = "qrscan.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a still image file and print the result
    Scan {
        /// Image containing a QR code
        image: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run an interactive session against a virtual camera
    Demo {
        /// Image shown to the virtual camera and offered by the gallery
        #[arg(long)]
        image: Option<PathBuf>,

        /// Payload of the simulated code when no image is given
        #[arg(long, default_value = "ABC123")]
        payload: String,

        /// Virtual camera frame rate
        #[arg(long, default_value_t = 30)]
        fps: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print_default_config()?;
        return Ok(());
    }

    init_logging(&args)?;

    info!("Starting qrscan v{}", env!("CARGO_PKG_VERSION"));

    let config = match ScannerConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if args.validate_config {
        match config.validate() {
            Ok(()) => {
                info!("Configuration validation successful");
                println!("✓ Configuration is valid");
                return Ok(());
            }
            Err(e) => {
                error!("Configuration validation failed: {}", e);
                eprintln!("✗ Configuration validation failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    match args.command {
        Some(Command::Scan { image, json }) => {
            let result = run_scan(config, image).await?;
            print_result(&result, json)?;
            if !result.is_success() {
                std::process::exit(1);
            }
        }
        Some(Command::Demo {
            image,
            payload,
            fps,
        }) => {
            let result = run_demo(config, image, payload, fps).await?;
            print_result(&result, false)?;
        }
        None => {
            eprintln!("No command given; try `qrscan scan <image>` or `qrscan demo`");
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Scan one file through a full controller session
async fn run_scan(config: ScannerConfig, image: PathBuf) -> Result<ScanResult> {
    let (delegate, mut results) = ChannelDelegate::new();
    let delegate = Arc::new(delegate);

    let mut controller = ScannerControllerBuilder::new()
        .config(config)
        .backend(MockCaptureBackend::new())
        .view(TracingView::new())
        .delegate(&delegate)
        .build()?;

    info!(session = %controller.session_id(), path = %image.display(), "Scanning image");
    controller.start()?;

    let source = FileImageSource::new(&image);
    match controller.open_gallery(&source).await {
        Ok(_) => {}
        Err(ScannerError::DecodeEmpty) => {
            // The session stays open when configured to; the CLI has nothing
            // else to scan, so it cancels and reports what the delegate got
            warn!(path = %image.display(), "No code found in image");
            controller.cancel();
        }
        Err(e) => return Err(e.into()),
    }

    results
        .recv()
        .await
        .ok_or_else(|| anyhow::anyhow!("Scan session ended without a result"))
}

async fn run_demo(
    config: ScannerConfig,
    image: Option<PathBuf>,
    payload: String,
    fps: u32,
) -> Result<ScanResult> {
    let decoder: Arc<dyn Decoder> = Arc::new(RqrrDecoder::new());
    let (delegate, mut results) = ChannelDelegate::new();
    let delegate = Arc::new(delegate);

    let mut controller = ScannerControllerBuilder::new()
        .config(config)
        .backend(MockCaptureBackend::new())
        .decoder(Arc::clone(&decoder))
        .view(TracingView::new())
        .delegate(&delegate)
        .build()?;

    let gallery = match &image {
        Some(path) => FileImageSource::new(path),
        None => FileImageSource::cancelled(),
    };

    // Candidates the virtual camera reports while a code is held up
    let frame_candidates = match &image {
        Some(path) => {
            let picture = qrscan::load_image(path)?;
            let candidates = detect_in_frame(
                decoder.as_ref(),
                &picture,
                &controller.overlay().scanning_frame,
            );
            if candidates.is_empty() {
                warn!(path = %path.display(), "Demo image contains no QR code");
            }
            candidates
        }
        None => vec![ScanCandidate::new(
            payload,
            inset(&controller.overlay().scanning_frame, 20.0),
        )],
    };

    info!(session = %controller.session_id(), "{}", controller.overlay().instruction());
    controller.start()?;

    let (keyboard, mut commands) = KeyboardInputHandler::new();
    keyboard.start().await?;

    let period = Duration::from_secs(1) / fps.max(1);
    let mut frames = tokio::time::interval(period);
    let mut code_present = false;

    while !controller.state().is_terminal() {
        tokio::select! {
            _ = frames.tick() => {
                let candidates: &[ScanCandidate] = if code_present { &frame_candidates } else { &[] };
                if let Some(result) = controller.on_frame_decoded(candidates) {
                    debug!(?result, "Frame finished the session");
                }
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    controller.cancel();
                    break;
                };
                match command {
                    ScannerCommand::ToggleCode => {
                        code_present = !code_present;
                        info!(code_present, "Code {}", if code_present { "presented" } else { "removed" });
                    }
                    ScannerCommand::ToggleTorch => match controller.toggle_torch() {
                        Ok(Some(mode)) => info!(torch = ?mode, "Torch"),
                        Ok(None) => info!("Torch not available for current camera"),
                        Err(e) => report_command_error("Torch toggle", &e),
                    },
                    ScannerCommand::SwitchCamera => {
                        if let Err(e) = controller.switch_camera() {
                            report_command_error("Camera switch", &e);
                        }
                        info!(position = %controller.active_position(), "Active camera");
                    }
                    ScannerCommand::OpenGallery => match controller.open_gallery(&gallery).await {
                        Ok(None) => info!("Gallery dismissed"),
                        Ok(Some(result)) => debug!(?result, "Gallery finished the session"),
                        Err(e) => report_command_error("Gallery scan", &e),
                    },
                    ScannerCommand::Cancel => controller.cancel(),
                }
            }
        }
    }

    keyboard.stop().await?;

    results
        .recv()
        .await
        .ok_or_else(|| anyhow::anyhow!("Scan session ended without a result"))
}

fn report_command_error(action: &str, e: &ScannerError) {
    if e.is_fatal() {
        error!("{} failed, session finished: {}", action, e);
    } else {
        warn!("{} failed: {}", action, e);
    }
}

/// Detect codes in `picture` and place them inside `frame` in view coordinates
fn detect_in_frame(
    decoder: &dyn Decoder,
    picture: &DynamicImage,
    frame: &Rect,
) -> Vec<ScanCandidate> {
    let (width, height) = picture.dimensions();
    let source = Rect::new(0.0, 0.0, width as f64, height as f64);
    decoder
        .detect(picture)
        .into_iter()
        .map(|candidate| candidate.mapped_to(&source, frame))
        .collect()
}

fn inset(rect: &Rect, by: f64) -> Rect {
    Rect::new(
        rect.x + by,
        rect.y + by,
        (rect.width - 2.0 * by).max(0.0),
        (rect.height - 2.0 * by).max(0.0),
    )
}

fn print_result(result: &ScanResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(result)?);
    } else {
        match result {
            ScanResult::Success(value) => println!("✓ {}", value),
            ScanResult::Failure(reason) => println!("✗ {}", reason),
            ScanResult::Cancelled => println!("Cancelled"),
        }
    }
    Ok(())
}

fn init_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("qrscan={}", log_level)));

    // Logs go to stderr so results on stdout stay machine readable
    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(args.debug)
                .with_file(args.debug)
                .with_line_number(args.debug)
                .boxed()
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();

    Ok(())
}

/// Print default configuration in TOML format
fn print_default_config() -> Result<()> {
    println!("# qrscan configuration file");
    println!("# Every key may be overridden with QRSCAN_<SECTION>__<KEY>, e.g.");
    println!("# QRSCAN_SCAN__DEBOUNCE_THRESHOLD=20 or QRSCAN_UI__LOCALE=tj");
    println!();
    print!("{}", ScannerConfig::default().to_toml()?);
    Ok(())
}
