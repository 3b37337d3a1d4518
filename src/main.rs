//! # Etiqueta CLI
//!
//! Command-line interface for label rendering and dry-run printing.
//!
//! ## Usage
//!
//! ```bash
//! # Render a label and save the 1-bit raster as PNG
//! etiqueta render --text "2024-01-01" --width-mm 20 --height-mm 10 --png label.png
//!
//! # Today's date, bold, with a display preview
//! etiqueta render --date --bold --preview preview.png
//!
//! # Load a label from JSON; flags override file values
//! etiqueta render --config label.json --font-size 14 --png label.png
//!
//! # Run a full print session against the simulated printer
//! etiqueta simulate --text "Jam" --battery 3
//!
//! # Simulate a failing job
//! etiqueta simulate --text "Jam" --fail-step print_page
//!
//! # List printer models
//! etiqueta models
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use etiqueta::{
    EtiquetaError, LabelConfig, PrintSession, PrinterConfig,
    error::JobStep,
    label::{Alignment, templates},
    printer,
    render::{self, preview},
    session::{HeartbeatData, PrintProgress, PrinterInfo, PrinterState, SessionConfig, SessionObserver},
    transport::{MockDriver, MockScript},
};

/// Etiqueta - Label printer utility
#[derive(Parser, Debug)]
#[command(name = "etiqueta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a label to PNG
    Render {
        #[command(flatten)]
        label: LabelArgs,

        /// Save the print raster (1 dot per pixel)
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        /// Save a scaled display preview
        #[arg(long, value_name = "FILE")]
        preview: Option<PathBuf>,

        /// Maximum preview width in pixels
        #[arg(long, default_value_t = preview::MAX_PREVIEW_WIDTH)]
        preview_width: u32,
    },

    /// Print a label on the simulated printer
    Simulate {
        #[command(flatten)]
        label: LabelArgs,

        /// Make connecting fail with this message
        #[arg(long, value_name = "MESSAGE")]
        fail_connect: Option<String>,

        /// Make a job step fail (encode, print_init, print_page,
        /// wait_for_finished, print_end)
        #[arg(long, value_name = "STEP", value_parser = parse_step)]
        fail_step: Option<JobStep>,

        /// Battery level reported by the printer, 0-4
        #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(0..=4))]
        battery: u8,

        /// Abort the job after this many milliseconds
        #[arg(long, value_name = "MS")]
        job_timeout_ms: Option<u64>,
    },

    /// List printer models
    Models,
}

#[derive(Args, Debug)]
struct LabelArgs {
    /// Label text (`\n` starts a new line)
    #[arg(long)]
    text: Option<String>,

    /// Use today's date as the text
    #[arg(long, conflicts_with = "text")]
    date: bool,

    /// Font size in points
    #[arg(long, value_name = "PT")]
    font_size: Option<f64>,

    #[arg(long)]
    bold: bool,

    /// left, center or right
    #[arg(long)]
    align: Option<Alignment>,

    /// Label width in millimeters
    #[arg(long, value_name = "MM")]
    width_mm: Option<f64>,

    /// Label height in millimeters
    #[arg(long, value_name = "MM")]
    height_mm: Option<f64>,

    /// Read label settings from a JSON file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Printer model
    #[arg(long, default_value = "d110")]
    model: String,
}

impl LabelArgs {
    fn printer(&self) -> Result<PrinterConfig, EtiquetaError> {
        printer::config::by_name(&self.model).ok_or_else(|| {
            EtiquetaError::InvalidLabel(format!(
                "Unknown printer model '{}'. Run `etiqueta models` to see available models.",
                self.model
            ))
        })
    }

    /// The label from `--config` (or defaults) with flags applied on top.
    fn label(&self) -> Result<LabelConfig, EtiquetaError> {
        let mut label = match &self.config {
            Some(path) => load_label(path)?,
            None => LabelConfig::default(),
        };

        if self.date {
            label.text = templates::today();
        } else if let Some(text) = &self.text {
            label.text = text.replace("\\n", "\n");
        }
        if let Some(size) = self.font_size {
            label.font_size = size;
        }
        if self.bold {
            label.bold = true;
        }
        if let Some(align) = self.align {
            label.align = align;
        }
        if let Some(width) = self.width_mm {
            label.width_mm = width;
        }
        if let Some(height) = self.height_mm {
            label.height_mm = height;
        }

        label.validate()?;
        Ok(label)
    }
}

fn load_label(path: &Path) -> Result<LabelConfig, EtiquetaError> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn parse_step(name: &str) -> Result<JobStep, String> {
    JobStep::from_name(name).ok_or_else(|| format!("unknown job step '{}'", name))
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), EtiquetaError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            label,
            png,
            preview: preview_path,
            preview_width,
        } => {
            let printer = label.printer()?;
            let config = label.label()?;
            let composition = render::render_label(&config, &printer);
            let raster = &composition.raster;

            println!(
                "Rendered {}x{} dots for {} ({} line{})",
                raster.width(),
                raster.height(),
                printer.name,
                composition.lines.len(),
                if composition.lines.len() == 1 { "" } else { "s" }
            );
            if composition.overflowed() {
                println!(
                    "Warning: {} line(s) did not fit and were dropped",
                    composition.truncated
                );
            }

            if let Some(path) = png {
                std::fs::write(&path, raster.to_png()?)?;
                println!("Saved to {}", path.display());
            }
            if let Some(path) = preview_path {
                let image = preview::project_preview_with_width(raster, preview_width);
                std::fs::write(&path, render::raster::encode_png(&image)?)?;
                println!(
                    "Saved {}x{} preview to {}",
                    image.width(),
                    image.height(),
                    path.display()
                );
            }
        }

        Commands::Simulate {
            label,
            fail_connect,
            fail_step,
            battery,
            job_timeout_ms,
        } => {
            let printer = label.printer()?;
            let config = label.label()?;
            let composition = render::render_label(&config, &printer);

            let mut script = MockScript::default()
                .printer_info(PrinterInfo {
                    model: Some(printer.name.to_string()),
                    serial: Some("SIM00001".to_string()),
                    software_version: Some("1.0".to_string()),
                })
                .heartbeat(battery);
            if let Some(message) = fail_connect {
                script = script.fail_connect(message);
            }
            if let Some(step) = fail_step {
                script = script.fail_at(step, "simulated failure");
            }

            let mut session_config = SessionConfig::for_printer(&printer);
            if let Some(ms) = job_timeout_ms {
                session_config = session_config.job_timeout(Duration::from_millis(ms));
            }

            let encoder = script.encoder();
            let (driver, events) = MockDriver::new(script);
            let session = Arc::new(
                PrintSession::new(Arc::new(driver), Arc::new(ConsoleObserver), session_config)
                    .with_encoder(encoder),
            );
            let pump = tokio::spawn({
                let session = Arc::clone(&session);
                async move { session.run_event_loop(events).await }
            });

            session.connect().await;
            tokio::task::yield_now().await;
            if session.is_connected() {
                session.print(composition.raster).await;
                session.disconnect().await;
            }
            tokio::task::yield_now().await;
            pump.abort();
        }

        Commands::Models => {
            println!("Available models:");
            for model in printer::config::MODELS {
                println!(
                    "  {:<6} {} ({} dpi, {:.1}mm printhead)",
                    model.task_kind.to_lowercase(),
                    model.name,
                    model.dpi,
                    model.printhead_mm()
                );
            }
        }
    }

    Ok(())
}

/// Prints session notifications to stdout.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_state_change(&self, state: PrinterState) {
        println!("State: {}", state);
    }

    fn on_printer_info(&self, info: &PrinterInfo) {
        let model = info.model.as_deref().unwrap_or("unknown printer");
        println!("Printer: {} ({})", model, info.summary());
    }

    fn on_heartbeat(&self, data: &HeartbeatData) {
        if let Some(percent) = data.charge_percent() {
            println!("Battery: {}%", percent);
        }
    }

    fn on_print_progress(&self, progress: &PrintProgress) {
        println!("{}", progress);
    }

    fn on_error(&self, message: &str) {
        println!("Error: {}", message);
    }
}
