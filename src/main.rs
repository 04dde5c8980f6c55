use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use testilens::cli::Output;
use testilens::cli::commands::analyze::AnalyzeOptions;

#[derive(Parser)]
#[command(name = "testilens")]
#[command(
    version,
    about = "AI-driven insight extraction for customer testimonials"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a batch of testimonials and print the insight report
    Analyze {
        #[arg(
            long,
            short,
            default_value = "-",
            help = "Testimonial file ('-' reads stdin)"
        )]
        input: PathBuf,
        #[arg(
            long,
            help = "Treat each non-empty line as one testimonial instead of splitting on ' | '"
        )]
        lines: bool,
        #[arg(
            long,
            short,
            default_value = "Product/Service",
            help = "Subject label the testimonials are about"
        )]
        title: String,
        #[arg(long, short, help = "Business context shown to the model")]
        business: Option<String>,
        #[arg(long, help = "Video testimonial to analyze alongside the text")]
        video: Option<PathBuf>,
        #[arg(long, help = "Model identifier override")]
        model: Option<String>,
        #[arg(long, short, help = "Pretty-print the report JSON")]
        pretty: bool,
    },

    /// Print service capabilities as JSON
    Info,

    /// Write a commented default testilens.toml
    Init {
        #[arg(long, short, help = "Overwrite an existing config file")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mtestilens encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }

        eprintln!("\n\x1b[33mPlease report this issue at:\x1b[0m");
        eprintln!("  https://github.com/junyeong-ai/testilens/issues");
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::new().error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    // Logs go to stderr; stdout is reserved for report/capability JSON.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Analyze {
            input,
            lines,
            title,
            business,
            video,
            model,
            pretty,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(testilens::cli::commands::analyze::run(AnalyzeOptions {
                input,
                lines,
                title,
                business,
                video,
                model,
                pretty,
            }))?;
        }
        Commands::Info => {
            testilens::cli::commands::info::run()?;
        }
        Commands::Init { force } => {
            testilens::cli::commands::init::run(force)?;
        }
    }

    Ok(())
}
