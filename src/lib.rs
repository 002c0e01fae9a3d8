#![forbid(unsafe_code)]
#![deny(warnings, unused_must_use, dead_code, missing_debug_implementations)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

use std::io::Write;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub mod error;
pub mod fetch;
pub mod gogen;
pub mod metamodel;

pub use error::Error;

#[derive(Debug, Parser)]
#[command(
    name = "lspgen",
    version,
    about = "Generate Go type declarations from the LSP meta-model"
)]
struct Cli {
    /// Name of the structure to generate, with everything it references
    #[arg(value_name = "TYPE", default_value = "Diagnostic")]
    type_name: String,

    /// Location of the meta-model document
    #[arg(long, value_name = "URL", default_value = fetch::META_MODEL_URL)]
    url: String,
}

pub fn run_cli(args: Vec<String>) -> i32 {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to create tokio runtime: {err}");
            return 1;
        }
    };

    runtime.block_on(run_cli_async(args))
}

async fn run_cli_async(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match run(cli).await {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("{err}");
                1
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let model = fetch::fetch_meta_model(&cli.url).await?;
    info!(
        version = %model.meta_data.version,
        structures = model.structures.len(),
        "Decoded meta-model."
    );
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    gogen::generate(&model, &cli.type_name, &mut out)?;
    out.flush()?;
    Ok(())
}

pub fn init_tracing() {
    let crate_root = module_path!().to_string();

    // LSPGEN_LOG controls log level: "trace", "debug", "info", "warn", "error"
    // or a full tracing filter spec like "lspgen=debug,reqwest=warn"
    let filter = match std::env::var("LSPGEN_LOG") {
        Ok(level) if is_plain_level(&level) => {
            format!("{crate_root}={level}")
        }
        Ok(spec) => spec,
        Err(_) => format!("{crate_root}=warn"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(&filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
