// crates/testlab-cli/src/main.rs
// ============================================================================
// Module: testlab CLI Entry Point
// Description: Command dispatcher for serving and offline script rendering.
// Purpose: Provide a small, safe CLI over the lab server and core templating.
// Dependencies: clap, testlab-config, testlab-core, testlab-server, tokio
// ============================================================================

//! ## Overview
//! The CLI runs the lab server (`testlab serve`) or renders a load script
//! offline (`testlab emit-script`) without starting a server. Configuration
//! resolution follows the config crate's rules; without a `--config` flag the
//! built-in defaults are used.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use testlab_config::TestLabConfig;
use testlab_core::TestPlan;
use testlab_core::TestShape;
use testlab_core::render_script;
use testlab_server::TestLabServer;

// ============================================================================
// SECTION: CLI Definition
// ============================================================================

/// testlab command-line interface.
#[derive(Debug, Parser)]
#[command(name = "testlab", version, about = "Simulated software-testing labs service")]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Supported subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Run the lab HTTP server.
    Serve {
        /// Path to the TOML configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Render a load script without running a test.
    EmitScript {
        /// Test shape to render.
        #[arg(long, value_enum)]
        shape: ShapeArg,
        /// Target URL embedded in the script.
        #[arg(long)]
        target_url: String,
        /// Virtual user count.
        #[arg(long, default_value_t = 10)]
        virtual_users: u32,
        /// Duration in seconds.
        #[arg(long, default_value_t = 30)]
        duration: u32,
    },
}

/// Shape argument mirroring the wire enumeration.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShapeArg {
    /// Flat load for the whole duration.
    Steady,
    /// Sustained load with tail degradation.
    Escalating,
    /// Sinusoidal spike and recovery.
    Burst,
}

impl From<ShapeArg> for TestShape {
    fn from(value: ShapeArg) -> Self {
        match value {
            ShapeArg::Steady => Self::Steady,
            ShapeArg::Escalating => Self::Escalating,
            ShapeArg::Burst => Self::Burst,
        }
    }
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            let _ = writeln!(std::io::stderr(), "testlab: {message}");
            ExitCode::FAILURE
        }
    }
}

/// Dispatches the parsed command.
fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Serve {
            config,
        } => serve(config),
        Command::EmitScript {
            shape,
            target_url,
            virtual_users,
            duration,
        } => emit_script(shape, &target_url, virtual_users, duration),
    }
}

/// Loads configuration and runs the server to completion.
fn serve(config_path: Option<PathBuf>) -> Result<(), String> {
    let config = match config_path {
        Some(path) => TestLabConfig::load(Some(&path)).map_err(|err| err.to_string())?,
        None => TestLabConfig::default(),
    };
    let server = TestLabServer::from_config(config).map_err(|err| err.to_string())?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| err.to_string())?;
    runtime.block_on(server.serve()).map_err(|err| err.to_string())
}

/// Renders a load script to stdout.
fn emit_script(
    shape: ShapeArg,
    target_url: &str,
    virtual_users: u32,
    duration: u32,
) -> Result<(), String> {
    let plan =
        TestPlan::new(shape.into(), target_url, Some(virtual_users), Some(duration));
    let script = render_script(&plan);
    writeln!(std::io::stdout(), "{script}").map_err(|err| err.to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
