//! jarstrap-build CLI: patch a C launcher template with a Java archive and
//! compile it into native executables.
//!
//! Provides four commands: `init`, `defaults`, `patch`, and `build`.
//!
//! `patch` rewrites the template's CONFIG and ARCHIVE DATA windows in place;
//! `build` does the same and then compiles every variant through the
//! [`jarstrap_core::toolchain::BuildToolchain`] trait.

mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use jarstrap_core::params::ParamOverrides;

#[derive(Parser)]
#[command(
    name = "jarstrap-build",
    about = "Embed a Java archive into a native launcher and build it",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the launcher template (default: ./main.c)
    #[arg(long, global = true, default_value = "main.c", env = "JARSTRAP_TEMPLATE")]
    template: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a launcher template and CMake project
    Init {
        /// Directory to create the launcher in
        dir: PathBuf,

        /// CMake project name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Show the values the template currently declares
    Defaults {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Patch the template's config and archive windows
    Patch {
        #[command(flatten)]
        params: ParamArgs,

        /// Keep a copy of the previous template as <template>.bak
        #[arg(long)]
        backup: bool,
    },

    /// Patch the template and compile every launcher variant
    Build {
        #[command(flatten)]
        params: ParamArgs,

        /// Skip the interactive parameter menu
        #[arg(long)]
        no_interactive: bool,

        /// Move binaries to the output directory without asking
        #[arg(long, short)]
        yes: bool,

        /// Output directory for the finished binaries
        #[arg(long, default_value = "out")]
        out_dir: PathBuf,

        /// Base name for the binaries (default: app name, lowercased)
        #[arg(long)]
        binary_name: Option<String>,

        /// Save the final parameters to this JSON file
        #[arg(long)]
        save_params: Option<PathBuf>,

        /// Keep a copy of the previous template as <template>.bak
        #[arg(long)]
        backup: bool,
    },
}

/// Launcher parameters shared by `patch` and `build`.
#[derive(Args, Clone, Debug, Default)]
pub struct ParamArgs {
    /// JSON parameter file (default: jarstrap.params.json next to the template)
    #[arg(long)]
    params: Option<PathBuf>,

    /// Application name
    #[arg(long)]
    app_name: Option<String>,

    /// Java archive to embed
    #[arg(long, env = "JARSTRAP_ARCHIVE")]
    archive: Option<PathBuf>,

    /// Minimum Java version
    #[arg(long)]
    min_java: Option<u32>,

    /// Preferred Java version
    #[arg(long)]
    preferred_java: Option<u32>,

    /// Extra JVM flags
    #[arg(long, allow_hyphen_values = true)]
    launch_flags: Option<String>,

    /// Build debug variants (true/false)
    #[arg(long)]
    debug: Option<bool>,

    /// Build 32-bit variants (true/false)
    #[arg(long)]
    build_i386: Option<bool>,
}

impl ParamArgs {
    pub fn overrides(&self) -> ParamOverrides {
        ParamOverrides {
            app_name: self.app_name.clone(),
            archive: self.archive.clone(),
            min_java_version: self.min_java,
            preferred_java_version: self.preferred_java,
            launch_flags: self.launch_flags.clone(),
            debug: self.debug,
            build_i386: self.build_i386,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init { dir, name } => {
            commands::init::run(&dir, name.as_deref()).await?;
        }
        Commands::Defaults { json } => {
            commands::defaults::run(&cli.template, json)?;
        }
        Commands::Patch { params, backup } => {
            commands::patch::run(&cli.template, &params, backup)?;
        }
        Commands::Build {
            params,
            no_interactive,
            yes,
            out_dir,
            binary_name,
            save_params,
            backup,
        } => {
            let options = commands::build::BuildOptions {
                interactive: !no_interactive,
                assume_yes: yes,
                out_dir,
                binary_name,
                save_params,
                backup,
            };
            commands::build::run(&cli.template, &params, &options).await?;
        }
    }

    Ok(())
}
