mod serve;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use site::{BuildReport, SiteBuilder, SiteConfig, SiteError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Site(#[from] SiteError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server failed: {0}")]
    Serve(std::io::Error),
}

impl CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Site(err) => err.error_code(),
            Self::Bind { .. } => "E_BIND",
            Self::Serve(_) => "E_SERVE",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "docsite", about = "Build and serve the documentation site")]
struct Cli {
    /// Site configuration file. A missing file means all defaults.
    #[arg(long, env = "DOCSITE_CONFIG", default_value = site::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every page and copy passthrough files into the output directory.
    Build,
    /// List what a build would write, without writing it.
    Check,
    /// Build, then serve the output directory over HTTP.
    Serve {
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,

        /// Serve the existing output as-is.
        #[arg(long)]
        no_build: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("ignoring unreadable .env: {err}");
        }
    }
    tracing_subscriber::fmt::init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(code = err.error_code(), error = %err, "docsite failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = SiteConfig::load(&cli.config)?;
    match cli.command {
        Command::Build => {
            build(config)?;
        }
        Command::Check => check(config)?,
        Command::Serve { port, no_build } => {
            let output = config.output_dir.clone();
            if !no_build {
                build(config)?;
            }
            serve::run(&output, port).await?;
        }
    }
    Ok(())
}

fn build(config: SiteConfig) -> Result<BuildReport, SiteError> {
    let mut builder = SiteBuilder::new(config)?;
    builder.build()
}

fn check(config: SiteConfig) -> Result<(), SiteError> {
    let builder = SiteBuilder::new(config)?;
    let plan = builder.plan()?;

    for page in &plan.pages {
        println!("page  {} -> {} ({})", page.source.display(), page.output.display(), page.url);
    }
    for path in &plan.passthrough {
        println!("copy  {}", path.display());
    }
    for path in &plan.skipped {
        println!("skip  {}", path.display());
    }

    tracing::info!(
        pages = plan.pages.len(),
        passthrough = plan.passthrough.len(),
        skipped = plan.skipped.len(),
        "check complete"
    );
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
