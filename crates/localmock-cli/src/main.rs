//! localmock command-line host.
//!
//! Resolves a single request against a mock directory and prints the payload,
//! or lists the route table.
//!
//! Usage:
//!   localmock resolve "GET /api/users/42?active=true" [OPTIONS]
//!   localmock routes [OPTIONS]

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use localmock_core::mocks::{delay_millis, FsRouteTable};
use localmock_core::{MockOptions, MockService, RequestContext};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exit code for requests that are not mocked.
const NOT_A_MOCK: u8 = 2;

/// Local mock resolver
#[derive(Parser, Debug)]
#[command(name = "localmock")]
#[command(author, version, about = "Resolve requests against local mock definitions")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve one request and print the mock payload
    Resolve(ResolveArgs),
    /// Print the route table in match order
    Routes(SourceArgs),
}

#[derive(Args, Debug)]
struct ResolveArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Raw request body (JSON)
    #[arg(short, long)]
    body: Option<String>,

    /// Request line, e.g. "GET /api/users?page=2"
    request: String,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Options file (yaml, yml, json or jsonc)
    #[arg(short, long, env = "LOCALMOCK_CONFIG")]
    config: Option<PathBuf>,

    /// Project root the mock directory is relative to
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Mock definitions directory
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Route table file stem inside the mock directory
    #[arg(long)]
    routes: Option<String>,

    /// Default response delay in milliseconds
    #[arg(long)]
    delay: Option<u64>,
}

impl SourceArgs {
    /// Options from the config file (if any) with flag overrides applied.
    fn options(&self) -> Result<MockOptions> {
        let mut options = match &self.config {
            Some(path) => MockOptions::load(path)
                .with_context(|| format!("failed to load options from {}", path.display()))?,
            None => MockOptions::default(),
        };
        if let Some(dir) = &self.dir {
            options.dir = dir.clone();
        }
        if let Some(routes) = &self.routes {
            options.path_map_config = Some(routes.clone());
        }
        if let Some(delay) = self.delay {
            options.delay = delay;
        }
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Command::Resolve(args) => resolve(args).await,
        Command::Routes(args) => routes(args),
    };

    result.unwrap_or_else(|error| {
        eprintln!("error: {error:#}");
        ExitCode::FAILURE
    })
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "localmock=debug,localmock_core=debug"
    } else {
        "localmock=info,localmock_core=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn resolve(args: &ResolveArgs) -> Result<ExitCode> {
    let options = args.source.options()?;
    let Some(mut request) = RequestContext::parse(&args.request) else {
        bail!("invalid request line '{}', expected \"<METHOD> <URL>\"", args.request);
    };
    if let Some(body) = &args.body {
        request = request.with_body(body.as_str());
    }

    let service = MockService::from_options(&args.source.root, options);
    match service.handle(&request).await {
        Some(response) => {
            tracing::info!(
                method = request.method(),
                path = request.path(),
                delay_ms = delay_millis(response.delay),
                "mocked"
            );
            println!("{}", response.body);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("not a mock route: {} {}", request.method(), request.path());
            Ok(ExitCode::from(NOT_A_MOCK))
        }
    }
}

fn routes(args: &SourceArgs) -> Result<ExitCode> {
    let options = args.options()?;
    let table = FsRouteTable::from_options(&args.root, &options)
        .try_load()
        .with_context(|| route_table_location(&args.root, &options))?;

    if table.is_empty() {
        eprintln!("route table is empty");
    }
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(ExitCode::SUCCESS)
}

fn route_table_location(root: &Path, options: &MockOptions) -> String {
    format!(
        "failed to read route table '{}' in {}",
        options.route_table_name().unwrap_or_default(),
        options.mock_dir(root).display()
    )
}
