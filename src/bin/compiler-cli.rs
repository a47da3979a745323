use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use proxy_compiler::compiler::VirtualServerConfigurator;
use proxy_compiler::resources::loader::{load_aggregate, load_params};
use proxy_compiler::ConfigParams;

#[derive(Parser)]
#[command(name = "compiler-cli")]
#[command(about = "Compile a routing aggregate into a proxy configuration document", long_about = None)]
struct Cli {
    /// Routing aggregate JSON file.
    aggregate: PathBuf,

    /// Global configuration parameters JSON file (defaults when omitted).
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Materialized TLS certificate bundle file name (empty = unresolved).
    #[arg(short, long, default_value = "")]
    tls_cert: String,

    /// Enable the dynamic backend-pool mode.
    #[arg(long)]
    dynamic_upstreams: bool,

    /// Treat a DNS resolver as configured.
    #[arg(long)]
    resolver: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "proxy_compiler=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let aggregate = load_aggregate(&cli.aggregate)?;
    let params = match &cli.params {
        Some(path) => load_params(path)?,
        None => ConfigParams::default(),
    };

    tracing::info!(
        aggregate = %aggregate,
        dynamic_upstreams = cli.dynamic_upstreams,
        resolver = cli.resolver,
        "Compiling"
    );

    let configurator =
        VirtualServerConfigurator::new(params, cli.dynamic_upstreams, cli.resolver);
    let (document, warnings) = configurator.compile(&aggregate, &cli.tls_cert);

    for warning in warnings.iter() {
        tracing::warn!(object = %warning.object, "{}", warning.message);
    }

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
