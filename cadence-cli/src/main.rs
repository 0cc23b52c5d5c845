use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "cadence", version = "0.1.0")]
#[command(about = "Inspect the tool catalog and check calls against it")]
struct Cli {
    /// Human-readable log output instead of JSON lines
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the capability listing offered to the model
    Catalog {
        /// TOML configuration adding tools and settings
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate one tool call and print the normalized arguments or the rejection
    Validate {
        /// Tool name
        #[arg(long)]
        tool: String,
        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Load a configuration file and report whether it is usable
    CheckConfig {
        /// Path to the TOML file
        path: PathBuf,
    },
}

fn init_tracing(directive: &str, pretty: bool) {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let env_filter = match directive.parse() {
        Ok(directive) => env_filter.add_directive(directive),
        Err(_) => env_filter,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    let _ = if pretty {
        builder.try_init()
    } else {
        builder.json().try_init()
    };
}

fn main() {
    let cli = Cli::parse();

    let config_path = match &cli.command {
        Commands::Catalog { config } | Commands::Validate { config, .. } => config.clone(),
        Commands::CheckConfig { .. } => None,
    };
    let config = match commands::load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info", cli.pretty);
            tracing::error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };
    init_tracing(&config.logging.default_directive, cli.pretty);

    let result = match cli.command {
        Commands::Catalog { .. } => commands::catalog(config),
        Commands::Validate { tool, args, .. } => commands::validate_call(config, &tool, &args),
        Commands::CheckConfig { path } => commands::check_config(&path),
    };

    match result {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            std::process::exit(1);
        }
    }
}
