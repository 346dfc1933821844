/// Version injected at compile time via HAMMERGEN_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("HAMMERGEN_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hammergen_client::api::{format_api_error, ApiError, HttpTransport};
use hammergen_client::config::Config;
use hammergen_client::mutation::{Mutation, MutationApi, MutationType};
use serde::Serialize;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Command-line client for the Hammergen API
#[derive(Parser, Debug)]
#[command(name = "hammergen", version = VERSION, about, long_about = None)]
struct Args {
    /// API server base URL
    #[arg(short, long, global = true)]
    url: Option<String>,

    /// Bearer token for authenticated requests
    #[arg(short, long, global = true)]
    token: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all visible mutations
    List,
    /// Show one mutation
    Get { id: String },
    /// Create a mutation
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Physical, Mental, or the integer key
        #[arg(long = "type", default_value = "physical")]
        mutation_type: MutationType,
        /// Do not share the mutation with other users
        #[arg(long)]
        private: bool,
    },
    /// Edit an existing mutation
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "type")]
        mutation_type: Option<MutationType>,
        #[arg(long)]
        shared: Option<bool>,
    },
    /// Delete a mutation
    Delete { id: String },
    /// Print the template used for new mutations
    New,
    /// List mutation types
    Types,
    /// Store --url and --token in the config file
    Configure,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("hammergen started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("hammergen").join("hammergen.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".hammergen").join("hammergen.log");
    }
    PathBuf::from("hammergen.log")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_guard = setup_logging(args.log_level)?;

    if let Err(err) = run(args).await {
        tracing::error!("Command failed: {:?}", err);
        match err.downcast_ref::<ApiError>() {
            Some(api_err) => eprintln!("Error: {}", format_api_error(api_err)),
            None => eprintln!("Error: {err:?}"),
        }
        // exit() skips destructors; flush the log writer first
        drop(log_guard);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(args: Args) -> Result<()> {
    // Commands that never touch the server
    match &args.command {
        Command::New => return print_json(&Mutation::new(true)),
        Command::Types => {
            for t in MutationType::ALL {
                println!("{}\t{}", t.key(), t.label());
            }
            return Ok(());
        }
        _ => {}
    }

    let mut config = Config::load();

    if let Command::Configure = args.command {
        if args.url.is_some() {
            config.base_url = args.url;
        }
        if args.token.is_some() {
            config.token = args.token;
        }
        config.save().context("Failed to save configuration")?;
        match Config::config_path() {
            Some(path) => println!("Saved configuration to {}", path.display()),
            None => println!("No config directory available; nothing saved"),
        }
        return Ok(());
    }

    let base_url = config.effective_base_url(args.url.as_deref());
    let token = config.effective_token(args.token.as_deref());

    tracing::info!("Using API server: {}", base_url);

    let transport = HttpTransport::new(&base_url, token)
        .with_context(|| format!("Invalid API URL: {}", base_url))?;
    let mutations = MutationApi::new(transport);

    match args.command {
        Command::List => {
            let items = mutations.list().await?;
            tracing::info!("Loaded {} mutations", items.len());
            print_json(&items)
        }
        Command::Get { id } => print_json(&mutations.get(&id).await?),
        Command::Create {
            name,
            description,
            mutation_type,
            private,
        } => {
            let mut mutation = Mutation::new(true);
            mutation.name = name;
            mutation.description = description;
            mutation.mutation_type = mutation_type;
            mutation.shared = !private;
            print_json(&mutations.create(&mutation).await?)
        }
        Command::Update {
            id,
            name,
            description,
            mutation_type,
            shared,
        } => {
            let mut mutation = mutations.get(&id).await?;
            if let Some(name) = name {
                mutation.name = name;
            }
            if let Some(description) = description {
                mutation.description = description;
            }
            if let Some(mutation_type) = mutation_type {
                mutation.mutation_type = mutation_type;
            }
            if let Some(shared) = shared {
                mutation.shared = shared;
            }
            print_json(&mutations.update(&mutation).await?)
        }
        Command::Delete { id } => {
            mutations.delete(&id).await?;
            tracing::info!("Deleted mutation {}", id);
            println!("Deleted {}", id);
            Ok(())
        }
        Command::New | Command::Types | Command::Configure => Ok(()),
    }
}
