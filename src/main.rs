//! ROI HR client - list, view and edit people records from the terminal
//!
//! Reads are served from a local cache when the API cannot be reached.

use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use roihr::api::{ApiClient, CachedClient, Connectivity, FixedConnectivity, TcpProbe};
use roihr::cache::open_store;
use roihr::cli::{confirm_delete, log_filter, CacheAction, Cli, Command};
use roihr::config::Config;
use roihr::data::RoiApi;
use roihr::display;

/// Logs go to stderr so command output stays pipeable
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = Config::load(cli.config.as_deref())?;
    debug!(api_root = %config.api_root, ttl_minutes = config.cache.ttl_minutes, "Loaded configuration");

    let cache = Arc::new(open_store(config.cache.dir.as_deref(), config.cache.ttl_minutes));

    let connectivity: Arc<dyn Connectivity> = if cli.offline {
        info!("Offline mode requested");
        Arc::new(FixedConnectivity::offline())
    } else {
        Arc::new(TcpProbe::for_url(&config.api_root, config.probe_timeout())?)
    };

    let client = ApiClient::with_timeout(&config.api_root, config.request_timeout())?;
    let api = RoiApi::new(
        CachedClient::new(client, cache, connectivity).with_key_policy(config.cache.key_policy),
    );
    debug!(key_policy = ?api.client().key_policy(), "Cache key policy");

    match cli.command {
        Command::List => {
            let state = api.connection_state().await;
            let offline = !state.is_connected;
            if offline {
                eprintln!("{}", display::OFFLINE_NOTICE);
            }

            match api.get_people_in(state).await? {
                Some(people) => {
                    if offline {
                        if let Some(stored_at) = api.people_cached_at() {
                            eprintln!("Showing data cached {}.", display::format_age(stored_at, Utc::now()));
                        }
                    }
                    println!("{}", display::format_people(&people));
                }
                None => println!("No cached people available."),
            }
        }
        Command::Show { id } => match api.get_person(id).await? {
            Some(person) => println!("{}", display::format_person(&person)),
            None => println!("Person {} is not available offline.", id),
        },
        Command::Add(args) => {
            let input = args.into_input()?;
            let created = api.create_person(&input).await?;
            println!("Person added: {} (id {})", created.name, created.id);
        }
        Command::Update { id, person } => {
            let input = person.into_input()?;
            api.update_person(id, &input).await?;
            println!("Person {} updated.", id);
        }
        Command::Delete { id, yes } => {
            confirm_delete(id, yes)?;
            api.delete_person(id).await?;
            println!("Person {} has been deleted.", id);
        }
        Command::Departments => match api.get_departments().await? {
            Some(departments) => println!("{}", display::format_departments(&departments)),
            None => println!("No cached departments available."),
        },
        Command::Cache {
            action: CacheAction::Clear,
        } => {
            api.client().cache().clear_all()?;
            println!("Cache cleared.");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
