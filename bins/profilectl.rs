//! Read-only inspection of stored player profiles.
//!
//! ```text
//! profilectl show <uuid> <group> [mode]
//! profilectl logout <uuid>
//! profilectl location <uuid> <world>
//! ```

use anyhow::{anyhow, Context};
use common::{env::ensure_data_root, utils::logging::init_logging};
use configs::{AppConfig, DEFAULT_CONFIG_PATH};
use dotenvy::dotenv;
use models::{GameMode, ProfileKey};
use service::{FileProfileStore, ProfileRepository};
use tracing::{debug, warn};
use uuid::Uuid;

const USAGE: &str =
    "usage: profilectl show <uuid> <group> [mode] | logout <uuid> | location <uuid> <world>";

#[derive(Debug, PartialEq)]
enum Command {
    Show(ProfileKey),
    Logout(Uuid),
    Location { uuid: Uuid, world: String },
}

fn parse_uuid(raw: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(raw).with_context(|| format!("invalid player uuid: {raw}"))
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        ["show", uuid, group] => {
            let key = ProfileKey::new(parse_uuid(uuid)?, GameMode::Survival, *group)?;
            Ok(Command::Show(key))
        }
        ["show", uuid, group, mode] => {
            let key = ProfileKey::new(parse_uuid(uuid)?, mode.parse()?, *group)?;
            Ok(Command::Show(key))
        }
        ["logout", uuid] => Ok(Command::Logout(parse_uuid(uuid)?)),
        ["location", uuid, world] => Ok(Command::Location {
            uuid: parse_uuid(uuid)?,
            world: world.to_string(),
        }),
        _ => Err(anyhow!(USAGE)),
    }
}

/// Config file when present, defaults otherwise; env overrides apply either way.
fn load_config() -> anyhow::Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut cfg = if std::path::Path::new(&path).exists() {
        configs::load_from_file(&path)?
    } else {
        AppConfig::default()
    };
    cfg.normalize_and_validate()?;
    Ok(cfg)
}

fn run(command: Command, repo: &dyn ProfileRepository) -> anyhow::Result<()> {
    match command {
        Command::Show(key) => match repo.get_player(&key)? {
            Some(doc) => println!("{}", serde_json::to_string_pretty(&doc)?),
            None => eprintln!("no profile stored for {key}"),
        },
        Command::Logout(uuid) => match repo.get_logout(uuid) {
            Some(location) => println!("{}", serde_json::to_string_pretty(&location)?),
            None => eprintln!("no logout location stored for {uuid}"),
        },
        Command::Location { uuid, world } => match repo.get_location(uuid, &world) {
            Some(location) => println!("{}", serde_json::to_string_pretty(&location)?),
            None => eprintln!("no location stored for {uuid} in {world}"),
        },
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = load_config()?;
    init_logging(cfg.logging.format);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            warn!(error = %e, "bad arguments");
            return Err(e);
        }
    };

    ensure_data_root(&cfg.storage.data_root)?;
    debug!(data_root = %cfg.storage.data_root, ?command, "profilectl starting");

    let store = FileProfileStore::from_config(&cfg.storage);
    run(command, &store)
}
