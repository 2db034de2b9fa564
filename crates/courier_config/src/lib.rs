// --- File: crates/courier_config/src/lib.rs ---
use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;

pub mod models;
pub use models::*;

/// Loads the application configuration.
///
/// Layering, lowest priority first: `config/default`, `config/{RUN_ENV}`,
/// then `COURIER__`-prefixed environment variables (e.g.
/// `COURIER__SERVER__PORT=8080`). After deserialization the per-channel
/// webhook URLs fall back to the flat variables the original deployment
/// used (`PLAY_WEBHOOK_URL`, `CREATE_WEBHOOK_URL`, `DRAFT_WEBHOOK_URL`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = env::var("COURIER_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(Environment::with_prefix("COURIER").separator("__"));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    Ok(apply_webhook_url_fallbacks(raw_config, |name| env::var(name).ok()))
}

/// Fills in webhook URLs that the layered config left unset from flat
/// environment variables named `{CHANNEL}_WEBHOOK_URL`.
fn apply_webhook_url_fallbacks(
    mut config: AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AppConfig {
    for channel in Channel::ALL {
        let webhook = config.webhooks.get_mut(channel);
        if webhook.url.as_deref().map(str::is_empty).unwrap_or(true) {
            let var = format!("{}_WEBHOOK_URL", channel.as_str());
            webhook.url = lookup(&var).filter(|value| !value.is_empty());
        }
    }
    config
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The path defaults to ".env" and can be overridden with the
/// `DOTENV_OVERRIDE` environment variable. Loading happens at most once per
/// process.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
