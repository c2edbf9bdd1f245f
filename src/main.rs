//! TELLER — In-memory accounts service with concurrent atomic transfers.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! assembles the store, notifier, and transfer engine, and serves the
//! accounts API with graceful shutdown.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use teller::api;
use teller::api::routes::ServiceState;
use teller::config::AppConfig;
use teller::engine::TransferEngine;
use teller::notify::email::EmailNotifier;
use teller::notify::webhook::WebhookNotifier;
use teller::notify::TransferNotifier;
use teller::store::AccountStore;

const BANNER: &str = r#"
 _____ _____ _     _     _____ ____
|_   _| ____| |   | |   | ____|  _ \
  | | |  _| | |   | |   |  _| | |_) |
  | | | |___| |___| |___| |___|  _ <
  |_| |_____|_____|_____|_____|_| \_\

  In-memory accounts, concurrent atomic transfers
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML (defaults when the file is absent)
    let cfg = AppConfig::load_or_default("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        host = %cfg.server.host,
        port = cfg.server.port,
        notifications = %cfg.notifications.mode,
        "TELLER starting up"
    );

    // -- Assemble components ---------------------------------------------

    let store = Arc::new(AccountStore::new());

    let notifier: Arc<dyn TransferNotifier> = match cfg.notifications.mode.as_str() {
        "webhook" => match cfg.notifications.webhook_url.as_deref() {
            Some(url) => {
                info!(url, "Using webhook notification channel");
                Arc::new(WebhookNotifier::new(url, cfg.notifications.timeout_secs)?)
            }
            None => {
                warn!("Webhook mode configured without a url; falling back to email");
                Arc::new(EmailNotifier::new(cfg.notifications.email_sender.clone()))
            }
        },
        "email" => Arc::new(EmailNotifier::new(cfg.notifications.email_sender.clone())),
        other => {
            warn!(mode = other, "Unknown notification mode, defaulting to email");
            Arc::new(EmailNotifier::new(cfg.notifications.email_sender.clone()))
        }
    };
    info!(notifier = notifier.name(), "Notification channel ready");

    let engine = TransferEngine::new(Arc::clone(&store), notifier);
    let state = Arc::new(ServiceState::new(store, engine));

    // -- Serve -----------------------------------------------------------

    api::serve(state, &cfg.server.host, cfg.server.port).await?;

    info!("TELLER shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("teller=info"));

    let json_logging = std::env::var("TELLER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
