//! # Eslatma Bot Main Entry Point
//!
//! Initializes logging, loads configuration, opens the reminder store,
//! starts the delivery scheduler and the health server, and runs the
//! Telegram bot.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eslatma_bot::bot::handlers::BotHandler;
use eslatma_bot::config::Config;
use eslatma_bot::database::connection::DatabaseManager;
use eslatma_bot::services::confirmation::ConfirmationRegister;
use eslatma_bot::services::extractor::TaskExtractor;
use eslatma_bot::services::health::HealthService;
use eslatma_bot::services::llm::{GeminiModel, TaskModel};
use eslatma_bot::services::reminder::ReminderService;
use eslatma_bot::services::scheduler::DeliveryScheduler;
use eslatma_bot::services::sink::TelegramSink;
use eslatma_bot::utils::datetime::{Clock, SystemClock};
use eslatma_bot::utils::logging::log_system_event;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eslatma_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Eslatma Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, Timezone: {}",
        config.database_url, config.http_port, config.timezone
    );

    // Without the store no reminder can be promised, so failure here is fatal
    let db = DatabaseManager::new(&config.database_url).await?;
    db.run_migrations().await?;
    info!("Database initialized successfully");

    let llm_timeout = Duration::from_secs(config.llm_timeout_secs);
    let model: Option<Arc<dyn TaskModel>> = match &config.gemini_api_key {
        Some(key) => match GeminiModel::new(key.clone(), config.gemini_model.clone(), llm_timeout) {
            Ok(model) => {
                info!("Language model enabled: {}", config.gemini_model);
                let model: Arc<dyn TaskModel> = Arc::new(model);
                Some(model)
            }
            Err(e) => {
                warn!("Language model disabled: {}", e);
                None
            }
        },
        None => {
            warn!("GEMINI_API_KEY not set - task labels use the regex rule only");
            None
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let register = Arc::new(ConfirmationRegister::new(config.confirmation_ttl()));
    let service = ReminderService::new(
        db.clone(),
        register,
        TaskExtractor::new(model, llm_timeout),
        clock.clone(),
        config.timezone,
    );

    let bot = Bot::new(&config.telegram_bot_token);
    let handler = BotHandler::new(service);

    // Delivery runs on its own task so slow model calls never delay it
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = DeliveryScheduler::new(
        db.clone(),
        Arc::new(TelegramSink::new(bot.clone())),
        clock,
        config.timezone,
        Duration::from_secs(config.poll_interval_secs),
    );
    let scheduler_task = tokio::spawn(scheduler.run(shutdown_rx));

    let health_service = HealthService::new(Arc::new(db));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;
    info!("Health check server starting on port {}", config.http_port);

    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    log_system_event("Bot started", None);

    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    let _ = shutdown_tx.send(true);
    if let Err(e) = scheduler_task.await {
        warn!("Delivery scheduler did not stop cleanly: {}", e);
    }

    log_system_event("Application stopped", None);
    Ok(())
}
