use eslatma_bot::config::Config;
use std::env;
use std::sync::Mutex;

// Mutex to ensure config tests run sequentially to avoid environment variable conflicts
static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

const VARS: [&str; 10] = [
    "TELEGRAM_BOT_TOKEN",
    "GEMINI_API_KEY",
    "GEMINI_MODEL",
    "DATABASE_URL",
    "HTTP_PORT",
    "PORT",
    "TIMEZONE",
    "POLL_INTERVAL_SECS",
    "LLM_TIMEOUT_SECS",
    "CONFIRMATION_TTL_SECS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_config_from_env_with_all_vars() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token_123");
    env::set_var("GEMINI_API_KEY", "gemini_key");
    env::set_var("GEMINI_MODEL", "gemini-pro");
    env::set_var("DATABASE_URL", "sqlite:test.db");
    env::set_var("HTTP_PORT", "8080");
    env::set_var("TIMEZONE", "Europe/Berlin");
    env::set_var("POLL_INTERVAL_SECS", "5");
    env::set_var("LLM_TIMEOUT_SECS", "3");
    env::set_var("CONFIRMATION_TTL_SECS", "120");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "test_token_123");
    assert_eq!(config.gemini_api_key.as_deref(), Some("gemini_key"));
    assert_eq!(config.gemini_model, "gemini-pro");
    assert_eq!(config.database_url, "sqlite:test.db");
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.timezone, chrono_tz::Europe::Berlin);
    assert_eq!(config.poll_interval_secs, 5);
    assert_eq!(config.llm_timeout_secs, 3);
    assert_eq!(config.confirmation_ttl_secs, 120);
    assert_eq!(config.confirmation_ttl(), chrono::Duration::minutes(2));

    clear_env();
}

#[test]
fn test_config_from_env_with_defaults() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "required_token");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "required_token");
    assert!(config.gemini_api_key.is_none());
    assert_eq!(config.gemini_model, "gemini-flash-latest");
    assert_eq!(config.database_url, "sqlite:./data/reminders.db");
    assert_eq!(config.http_port, 10000);
    assert_eq!(config.timezone, chrono_tz::Asia::Tashkent);
    assert_eq!(config.poll_interval_secs, 20);
    assert_eq!(config.llm_timeout_secs, 10);
    assert_eq!(config.confirmation_ttl_secs, 600);

    clear_env();
}

#[test]
fn test_config_port_falls_back_to_platform_port() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "token");
    env::set_var("PORT", "4321");

    let config = Config::from_env().unwrap();
    assert_eq!(config.http_port, 4321);

    clear_env();
}

#[test]
fn test_config_missing_required_token() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    let result = Config::from_env();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("TELEGRAM_BOT_TOKEN must be set"));

    env::set_var("TELEGRAM_BOT_TOKEN", "   ");
    let result = Config::from_env();
    assert!(result.is_err());

    clear_env();
}

#[test]
fn test_config_invalid_port() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("HTTP_PORT", "invalid_port");

    let result = Config::from_env();
    assert!(result.unwrap_err().to_string().contains("Invalid HTTP_PORT"));

    clear_env();
}

#[test]
fn test_config_invalid_timezone() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("TIMEZONE", "Mars/Olympus");

    let result = Config::from_env();
    assert!(result.unwrap_err().to_string().contains("Invalid TIMEZONE"));

    clear_env();
}

#[test]
fn test_config_rejects_zero_intervals() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("POLL_INTERVAL_SECS", "0");
    let result = Config::from_env();
    assert!(result.unwrap_err().to_string().contains("POLL_INTERVAL_SECS"));

    env::remove_var("POLL_INTERVAL_SECS");
    env::set_var("CONFIRMATION_TTL_SECS", "soon");
    let result = Config::from_env();
    assert!(result.unwrap_err().to_string().contains("CONFIRMATION_TTL_SECS"));

    clear_env();
}

#[test]
fn test_config_rejects_oversized_intervals() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("CONFIRMATION_TTL_SECS", "18446744073709551615");
    let result = Config::from_env();
    assert!(result.unwrap_err().to_string().contains("CONFIRMATION_TTL_SECS"));

    env::set_var("CONFIRMATION_TTL_SECS", "86401");
    assert!(Config::from_env().is_err());

    env::set_var("CONFIRMATION_TTL_SECS", "86400");
    let config = Config::from_env().unwrap();
    assert_eq!(config.confirmation_ttl(), chrono::Duration::days(1));

    clear_env();
}

#[test]
fn test_database_url_without_token() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    assert_eq!(Config::database_url_from_env(), "sqlite:./data/reminders.db");
    env::set_var("DATABASE_URL", "sqlite:/tmp/other.db");
    assert_eq!(Config::database_url_from_env(), "sqlite:/tmp/other.db");

    clear_env();
}
