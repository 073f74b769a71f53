use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite:./data/reminders.db";
const DEFAULT_HTTP_PORT: u16 = 10000;
const DEFAULT_TIMEZONE: &str = "Asia/Tashkent";
const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-latest";
/// Upper bound for every `*_SECS` setting: one day.
const MAX_SECS: u64 = 86_400;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    /// `None` disables the language model; extraction then always uses the regex rule.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub database_url: String,
    pub http_port: u16,
    pub timezone: Tz,
    pub poll_interval_secs: u64,
    pub llm_timeout_secs: u64,
    pub confirmation_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let gemini_api_key = non_blank("GEMINI_API_KEY");
        let gemini_model =
            non_blank("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let port_str = non_blank("HTTP_PORT")
            .or_else(|| non_blank("PORT"))
            .unwrap_or_else(|| DEFAULT_HTTP_PORT.to_string());
        let http_port = port_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let tz_name = non_blank("TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = tz_name
            .trim()
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid TIMEZONE '{}': {}", tz_name, e))?;

        Ok(Config {
            telegram_bot_token: token,
            gemini_api_key,
            gemini_model,
            database_url: Self::database_url_from_env(),
            http_port,
            timezone,
            poll_interval_secs: positive_secs("POLL_INTERVAL_SECS", 20)?,
            llm_timeout_secs: positive_secs("LLM_TIMEOUT_SECS", 10)?,
            confirmation_ttl_secs: positive_secs("CONFIRMATION_TTL_SECS", 600)?,
        })
    }

    /// How long a "remind tomorrow?" prompt stays answerable.
    pub fn confirmation_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.confirmation_ttl_secs.min(MAX_SECS) as i64)
    }

    /// Database location only. The migration tool uses this so it can run
    /// without a bot token.
    pub fn database_url_from_env() -> String {
        non_blank("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
    }
}

fn non_blank(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn positive_secs(key: &str, default: u64) -> Result<u64> {
    match non_blank(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if (1..=MAX_SECS).contains(&secs) => Ok(secs),
            _ => Err(anyhow!(
                "Invalid {}: expected between 1 and {} seconds",
                key,
                MAX_SECS
            )),
        },
    }
}
