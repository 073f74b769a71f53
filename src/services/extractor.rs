//! Turns a chat message into a clock time and a short task label.
//!
//! The clock time always comes from a regex. The task label comes from a
//! deterministic cleanup of the message, unless the message contains one of
//! the command verbs, in which case a language model is asked for a short
//! label first. Any model failure falls back to the deterministic label.

use crate::error::{ReminderError, Result};
use crate::services::llm::TaskModel;
use crate::utils::logging::log_extraction_degraded;
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Reminder-request verbs. Presence of any of them routes the task label
/// through the language model.
pub const COMMAND_WORDS: [&str; 5] = ["eslat", "ayt", "yubor", "bildir", "xabar"];

/// "o'clock", removed wherever it occurs.
pub const FILLER_WORD: &str = "soat";

/// Label used when nothing is left after cleanup.
pub const DEFAULT_TASK: &str = "Eslatma vaqti";

/// Longest task label kept, in characters. Keeps delivery texts far below
/// Telegram's message size limit.
pub const MAX_TASK_CHARS: usize = 200;

#[allow(clippy::expect_used)]
fn time_regex() -> &'static Regex {
    static TIME_RE: OnceLock<Regex> = OnceLock::new();
    TIME_RE.get_or_init(|| {
        Regex::new(r"(?i)(\d{1,2})[:.](\d{2})").expect("time regex must compile")
    })
}

#[allow(clippy::expect_used)]
fn postposition_regex() -> &'static Regex {
    static DA_RE: OnceLock<Regex> = OnceLock::new();
    DA_RE.get_or_init(|| Regex::new(r"\bda\b").expect("postposition regex must compile"))
}

/// Hour and minute parsed from a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    /// 0-23.
    pub hour: u32,
    /// 0-59.
    pub minute: u32,
}

/// Result of a full extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// When to fire, local wall clock.
    pub time: ClockTime,
    /// Short label shown on delivery.
    pub task: String,
}

#[derive(Debug, Deserialize)]
struct ModelTask {
    task: String,
}

/// Lower-cases and trims, the form every rule below works on.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// First `H:MM` / `HH.MM` token in the text. Out-of-range values are not a clock time.
pub fn parse_time(text: &str) -> Result<ClockTime> {
    let caps = time_regex()
        .captures(text)
        .ok_or(ReminderError::NoTimeFound)?;

    let hour: u32 = caps[1].parse().map_err(|_| ReminderError::NoTimeFound)?;
    let minute: u32 = caps[2].parse().map_err(|_| ReminderError::NoTimeFound)?;

    if hour > 23 || minute > 59 {
        return Err(ReminderError::NoTimeFound);
    }
    Ok(ClockTime { hour, minute })
}

/// Whether the text contains one of [`COMMAND_WORDS`].
pub fn has_command_word(text: &str) -> bool {
    let lower = text.to_lowercase();
    COMMAND_WORDS.iter().any(|w| lower.contains(w))
}

/// Deterministic task label: drops every time token, the filler word and
/// the standalone postposition, then collapses whitespace.
pub fn fallback_task(text: &str) -> String {
    let without_time = time_regex().replace_all(text, "");
    let without_filler = without_time.replace(FILLER_WORD, "");
    let without_da = postposition_regex().replace_all(&without_filler, "");
    without_da.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts a label to [`MAX_TASK_CHARS`] characters, ending in "…" when shortened.
pub fn truncate_task(task: &str) -> String {
    if task.chars().count() <= MAX_TASK_CHARS {
        return task.to_string();
    }
    let mut cut: String = task.chars().take(MAX_TASK_CHARS - 1).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

/// Instruction sent to the language model for one message.
pub fn build_prompt(text: &str) -> String {
    format!(
        "Quyidagi xabardan eslatma uchun qisqa vazifa nomini ajrat. \
         Vaqtni va buyruq so'zlarini (eslat, ayt, yubor, bildir, xabar) qo'shma. \
         Faqat qat'iy JSON qaytar: {{\"task\":\"qisqa\"}}\nMatn: \"{}\"",
        text.replace('"', "'")
    )
}

/// Pulls `{"task": ...}` out of a model reply, tolerating code fences and
/// chatter around the object.
pub fn parse_model_reply(raw: &str) -> Result<String> {
    let trimmed = raw.trim_matches(|c: char| c == '`' || c.is_whitespace());
    let trimmed = trimmed.strip_prefix("json").unwrap_or(trimmed);

    let start = trimmed
        .find('{')
        .ok_or_else(|| ReminderError::ExtractionDegraded("reply has no JSON object".into()))?;
    let end = trimmed
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| ReminderError::ExtractionDegraded("reply has no JSON object".into()))?;

    let parsed: ModelTask = serde_json::from_str(&trimmed[start..=end])
        .map_err(|e| ReminderError::ExtractionDegraded(format!("malformed JSON: {e}")))?;

    let task = parsed.task.split_whitespace().collect::<Vec<_>>().join(" ");
    if task.is_empty() {
        return Err(ReminderError::ExtractionDegraded("model returned an empty task".into()));
    }
    Ok(task)
}

/// Derives task labels, optionally through a language model.
#[derive(Clone)]
pub struct TaskExtractor {
    model: Option<Arc<dyn TaskModel>>,
    timeout: Duration,
}

impl TaskExtractor {
    /// Extractor using `model` for command-style messages, each call bounded by `timeout`.
    pub fn new(model: Option<Arc<dyn TaskModel>>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Extractor that never calls out.
    pub fn deterministic() -> Self {
        Self::new(None, Duration::from_secs(1))
    }

    /// Full extraction of an already normalized message.
    pub async fn extract(&self, text: &str) -> Result<Extraction> {
        let time = parse_time(text)?;
        let task = self.derive_task(text).await;
        Ok(Extraction { time, task })
    }

    /// Task label for a message, at most [`MAX_TASK_CHARS`] long. Never
    /// fails; the worst case is [`DEFAULT_TASK`].
    pub async fn derive_task(&self, text: &str) -> String {
        let mut task = None;

        if has_command_word(text) {
            if let Some(model) = &self.model {
                match self.ask_model(model.as_ref(), text).await {
                    Ok(label) => task = Some(label),
                    Err(e) => log_extraction_degraded(text, &e),
                }
            }
        }

        let task = task.unwrap_or_else(|| fallback_task(text));
        if task.is_empty() {
            DEFAULT_TASK.to_string()
        } else {
            truncate_task(&task)
        }
    }

    async fn ask_model(&self, model: &dyn TaskModel, text: &str) -> Result<String> {
        let prompt = build_prompt(text);
        let raw = tokio::time::timeout(self.timeout, model.complete(&prompt))
            .await
            .map_err(|_| {
                ReminderError::ExtractionDegraded(format!(
                    "model call timed out after {}s",
                    self.timeout.as_secs()
                ))
            })??;
        parse_model_reply(&raw)
    }
}
