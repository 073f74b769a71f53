/// Prefix of the per-reminder cancel command shown in the pending list.
pub const CANCEL_PREFIX: &str = "/ochir_";

/// Reminder id from a `/ochir_<id>` command. Accepts an `@botname` suffix.
pub fn parse_cancel_command(text: &str) -> Option<i64> {
    let rest = text.trim().strip_prefix(CANCEL_PREFIX)?;
    let digits = rest.split('@').next().unwrap_or(rest);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|id| *id > 0)
}

pub fn cancel_command(id: i64) -> String {
    format!("{CANCEL_PREFIX}{id}")
}
