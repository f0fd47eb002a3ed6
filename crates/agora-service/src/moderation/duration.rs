//! Human duration strings such as `90s`, `15m`, `1h30m`, or `2d`.

use chrono::Duration;

use agora_core::error::AppError;
use agora_core::result::AppResult;

/// Longest accepted timeout.
const MAX_DAYS: i64 = 365;

/// Parse a positive duration made of `<number><unit>` parts.
///
/// Units are `d`, `h`, `m`, and `s`; each may appear once, largest first.
pub fn parse_duration(input: &str) -> AppResult<Duration> {
    let invalid = || {
        AppError::validation(format!(
            "Invalid duration '{input}': expected e.g. '90s', '15m', '1h30m'"
        ))
        .with_reason("invalid_duration")
    };

    let s = input.trim();
    if s.is_empty() {
        return Err(invalid());
    }

    let mut total_seconds: i64 = 0;
    let mut last_rank = usize::MAX;
    let mut digits = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let (rank, unit_seconds) = match c.to_ascii_lowercase() {
            'd' => (3, 86_400),
            'h' => (2, 3_600),
            'm' => (1, 60),
            's' => (0, 1),
            _ => return Err(invalid()),
        };
        if digits.is_empty() || rank >= last_rank {
            return Err(invalid());
        }

        let value: i64 = digits.parse().map_err(|_| invalid())?;
        total_seconds = value
            .checked_mul(unit_seconds)
            .and_then(|part| total_seconds.checked_add(part))
            .ok_or_else(invalid)?;
        digits.clear();
        last_rank = rank;
    }

    if !digits.is_empty() || total_seconds <= 0 {
        return Err(invalid());
    }
    if total_seconds > MAX_DAYS * 86_400 {
        return Err(AppError::validation(format!(
            "Duration '{input}' exceeds the maximum of {MAX_DAYS} days"
        ))
        .with_reason("invalid_duration"));
    }

    Ok(Duration::seconds(total_seconds))
}
