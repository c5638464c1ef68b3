//! Generated `{{$...}}` variables.
//!
//! Dynamic variables are produced at substitution time instead of being
//! looked up in the environment. They cover the values chains routinely
//! need but cannot know ahead of time:
//!
//! - `{{$guid}}` - a fresh UUID v4
//! - `{{$timestamp}}` - current Unix timestamp in seconds
//! - `{{$isoTimestamp}}` - current UTC time, ISO 8601
//! - `{{$randomInt min max}}` - random integer in `[min, max]`
//!
//! Resolution is infallible from the substitution pass's point of view: a
//! name or argument list that does not resolve returns `None` and the
//! placeholder stays verbatim, matching how unknown plain variables behave.

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use uuid::Uuid;

/// Resolves a dynamic variable from its name and space-separated arguments
/// (the `$` prefix already stripped).
///
/// Returns `None` for unrecognized names or malformed arguments.
pub fn resolve_dynamic(expr: &str) -> Option<String> {
    let mut parts = expr.split_whitespace();
    let name = parts.next()?;
    let args: Vec<&str> = parts.collect();

    match name {
        "guid" => Some(Uuid::new_v4().to_string()),
        "timestamp" => Some(Utc::now().timestamp().to_string()),
        "isoTimestamp" => Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        "randomInt" => resolve_random_int(&args),
        _ => None,
    }
}

/// `$randomInt min max`, bounds inclusive.
fn resolve_random_int(args: &[&str]) -> Option<String> {
    if args.len() != 2 {
        return None;
    }
    let min: i64 = args[0].parse().ok()?;
    let max: i64 = args[1].parse().ok()?;
    if min > max {
        return None;
    }
    let value = rand::thread_rng().gen_range(min..=max);
    Some(value.to_string())
}
