//! Placeholder substitution for request templates.
//!
//! This module provides the substitution pass that replaces `{{name}}`
//! patterns in template text with values from the variable environment.
//! Substitution is single-pass and non-recursive: a substituted value is
//! never re-scanned for further placeholders, so a value that happens to
//! contain `{{...}}` is inserted verbatim and expansion always terminates.

use super::dynamic::resolve_dynamic;
use super::environment::VariableEnvironment;
use crate::models::{RequestTemplate, ResolvedRequest};
use once_cell::sync::Lazy;
use regex::Regex;

/// Cached regex for matching `{{name}}` where the name is one or more
/// characters excluding `}`. Compiled once and reused.
static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("Failed to compile placeholder regex"));

/// Substitutes every `{{name}}` placeholder in `text`.
///
/// Names are looked up in the environment after trimming surrounding
/// whitespace inside the braces, so `{{ token }}` and `{{token}}` resolve
/// the same binding. Names starting with `$` are dynamic variables
/// generated at substitution time (see [`super::dynamic`]). A name with no
/// binding (or an unrecognized dynamic name) leaves the placeholder
/// verbatim; partially-bound templates are legal and resolve further on a
/// later pass once the missing variables exist.
///
/// # Arguments
///
/// * `text` - The input text containing `{{name}}` patterns
/// * `env` - The variable environment to resolve names against
///
/// # Examples
///
/// ```
/// use request_chain::variables::{substitute, VariableEnvironment};
///
/// let mut env = VariableEnvironment::new();
/// env.set("userId", 42i64);
///
/// let resolved = substitute("https://api.test/users/{{userId}}", &env);
/// assert_eq!(resolved, "https://api.test/users/42");
/// ```
pub fn substitute(text: &str, env: &VariableEnvironment) -> String {
    // Fast path: no placeholder markers at all.
    if !text.contains("{{") {
        return text.to_string();
    }

    let re = &*PLACEHOLDER_REGEX;
    let mut result = String::with_capacity(text.len() + (text.len() / 4));
    let mut last_match_end = 0;

    for cap in re.captures_iter(text) {
        let full_match = cap.get(0).unwrap();
        let name = cap.get(1).unwrap().as_str().trim();

        result.push_str(&text[last_match_end..full_match.start()]);

        let replacement = if let Some(stripped) = name.strip_prefix('$') {
            resolve_dynamic(stripped)
        } else {
            env.get(name).map(|value| value.render())
        };

        match replacement {
            Some(value) => result.push_str(&value),
            // Unknown name: keep the placeholder exactly as written.
            None => result.push_str(full_match.as_str()),
        }

        last_match_end = full_match.end();
    }

    result.push_str(&text[last_match_end..]);
    result
}

/// Resolves a full request template into a [`ResolvedRequest`].
///
/// The URL, every header value, and the body are substituted independently
/// against the same environment. Header names are passed through as stored.
pub fn resolve_template(template: &RequestTemplate, env: &VariableEnvironment) -> ResolvedRequest {
    let headers = template
        .headers
        .iter()
        .map(|(name, value)| (name.clone(), substitute(value, env)))
        .collect();

    ResolvedRequest {
        method: template.method,
        url: substitute(&template.url, env),
        headers,
        body: substitute(&template.body, env),
    }
}
