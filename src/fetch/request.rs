use std::collections::HashMap;

use crate::error::{AppError, Context};

use super::FetchResult;

/// Endpoint for a whole collection, e.g. `/api/projects`.
pub const COLLECTION_ENDPOINT: &str = "/api/{collection}";
/// Endpoint for one record, e.g. `/api/projects/42`.
pub const RECORD_ENDPOINT: &str = "/api/{collection}/{id}";
pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const LOGOUT_ENDPOINT: &str = "/api/auth/logout";

pub fn collection_path(collection: &str) -> FetchResult<String> {
    let replacements = HashMap::from([("collection", collection.to_string())]);
    render_template(COLLECTION_ENDPOINT, &replacements)
}

pub fn record_path(collection: &str, id: &str) -> FetchResult<String> {
    let replacements = HashMap::from([
        ("collection", collection.to_string()),
        // Percent-encoded so an id always stays a single path segment.
        ("id", urlencoding::encode(id).into_owned()),
    ]);
    render_template(RECORD_ENDPOINT, &replacements)
}

/// Join a base URL and an absolute endpoint path without doubling the slash.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Replace `${NAME}` placeholders with environment variables.
pub fn expand_env_vars(value: &str) -> FetchResult<String> {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut name = String::new();
            let mut closed = false;
            for next in chars.by_ref() {
                if next == '}' {
                    closed = true;
                    break;
                }
                name.push(next);
            }

            if !closed {
                return Err(AppError::message(format!(
                    "Unterminated environment placeholder `${{{name}`"
                )));
            }
            if name.is_empty() {
                return Err(AppError::message("Encountered empty environment placeholder"));
            }

            let value = std::env::var(&name)
                .with_context(|| format!("Environment variable {name} is not set"))?;
            result.push_str(&value);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

pub fn render_template(template: &str, replacements: &HashMap<&str, String>) -> FetchResult<String> {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars();

    while let Some(ch) = chars.next() {
        if ch != '{' {
            result.push(ch);
            continue;
        }

        let mut key = String::new();
        let mut closed = false;
        for next in chars.by_ref() {
            if next == '}' {
                closed = true;
                break;
            }
            key.push(next);
        }

        if !closed {
            return Err(AppError::message(format!(
                "Unterminated placeholder in template: {{{key}"
            )));
        }

        let value = replacements.get(key.as_str()).ok_or_else(|| {
            AppError::message(format!(
                "No replacement provided for placeholder `{key}` in template `{template}`"
            ))
        })?;
        result.push_str(value);
    }

    Ok(result)
}
