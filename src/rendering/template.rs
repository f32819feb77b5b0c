//! Placeholder substitution for document templates.
//!
//! Templates reference values as `{{name}}`. Every placeholder must have a
//! value in the [`RenderContext`]; values are inserted verbatim, so callers
//! escape them for the surrounding markup first.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::{Error, Result};

/// Regex pattern for placeholders: `{{name}}`
static VARIABLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").unwrap_or_else(|_| unreachable!()));

/// Values available to a template.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Values keyed by placeholder name.
    values: HashMap<String, String>,
}

impl RenderContext {
    /// Creates a new empty render context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value to the context.
    pub fn add_string(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Gets a value from the context.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Checks if the context contains a value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

/// Returns the placeholder names used by a template, in order of appearance.
#[must_use]
pub fn extract_variables(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for captures in VARIABLE_PATTERN.captures_iter(template) {
        let name = captures.get(1).map_or("", |m| m.as_str());
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Replaces every `{{name}}` in `template` with its context value.
///
/// # Errors
///
/// Returns an error naming the first placeholder without a value.
pub fn render_template(template: &str, ctx: &RenderContext) -> Result<String> {
    if let Some(missing) = extract_variables(template)
        .into_iter()
        .find(|name| !ctx.contains(name))
    {
        return Err(Error::InvalidInput(format!(
            "Missing template variable '{missing}'"
        )));
    }

    let rendered = VARIABLE_PATTERN.replace_all(template, |captures: &Captures<'_>| {
        let name = captures.get(1).map_or("", |m| m.as_str());
        ctx.get(name).unwrap_or_default().to_string()
    });

    Ok(rendered.into_owned())
}
