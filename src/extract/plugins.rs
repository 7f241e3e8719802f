//! plugins.js walker
//!
//! The plugin registry is an array of `{name, status, description,
//! parameters}` records. Parameter values are free-form plugin
//! configuration; most are switches and numbers, but a handful of
//! well-known UI plugins keep player-visible strings there. Only
//! allow-listed plugins are visited, so a translator never sees raw
//! configuration noise.

use crate::error::Result;
use crate::extract::Replace;
use crate::graph::{accessor, Value};
use crate::rules::TextRules;

/// Visit the parameter strings of every allow-listed plugin.
///
/// # Errors
/// Currently infallible; uniform signature with the other walkers.
pub fn walk_plugins(root: &mut Value, rules: &TextRules, replace: &mut Replace<'_>) -> Result<()> {
    let Some(entries) = root.as_array_mut() else {
        return Ok(());
    };
    for plugin in entries {
        let allowed = accessor::text(plugin, "name")
            .is_some_and(|name| rules.plugin_is_allowed(&name));
        if !allowed {
            continue;
        }
        let Some(params) = accessor::get_mut(plugin, "parameters") else {
            continue;
        };
        walk_parameters(params, replace);
    }
    Ok(())
}

/// Visit each string value, recursing through nested parameter maps and
/// arrays.
fn walk_parameters(node: &mut Value, replace: &mut Replace<'_>) {
    match node {
        Value::Hash(map) => {
            for value in map.values_mut() {
                walk_parameters(value, replace);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_parameters(item, replace);
            }
        }
        Value::Str(_) => {
            let Some(text) = node.to_text().map(|t| t.into_owned()) else {
                return;
            };
            if text.trim().is_empty() {
                return;
            }
            if let Some(translated) = replace(&text) {
                if let Some(replacement) = node.with_text(&translated) {
                    *node = replacement;
                }
            }
        }
        _ => {}
    }
}
