//! Database-table walkers: entities, common events, troops
//!
//! Entity tables (actors, items, weapons, ...) are arrays of records
//! with a nil/null slot at index 0. Player-visible fields are `name`
//! (plus `nickname` for actors), `description`, and `note`. In the JSON
//! generation these fields go through the internal-marker heuristic,
//! since authors use them for `---`-style separators and ALL_CAPS
//! placeholders.

use crate::error::Result;
use crate::extract::{commands, maps, Replace};
use crate::graph::{accessor, Labels, Value};
use crate::project::{Category, Engine};
use crate::rules::TextRules;

/// Visit the name/description/note fields of each record in an entity
/// table.
///
/// # Errors
/// Currently infallible; uniform signature with the other walkers.
pub fn walk_entity_table(
    root: &mut Value,
    labels: &Labels,
    category: Category,
    text_rules: &TextRules,
    engine: Engine,
    replace: &mut Replace<'_>,
) -> Result<()> {
    let Some(entries) = root.as_array_mut() else {
        return Ok(());
    };
    let filtered = engine.is_json();
    for entry in entries {
        if matches!(entry, Value::Nil) {
            continue;
        }
        let mut fields = vec![labels.name];
        if category == Category::Actors {
            fields.push(labels.nickname);
        }
        fields.push(labels.description);
        fields.push(labels.note);
        for field in fields {
            apply_text_field(entry, field, text_rules, filtered, replace);
        }
    }
    Ok(())
}

/// Visit each common event's command list.
///
/// # Errors
/// Propagates command-list walker errors.
pub fn walk_common_events(
    root: &mut Value,
    labels: &Labels,
    text_rules: &TextRules,
    engine: Engine,
    replace: &mut Replace<'_>,
) -> Result<()> {
    let Some(entries) = root.as_array_mut() else {
        return Ok(());
    };
    for event in entries {
        if matches!(event, Value::Nil) {
            continue;
        }
        if let Some(list) = accessor::get_mut(event, labels.list).and_then(Value::as_array_mut) {
            commands::walk_list(list, labels, text_rules, engine, replace)?;
        }
    }
    Ok(())
}

/// Visit each troop's battle-event pages.
///
/// # Errors
/// Propagates command-list walker errors.
pub fn walk_troops(
    root: &mut Value,
    labels: &Labels,
    text_rules: &TextRules,
    engine: Engine,
    replace: &mut Replace<'_>,
) -> Result<()> {
    let Some(entries) = root.as_array_mut() else {
        return Ok(());
    };
    for troop in entries {
        if matches!(troop, Value::Nil) {
            continue;
        }
        let Some(pages) = accessor::get_mut(troop, labels.pages).and_then(Value::as_array_mut)
        else {
            continue;
        };
        for page in pages {
            maps::walk_page(page, labels, text_rules, engine, replace)?;
        }
    }
    Ok(())
}

fn apply_text_field(
    entry: &mut Value,
    field: &str,
    text_rules: &TextRules,
    filtered: bool,
    replace: &mut Replace<'_>,
) {
    let Some(text) = accessor::text(entry, field).map(|t| t.into_owned()) else {
        return;
    };
    if text.trim().is_empty() {
        return;
    }
    if filtered && !text_rules.entity_text_is_translatable(&text) {
        return;
    }
    if let Some(translated) = replace(&text) {
        accessor::set_text(entry, field, &translated);
    }
}
