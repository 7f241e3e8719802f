//! System-file walker
//!
//! The System database holds flat vocabulary: type-name arrays, the
//! currency unit, the game title, and the terms table (called `words`
//! in the oldest generation). Terms values are either strings or string
//! arrays; both are visited in stored order so the corpus layout is
//! stable across runs.

use crate::error::Result;
use crate::extract::Replace;
use crate::graph::{accessor, Labels, Value};

/// Visit every translatable string in a System root.
///
/// # Errors
/// Currently infallible; uniform signature with the other walkers.
pub fn walk_system(root: &mut Value, labels: &Labels, replace: &mut Replace<'_>) -> Result<()> {
    for field in [
        labels.skill_types,
        labels.weapon_types,
        labels.armor_types,
        labels.equip_types,
        labels.elements,
    ] {
        if let Some(list) = accessor::get_mut(root, field).and_then(Value::as_array_mut) {
            apply_string_array(list, replace);
        }
    }

    apply_scalar(root, labels.currency_unit, replace);
    apply_scalar(root, labels.game_title, replace);

    if let Some(terms) = accessor::get_mut(root, labels.terms) {
        walk_terms(terms, replace);
    }
    Ok(())
}

/// Visit a terms node: every leaf string under it, in stored order.
fn walk_terms(node: &mut Value, replace: &mut Replace<'_>) {
    match node {
        Value::Object(obj) => {
            for value in obj.ivars.values_mut() {
                walk_terms(value, replace);
            }
        }
        Value::Hash(map) => {
            for value in map.values_mut() {
                walk_terms(value, replace);
            }
        }
        Value::Array(items) => apply_string_array(items, replace),
        Value::Str(_) | Value::Bytes(_) => apply_leaf(node, replace),
        _ => {}
    }
}

fn apply_string_array(items: &mut [Value], replace: &mut Replace<'_>) {
    for item in items {
        apply_leaf(item, replace);
    }
}

fn apply_leaf(slot: &mut Value, replace: &mut Replace<'_>) {
    let Some(text) = slot.to_text().map(|t| t.into_owned()) else {
        return;
    };
    if text.is_empty() {
        return;
    }
    if let Some(translated) = replace(&text) {
        if let Some(replacement) = slot.with_text(&translated) {
            *slot = replacement;
        }
    }
}

fn apply_scalar(root: &mut Value, field: &str, replace: &mut Replace<'_>) {
    let Some(text) = accessor::text(root, field).map(|t| t.into_owned()) else {
        return;
    };
    if text.is_empty() {
        return;
    }
    if let Some(translated) = replace(&text) {
        accessor::set_text(root, field, &translated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Object;
    use crate::project::Engine;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn system_root() -> Value {
        let terms = {
            let mut ivars = IndexMap::new();
            ivars.insert(
                "@basic".to_string(),
                Value::Array(vec![
                    Value::Bytes(b"Level".to_vec()),
                    Value::Bytes(b"HP".to_vec()),
                ]),
            );
            ivars.insert("@save".to_string(), Value::Bytes(b"Save".to_vec()));
            Value::Object(Object {
                class: "RPG::System::Terms".to_string(),
                ivars,
            })
        };
        let mut ivars = IndexMap::new();
        ivars.insert(
            "@elements".to_string(),
            Value::Array(vec![
                Value::Bytes(Vec::new()),
                Value::Bytes(b"Fire".to_vec()),
            ]),
        );
        ivars.insert("@currency_unit".to_string(), Value::Bytes(b"G".to_vec()));
        ivars.insert("@terms".to_string(), terms);
        ivars.insert("@game_title".to_string(), Value::Bytes(b"My Game".to_vec()));
        Value::Object(Object {
            class: "RPG::System".to_string(),
            ivars,
        })
    }

    #[test]
    fn visits_arrays_scalars_and_terms_in_order() {
        let mut root = system_root();
        let labels = Labels::for_engine(Engine::VxAce);
        let mut seen = Vec::new();
        let mut record = |t: &str| -> Option<String> {
            seen.push(t.to_string());
            None
        };
        walk_system(&mut root, &labels, &mut record).unwrap();

        assert_eq!(seen, vec!["Fire", "G", "My Game", "Level", "HP", "Save"]);
    }

    #[test]
    fn substitution_reaches_nested_terms() {
        let mut root = system_root();
        let labels = Labels::for_engine(Engine::VxAce);
        let mut translate = |t: &str| -> Option<String> {
            (t == "Save").then(|| "Sauvegarder".to_string())
        };
        walk_system(&mut root, &labels, &mut translate).unwrap();

        let terms = accessor::get(&root, "terms").unwrap();
        assert_eq!(
            accessor::get(terms, "save"),
            Some(&Value::Bytes(b"Sauvegarder".to_vec()))
        );
    }
}
