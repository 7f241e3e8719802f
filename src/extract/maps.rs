//! Map-file walker
//!
//! A map's translatable text lives in its event pages' command lists,
//! plus the map display name shown on transfer. Display names go to the
//! shared names corpus rather than the map corpus: a name reused by
//! several maps should translate once.
//!
//! Marshal maps key events by id in a hash; JSON maps use a sparse
//! array with null gaps. Both shapes are walked here.

use crate::error::Result;
use crate::extract::{commands, Replace};
use crate::graph::{accessor, Labels, Value};
use crate::project::Engine;
use crate::rules::TextRules;

/// Visit a map root: display name, then every event page's command list.
///
/// # Errors
/// Propagates command-list walker errors.
pub fn walk_map(
    root: &mut Value,
    labels: &Labels,
    rules: &TextRules,
    engine: Engine,
    replace: &mut Replace<'_>,
    replace_name: &mut Replace<'_>,
) -> Result<()> {
    if let Some(name) = accessor::text(root, labels.display_name).map(|n| n.into_owned()) {
        if !name.is_empty() {
            if let Some(translated) = replace_name(&name) {
                accessor::set_text(root, labels.display_name, &translated);
            }
        }
    }

    let Some(events) = accessor::get_mut(root, labels.events) else {
        return Ok(());
    };
    match events {
        Value::Hash(map) => {
            for event in map.values_mut() {
                walk_event(event, labels, rules, engine, replace)?;
            }
        }
        Value::Array(entries) => {
            for event in entries.iter_mut() {
                walk_event(event, labels, rules, engine, replace)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Visit one event: each page's command list. Null array gaps and
/// pageless events are skipped.
pub fn walk_event(
    event: &mut Value,
    labels: &Labels,
    rules: &TextRules,
    engine: Engine,
    replace: &mut Replace<'_>,
) -> Result<()> {
    let Some(pages) = accessor::get_mut(event, labels.pages).and_then(Value::as_array_mut) else {
        return Ok(());
    };
    for page in pages {
        walk_page(page, labels, rules, engine, replace)?;
    }
    Ok(())
}

/// Visit one page's command list.
pub fn walk_page(
    page: &mut Value,
    labels: &Labels,
    rules: &TextRules,
    engine: Engine,
    replace: &mut Replace<'_>,
) -> Result<()> {
    if let Some(list) = accessor::get_mut(page, labels.list).and_then(Value::as_array_mut) {
        commands::walk_list(list, labels, rules, engine, replace)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{HashKey, Object};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn command(code: i64, params: Vec<Value>) -> Value {
        let mut ivars = IndexMap::new();
        ivars.insert("@code".to_string(), Value::Int(code));
        ivars.insert("@parameters".to_string(), Value::Array(params));
        Value::Object(Object {
            class: "RPG::EventCommand".to_string(),
            ivars,
        })
    }

    fn marshal_map() -> Value {
        let page = {
            let mut ivars = IndexMap::new();
            ivars.insert(
                "@list".to_string(),
                Value::Array(vec![
                    command(401, vec![Value::Bytes(b"Welcome".to_vec())]),
                    command(401, vec![Value::Bytes(b"home.".to_vec())]),
                ]),
            );
            Value::Object(Object {
                class: "RPG::Event::Page".to_string(),
                ivars,
            })
        };
        let event = {
            let mut ivars = IndexMap::new();
            ivars.insert("@pages".to_string(), Value::Array(vec![page]));
            Value::Object(Object {
                class: "RPG::Event".to_string(),
                ivars,
            })
        };
        let mut events = IndexMap::new();
        events.insert(HashKey::Int(1), event);

        let mut ivars = IndexMap::new();
        ivars.insert(
            "@display_name".to_string(),
            Value::Bytes(b"Old Town".to_vec()),
        );
        ivars.insert("@events".to_string(), Value::Hash(events));
        Value::Object(Object {
            class: "RPG::Map".to_string(),
            ivars,
        })
    }

    #[test]
    fn display_name_and_runs_are_visited() {
        let mut root = marshal_map();
        let labels = Labels::for_engine(Engine::VxAce);
        let mut texts = Vec::new();
        let mut names = Vec::new();
        let mut record = |t: &str| -> Option<String> {
            texts.push(t.to_string());
            None
        };
        let mut record_name = |t: &str| -> Option<String> {
            names.push(t.to_string());
            None
        };
        walk_map(
            &mut root,
            &labels,
            &TextRules::default(),
            Engine::VxAce,
            &mut record,
            &mut record_name,
        )
        .unwrap();

        assert_eq!(texts, vec!["Welcome\nhome."]);
        assert_eq!(names, vec!["Old Town"]);
    }

    #[test]
    fn null_event_gaps_are_skipped() {
        let mut ivars = IndexMap::new();
        ivars.insert(
            "@events".to_string(),
            Value::Array(vec![Value::Nil, Value::Nil]),
        );
        let mut root = Value::Object(Object {
            class: "RPG::Map".to_string(),
            ivars,
        });
        let labels = Labels::for_engine(Engine::VxAce);
        let mut record = |_: &str| -> Option<String> { None };
        let mut record_name = |_: &str| -> Option<String> { None };
        walk_map(
            &mut root,
            &labels,
            &TextRules::default(),
            Engine::VxAce,
            &mut record,
            &mut record_name,
        )
        .unwrap();
    }
}
