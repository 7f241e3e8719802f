//! Event-command-list walker
//!
//! The one traversal shared by maps, common events, and troop pages.
//! Dialogue runs are collapsed before the walk, so by the time a
//! command is visited its parameter 0 already holds the joined
//! multi-line text.

use crate::error::Result;
use crate::extract::Replace;
use crate::graph::dialogue::{self, opcode};
use crate::graph::{Labels, Value};
use crate::project::Engine;
use crate::rules::TextRules;

/// Visit every translatable string in an event command list.
///
/// # Errors
/// Currently infallible; the `Result` keeps the signature uniform with
/// the file-shape walkers.
pub fn walk_list(
    list: &mut Vec<Value>,
    labels: &Labels,
    rules: &TextRules,
    engine: Engine,
    replace: &mut Replace<'_>,
) -> Result<()> {
    dialogue::merge_runs(list, labels);

    for command in list.iter_mut() {
        let Some(code) = dialogue::command_code(command, labels) else {
            continue;
        };
        match code {
            c if dialogue::is_dialogue_code(c) => {
                apply_parameter(command, labels, 0, replace);
            }
            opcode::SHOW_CHOICES => {
                apply_choice_list(command, labels, replace);
            }
            opcode::CHOICE_BRANCH | opcode::CHANGE_NAME | opcode::CHANGE_NICKNAME => {
                apply_parameter(command, labels, 1, replace);
            }
            opcode::PLUGIN_COMMAND => {
                let translatable = dialogue::parameter_text(command, labels, 0)
                    .is_some_and(|text| rules.command_is_translatable(&text, engine.is_json()));
                if translatable {
                    apply_parameter(command, labels, 0, replace);
                }
            }
            opcode::COMMENT if engine.is_json() => {
                apply_parameter(command, labels, 0, replace);
            }
            _ => {}
        }
    }
    Ok(())
}

/// Visit parameter `index`, replacing it when the callback answers.
fn apply_parameter(command: &mut Value, labels: &Labels, index: usize, replace: &mut Replace<'_>) {
    let Some(text) = dialogue::parameter_text(command, labels, index) else {
        return;
    };
    if text.is_empty() {
        return;
    }
    if let Some(translated) = replace(&text) {
        dialogue::set_parameter_text(command, labels, index, &translated);
    }
}

/// Visit each choice string of a 102 command's first parameter.
fn apply_choice_list(command: &mut Value, labels: &Labels, replace: &mut Replace<'_>) {
    let Some(params) = crate::graph::accessor::get_mut(command, labels.parameters)
        .and_then(Value::as_array_mut)
    else {
        return;
    };
    let Some(choices) = params.first_mut().and_then(Value::as_array_mut) else {
        return;
    };
    for choice in choices {
        let Some(text) = choice.to_text().map(|c| c.into_owned()) else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        if let Some(translated) = replace(&text) {
            if let Some(replacement) = choice.with_text(&translated) {
                *choice = replacement;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Object;
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

    fn labels() -> Labels {
        Labels::for_engine(Engine::VxAce)
    }

    fn collect(list: &mut Vec<Value>) -> Vec<String> {
        let mut seen = Vec::new();
        let mut record = |text: &str| -> Option<String> {
            seen.push(text.to_string());
            None
        };
        walk_list(list, &labels(), &TextRules::default(), Engine::VxAce, &mut record).unwrap();
        seen
    }

    #[test]
    fn visits_runs_choices_and_branches() {
        let mut list = vec![
            command(401, vec![Value::Str("First".into())]),
            command(401, vec![Value::Str("second".into())]),
            command(
                102,
                vec![
                    Value::Array(vec![Value::Str("Yes".into()), Value::Str("No".into())]),
                    Value::Int(0),
                ],
            ),
            command(402, vec![Value::Int(0), Value::Str("Yes".into())]),
        ];
        assert_eq!(collect(&mut list), vec!["First\nsecond", "Yes", "No", "Yes"]);
    }

    #[test]
    fn plugin_commands_filtered_by_rules() {
        let mut list = vec![
            command(356, vec![Value::Str("GabText Hello".into())]),
            command(356, vec![Value::Str("choice_text 1 ????".into())]),
            command(356, vec![Value::Str("RefreshWindow".into())]),
        ];
        assert_eq!(collect(&mut list), vec!["GabText Hello"]);
    }

    #[test]
    fn comments_only_visited_for_json_engines() {
        let mut list = vec![
            command(108, vec![Value::Str("An aside for the player".into())]),
            command(356, vec![Value::Str("AlchemShow recipe".into())]),
        ];
        assert_eq!(collect(&mut list.clone()), Vec::<String>::new());

        let mut seen = Vec::new();
        let mut record = |text: &str| -> Option<String> {
            seen.push(text.to_string());
            None
        };
        walk_list(&mut list, &labels(), &TextRules::default(), Engine::Mv, &mut record).unwrap();
        assert_eq!(seen, vec!["An aside for the player", "AlchemShow recipe"]);
    }

    #[test]
    fn replacement_lands_in_the_graph() {
        let mut list = vec![
            command(401, vec![Value::Str("Hello".into())]),
            command(320, vec![Value::Int(1), Value::Str("Ralph".into())]),
        ];
        let mut translate = |text: &str| -> Option<String> {
            match text {
                "Hello" => Some("Bonjour".to_string()),
                _ => None,
            }
        };
        walk_list(&mut list, &labels(), &TextRules::default(), Engine::VxAce, &mut translate)
            .unwrap();

        assert_eq!(
            dialogue::parameter_text(&list[0], &labels(), 0).unwrap(),
            "Bonjour"
        );
        // No translation: passes through unchanged.
        assert_eq!(
            dialogue::parameter_text(&list[1], &labels(), 1).unwrap(),
            "Ralph"
        );
    }
}
