//! Command nodes and dialogue-run merging
//!
//! Dialogue boxes are authored as N consecutive single-line show-text
//! commands. Translating each line independently would pin line breaks
//! to the source language's sentence structure, so a maximal run of
//! consecutive show-text commands is treated as one logical multi-line
//! unit: the extraction path reads it as one joined string, and the
//! reinsertion path physically collapses the run into its first command
//! before substitution.

use std::borrow::Cow;

use crate::graph::{accessor, Labels, Value};

/// Event command opcodes with translatable parameters.
pub mod opcode {
    /// One line of a dialogue box; consecutive lines form a run.
    pub const SHOW_TEXT_LINE: i64 = 401;
    /// One line of scrolling text; merged like dialogue lines.
    pub const SCROLL_TEXT_LINE: i64 = 405;
    /// Choice list; parameter 0 is a sequence of choice strings.
    pub const SHOW_CHOICES: i64 = 102;
    /// Choice branch header; parameter 1 repeats the branch text.
    pub const CHOICE_BRANCH: i64 = 402;
    /// Change-name command; parameter 1 is the new name.
    pub const CHANGE_NAME: i64 = 320;
    /// Change-nickname command; parameter 1 is the new nickname.
    pub const CHANGE_NICKNAME: i64 = 324;
    /// Script/plugin call; parameter 0 is text only for allow-listed prefixes.
    pub const PLUGIN_COMMAND: i64 = 356;
    /// Editor comment; translatable in the JSON variant only.
    pub const COMMENT: i64 = 108;
}

/// Whether `code` is a dialogue-run member.
#[must_use]
pub fn is_dialogue_code(code: i64) -> bool {
    code == opcode::SHOW_TEXT_LINE || code == opcode::SCROLL_TEXT_LINE
}

/// The command's opcode, if it has one.
#[must_use]
pub fn command_code(command: &Value, labels: &Labels) -> Option<i64> {
    accessor::get(command, labels.code)?.as_int()
}

/// The command's parameter list.
#[must_use]
pub fn parameters<'a>(command: &'a Value, labels: &Labels) -> Option<&'a [Value]> {
    accessor::get(command, labels.parameters)?.as_array()
}

/// Decode parameter `index` as text.
#[must_use]
pub fn parameter_text<'a>(
    command: &'a Value,
    labels: &Labels,
    index: usize,
) -> Option<Cow<'a, str>> {
    parameters(command, labels)?.get(index)?.to_text()
}

/// Replace parameter `index` with `new`, preserving its representation
/// kind. No-op when the parameter is absent or not text.
pub fn set_parameter_text(command: &mut Value, labels: &Labels, index: usize, new: &str) {
    let Some(params) = accessor::get_mut(command, labels.parameters).and_then(Value::as_array_mut)
    else {
        return;
    };
    if let Some(slot) = params.get_mut(index) {
        if let Some(replacement) = slot.with_text(new) {
            *slot = replacement;
        }
    }
}

/// Collapse every dialogue run in `list` into its first command.
///
/// One pass, O(n). The surviving command's parameter 0 holds the run's
/// lines joined with `\n` in its original representation; the other run
/// commands are removed, preserving the order of everything else. A run
/// that reaches the end of the list is merged too (real command lists
/// end with a terminator command, so this only matters for synthetic
/// input).
pub fn merge_runs(list: &mut Vec<Value>, labels: &Labels) {
    let source = std::mem::take(list);
    let mut merged = Vec::with_capacity(source.len());
    let mut run_head: Option<Value> = None;
    let mut lines: Vec<String> = Vec::new();

    let flush = |merged: &mut Vec<Value>, run_head: &mut Option<Value>, lines: &mut Vec<String>| {
        if let Some(mut head) = run_head.take() {
            let joined = lines.join("\n");
            set_parameter_text(&mut head, labels, 0, &joined);
            merged.push(head);
            lines.clear();
        }
    };

    for command in source {
        if command_code(&command, labels).is_some_and(is_dialogue_code) {
            lines.push(
                parameter_text(&command, labels, 0)
                    .map(Cow::into_owned)
                    .unwrap_or_default(),
            );
            if run_head.is_none() {
                run_head = Some(command);
            }
        } else {
            flush(&mut merged, &mut run_head, &mut lines);
            merged.push(command);
        }
    }
    flush(&mut merged, &mut run_head, &mut lines);

    *list = merged;
}

/// Non-mutating run grouping for the extraction path.
///
/// Yields each dialogue run as one joined string, in list order, using
/// the same `\n` separator as [`merge_runs`] so extraction keys and
/// reinsertion keys always agree.
pub fn collect_runs(list: &[Value], labels: &Labels) -> Vec<String> {
    let mut runs = Vec::new();
    let mut lines: Vec<String> = Vec::new();

    for command in list {
        if command_code(command, labels).is_some_and(is_dialogue_code) {
            lines.push(
                parameter_text(command, labels, 0)
                    .map(Cow::into_owned)
                    .unwrap_or_default(),
            );
        } else if !lines.is_empty() {
            runs.push(lines.join("\n"));
            lines.clear();
        }
    }
    if !lines.is_empty() {
        runs.push(lines.join("\n"));
    }
    runs
}
