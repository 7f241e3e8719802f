//! What counts as translatable text
//!
//! Most string fields in a game database are player-visible, but some
//! hold author-side markup: internal identifiers, placeholder rows,
//! scripting calls. These rules centralize the filters so every walker
//! applies the same judgment, and they are plain data so a project with
//! different conventions can swap its own table in.

/// A plugin-command prefix whose argument text is player-visible.
#[derive(Debug, Clone)]
pub struct CommandRule {
    /// Command prefix, matched against the start of parameter 0.
    pub prefix: &'static str,
    /// When set, commands whose text ends with this suffix are skipped.
    pub exclude_suffix: Option<&'static str>,
}

/// Filters for deciding which strings enter a corpus.
#[derive(Debug, Clone)]
pub struct TextRules {
    /// Plugin-command prefixes with translatable arguments.
    pub command_rules: Vec<CommandRule>,
    /// Extra command prefixes honored in the JSON generation only.
    pub json_command_prefixes: Vec<&'static str>,
    /// Plugin names whose parameter strings are extracted.
    pub plugin_allow: Vec<&'static str>,
    /// Known internal tokens denied in entity text fields.
    pub entity_ignore_tokens: Vec<&'static str>,
    /// Prefixes that rescue an entity string from the deny heuristic.
    pub entity_allow_prefixes: Vec<&'static str>,
    /// Suffixes that rescue an entity string from the deny heuristic.
    pub entity_allow_suffixes: Vec<&'static str>,
}

impl Default for TextRules {
    fn default() -> Self {
        Self {
            command_rules: vec![
                CommandRule {
                    prefix: "GabText",
                    exclude_suffix: None,
                },
                CommandRule {
                    prefix: "choice_text",
                    exclude_suffix: Some("????"),
                },
            ],
            json_command_prefixes: vec!["Alchem"],
            plugin_allow: vec![
                "YEP_BattleEngineCore",
                "YEP_OptionsCore",
                "SRD_NameInputUpgrade",
                "YEP_KeyboardConfig",
                "YEP_ItemCore",
                "YEP_X_ItemDiscard",
                "YEP_EquipCore",
                "YEP_ItemSynthesis",
                "ARP_CommandIcons",
                "YEP_X_ItemCategories",
                "Olivia_OctoBattle",
            ],
            entity_ignore_tokens: vec!["EV", "TODO"],
            entity_allow_prefixes: Vec::new(),
            entity_allow_suffixes: Vec::new(),
        }
    }
}

impl TextRules {
    /// Whether a 356 plugin-command string is translatable.
    ///
    /// The JSON generation honors additional prefixes on top of the
    /// shared rule table.
    #[must_use]
    pub fn command_is_translatable(&self, text: &str, json: bool) -> bool {
        let matched = self.command_rules.iter().any(|rule| {
            text.starts_with(rule.prefix)
                && rule
                    .exclude_suffix
                    .is_none_or(|suffix| !text.trim_end().ends_with(suffix))
        });
        matched
            || (json
                && self
                    .json_command_prefixes
                    .iter()
                    .any(|prefix| text.starts_with(prefix)))
    }

    /// Whether a plugin's parameters should be extracted.
    #[must_use]
    pub fn plugin_is_allowed(&self, name: &str) -> bool {
        self.plugin_allow.contains(&name)
    }

    /// Whether an entity text field holds player-visible prose.
    ///
    /// Denies author-side markers: ALL-CAPS identifiers, underscore
    /// tokens, `---`-style separator rows, and the explicit ignore
    /// list. The allow lists override the heuristic for strings a
    /// project knows to be real despite looking like markers.
    #[must_use]
    pub fn entity_text_is_translatable(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        if self
            .entity_allow_prefixes
            .iter()
            .any(|prefix| trimmed.starts_with(prefix))
            || self
                .entity_allow_suffixes
                .iter()
                .any(|suffix| trimmed.ends_with(suffix))
        {
            return true;
        }
        if trimmed.contains("---") || trimmed.contains('_') {
            return false;
        }
        if self.entity_ignore_tokens.contains(&trimmed) {
            return false;
        }
        let mut alphabetic = trimmed.chars().filter(|c| c.is_alphabetic()).peekable();
        if alphabetic.peek().is_some() && alphabetic.all(char::is_uppercase) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_rules_match_prefix_and_suffix() {
        let rules = TextRules::default();
        assert!(rules.command_is_translatable("GabText Hello there", false));
        assert!(rules.command_is_translatable("choice_text 1 Buy a sword", false));
        assert!(!rules.command_is_translatable("choice_text 1 ????", false));
        assert!(!rules.command_is_translatable("SomeOtherCommand arg", false));
    }

    #[test]
    fn json_prefixes_only_apply_to_the_json_generation() {
        let rules = TextRules::default();
        assert!(rules.command_is_translatable("AlchemShow recipe", true));
        assert!(!rules.command_is_translatable("AlchemShow recipe", false));
    }

    #[test]
    fn entity_heuristic_denies_markers() {
        let rules = TextRules::default();
        assert!(!rules.entity_text_is_translatable("DO_NOT_TRANSLATE"));
        assert!(!rules.entity_text_is_translatable("--- weapons ---"));
        assert!(!rules.entity_text_is_translatable("PLACEHOLDER"));
        assert!(!rules.entity_text_is_translatable("   "));
        assert!(!rules.entity_text_is_translatable("EV"));
        assert!(rules.entity_text_is_translatable("Iron Sword"));
        assert!(rules.entity_text_is_translatable("A fine blade."));
        assert!(rules.entity_text_is_translatable("50"));
    }

    #[test]
    fn allow_lists_override_the_heuristic() {
        let rules = TextRules {
            entity_allow_prefixes: vec!["HP"],
            ..TextRules::default()
        };
        assert!(rules.entity_text_is_translatable("HP DRAIN"));
        assert!(!rules.entity_text_is_translatable("MP DRAIN"));
    }

    #[test]
    fn plugin_allow_list() {
        let rules = TextRules::default();
        assert!(rules.plugin_is_allowed("YEP_ItemCore"));
        assert!(!rules.plugin_is_allowed("SomeRandomPlugin"));
    }
}
