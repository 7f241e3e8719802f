//! Per-engine field naming
//!
//! The same logical field is spelled differently per representation:
//! marshal objects use `@snake_case` instance variables while JSON files
//! use `camelCase` members. `Labels` enumerates the closed set of field
//! names the pipeline touches, so walkers never probe arbitrary names.

use crate::project::Engine;

/// Resolved field names for one engine generation.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub code: &'static str,
    pub parameters: &'static str,
    pub events: &'static str,
    pub pages: &'static str,
    pub list: &'static str,
    pub display_name: &'static str,
    pub name: &'static str,
    pub nickname: &'static str,
    pub description: &'static str,
    pub note: &'static str,
    pub skill_types: &'static str,
    pub weapon_types: &'static str,
    pub armor_types: &'static str,
    pub equip_types: &'static str,
    pub elements: &'static str,
    pub currency_unit: &'static str,
    pub terms: &'static str,
    pub game_title: &'static str,
}

impl Labels {
    /// Field names for the given engine generation.
    #[must_use]
    pub fn for_engine(engine: Engine) -> Self {
        if engine.is_json() {
            Self {
                code: "code",
                parameters: "parameters",
                events: "events",
                pages: "pages",
                list: "list",
                display_name: "displayName",
                name: "name",
                nickname: "nickname",
                description: "description",
                note: "note",
                skill_types: "skillTypes",
                weapon_types: "weaponTypes",
                armor_types: "armorTypes",
                equip_types: "equipTypes",
                elements: "elements",
                currency_unit: "currencyUnit",
                terms: "terms",
                game_title: "gameTitle",
            }
        } else {
            Self {
                code: "code",
                parameters: "parameters",
                events: "events",
                pages: "pages",
                list: "list",
                display_name: "display_name",
                name: "name",
                nickname: "nickname",
                description: "description",
                note: "note",
                skill_types: "skill_types",
                weapon_types: "weapon_types",
                armor_types: "armor_types",
                equip_types: "equip_types",
                elements: "elements",
                currency_unit: "currency_unit",
                // XP calls its vocabulary table "words"; later engines "terms".
                terms: if engine == Engine::Xp { "words" } else { "terms" },
                game_title: "game_title",
            }
        }
    }
}
