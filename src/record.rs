use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;

use crate::error::ParseError;
use crate::markup::MarkupNode;
use crate::parser::describe::build_spell_data;

pub const RECORD_TYPE: &str = "spell";
pub const SPELL_IMG: &str = "systems/ose/assets/default/spell.png";
const ID_LEN: usize = 16;

/// Which saving throw a spell's description refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SaveCategory {
    #[serde(rename = "")]
    None,
    #[serde(rename = "spell")]
    Spell,
    #[serde(rename = "dead")]
    Death,
    #[serde(rename = "paralysis")]
    Paralysis,
}

impl SaveCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveCategory::None => "",
            SaveCategory::Spell => "spell",
            SaveCategory::Death => "dead",
            SaveCategory::Paralysis => "paralysis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Permission {
    pub default: u8,
    #[serde(rename = "fBZINKCGziZzc3CU")]
    pub owner: u8,
}

impl Permission {
    pub const DEFAULT: Permission = Permission {
        default: 0,
        owner: 3,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpellData {
    pub lvl: u32,
    pub class: String,
    pub duration: String,
    pub range: String,
    pub description: String,
    pub memorized: u32,
    pub cast: u32,
    pub save: SaveCategory,
}

/// One output record. Field order here is the key order on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct Spell {
    pub name: String,
    pub permission: Permission,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: SpellData,
    pub img: &'static str,
    #[serde(rename = "_id")]
    pub id: String,
}

impl Spell {
    /// Build a spell from its node group; element 0 is the title heading,
    /// element 1 the metadata line, the rest the description body.
    pub fn build(
        group: &[MarkupNode],
        level: u32,
        seq: usize,
        class_name: &str,
    ) -> Result<Spell, ParseError> {
        let (title_node, rest) = group.split_first().ok_or(ParseError::MissingTitle)?;
        let title = title_node.plain_text();
        let title = title.trim();
        let data = build_spell_data(rest, level, class_name)
            .map_err(|e| ParseError::in_spell(title, e))?;

        Ok(Spell {
            name: display_name(class_name, level, seq, title),
            permission: Permission::DEFAULT,
            kind: RECORD_TYPE,
            data,
            img: SPELL_IMG,
            id: generate_id(),
        })
    }

    /// Single-line JSON, non-ASCII left unescaped.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// `{ClassInitial}{level}.{seq:02} {title}`, e.g. `M1.01 Llum`.
pub fn display_name(class_name: &str, level: u32, seq: usize, title: &str) -> String {
    let initial = class_name.chars().next().map(String::from).unwrap_or_default();
    format!("{}{}.{:02} {}", initial, level, seq, title)
}

/// 16 random ASCII letters/digits. Collisions are not checked.
pub fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}
