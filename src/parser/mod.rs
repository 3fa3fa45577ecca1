pub mod describe;
pub mod normalize;
pub mod segment;

use tracing::debug;

use crate::error::ParseError;
use crate::markup::MarkupNode;
use crate::record::Spell;
use segment::segment;

pub const LEVEL_HEADING: &str = "h2";
pub const SPELL_HEADING: &str = "h3";
pub const SUB_HEADING: &str = "h4";
pub const TABLE: &str = "table";
pub const ROW: &str = "tr";
pub const CELL: &str = "td";
pub const HEADER_CELL: &str = "th";

/// Two-level pipeline: document → level groups → spell groups → records.
///
/// Documents with an `<h2>` are split into levels, numbered by the order of
/// their headings; anything before the first heading is level 0 and is not
/// emitted. Documents without one are read from the first `<table>` onwards
/// and every spell is level 0.
pub fn process_document(document: &MarkupNode, class_name: &str) -> Result<Vec<Spell>, ParseError> {
    if let Some((parent, _)) = document.locate(LEVEL_HEADING) {
        let siblings: Vec<MarkupNode> = parent.element_children().cloned().collect();
        return process_levels(&siblings, class_name);
    }

    let (parent, idx) = document.locate(TABLE).ok_or(ParseError::NoContent)?;
    debug!(class = class_name, "no level headings, reading spells after first table");
    let following: Vec<MarkupNode> = parent.children[idx + 1..]
        .iter()
        .filter(|n| n.is_element())
        .cloned()
        .collect();
    generate_spells(&following, 0, class_name)
}

fn process_levels(nodes: &[MarkupNode], class_name: &str) -> Result<Vec<Spell>, ParseError> {
    let mut spells = Vec::new();
    let mut level = 0;
    for group in segment(nodes, LEVEL_HEADING) {
        let Some((heading, body)) = group.split_first() else {
            continue;
        };
        if !heading.is_tag(LEVEL_HEADING) {
            debug!(class = class_name, nodes = group.len(), "skipping content before first level heading");
            continue;
        }
        level += 1;
        spells.extend(generate_spells(body, level, class_name)?);
    }
    Ok(spells)
}

/// One spell per `<h3>` group, numbered from 1 within the level.
fn generate_spells(nodes: &[MarkupNode], level: u32, class_name: &str) -> Result<Vec<Spell>, ParseError> {
    segment(nodes, SPELL_HEADING)
        .enumerate()
        .map(|(i, group)| {
            let spell = Spell::build(group, level, i + 1, class_name)?;
            debug!(name = %spell.name, save = ?spell.data.save, "built spell");
            Ok(spell)
        })
        .collect()
}

// ── Tests ──
