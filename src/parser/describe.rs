use crate::error::ParseError;
use crate::markup::MarkupNode;
use crate::record::{SaveCategory, SpellData};

use super::normalize::{promote_first_row_to_header, strip_attributes};
use super::{SUB_HEADING, TABLE};

const DURATION_LABEL: &str = "Durada:\u{a0}";
const RANGE_LABEL: &str = "Abast:\u{a0}";

const GLYPH: char = '⦿';
const GLYPH_SPAN: &str = "<span style='color:#4a86e8'>⦿</span> ";

/// Wrapper tags the table renderer leaves inside cells.
const TABLE_WRAPPERS: &[&str] = &["<span>", "</span>", "<p>", "</p>"];

/// Checked in order; first hit wins.
const SAVE_PHRASES: &[(&str, SaveCategory)] = &[
    ("tirada de salvació contra encanteris", SaveCategory::Spell),
    ("tirada de salvació contra mort", SaveCategory::Death),
    ("tirada de salvació contra paràlisi", SaveCategory::Paralysis),
];

/// Build the data block of a spell from everything after its title:
/// the metadata line first, then the description body.
pub fn build_spell_data(
    group: &[MarkupNode],
    level: u32,
    class_name: &str,
) -> Result<SpellData, ParseError> {
    let (meta, body) = group.split_first().ok_or(ParseError::MissingMetadata)?;
    let (duration, range) = split_metadata(&meta.plain_text())?;
    let description = compose_description(body)?;
    let save = detect_save(&description);

    Ok(SpellData {
        lvl: level,
        class: class_name.to_string(),
        duration,
        range,
        description,
        memorized: 0,
        cast: 0,
        save,
    })
}

/// `Durada: X.Abast: Y.` → (`X`, `Y`). Content is not validated.
fn split_metadata(line: &str) -> Result<(String, String), ParseError> {
    let mut parts = line.split('.');
    match (parts.next(), parts.next()) {
        (Some(duration), Some(range)) => Ok((
            duration.replace(DURATION_LABEL, ""),
            range.replace(RANGE_LABEL, ""),
        )),
        _ => Err(ParseError::MalformedMetadata {
            line: line.to_string(),
        }),
    }
}

/// Render the description body to an HTML fragment, in node order.
pub fn compose_description(nodes: &[MarkupNode]) -> Result<String, ParseError> {
    nodes.iter().map(describe_node).collect()
}

fn describe_node(node: &MarkupNode) -> Result<String, ParseError> {
    let fragment = match node.tag() {
        Some(TABLE) => {
            let mut table = node.clone();
            let mut html = promote_first_row_to_header(strip_attributes(&mut table))?.render();
            for wrapper in TABLE_WRAPPERS {
                html = html.replace(wrapper, "");
            }
            html
        }
        Some(SUB_HEADING) => {
            let text = node.plain_text();
            let text = text.trim();
            if text.is_empty() {
                String::new()
            } else {
                format!("<h3>{}</h3>\n", text)
            }
        }
        _ => {
            let text = node.plain_text().replace(GLYPH, GLYPH_SPAN);
            let text = text.trim();
            if text.is_empty() {
                String::new()
            } else {
                format!("<p>{}</p>\n", text)
            }
        }
    };
    Ok(fragment)
}

pub fn detect_save(description: &str) -> SaveCategory {
    SAVE_PHRASES
        .iter()
        .find(|(phrase, _)| description.contains(phrase))
        .map_or(SaveCategory::None, |&(_, category)| category)
}
