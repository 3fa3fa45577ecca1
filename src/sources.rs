use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::markup::MarkupNode;
use crate::parser;
use crate::record::Spell;

/// Input documents and the class each one describes, in output order.
pub const SOURCES: &[Source] = &[
    Source { file: "beb_spell1.html", class: "Cleric" },
    Source { file: "beb_spell2.html", class: "Druid" },
    Source { file: "beb_spell3.html", class: "Illusionist" },
    Source { file: "beb_spell4.html", class: "Magic-User" },
];

#[derive(Debug, Clone, Copy)]
pub struct Source {
    pub file: &'static str,
    pub class: &'static str,
}

impl Source {
    pub fn path(&self, dir: &Path) -> PathBuf {
        dir.join(self.file)
    }
}

/// Read, parse and convert one document.
pub fn load(dir: &Path, source: &Source) -> Result<Vec<Spell>> {
    let path = source.path(dir);
    info!(file = %path.display(), class = source.class, "Reading document");
    let html = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document = MarkupNode::parse_document(&html);
    let spells = parser::process_document(&document, source.class)
        .with_context(|| format!("Failed to convert {} ({})", path.display(), source.class))?;
    info!(class = source.class, spells = spells.len(), levels = count_levels(&spells), "Converted document");
    Ok(spells)
}

fn count_levels(spells: &[Spell]) -> usize {
    let mut levels: Vec<u32> = spells.iter().map(|s| s.data.lvl).collect();
    levels.dedup();
    levels.len()
}
