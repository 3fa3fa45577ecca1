use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::record::Spell;

pub const DEFAULT_OUTPUT: &str = "spells.db";

pub fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Append one JSON line per spell. Returns the number of records written.
pub fn write_spells<W: Write>(out: &mut W, spells: &[Spell]) -> Result<usize> {
    for spell in spells {
        let line = spell
            .to_json_line()
            .with_context(|| format!("Failed to serialise {}", spell.name))?;
        writeln!(out, "{}", line)?;
    }
    Ok(spells.len())
}
