use thiserror::Error;

/// Structural failures while turning a spell document into records.
/// All of them are fatal for the document being processed.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed metadata line {line:?}: expected duration and range separated by '.'")]
    MalformedMetadata { line: String },

    #[error("empty spell group: expected a title heading")]
    MissingTitle,

    #[error("spell has a title but no metadata line")]
    MissingMetadata,

    #[error("table has no <tr> row to promote to a header")]
    MissingRow,

    #[error("document has neither a level heading (<h2>) nor a table")]
    NoContent,

    #[error("in spell {title:?}")]
    Spell {
        title: String,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    pub fn in_spell(title: &str, source: ParseError) -> Self {
        ParseError::Spell {
            title: title.to_string(),
            source: Box::new(source),
        }
    }
}
