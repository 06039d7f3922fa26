use std::fmt;
use std::path::PathBuf;

/// The kind of catalog record an [`DatError::IncompleteRecord`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Header,
    Game,
    Rom,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Header => "header",
            Self::Game => "game",
            Self::Rom => "rom",
        })
    }
}

/// Errors that can occur while parsing catalogs, hashing files or matching.
#[derive(Debug, thiserror::Error)]
pub enum DatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// The document is not a usable DAT: no header, or a numeric field that isn't.
    #[error("Malformed DAT file: {0}")]
    MalformedCatalog(String),

    /// A single record is missing a required field.
    #[error("Incomplete {kind} record '{name}': missing required field '{field}'")]
    IncompleteRecord {
        kind: RecordKind,
        /// Record name if it had one, `<unnamed>` otherwise
        name: String,
        field: &'static str,
    },

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    /// CRC32 and MD5 lookups point at different catalog entries.
    #[error(
        "Inconsistent match for crc {crc32} / md5 {md5}: crc matches [{}], md5 matches [{}]",
        by_crc.join(", "),
        by_md5.join(", ")
    )]
    InconsistentMatch {
        crc32: String,
        md5: String,
        by_crc: Vec<String>,
        by_md5: Vec<String>,
    },

    #[error("Operation cancelled")]
    Cancelled,
}

impl DatError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedCatalog(msg.into())
    }

    pub fn incomplete(kind: RecordKind, name: &str, field: &'static str) -> Self {
        let name = if name.is_empty() { "<unnamed>" } else { name };
        Self::IncompleteRecord {
            kind,
            name: name.to_string(),
            field,
        }
    }

    /// Whether this error only affects a single record, so parsing can go on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::IncompleteRecord {
                kind: RecordKind::Game | RecordKind::Rom,
                ..
            }
        )
    }
}
