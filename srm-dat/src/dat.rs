//! Streaming parser for Logiqx-style XML DAT files.
//!
//! [`Datafile`] reads a document up to its `<header>`, then hands out a lazy
//! [`Games`] iterator that materializes one game at a time. Only the current
//! game's element tree is held in memory, so large No-Intro/Redump/MAME
//! listings can be processed without building a full DOM.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::DatError;
use crate::fields::Element;
use crate::model::{Catalog, Game, Header};

/// Element names that hold a game record. MAME listings use `machine`.
const GAME_TAGS: &[&str] = &["game", "machine"];

/// Deepest element nesting accepted below the root. Real DATs use three or four.
const MAX_DEPTH: usize = 64;

fn is_game_tag(tag: &str) -> bool {
    GAME_TAGS.contains(&tag)
}

/// One XML event, with everything borrowed from the read buffer copied out.
enum Node {
    Open {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Leaf {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Close,
    Eof,
    Skip,
}

struct XmlCursor<R> {
    xml: Reader<R>,
    buf: Vec<u8>,
}

impl<R: BufRead> XmlCursor<R> {
    fn new(reader: R) -> Self {
        let mut xml = Reader::from_reader(reader);
        xml.config_mut().trim_text(true);
        Self {
            xml,
            buf: Vec::new(),
        }
    }

    /// Text is decoded with the encoding the document declares, UTF-8 if none.
    fn next_node(&mut self) -> Result<Node, DatError> {
        self.buf.clear();
        let decoder = self.xml.decoder();
        let node = match self.xml.read_event_into(&mut self.buf)? {
            Event::Start(ref e) => Node::Open {
                tag: tag_name(e, decoder)?,
                attrs: read_attributes(e, decoder)?,
            },
            Event::Empty(ref e) => Node::Leaf {
                tag: tag_name(e, decoder)?,
                attrs: read_attributes(e, decoder)?,
            },
            Event::Text(ref e) => Node::Text(e.unescape()?.into_owned()),
            Event::CData(ref e) => {
                Node::Text(e.decode().map_err(quick_xml::Error::from)?.into_owned())
            }
            Event::End(_) => Node::Close,
            Event::Eof => Node::Eof,
            _ => Node::Skip,
        };
        Ok(node)
    }

    /// Read the remainder of an element whose start tag was just consumed.
    fn read_element(
        &mut self,
        tag: String,
        attrs: Vec<(String, String)>,
    ) -> Result<Element, DatError> {
        self.read_nested(tag, attrs, 1)
    }

    fn read_nested(
        &mut self,
        tag: String,
        attrs: Vec<(String, String)>,
        depth: usize,
    ) -> Result<Element, DatError> {
        if depth > MAX_DEPTH {
            return Err(DatError::malformed(format!(
                "Elements nested more than {MAX_DEPTH} deep at <{tag}>"
            )));
        }
        let mut element = Element::leaf(tag, attrs);
        loop {
            match self.next_node()? {
                Node::Open { tag, attrs } => {
                    let child = self.read_nested(tag, attrs, depth + 1)?;
                    element.children.push(child);
                }
                Node::Leaf { tag, attrs } => element.children.push(Element::leaf(tag, attrs)),
                Node::Text(text) => element.text.push_str(&text),
                Node::Close => return Ok(element),
                Node::Eof => {
                    return Err(DatError::malformed(format!(
                        "Unexpected end of document inside <{}>",
                        element.tag
                    )));
                }
                Node::Skip => {}
            }
        }
    }
}

fn tag_name(e: &BytesStart<'_>, decoder: Decoder) -> Result<String, DatError> {
    let qname = e.name();
    let name = decoder
        .decode(qname.as_ref())
        .map_err(quick_xml::Error::from)?;
    Ok(name.into_owned())
}

fn read_attributes(
    e: &BytesStart<'_>,
    decoder: Decoder,
) -> Result<Vec<(String, String)>, DatError> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = decoder
            .decode(attr.key.as_ref())
            .map_err(quick_xml::Error::from)?
            .into_owned();
        let value = attr.decode_and_unescape_value(decoder)?.into_owned();
        attrs.push((key, value));
    }
    Ok(attrs)
}

/// An opened DAT document whose header has been read.
pub struct Datafile<R> {
    header: Header,
    cursor: XmlCursor<R>,
    /// Game elements read while looking for the header
    early: VecDeque<Element>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Datafile<BufReader<File>> {
    /// Open a DAT file from a path and read its header.
    pub fn open(path: &Path) -> Result<Self, DatError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: BufRead> Datafile<R> {
    /// Read a DAT document up to and including its `<header>`.
    ///
    /// The header must be a direct child of the root element. Games that come
    /// before it are held back and yielded first by [`games`](Self::games). A
    /// document without a header is rejected with [`DatError::MalformedCatalog`];
    /// a header missing a required field fails with
    /// [`DatError::IncompleteRecord`]. Both are fatal.
    pub fn from_reader(reader: R) -> Result<Self, DatError> {
        let mut cursor = XmlCursor::new(reader);
        let mut early = VecDeque::new();

        loop {
            match cursor.next_node()? {
                Node::Open { tag, .. } => {
                    log::debug!("DAT root element <{tag}>");
                    break;
                }
                Node::Leaf { .. } | Node::Eof => {
                    return Err(DatError::malformed("DAT file does not contain a header"));
                }
                Node::Text(_) | Node::Close | Node::Skip => {}
            }
        }

        let header = loop {
            match cursor.next_node()? {
                Node::Open { tag, attrs } if tag == "header" => {
                    let element = cursor.read_element(tag, attrs)?;
                    break Header::from_element(&element)?;
                }
                Node::Leaf { tag, attrs } if tag == "header" => {
                    break Header::from_element(&Element::leaf(tag, attrs))?;
                }
                Node::Open { tag, attrs } if is_game_tag(&tag) => {
                    early.push_back(cursor.read_element(tag, attrs)?);
                }
                Node::Leaf { tag, attrs } if is_game_tag(&tag) => {
                    early.push_back(Element::leaf(tag, attrs));
                }
                Node::Open { tag, attrs } => {
                    cursor.read_element(tag, attrs)?;
                }
                Node::Close | Node::Eof => {
                    return Err(DatError::malformed("DAT file does not contain a header"));
                }
                Node::Leaf { .. } | Node::Text(_) | Node::Skip => {}
            }
        };

        log::debug!("Read DAT header '{}' version {}", header.name, header.version);
        if !early.is_empty() {
            log::debug!("{} games came before the header", early.len());
        }
        Ok(Self {
            header,
            cursor,
            early,
            cancel: None,
        })
    }

    /// Stop yielding games once `cancel` is set. Checked once per game.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Consume the document as a lazy, single-pass sequence of games.
    pub fn games(self) -> Games<R> {
        Games {
            header: self.header,
            cursor: self.cursor,
            early: self.early,
            cancel: self.cancel,
            pending: VecDeque::new(),
            done: false,
        }
    }
}

/// Lazy iterator over the games of a [`Datafile`].
///
/// Yields `Err(DatError::IncompleteRecord)` in place of each skipped game or
/// dropped ROM and keeps going. Any other error is yielded once and ends the
/// sequence. Re-open the source to iterate again.
pub struct Games<R> {
    header: Header,
    cursor: XmlCursor<R>,
    early: VecDeque<Element>,
    cancel: Option<Arc<AtomicBool>>,
    pending: VecDeque<Result<Game, DatError>>,
    done: bool,
}

impl<R: BufRead> Games<R> {
    pub fn header(&self) -> &Header {
        &self.header
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|c| c.load(Ordering::Relaxed))
    }

    /// Advance to the next game element among the root's children.
    /// `None` once the root element closes.
    fn next_game_element(&mut self) -> Result<Option<Element>, DatError> {
        if let Some(element) = self.early.pop_front() {
            return Ok(Some(element));
        }
        loop {
            match self.cursor.next_node()? {
                Node::Open { tag, attrs } if is_game_tag(&tag) => {
                    return self.cursor.read_element(tag, attrs).map(Some);
                }
                Node::Leaf { tag, attrs } if is_game_tag(&tag) => {
                    return Ok(Some(Element::leaf(tag, attrs)));
                }
                Node::Open { tag, attrs } => {
                    self.cursor.read_element(tag, attrs)?;
                }
                Node::Close | Node::Eof => return Ok(None),
                Node::Leaf { .. } | Node::Text(_) | Node::Skip => {}
            }
        }
    }

    fn fail(&mut self, err: DatError) -> Option<Result<Game, DatError>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<R: BufRead> Iterator for Games<R> {
    type Item = Result<Game, DatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(item) = self.pending.pop_front() {
            return Some(item);
        }
        if self.done {
            return None;
        }
        if self.is_cancelled() {
            return self.fail(DatError::Cancelled);
        }

        let element = match self.next_game_element() {
            Ok(Some(element)) => element,
            Ok(None) => {
                self.done = true;
                return None;
            }
            Err(e) => return self.fail(e),
        };

        match Game::from_element(&element) {
            Ok((game, problems)) => {
                self.pending.extend(problems.into_iter().map(Err));
                self.pending.push_back(Ok(game));
                self.pending.pop_front()
            }
            Err(e) if e.is_recoverable() => {
                log::warn!("Skipping game: {e}");
                Some(Err(e))
            }
            Err(e) => self.fail(e),
        }
    }
}

impl Catalog {
    /// Parse a DAT file and collect all of its games.
    pub fn load(path: &Path) -> Result<Self, DatError> {
        Self::from_datafile(Datafile::open(path)?)
    }

    /// Parse a DAT document from a reader and collect all of its games.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, DatError> {
        Self::from_datafile(Datafile::from_reader(reader)?)
    }

    /// Drain a datafile's games. Skipped records end up in `problems`.
    pub fn from_datafile<R: BufRead>(datafile: Datafile<R>) -> Result<Self, DatError> {
        let header = datafile.header().clone();
        let mut games = Vec::new();
        let mut problems = Vec::new();

        for item in datafile.games() {
            match item {
                Ok(game) => games.push(game),
                Err(e) if e.is_recoverable() => problems.push(e),
                Err(e) => return Err(e),
            }
        }

        log::debug!(
            "Loaded {} games from '{}' ({} skipped records)",
            games.len(),
            header.name,
            problems.len()
        );
        Ok(Self {
            header,
            games,
            problems,
        })
    }
}

#[cfg(test)]
#[path = "tests/dat_tests.rs"]
mod tests;
