//! Document segmenter
//!
//! Splits a scene document into the raw line blocks of the requested type
//! tags. A block opens on `--- !u!<tag> &<fileId>` and closes on the next line
//! starting with `--- `. The header line and the class-name line after it are
//! not part of the body.

use crate::ids::FileId;
use once_cell::sync::Lazy;
use regex::Regex;
use std::iter::Enumerate;
use std::str::Lines;

static HEADER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^--- !u!(\d+) &(-?\d+)").expect("valid header pattern"));

const DELIMITER: &str = "--- ";

/// Well-known type tags
pub mod tags {
    /// `GameObject`
    pub const GAME_OBJECT: &str = "1";
    /// `Transform`
    pub const TRANSFORM: &str = "4";
    /// `MonoBehaviour` (script component)
    pub const SCRIPT: &str = "114";
}

/// One object's lines, borrowed from the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock<'a> {
    /// Type tag from the header (`1`, `4`, `114`, ...)
    pub tag: &'a str,
    /// fileID from the header
    pub file_id: FileId,
    /// 1-based line number of the header
    pub header_line: usize,
    /// Body lines (header and class-name line excluded)
    pub lines: Vec<&'a str>,
    /// `false` when the block ran to end of file without a delimiter
    pub terminated: bool,
}

impl RawBlock<'_> {
    /// 1-based document line number of body line `index`
    #[inline]
    #[must_use]
    pub fn line_number(&self, index: usize) -> usize {
        self.header_line + 2 + index
    }
}

#[derive(Debug, Clone)]
struct OpenBlock<'a> {
    tag: &'a str,
    file_id: FileId,
    header_line: usize,
    skip_class_line: bool,
    lines: Vec<&'a str>,
}

impl<'a> OpenBlock<'a> {
    fn push(&mut self, line: &'a str) {
        if self.skip_class_line {
            self.skip_class_line = false;
        } else {
            self.lines.push(line);
        }
    }

    fn finish(self, terminated: bool) -> RawBlock<'a> {
        RawBlock {
            tag: self.tag,
            file_id: self.file_id,
            header_line: self.header_line,
            lines: self.lines,
            terminated,
        }
    }
}

/// Lazy block iterator over one document
///
/// Single pass; clone it before iterating to scan again from the start.
#[derive(Debug, Clone)]
pub struct Segmenter<'a> {
    lines: Enumerate<Lines<'a>>,
    tags: Vec<&'a str>,
    open: Option<OpenBlock<'a>>,
}

impl<'a> Segmenter<'a> {
    fn new(document: &'a str, tags: Vec<&'a str>) -> Self {
        Self {
            lines: document.lines().enumerate(),
            tags,
            open: None,
        }
    }

    fn opener(&self, line: &'a str, number: usize) -> Option<OpenBlock<'a>> {
        let caps = HEADER_PATTERN.captures(line)?;
        let tag = caps.get(1)?.as_str();
        let tag = *self.tags.iter().find(|wanted| **wanted == tag)?;
        Some(OpenBlock {
            tag,
            file_id: FileId::new(caps.get(2)?.as_str()),
            header_line: number,
            skip_class_line: true,
            lines: Vec::new(),
        })
    }
}

impl<'a> Iterator for Segmenter<'a> {
    type Item = RawBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some((index, line)) = self.lines.next() else {
                return self.open.take().map(|block| block.finish(false));
            };

            if line.starts_with(DELIMITER) {
                let flushed = self.open.take().map(|block| block.finish(true));
                self.open = self.opener(line, index + 1);
                if flushed.is_some() {
                    return flushed;
                }
                continue;
            }

            if let Some(block) = self.open.as_mut() {
                block.push(line);
            }
        }
    }
}

/// Blocks of a single tag
#[must_use]
pub fn segment<'a>(document: &'a str, tag: &'a str) -> Segmenter<'a> {
    Segmenter::new(document, vec![tag])
}

/// Blocks of any of `tags`, in document order, in one pass
#[must_use]
pub fn segment_many<'a>(document: &'a str, tags: &[&'a str]) -> Segmenter<'a> {
    Segmenter::new(document, tags.to_vec())
}
