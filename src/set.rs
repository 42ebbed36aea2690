//! Provides the `LineSet` structure, initialized from the contents of the
//! file being deduplicated.
use anyhow::Result;
use bstr::ByteSlice;
use fxhash::FxBuildHasher;
use indexmap::IndexSet;
use log::trace;
use memchr::memchr2;
use std::io;

/// A line record borrowed from the file's buffer, without its terminator.
/// `\n`, `\r\n` and a lone `\r` all end a line, and all count as the same
/// terminator. A final line with no terminator at all is a different record
/// from the same text with one.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub enum Line<'data> {
    /// A line ended by `\n`, `\r\n` or `\r`
    Terminated(&'data [u8]),
    /// The non-empty remainder at the very end of the input
    Unterminated(&'data [u8]),
}

impl<'data> Line<'data> {
    /// The line's text, without any terminator
    #[must_use]
    pub fn text(self) -> &'data [u8] {
        match self {
            Line::Terminated(text) | Line::Unterminated(text) => text,
        }
    }
}

/// A `LineSet` is a set of line records, each borrowed from the file's buffer.
/// * Records are kept in the order of their first occurrence. `IndexSet`'s
///   `insert` leaves an existing key where it is, so later duplicates don't
///   move anything.
/// * Every terminated record is written back with `\n`, whatever terminator
///   it was read with.
/// * An `Unterminated` record can only come at the very end of the input, so
///   it also ends up last in the set, and writing the set back never glues two
///   records together.
pub struct LineSet<'data> {
    set: SliceSet<'data>,
    lines_read: usize,
}
type SliceSet<'data> = IndexSet<Line<'data>, FxBuildHasher>;

/// Returns an iterator over the line records of `slice`
#[must_use]
pub fn lines_of(slice: &[u8]) -> Lines<'_> {
    Lines { rest: slice }
}

/// The iterator returned by `lines_of`
pub struct Lines<'data> {
    rest: &'data [u8],
}

impl<'data> Iterator for Lines<'data> {
    type Item = Line<'data>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let Some(end) = memchr2(b'\n', b'\r', self.rest) else {
            return Some(Line::Unterminated(std::mem::take(&mut self.rest)));
        };
        let (text, rest) = self.rest.split_at(end);
        let terminator_len = if rest.starts_with(b"\r\n") { 2 } else { 1 };
        self.rest = &rest[terminator_len..];
        Some(Line::Terminated(text))
    }
}

impl<'data> LineSet<'data> {
    /// Creates a new `LineSet`, with each member a line borrowed from `slice`
    #[must_use]
    pub fn from_slice(slice: &'data [u8]) -> Self {
        let mut lines = LineSet { set: SliceSet::default(), lines_read: 0 };
        for line in lines_of(slice) {
            lines.insert(line);
        }
        lines
    }

    /// Insert `line`, returning `false` if it was already present
    pub fn insert(&mut self, line: Line<'data>) -> bool {
        self.lines_read += 1;
        let inserted = self.set.insert(line);
        if !inserted {
            trace!("duplicate line: {:?}", line.text().as_bstr());
        }
        inserted
    }

    /// The number of unique line records
    #[must_use]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Does the set have no lines at all?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// The number of line records inserted, duplicates included
    #[must_use]
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// The unique line records, in order of first occurrence
    pub fn iter(&self) -> impl Iterator<Item = Line<'data>> + '_ {
        self.set.iter().copied()
    }

    /// Output the `LineSet`'s records, each terminated line ending in `\n`
    pub fn output_to(&self, mut out: impl io::Write) -> Result<()> {
        for line in self.set.iter() {
            out.write_all(line.text())?;
            if let Line::Terminated(_) = line {
                out.write_all(b"\n")?;
            }
        }
        out.flush()?;
        Ok(())
    }
}
