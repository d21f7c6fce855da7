use std::io::{self, BufRead, BufReader, Read, Seek};

/// A seekable read head over program source.
///
/// The interpreter never tokenizes its input: every instruction, loop jump
/// and comment skip is resolved by moving one of these back and forth over
/// the raw bytes. Implementors only supply `peek`, `offset` and `seek`; the
/// relative movements are derived from those.
pub trait Cursor {
    /// The byte under the cursor, or `None` at (or past) end of source.
    /// Never consumes.
    fn peek(&mut self) -> io::Result<Option<u8>>;

    /// Current byte offset from the start of the source.
    fn offset(&self) -> usize;

    /// Place the cursor at an absolute offset. Offsets past the end are
    /// allowed and read as end of source.
    fn seek(&mut self, offset: usize);

    fn advance(&mut self, n: usize) {
        let target = self.offset().saturating_add(n);
        self.seek(target);
    }

    /// Move back `n` bytes. Returns false, leaving the cursor where it was,
    /// if that would pass the start of the source.
    fn retreat(&mut self, n: usize) -> bool {
        match self.offset().checked_sub(n) {
            Some(target) => {
                self.seek(target);
                true
            }
            None => false,
        }
    }

    fn reset(&mut self) {
        self.seek(0);
    }
}

/// Cursor over source that is already in memory.
#[derive(Debug, Clone)]
pub struct SliceCursor<'a> {
    source: &'a [u8],
    offset: usize,
}

impl<'a> SliceCursor<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self { source, offset: 0 }
    }
}

impl Cursor for SliceCursor<'_> {
    #[inline(always)]
    fn peek(&mut self) -> io::Result<Option<u8>> {
        Ok(self.source.get(self.offset).copied())
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn seek(&mut self, offset: usize) {
        self.offset = offset;
    }
}

/// Cursor that reads source straight from a seekable stream such as a file.
///
/// Moves are lazy: only the logical offset changes until the next `peek`,
/// which repositions the underlying reader relative to where it last was so
/// that short hops stay inside the `BufReader`'s buffer.
pub struct StreamCursor<R> {
    reader: BufReader<R>,
    offset: usize,
    /// Offset the reader is actually positioned at.
    position: usize,
}

impl<R: Read + Seek> StreamCursor<R> {
    pub fn new(inner: R) -> io::Result<Self> {
        let mut reader = BufReader::new(inner);
        reader.rewind()?;
        Ok(Self {
            reader,
            offset: 0,
            position: 0,
        })
    }
}

impl<R: Read + Seek> Cursor for StreamCursor<R> {
    fn peek(&mut self) -> io::Result<Option<u8>> {
        if self.offset != self.position {
            let delta = self.offset as i64 - self.position as i64;
            self.reader.seek_relative(delta)?;
            self.position = self.offset;
        }
        Ok(self.reader.fill_buf()?.first().copied())
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn seek(&mut self, offset: usize) {
        self.offset = offset;
    }
}
