//! Delimiter matching by walking the source cursor.
//!
//! Loop jumps and comment skips are both resolved here, directly against the
//! cursor, every time they are needed. Loop scans treat embedded `( ... )`
//! comments as opaque: when a comment delimiter facing the scan direction is
//! met, a nested comment scan carries the cursor across it before the loop
//! scan resumes.

use std::io;

use crate::alphabet::{LBRACKET, LPAREN, RBRACKET, RPAREN};
use crate::cursor::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Move the cursor one byte. Returns false at the start of the source.
    fn step<C: Cursor + ?Sized>(self, cursor: &mut C) -> bool {
        match self {
            Direction::Forward => {
                cursor.advance(1);
                true
            }
            Direction::Backward => cursor.retreat(1),
        }
    }
}

/// A pair of delimiters that nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub open: u8,
    pub close: u8,
}

impl Pair {
    pub const LOOP: Pair = Pair {
        open: LBRACKET,
        close: RBRACKET,
    };
    pub const COMMENT: Pair = Pair {
        open: LPAREN,
        close: RPAREN,
    };

    /// The pair as seen when walking in `direction`: backward scans meet the
    /// closer first, so the roles swap.
    pub fn oriented(self, direction: Direction) -> Pair {
        match direction {
            Direction::Forward => self,
            Direction::Backward => Pair {
                open: self.close,
                close: self.open,
            },
        }
    }

    /// Spans that must be skipped wholesale while scanning for this pair.
    fn skips(self) -> Option<Pair> {
        if self == Pair::LOOP {
            Some(Pair::COMMENT)
        } else {
            None
        }
    }
}

/// Walk forward until `target` or end of source. The cursor rests on the
/// target byte when one is found.
pub fn scan_to_byte<C: Cursor + ?Sized>(cursor: &mut C, target: u8) -> io::Result<Option<u8>> {
    while let Some(byte) = cursor.peek()? {
        if byte == target {
            return Ok(Some(byte));
        }
        cursor.advance(1);
    }
    Ok(None)
}

/// Find the delimiter matching the one under the cursor.
///
/// The cursor must start on the delimiter that opens the span in the given
/// direction (`(` or `[` forward, `]` backward). On success it rests on the
/// match and the matched byte is returned. `None` means the scan ran off the
/// end (forward) or the start (backward) of the source without a match.
pub fn scan_matching<C: Cursor + ?Sized>(
    cursor: &mut C,
    pair: Pair,
    direction: Direction,
) -> io::Result<Option<u8>> {
    let Pair { open, close } = pair.oriented(direction);
    let skip = pair.skips();
    let mut depth: usize = 0;

    while let Some(byte) = cursor.peek()? {
        if byte == open {
            depth += 1;
        } else if byte == close {
            if depth == 1 {
                return Ok(Some(byte));
            }
            depth = depth.saturating_sub(1);
        } else if let Some(inner) = skip.filter(|p| p.oriented(direction).open == byte) {
            if scan_matching(cursor, inner, direction)?.is_none() {
                return Ok(None);
            }
        }
        if !direction.step(cursor) {
            return Ok(None);
        }
    }
    Ok(None)
}
