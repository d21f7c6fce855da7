use crate::error::Error;

/// Number of cells on a tape when no size is configured.
pub const DEFAULT_TAPE_SIZE: usize = 1000;

/// Fixed-capacity memory of signed byte cells with a single head.
///
/// The capacity is set at construction and never changes. Cell arithmetic
/// wraps; head movement does not. Moving the head off either end clamps it to
/// the nearest edge and reports [`Error::TapeOutOfBounds`].
#[derive(Debug, Clone)]
pub struct Tape {
    cells: Vec<i8>,
    position: usize,
}

impl Tape {
    /// A zeroed tape. The head always needs a cell to rest on, so a
    /// capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: vec![0; capacity.max(1)],
            position: 0,
        }
    }

    #[inline(always)]
    pub fn read(&self) -> i8 {
        self.cells[self.position]
    }

    #[inline(always)]
    pub fn write(&mut self, value: i8) {
        self.cells[self.position] = value;
    }

    /// Shift the head by `delta` cells.
    pub fn move_by(&mut self, delta: isize) -> Result<(), Error> {
        let attempted = self.position as isize + delta;
        if attempted < 0 {
            self.position = 0;
        } else if attempted as usize >= self.cells.len() {
            self.position = self.cells.len().saturating_sub(1);
        } else {
            self.position = attempted as usize;
            return Ok(());
        }
        Err(Error::TapeOutOfBounds {
            attempted,
            capacity: self.cells.len(),
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[i8] {
        &self.cells
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new(DEFAULT_TAPE_SIZE)
    }
}
