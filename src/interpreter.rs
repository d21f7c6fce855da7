use std::io::{BufRead, Write};

use crate::alphabet::{
    COMMA, DOT, GREATER, HASH, LBRACKET, LESS, LPAREN, MINUS, NEWLINE, PLUS, RBRACKET, RPAREN,
    is_blank, is_instruction,
};
use crate::cursor::Cursor;
use crate::device;
use crate::error::Error;
use crate::scanner::{self, Direction, Pair};
use crate::tape::{DEFAULT_TAPE_SIZE, Tape};
use crate::validator;

/// Configuration for a single run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of cells on the tape.
    pub tape_size: usize,
    /// Maximum tape commands to dispatch before giving up (`None` for no
    /// limit). Blanks and comments are not counted.
    pub step_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tape_size: DEFAULT_TAPE_SIZE,
            step_limit: None,
        }
    }
}

/// One execution session: tape, source cursor, loop depth and the I/O
/// devices, all owned for the length of a run.
///
/// Instructions are read straight off the cursor. Loop jumps are resolved by
/// scanning the source for the matching bracket each time they are taken, so
/// there is no parse step and no jump table.
pub struct Interpreter<C, R, W> {
    tape: Tape,
    cursor: C,
    /// Loops entered and not yet left.
    depth: usize,
    steps: usize,
    step_limit: Option<usize>,
    input: R,
    output: W,
}

impl<C: Cursor, R: BufRead, W: Write> Interpreter<C, R, W> {
    pub fn new(cursor: C, input: R, output: W, config: &Config) -> Self {
        Self {
            tape: Tape::new(config.tape_size),
            cursor,
            depth: 0,
            steps: 0,
            step_limit: config.step_limit,
            input,
            output,
        }
    }

    /// Validate the whole source, then execute it to the end.
    pub fn run(&mut self) -> Result<(), Error> {
        validator::validate(&mut self.cursor)?;
        log::debug!("source validated");
        self.execute()
    }

    /// Execute from the current cursor position until end of source.
    pub fn execute(&mut self) -> Result<(), Error> {
        while self.step()? {}
        log::debug!(
            "run finished after {} steps, head at {}",
            self.steps,
            self.tape.position()
        );
        Ok(())
    }

    /// Dispatch the instruction under the cursor.
    ///
    /// Returns `Ok(false)` once the cursor is at end of source.
    pub fn step(&mut self) -> Result<bool, Error> {
        let Some(byte) = self.cursor.peek()? else {
            return Ok(false);
        };
        if is_instruction(byte) {
            if let Some(limit) = self.step_limit {
                if self.steps >= limit {
                    return Err(Error::StepLimit { limit });
                }
            }
            self.steps += 1;
        }

        let offset = self.cursor.offset();
        log::trace!(
            "{offset:>6}: {:?} depth={} head={}",
            char::from(byte),
            self.depth,
            self.tape.position()
        );

        match byte {
            GREATER => self.tape.move_by(1)?,
            LESS => self.tape.move_by(-1)?,
            PLUS => self.tape.write(self.tape.read().wrapping_add(1)),
            MINUS => self.tape.write(self.tape.read().wrapping_sub(1)),
            DOT => device::write_byte(&mut self.output, self.tape.read() as u8)?,
            COMMA => {
                let value = device::read_byte(&mut self.input)?;
                self.tape.write(value as i8);
            }
            LBRACKET => self.loop_open()?,
            RBRACKET => {
                if self.loop_close()? {
                    // Cursor already rests on the loop's `[`.
                    return Ok(true);
                }
            }
            LPAREN => self.skip_comment()?,
            HASH => {
                scanner::scan_to_byte(&mut self.cursor, NEWLINE)?;
            }
            RPAREN => {}
            b if is_blank(b) => {}
            _ => return Err(Error::UnknownCharacter { byte, offset }),
        }

        self.cursor.advance(1);
        Ok(true)
    }

    /// `[`: enter the loop, or skip to its `]` when the cell is zero.
    fn loop_open(&mut self) -> Result<(), Error> {
        self.depth += 1;
        if self.tape.read() != 0 {
            return Ok(());
        }
        let offset = self.cursor.offset();
        if scanner::scan_matching(&mut self.cursor, Pair::LOOP, Direction::Forward)?.is_none() {
            return Err(unmatched(Pair::LOOP, offset));
        }
        log::trace!("skipped loop {offset}..={}", self.cursor.offset());
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    /// `]`: leave the loop when the cell is zero, otherwise rewind onto the
    /// matching `[` so it is dispatched again.
    ///
    /// Returns true when the cursor was rewound.
    fn loop_close(&mut self) -> Result<bool, Error> {
        self.depth = self.depth.saturating_sub(1);
        if self.tape.read() == 0 {
            return Ok(false);
        }
        let offset = self.cursor.offset();
        if scanner::scan_matching(&mut self.cursor, Pair::LOOP, Direction::Backward)?.is_none() {
            return Err(unmatched(Pair::LOOP, offset));
        }
        log::trace!("jumped back {offset} -> {}", self.cursor.offset());
        Ok(true)
    }

    fn skip_comment(&mut self) -> Result<(), Error> {
        let offset = self.cursor.offset();
        if scanner::scan_matching(&mut self.cursor, Pair::COMMENT, Direction::Forward)?.is_none() {
            return Err(unmatched(Pair::COMMENT, offset));
        }
        Ok(())
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn cursor(&self) -> &C {
        &self.cursor
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}

fn unmatched(pair: Pair, offset: usize) -> Error {
    Error::UnmatchedDelimiter {
        open: char::from(pair.open),
        close: char::from(pair.close),
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{SliceCursor, StreamCursor};
    use crate::error::ErrorKind;

    type Session<'a> = Interpreter<SliceCursor<'a>, &'a [u8], Vec<u8>>;

    fn session<'a>(source: &'a [u8], input: &'a [u8]) -> Session<'a> {
        let config = Config {
            tape_size: 16,
            step_limit: Some(100_000),
        };
        Interpreter::new(SliceCursor::new(source), input, Vec::new(), &config)
    }

    fn run(source: &[u8]) -> (Result<(), Error>, Vec<i8>, Vec<u8>) {
        run_with_input(source, b"")
    }

    fn run_with_input(source: &[u8], input: &[u8]) -> (Result<(), Error>, Vec<i8>, Vec<u8>) {
        let mut interp = session(source, input);
        let result = interp.run();
        (result, interp.tape().cells().to_vec(), interp.output().clone())
    }

    #[test]
    fn test_increment_and_move() {
        let (result, cells, _) = run(b"++>+++>-");
        result.unwrap();
        assert_eq!(&cells[..3], &[2, 3, -1]);
    }

    #[test]
    fn test_plus_wraps() {
        let src = vec![b'+'; 255];
        let (result, cells, _) = run(&src);
        result.unwrap();
        assert_eq!(cells[0] as u8, 255);

        let src = vec![b'+'; 256];
        let (result, cells, _) = run(&src);
        result.unwrap();
        assert_eq!(cells[0], 0);
    }

    #[test]
    fn test_hello_world() {
        let src = b"++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
        let (result, _, out) = run(src);
        result.unwrap();
        assert_eq!(out, b"Hello World!\n");
    }

    #[test]
    fn test_loop_on_zero_cell_runs_no_iterations() {
        let (result, cells, out) = run(b"[+.>+]");
        result.unwrap();
        assert!(out.is_empty());
        assert!(cells.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_loop_moves_value() {
        let (result, cells, _) = run(b"+++[>++<-]");
        result.unwrap();
        assert_eq!(&cells[..2], &[0, 6]);
    }

    #[test]
    fn test_nested_loop_terminates() {
        let mut interp = session(b"+++[[-]]", b"");
        interp.run().unwrap();
        assert_eq!(interp.tape().read(), 0);
        assert_eq!(interp.depth(), 0);
    }

    #[test]
    fn test_depth_tracking() {
        let mut interp = session(b"+[[-]]", b"");
        let mut depths = Vec::new();
        while interp.step().unwrap() {
            depths.push(interp.depth());
        }
        // + [ [ - ] ]
        assert_eq!(depths, vec![0, 1, 2, 2, 1, 0]);
    }

    #[test]
    fn test_loop_close_rewinds_onto_open() {
        let mut interp = session(b"++[-]", b"");
        for _ in 0..4 {
            interp.step().unwrap();
        }
        assert_eq!(interp.depth(), 1);
        // `]` with a nonzero cell.
        interp.step().unwrap();
        assert_eq!(interp.cursor().offset(), 2);
        assert_eq!(interp.depth(), 0);
        // `[` is dispatched again.
        interp.step().unwrap();
        assert_eq!(interp.depth(), 1);
        assert_eq!(interp.cursor().offset(), 3);
    }

    #[test]
    fn test_skipped_loop_lands_after_close() {
        let mut interp = session(b"[>>]+", b"");
        interp.step().unwrap();
        assert_eq!(interp.cursor().offset(), 4);
        assert_eq!(interp.depth(), 0);
        interp.execute().unwrap();
        assert_eq!(interp.tape().position(), 0);
        assert_eq!(interp.tape().read(), 1);
    }

    #[test]
    fn test_comments_do_not_touch_tape() {
        let (result, cells, _) = run(b"+(>>> --- <<< ((nested)) .,)+# >>>>> ---\n+");
        result.unwrap();
        assert_eq!(&cells[..2], &[3, 0]);
    }

    #[test]
    fn test_line_comment_at_end_without_newline() {
        let (result, cells, _) = run(b"++ # trailing remark");
        result.unwrap();
        assert_eq!(cells[0], 2);
    }

    #[test]
    fn test_skipped_loop_steps_over_comment_brackets() {
        // A scan that did not skip the comment would stop at the first `]`
        // and spin forever on the second loop.
        let (result, cells, _) = run(b"[ ( ] + [ ) ]+");
        result.unwrap();
        assert_eq!(cells[0], 1);
    }

    #[test]
    fn test_backward_jump_steps_over_comment_brackets() {
        let (result, cells, _) = run(b"+++[>+<- (a [ ] b) ]");
        result.unwrap();
        assert_eq!(&cells[..2], &[0, 3]);
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let (result, cells, _) = run(b"+ +\t+\r\n+\0+");
        result.unwrap();
        assert_eq!(cells[0], 5);
    }

    #[test]
    fn test_unknown_character_stops_immediately() {
        let (result, cells, _) = run(b"+x+");
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownCharacter);
        assert!(matches!(
            err,
            Error::UnknownCharacter {
                byte: b'x',
                offset: 1
            }
        ));
        assert_eq!(cells[0], 1);
    }

    #[test]
    fn test_unmatched_bracket_rejected_before_running() {
        let (result, _, out) = run(b"+.[");
        assert_eq!(result.unwrap_err().kind(), ErrorKind::UnmatchedDelimiter);
        assert!(out.is_empty());
    }

    #[test]
    fn test_leading_left_is_out_of_bounds() {
        let mut interp = session(b"<+.", b"");
        let err = interp.run().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TapeOutOfBounds);
        assert_eq!(interp.tape().position(), 0);
        assert_eq!(interp.tape().read(), 0);
        assert!(interp.output().is_empty());
    }

    #[test]
    fn test_right_edge_is_out_of_bounds() {
        let src = vec![b'>'; 16];
        let mut interp = session(&src, b"");
        let err = interp.run().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TapeOutOfBounds);
        assert_eq!(interp.tape().position(), 15);
    }

    #[test]
    fn test_echo_input_byte() {
        let (result, _, out) = run_with_input(b",.", b"A\n");
        result.unwrap();
        assert_eq!(out, b"A");
    }

    #[test]
    fn test_input_end_reads_zero() {
        let (result, cells, _) = run_with_input(b"+++,", b"");
        result.unwrap();
        assert_eq!(cells[0], 0);
    }

    #[test]
    fn test_out_of_order_brackets_fault_at_run_time() {
        let (result, _, _) = run(b"][");
        assert!(matches!(
            result.unwrap_err(),
            Error::UnmatchedDelimiter { open: '[', offset: 1, .. }
        ));

        let (result, _, _) = run(b"+][");
        assert!(matches!(
            result.unwrap_err(),
            Error::UnmatchedDelimiter { offset: 1, .. }
        ));
    }

    #[test]
    fn test_out_of_order_parens_fault_at_run_time() {
        let (result, _, _) = run(b")+(");
        assert!(matches!(
            result.unwrap_err(),
            Error::UnmatchedDelimiter { open: '(', offset: 2, .. }
        ));
    }

    #[test]
    fn test_zero_tape_size_runs_on_single_cell() {
        let config = Config {
            tape_size: 0,
            step_limit: None,
        };
        let mut interp =
            Interpreter::new(SliceCursor::new(b"++[-].>"), &b""[..], Vec::new(), &config);
        let err = interp.run().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TapeOutOfBounds);
        assert_eq!(interp.tape().capacity(), 1);
        assert_eq!(interp.output(), &[0u8]);
    }

    #[test]
    fn test_step_limit() {
        let config = Config {
            tape_size: 4,
            step_limit: Some(50),
        };
        let mut interp = Interpreter::new(SliceCursor::new(b"+[]"), &b""[..], Vec::new(), &config);
        let err = interp.run().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StepLimit);
        assert_eq!(interp.steps(), 50);
    }

    #[test]
    fn test_runs_from_stream() {
        let source = std::io::Cursor::new(b"++++++++[>++++++++<-]>+.".to_vec());
        let cursor = StreamCursor::new(source).unwrap();
        let mut interp = Interpreter::new(cursor, &b""[..], Vec::new(), &Config::default());
        interp.run().unwrap();
        assert_eq!(interp.output(), b"A");
    }

    #[test]
    fn test_empty_source() {
        let (result, cells, out) = run(b"");
        result.unwrap();
        assert!(out.is_empty());
        assert!(cells.iter().all(|&c| c == 0));
    }
}
