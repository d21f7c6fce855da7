use std::fmt::Write;

use crate::tape::Tape;

/// Cells shown by the diagnostic dump unless told otherwise.
pub const DEFAULT_DUMP_CELLS: usize = 10;

/// Render the first `max` cells of the tape for human inspection.
///
/// Three lines: cell indices, cell values (printable ASCII quoted, anything
/// else as a signed number), and a caret under the head if it falls inside
/// the rendered prefix.
pub fn render(tape: &Tape, max: usize) -> String {
    let shown = &tape.cells()[..max.min(tape.capacity())];
    let mut out = String::new();

    for i in 0..shown.len() {
        let _ = write!(out, "{i:03} ");
    }
    out.push('\n');

    for &cell in shown {
        if (33..=126).contains(&cell) {
            let _ = write!(out, "'{}' ", cell as u8 as char);
        } else {
            let _ = write!(out, "{cell:03} ");
        }
    }
    out.push('\n');

    if tape.position() < shown.len() {
        out.push_str(&" ".repeat(tape.position() * 4 + 1));
        out.push('^');
    }
    out.push('\n');
    out
}
