use crate::cursor::Cursor;
use crate::error::Error;
use crate::scanner::Pair;

/// Check that every delimiter pair balances across the whole source.
///
/// Counting is naive: brackets inside comments count too. Loop brackets are
/// checked before comment parentheses. The cursor is back at offset 0 when
/// this returns, whatever the outcome.
pub fn validate<C: Cursor + ?Sized>(cursor: &mut C) -> Result<(), Error> {
    let result = [Pair::LOOP, Pair::COMMENT]
        .into_iter()
        .try_for_each(|pair| check_balance(cursor, pair));
    cursor.reset();
    result
}

/// One counting pass for a single pair.
///
/// On imbalance the reported offset is where the pass stopped, which is the
/// end of the source.
fn check_balance<C: Cursor + ?Sized>(cursor: &mut C, pair: Pair) -> Result<(), Error> {
    cursor.reset();
    let mut level: isize = 0;
    let scanned = loop {
        match cursor.peek() {
            Ok(Some(byte)) => {
                if byte == pair.open {
                    level += 1;
                } else if byte == pair.close {
                    level -= 1;
                }
                cursor.advance(1);
            }
            Ok(None) => break Ok(cursor.offset()),
            Err(e) => break Err(e),
        }
    };
    cursor.reset();

    let offset = scanned?;
    if level != 0 {
        log::debug!(
            "unbalanced {}{}: net level {level} at offset {offset}",
            char::from(pair.open),
            char::from(pair.close)
        );
        return Err(Error::UnmatchedDelimiter {
            open: char::from(pair.open),
            close: char::from(pair.close),
            offset,
        });
    }
    Ok(())
}
