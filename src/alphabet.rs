//! Bytes that mean something to the interpreter.

pub const LESS: u8 = b'<';
pub const GREATER: u8 = b'>';
pub const PLUS: u8 = b'+';
pub const MINUS: u8 = b'-';
pub const DOT: u8 = b'.';
pub const COMMA: u8 = b',';
pub const LBRACKET: u8 = b'[';
pub const RBRACKET: u8 = b']';
pub const LPAREN: u8 = b'(';
pub const RPAREN: u8 = b')';
pub const HASH: u8 = b'#';
pub const NEWLINE: u8 = b'\n';

/// Returns true for the eight tape commands (comment delimiters excluded).
pub fn is_instruction(byte: u8) -> bool {
    matches!(
        byte,
        LESS | GREATER | PLUS | MINUS | DOT | COMMA | LBRACKET | RBRACKET
    )
}

/// Bytes the dispatcher steps over without effect.
pub fn is_blank(byte: u8) -> bool {
    matches!(byte, NEWLINE | b'\0' | b' ' | b'\r' | b'\t')
}
