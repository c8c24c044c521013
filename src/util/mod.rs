//! Small ambient utilities shared by the meta-grammar parser, the analyzer and
//! the evaluator: source positions and a leveled debug logger.
mod code;
mod logger;
mod position;

use once_cell::unsync::OnceCell;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
/// 1-based line/column of a byte offset into a [Code] buffer.
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Grammar or input source text, with lazily computed line-break offsets so
/// [Code::position_at] stays cheap when nobody asks for it.
pub struct Code<'c> {
    pub value: &'c [u8],
    line_breaks: OnceCell<Vec<usize>>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Debug verbosity level for the meta-lexer/parser and the evaluator.
///
/// Never consulted outside `#[cfg(debug_assertions)]`; production builds pay
/// nothing for it.
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}
