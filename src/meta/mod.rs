//! Component B: the bootstrap meta-grammar reader (§4.5, §6). Turns grammar
//! source text into a [crate::model::Grammar], unresolved and unanalyzed.
pub mod lexer;
mod parser;

pub use parser::{parse_grammar, parse_grammar_with_debug};
