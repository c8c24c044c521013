//! `pegen` is a parser-generator *core* for Parsing Expression Grammars
//! (PEGs) with full support for left recursion (direct, indirect, and
//! hidden), syntactic predicates, a cut operator, and opaque embedded
//! semantic actions.
//!
//! Given grammar source text, [meta::parse_grammar] produces a structured
//! [model::Grammar]; [analysis::analyze] validates it, classifies its
//! rules (left-recursive, leader, nullable), and resolves inter-rule
//! dependencies, handing back an [analysis::AnalyzedGrammar]; and
//! [eval::Evaluator] is the memoizing, seed-growing recursive-descent
//! machine that drives that grammar against a token stream.
//!
//! # Design
//!
//! Emitting a target-language parser from the analyzed grammar — the
//! actual code generator — is out of scope for this crate: that is a
//! mechanical tree-walk over [model::Grammar] that belongs to whichever
//! host language is doing the emitting. What this crate specifies and
//! implements is the hard part underneath it: the grammar model, the
//! static analysis that makes left recursion and nullability decidable
//! ahead of time, and the evaluator semantics a generated parser must
//! reproduce exactly, including the seed-growing left-recursion protocol.
//! Because code generation is out of scope, [eval::Evaluator] doubles as a
//! direct interpreter of the analyzed grammar, which is what makes it
//! possible to run a grammar against real input without a target-language
//! backend.
//!
//! The token producer itself is also out of scope; [eval::TokenStream] is
//! the narrow contract a tokenizer must satisfy to drive the evaluator.
//!
//! # Example
//!
//! ```
//! use pegen::eval::{Evaluator, Token};
//!
//! let src = "start: e ENDMARKER { e }\ne: e '+' NUMBER | NUMBER\n";
//! let grammar = pegen::meta::parse_grammar(src).unwrap();
//! let grammar = pegen::analysis::analyze(grammar).unwrap();
//!
//! let tokens = vec![
//!     Token::new("NUMBER", "1", (0, 1)),
//!     Token::new("PLUS", "+", (2, 3)),
//!     Token::new("NUMBER", "2", (4, 5)),
//!     Token::new("ENDMARKER", "", (5, 5)),
//! ];
//! let evaluator = Evaluator::new(&grammar, &tokens);
//! assert!(evaluator.parse().is_ok());
//! ```
//!
//! # License
//! [pegen](crate) is provided under the MIT license. See
//! [LICENSE](https://github.com/creative-forest/pegen/blob/main/LICENSE).

pub mod analysis;
pub mod error;
pub mod eval;
pub mod meta;
pub mod model;
pub mod util;

pub use error::{GrammarError, SyntaxError};
pub use model::Grammar;

/// Parse grammar source text and run the full analysis pass in one call —
/// the common case when a caller does not need the unanalyzed [Grammar]
/// on its own (e.g. to report [GrammarError::ParseError] differently from
/// [GrammarError::UndefinedRule]).
pub fn compile(src: &str) -> Result<analysis::AnalyzedGrammar, Vec<GrammarError>> {
    let grammar = meta::parse_grammar(src).map_err(|e| vec![e])?;
    analysis::analyze(grammar)
}
