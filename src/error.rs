//! The two error populations of §7: grammar-time [GrammarError] (fatal,
//! carries a source [Position]) and the single parse-time [SyntaxError].
use crate::util::Position;
use std::fmt::{Display, Formatter};

/// Fatal errors raised while reading and analyzing a grammar file. Internal
/// `Fail` during evaluation is control flow and never becomes one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// The meta-lexer could not tokenize the input at `at`.
    LexError { at: Position, message: String },
    /// The meta-parser could not build a rule/alt/item at `at`.
    ParseError { at: Position, message: String },
    /// An action's braces are unbalanced, or a quote inside one is unterminated.
    MalformedAction { at: Position, message: String },
    /// `RuleRef(name)` names a rule that does not exist in the grammar.
    UndefinedRule { name: String, referenced_at: Position },
    /// Two rules share `name`.
    DuplicateRuleName {
        name: String,
        first_at: Position,
        second_at: Position,
    },
    /// Two bindings in the same alternative share `name`.
    DuplicateBindingInAlt {
        name: String,
        rule: String,
        at: Position,
    },
    /// A `~` appears as the first item of an alternative.
    CutAtAlternativeStart { rule: String, at: Position },
    /// No rule is marked as the entry point (`@start` directive or a rule
    /// literally named `start`).
    NoStartRule,
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarError::LexError { at, message } => {
                write!(f, "lex error at {}: {}", at, message)
            }
            GrammarError::ParseError { at, message } => {
                write!(f, "parse error at {}: {}", at, message)
            }
            GrammarError::MalformedAction { at, message } => {
                write!(f, "malformed action at {}: {}", at, message)
            }
            GrammarError::UndefinedRule { name, referenced_at } => {
                write!(f, "undefined rule `{}` referenced at {}", name, referenced_at)
            }
            GrammarError::DuplicateRuleName {
                name,
                first_at,
                second_at,
            } => write!(
                f,
                "rule `{}` defined twice (first at {}, again at {})",
                name, first_at, second_at
            ),
            GrammarError::DuplicateBindingInAlt { name, rule, at } => write!(
                f,
                "binding `{}` used twice in one alternative of rule `{}` at {}",
                name, rule, at
            ),
            GrammarError::CutAtAlternativeStart { rule, at } => write!(
                f,
                "`~` cannot be the first item of an alternative (rule `{}` at {})",
                rule, at
            ),
            GrammarError::NoStartRule => write!(
                f,
                "no start rule: add an `@start \"name\"` directive or a rule named `start`"
            ),
        }
    }
}

impl std::error::Error for GrammarError {}

/// The single outward-visible parse-time failure: furthest-reach position
/// plus a best-effort set of what was expected there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub pos: usize,
    pub expected: Vec<String>,
}

impl SyntaxError {
    pub fn new(pos: usize) -> Self {
        Self {
            pos,
            expected: Vec::new(),
        }
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.expected.is_empty() {
            write!(f, "syntax error at token {}", self.pos)
        } else {
            write!(
                f,
                "syntax error at token {}, expected one of: {}",
                self.pos,
                self.expected.join(", ")
            )
        }
    }
}

impl std::error::Error for SyntaxError {}
