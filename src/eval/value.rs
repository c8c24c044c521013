//! The result an alternative produces (§4.3 supplement). Actions are opaque
//! host-language text reserved for an out-of-scope code generator, so a
//! `Value` never executes one — it packages the action text with whatever
//! the alternative bound, fully resolved, for that generator to consume
//! later.

/// The value an item or alternative produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A matched token, by its index in the stream.
    Token(usize),
    /// A default-action sequence of two or more contributing items.
    Seq(Vec<Value>),
    /// A zero-width match: `Optional` that took its empty branch, a
    /// lookahead, or `Cut`.
    Empty,
    /// An explicit action's source text, verbatim, plus the values bound in
    /// its alternative in declaration order.
    Action {
        expr: String,
        bindings: Vec<(String, Value)>,
    },
}
