//! Component D: the memoizing, seed-growing PEG evaluator (§4.3). This is
//! the abstract machine every generated parser must reproduce; since code
//! generation is out of scope for this core (§1), [Evaluator] is a direct
//! tree-walking interpreter of the analyzed [crate::model::Grammar] and is
//! what makes the scenarios of spec §8 testable end to end without a
//! target-language backend.
mod token;
mod value;

pub use token::{Token, TokenStream};
pub use value::Value;

use crate::analysis::AnalyzedGrammar;
use crate::error::SyntaxError;
use crate::model::{Alt, Item, Rhs};
use crate::util::Log;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// The result of evaluating one item, alternative, or rule body: a match
/// carrying its value and the position just past it, or a control-flow
/// failure that is never allowed to escape [Evaluator::parse] itself (§7:
/// "internal Fail is control flow, not error").
#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Match(Value, usize),
    Fail,
}

impl Outcome {
    fn end_pos(&self) -> Option<usize> {
        match self {
            Outcome::Match(_, end) => Some(*end),
            Outcome::Fail => None,
        }
    }
}

/// `(rule_name, pos) -> MemoEntry { result, end_pos, in_progress }` of §4.3,
/// keyed by rule index rather than name since [crate::model::Grammar]
/// indexes rules by position once analyzed.
#[derive(Clone)]
struct MemoEntry {
    outcome: Outcome,
    in_progress: bool,
}

/// Owns one parse's memo table; discarded when the parse finishes (§5: "the
/// memo table is owned exclusively by one parse invocation"). The analyzed
/// grammar it borrows is immutable and may be shared across evaluators.
pub struct Evaluator<'g, 's, S: TokenStream> {
    grammar: &'g AnalyzedGrammar,
    stream: &'s S,
    memo: RefCell<HashMap<(usize, usize), MemoEntry>>,
    furthest: Cell<usize>,
    expected: RefCell<Vec<String>>,
    debug: Log<&'static str>,
}

impl<'g, 's, S: TokenStream> Evaluator<'g, 's, S> {
    pub fn new(grammar: &'g AnalyzedGrammar, stream: &'s S) -> Self {
        Self {
            grammar,
            stream,
            memo: RefCell::new(HashMap::new()),
            furthest: Cell::new(0),
            expected: RefCell::new(Vec::new()),
            debug: Log::None,
        }
    }

    pub fn with_debug(mut self, level: Log<&'static str>) -> Self {
        self.debug = level;
        self
    }

    /// Parse the entry rule (§6: `start` directive or a rule literally
    /// named `start`) against the whole token stream. Success requires
    /// consuming every token (§6 "Exit conditions"); a short match is a
    /// [SyntaxError] just like an outright failure, reported at the
    /// furthest position reached by any item whose enclosing alternative
    /// ultimately failed (§9(b)) — a plain successful token match never
    /// moves `furthest` on its own; only a failing item does, since that is
    /// always the position at which some attempted alternative gave up.
    pub fn parse(&self) -> Result<Value, SyntaxError> {
        let entry = self
            .grammar
            .entry_rule_name()
            .expect("AnalyzedGrammar guarantees a start rule");
        let rule_idx = self
            .grammar
            .rule_index(entry)
            .expect("AnalyzedGrammar guarantees the start rule resolves");

        match self.eval_rule(rule_idx, 0) {
            Outcome::Match(value, end) if end == self.stream.len() => Ok(value),
            Outcome::Match(_, end) => {
                // The entry rule matched but left input unconsumed — a
                // "short match" (§6 exit conditions). Nothing necessarily
                // failed internally to record this as furthest reach on its
                // own, so note it explicitly at the point parsing stopped.
                self.note_expected(end, "end of input".to_string());
                Err(SyntaxError {
                    pos: self.furthest.get(),
                    expected: self.expected.borrow().clone(),
                })
            }
            Outcome::Fail => Err(SyntaxError {
                pos: self.furthest.get(),
                expected: self.expected.borrow().clone(),
            }),
        }
    }

    fn note_expected(&self, pos: usize, what: String) {
        if pos > self.furthest.get() {
            self.furthest.set(pos);
            self.expected.borrow_mut().clear();
        }
        if pos == self.furthest.get() {
            let mut expected = self.expected.borrow_mut();
            if !expected.contains(&what) {
                expected.push(what);
            }
        }
    }

    // ---- rule invocation: the three-way dispatch of §4.3 item 1-3 ----

    fn eval_rule(&self, rule_idx: usize, pos: usize) -> Outcome {
        let rule = &self.grammar.rules()[rule_idx];
        self.debug.trace_rule_entry(&rule.name, pos);

        if let Some(entry) = self.memo.borrow().get(&(rule_idx, pos)) {
            if entry.in_progress {
                let outcome = if rule.flags.leader {
                    entry.outcome.clone()
                } else if rule.flags.left_recursive {
                    Outcome::Fail
                } else {
                    // A rule can only re-enter itself at the same token
                    // position via a left-call chain (§4.2(c)); the
                    // analyzer's SCC pass finds every such chain and
                    // flags every member `left_recursive`, so reaching
                    // this branch would mean analysis and evaluation
                    // disagree about the left-call graph.
                    unreachable!(
                        "rule `{}` re-entered at token {} without being left-recursive",
                        rule.name, pos
                    );
                };
                self.debug.trace_rule_result(&rule.name, pos, false, pos);
                return outcome;
            }
            let outcome = entry.outcome.clone();
            let matched = matches!(outcome, Outcome::Match(..));
            self.debug
                .trace_rule_result(&rule.name, pos, matched, outcome.end_pos().unwrap_or(pos));
            return outcome;
        }

        let outcome = if rule.flags.leader {
            self.grow_seed(rule_idx, pos)
        } else {
            self.memo.borrow_mut().insert(
                (rule_idx, pos),
                MemoEntry {
                    outcome: Outcome::Fail,
                    in_progress: true,
                },
            );
            let outcome = self.eval_rhs(&rule.rhs, pos);
            self.memo.borrow_mut().insert(
                (rule_idx, pos),
                MemoEntry {
                    outcome: outcome.clone(),
                    in_progress: false,
                },
            );
            outcome
        };

        let matched = matches!(outcome, Outcome::Match(..));
        self.debug
            .trace_rule_result(&rule.name, pos, matched, outcome.end_pos().unwrap_or(pos));
        outcome
    }

    /// The seed-growing protocol of §4.3 item 2 / §5: install a failing
    /// seed, re-evaluate the body, and keep the longer of the two results
    /// as long as it strictly grows — invalidating every other SCC member's
    /// memo entry at `pos` and the leader's own entries past `pos` each
    /// time the seed grows, since they may have been computed against the
    /// now-obsolete seed (see [Evaluator::invalidate_scc]).
    fn grow_seed(&self, rule_idx: usize, pos: usize) -> Outcome {
        let rule = &self.grammar.rules()[rule_idx];
        self.memo.borrow_mut().insert(
            (rule_idx, pos),
            MemoEntry {
                outcome: Outcome::Fail,
                in_progress: true,
            },
        );
        let scc_id = self
            .grammar
            .scc_id_of(rule_idx)
            .expect("leader rules always belong to a computed SCC");

        loop {
            let candidate = self.eval_rhs(&rule.rhs, pos);
            let prev_end = self
                .memo
                .borrow()
                .get(&(rule_idx, pos))
                .and_then(|e| e.outcome.end_pos());
            let grew = match (&candidate, prev_end) {
                (Outcome::Match(_, end), Some(prev)) => *end > prev,
                (Outcome::Match(_, _), None) => true,
                (Outcome::Fail, _) => false,
            };
            if !grew {
                break;
            }
            if let Outcome::Match(_, end) = &candidate {
                self.debug.trace_seed_grow(&rule.name, pos, *end);
            }
            self.memo.borrow_mut().insert(
                (rule_idx, pos),
                MemoEntry {
                    outcome: candidate,
                    in_progress: true,
                },
            );
            self.invalidate_scc(scc_id, rule_idx, pos);
        }

        let mut memo = self.memo.borrow_mut();
        let entry = memo.get_mut(&(rule_idx, pos)).expect("seed was just inserted");
        entry.in_progress = false;
        entry.outcome.clone()
    }

    /// Drop every memo entry that may have been computed against the
    /// now-superseded seed: the leader's own entries at `p > pos` (it keeps
    /// the seed just installed at `pos` itself), and every other SCC
    /// member's entry at `p >= pos`. A non-leader member is always invoked
    /// at the *same* token position as the leader during the left-call
    /// chain rooted at this growth round, so — unlike the leader — its
    /// cached result at `pos` itself is exactly the one computed against
    /// the stale seed and must be dropped too, or the next round reads it
    /// straight out of the memo without ever recomputing against the grown
    /// seed (this is what lets an indirect cycle's non-leader member
    /// re-fire each round, per DESIGN.md open question (a)).
    fn invalidate_scc(&self, scc_id: usize, leader_idx: usize, pos: usize) {
        let members = self.grammar.scc_members(scc_id);
        self.memo.borrow_mut().retain(|&(rule_idx, p), _| {
            if !members.contains(&rule_idx) {
                return true;
            }
            if rule_idx == leader_idx {
                p <= pos
            } else {
                p < pos
            }
        });
    }

    // ---- alternation / sequencing (§4.3) ----

    /// Try alternatives left to right (ordered choice). A `Cut` crossed
    /// within a failing alternative short-circuits the rest of *this*
    /// alternation (§4.3, §9 "cut semantics scope") — it does not reach
    /// through to an enclosing one, since each [Rhs] evaluation here gets
    /// its own cut flag local to the call.
    fn eval_rhs(&self, rhs: &Rhs, pos: usize) -> Outcome {
        for alt in rhs.alts() {
            let (outcome, cut) = self.eval_alt(alt, pos);
            if matches!(outcome, Outcome::Match(..)) {
                return outcome;
            }
            if cut {
                return Outcome::Fail;
            }
        }
        Outcome::Fail
    }

    /// Evaluate one alternative's item sequence, aborting on the first
    /// `Fail` (§4.3 "Sequencing"). Returns whether a `Cut` was crossed so
    /// the caller ([Evaluator::eval_rhs]) can apply the cut's
    /// enclosing-alternation-only short-circuit.
    fn eval_alt(&self, alt: &Alt, pos: usize) -> (Outcome, bool) {
        let mut cur = pos;
        let mut cut = false;
        let mut bound: Vec<(Option<String>, Value)> = Vec::with_capacity(alt.items.len());

        for named in &alt.items {
            if matches!(named.item, Item::Cut) {
                cut = true;
                bound.push((named.bind.clone(), Value::Empty));
                continue;
            }
            match self.eval_item(&named.item, cur) {
                Outcome::Match(value, end) => {
                    cur = end;
                    bound.push((named.bind.clone(), value));
                }
                Outcome::Fail => return (Outcome::Fail, cut),
            }
        }

        let value = self.build_value(alt, bound);
        (Outcome::Match(value, cur), cut)
    }

    /// The default-action synthesis of §4.2, or a [Value::Action] package
    /// when the alternative carries an explicit action — the evaluator
    /// never evaluates the opaque action text itself (§9, out of scope).
    fn build_value(&self, alt: &Alt, bound: Vec<(Option<String>, Value)>) -> Value {
        if let Some(expr) = &alt.action {
            let bindings = bound
                .into_iter()
                .filter_map(|(name, value)| name.map(|n| (n, value)))
                .collect();
            return Value::Action {
                expr: expr.clone(),
                bindings,
            };
        }

        if bound.len() == 1 {
            return bound.into_iter().next().unwrap().1;
        }

        // §4.2's default action keys on the *NamedItem* count, not on how
        // many of them end up contributing a value: an alternative with
        // more than one NamedItem always yields a Seq, even if excluding
        // Cut/lookaheads leaves only one contributing value.
        let contributing: Vec<Value> = alt
            .items
            .iter()
            .zip(bound)
            .filter(|(named, _)| {
                !matches!(
                    named.item,
                    Item::Cut | Item::PositiveLookahead(_) | Item::NegativeLookahead(_)
                )
            })
            .map(|(_, value)| value)
            .collect();

        Value::Seq(contributing)
    }

    // ---- items (§4.3) ----

    fn eval_item(&self, item: &Item, pos: usize) -> Outcome {
        match item {
            Item::RuleRef(name) => {
                let idx = self
                    .grammar
                    .rule_index(name)
                    .expect("AnalyzedGrammar guarantees every RuleRef resolves");
                self.eval_rule(idx, pos)
            }
            Item::TokenRef(kind) => match self.stream.token_at(pos) {
                Some(tok) if &tok.kind == kind => Outcome::Match(Value::Token(pos), pos + 1),
                _ => {
                    self.note_expected(pos, kind.clone());
                    Outcome::Fail
                }
            },
            Item::StringLit(text) => match self.stream.token_at(pos) {
                Some(tok) if &tok.text == text => Outcome::Match(Value::Token(pos), pos + 1),
                _ => {
                    self.note_expected(pos, format!("'{}'", text));
                    Outcome::Fail
                }
            },
            Item::Group(rhs) => self.eval_rhs(rhs, pos),
            Item::Optional(rhs) => match self.eval_rhs(rhs, pos) {
                m @ Outcome::Match(..) => m,
                Outcome::Fail => Outcome::Match(Value::Empty, pos),
            },
            Item::ZeroOrMore(rhs) => {
                let (values, end) = self.eval_repeat(rhs, pos);
                Outcome::Match(Value::Seq(values), end)
            }
            Item::OneOrMore(rhs) => {
                let (values, end) = self.eval_repeat(rhs, pos);
                if values.is_empty() {
                    Outcome::Fail
                } else {
                    Outcome::Match(Value::Seq(values), end)
                }
            }
            Item::Separated(sep, elem) => self.eval_separated(sep, elem, pos),
            Item::PositiveLookahead(rhs) => match self.eval_rhs(rhs, pos) {
                Outcome::Match(_, _) => Outcome::Match(Value::Empty, pos),
                Outcome::Fail => Outcome::Fail,
            },
            Item::NegativeLookahead(rhs) => match self.eval_rhs(rhs, pos) {
                Outcome::Match(_, _) => Outcome::Fail,
                Outcome::Fail => Outcome::Match(Value::Empty, pos),
            },
            Item::Cut => Outcome::Match(Value::Empty, pos),
        }
    }

    /// Greedy, non-backtracking repetition (§4.3 "Repetition"): matches
    /// `rhs` as many times as it can, never retrying a shorter count. A
    /// nullable body that matches without advancing is taken once and then
    /// stopped, since repeating it further would never terminate. Used by
    /// both `ZeroOrMore` and `OneOrMore`; the latter just additionally
    /// checks the resulting count is nonzero.
    fn eval_repeat(&self, rhs: &Rhs, pos: usize) -> (Vec<Value>, usize) {
        let mut values = Vec::new();
        let mut cur = pos;
        loop {
            match self.eval_rhs(rhs, cur) {
                Outcome::Match(value, end) => {
                    let advanced = end > cur;
                    values.push(value);
                    cur = end;
                    if !advanced {
                        break;
                    }
                }
                Outcome::Fail => break,
            }
        }
        (values, cur)
    }

    fn eval_separated(&self, sep: &Item, elem: &Rhs, pos: usize) -> Outcome {
        let first = match self.eval_rhs(elem, pos) {
            Outcome::Match(value, end) => (value, end),
            Outcome::Fail => return Outcome::Fail,
        };
        let mut values = vec![first.0];
        let mut cur = first.1;
        loop {
            let before_sep = cur;
            match self.eval_item(sep, cur) {
                Outcome::Match(_, after_sep) => match self.eval_rhs(elem, after_sep) {
                    Outcome::Match(value, end) => {
                        values.push(value);
                        cur = end;
                    }
                    Outcome::Fail => {
                        cur = before_sep;
                        break;
                    }
                },
                Outcome::Fail => break,
            }
        }
        Outcome::Match(Value::Seq(values), cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::meta::parse_grammar;

    fn compile(src: &str) -> AnalyzedGrammar {
        let grammar = parse_grammar(src).expect("grammar should parse");
        analyze(grammar).expect("grammar should analyze")
    }

    fn tok(kind: &str, text: &str) -> Token {
        Token::new(kind, text, (0, 0))
    }

    // §8 scenario 1: a non-left-recursive rule with more than one item.
    #[test]
    fn scenario_number_endmarker() {
        let grammar = compile("start: NUMBER ENDMARKER\n");
        let tokens = vec![tok("NUMBER", "42"), tok("ENDMARKER", "")];
        let evaluator = Evaluator::new(&grammar, &tokens);
        let value = evaluator.parse().expect("42 should parse");
        match value {
            Value::Seq(items) => {
                assert_eq!(items[0], Value::Token(0));
                assert_eq!(items.len(), 2);
            }
            other => panic!("expected a Seq, got {:?}", other),
        }
    }

    // §8 scenario 2: direct left recursion, left-associative.
    #[test]
    fn scenario_direct_left_recursion() {
        let grammar = compile("start: e ENDMARKER\ne: e '+' NUMBER | NUMBER\n");
        let tokens = vec![
            tok("NUMBER", "1"),
            tok("PLUS", "+"),
            tok("NUMBER", "2"),
            tok("PLUS", "+"),
            tok("NUMBER", "3"),
            tok("ENDMARKER", ""),
        ];
        let evaluator = Evaluator::new(&grammar, &tokens);
        let value = evaluator.parse().expect("1 + 2 + 3 should parse");
        // start's value is [e-value, ENDMARKER]; e's value nests left-to-right:
        // ((1 + 2) + 3) as Seq(Seq(Seq(1,+,2), +, 3))
        let e_rule = grammar.rule("e").unwrap();
        assert!(e_rule.flags.left_recursive);
        assert!(e_rule.flags.leader);
        if let Value::Seq(items) = &value {
            if let Value::Seq(inner) = &items[0] {
                // innermost is the base case: NUMBER alone (not a Seq).
                assert_eq!(inner.len(), 3);
                assert!(matches!(inner[0], Value::Seq(_)));
            } else {
                panic!("expected e's value to be a Seq");
            }
        } else {
            panic!("expected start's value to be a Seq");
        }
    }

    // §8 scenario 3: indirect left recursion through a 2-rule cycle.
    #[test]
    fn scenario_indirect_left_recursion() {
        let grammar = compile("start: a ENDMARKER\na: b 'x' | NUMBER\nb: a 'y'\n");
        let tokens = vec![
            tok("NUMBER", "1"),
            tok("y", "y"),
            tok("x", "x"),
            tok("ENDMARKER", ""),
        ];
        let evaluator = Evaluator::new(&grammar, &tokens);
        assert!(evaluator.parse().is_ok());
        let a_rule = grammar.rule("a").unwrap();
        let b_rule = grammar.rule("b").unwrap();
        assert!(a_rule.flags.left_recursive);
        assert!(b_rule.flags.left_recursive);
        // lexicographically least of {a, b} is the leader.
        assert!(a_rule.flags.leader);
        assert!(!b_rule.flags.leader);
    }

    // §8 scenario 4: cut forbids trying the sibling alternative on later failure.
    #[test]
    fn scenario_cut_forbids_backtrack() {
        let grammar = compile("start: '(' ~ NAME ')' | NAME\n");
        let tokens = vec![tok("LPAREN", "("), tok("NUMBER", "42"), tok("RPAREN", ")")];
        let evaluator = Evaluator::new(&grammar, &tokens);
        let err = evaluator.parse().expect_err("NUMBER where NAME expected should fail");
        // had the cut not fired, the parser would have backtracked to try
        // the bare `NAME` alternative starting at token 0 and still failed
        // there (token 0 is `(`, not NAME) — either way this is a
        // SyntaxError, so the meaningful assertion is in the next test,
        // which checks the cut actually skips the second alternative.
        assert_eq!(err.pos, 1);
    }

    #[test]
    fn cut_short_circuits_sibling_alternatives() {
        // A rule whose second alternative would succeed if tried, but the
        // first alternative crosses a cut and then fails — the second
        // alternative must never be attempted.
        let grammar = compile("start: NUMBER ~ NAME | NUMBER\n");
        let tokens = vec![tok("NUMBER", "1")];
        let evaluator = Evaluator::new(&grammar, &tokens);
        assert!(evaluator.parse().is_err());
    }

    // §8 scenario 5: separated list, separators discarded from the value.
    #[test]
    fn scenario_separated_list() {
        let grammar = compile("start: ','.NUMBER+ ENDMARKER\n");
        let tokens = vec![
            tok("NUMBER", "1"),
            tok(",", ","),
            tok("NUMBER", "2"),
            tok(",", ","),
            tok("NUMBER", "3"),
            tok("ENDMARKER", ""),
        ];
        let evaluator = Evaluator::new(&grammar, &tokens);
        let value = evaluator.parse().expect("1,2,3 should parse");
        if let Value::Seq(items) = &value {
            if let Value::Seq(numbers) = &items[0] {
                assert_eq!(numbers, &[Value::Token(0), Value::Token(2), Value::Token(4)]);
            } else {
                panic!("expected the separated list to be a Seq");
            }
        } else {
            panic!("expected start's value to be a Seq");
        }
    }

    // §8 scenario 6, two-token case: unambiguous under greedy, non-
    // backtracking repetition (§4.3) — optional takes the first `a`,
    // mandatory takes the second. See DESIGN.md for the one-token case,
    // where a possessive optional and a literal reading of the spec's
    // prose disagree; this evaluator follows §4.3's explicit "never
    // backtracking into shorter matches" rule, which the spec states for
    // `ZeroOrMore` and which this grammar applies consistently to `?` too.
    #[test]
    fn scenario_optional_then_mandatory_two_tokens() {
        let grammar = compile("start: 'a'? 'a' ENDMARKER\n");
        let two_a = vec![tok("a", "a"), tok("a", "a"), tok("ENDMARKER", "")];
        let evaluator = Evaluator::new(&grammar, &two_a);
        assert!(evaluator.parse().is_ok());
    }

    // One token only: the optional greedily consumes it, so the mandatory
    // `'a'` that follows has nothing left to match. A possessive (non-
    // backtracking) `?` necessarily fails here — see DESIGN.md.
    #[test]
    fn possessive_optional_does_not_backtrack_for_mandatory_sibling() {
        let grammar = compile("start: 'a'? 'a' ENDMARKER\n");
        let one_a = vec![tok("a", "a"), tok("ENDMARKER", "")];
        let evaluator = Evaluator::new(&grammar, &one_a);
        assert!(evaluator.parse().is_err());
    }

    // Invariant 2: position restoration on Fail.
    #[test]
    fn failed_alternative_does_not_consume() {
        let grammar = compile("start: NAME | NUMBER\n");
        let tokens = vec![tok("NUMBER", "1")];
        let evaluator = Evaluator::new(&grammar, &tokens);
        // the NAME alternative fails at token 0 and must not have moved
        // `pos`, or the NUMBER alternative (tried next) would miss it.
        assert!(evaluator.parse().is_ok());
    }

    // Invariant 3: a successful lookahead does not consume input.
    #[test]
    fn lookahead_does_not_consume() {
        let grammar = compile("start: &NUMBER NUMBER ENDMARKER\n");
        let tokens = vec![tok("NUMBER", "1"), tok("ENDMARKER", "")];
        let evaluator = Evaluator::new(&grammar, &tokens);
        assert!(evaluator.parse().is_ok());
    }

    #[test]
    fn negative_lookahead_rejects_match_without_consuming() {
        let grammar = compile("start: !NUMBER NAME ENDMARKER | NUMBER ENDMARKER\n");
        let tokens = vec![tok("NUMBER", "1"), tok("ENDMARKER", "")];
        let evaluator = Evaluator::new(&grammar, &tokens);
        // `!NUMBER` fails at a NUMBER token, so the first alternative is
        // rejected without consuming, and the second alternative (which
        // starts at the same token 0) succeeds.
        assert!(evaluator.parse().is_ok());
    }

    // Memo consistency (invariant 4): re-evaluating the same (rule, pos)
    // without clearing the memo returns the same outcome both times.
    #[test]
    fn memo_is_consistent_across_repeated_lookups() {
        let grammar = compile("start: a a ENDMARKER\na: NUMBER\n");
        let tokens = vec![tok("NUMBER", "1"), tok("NUMBER", "2"), tok("ENDMARKER", "")];
        let evaluator = Evaluator::new(&grammar, &tokens);
        let a_idx = grammar.rule_index("a").unwrap();
        let first = evaluator.eval_rule(a_idx, 0);
        let second = evaluator.eval_rule(a_idx, 0);
        assert_eq!(first, second);
    }

    #[test]
    fn syntax_error_reports_furthest_reach() {
        let grammar = compile("start: NUMBER NUMBER ENDMARKER\n");
        let tokens = vec![tok("NUMBER", "1"), tok("NAME", "x"), tok("ENDMARKER", "")];
        let evaluator = Evaluator::new(&grammar, &tokens);
        let err = evaluator.parse().expect_err("NAME where NUMBER expected should fail");
        assert_eq!(err.pos, 1);
        assert!(err.expected.contains(&"NUMBER".to_string()));
    }
}
