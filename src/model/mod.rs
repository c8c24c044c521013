//! The Grammar model (component A): an ordered, name-indexed tree of rules,
//! alternatives and items, immutable once [crate::analysis::analyze] has run.
//!
//! Equal trees denote equal grammars; the set of [Item] variants is closed —
//! a new surface construct is a new variant here, not an escape hatch.
mod display;

use crate::util::Position;
use std::collections::HashMap;

/// An ordered collection of [Rule]s plus free-form metadata directives.
/// Insertion order is preserved throughout so a pretty-printed grammar and a
/// future code generator both see rules in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
    rules: Vec<Rule>,
    index: HashMap<String, usize>,
    directives: Vec<(String, String)>,
    /// Left-call SCC id per rule index, and the members of each SCC.
    /// Populated once by [crate::analysis::analyze]; empty before it runs.
    /// A side table rather than a [Rule] field since only the evaluator's
    /// seed-growing invalidation (§5) needs the membership direction, and
    /// storing it once avoids recomputing Tarjan's algorithm per lookup.
    scc_of_rule: Vec<usize>,
    scc_members: HashMap<usize, Vec<usize>>,
}

impl Grammar {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            index: HashMap::new(),
            directives: Vec::new(),
            scc_of_rule: Vec::new(),
            scc_members: HashMap::new(),
        }
    }

    /// Appends `rule`. Returns `Err(existing_index)` without inserting if a
    /// rule with the same name is already present — the caller (the
    /// meta-parser or the analyzer) decides how to report that as
    /// [crate::GrammarError::DuplicateRuleName].
    pub fn push_rule(&mut self, rule: Rule) -> Result<usize, usize> {
        if let Some(&existing) = self.index.get(&rule.name) {
            return Err(existing);
        }
        let idx = self.rules.len();
        self.index.insert(rule.name.clone(), idx);
        self.rules.push(rule);
        Ok(idx)
    }

    pub fn push_directive(&mut self, key: String, value: String) {
        self.directives.push((key, value));
    }

    pub fn directive(&self, key: &str) -> Option<&str> {
        self.directives
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn directives(&self) -> &[(String, String)] {
        &self.directives
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut [Rule] {
        &mut self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.index.get(name).map(|&i| &self.rules[i])
    }

    pub fn rule_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn rule_mut(&mut self, name: &str) -> Option<&mut Rule> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.rules[i]),
            None => None,
        }
    }

    /// The `start` metadata directive if present, else a rule literally
    /// named `start`. `None` means [crate::GrammarError::NoStartRule].
    pub fn entry_rule_name(&self) -> Option<&str> {
        self.directive("start")
            .or_else(|| self.rule("start").map(|r| r.name.as_str()))
    }

    /// Install the left-call SCC decomposition. Called exactly once, by
    /// [crate::analysis::scc::compute].
    pub(crate) fn set_scc_table(&mut self, scc_of_rule: Vec<usize>, scc_members: HashMap<usize, Vec<usize>>) {
        self.scc_of_rule = scc_of_rule;
        self.scc_members = scc_members;
    }

    /// The SCC id of the rule at `rule_index`, for evaluator invalidation
    /// grouping. `None` before analysis has run.
    pub fn scc_id_of(&self, rule_index: usize) -> Option<usize> {
        self.scc_of_rule.get(rule_index).copied()
    }

    /// Every rule index sharing `scc_id`'s left-call cycle, including
    /// singleton (non-recursive) components.
    pub fn scc_members(&self, scc_id: usize) -> &[usize] {
        self.scc_members.get(&scc_id).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

/// `(name, return_type?, rhs, flags)` from §3. `flags` start at all-`false`
/// and are the only fields the analyzer mutates. `at` is the rule header's
/// source position: items and alts don't carry their own spans, so the
/// analyzer reports semantic errors found within a rule at this position
/// rather than at the exact sub-expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub name: String,
    pub return_type: Option<String>,
    pub rhs: Rhs,
    pub flags: RuleFlags,
    pub at: Position,
}

impl Rule {
    pub fn new(name: String, return_type: Option<String>, rhs: Rhs, at: Position) -> Self {
        Self {
            name,
            return_type,
            rhs,
            flags: RuleFlags::default(),
            at,
        }
    }
}

/// Flags computed by the analyzer; see §3 invariant 4 and §4.2(c).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleFlags {
    /// Head of a left-recursion cycle; installs seed-growing memoization.
    pub leader: bool,
    /// Participates in some left-recursion cycle (possibly as leader).
    pub left_recursive: bool,
    /// Can match the empty input.
    pub nullable: bool,
    /// Memoization required. Always true for `leader`; the analyzer may
    /// also set it for rules referenced more than once, purely as a
    /// performance hint with no observable semantic effect.
    pub memoize: bool,
}

/// An ordered, non-empty sequence of alternatives.
#[derive(Debug, Clone, PartialEq)]
pub struct Rhs(pub Vec<Alt>);

impl Rhs {
    pub fn new(alts: Vec<Alt>) -> Self {
        debug_assert!(!alts.is_empty(), "Rhs must have at least one Alt");
        Self(alts)
    }

    pub fn alts(&self) -> &[Alt] {
        &self.0
    }

    /// Wrap a single bare item as a one-alt, one-item Rhs — used when a
    /// suffix operator (`?`, `*`, `+`, the separated-list form) applies to
    /// an atom that was not itself a parenthesized group.
    pub fn singleton(item: Item) -> Self {
        Self(vec![Alt::new(vec![NamedItem::bare(item)])])
    }
}

/// `(items, action?, cut_index?)` from §3.
#[derive(Debug, Clone, PartialEq)]
pub struct Alt {
    pub items: Vec<NamedItem>,
    pub action: Option<String>,
    pub cut_index: Option<usize>,
}

impl Alt {
    pub fn new(items: Vec<NamedItem>) -> Self {
        debug_assert!(!items.is_empty(), "Alt must have at least one item");
        Self {
            items,
            action: None,
            cut_index: None,
        }
    }

    pub fn with_action(mut self, action: Option<String>) -> Self {
        self.action = action;
        self
    }
}

/// `(bind?, item)` — `bind` exposes the item's value under that name in the
/// action's lexical scope.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedItem {
    pub bind: Option<String>,
    pub item: Item,
}

impl NamedItem {
    pub fn bare(item: Item) -> Self {
        Self { bind: None, item }
    }
    pub fn named(bind: String, item: Item) -> Self {
        Self {
            bind: Some(bind),
            item,
        }
    }
}

/// The closed set of grammar item kinds (§3). Adding a surface construct
/// means adding a variant here, not smuggling it through an existing one.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    RuleRef(String),
    TokenRef(String),
    StringLit(String),
    Group(Rhs),
    Optional(Rhs),
    ZeroOrMore(Rhs),
    OneOrMore(Rhs),
    /// `elem (sep elem)*` — one element, then zero or more `separator
    /// element` pairs; separator values are discarded from the result.
    Separated(Box<Item>, Rhs),
    PositiveLookahead(Rhs),
    NegativeLookahead(Rhs),
    Cut,
}
