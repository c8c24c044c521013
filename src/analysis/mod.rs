//! Component C: static analysis of a [Grammar] prior to evaluation (§4.2).
//! Reference resolution and the other structural checks run first and
//! aggregate every failure they find; nullability and left-recursion only
//! run once the grammar is known to be structurally sound, since both
//! assume every `RuleRef` resolves.
mod nullability;
mod scc;

use crate::error::GrammarError;
use crate::model::{Grammar, Item, Rhs};
use std::collections::HashSet;
use std::ops::Deref;

/// A [Grammar] that has passed [analyze]: every reference resolves and
/// every [crate::model::RuleFlags] is final. The evaluator (component D)
/// only accepts this type, never a bare [Grammar] — so a caller cannot
/// feed it an unanalyzed grammar by forgetting to call [analyze] (see
/// DESIGN.md Open Question (b)).
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedGrammar(Grammar);

impl Deref for AnalyzedGrammar {
    type Target = Grammar;
    fn deref(&self) -> &Grammar {
        &self.0
    }
}

impl AnalyzedGrammar {
    /// Discard the analyzed-ness marker and recover the plain model, e.g.
    /// to re-render it with [Grammar::to_source].
    pub fn into_inner(self) -> Grammar {
        self.0
    }
}

/// Resolve references, check the remaining structural invariants, then
/// compute nullability and left-recursion flags. On success every
/// [crate::model::RuleFlags] is final and the result can be handed to the
/// evaluator.
pub fn analyze(mut grammar: Grammar) -> Result<AnalyzedGrammar, Vec<GrammarError>> {
    let mut errors = Vec::new();

    resolve_references(&grammar, &mut errors);
    check_alts(&grammar, &mut errors);
    if grammar.entry_rule_name().is_none() {
        errors.push(GrammarError::NoStartRule);
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    nullability::compute(&mut grammar);
    scc::compute(&mut grammar);
    Ok(AnalyzedGrammar(grammar))
}

fn resolve_references(grammar: &Grammar, errors: &mut Vec<GrammarError>) {
    for rule in grammar.rules() {
        walk_rhs(&rule.rhs, &mut |item| {
            if let Item::RuleRef(name) = item {
                if grammar.rule(name).is_none() {
                    errors.push(GrammarError::UndefinedRule {
                        name: name.clone(),
                        referenced_at: rule.at,
                    });
                }
            }
        });
    }
}

/// Per-alternative checks: a `~` may only appear after at least one other
/// item, and a binding name may only be used once within one alternative.
fn check_alts(grammar: &Grammar, errors: &mut Vec<GrammarError>) {
    for rule in grammar.rules() {
        walk_alts(&rule.rhs, &mut |alt| {
            if alt.cut_index == Some(0) {
                errors.push(GrammarError::CutAtAlternativeStart {
                    rule: rule.name.clone(),
                    at: rule.at,
                });
            }
            let mut seen = HashSet::new();
            for named in &alt.items {
                if let Some(bind) = &named.bind {
                    if !seen.insert(bind.clone()) {
                        errors.push(GrammarError::DuplicateBindingInAlt {
                            name: bind.clone(),
                            rule: rule.name.clone(),
                            at: rule.at,
                        });
                    }
                }
            }
        });
    }
}

fn walk_alts(rhs: &Rhs, f: &mut dyn FnMut(&crate::model::Alt)) {
    for alt in rhs.alts() {
        f(alt);
        for named in &alt.items {
            walk_item_alts(&named.item, f);
        }
    }
}

fn walk_item_alts(item: &Item, f: &mut dyn FnMut(&crate::model::Alt)) {
    match item {
        Item::Group(rhs)
        | Item::Optional(rhs)
        | Item::ZeroOrMore(rhs)
        | Item::OneOrMore(rhs)
        | Item::PositiveLookahead(rhs)
        | Item::NegativeLookahead(rhs) => walk_alts(rhs, f),
        Item::Separated(sep, body) => {
            walk_item_alts(sep, f);
            walk_alts(body, f);
        }
        Item::RuleRef(_) | Item::TokenRef(_) | Item::StringLit(_) | Item::Cut => {}
    }
}

/// Visit every [Item] reachable from `rhs`, including itself recursively
/// through grouping/repetition/lookahead/separated constructs. Shared by
/// reference resolution and the analyzer's reference-count pass.
pub(super) fn walk_rhs(rhs: &Rhs, f: &mut dyn FnMut(&Item)) {
    for alt in rhs.alts() {
        for named in &alt.items {
            walk_item(&named.item, f);
        }
    }
}

fn walk_item(item: &Item, f: &mut dyn FnMut(&Item)) {
    f(item);
    match item {
        Item::Group(rhs)
        | Item::Optional(rhs)
        | Item::ZeroOrMore(rhs)
        | Item::OneOrMore(rhs)
        | Item::PositiveLookahead(rhs)
        | Item::NegativeLookahead(rhs) => walk_rhs(rhs, f),
        Item::Separated(sep, body) => {
            walk_item(sep, f);
            walk_rhs(body, f);
        }
        Item::RuleRef(_) | Item::TokenRef(_) | Item::StringLit(_) | Item::Cut => {}
    }
}
