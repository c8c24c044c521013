//! Least-fixed-point nullability (§4.2(b)): can a rule match the empty
//! input? Needed before left-recursion analysis, since an item only hands
//! control to what follows it in a sequence when it can itself match empty.
use crate::model::{Grammar, Item, Rhs};
use std::collections::HashMap;

pub fn compute(grammar: &mut Grammar) {
    let mut nullable: HashMap<String, bool> = grammar
        .rules()
        .iter()
        .map(|r| (r.name.clone(), false))
        .collect();

    loop {
        let mut changed = false;
        for rule in grammar.rules() {
            let value = nullable_rhs(&rule.rhs, &nullable);
            if nullable[&rule.name] != value {
                nullable.insert(rule.name.clone(), value);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    for rule in grammar.rules_mut() {
        rule.flags.nullable = nullable[&rule.name];
    }
}

pub(super) fn nullable_rhs(rhs: &Rhs, nullable: &HashMap<String, bool>) -> bool {
    rhs.alts()
        .iter()
        .any(|alt| alt.items.iter().all(|named| nullable_item(&named.item, nullable)))
}

pub(super) fn nullable_item(item: &Item, nullable: &HashMap<String, bool>) -> bool {
    match item {
        Item::RuleRef(name) => nullable.get(name).copied().unwrap_or(false),
        Item::TokenRef(_) | Item::StringLit(_) => false,
        Item::Group(rhs) => nullable_rhs(rhs, nullable),
        Item::Optional(_) | Item::ZeroOrMore(_) => true,
        Item::OneOrMore(rhs) => nullable_rhs(rhs, nullable),
        Item::Separated(_, body) => nullable_rhs(body, nullable),
        Item::PositiveLookahead(_) | Item::NegativeLookahead(_) | Item::Cut => true,
    }
}
