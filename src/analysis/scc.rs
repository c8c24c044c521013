//! Left-call graph construction, Tarjan SCC, and leader election (§4.2(c)).
//! A rule is left-recursive if it can reach itself through a chain of
//! leftmost, non-consuming-so-far invocations. Each such cycle elects the
//! lexicographically least rule name as its leader: seed-growing during
//! evaluation installs its failing seed only at the leader.
use super::nullability::{nullable_item, nullable_rhs};
use crate::model::{Grammar, Item, Rhs};
use std::collections::{HashMap, HashSet};

pub fn compute(grammar: &mut Grammar) {
    let nullable: HashMap<String, bool> = grammar
        .rules()
        .iter()
        .map(|r| (r.name.clone(), r.flags.nullable))
        .collect();

    let edges: Vec<Vec<usize>> = grammar
        .rules()
        .iter()
        .map(|rule| {
            let mut names = HashSet::new();
            left_calls_rhs(&rule.rhs, &nullable, &mut names);
            let mut idxs: Vec<usize> = names
                .into_iter()
                .filter_map(|name| grammar.rule_index(&name))
                .collect();
            idxs.sort_unstable();
            idxs
        })
        .collect();

    let sccs = tarjan(&edges);
    let ref_counts = reference_counts(grammar);

    let mut scc_of_rule = vec![0usize; grammar.rules().len()];
    let mut scc_members: HashMap<usize, Vec<usize>> = HashMap::new();

    for (scc_id, scc) in sccs.iter().enumerate() {
        for &i in scc {
            scc_of_rule[i] = scc_id;
        }
        scc_members.insert(scc_id, scc.clone());

        let self_loop = scc.len() == 1 && edges[scc[0]].contains(&scc[0]);
        let recursive = scc.len() > 1 || self_loop;
        if !recursive {
            continue;
        }
        let leader = *scc
            .iter()
            .min_by_key(|&&i| grammar.rules()[i].name.as_str())
            .unwrap();
        for &i in scc {
            let rule = &mut grammar.rules_mut()[i];
            rule.flags.left_recursive = true;
            if i == leader {
                rule.flags.leader = true;
                rule.flags.memoize = true;
            }
        }
    }

    for (i, rule) in grammar.rules_mut().iter_mut().enumerate() {
        if ref_counts.get(&i).copied().unwrap_or(0) > 1 {
            rule.flags.memoize = true;
        }
    }

    grammar.set_scc_table(scc_of_rule, scc_members);
}

/// Names of rules that `rhs` can invoke before consuming any input. Walks
/// each alternative left to right, stopping after the first item that is
/// not itself nullable — everything past that point is no longer leftmost.
fn left_calls_rhs(rhs: &Rhs, nullable: &HashMap<String, bool>, out: &mut HashSet<String>) {
    for alt in rhs.alts() {
        for named in &alt.items {
            let item_nullable = left_calls_item(&named.item, nullable, out);
            if !item_nullable {
                break;
            }
        }
    }
}

fn left_calls_item(item: &Item, nullable: &HashMap<String, bool>, out: &mut HashSet<String>) -> bool {
    match item {
        Item::RuleRef(name) => {
            out.insert(name.clone());
            nullable.get(name).copied().unwrap_or(false)
        }
        Item::TokenRef(_) | Item::StringLit(_) => false,
        Item::Group(rhs) => {
            left_calls_rhs(rhs, nullable, out);
            nullable_rhs(rhs, nullable)
        }
        Item::Optional(rhs) => {
            left_calls_rhs(rhs, nullable, out);
            true
        }
        Item::ZeroOrMore(rhs) => {
            left_calls_rhs(rhs, nullable, out);
            true
        }
        Item::OneOrMore(rhs) => {
            left_calls_rhs(rhs, nullable, out);
            nullable_rhs(rhs, nullable)
        }
        Item::Separated(_, body) => {
            // the separator only ever appears after one element has
            // already matched, so it is never a leftmost call.
            left_calls_rhs(body, nullable, out);
            nullable_rhs(body, nullable)
        }
        Item::PositiveLookahead(rhs) | Item::NegativeLookahead(rhs) => {
            left_calls_rhs(rhs, nullable, out);
            true
        }
        Item::Cut => true,
    }
}

fn reference_counts(grammar: &Grammar) -> HashMap<usize, usize> {
    let mut counts = HashMap::new();
    for rule in grammar.rules() {
        super::walk_rhs(&rule.rhs, &mut |item| {
            if let Item::RuleRef(name) = item {
                if let Some(idx) = grammar.rule_index(name) {
                    *counts.entry(idx).or_insert(0) += 1;
                }
            }
        });
    }
    counts
}

/// Tarjan's strongly connected components. Returns components in no
/// particular order; within a component, order is unspecified too — the
/// caller picks its own leader by name.
fn tarjan(edges: &[Vec<usize>]) -> Vec<Vec<usize>> {
    struct State<'e> {
        edges: &'e [Vec<usize>],
        index: Vec<Option<usize>>,
        lowlink: Vec<usize>,
        on_stack: Vec<bool>,
        stack: Vec<usize>,
        next_index: usize,
        sccs: Vec<Vec<usize>>,
    }

    fn visit(v: usize, st: &mut State) {
        st.index[v] = Some(st.next_index);
        st.lowlink[v] = st.next_index;
        st.next_index += 1;
        st.stack.push(v);
        st.on_stack[v] = true;

        for &w in &st.edges[v].clone() {
            if st.index[w].is_none() {
                visit(w, st);
                st.lowlink[v] = st.lowlink[v].min(st.lowlink[w]);
            } else if st.on_stack[w] {
                st.lowlink[v] = st.lowlink[v].min(st.index[w].unwrap());
            }
        }

        if st.lowlink[v] == st.index[v].unwrap() {
            let mut component = Vec::new();
            loop {
                let w = st.stack.pop().unwrap();
                st.on_stack[w] = false;
                component.push(w);
                if w == v {
                    break;
                }
            }
            st.sccs.push(component);
        }
    }

    let n = edges.len();
    let mut st = State {
        edges,
        index: vec![None; n],
        lowlink: vec![0; n],
        on_stack: vec![false; n],
        stack: Vec::new(),
        next_index: 0,
        sccs: Vec::new(),
    };
    for start in 0..n {
        if st.index[start].is_none() {
            visit(start, &mut st);
        }
    }
    st.sccs
}
