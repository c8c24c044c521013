use super::{Alt, Grammar, Item, NamedItem, Rhs};
use std::fmt::{self, Display, Formatter, Write};

impl Display for Grammar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_source())
    }
}

impl Grammar {
    /// Render the model back to the grammar-file format of §6. Re-parsing
    /// the result must yield a structurally identical [Grammar] — the
    /// round-trip property of the spec — modulo whitespace, comment
    /// placement and `|`-prefix formatting, neither of which the model
    /// retains.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.directives {
            let _ = writeln!(out, "@{} \"{}\"", key, escape_string(value));
        }
        if !self.directives.is_empty() {
            out.push('\n');
        }
        for rule in &self.rules {
            render_rule(rule, &mut out);
        }
        out
    }
}

fn render_rule(rule: &super::Rule, out: &mut String) {
    out.push_str(&rule.name);
    if let Some(rt) = &rule.return_type {
        let _ = write!(out, "[{}]", rt);
    }
    out.push_str(":\n");
    for alt in rule.rhs.alts() {
        out.push_str("    | ");
        render_alt(alt, out);
        out.push('\n');
    }
    out.push('\n');
}

fn render_alt(alt: &Alt, out: &mut String) {
    for (i, named) in alt.items.iter().enumerate() {
        if i != 0 {
            out.push(' ');
        }
        render_named_item(named, out);
    }
    if let Some(action) = &alt.action {
        let _ = write!(out, " {{{}}}", action);
    }
}

fn render_named_item(named: &NamedItem, out: &mut String) {
    if let Some(bind) = &named.bind {
        let _ = write!(out, "{}=", bind);
    }
    render_item(&named.item, out);
}

/// Render `item` as a surface `item` (atom plus optional suffix).
fn render_item(item: &Item, out: &mut String) {
    match item {
        Item::Optional(rhs) => {
            render_suffix_operand(rhs, out);
            out.push('?');
        }
        Item::ZeroOrMore(rhs) => {
            render_suffix_operand(rhs, out);
            out.push('*');
        }
        Item::OneOrMore(rhs) => {
            render_suffix_operand(rhs, out);
            out.push('+');
        }
        Item::Separated(sep, body) => {
            render_atom(sep, out);
            out.push('.');
            render_suffix_operand(body, out);
            out.push('+');
        }
        other => render_atom(other, out),
    }
}

/// Render `item` as a surface `atom` — wrapping in parens whenever `item`
/// is itself a suffixed form, since the grammar's `atom` production does
/// not include suffixes directly.
fn render_atom(item: &Item, out: &mut String) {
    match item {
        Item::RuleRef(name) | Item::TokenRef(name) => out.push_str(name),
        Item::StringLit(text) => {
            out.push('\'');
            out.push_str(&escape_string(text));
            out.push('\'');
        }
        Item::Group(rhs) => {
            out.push('(');
            render_rhs_inline(rhs, out);
            out.push(')');
        }
        Item::PositiveLookahead(rhs) => {
            out.push('&');
            render_suffix_operand(rhs, out);
        }
        Item::NegativeLookahead(rhs) => {
            out.push('!');
            render_suffix_operand(rhs, out);
        }
        Item::Cut => out.push('~'),
        suffixed => {
            out.push('(');
            render_item(suffixed, out);
            out.push(')');
        }
    }
}

/// Render the operand of a suffix/lookahead: bare atom if `rhs` is a
/// trivial one-alt, one-item wrapper (the common case produced by the
/// parser for `atom suffix`), else a parenthesized group.
fn render_suffix_operand(rhs: &Rhs, out: &mut String) {
    match singleton_item(rhs) {
        Some(item) => render_atom(item, out),
        None => {
            out.push('(');
            render_rhs_inline(rhs, out);
            out.push(')');
        }
    }
}

fn render_rhs_inline(rhs: &Rhs, out: &mut String) {
    for (i, alt) in rhs.alts().iter().enumerate() {
        if i != 0 {
            out.push_str(" | ");
        }
        render_alt(alt, out);
    }
}

fn singleton_item(rhs: &Rhs) -> Option<&Item> {
    if rhs.alts().len() != 1 {
        return None;
    }
    let alt = &rhs.alts()[0];
    if alt.items.len() != 1 || alt.action.is_some() {
        return None;
    }
    let named = &alt.items[0];
    if named.bind.is_some() {
        return None;
    }
    Some(&named.item)
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}
