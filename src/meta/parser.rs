//! Hand-written recursive-descent recognizer that turns the token stream
//! from [super::lexer] directly into a [Grammar] (component B, §4.5). This
//! *is* the bootstrap: there is no generated parser underneath it, and none
//! is needed since code generation is out of scope for this core.
use super::lexer::{Lexer, Token, TokenKind};
use crate::error::GrammarError;
use crate::model::{Alt, Grammar, Item, NamedItem, Rhs, Rule};
use crate::util::{Code, Log, Position};
use std::collections::HashMap;

pub fn parse_grammar(src: &str) -> Result<Grammar, GrammarError> {
    Parser::new(src, Log::None)?.parse()
}

/// Same as [parse_grammar] but with the meta-parser's rule-by-rule trace
/// turned on (§2 ambient logging) — useful when a hand-written grammar
/// fails to parse and the failure point isn't obvious from the error alone.
pub fn parse_grammar_with_debug(src: &str, debug: Log<&'static str>) -> Result<Grammar, GrammarError> {
    Parser::new(src, debug)?.parse()
}

struct Parser<'s> {
    lexer: Lexer<'s>,
    code: Code<'s>,
    current: Token,
    rule_positions: HashMap<String, Position>,
    debug: Log<&'static str>,
}

impl<'s> Parser<'s> {
    fn new(src: &'s str, debug: Log<&'static str>) -> Result<Self, GrammarError> {
        let code = Code::new(src.as_bytes());
        let mut lexer = Lexer::new(src);
        let current = lexer.next_token(&code)?;
        Ok(Self {
            lexer,
            code,
            current,
            rule_positions: HashMap::new(),
            debug,
        })
    }

    fn pos(&self) -> Position {
        self.code.obtain_position(self.current.start)
    }

    fn bump(&mut self) -> Result<(), GrammarError> {
        self.current = self.lexer.next_token(&self.code)?;
        Ok(())
    }

    fn parse_error(&self, message: impl Into<String>) -> GrammarError {
        GrammarError::ParseError {
            at: self.pos(),
            message: message.into(),
        }
    }

    /// True iff the identifier under `current` begins the *next* rule
    /// (`NAME ('[' TYPE ']')? ':'`), checked without consuming anything:
    /// the grammar's `item` production never produces a bare `NAME` not
    /// immediately followed by `':'` as a rule header, so this lookahead
    /// unambiguously tells an item sequence from a new rule definition.
    fn at_rule_start(&self) -> bool {
        if !matches!(self.current.kind, TokenKind::Ident(_)) {
            return false;
        }
        let mut probe = self.lexer.clone();
        if probe.peek_char() == Some(b'[') {
            if probe.scan_return_type(&self.code).is_err() {
                return false;
            }
        }
        matches!(
            probe.next_token(&self.code),
            Ok(Token {
                kind: TokenKind::Colon,
                ..
            })
        )
    }

    fn parse(&mut self) -> Result<Grammar, GrammarError> {
        let mut grammar = Grammar::new();
        loop {
            match &self.current.kind {
                TokenKind::Eof => break,
                TokenKind::At => self.parse_directive(&mut grammar)?,
                TokenKind::Ident(_) => self.parse_rule(&mut grammar)?,
                other => {
                    return Err(self.parse_error(format!(
                        "expected a rule or `@directive`, found {:?}",
                        other
                    )))
                }
            }
        }
        Ok(grammar)
    }

    fn parse_directive(&mut self, grammar: &mut Grammar) -> Result<(), GrammarError> {
        self.bump()?; // '@'
        let key = self.expect_ident()?;
        let value = self.expect_str()?;
        grammar.push_directive(key, value);
        Ok(())
    }

    fn parse_rule(&mut self, grammar: &mut Grammar) -> Result<(), GrammarError> {
        let start_pos = self.pos();
        let byte_pos = self.current.start;
        self.debug.trace_entry(&self.code, byte_pos);
        let name = self.expect_ident()?;
        let return_type = if self.lexer.peek_char() == Some(b'[') {
            Some(self.lexer.scan_return_type(&self.code)?)
        } else {
            None
        };
        self.expect_colon()?;
        let rhs = self.parse_rhs()?;

        match grammar.push_rule(Rule::new(name.clone(), return_type, rhs, start_pos)) {
            Ok(_) => {
                self.rule_positions.insert(name, start_pos);
                self.debug.trace_result(&self.code, byte_pos, true, self.current.start);
                Ok(())
            }
            Err(_) => {
                self.debug.trace_result(&self.code, byte_pos, false, self.current.start);
                let first_at = self
                    .rule_positions
                    .get(&name)
                    .copied()
                    .unwrap_or(start_pos);
                Err(GrammarError::DuplicateRuleName {
                    name,
                    first_at,
                    second_at: start_pos,
                })
            }
        }
    }

    fn parse_rhs(&mut self) -> Result<Rhs, GrammarError> {
        if matches!(self.current.kind, TokenKind::Pipe) {
            self.bump()?;
        }
        let mut alts = vec![self.parse_alt()?];
        while matches!(self.current.kind, TokenKind::Pipe) {
            self.bump()?;
            alts.push(self.parse_alt()?);
        }
        Ok(Rhs::new(alts))
    }

    fn parse_alt(&mut self) -> Result<Alt, GrammarError> {
        let start = self.pos();
        let mut items = Vec::new();
        loop {
            if matches!(
                self.current.kind,
                TokenKind::Pipe
                    | TokenKind::Action(_)
                    | TokenKind::RParen
                    | TokenKind::RBracket
                    | TokenKind::Eof
                    | TokenKind::At
            ) {
                break;
            }
            if self.at_rule_start() {
                break;
            }
            items.push(self.parse_named_item()?);
        }
        if items.is_empty() {
            return Err(GrammarError::ParseError {
                at: start,
                message: "an alternative needs at least one item".into(),
            });
        }
        let action = if let TokenKind::Action(text) = self.current.kind.clone() {
            self.bump()?;
            Some(text)
        } else {
            None
        };
        let cut_index = items
            .iter()
            .position(|named: &NamedItem| matches!(named.item, Item::Cut));
        Ok(Alt {
            items,
            action,
            cut_index,
        })
    }

    /// `(NAME '=')? item` — the bind form needs one token of lookahead past
    /// the identifier, done with a throwaway lexer clone so a plain
    /// reference atom is never mistaken for the start of a binding.
    fn parse_named_item(&mut self) -> Result<NamedItem, GrammarError> {
        if let TokenKind::Ident(name) = &self.current.kind {
            let name = name.clone();
            let mut probe = self.lexer.clone();
            if let Ok(Token {
                kind: TokenKind::Equals,
                ..
            }) = probe.next_token(&self.code)
            {
                self.bump()?; // the identifier
                self.bump()?; // '='
                let item = self.parse_item()?;
                return Ok(NamedItem::named(name, item));
            }
        }
        Ok(NamedItem::bare(self.parse_item()?))
    }

    fn parse_item(&mut self) -> Result<Item, GrammarError> {
        let atom = self.parse_atom()?;
        match self.current.kind {
            TokenKind::Question => {
                self.bump()?;
                Ok(Item::Optional(into_operand_rhs(atom)))
            }
            TokenKind::Star => {
                self.bump()?;
                Ok(Item::ZeroOrMore(into_operand_rhs(atom)))
            }
            TokenKind::Plus => {
                self.bump()?;
                Ok(Item::OneOrMore(into_operand_rhs(atom)))
            }
            TokenKind::Dot => {
                self.bump()?;
                let elem = self.parse_atom()?;
                self.expect_plus()?;
                Ok(Item::Separated(Box::new(atom), into_operand_rhs(elem)))
            }
            _ => Ok(atom),
        }
    }

    fn parse_atom(&mut self) -> Result<Item, GrammarError> {
        match self.current.kind.clone() {
            TokenKind::Ident(name) => {
                self.bump()?;
                Ok(classify_ident(name))
            }
            TokenKind::Str(text) => {
                self.bump()?;
                Ok(Item::StringLit(text))
            }
            TokenKind::LParen => {
                self.bump()?;
                let rhs = self.parse_rhs()?;
                self.expect_rparen()?;
                Ok(Item::Group(rhs))
            }
            TokenKind::LBracket => {
                self.bump()?;
                let rhs = self.parse_rhs()?;
                self.expect_rbracket()?;
                Ok(Item::Optional(rhs))
            }
            TokenKind::Amp => {
                self.bump()?;
                let inner = self.parse_atom()?;
                Ok(Item::PositiveLookahead(into_operand_rhs(inner)))
            }
            TokenKind::Bang => {
                self.bump()?;
                let inner = self.parse_atom()?;
                Ok(Item::NegativeLookahead(into_operand_rhs(inner)))
            }
            TokenKind::Tilde => {
                self.bump()?;
                Ok(Item::Cut)
            }
            other => Err(self.parse_error(format!("expected an item, found {:?}", other))),
        }
    }

    fn expect_ident(&mut self) -> Result<String, GrammarError> {
        match self.current.kind.clone() {
            TokenKind::Ident(name) => {
                self.bump()?;
                Ok(name)
            }
            other => Err(self.parse_error(format!("expected an identifier, found {:?}", other))),
        }
    }

    fn expect_str(&mut self) -> Result<String, GrammarError> {
        match self.current.kind.clone() {
            TokenKind::Str(text) => {
                self.bump()?;
                Ok(text)
            }
            other => Err(self.parse_error(format!("expected a string literal, found {:?}", other))),
        }
    }

    fn expect_colon(&mut self) -> Result<(), GrammarError> {
        match self.current.kind {
            TokenKind::Colon => self.bump(),
            ref other => Err(self.parse_error(format!("expected `:`, found {:?}", other))),
        }
    }

    fn expect_rparen(&mut self) -> Result<(), GrammarError> {
        match self.current.kind {
            TokenKind::RParen => self.bump(),
            ref other => Err(self.parse_error(format!("expected `)`, found {:?}", other))),
        }
    }

    fn expect_rbracket(&mut self) -> Result<(), GrammarError> {
        match self.current.kind {
            TokenKind::RBracket => self.bump(),
            ref other => Err(self.parse_error(format!("expected `]`, found {:?}", other))),
        }
    }

    fn expect_plus(&mut self) -> Result<(), GrammarError> {
        match self.current.kind {
            TokenKind::Plus => self.bump(),
            ref other => Err(self.parse_error(format!(
                "expected `+` to close a separated-list item, found {:?}",
                other
            ))),
        }
    }
}

/// Token-kind naming convention carried over from the pegen lineage this
/// core descends from: an all-uppercase identifier names a lexical token
/// kind, anything with a lowercase letter names a rule.
fn classify_ident(name: String) -> Item {
    if name.chars().any(|c| c.is_ascii_lowercase()) {
        Item::RuleRef(name)
    } else {
        Item::TokenRef(name)
    }
}

/// Wrap a suffix/lookahead operand as an [Rhs]: reuse a parenthesized
/// group's Rhs directly rather than nesting it in another singleton, since
/// `(rhs)?` and a hypothetical doubly-wrapped form are the same grammar.
fn into_operand_rhs(item: Item) -> Rhs {
    match item {
        Item::Group(rhs) => rhs,
        other => Rhs::singleton(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_rule() {
        let grammar = parse_grammar("start: NAME\n").unwrap();
        let rule = grammar.rule("start").unwrap();
        assert_eq!(rule.rhs.alts().len(), 1);
        assert_eq!(rule.rhs.alts()[0].items.len(), 1);
        assert_eq!(rule.rhs.alts()[0].items[0].item, Item::TokenRef("NAME".into()));
    }

    #[test]
    fn leading_pipe_and_multiple_alternatives() {
        let grammar = parse_grammar("start:\n    | NAME\n    | NUMBER\n").unwrap();
        let rule = grammar.rule("start").unwrap();
        assert_eq!(rule.rhs.alts().len(), 2);
        assert_eq!(rule.rhs.alts()[0].items[0].item, Item::TokenRef("NAME".into()));
        assert_eq!(rule.rhs.alts()[1].items[0].item, Item::TokenRef("NUMBER".into()));
    }

    #[test]
    fn return_type_is_parsed() {
        let grammar = parse_grammar("start[i64]: NUMBER\n").unwrap();
        let rule = grammar.rule("start").unwrap();
        assert_eq!(rule.return_type.as_deref(), Some("i64"));
    }

    #[test]
    fn named_bindings_attach_to_their_item() {
        let grammar = parse_grammar("start: a=NAME b=NUMBER\n").unwrap();
        let alt = &grammar.rule("start").unwrap().rhs.alts()[0];
        assert_eq!(alt.items[0].bind.as_deref(), Some("a"));
        assert_eq!(alt.items[1].bind.as_deref(), Some("b"));
    }

    #[test]
    fn plain_reference_is_not_mistaken_for_a_binding() {
        let grammar = parse_grammar("start: name\nname: NAME\n").unwrap();
        let alt = &grammar.rule("start").unwrap().rhs.alts()[0];
        assert_eq!(alt.items[0].bind, None);
        assert_eq!(alt.items[0].item, Item::RuleRef("name".into()));
    }

    #[test]
    fn all_suffix_operators_and_lookaheads() {
        let grammar = parse_grammar("start: NAME? NAME* NAME+ &NAME !NAME\n").unwrap();
        let items = &grammar.rule("start").unwrap().rhs.alts()[0].items;
        assert!(matches!(items[0].item, Item::Optional(_)));
        assert!(matches!(items[1].item, Item::ZeroOrMore(_)));
        assert!(matches!(items[2].item, Item::OneOrMore(_)));
        assert!(matches!(items[3].item, Item::PositiveLookahead(_)));
        assert!(matches!(items[4].item, Item::NegativeLookahead(_)));
    }

    #[test]
    fn separated_list_operator() {
        let grammar = parse_grammar("start: NAME.','+\n").unwrap();
        let item = &grammar.rule("start").unwrap().rhs.alts()[0].items[0].item;
        match item {
            Item::Separated(elem, sep) => {
                assert_eq!(**elem, Item::TokenRef("NAME".into()));
                assert_eq!(sep.alts().len(), 1);
                assert_eq!(sep.alts()[0].items[0].item, Item::StringLit(",".into()));
            }
            other => panic!("expected Separated, got {:?}", other),
        }
    }

    #[test]
    fn optional_bracket_sugar_is_equivalent_to_question_mark() {
        let grammar = parse_grammar("start: [NAME]\n").unwrap();
        let item = &grammar.rule("start").unwrap().rhs.alts()[0].items[0].item;
        assert!(matches!(item, Item::Optional(_)));
    }

    #[test]
    fn cut_index_is_recorded_mid_alternative() {
        let grammar = parse_grammar("start: NAME ~ NUMBER\n").unwrap();
        let alt = &grammar.rule("start").unwrap().rhs.alts()[0];
        assert_eq!(alt.cut_index, Some(1));
    }

    #[test]
    fn action_text_is_captured_verbatim() {
        let grammar = parse_grammar("start: NAME { n.to_string() }\n").unwrap();
        let alt = &grammar.rule("start").unwrap().rhs.alts()[0];
        assert_eq!(alt.action.as_deref(), Some(" n.to_string() "));
    }

    #[test]
    fn metadirective_is_recorded() {
        let grammar = parse_grammar("@start \"main\"\nmain: NAME\n").unwrap();
        assert_eq!(grammar.directive("start"), Some("main"));
    }

    #[test]
    fn duplicate_rule_name_is_rejected() {
        let err = parse_grammar("start: NAME\nstart: NUMBER\n").unwrap_err();
        assert!(matches!(err, GrammarError::DuplicateRuleName { .. }));
    }

    #[test]
    fn group_parenthesization_round_trips_through_the_model() {
        let grammar = parse_grammar("start: (NAME NUMBER)?\n").unwrap();
        let item = &grammar.rule("start").unwrap().rhs.alts()[0].items[0].item;
        match item {
            Item::Optional(rhs) => assert_eq!(rhs.alts()[0].items.len(), 2),
            other => panic!("expected Optional(Group), got {:?}", other),
        }
    }

    #[test]
    fn missing_colon_is_a_parse_error() {
        let err = parse_grammar("start NAME\n").unwrap_err();
        assert!(matches!(err, GrammarError::ParseError { .. }));
    }
}
