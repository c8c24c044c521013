//! End-to-end scenario corpus driven entirely through the public API:
//! grammar source text in, a [pegen::eval::Value] or [pegen::SyntaxError]
//! out. Each scenario here has a matching unit-level test closer to the
//! mechanism it exercises; this file checks the same behavior survives the
//! full `compile` -> `Evaluator::parse` path a real caller would use.

use pegen::eval::{Evaluator, Token, Value};

fn tok(kind: &str, text: &str) -> Token {
    Token::new(kind, text, (0, 0))
}

#[test]
fn non_left_recursive_rule_with_two_items() {
    let grammar = pegen::compile("start: NUMBER ENDMARKER\n").unwrap();
    let tokens = vec![tok("NUMBER", "42"), tok("ENDMARKER", "")];
    let evaluator = Evaluator::new(&grammar, &tokens);
    let value = evaluator.parse().unwrap();
    match value {
        Value::Seq(items) => assert_eq!(items[0], Value::Token(0)),
        other => panic!("expected a Seq, got {:?}", other),
    }
}

#[test]
fn direct_left_recursion_is_left_associative() {
    let grammar = pegen::compile("start: e ENDMARKER\ne: e '+' NUMBER | NUMBER\n").unwrap();
    let tokens = vec![
        tok("NUMBER", "1"),
        tok("PLUS", "+"),
        tok("NUMBER", "2"),
        tok("PLUS", "+"),
        tok("NUMBER", "3"),
        tok("ENDMARKER", ""),
    ];
    let evaluator = Evaluator::new(&grammar, &tokens);
    assert!(evaluator.parse().is_ok());
}

#[test]
fn indirect_left_recursion_through_a_two_rule_cycle() {
    let grammar = pegen::compile("start: a ENDMARKER\na: b 'x' | NUMBER\nb: a 'y'\n").unwrap();
    let tokens = vec![
        tok("NUMBER", "1"),
        tok("y", "y"),
        tok("x", "x"),
        tok("ENDMARKER", ""),
    ];
    let evaluator = Evaluator::new(&grammar, &tokens);
    assert!(evaluator.parse().is_ok());
}

#[test]
fn cut_forbids_trying_the_sibling_alternative() {
    let grammar = pegen::compile("start: '(' ~ NAME ')' | NAME\n").unwrap();
    let tokens = vec![tok("LPAREN", "("), tok("NUMBER", "42"), tok("RPAREN", ")")];
    let evaluator = Evaluator::new(&grammar, &tokens);
    assert!(evaluator.parse().is_err());
}

#[test]
fn separated_list_drops_separators_from_the_value() {
    let grammar = pegen::compile("start: ','.NUMBER+ ENDMARKER\n").unwrap();
    let tokens = vec![
        tok("NUMBER", "1"),
        tok(",", ","),
        tok("NUMBER", "2"),
        tok(",", ","),
        tok("NUMBER", "3"),
        tok("ENDMARKER", ""),
    ];
    let evaluator = Evaluator::new(&grammar, &tokens);
    let value = evaluator.parse().unwrap();
    match value {
        Value::Seq(items) => match &items[0] {
            Value::Seq(numbers) => {
                assert_eq!(numbers, &[Value::Token(0), Value::Token(2), Value::Token(4)])
            }
            other => panic!("expected the list itself to be a Seq, got {:?}", other),
        },
        other => panic!("expected a Seq, got {:?}", other),
    }
}

#[test]
fn optional_then_mandatory_with_two_available_tokens() {
    let grammar = pegen::compile("start: 'a'? 'a' ENDMARKER\n").unwrap();
    let tokens = vec![tok("a", "a"), tok("a", "a"), tok("ENDMARKER", "")];
    let evaluator = Evaluator::new(&grammar, &tokens);
    assert!(evaluator.parse().is_ok());
}

#[test]
fn a_malformed_grammar_is_rejected_before_evaluation_begins() {
    let err = pegen::compile("start: ~ NAME\n").unwrap_err();
    assert!(!err.is_empty());
}

#[test]
fn an_undefined_rule_reference_is_rejected() {
    let err = pegen::compile("start: nowhere\n").unwrap_err();
    assert!(err
        .iter()
        .any(|e| matches!(e, pegen::GrammarError::UndefinedRule { .. })));
}

#[test]
fn a_short_match_is_a_syntax_error_even_though_a_prefix_matched() {
    let grammar = pegen::compile("start: NUMBER ENDMARKER\n").unwrap();
    let tokens = vec![tok("NUMBER", "1"), tok("NUMBER", "2"), tok("ENDMARKER", "")];
    let evaluator = Evaluator::new(&grammar, &tokens);
    assert!(evaluator.parse().is_err());
}
