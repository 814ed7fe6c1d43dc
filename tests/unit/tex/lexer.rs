use super::*;

fn kinds(input: &str) -> Vec<TokenKind> {
    lex(input).unwrap().into_iter().map(|t| t.kind).collect()
}

#[test]
fn commands_and_groups() {
    assert_eq!(
        kinds(r"\mathtt{2}"),
        vec![
            TokenKind::Command("mathtt".to_owned()),
            TokenKind::BeginGroup,
            TokenKind::Char('2'),
            TokenKind::EndGroup,
        ]
    );
}

#[test]
fn control_symbols_and_whitespace_runs() {
    assert_eq!(
        kinds("\\ +\\   x"),
        vec![
            TokenKind::ControlSymbol(' '),
            TokenKind::Char('+'),
            TokenKind::ControlSymbol(' '),
            TokenKind::Space,
            TokenKind::Char('x'),
        ]
    );
}

#[test]
fn leading_padding_is_one_space_token() {
    let toks = lex("   \\mathrm{eval}").unwrap();
    assert_eq!(toks[0].kind, TokenKind::Space);
    assert_eq!(toks[0].span, Span { start: 0, end: 3 });
    assert_eq!(toks[1].kind, TokenKind::Command("mathrm".to_owned()));
    assert_eq!(toks[1].span.start, 3);
}

#[test]
fn sub_sup_align_tilde() {
    assert_eq!(
        kinds("E_1^2&~"),
        vec![
            TokenKind::Char('E'),
            TokenKind::Sub,
            TokenKind::Char('1'),
            TokenKind::Sup,
            TokenKind::Char('2'),
            TokenKind::Align,
            TokenKind::Tilde,
        ]
    );
}

#[test]
fn dangling_backslash_is_an_error() {
    let err = lex("x\\").unwrap_err();
    assert!(err.to_string().contains("byte 1"));
}
