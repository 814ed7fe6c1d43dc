use super::*;
use crate::tex::to_plain;

fn texts(tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(Token::tex).collect()
}

#[test]
fn each_call_advances_the_counter_by_one() {
    let mut cx = FormulaContext::default();
    assert_eq!(cx.counter().current(), 0);
    let a = cx.eval_of(["2"]);
    assert_eq!(a.counter(), 1);
    assert_eq!(cx.counter().current(), 1);
    let b = cx.eval_of(["3", "+", "4"]);
    assert_eq!(b.counter(), 2);
    let c = cx.refresh(&a);
    assert_eq!(c.counter(), 3);
    assert_eq!(cx.counter().current(), 3);
}

#[test]
fn wrapper_tokens_are_padded_eval_paren_fragments_paren() {
    let mut cx = FormulaContext::default();
    cx.eval_of(["0"]);
    let w = cx.eval_of(["2 + 2"]);
    assert_eq!(
        texts(w.tokens()),
        vec![
            r"  \mathrm{eval}".to_owned(),
            "  (".to_owned(),
            r"\mathtt{2 + 2}".to_owned(),
            "  )".to_owned(),
        ]
    );
}

#[test]
fn identical_fragments_never_share_full_tokens() {
    let mut cx = FormulaContext::default();
    let a = cx.eval_of(["2"]);
    let b = cx.eval_of(["2"]);
    assert_eq!(a.fragment_tokens(), b.fragment_tokens());
    assert_ne!(a.tokens(), b.tokens());
}

#[test]
fn refresh_keeps_fragments_and_changes_only_structural_tokens() {
    let mut cx = FormulaContext::default();
    let inner = cx.eval_of(["2 * 3"]);
    let outer = cx.eval_of([Fragment::from(&inner), Fragment::from("+"), "10 / 2".into()]);
    let fresh = cx.refresh(&outer);

    assert_eq!(fresh.fragments(), outer.fragments());
    assert_eq!(fresh.fragment_tokens(), outer.fragment_tokens());
    assert_eq!(fresh.tokens().len(), outer.tokens().len());

    let n = outer.tokens().len();
    for i in [0, 1, n - 1] {
        assert_ne!(fresh.tokens()[i], outer.tokens()[i]);
    }
    assert_eq!(&fresh.tokens()[2..n - 1], &outer.tokens()[2..n - 1]);
}

#[test]
fn nested_wrappers_flatten_into_fragment_tokens() {
    let mut cx = FormulaContext::default();
    let inner = cx.eval_of(["2"]);
    let outer = cx.eval_of([inner.clone()]);
    assert_eq!(outer.fragment_tokens(), inner.tokens());
    assert_eq!(outer.tokens().len(), inner.tokens().len() + 3);
}

#[test]
fn padding_is_invisible_after_conversion() {
    let mut cx = FormulaContext::default();
    let a = cx.eval_of(["2"]);
    let b = cx.eval_of(["2"]);
    let fa = cx.wrapper_formula(&a).unwrap();
    let fb = cx.wrapper_formula(&b).unwrap();
    assert_eq!(fa.text(), "eval(2)");
    assert_eq!(fa.text(), fb.text());
    assert_ne!(fa.parts()[0].tex, fb.parts()[0].tex);
    for tok in a.tokens() {
        let plain = to_plain(&tok.tex()).unwrap();
        assert_eq!(plain, plain.trim());
    }
}

#[test]
fn custom_palette_flows_into_formulas() {
    let cx = FormulaContext::with_palette(Palette {
        structural: crate::foundation::color::Color::BLUE,
        source: crate::foundation::color::Color::RED,
    });
    let f = cx
        .eval_tex(&[Token::structural("("), Token::source("x")])
        .unwrap();
    assert_eq!(f.parts()[0].color, crate::foundation::color::Color::BLUE);
    assert_eq!(f.parts()[1].color, crate::foundation::color::Color::RED);
}
