use super::*;
use crate::formula::eval_of::FormulaContext;

#[test]
fn equal_keys_pair_in_order_of_occurrence() {
    let m = match_parts(&["a", "+", "a"], &["a", "a", "*"]);
    assert_eq!(m.pairs, vec![(0, 0), (2, 1)]);
    assert_eq!(m.fade_out, vec![1]);
    assert_eq!(m.fade_in, vec![2]);
}

#[test]
fn extra_occurrences_fade() {
    let m = match_parts(&["x", "x", "x"], &["x"]);
    assert_eq!(m.pairs, vec![(0, 0)]);
    assert_eq!(m.fade_out, vec![1, 2]);
    assert!(m.fade_in.is_empty());
}

#[test]
fn padded_wrapper_tokens_do_not_pair_across_calls() {
    let mut cx = FormulaContext::default();
    let a = cx.eval_of(["2"]);
    let b = cx.refresh(&a);
    let ka: Vec<String> = a.tokens().iter().map(|t| t.tex()).collect();
    let kb: Vec<String> = b.tokens().iter().map(|t| t.tex()).collect();
    let m = match_parts(&ka, &kb);
    // Only the source fragment is shared.
    assert_eq!(m.pairs, vec![(2, 2)]);
    assert_eq!(m.fade_out, vec![0, 1, 3]);
    assert_eq!(m.fade_in, vec![0, 1, 3]);
}

#[test]
fn same_wrapper_pairs_completely() {
    let mut cx = FormulaContext::default();
    let a = cx.eval_of(["10 / 2"]);
    let keys: Vec<String> = a.tokens().iter().map(|t| t.tex()).collect();
    let m = match_parts(&keys, &keys);
    assert_eq!(m.pairs.len(), keys.len());
    assert!(m.fade_out.is_empty() && m.fade_in.is_empty());
}
