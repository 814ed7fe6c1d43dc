use super::*;

#[test]
fn eval_call_renders_without_padding() {
    assert_eq!(to_plain(r"\mathrm{eval}").unwrap(), "eval");
    assert_eq!(to_plain(r"     \mathrm{eval}").unwrap(), "eval");
    assert_eq!(to_plain("   (").unwrap(), "(");
    assert_eq!(
        to_plain(r"\mathrm{eval}( {{\mathtt{2 + 2}}})").unwrap(),
        "eval(2 + 2)"
    );
}

#[test]
fn source_fragments_keep_inner_spacing() {
    assert_eq!(to_plain(r"\mathtt{2 * 3}").unwrap(), "2 * 3");
    assert_eq!(to_plain(r"\mathtt{ 2 * 3}").unwrap(), "2 * 3");
    assert_eq!(to_plain(r"\mathtt{\ +\ }").unwrap(), "+");
    assert_eq!(to_plain(r"\mathtt{1 + {{true}}}").unwrap(), "1 + true");
}

#[test]
fn math_mode_spaces_operators() {
    assert_eq!(to_plain("x^2 - x - 2 = 0").unwrap(), "x² − x − 2 = 0");
    assert_eq!(to_plain("(x - 2)(x + 1) = 0").unwrap(), "(x − 2)(x + 1) = 0");
    assert_eq!(to_plain("e_1 == e_2").unwrap(), "e₁ == e₂");
    assert_eq!(to_plain(r"e_1 \mid\mid e_2").unwrap(), "e₁ || e₂");
    assert_eq!(to_plain(r"e ::=~ n").unwrap(), "e ::= n");
}

#[test]
fn typing_judgements() {
    assert_eq!(
        to_plain(r"\Gamma \vdash n : \text{Number}").unwrap(),
        "Γ ⊢ n : Number"
    );
    assert_eq!(
        to_plain(r"\Gamma,x:\tau_1 \vdash e_2 : \tau_2").unwrap(),
        "Γ, x : τ₁ ⊢ e₂ : τ₂"
    );
    assert_eq!(
        to_plain(r"\cdot \vdash 1 : \text{Number}").unwrap(),
        "· ⊢ 1 : Number"
    );
    assert_eq!(
        to_plain(r"\tau_{\text{arg}} \rightarrow \tau_{\text{ret}}").unwrap(),
        "τ_arg → τ_ret"
    );
}

#[test]
fn word_scripts_stay_on_the_baseline() {
    // Every letter of "ret" has a subscript form; the word still reads like "arg".
    assert_eq!(to_plain(r"\tau_{ret}").unwrap(), "τ_ret");
    assert_eq!(to_plain(r"\tau_{arg}").unwrap(), "τ_arg");
    assert_eq!(to_plain("x^{in}").unwrap(), "x^in");
    assert_eq!(to_plain("x_i + y_{12}").unwrap(), "xᵢ + y₁₂");
    assert_eq!(to_plain("x^{2n}").unwrap(), "x²ⁿ");
}

#[test]
fn fractions_and_roots() {
    assert_eq!(
        to_plain(r"x = \frac{1 \pm \sqrt{1+8}}{2}").unwrap(),
        "x = (1 ± √(1 + 8))/2"
    );
    assert_eq!(
        to_plain(r"\left(x - \frac{1}{2}\right)^2 - \frac{9}{4} = 0").unwrap(),
        "(x − 1/2)² − 9/4 = 0"
    );
}

#[test]
fn line_breaks_become_newlines() {
    assert_eq!(to_plain(r"\text{a} \\ \text{b}").unwrap(), "a\nb");
}

#[test]
fn errors_carry_offsets() {
    match to_plain(r"x + \frobnicate") {
        Err(CastError::Tex { offset, message }) => {
            assert_eq!(offset, 4);
            assert!(message.contains("frobnicate"));
        }
        other => panic!("expected tex error, got {other:?}"),
    }
    assert!(matches!(
        to_plain(r"\mathtt{2"),
        Err(CastError::Tex { offset: 7, .. })
    ));
    assert!(matches!(to_plain("x}"), Err(CastError::Tex { offset: 1, .. })));
    assert!(matches!(to_plain(r"\frac{1}"), Err(CastError::Tex { .. })));
}
