use crate::{
    foundation::error::CastResult,
    formula::Formula,
    layout::{
        Direction, NEXT_TO_BUFF_UNITS, Premise, Rule, Visual, align_edge, arrange, group_bounds,
    },
    stage::{Animation, Director},
};

const EXPRESSION_GRAMMAR: &[(&str, &str, &str)] = &[
    ("e ::=", "n", r"\text{(number)}"),
    (r"\mid", r"\text{true}", r"\text{(boolean literal)}"),
    (r"\mid", r"\text{false}", r"\text{(boolean literal)}"),
    (r"\mid", "x", r"\text{(variable)}"),
    (
        r"\mid",
        r"\text{let}~x = e_1~\text{in}~e_2",
        r"\text{(local variable definition)}",
    ),
    (r"\mid", "e_1 + e_2", r"\text{(addition)}"),
    (r"\mid", r"e_1 \mid\mid e_2", r"\text{(or)}"),
    (r"\mid", "e_1 == e_2", r"\text{(equality check)}"),
    (
        r"\mid",
        r"\text{FUN}~(x : \tau) \rightarrow e",
        r"\text{(anonymous function)}",
    ),
    (r"\mid", "e_1(e_2)", r"\text{(application)}"),
    (
        r"\mid",
        r"\text{letfun}~f (x : \tau) \rightarrow e_1~\text{in}~e_2",
        r"\text{(recursive function definition)}",
    ),
];

const TYPE_GRAMMAR: &[(&str, &str, &str)] = &[
    (r"\tau ::=", r"\text{Number}", r"\text{(number type)}"),
    (r"\mid", r"\text{Boolean}", r"\text{(boolean type)}"),
    (
        r"\mid",
        r"\tau_{\text{arg}} \rightarrow \tau_{\text{ret}}",
        r"\text{(function type)}",
    ),
];

/// Premises, conclusion, label and scale of every typing rule.
const RULES: &[(&[&str], &str, &str, f64)] = &[
    (&[], r"\Gamma \vdash n : \text{Number}", "NUM", 1.0),
    (&[], r"\Gamma \vdash \text{true} : \text{Boolean}", "TRUE", 1.0),
    (&[], r"\Gamma \vdash \text{false} : \text{Boolean}", "FALSE", 1.0),
    (
        &[r"\Gamma \vdash e_1 : \tau_1", r"\Gamma,x:\tau_1 \vdash e_2 : \tau_2"],
        r"\Gamma \vdash \text{let}~x = e_1~\text{in}~e_2 : \tau_2",
        "LET",
        1.0,
    ),
    (&[r"\Gamma [x] = \tau"], r"\Gamma \vdash x : \tau", "VAR", 1.0),
    (
        &[
            r"\Gamma \vdash e_1 : \text{Number}",
            r"\Gamma \vdash e_2 : \text{Number}",
        ],
        r"\Gamma \vdash e_1 + e_2 : \text{Number}",
        "PLUS",
        1.0,
    ),
    (
        &[
            r"\Gamma \vdash e_1 : \text{Boolean}",
            r"\Gamma \vdash e_2 : \text{Boolean}",
        ],
        r"\Gamma \vdash e_1 \mid\mid e_2 : \text{Boolean}",
        "OR",
        1.0,
    ),
    (
        &[r"\Gamma \vdash e_1 : \tau", r"\Gamma \vdash e_2 : \tau"],
        r"\Gamma \vdash e_1 == e_2 : \text{Boolean}",
        "EQ",
        1.0,
    ),
    (
        &[r"\Gamma,x:\tau_x \vdash e : \tau_e"],
        r"\Gamma \vdash \text{fun}~(x : \tau_x) \rightarrow e : \tau_x \rightarrow \tau_e",
        "FUN",
        1.0,
    ),
    (
        &[
            r"\Gamma \vdash e_1 : \tau_{\text{arg}} \rightarrow \tau_{\text{ret}}",
            r"\Gamma \vdash e_2 : \tau_{\text{arg}}",
        ],
        r"\Gamma \vdash e_1(e_2) : \tau_{\text{ret}}",
        "CALL",
        1.0,
    ),
    (
        &[
            r"\Gamma,f:\tau_x \rightarrow \tau_1,x:\tau_x \vdash e_1 : \tau_1",
            r"\Gamma,f:\tau_x \rightarrow \tau_1 \vdash e_2 : \tau_2",
        ],
        r"\Gamma \vdash \text{letfun}~f (x : \tau_x) \rightarrow e_1~\text{in}~e_2 : \tau_2",
        "LETFUN",
        0.8,
    ),
];

const SUM_TO_10: &[&str] = &[
    r"\text{letfun}~sumTo10 (x : \text{Number}): \text{Number} \to",
    r"\qquad \text{if}~x == 10~\text{then}~x~else~x + sumTo10(x + 1)",
    r"\text{in}~sumTo10(8)",
];

fn rule(premises: &[&str], conclusion: &str, label: &str) -> CastResult<Rule> {
    Ok(Rule {
        premises: premises
            .iter()
            .map(|p| -> CastResult<Premise> { Ok(Premise::Judgement(Formula::single(*p)?)) })
            .collect::<CastResult<Vec<_>>>()?,
        conclusion: Formula::single(conclusion)?,
        label: label.to_owned(),
    })
}

/// Write `example`, then its value underneath, and take both away.
fn example_with_result(d: &mut Director<'_>, example: &str, result: &str) -> CastResult<()> {
    let u = d.unit();
    let example = d.math(example)?;
    let result = d
        .math(result)?
        .next_to(&example, Direction::Down, NEXT_TO_BUFF_UNITS * u);
    let example = d.write_one(example)?;
    d.hold()?;
    let result = d.write_one(result)?;
    d.hold()?;
    d.unwrite(&[example, result])?;
    d.hold()
}

/// Write a whole group, hold, and unwrite it.
fn show(d: &mut Director<'_>, visuals: Vec<Visual>) -> CastResult<()> {
    let ids = d.write(visuals)?;
    d.hold()?;
    d.unwrite(&ids)?;
    d.hold()
}

pub(super) fn intro(d: &mut Director<'_>) -> CastResult<()> {
    let u = d.unit();
    let grammar = super::grammar(d, EXPRESSION_GRAMMAR, 0.9)?;
    show(d, grammar)?;

    example_with_result(d, r"\text{let}~x = 1~\text{in}~x + x", "2")?;
    example_with_result(
        d,
        r"\text{if}~1 == 2~\text{then}~100~\text{else}~42",
        "42",
    )?;

    let fun = d.math(r"(x : \text{Number}) \to x + 1")?;
    show(d, vec![fun])?;

    // The same function, named and then applied directly.
    let named = d.math_parts(&[
        r"\text{let}~add1 = ",
        r"(x : \text{Number}) \to x + 1",
        r"~\text{in}~add1",
        "(3)",
    ])?;
    let four = d
        .math("4")?
        .next_to(&named, Direction::Down, NEXT_TO_BUFF_UNITS * u);
    let named = d.write_one(named)?;
    d.hold()?;
    let four = d.write_one(four)?;
    d.hold()?;
    let applied = d.math_parts(&["(", r"(x : \text{Number}) \to x + 1", ")", "(3)"])?;
    let applied = d.insert(applied);
    d.play(vec![Animation::Transform {
        from: named,
        to: applied,
    }])?;
    d.hold()?;
    d.unwrite(&[applied, four])?;
    d.hold()?;

    let mut listing = SUM_TO_10
        .iter()
        .map(|line| d.math(line))
        .collect::<CastResult<Vec<_>>>()?;
    arrange(&mut listing, Direction::Down, 0.1 * u);
    align_edge(&mut listing, Direction::Left);
    let below = group_bounds(&listing).unwrap_or_default();
    let result = d
        .math("27")?
        .beside(below, Direction::Down, NEXT_TO_BUFF_UNITS * u);
    let listing = d.write(listing)?;
    d.hold()?;
    let result = d.write_one(result)?;
    d.hold()?;
    let mut shown = listing;
    shown.push(result);
    d.unwrite(&shown)?;
    d.hold()?;

    let grammar = super::grammar(d, TYPE_GRAMMAR, 1.0)?;
    show(d, grammar)
}

/// Show a still group for one hold.
fn still(d: &mut Director<'_>, visuals: Vec<Visual>) -> CastResult<()> {
    for v in visuals {
        let id = d.insert(v);
        d.add(id)?;
    }
    d.hold()
}

pub(super) fn expression_grammar(d: &mut Director<'_>) -> CastResult<()> {
    let grammar = super::grammar(d, EXPRESSION_GRAMMAR, 0.9)?;
    still(d, grammar)
}

pub(super) fn type_grammar(d: &mut Director<'_>) -> CastResult<()> {
    let grammar = super::grammar(d, TYPE_GRAMMAR, 1.0)?;
    still(d, grammar)
}

pub(super) fn rules(d: &mut Director<'_>) -> CastResult<()> {
    for (premises, conclusion, label, scale) in RULES {
        let visual = d.rule(rule(premises, conclusion, label)?, *scale);
        show(d, vec![visual])?;
    }
    Ok(())
}

pub(super) fn let_derivation(d: &mut Director<'_>) -> CastResult<()> {
    let leaf = |conclusion: &str, label: &str| -> CastResult<Premise> {
        Ok(Premise::Derivation(rule(&[], conclusion, label)?))
    };
    let derivation = Rule {
        premises: vec![
            leaf(r"\cdot \vdash 1 : \text{Number}", "NUM")?,
            leaf(r"x:\text{Number} \vdash x : \text{Number}", "VAR")?,
        ],
        conclusion: Formula::single(r"\cdot \vdash \text{let}~x = 1~\text{in}~x : \text{Number}")?,
        label: "LET".to_owned(),
    };
    let visual = d.rule(derivation, 0.8);
    still(d, vec![visual])
}
