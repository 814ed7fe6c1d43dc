use crate::{
    choreo::{Row, Step, StepOptions},
    foundation::{
        color::Color,
        core::Vec2,
        error::CastResult,
    },
    formula::{Formula, Token, TokenLine, eval_of::EvalWrapper},
    layout::{
        ColumnAlign, Direction, NEXT_TO_BUFF_UNITS, Visual, arrange, group_bounds,
        metrics::FontFamily, shift_all, table,
    },
    stage::{Animation, Director, ObjectId},
};

const FACTORIAL: &str = "\
letrec factorial = function (n) =>
  if n == 0
  then 1
  else n * factorial(n - 1)
in
factorial(4)";

fn s(tex: &str) -> Token {
    Token::structural(tex)
}

fn src(text: &str) -> Token {
    Token::source(text)
}

/// Write a heading, hold, and take it away again.
fn title_card(d: &mut Director<'_>, title: &str, size: f64) -> CastResult<()> {
    let card = d.text(title, size);
    let id = d.write_one(card)?;
    d.hold()?;
    d.unwrite(&[id])?;
    d.hold()
}

/// Morph `id` through `visuals` in turn, holding after each, and return the last object.
fn morph_through(
    d: &mut Director<'_>,
    mut id: ObjectId,
    visuals: Vec<Visual>,
) -> CastResult<ObjectId> {
    for v in visuals {
        id = d.morph(id, v)?;
        d.hold()?;
    }
    Ok(id)
}

fn math_chain(d: &Director<'_>, chain: &[&[&str]]) -> CastResult<Vec<Visual>> {
    chain.iter().map(|parts| d.math_parts(parts)).collect()
}

fn eval_chain(d: &Director<'_>, chain: &[&[Token]]) -> CastResult<Vec<Visual>> {
    chain.iter().map(|tokens| d.eval_tex(tokens)).collect()
}

pub(super) fn title(d: &mut Director<'_>) -> CastResult<()> {
    let title = d.text("How to Make an Interpreter", 42.0);
    let id = d.write_one(title)?;
    d.wait(1.0)?;
    d.unwrite(&[id])?;
    d.wait(1.0)
}

pub(super) fn intro(d: &mut Director<'_>) -> CastResult<()> {
    let listing = d.code(FACTORIAL, 28.0);
    let id = d.write_one(listing)?;
    d.hold()?;
    d.unwrite(&[id])?;
    d.hold()
}

/// `expressions --eval--> values`, centered under `anchor`.
fn eval_diagram(d: &Director<'_>, anchor: &Visual) -> CastResult<Vec<Visual>> {
    let u = d.unit();
    let mut middle = vec![
        d.math(r"\mathrm{eval}")?,
        Visual::arrow(Vec2::new(3.0 * u, 0.0), Color::WHITE),
    ];
    arrange(&mut middle, Direction::Down, 0.1 * u);
    let mid = group_bounds(&middle).unwrap_or_default();
    let arrow_y = middle[1].center.y;

    let mut expressions = d
        .text("expressions", 32.0)
        .beside(mid, Direction::Left, NEXT_TO_BUFF_UNITS * u);
    expressions.center.y = arrow_y;
    let mut values = d
        .text("values", 32.0)
        .beside(mid, Direction::Right, NEXT_TO_BUFF_UNITS * u);
    values.center.y = arrow_y;

    let mut items = vec![expressions];
    items.extend(middle);
    items.push(values);

    let group = group_bounds(&items).unwrap_or_default();
    let below = anchor.bounds();
    shift_all(
        &mut items,
        Vec2::new(
            below.center().x - group.center().x,
            below.y1 + 2.0 * NEXT_TO_BUFF_UNITS * u - group.y0,
        ),
    );
    Ok(items)
}

pub(super) fn constants(d: &mut Director<'_>) -> CastResult<()> {
    title_card(d, "Constants", 42.0)?;

    let u = d.unit();
    let cell = |tex: &str| d.math(&format!(r"\mathtt{{{tex}}}"));
    let grid = table(
        vec![
            vec![cell("1")?, cell("true")?],
            vec![cell("-12")?, cell("false")?],
            vec![cell("3.14")?],
        ],
        &[ColumnAlign::Center, ColumnAlign::Center],
        2.0 * u,
        0.5 * u,
    );
    let ids = d.write(grid)?;
    d.hold()?;
    d.unwrite(&ids)?;
    d.hold()?;

    // 2 + 2 goes through eval, with the eval arrow drawn underneath.
    let sum = d.math(r"\mathtt{2 + 2}")?;
    let sum = d.write_one(sum)?;
    d.hold()?;
    let wrapped = d.math_parts(&[r"\mathrm{eval}(", r"\mathtt{2 + 2}", ")"])?;
    let diagram = eval_diagram(d, &wrapped)?;
    let wrapped = d.insert(wrapped);
    let diagram: Vec<ObjectId> = diagram.into_iter().map(|v| d.insert(v)).collect();
    let mut anims = vec![Animation::TransformMatching {
        from: sum,
        to: wrapped,
    }];
    anims.extend(diagram.iter().map(|&id| Animation::Write { id }));
    d.play(anims)?;
    d.hold()?;
    let four = d.math(r"\mathtt{4}")?;
    let four = morph_through(d, wrapped, vec![four])?;
    let mut shown = vec![four];
    shown.extend(diagram);
    d.unwrite(&shown)?;
    d.hold()?;

    // A constant evaluates to itself.
    let two = d.math(r"\mathtt{2}")?;
    let two = d.write_one(two)?;
    d.hold()?;
    let chain = math_chain(
        d,
        &[&[r"\mathrm{eval}(", r"\mathtt{2}", ")"], &[r"\mathtt{2}"]],
    )?;
    let two = morph_through(d, two, chain)?;
    d.unwrite(&[two])?;
    d.hold()?;

    let truth = d.math(r"\mathtt{true}")?;
    let truth = d.write_one(truth)?;
    let chain = math_chain(
        d,
        &[&[r"\mathrm{eval}(", r"\mathtt{true}", ")"], &[r"\mathtt{true}"]],
    )?;
    let mut last = truth;
    for v in chain {
        last = d.morph(last, v)?;
    }
    d.hold()?;
    let anchor = d.visual(last)?;
    let cool = d
        .image("images/sunglasses.png", 1.0)?
        .next_to(&anchor, Direction::Down, 2.0 * NEXT_TO_BUFF_UNITS * u);
    let cool = d.fade_in(cool)?;
    d.hold()?;
    d.play(vec![
        Animation::Unwrite { id: last },
        Animation::FadeOut { id: cool },
    ])?;
    d.hold()
}

pub(super) fn operations(d: &mut Director<'_>) -> CastResult<()> {
    title_card(d, "Operations", 42.0)?;

    let u = d.unit();
    let mut ops = ["+", "-", "*", "/"]
        .iter()
        .map(|op| d.math(&format!(r"\mathtt{{{op}}}")))
        .collect::<CastResult<Vec<_>>>()?;
    arrange(&mut ops, Direction::Right, 2.0 * u);
    let ids = d.write(ops)?;
    d.hold()?;
    d.unwrite(&ids)?;

    let add = d.math(r"\mathtt{1 + 1}")?;
    let add = d.write_one(add)?;
    d.hold()?;
    d.unwrite(&[add])?;
    d.hold()?;

    // Operands can be anything, so the operation evaluates them first.
    let split: &[&str] = &[
        r"\mathrm{eval}(",
        r"\mathtt{E_1}",
        ")",
        "+",
        r"\mathrm{eval}(",
        r"\mathtt{E_2}",
        ")",
    ];
    let generic = d.math_parts(&[r"\mathtt{E_1}", "+", r"\mathtt{E_2}"])?;
    let generic = d.write_one(generic)?;
    d.hold()?;
    let chain = math_chain(
        d,
        &[
            &[r"\mathtt{HUGE_1}", "+", r"\mathtt{HUGE_2}"],
            &[r"\mathtt{E_1}", "+", r"\mathtt{E_2}"],
            &[r"\mathrm{eval}(", r"\mathtt{E_1}", "+", r"\mathtt{E_2}", ")"],
            split,
        ],
    )?;
    let split_id = morph_through(d, generic, chain)?;

    let bang = Visual::text(
        "!",
        d.config().font_px(600.0),
        FontFamily::Sans,
        Color::PURE_RED,
    );
    let bang = d.insert(bang);
    d.add(bang)?;
    d.wait(1.0)?;
    d.play(vec![Animation::FadeOut { id: bang }])?;
    d.wait(1.0)?;

    let red_plus = d.formula(Formula::new(split.iter().copied())?.color_by_tex("+", Color::RED));
    let red_plus = morph_through(d, split_id, vec![red_plus])?;
    d.unwrite(&[red_plus])?;

    let code = d.code("eval(E1) + eval(E2)", 40.0);
    let code = d.write_one(code)?;
    d.hold()?;
    d.unwrite(&[code])?;

    let turtles = d.image("images/turtles.png", 0.5)?;
    let turtles = d.fade_in(turtles)?;
    d.hold()?;
    d.play(vec![Animation::FadeOut { id: turtles }])?;

    // Highlight the structure around the operands.
    let plain = Formula::new([
        r"\text{eval}",
        "(",
        r"\mathtt{E_1}",
        ")",
        "+",
        r"\text{eval}",
        "(",
        r"\mathtt{E_2}",
        ")",
    ])?;
    let highlighted = [r"\text{eval}", "+", "(", ")"]
        .into_iter()
        .fold(plain.clone(), |f, needle| f.color_by_tex(needle, Color::YELLOW));
    let plain = d.formula(plain);
    let plain = d.write_one(plain)?;
    d.hold()?;
    let highlighted = d.formula(highlighted);
    let highlighted = d.fade_in(highlighted)?;
    d.hold()?;
    d.remove(plain)?;
    d.unwrite(&[highlighted])?;
    d.hold()?;

    // Not every operation makes sense.
    let mixed = d.math_parts(&[r"\mathtt{1}", "+", r"\mathtt{true}"])?;
    let mixed = d.write_one(mixed)?;
    d.hold()?;
    let chain = math_chain(
        d,
        &[
            &[r"\mathtt{1}", "+", r"\mathtt{1}"],
            &[r"\mathtt{1}", "+", r"\mathtt{true}"],
        ],
    )?;
    let mixed = morph_through(d, mixed, chain)?;
    flag(d, mixed)?;
    d.play(vec![Animation::Recolor {
        id: mixed,
        color: Color::WHITE,
    }])?;
    d.hold()?;
    d.unwrite(&[mixed])?;
    d.hold()?;

    // eval(2 * 3 + 10 / 5), one rule at a time.
    let steps: &[&[Token]] = &[
        &[s(r"\mathrm{eval}("), src("2 * 3"), src("+"), src("10 / 5"), s(")")],
        &[
            s(r"\mathrm{eval}("),
            src("2 * 3"),
            s(")"),
            s("+"),
            s(r"\mathrm{eval}("),
            src("10 / 5"),
            s(")"),
        ],
        &[
            s("("),
            s(r"\mathrm{eval}("),
            src("2"),
            s(")"),
            s("*"),
            s(r"\mathrm{eval}("),
            src("3"),
            s(")"),
            s(")"),
            s("+"),
            s(r"\mathrm{eval}("),
            src("10 / 5"),
            s(")"),
        ],
        &[
            s("("),
            s(r"\mathtt{2}"),
            s("*"),
            s(r"\mathrm{eval}("),
            src("3"),
            s(")"),
            s(")"),
            s("+"),
            s(r"\mathrm{eval}("),
            src("10 / 5"),
            s(")"),
        ],
        &[
            s("("),
            s(r"\mathtt{2}"),
            s("*"),
            s(r"\mathtt{3}"),
            s(")"),
            s("+"),
            s(r"\mathrm{eval}("),
            src("10 / 5"),
            s(")"),
        ],
        &[s(r"\mathtt{6}"), s("+"), s(r"\mathrm{eval}("), src("10 / 5"), s(")")],
        &[
            s(r"\mathtt{6}"),
            s("+"),
            s("("),
            s(r"\mathrm{eval}("),
            src("10"),
            s(")"),
            s("/"),
            s(r"\mathrm{eval}("),
            src("5"),
            s(")"),
            s(")"),
        ],
        &[
            s(r"\mathtt{6}"),
            s("+"),
            s("("),
            s(r"\mathtt{10}"),
            s("/"),
            s(r"\mathrm{eval}("),
            src("5"),
            s(")"),
            s(")"),
        ],
        &[
            s(r"\mathtt{6}"),
            s("+"),
            s("("),
            s(r"\mathtt{10}"),
            s("/"),
            s(r"\mathtt{5}"),
            s(")"),
        ],
        &[s(r"\mathtt{6}"), s("+"), s(r"\mathtt{2}")],
        &[s(r"\mathtt{8}")],
    ];
    let mut chain = eval_chain(d, steps)?.into_iter();
    if let Some(first) = chain.next() {
        let first = d.write_one(first)?;
        d.hold()?;
        let last = morph_through(d, first, chain.collect())?;
        d.unwrite(&[last])?;
        d.hold()?;
    }

    // Division by zero has no value to reduce to.
    let divide = d
        .formulas()
        .eval_tex(&[s(r"\mathrm{eval}"), s("("), src("1"), s("/"), src("0"), s(")")])?
        .color_by_tex("/", Color::WHITE);
    let divide = d.formula(divide);
    let divide = d.write_one(divide)?;
    d.hold()?;
    let chain = eval_chain(
        d,
        &[
            &[
                s(r"\mathrm{eval}"),
                s("("),
                src("1"),
                s(")"),
                s("/"),
                s(r"\mathrm{eval}"),
                s("("),
                src("0"),
                s(")"),
            ],
            &[s(r"\mathtt{1}"), s("/"), s(r"\mathrm{eval}"), s("("), src("0"), s(")")],
            &[s(r"\mathtt{1}"), s("/"), s(r"\mathtt{0}")],
        ],
    )?;
    let stuck = morph_through(d, divide, chain)?;
    flag(d, stuck)?;
    d.unwrite(&[stuck])?;
    d.hold()
}

/// Turn `id` red with a wiggle and hold.
fn flag(d: &mut Director<'_>, id: ObjectId) -> CastResult<()> {
    d.play(vec![
        Animation::Recolor {
            id,
            color: Color::RED,
        },
        Animation::Wiggle { id },
    ])?;
    d.hold()
}

pub(super) fn call_stack(d: &mut Director<'_>) -> CastResult<()> {
    use crate::choreo::Row::Unchanged as U;

    let eval_sum = d.eval_of(["2 * 3", r"\ +\ ", "10 / 2"]);
    let eval_product = d.eval_of(["2 * 3"]);
    let eval_quotient = d.eval_of(["10 / 2"]);
    let eval_product_again = d.refresh(&eval_product);
    let eval_product_split = d.eval_of(["2", r"\ *\ ", "3"]);
    let eval_2 = d.eval_of(["2"]);
    let eval_3 = d.eval_of(["3"]);
    let eval_2_again = d.refresh(&eval_2);
    let eval_3_again = d.refresh(&eval_3);
    let eval_quotient_again = d.refresh(&eval_quotient);
    let eval_quotient_split = d.eval_of(["10", r"\ /\ ", "2"]);
    let eval_10 = d.eval_of(["10"]);
    let eval_divisor = d.eval_of(["2"]);
    let eval_10_again = d.refresh(&eval_10);
    let eval_divisor_again = d.refresh(&eval_divisor);
    let eval_whole = d.eval_of(["2 * 3 + 10 / 2"]);

    let call = |w: &EvalWrapper| TokenLine::new().call(w);
    let lit = |n: &str| TokenLine::new().structural(format!(r"\mathtt{{{n}}}"));
    let binary = |l: TokenLine, op: &str, r: TokenLine| l.structural(op).then(r);

    let lines: Vec<(bool, Vec<Row<TokenLine>>)> = vec![
        (true, vec![call(&eval_sum).into()]),
        (
            true,
            vec![binary(call(&eval_product), "+", call(&eval_quotient)).into()],
        ),
        (true, vec![U, call(&eval_product).into()]),
        (false, vec![U, call(&eval_product_again).into()]),
        (true, vec![U, call(&eval_product_split).into()]),
        (
            true,
            vec![U, binary(call(&eval_2), "*", call(&eval_3)).into()],
        ),
        (true, vec![U, U, call(&eval_2).into()]),
        (false, vec![U, U, call(&eval_2_again).into()]),
        (true, vec![U, U, lit("2").into()]),
        (true, vec![U, binary(lit("2"), "*", call(&eval_3)).into()]),
        (true, vec![U, U, call(&eval_3).into()]),
        (false, vec![U, U, call(&eval_3_again).into()]),
        (true, vec![U, U, lit("3").into()]),
        (true, vec![U, binary(lit("2"), "*", lit("3")).into()]),
        (true, vec![U, lit("6").into()]),
        (true, vec![binary(lit("6"), "+", call(&eval_quotient)).into()]),
        (true, vec![U, call(&eval_quotient).into()]),
        (false, vec![U, call(&eval_quotient_again).into()]),
        (false, vec![U, call(&eval_quotient_split).into()]),
        (
            true,
            vec![U, binary(call(&eval_10), "/", call(&eval_divisor)).into()],
        ),
        (true, vec![U, U, call(&eval_10).into()]),
        (false, vec![U, U, call(&eval_10_again).into()]),
        (true, vec![U, U, lit("10").into()]),
        (
            true,
            vec![U, binary(lit("10"), "/", call(&eval_divisor)).into()],
        ),
        (true, vec![U, U, call(&eval_divisor).into()]),
        (false, vec![U, U, call(&eval_divisor_again).into()]),
        (true, vec![U, U, lit("2").into()]),
        (true, vec![U, binary(lit("10"), "/", lit("2")).into()]),
        (true, vec![U, lit("5").into()]),
        (true, vec![binary(lit("6"), "+", lit("5")).into()]),
        (true, vec![lit("11").into()]),
        (
            true,
            vec![binary(call(&eval_whole), "=", lit("11")).into()],
        ),
    ];

    let steps = lines
        .into_iter()
        .map(|(transform, rows)| {
            let rows = rows
                .into_iter()
                .map(|r| r.try_map(|line| d.line(line)))
                .collect::<CastResult<Vec<_>>>()?;
            Ok(if transform {
                Step::new(rows)
            } else {
                Step::cut(rows)
            })
        })
        .collect::<CastResult<Vec<_>>>()?;

    d.steps(
        steps,
        StepOptions {
            wait_secs: 0.0,
            keep_last: true,
        },
    )?;
    Ok(())
}
