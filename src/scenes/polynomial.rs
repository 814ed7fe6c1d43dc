use crate::{
    foundation::error::CastResult,
    layout::{Direction, NEXT_TO_BUFF_UNITS},
    stage::Director,
};

/// The quadratic, then the three ways of solving it, each written under the last.
const QUADRATIC: &[&str] = &[
    "x^2 - x - 2 = 0",
    "(x - 2)(x + 1) = 0",
    r"\left(x - \frac{1}{2}\right)^2 - \frac{9}{4} = 0",
    r"x = \frac{1 \pm \sqrt{1+8}}{2}",
];

const CUBIC: &str = "x^3 - 2x^2 - x + 2";
const QUARTIC: &str = "x^4 + 2x^3 - 9x^2 - 2x + 8";

pub(super) fn intro(d: &mut Director<'_>) -> CastResult<()> {
    let u = d.unit();
    let mut shown = Vec::with_capacity(QUADRATIC.len());
    let mut above = None;
    for tex in QUADRATIC {
        let v = d.math(tex)?;
        let v = match &above {
            None => v.shift(Direction::Up.unit() * u),
            Some(prev) => v.next_to(prev, Direction::Down, NEXT_TO_BUFF_UNITS * u),
        };
        above = Some(v.clone());
        shown.push(d.write_one(v)?);
    }
    d.unwrite(&shown)?;

    for tex in [CUBIC, QUARTIC] {
        let v = d.math(tex)?;
        let id = d.write_one(v)?;
        d.unwrite(&[id])?;
    }
    Ok(())
}
