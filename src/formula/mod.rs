//! Formulas assembled from TeX parts, and the labeled-fragment builder used by reduction scenes.

pub mod eval_of;

use crate::{
    foundation::{color::Color, error::CastResult},
    tex::to_plain,
};

/// One token handed to the labeled-fragment builder.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Token {
    /// Connective TeX (`\mathrm{eval}`, `(`, `+`), drawn in the structural color.
    Structural(String),
    /// Source code of the taught language, typeset as `\mathtt{..}` in the source color.
    Source(String),
}

impl Token {
    /// Shorthand for [`Token::Structural`].
    pub fn structural(tex: impl Into<String>) -> Self {
        Self::Structural(tex.into())
    }

    /// Shorthand for [`Token::Source`].
    pub fn source(text: impl Into<String>) -> Self {
        Self::Source(text.into())
    }

    /// TeX this token contributes to a formula.
    pub fn tex(&self) -> String {
        match self {
            Self::Structural(tex) => tex.clone(),
            Self::Source(text) => format!(r"\mathtt{{{text}}}"),
        }
    }
}

/// Colors used by the labeled-fragment builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    /// Color of structural tokens.
    pub structural: Color,
    /// Color of source tokens.
    pub source: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            structural: Color::YELLOW,
            source: Color::WHITE,
        }
    }
}

/// Role a part plays inside a formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PartRole {
    /// Plain TeX part or a structural token.
    Structural,
    /// Source fragment.
    Source,
}

/// One independently addressable part of a formula.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FormulaPart {
    /// Raw TeX. Two parts are the same for the structural matcher iff their TeX is identical.
    pub tex: String,
    /// Display text derived from `tex`.
    pub text: String,
    /// Fill color.
    pub color: Color,
    /// Structural or source part.
    pub role: PartRole,
}

impl FormulaPart {
    fn new(tex: String, color: Color, role: PartRole) -> CastResult<Self> {
        let mut text = to_plain(&tex)?;
        if text.contains('\n') {
            return Err(crate::foundation::error::CastError::validation(format!(
                "formula part '{tex}' spans several lines; use one formula per row"
            )));
        }
        if is_standalone_operator(&text) {
            text = format!(" {text} ");
        }
        Ok(Self {
            tex,
            text,
            color,
            role,
        })
    }
}

fn is_standalone_operator(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => matches!(
            c,
            '+' | '−' | '-' | '*' | '/' | '=' | '<' | '>' | '·' | '×' | '→' | '⊢' | '|'
        ),
        _ => false,
    }
}

/// A formula made of TeX parts laid out left to right.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Formula {
    parts: Vec<FormulaPart>,
}

impl Formula {
    /// Build a formula from TeX parts, all drawn in white.
    pub fn new<I, S>(parts: I) -> CastResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parts = parts
            .into_iter()
            .map(|tex| FormulaPart::new(tex.into(), Color::WHITE, PartRole::Structural))
            .collect::<CastResult<Vec<_>>>()?;
        Ok(Self { parts })
    }

    /// Build a single-part formula.
    pub fn single(tex: impl Into<String>) -> CastResult<Self> {
        Self::new([tex.into()])
    }

    /// Labeled-fragment builder: structural tokens take `palette.structural`, source tokens are
    /// wrapped in `\mathtt{..}` and take `palette.source`.
    pub fn from_tokens(tokens: &[Token], palette: Palette) -> CastResult<Self> {
        let parts = tokens
            .iter()
            .map(|tok| match tok {
                Token::Structural(_) => {
                    FormulaPart::new(tok.tex(), palette.structural, PartRole::Structural)
                }
                Token::Source(_) => FormulaPart::new(tok.tex(), palette.source, PartRole::Source),
            })
            .collect::<CastResult<Vec<_>>>()?;
        Ok(Self { parts })
    }

    /// Parts in layout order.
    pub fn parts(&self) -> &[FormulaPart] {
        &self.parts
    }

    /// Indices of the parts highlighted as source fragments.
    pub fn source_parts(&self) -> Vec<usize> {
        self.parts
            .iter()
            .enumerate()
            .filter(|(_, p)| p.role == PartRole::Source)
            .map(|(i, _)| i)
            .collect()
    }

    /// All part TeX joined by single spaces.
    pub fn tex_string(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.tex.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Display text of the whole formula.
    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }

    /// Recolor every part.
    pub fn with_color(mut self, color: Color) -> Self {
        for p in &mut self.parts {
            p.color = color;
        }
        self
    }

    /// Recolor the parts whose TeX contains `needle`.
    pub fn color_by_tex(mut self, needle: &str, color: Color) -> Self {
        for p in self.parts.iter_mut().filter(|p| p.tex.contains(needle)) {
            p.color = color;
        }
        self
    }
}

/// Line-oriented helper that collects tokens before running the labeled-fragment builder.
///
/// ```
/// use evalcast::{FormulaContext, TokenLine};
///
/// let mut cx = FormulaContext::default();
/// let lhs = cx.eval_of(["2 * 3"]);
/// let formula = TokenLine::new()
///     .call(&lhs)
///     .structural("+")
///     .source("5")
///     .build(&cx)
///     .unwrap();
/// assert_eq!(formula.text(), "eval(2 * 3) + 5");
/// ```
#[derive(Clone, Debug, Default)]
pub struct TokenLine {
    tokens: Vec<Token>,
}

impl TokenLine {
    /// Empty line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a structural token.
    pub fn structural(mut self, tex: impl Into<String>) -> Self {
        self.tokens.push(Token::Structural(tex.into()));
        self
    }

    /// Append a source token.
    pub fn source(mut self, text: impl Into<String>) -> Self {
        self.tokens.push(Token::Source(text.into()));
        self
    }

    /// Append every token of an eval wrapper.
    pub fn call(mut self, wrapper: &eval_of::EvalWrapper) -> Self {
        self.tokens.extend_from_slice(wrapper.tokens());
        self
    }

    /// Append every token of `other`.
    pub fn then(mut self, other: TokenLine) -> Self {
        self.tokens.extend(other.tokens);
        self
    }

    /// Tokens collected so far.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Run the labeled-fragment builder with the context's palette.
    pub fn build(self, cx: &eval_of::FormulaContext) -> CastResult<Formula> {
        cx.eval_tex(&self.tokens)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/formula/formula.rs"]
mod tests;
