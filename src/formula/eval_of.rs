use crate::{
    foundation::error::CastResult,
    formula::{Formula, Palette, Token},
};

/// Monotonic counter that makes every eval wrapper's structural tokens textually unique.
///
/// Never reset within a scene. The structural matcher pairs parts by raw TeX, so two `eval(`
/// tokens padded with a different number of leading spaces are never mistaken for each other.
#[derive(Clone, Debug, Default)]
pub struct PaddingCounter {
    next: u32,
}

impl PaddingCounter {
    /// Counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by exactly one and return the new value.
    pub fn bump(&mut self) -> u32 {
        self.next += 1;
        self.next
    }

    /// Last value handed out (0 before the first call).
    pub fn current(&self) -> u32 {
        self.next
    }
}

/// One fragment inside an eval wrapper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    /// Source text of the taught language.
    Source(String),
    /// A nested wrapper, flattened into its full token list.
    Call(EvalWrapper),
}

impl From<&str> for Fragment {
    fn from(s: &str) -> Self {
        Self::Source(s.to_owned())
    }
}

impl From<String> for Fragment {
    fn from(s: String) -> Self {
        Self::Source(s)
    }
}

impl From<EvalWrapper> for Fragment {
    fn from(w: EvalWrapper) -> Self {
        Self::Call(w)
    }
}

impl From<&EvalWrapper> for Fragment {
    fn from(w: &EvalWrapper) -> Self {
        Self::Call(w.clone())
    }
}

/// The tokens of one `eval ( .. )` application.
///
/// Immutable once built. Two wrappers denote the same call for the structural matcher only when
/// their counters match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalWrapper {
    counter: u32,
    fragments: Vec<Fragment>,
    fragment_tokens: Vec<Token>,
    tokens: Vec<Token>,
}

impl EvalWrapper {
    fn build(counter: u32, fragments: Vec<Fragment>, fragment_tokens: Vec<Token>) -> Self {
        let pad = " ".repeat(counter as usize);
        let mut tokens = Vec::with_capacity(fragment_tokens.len() + 3);
        tokens.push(Token::Structural(format!(r"{pad}\mathrm{{eval}}")));
        tokens.push(Token::Structural(format!("{pad}(")));
        tokens.extend(fragment_tokens.iter().cloned());
        tokens.push(Token::Structural(format!("{pad})")));
        Self {
            counter,
            fragments,
            fragment_tokens,
            tokens,
        }
    }

    /// Padding width of the structural tokens.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Fragments as given to [`FormulaContext::eval_of`].
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Tokens contributed by the fragments alone.
    pub fn fragment_tokens(&self) -> &[Token] {
        &self.fragment_tokens
    }

    /// `eval`, `(`, the fragment tokens, `)`.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

/// Per-scene formula state: the padding counter and the builder palette.
#[derive(Clone, Debug, Default)]
pub struct FormulaContext {
    counter: PaddingCounter,
    palette: Palette,
}

impl FormulaContext {
    /// Fresh context with the given palette.
    pub fn with_palette(palette: Palette) -> Self {
        Self {
            counter: PaddingCounter::new(),
            palette,
        }
    }

    /// Builder palette.
    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Padding counter state.
    pub fn counter(&self) -> &PaddingCounter {
        &self.counter
    }

    /// Wrap fragments as `eval ( fragments )`, advancing the counter by one.
    pub fn eval_of<I, F>(&mut self, fragments: I) -> EvalWrapper
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment>,
    {
        let fragments: Vec<Fragment> = fragments.into_iter().map(Into::into).collect();
        let fragment_tokens = fragments
            .iter()
            .flat_map(|f| match f {
                Fragment::Source(text) => vec![Token::Source(text.clone())],
                Fragment::Call(w) => w.tokens().to_vec(),
            })
            .collect();
        let counter = self.counter.bump();
        EvalWrapper::build(counter, fragments, fragment_tokens)
    }

    /// Copy `wrapper` under a fresh counter. Fragments and fragment tokens are kept as they are.
    pub fn refresh(&mut self, wrapper: &EvalWrapper) -> EvalWrapper {
        let counter = self.counter.bump();
        EvalWrapper::build(
            counter,
            wrapper.fragments.clone(),
            wrapper.fragment_tokens.clone(),
        )
    }

    /// Labeled-fragment builder with this context's palette.
    pub fn eval_tex(&self, tokens: &[Token]) -> CastResult<Formula> {
        Formula::from_tokens(tokens, self.palette)
    }

    /// Single-wrapper formula.
    pub fn wrapper_formula(&self, wrapper: &EvalWrapper) -> CastResult<Formula> {
        self.eval_tex(wrapper.tokens())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/formula/eval_of.rs"]
mod tests;
