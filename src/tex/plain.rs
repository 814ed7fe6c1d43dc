use crate::{
    foundation::error::{CastError, CastResult},
    tex::lexer::{Token, TokenKind, lex},
};

/// Convert a fragment of the supported TeX subset into display text.
///
/// Math mode drops source whitespace and spaces out operators the way TeX does, so fragments that
/// differ only by whitespace padding convert to the same text.
pub fn to_plain(tex: &str) -> CastResult<String> {
    let toks = lex(tex)?;
    let mut conv = Converter {
        toks: &toks,
        pos: 0,
        src_len: tex.len(),
    };
    let out = conv.seq(Mode::Math, None)?;
    Ok(out.trim().to_owned())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Math,
    Text,
}

struct Converter<'a> {
    toks: &'a [Token],
    pos: usize,
    src_len: usize,
}

impl Converter<'_> {
    fn peek(&self) -> Option<&Token> {
        self.toks.get(self.pos)
    }

    /// Convert tokens until the end of input or, when `group_start` is set, the matching `}`.
    fn seq(&mut self, mode: Mode, group_start: Option<usize>) -> CastResult<String> {
        let mut out = String::new();
        loop {
            let Some(tok) = self.peek() else {
                if let Some(start) = group_start {
                    return Err(CastError::tex(start, "unclosed '{'"));
                }
                return Ok(out);
            };
            let start = tok.span.start;
            match &tok.kind {
                TokenKind::EndGroup => {
                    if group_start.is_none() {
                        return Err(CastError::tex(start, "unbalanced '}'"));
                    }
                    self.pos += 1;
                    return Ok(out);
                }
                TokenKind::BeginGroup => {
                    self.pos += 1;
                    let inner = self.seq(mode, Some(start))?;
                    out.push_str(&inner);
                }
                TokenKind::Space => {
                    self.pos += 1;
                    if mode == Mode::Text {
                        soft_space(&mut out);
                    }
                }
                TokenKind::Tilde => {
                    self.pos += 1;
                    soft_space(&mut out);
                }
                TokenKind::Align => {
                    self.pos += 1;
                }
                TokenKind::Sub | TokenKind::Sup => {
                    let is_sub = tok.kind == TokenKind::Sub;
                    self.pos += 1;
                    let arg = self.arg(mode)?;
                    if is_sub {
                        out.push_str(&subscript(&arg));
                    } else {
                        out.push_str(&superscript(&arg));
                    }
                }
                TokenKind::Char(c) => {
                    let c = *c;
                    self.pos += 1;
                    push_char(&mut out, c, mode);
                }
                TokenKind::ControlSymbol(c) => {
                    let c = *c;
                    self.pos += 1;
                    match c {
                        ' ' | ',' | ';' | ':' => out.push(' '),
                        '!' => {}
                        '\\' => {
                            let trimmed = out.trim_end().len();
                            out.truncate(trimmed);
                            out.push('\n');
                        }
                        '|' => out.push('‖'),
                        '{' | '}' | '_' | '&' | '%' | '$' | '#' => out.push(c),
                        other => {
                            return Err(CastError::tex(
                                start,
                                format!("unknown control symbol '\\{other}'"),
                            ));
                        }
                    }
                }
                TokenKind::Command(name) => {
                    let name = name.clone();
                    self.pos += 1;
                    self.command(&name, start, mode, &mut out)?;
                }
            }
        }
    }

    /// Read one macro argument: a braced group or a single token.
    fn arg(&mut self, mode: Mode) -> CastResult<String> {
        while matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Space)) {
            self.pos += 1;
        }
        let Some(tok) = self.peek() else {
            return Err(CastError::tex(self.src_len, "missing argument"));
        };
        let start = tok.span.start;
        match &tok.kind {
            TokenKind::BeginGroup => {
                self.pos += 1;
                self.seq(mode, Some(start))
            }
            TokenKind::Char(c) => {
                let c = *c;
                self.pos += 1;
                Ok(c.to_string())
            }
            TokenKind::Command(name) => {
                let name = name.clone();
                self.pos += 1;
                let mut out = String::new();
                self.command(&name, start, mode, &mut out)?;
                Ok(out.trim().to_owned())
            }
            _ => Err(CastError::tex(start, "expected an argument")),
        }
    }

    fn command(&mut self, name: &str, start: usize, mode: Mode, out: &mut String) -> CastResult<()> {
        match name {
            "mathrm" | "text" | "textrm" | "mathtt" | "texttt" | "mathbf" | "textbf"
            | "mathit" | "textit" | "mathsf" | "operatorname" => {
                let inner = self.arg(Mode::Text)?;
                out.push_str(&inner);
            }
            "frac" | "cfrac" | "dfrac" | "tfrac" => {
                let num = self.arg(mode)?;
                let den = self.arg(mode)?;
                out.push_str(&format!("{}/{}", wrap_compound(&num), wrap_compound(&den)));
            }
            "sqrt" => {
                let inner = self.arg(mode)?;
                out.push_str(&format!("√{}", wrap_compound(&inner)));
            }
            "left" | "right" | "displaystyle" | "textstyle" | "limits" | "big" | "Big" => {}
            "quad" => out.push_str("  "),
            "qquad" => out.push_str("    "),
            _ => {
                if let Some(op) = operator_symbol(name) {
                    push_op(out, op, mode);
                } else if let Some(sym) = plain_symbol(name) {
                    out.push_str(sym);
                } else {
                    return Err(CastError::tex(start, format!("unknown command '\\{name}'")));
                }
            }
        }
        Ok(())
    }
}

fn soft_space(out: &mut String) {
    if !out.is_empty() && !out.ends_with(' ') && !out.ends_with('\n') {
        out.push(' ');
    }
}

/// Operators that fuse with a preceding operator (`::=`, `==`, `<=`, `||`).
fn is_fusable(c: char) -> bool {
    matches!(c, ':' | '=' | '<' | '>' | '!' | '|')
}

fn push_char(out: &mut String, c: char, mode: Mode) {
    if mode == Mode::Text {
        out.push(c);
        return;
    }
    match c {
        '+' | '*' | '/' | '=' | '<' | '>' | ':' => push_op(out, &c.to_string(), mode),
        '-' => push_op(out, "−", mode),
        ',' => {
            out.push(',');
            out.push(' ');
        }
        c => out.push(c),
    }
}

/// Push an operator with TeX-like spacing. Consecutive operators fuse (`::=`, `==`, `||`) and an
/// operator with nothing before it stays unary.
fn push_op(out: &mut String, op: &str, mode: Mode) {
    if mode == Mode::Text {
        out.push_str(op);
        return;
    }
    let trimmed = out.trim_end_matches(' ').len();
    let prev = out[..trimmed].chars().last();
    match prev {
        Some(p) if is_fusable(p) && op.chars().all(is_fusable) => {
            out.truncate(trimmed);
            out.push_str(op);
            out.push(' ');
        }
        None | Some('(') | Some('[') | Some('\n') => {
            out.push_str(op);
        }
        Some(_) => {
            soft_space(out);
            out.push_str(op);
            out.push(' ');
        }
    }
}

fn wrap_compound(s: &str) -> String {
    let s = s.trim();
    if s.chars().all(|c| c.is_alphanumeric()) {
        s.to_owned()
    } else {
        format!("({s})")
    }
}

fn operator_symbol(name: &str) -> Option<&'static str> {
    Some(match name {
        "cdot" => "·",
        "times" => "×",
        "pm" => "±",
        "vdash" => "⊢",
        "rightarrow" | "to" => "→",
        "Rightarrow" => "⇒",
        "leftarrow" => "←",
        "mapsto" => "↦",
        "mid" => "|",
        "le" | "leq" => "≤",
        "ge" | "geq" => "≥",
        "ne" | "neq" => "≠",
        "equiv" => "≡",
        "in" => "∈",
        _ => return None,
    })
}

fn plain_symbol(name: &str) -> Option<&'static str> {
    Some(match name {
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "epsilon" => "ε",
        "lambda" => "λ",
        "mu" => "μ",
        "pi" => "π",
        "rho" => "ρ",
        "sigma" => "σ",
        "tau" => "τ",
        "phi" => "φ",
        "psi" => "ψ",
        "omega" => "ω",
        "Gamma" => "Γ",
        "Delta" => "Δ",
        "Lambda" => "Λ",
        "Sigma" => "Σ",
        "Pi" => "Π",
        "Omega" => "Ω",
        "Theta" => "Θ",
        "Phi" => "Φ",
        "Psi" => "Ψ",
        "infty" => "∞",
        "emptyset" => "∅",
        "ldots" | "dots" | "cdots" => "…",
        "Downarrow" => "⇓",
        _ => return None,
    })
}

fn subscript(s: &str) -> String {
    fn map(c: char) -> Option<char> {
        Some(match c {
            '0'..='9' => char::from_u32('₀' as u32 + (c as u32 - '0' as u32))?,
            '+' => '₊',
            '-' | '−' => '₋',
            '=' => '₌',
            '(' => '₍',
            ')' => '₎',
            'a' => 'ₐ',
            'e' => 'ₑ',
            'o' => 'ₒ',
            'x' => 'ₓ',
            'h' => 'ₕ',
            'k' => 'ₖ',
            'l' => 'ₗ',
            'm' => 'ₘ',
            'n' => 'ₙ',
            'p' => 'ₚ',
            's' => 'ₛ',
            't' => 'ₜ',
            'i' => 'ᵢ',
            'j' => 'ⱼ',
            'r' => 'ᵣ',
            'u' => 'ᵤ',
            'v' => 'ᵥ',
            _ => return None,
        })
    }
    script(s, map, '_')
}

fn superscript(s: &str) -> String {
    fn map(c: char) -> Option<char> {
        Some(match c {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4'..='9' => char::from_u32('⁴' as u32 + (c as u32 - '4' as u32))?,
            '+' => '⁺',
            '-' | '−' => '⁻',
            'n' => 'ⁿ',
            'i' => 'ⁱ',
            _ => return None,
        })
    }
    script(s, map, '^')
}

/// Unicode script characters for digits, signs and single letters. Words stay on the
/// baseline after `marker`, so `\tau_{ret}` and `\tau_{arg}` read alike.
fn script(s: &str, map: fn(char) -> Option<char>, marker: char) -> String {
    let s = s.trim();
    let letters = s.chars().filter(|c| c.is_alphabetic()).count();
    let mapped = if letters > 1 {
        None
    } else {
        s.chars().map(map).collect::<Option<String>>()
    };
    mapped.unwrap_or_else(|| format!("{marker}{s}"))
}

#[cfg(test)]
#[path = "../../tests/unit/tex/plain.rs"]
mod tests;
