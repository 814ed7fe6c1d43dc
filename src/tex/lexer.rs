use crate::foundation::error::{CastError, CastResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// `\name` with an alphabetic name.
    Command(String),
    /// `\` followed by one non-letter character (`\ `, `\\`, `\,`, `\{` ...).
    ControlSymbol(char),
    BeginGroup,
    EndGroup,
    Sub,
    Sup,
    Align,
    Tilde,
    /// A run of whitespace, collapsed.
    Space,
    Char(char),
}

pub(crate) fn lex(input: &str) -> CastResult<Vec<Token>> {
    let mut out = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let kind = match c {
            '\\' => {
                let Some(&(_, next)) = chars.peek() else {
                    return Err(CastError::tex(start, "dangling '\\' at end of input"));
                };
                if next.is_ascii_alphabetic() {
                    let mut name = String::new();
                    while let Some(&(_, ch)) = chars.peek() {
                        if !ch.is_ascii_alphabetic() {
                            break;
                        }
                        name.push(ch);
                        chars.next();
                    }
                    TokenKind::Command(name)
                } else {
                    chars.next();
                    TokenKind::ControlSymbol(next)
                }
            }
            '{' => TokenKind::BeginGroup,
            '}' => TokenKind::EndGroup,
            '_' => TokenKind::Sub,
            '^' => TokenKind::Sup,
            '&' => TokenKind::Align,
            '~' => TokenKind::Tilde,
            c if c.is_whitespace() => {
                while let Some(&(_, ch)) = chars.peek() {
                    if !ch.is_whitespace() {
                        break;
                    }
                    chars.next();
                }
                TokenKind::Space
            }
            c => TokenKind::Char(c),
        };
        let end = chars.peek().map(|&(i, _)| i).unwrap_or(input.len());
        out.push(Token {
            kind,
            span: Span { start, end },
        });
    }

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/tex/lexer.rs"]
mod tests;
