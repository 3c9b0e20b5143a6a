use thiserror::Error;

use super::store::{Term, TermStore};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected character '{ch}' at byte {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("expected {expected} at byte {pos}, found '{found}'")]
    Unexpected {
        expected: &'static str,
        found: String,
        pos: usize,
    },
    #[error("trailing input at byte {pos}")]
    Trailing { pos: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Ident(String),
    True,
    False,
    Bang,
    Amp,
    Pipe,
    Arrow,
    Iff,
    LParen,
    RParen,
}

// formula grammar, loosest binding first:
//   iff     := imp ("<->" imp)*
//   imp     := or ("->" or)*        (right associative)
//   or      := and ("|" and)*
//   and     := unary ("&" unary)*
//   unary   := "!" unary | atom
//   atom    := ident | "true" | "false" | "(" iff ")"
pub fn parse_formula(store: &mut TermStore, input: &str) -> Result<Term, ParseError> {
    let toks = tokenize(input)?;
    let mut p = Parser {
        toks,
        at: 0,
        store,
    };
    let term = p.iff()?;
    if p.at < p.toks.len() {
        return Err(ParseError::Trailing {
            pos: p.toks[p.at].1,
        });
    }
    Ok(term)
}

fn tokenize(input: &str) -> Result<Vec<(Tok, usize)>, ParseError> {
    let bytes = input.as_bytes();
    let mut toks = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' | '\r' | '\n' => i += 1,
            '!' | '~' => {
                toks.push((Tok::Bang, i));
                i += 1;
            }
            '&' => {
                toks.push((Tok::Amp, i));
                i += 1;
            }
            '|' => {
                toks.push((Tok::Pipe, i));
                i += 1;
            }
            '(' => {
                toks.push((Tok::LParen, i));
                i += 1;
            }
            ')' => {
                toks.push((Tok::RParen, i));
                i += 1;
            }
            '-' => {
                if bytes.get(i + 1) == Some(&b'>') {
                    toks.push((Tok::Arrow, i));
                    i += 2;
                } else {
                    return Err(ParseError::UnexpectedChar { ch: '-', pos: i });
                }
            }
            '<' => {
                if bytes.get(i + 1) == Some(&b'-') && bytes.get(i + 2) == Some(&b'>') {
                    toks.push((Tok::Iff, i));
                    i += 3;
                } else {
                    return Err(ParseError::UnexpectedChar { ch: '<', pos: i });
                }
            }
            _ if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < bytes.len() {
                    let c = bytes[i] as char;
                    if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                        i += 1;
                    } else {
                        break;
                    }
                }
                let word = &input[start..i];
                let tok = match word {
                    "true" => Tok::True,
                    "false" => Tok::False,
                    _ => Tok::Ident(word.to_owned()),
                };
                toks.push((tok, start));
            }
            _ => return Err(ParseError::UnexpectedChar { ch: c, pos: i }),
        }
    }
    Ok(toks)
}

struct Parser<'a> {
    toks: Vec<(Tok, usize)>,
    at: usize,
    store: &'a mut TermStore,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.at).map(|(t, _)| t)
    }

    fn bump(&mut self) -> Option<Tok> {
        let tok = self.toks.get(self.at).map(|(t, _)| t.clone());
        if tok.is_some() {
            self.at += 1;
        }
        tok
    }

    fn iff(&mut self) -> Result<Term, ParseError> {
        let mut lhs = self.imp()?;
        while self.peek() == Some(&Tok::Iff) {
            self.at += 1;
            let rhs = self.imp()?;
            lhs = self.store.iff(lhs, rhs);
        }
        Ok(lhs)
    }

    fn imp(&mut self) -> Result<Term, ParseError> {
        let lhs = self.or()?;
        if self.peek() == Some(&Tok::Arrow) {
            self.at += 1;
            // recurse so a -> b -> c groups as a -> (b -> c)
            let rhs = self.imp()?;
            return Ok(self.store.implies(lhs, rhs));
        }
        Ok(lhs)
    }

    fn or(&mut self) -> Result<Term, ParseError> {
        let mut parts = vec![self.and()?];
        while self.peek() == Some(&Tok::Pipe) {
            self.at += 1;
            parts.push(self.and()?);
        }
        if parts.len() == 1 {
            return Ok(parts[0]);
        }
        Ok(self.store.or(parts))
    }

    fn and(&mut self) -> Result<Term, ParseError> {
        let mut parts = vec![self.unary()?];
        while self.peek() == Some(&Tok::Amp) {
            self.at += 1;
            parts.push(self.unary()?);
        }
        if parts.len() == 1 {
            return Ok(parts[0]);
        }
        Ok(self.store.and(parts))
    }

    fn unary(&mut self) -> Result<Term, ParseError> {
        if self.peek() == Some(&Tok::Bang) {
            self.at += 1;
            let inner = self.unary()?;
            return Ok(self.store.not(inner));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Term, ParseError> {
        let pos = self.toks.get(self.at).map(|(_, p)| *p).unwrap_or(0);
        match self.bump() {
            Some(Tok::Ident(name)) => Ok(self.store.atom(&name)),
            Some(Tok::True) => Ok(self.store.truth()),
            Some(Tok::False) => Ok(self.store.falsity()),
            Some(Tok::LParen) => {
                let inner = self.iff()?;
                match self.bump() {
                    Some(Tok::RParen) => Ok(inner),
                    Some(tok) => Err(ParseError::Unexpected {
                        expected: "')'",
                        found: format!("{:?}", tok),
                        pos,
                    }),
                    None => Err(ParseError::UnexpectedEnd { expected: "')'" }),
                }
            }
            Some(tok) => Err(ParseError::Unexpected {
                expected: "atom",
                found: format!("{:?}", tok),
                pos,
            }),
            None => Err(ParseError::UnexpectedEnd { expected: "atom" }),
        }
    }
}
