//! Gabarit d'email à marqueurs `{nom}`.
//!
//! Marqueurs reconnus : `{to_email}`, `{year}`, `{santa}`, `{giftee}`,
//! `{signoff_name}`. La variante positionnelle `{}` / `{0}` / `{1}` reçoit
//! le père Noël puis le destinataire. `{{` et `}}` produisent une accolade.
//! Le texte rendu est le message brut complet (en-têtes compris).

use anyhow::Context;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown placeholder {{{name}}} at byte {offset}")]
    UnknownPlaceholder { name: String, offset: usize },
    #[error("unclosed '{{' at byte {0}")]
    Unclosed(usize),
    #[error("single '}}' at byte {0} (use '}}}}' for a literal brace)")]
    UnmatchedClose(usize),
    #[error("positional placeholder #{0} out of range (only santa and giftee are available)")]
    PositionalOutOfRange(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    ToEmail,
    Year,
    Santa,
    Giftee,
    SignoffName,
}

impl Placeholder {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "to_email" => Some(Self::ToEmail),
            "year" => Some(Self::Year),
            "santa" => Some(Self::Santa),
            "giftee" => Some(Self::Giftee),
            "signoff_name" => Some(Self::SignoffName),
            _ => None,
        }
    }

    fn from_position(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Santa),
            1 => Some(Self::Giftee),
            _ => None,
        }
    }
}

/// Valeurs injectées dans le gabarit pour un père Noël.
#[derive(Debug, Clone, Copy)]
pub struct MessageContext<'a> {
    pub to_email: &'a str,
    pub year: i32,
    pub santa: &'a str,
    pub giftee: &'a str,
    pub signoff_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    segments: Vec<Segment>,
}

impl EmailTemplate {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut next_auto = 0usize;
        let mut chars = source.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    text.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, inner) in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        name.push(inner);
                    }
                    if !closed {
                        return Err(TemplateError::Unclosed(offset));
                    }
                    let field = resolve(&name, offset, &mut next_auto)?;
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    text.push('}');
                }
                '}' => return Err(TemplateError::UnmatchedClose(offset)),
                other => text.push(other),
            }
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }
        Ok(Self { segments })
    }

    /// Charge le gabarit depuis le disque.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading email template");
        let source = fs::read_to_string(path)
            .with_context(|| format!("reading email template {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("parsing email template {}", path.display()))
    }

    /// Marqueurs utilisés, dans l'ordre d'apparition.
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(p) => Some(*p),
            Segment::Text(_) => None,
        })
    }

    pub fn render(&self, ctx: &MessageContext<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(t) => out.push_str(t),
                Segment::Field(Placeholder::ToEmail) => out.push_str(ctx.to_email),
                Segment::Field(Placeholder::Year) => {
                    let _ = write!(out, "{}", ctx.year);
                }
                Segment::Field(Placeholder::Santa) => out.push_str(ctx.santa),
                Segment::Field(Placeholder::Giftee) => out.push_str(ctx.giftee),
                Segment::Field(Placeholder::SignoffName) => out.push_str(ctx.signoff_name),
            }
        }
        out
    }
}

impl FromStr for EmailTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn resolve(name: &str, offset: usize, next_auto: &mut usize) -> Result<Placeholder, TemplateError> {
    let name = name.trim();
    if name.is_empty() {
        let index = *next_auto;
        *next_auto += 1;
        return Placeholder::from_position(index).ok_or(TemplateError::PositionalOutOfRange(index));
    }
    if let Ok(index) = name.parse::<usize>() {
        return Placeholder::from_position(index).ok_or(TemplateError::PositionalOutOfRange(index));
    }
    Placeholder::from_name(name).ok_or_else(|| TemplateError::UnknownPlaceholder {
        name: name.to_string(),
        offset,
    })
}
