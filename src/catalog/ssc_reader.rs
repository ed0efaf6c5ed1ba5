//! # Legacy SSC catalog reader
//!
//! Tokenizes the Celestia solar-system catalog format into [`SscRecord`]s. The transformation
//! into current-schema items lives in [`super::ssc_transform`].
//!
//! ## Grammar
//!
//! ```text
//! file     := record*
//! record   := disposition? kind? STRING STRING group
//! disposition := "Add" | "Replace" | "Modify"
//! kind     := "Body" | "ReferencePoint" | "AltSurface" | "Location"
//! group    := "{" (IDENT value)* "}"
//! value    := STRING | NUMBER | "true" | "false" | "[" NUMBER* "]" | group
//! ```
//!
//! `#` starts a comment running to the end of the line. The first string of a record is the
//! object name, optionally followed by `:`-separated aliases; the second is the parent path.
//!
//! Every record remembers the line it starts on, and syntax errors report the line of the
//! offending token.
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{alpha1, alphanumeric1, char, multispace1, not_line_ending},
    combinator::{map, opt, recognize, value},
    multi::{many0, many0_count},
    number::complete::double,
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};

use crate::orrery_errors::OrreryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    #[default]
    Add,
    Replace,
    Modify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SscKind {
    #[default]
    Body,
    ReferencePoint,
    AltSurface,
    Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SscValue {
    Number(f64),
    String(String),
    Bool(bool),
    Vector(Vec<f64>),
    Group(Vec<(String, SscValue)>),
}

impl SscValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SscValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SscValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            SscValue::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&[(String, SscValue)]> {
        match self {
            SscValue::Group(g) => Some(g),
            _ => None,
        }
    }

    /// First property named `key` in a group.
    pub fn get(&self, key: &str) -> Option<&SscValue> {
        self.as_group()?
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }
}

/// One object definition of an SSC file.
#[derive(Debug, Clone, PartialEq)]
pub struct SscRecord {
    pub disposition: Disposition,
    pub kind: SscKind,
    pub name: String,
    pub aliases: Vec<String>,
    pub parent: String,
    /// Property group, in file order.
    pub properties: SscValue,
    /// 1-based line of the record's first token.
    pub line: usize,
}

impl SscRecord {
    pub fn get(&self, key: &str) -> Option<&SscValue> {
        self.properties.get(key)
    }
}

fn comment(input: &str) -> IResult<&str, &str> {
    preceded(char('#'), not_line_ending)(input)
}

/// Whitespace and comments.
fn ws(input: &str) -> IResult<&str, ()> {
    map(many0_count(alt((multispace1, comment))), |_| ())(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c| c == '"'), char('"'))(input)
}

fn vector(input: &str) -> IResult<&str, Vec<f64>> {
    delimited(
        char('['),
        many0(preceded(ws, double)),
        preceded(ws, char(']')),
    )(input)
}

fn property(input: &str) -> IResult<&str, (String, SscValue)> {
    let (input, key) = identifier(input)?;
    let (input, val) = preceded(ws, ssc_value)(input)?;
    Ok((input, (key.to_string(), val)))
}

fn group(input: &str) -> IResult<&str, Vec<(String, SscValue)>> {
    delimited(
        char('{'),
        many0(preceded(ws, property)),
        preceded(ws, char('}')),
    )(input)
}

fn ssc_value(input: &str) -> IResult<&str, SscValue> {
    alt((
        map(quoted, |s| SscValue::String(s.to_string())),
        value(SscValue::Bool(true), terminated(tag("true"), keyword_end)),
        value(SscValue::Bool(false), terminated(tag("false"), keyword_end)),
        map(vector, SscValue::Vector),
        map(group, SscValue::Group),
        map(double, SscValue::Number),
    ))(input)
}

/// A keyword must not run into an identifier character.
fn keyword_end(input: &str) -> IResult<&str, ()> {
    match input.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => Err(nom::Err::Error(
            nom::error::Error::new(input, nom::error::ErrorKind::Tag),
        )),
        _ => Ok((input, ())),
    }
}

fn disposition(input: &str) -> IResult<&str, Disposition> {
    alt((
        value(Disposition::Add, tag("Add")),
        value(Disposition::Replace, tag("Replace")),
        value(Disposition::Modify, tag("Modify")),
    ))(input)
}

fn kind(input: &str) -> IResult<&str, SscKind> {
    alt((
        value(SscKind::Body, tag("Body")),
        value(SscKind::ReferencePoint, tag("ReferencePoint")),
        value(SscKind::AltSurface, tag("AltSurface")),
        value(SscKind::Location, tag("Location")),
    ))(input)
}

fn record(input: &str) -> IResult<&str, SscRecord> {
    let (input, disposition) = opt(terminated(disposition, ws))(input)?;
    let (input, kind) = opt(terminated(kind, ws))(input)?;
    let (input, names) = terminated(quoted, ws)(input)?;
    let (input, parent) = terminated(quoted, ws)(input)?;
    let (input, properties) = group(input)?;

    let mut names = names.split(':').map(str::trim);
    let name = names.next().unwrap_or_default().to_string();
    let aliases = names.filter(|a| !a.is_empty()).map(String::from).collect();

    Ok((
        input,
        SscRecord {
            disposition: disposition.unwrap_or_default(),
            kind: kind.unwrap_or_default(),
            name,
            aliases,
            parent: parent.trim().to_string(),
            properties: SscValue::Group(properties),
            line: 0,
        },
    ))
}

/// 1-based line number of the position where `rest` starts inside `text`.
fn line_of(text: &str, rest: &str) -> usize {
    let offset = text.len() - rest.len();
    text[..offset].matches('\n').count() + 1
}

fn describe(rest: &str) -> String {
    let token: String = rest
        .trim_start()
        .chars()
        .take_while(|c| !c.is_whitespace())
        .take(24)
        .collect();
    if token.is_empty() {
        "unexpected end of file".to_string()
    } else {
        format!("unexpected '{token}'")
    }
}

/// Parse a whole SSC document.
///
/// Return
/// ------
/// * the records in file order, or [`OrreryError::ParseError`] at the first syntax error
pub fn parse_ssc(text: &str) -> Result<Vec<SscRecord>, OrreryError> {
    let mut records = Vec::new();
    let (mut rest, _) = ws(text).map_err(|_| OrreryError::ParseError {
        line: 1,
        message: "unreadable input".into(),
    })?;

    while !rest.is_empty() {
        let line = line_of(text, rest);
        match record(rest) {
            Ok((remaining, mut rec)) => {
                rec.line = line;
                records.push(rec);
                rest = match ws(remaining) {
                    Ok((r, _)) => r,
                    Err(_) => remaining,
                };
            }
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                return Err(OrreryError::ParseError {
                    line: line_of(text, e.input),
                    message: describe(e.input),
                });
            }
            Err(nom::Err::Incomplete(_)) => {
                return Err(OrreryError::ParseError {
                    line: line_of(text, ""),
                    message: "unexpected end of file".into(),
                });
            }
        }
    }

    Ok(records)
}
