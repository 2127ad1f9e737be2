//! Recursive-descent parser for the feature location grammar.
//!
//! ```text
//! compound     := ['complement' '('] simpleOrList [')']
//! simpleOrList := ('join' | 'order') '(' location (',' location)* ')'
//!               | location
//! location     := ['complement' '('] atom [')']
//! atom         := [accession ':'] boundary | 'gap' '(' ['unk'] integer ')'
//! boundary     := pos | pos '..' pos | pos '^' pos
//! pos          := ['<' | '>'] integer
//! accession    := identifier ['.' version]
//! ```
//!
//! `complement`, `join`, `order` and `gap` are reserved words, so a single
//! token of lookahead decides every production. Location text may span
//! several physical lines; [`LocationText`] concatenates them and maps every
//! token back to the line it came from so each parsed element gets an exact
//! [`Origin`].

use core::fmt;

use flatseq_core::Origin;

use crate::location::{CompoundKind, CompoundLocation, Location, LocationKind};

/// Location expression text reassembled from physical lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationText {
    text: String,
    /// `(byte offset where the line's text starts, line number)`
    segments: Vec<(usize, u32)>,
}

impl LocationText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text from a single line.
    pub fn single(line: u32, text: &str) -> Self {
        let mut t = Self::new();
        t.push_line(line, text);
        t
    }

    /// Append the text of the next physical line. Surrounding whitespace is
    /// insignificant and dropped.
    pub fn push_line(&mut self, line: u32, text: &str) {
        self.segments.push((self.text.len(), line));
        self.text.push_str(text.trim());
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Physical line holding the byte at `offset`.
    pub fn line_at(&self, offset: usize) -> u32 {
        let idx = self.segments.partition_point(|&(start, _)| start <= offset);
        self.segments
            .get(idx.saturating_sub(1))
            .map(|&(_, line)| line)
            .unwrap_or(0)
    }

    /// Span of all lines pushed so far.
    pub fn origin(&self) -> Origin {
        match (self.segments.first(), self.segments.last()) {
            (Some(&(_, first)), Some(&(_, last))) => Origin::new(first, last),
            _ => Origin::default(),
        }
    }
}

/// Why a location expression was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at offset {offset}")]
pub struct LocationError {
    pub message: String,
    /// Byte offset into the reassembled expression.
    pub offset: usize,
}

type ParseResult<T> = std::result::Result<T, LocationError>;

/// Location grammar parser.
///
/// # Examples
///
/// ```
/// use flatseq_record::location_parser::LocationParser;
///
/// let loc = LocationParser::new().parse_str("complement(join(<1,2..34))").unwrap();
/// assert!(loc.complement);
/// assert!(loc.left_partial);
/// assert_eq!(loc.locations.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationParser {
    allow_gaps: bool,
}

impl LocationParser {
    /// Parser for feature locations (`gap(...)` rejected).
    pub fn new() -> Self {
        Self { allow_gaps: false }
    }

    /// Parser for contig assembly lines (`gap(...)` accepted).
    pub fn contig() -> Self {
        Self { allow_gaps: true }
    }

    /// Parse an expression held on one line (line 1).
    pub fn parse_str(&self, text: &str) -> ParseResult<CompoundLocation> {
        self.parse(&LocationText::single(1, text))
    }

    /// Parse a (possibly multi-line) expression.
    pub fn parse(&self, text: &LocationText) -> ParseResult<CompoundLocation> {
        let tokens = tokenize(text.as_str())?;
        let mut parser = Parser {
            text,
            tokens,
            pos: 0,
            allow_gaps: self.allow_gaps,
        };
        parser.compound()
    }
}

/// Parse a feature location held on a single line.
pub fn parse_location(text: &str) -> ParseResult<CompoundLocation> {
    LocationParser::new().parse_str(text)
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Ident(String),
    Number(u64),
    LParen,
    RParen,
    Comma,
    Colon,
    DotDot,
    Dot,
    Caret,
    Lt,
    Gt,
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tok::Ident(s) => write!(f, "'{s}'"),
            Tok::Number(n) => write!(f, "'{n}'"),
            Tok::LParen => write!(f, "'('"),
            Tok::RParen => write!(f, "')'"),
            Tok::Comma => write!(f, "','"),
            Tok::Colon => write!(f, "':'"),
            Tok::DotDot => write!(f, "'..'"),
            Tok::Dot => write!(f, "'.'"),
            Tok::Caret => write!(f, "'^'"),
            Tok::Lt => write!(f, "'<'"),
            Tok::Gt => write!(f, "'>'"),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    tok: Tok,
    start: usize,
    end: usize,
}

fn tokenize(input: &str) -> ParseResult<Vec<Token>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let ch = bytes[pos];
        let tok = match ch {
            b' ' | b'\t' | b'\r' | b'\n' => {
                pos += 1;
                continue;
            }
            b'(' => Tok::LParen,
            b')' => Tok::RParen,
            b',' => Tok::Comma,
            b':' => Tok::Colon,
            b'^' => Tok::Caret,
            b'<' => Tok::Lt,
            b'>' => Tok::Gt,
            b'.' => {
                if bytes.get(pos + 1) == Some(&b'.') {
                    pos += 1;
                    Tok::DotDot
                } else {
                    Tok::Dot
                }
            }
            b'0'..=b'9' => {
                while pos + 1 < bytes.len() && bytes[pos + 1].is_ascii_digit() {
                    pos += 1;
                }
                let digits = &input[start..=pos];
                let value = digits.parse::<u64>().map_err(|_| LocationError {
                    message: format!("number '{digits}' is out of range"),
                    offset: start,
                })?;
                Tok::Number(value)
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while pos + 1 < bytes.len()
                    && (bytes[pos + 1].is_ascii_alphanumeric() || bytes[pos + 1] == b'_')
                {
                    pos += 1;
                }
                Tok::Ident(input[start..=pos].to_string())
            }
            _ => {
                let c = input[start..].chars().next().unwrap_or('?');
                return Err(LocationError {
                    message: format!("unexpected character '{c}'"),
                    offset: start,
                });
            }
        };
        pos += 1;
        tokens.push(Token { tok, start, end: pos });
    }

    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

const RESERVED: [&str; 4] = ["complement", "join", "order", "gap"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Before,
    After,
}

struct Parser<'a> {
    text: &'a LocationText,
    tokens: Vec<Token>,
    pos: usize,
    allow_gaps: bool,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|t| &t.tok)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|t| t.start)
            .unwrap_or_else(|| self.text.as_str().len())
    }

    fn error<T>(&self, message: impl Into<String>) -> ParseResult<T> {
        Err(LocationError {
            message: message.into(),
            offset: self.offset(),
        })
    }

    fn unexpected<T>(&self, expected: &str) -> ParseResult<T> {
        match self.peek() {
            Some(tok) => self.error(format!("expected {expected}, found {tok}")),
            None => self.error(format!("expected {expected}, found end of location")),
        }
    }

    fn expect(&mut self, tok: Tok) -> ParseResult<Token> {
        match self.tokens.get(self.pos) {
            Some(token) if token.tok == tok => {
                let token = token.clone();
                self.pos += 1;
                Ok(token)
            }
            _ => self.unexpected(&tok.to_string()),
        }
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Tok::Ident(s)) if s.eq_ignore_ascii_case(keyword))
    }

    /// Consume `keyword (`.
    fn open(&mut self, keyword: &str) -> ParseResult<()> {
        if !self.at_keyword(keyword) {
            return self.unexpected(&format!("'{keyword}'"));
        }
        self.advance();
        self.expect(Tok::LParen)?;
        Ok(())
    }

    fn origin_of(&self, first: usize, last: usize) -> Origin {
        let start = self.tokens[first].start;
        let end = self.tokens[last].end.saturating_sub(1);
        Origin::new(self.text.line_at(start), self.text.line_at(end))
    }

    fn compound(&mut self) -> ParseResult<CompoundLocation> {
        if self.tokens.is_empty() {
            return self.error("empty location");
        }

        let complement = self.at_keyword("complement");
        if complement {
            self.open("complement")?;
        }

        let (kind, locations) = if self.at_keyword("join") || self.at_keyword("order") {
            let kind = if self.at_keyword("join") {
                CompoundKind::Join
            } else {
                CompoundKind::Order
            };
            self.advance();
            self.expect(Tok::LParen)?;
            let mut locations = vec![self.location()?];
            while self.peek() == Some(&Tok::Comma) {
                self.advance();
                locations.push(self.location()?);
            }
            self.expect(Tok::RParen)?;
            (kind, locations)
        } else {
            (CompoundKind::Join, vec![self.location()?])
        };

        if complement {
            self.expect(Tok::RParen)?;
        }
        if self.peek().is_some() {
            return self.unexpected("end of location");
        }

        let mut compound = CompoundLocation::new(kind, locations, self.text.origin());
        compound.complement = complement;
        Ok(compound)
    }

    fn location(&mut self) -> ParseResult<Location> {
        let first = self.pos;
        let complement = self.at_keyword("complement");
        if complement {
            self.open("complement")?;
        }
        let mut location = self.atom()?;
        if complement {
            self.expect(Tok::RParen)?;
        }
        location.complement = complement;
        location.origin = self.origin_of(first, self.pos - 1);
        Ok(location)
    }

    fn atom(&mut self) -> ParseResult<Location> {
        let remote = match self.peek() {
            Some(Tok::Ident(name)) if name.eq_ignore_ascii_case("gap") => return self.gap(),
            Some(Tok::Ident(name)) if RESERVED.iter().any(|r| name.eq_ignore_ascii_case(r)) => {
                return self.error(format!("'{name}' cannot be nested inside a location element"));
            }
            Some(Tok::Ident(name)) => {
                let accession = name.clone();
                self.advance();
                let version = if self.peek() == Some(&Tok::Dot) {
                    self.advance();
                    let version = self.number()?;
                    Some(u32::try_from(version).or_else(|_| {
                        self.error(format!("version {version} is out of range"))
                    })?)
                } else {
                    None
                };
                self.expect(Tok::Colon)?;
                Some((accession, version))
            }
            _ => None,
        };

        let (first_marker, first) = self.position()?;
        let (kind, left_partial, right_partial) = match self.peek() {
            Some(Tok::DotDot) => {
                self.advance();
                let (second_marker, second) = self.position()?;
                if first_marker == Some(Marker::After) {
                    return self.error("'>' is not allowed on a range start");
                }
                if second_marker == Some(Marker::Before) {
                    return self.error("'<' is not allowed on a range end");
                }
                if first > second {
                    return self.error(format!("range start {first} is after range end {second}"));
                }
                let kind = match remote {
                    Some((accession, version)) => LocationKind::RemoteRange {
                        accession,
                        version,
                        begin: first,
                        end: second,
                    },
                    None => LocationKind::LocalRange { begin: first, end: second },
                };
                (
                    kind,
                    first_marker == Some(Marker::Before),
                    second_marker == Some(Marker::After),
                )
            }
            Some(Tok::Caret) => {
                self.advance();
                let (second_marker, second) = self.position()?;
                if first_marker.is_some() || second_marker.is_some() {
                    return self.error("partial markers are not allowed on a between location");
                }
                let kind = match remote {
                    Some((accession, version)) => LocationKind::RemoteBetween {
                        accession,
                        version,
                        begin: first,
                        end: second,
                    },
                    None => LocationKind::LocalBetween { begin: first, end: second },
                };
                (kind, false, false)
            }
            _ => {
                let kind = match remote {
                    Some((accession, version)) => LocationKind::RemoteBase {
                        accession,
                        version,
                        position: first,
                    },
                    None => LocationKind::LocalBase { position: first },
                };
                (
                    kind,
                    first_marker == Some(Marker::Before),
                    first_marker == Some(Marker::After),
                )
            }
        };

        let mut location = Location::new(kind, Origin::default());
        location.left_partial = left_partial;
        location.right_partial = right_partial;
        Ok(location)
    }

    fn gap(&mut self) -> ParseResult<Location> {
        if !self.allow_gaps {
            return self.error("gap() is only allowed in contig locations");
        }
        self.open("gap")?;
        let (length, unknown_length) = match self.peek() {
            Some(Tok::Number(n)) => (*n, false),
            Some(Tok::Ident(s)) if s.len() > 3 && s[..3].eq_ignore_ascii_case("unk") => {
                match s[3..].parse::<u64>() {
                    Ok(n) => (n, true),
                    Err(_) => return self.error(format!("invalid gap length '{s}'")),
                }
            }
            _ => return self.unexpected("gap length"),
        };
        self.advance();
        self.expect(Tok::RParen)?;
        Ok(Location::new(
            LocationKind::Gap { length, unknown_length },
            Origin::default(),
        ))
    }

    fn position(&mut self) -> ParseResult<(Option<Marker>, u64)> {
        let marker = match self.peek() {
            Some(Tok::Lt) => Some(Marker::Before),
            Some(Tok::Gt) => Some(Marker::After),
            _ => None,
        };
        if marker.is_some() {
            self.advance();
        }
        Ok((marker, self.number()?))
    }

    fn number(&mut self) -> ParseResult<u64> {
        match self.peek() {
            Some(Tok::Number(n)) => {
                let n = *n;
                self.advance();
                Ok(n)
            }
            _ => self.unexpected("a number"),
        }
    }
}
