//! Feature qualifiers and the assembly of their (possibly wrapped) values.

use core::fmt;

use flatseq_core::{codes, Diagnostics, Located, Origin};

/// Qualifiers whose wrapped continuation lines are concatenated without a
/// separator. Every other qualifier joins continuation lines with a single
/// space.
pub const NO_SPACE_QUALIFIERS: [&str; 4] =
    ["translation", "replace", "rpt_unit_seq", "PCR_primers"];

/// Whether wrapped lines of `name` join without a separator.
pub fn joins_without_space(name: &str) -> bool {
    NO_SPACE_QUALIFIERS.contains(&name)
}

/// A `/name=value` annotation attached to a feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Qualifier {
    pub name: String,
    /// `None` for a bare `/name` flag.
    pub value: Option<String>,
    /// The value was written between double quotes.
    pub quoted: bool,
    pub origin: Origin,
}

impl Qualifier {
    /// A quoted qualifier.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            quoted: true,
            origin: Origin::default(),
        }
    }

    /// An unquoted qualifier such as `/codon_start=1`.
    pub fn unquoted(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            quoted: false,
            ..Self::new(name, value)
        }
    }

    /// A valueless flag such as `/pseudo`.
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            quoted: false,
            origin: Origin::default(),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Text as written in a feature table, starting with `/`. Quotes inside
    /// quoted values are doubled.
    pub fn flat_text(&self) -> String {
        match &self.value {
            None => format!("/{}", self.name),
            Some(v) if self.quoted => format!("/{}=\"{}\"", self.name, v.replace('"', "\"\"")),
            Some(v) => format!("/{}={}", self.name, v),
        }
    }
}

impl Located for Qualifier {
    fn origin(&self) -> Origin {
        self.origin
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flat_text())
    }
}

/// Whether `text` leaves a quoted value open, counting every `"`.
///
/// Doubled quotes inside a value contribute two and so never change the
/// answer.
pub fn has_open_quote(text: &str) -> bool {
    quote_count(text) % 2 == 1
}

/// Collects the lines of one qualifier and assembles its value.
///
/// ```
/// use flatseq_core::Diagnostics;
/// use flatseq_record::qualifier::QualifierAssembler;
///
/// let mut asm = QualifierAssembler::new(7, "/note=\"first part");
/// asm.push_line(8, "second part\"");
/// let mut diagnostics = Diagnostics::new();
/// let q = asm.finish(&mut diagnostics).unwrap();
/// assert_eq!(q.value(), Some("first part second part"));
/// assert_eq!((q.origin.first_line, q.origin.last_line), (7, 8));
/// ```
#[derive(Debug, Clone)]
pub struct QualifierAssembler {
    lines: Vec<(u32, String)>,
}

impl QualifierAssembler {
    /// Start a qualifier from its first line, which begins with `/`.
    pub fn new(line: u32, text: &str) -> Self {
        Self {
            lines: vec![(line, text.trim_end().to_string())],
        }
    }

    /// Append a continuation line.
    pub fn push_line(&mut self, line: u32, text: &str) {
        self.lines.push((line, text.trim().to_string()));
    }

    /// Whether the text gathered so far leaves a quoted value open, in which
    /// case the next line belongs to this qualifier even if it starts with `/`.
    ///
    /// Only a value that opens with `"` can be open. A stray quote inside an
    /// unquoted value is plain content.
    pub fn in_quotes(&self) -> bool {
        let Some((_, first)) = self.lines.first() else {
            return false;
        };
        let Some((_, value)) = first.split_once('=') else {
            return false;
        };
        let value = value.trim_start();
        if !value.starts_with('"') {
            return false;
        }
        let rest = self.lines[1..].iter().map(|(_, t)| quote_count(t));
        (quote_count(value) + rest.sum::<usize>()) % 2 == 1
    }

    pub fn origin(&self) -> Origin {
        let first = self.lines.first().map(|l| l.0).unwrap_or(0);
        let last = self.lines.last().map(|l| l.0).unwrap_or(first);
        Origin::new(first, last)
    }

    /// Assemble the qualifier. Returns `None` when the first line has no
    /// usable name.
    pub fn finish(self, diagnostics: &mut Diagnostics) -> Option<Qualifier> {
        let origin = self.origin();
        let mut lines = self.lines.into_iter();
        let (_, first) = lines.next()?;
        let body = first.trim_start().strip_prefix('/')?;

        let (name, first_value) = match body.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value)),
            None => (body.trim(), None),
        };
        if name.is_empty() || name.contains(char::is_whitespace) {
            diagnostics.warning(
                codes::INVALID_QUALIFIER_NAME,
                origin,
                format!("Invalid qualifier name '{name}'"),
            );
            return None;
        }
        let name = name.to_string();

        let Some(first_value) = first_value else {
            return Some(Qualifier {
                name,
                value: None,
                quoted: false,
                origin,
            });
        };

        let separator = if joins_without_space(&name) { "" } else { " " };
        let mut raw = first_value.trim().to_string();
        for (_, line) in lines {
            if line.is_empty() {
                continue;
            }
            if !raw.is_empty() {
                raw.push_str(separator);
            }
            raw.push_str(&line);
        }

        let (value, quoted) = if let Some(inner) = raw.strip_prefix('"') {
            match inner.strip_suffix('"') {
                Some(inner) if !has_open_quote(inner) => (Some(inner.replace("\"\"", "\"")), true),
                _ => {
                    diagnostics.error(
                        codes::UNTERMINATED_QUALIFIER,
                        origin,
                        format!("Unterminated quoted value for qualifier /{name}"),
                    );
                    (None, true)
                }
            }
        } else {
            (Some(raw), false)
        };

        let value = value.map(|v| {
            if separator.is_empty() {
                v
            } else {
                collapse_whitespace(&v)
            }
        });

        Some(Qualifier {
            name,
            value,
            quoted,
            origin,
        })
    }
}

fn quote_count(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'"').count()
}

/// Join the whitespace-separated words of `text` with single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
