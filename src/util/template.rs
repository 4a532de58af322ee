//! printf-style command templates with call-site validation.
//!
//! Supported placeholders: `%s` (verbatim), `%d`/`%i` (signed integer),
//! `%u` (unsigned integer), `%q` (shell-quoted) and `%%` (literal percent).
//! Arguments are already stringified; typed placeholders only check them.
use std::fmt;

use crate::errors::TemplateError;
use crate::util::{has_line_break, shell_escape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Str,
    Signed(char),
    Unsigned,
    Quoted,
}

impl Placeholder {
    fn from_char(c: char) -> Option<Self> {
        match c {
            's' => Some(Placeholder::Str),
            'd' | 'i' => Some(Placeholder::Signed(c)),
            'u' => Some(Placeholder::Unsigned),
            'q' => Some(Placeholder::Quoted),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            Placeholder::Str => 's',
            Placeholder::Signed(c) => c,
            Placeholder::Unsigned => 'u',
            Placeholder::Quoted => 'q',
        }
    }

    fn render(self, index: usize, value: &str, out: &mut String) -> Result<(), TemplateError> {
        let not_int = || TemplateError::NotAnInteger {
            index,
            placeholder: self.as_char(),
            value: value.to_string(),
        };
        match self {
            Placeholder::Str => out.push_str(value),
            Placeholder::Signed(_) => {
                value.parse::<i128>().map_err(|_| not_int())?;
                out.push_str(value);
            }
            Placeholder::Unsigned => {
                value.parse::<u128>().map_err(|_| not_int())?;
                out.push_str(value);
            }
            Placeholder::Quoted => out.push_str(&shell_escape(value)),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Placeholder),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(src: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = src.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            match chars.next() {
                None => return Err(TemplateError::DanglingPercent),
                Some('%') => literal.push('%'),
                Some(k) => {
                    let ph = Placeholder::from_char(k).ok_or(TemplateError::UnknownPlaceholder(k))?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(ph));
                }
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    /// Number of arguments the template consumes.
    pub fn arity(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Slot(_)))
            .count()
    }

    /// Substitute `args` in order. The result never contains a line break.
    pub fn render(&self, args: &[String]) -> Result<String, TemplateError> {
        let expected = self.arity();
        if args.len() != expected {
            return Err(TemplateError::ArgumentCount {
                expected,
                given: args.len(),
            });
        }

        let mut out = String::new();
        let mut next = args.iter().enumerate();
        for seg in &self.segments {
            match seg {
                Segment::Literal(s) => out.push_str(s),
                Segment::Slot(ph) => {
                    // arity was checked above
                    if let Some((i, v)) = next.next() {
                        ph.render(i, v, &mut out)?;
                    }
                }
            }
        }

        if has_line_break(&out) {
            return Err(TemplateError::EmbeddedNewline);
        }
        Ok(out)
    }
}

/// One command: a template plus its ordered, already-stringified arguments.
///
/// ```
/// use overlay_script::CommandLine;
///
/// let line = CommandLine::new("mount %s %s").arg("/dev/loop0").arg("/mnt/overlay");
/// assert_eq!(line.render().unwrap(), "mount /dev/loop0 /mnt/overlay");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    template: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.args.push(value.to_string());
        self
    }

    pub fn args<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        for v in values {
            self.args.push(v.to_string());
        }
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Render without the trailing newline.
    pub fn render(&self) -> Result<String, TemplateError> {
        Template::parse(&self.template)?.render(&self.args)
    }
}
