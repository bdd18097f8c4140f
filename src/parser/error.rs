//! Error type returned by the grammar walker upon failure.
//!
//! This error type is used to provide context to an error which occurs during the parsing stage.
use std::fmt::{self, Display};

use thiserror::Error;

/// Anything that could possibly go wrong while walking the markup.
///
/// The hover builder never surfaces this error to its callers: it logs it and falls back to an
/// uninstrumented render. It is public for callers that drive the [`Parser`](super::Parser)
/// directly.
#[derive(Debug, Error)]
pub struct ParserError {
    context: Option<(Box<str>, usize)>,
    position: usize,
    #[source]
    error: ErrorKind,
}

impl ParserError {
    pub(super) fn new(error: ErrorKind, input: &str, position: usize) -> Self {
        const CONTEXT_SIZE: usize = 15;

        let position = position.min(input.len());
        let start = floor_char_boundary(input, position.saturating_sub(CONTEXT_SIZE));
        let end = floor_char_boundary(input, position + CONTEXT_SIZE);
        let context = (!input.is_empty())
            .then(|| (input[start..end].into(), input[start..position].chars().count()));

        Self {
            context,
            position,
            error,
        }
    }

    /// Byte offset of the input where the error was detected.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error
    }
}

impl Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Error while parsing: ")?;
        self.error.fmt(f)?;
        if let Some((context, char_position)) = &self.context {
            let context = context.replace(['\n', '\t'], " ");
            f.write_str("\n --> Context: ")?;
            const PREFIX_LEN: usize = 14;
            f.write_str(&context)?;
            f.write_str("\n")?;
            f.write_fmt(format_args!("{:>1$}", "^", char_position + PREFIX_LEN + 1))?;
        }
        Ok(())
    }
}

pub(crate) type InnerResult<T> = std::result::Result<T, ErrorKind>;

/// What kind of group was left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupType {
    /// The group was initiated by a `{` character.
    Brace,
    /// The group was initiated by a `[` character.
    Bracket,
}

impl Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupType::Brace => f.write_str("`}`"),
            GroupType::Bracket => f.write_str("`]`"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    #[error("unbalanced group found, expected {0}")]
    UnbalancedGroup(GroupType),
    #[error("unexpected closing brace `}}` with no group open")]
    StrayClosingBrace,
    #[error("missing argument for command `\\{0}`")]
    MissingArgument(String),
    #[error("expected a delimiter token after `\\{0}`")]
    MissingDelimiter(String),
    #[error("trying to add a superscript with no content")]
    EmptySuperscript,
    #[error("trying to add a subscript with no content")]
    EmptySubscript,
    #[error("subscript and/or superscript found as argument to a command")]
    ScriptAsArgument,
    #[error("unsupported environment `{0}`")]
    UnsupportedEnvironment(String),
    #[error("environment `{expected}` closed by `\\end{{{found}}}`")]
    MismatchedEnvironment { expected: String, found: String },
    #[error("environment `{0}` is never closed")]
    UnclosedEnvironment(String),
    #[error("`\\end` found with no open environment")]
    UnexpectedEnd,
    #[error("expected an environment name delimited by `{{}}`")]
    EnvironmentName,
    #[error("empty control sequence")]
    EmptyControlSequence,
}

fn floor_char_boundary(str: &str, index: usize) -> usize {
    if index >= str.len() {
        str.len()
    } else {
        (0..=index)
            .rev()
            .find(|&i| str.is_char_boundary(i))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_caret() {
        let err = ParserError::new(ErrorKind::StrayClosingBrace, "a + b}", 5);
        let rendered = err.to_string();
        assert!(rendered.starts_with("Error while parsing: unexpected closing brace"));
        assert!(rendered.contains(" --> Context: a + b}"));
        let caret_line = rendered.lines().last().unwrap();
        assert_eq!(caret_line.len(), 14 + 5 + 1);
        assert!(caret_line.ends_with('^'));
    }

    #[test]
    fn context_is_char_aligned() {
        let input = "αβγδεζηθικλμνξοπρστυφχψω}";
        let err = ParserError::new(ErrorKind::StrayClosingBrace, input, input.len() - 1);
        assert_eq!(err.position(), input.len() - 1);
        // Must not panic on a multi-byte boundary.
        let _ = err.to_string();
    }
}
