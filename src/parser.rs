//! Contains the [`Parser`], which walks input markup and rewrites it into instrumented markup
//! where every atom is wrapped in an id marker.
//!
//! The parser is a recursive descent over a small grammar: brace groups, bracket groups,
//! scripts, commands with a fixed argument arity (see [`tables`]), delimiter-sizing commands,
//! large operators, and a closed set of alignment environments. Anything outside of that
//! grammar is an error, which the [hover builder](crate::hover) turns into a plain render.
mod error;
pub mod tables;

pub use error::{ErrorKind, GroupType, ParserError};

use crate::{
    atom::{AtomId, AtomKind, AtomTable},
    scanner::{read_command_token_at, read_whitespace_run},
};

use self::error::InnerResult;

/// The command used to mark atoms in instrumented markup.
pub const MARKER_COMMAND: &str = "htmlData";
/// The key under which the atom id is passed to [`MARKER_COMMAND`]. Renderers expose it as the
/// `data-ltx-id` attribute.
pub const MARKER_KEY: &str = "ltx-id";

/// The result of a successful walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrumented {
    /// The rewritten markup, which renders like the input but with every atom marked.
    pub markup: String,
    pub atoms: AtomTable,
}

/// Walks the input markup and produces [`Instrumented`] markup.
#[derive(Debug)]
pub struct Parser<'a> {
    /// The input being walked.
    ///
    /// This is required for error reporting to find and display the context of the error.
    input: &'a str,
    /// Byte offset of the next character to read.
    index: usize,
    atoms: AtomTable,
    /// Names of the environments currently open, innermost last.
    environments: Vec<&'a str>,
}

/// Where the current sequence ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    End,
    Brace,
    Bracket,
    Environment,
}

/// The output of parsing one syntactic unit.
enum Piece {
    /// An atom that still needs to be wrapped in its marker.
    Atom {
        id: AtomId,
        content: String,
        /// Whether trailing scripts may be merged into this atom.
        primary: bool,
    },
    /// Text passed through without a marker.
    Raw(String),
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            index: 0,
            atoms: AtomTable::new(),
            environments: Vec::new(),
        }
    }

    /// Walk the whole input.
    pub fn parse(mut self) -> Result<Instrumented, ParserError> {
        match self.sequence(Stop::End) {
            Ok(markup) => Ok(Instrumented {
                markup,
                atoms: self.atoms,
            }),
            Err(kind) => Err(ParserError::new(kind, self.input, self.index)),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.index..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume and return the whitespace at the cursor.
    fn whitespace(&mut self) -> &'a str {
        let spacing = read_whitespace_run(self.input, self.index);
        self.index += spacing.len();
        spacing
    }

    /// Consume the whitespace and `%` comments at the cursor.
    fn gap(&mut self) -> String {
        let mut output = self.whitespace().to_owned();
        while self.peek() == Some('%') {
            self.comment(&mut output);
            output.push_str(self.whitespace());
        }
        output
    }

    /// Name of the command word at the cursor, if any, without consuming it.
    fn peek_command(&self) -> Option<&'a str> {
        read_command_token_at(self.input, self.index).map(|token| token.name)
    }

    /// Parse atoms until the stop condition is met. The closing token is not consumed.
    fn sequence(&mut self, stop: Stop) -> InnerResult<String> {
        let mut output = String::new();
        loop {
            output.push_str(self.whitespace());

            let Some(c) = self.peek() else {
                return match stop {
                    Stop::End => Ok(output),
                    Stop::Brace => Err(ErrorKind::UnbalancedGroup(GroupType::Brace)),
                    Stop::Bracket => Err(ErrorKind::UnbalancedGroup(GroupType::Bracket)),
                    Stop::Environment => Err(ErrorKind::UnclosedEnvironment(
                        self.environments.last().copied().unwrap_or_default().to_owned(),
                    )),
                };
            };

            match c {
                '}' if stop == Stop::Brace => return Ok(output),
                ']' if stop == Stop::Bracket => return Ok(output),
                '}' => return Err(ErrorKind::StrayClosingBrace),
                '%' => {
                    self.comment(&mut output);
                    continue;
                }
                '&' if !self.environments.is_empty() => {
                    output.push('&');
                    self.index += 1;
                    continue;
                }
                '\\' => match self.peek_command() {
                    Some("end") => {
                        return match stop {
                            Stop::Environment => Ok(output),
                            Stop::Brace => Err(ErrorKind::UnbalancedGroup(GroupType::Brace)),
                            Stop::Bracket => Err(ErrorKind::UnbalancedGroup(GroupType::Bracket)),
                            Stop::End => Err(ErrorKind::UnexpectedEnd),
                        };
                    }
                    Some("\\") if !self.environments.is_empty() => {
                        self.row_break(&mut output)?;
                        continue;
                    }
                    Some(name)
                        if tables::is_alignment_rule(name) && !self.environments.is_empty() =>
                    {
                        output.push('\\');
                        output.push_str(name);
                        self.index += name.len() + 1;
                        continue;
                    }
                    _ => {}
                },
                _ => {}
            }

            self.element(&mut output)?;
        }
    }

    /// Parse one atom, merge any scripts that follow it, and write it out.
    fn element(&mut self, output: &mut String) -> InnerResult<()> {
        match self.atom(false)? {
            Piece::Atom {
                id,
                mut content,
                primary,
            } => {
                if primary && self.trailing_scripts(&mut content)? {
                    self.atoms
                        .extend(self.input, id, self.index, AtomKind::Script);
                }
                wrap(output, id, &content);
            }
            Piece::Raw(text) => output.push_str(&text),
        }
        Ok(())
    }

    /// Parse exactly one syntactic unit, without merging trailing scripts.
    ///
    /// When `in_script` is set, the unit is the argument of a script, and large operators do
    /// not swallow the scripts that follow them.
    fn atom(&mut self, in_script: bool) -> InnerResult<Piece> {
        match self.peek() {
            Some('{') => self.group(),
            Some('[') => self.bracket_group(),
            Some('^' | '_') => self.script(),
            Some('\\') => self.command(in_script),
            Some(c) => Ok(self.symbol(c)),
            None => Err(ErrorKind::UnbalancedGroup(GroupType::Brace)),
        }
    }

    fn group(&mut self) -> InnerResult<Piece> {
        let start = self.index;
        self.index += 1;
        let inner = self.sequence(Stop::Brace)?;
        self.index += 1;
        let id = self
            .atoms
            .register(self.input, start, self.index, AtomKind::Group);
        Ok(Piece::Atom {
            id,
            content: format!("{{{inner}}}"),
            primary: true,
        })
    }

    fn bracket_group(&mut self) -> InnerResult<Piece> {
        let start = self.index;
        self.index += 1;
        let inner = self.sequence(Stop::Bracket)?;
        self.index += 1;
        let id = self
            .atoms
            .register(self.input, start, self.index, AtomKind::Group);
        Ok(Piece::Atom {
            id,
            content: format!("[{inner}]"),
            primary: true,
        })
    }

    /// A script with no base in front of it.
    fn script(&mut self) -> InnerResult<Piece> {
        let start = self.index;
        let content = self.script_suffix()?;
        let id = self
            .atoms
            .register(self.input, start, self.index, AtomKind::Script);
        Ok(Piece::Atom {
            id,
            content,
            primary: false,
        })
    }

    /// Parse a `^` or `_` and its argument, returning `op{spacing}{argument}`.
    fn script_suffix(&mut self) -> InnerResult<String> {
        let Some(operator) = self.peek() else {
            return Err(ErrorKind::EmptySuperscript);
        };
        self.index += 1;
        let spacing = self.gap();
        let empty = if operator == '^' {
            ErrorKind::EmptySuperscript
        } else {
            ErrorKind::EmptySubscript
        };
        let argument = match self.peek() {
            None | Some('}') => return Err(empty),
            _ => self.argument(true)?,
        };
        Ok(format!("{operator}{spacing}{{{argument}}}"))
    }

    /// Merge every `^`/`_` suffix that follows the cursor (possibly after whitespace) into
    /// `content`. Returns whether anything was merged.
    ///
    /// Whitespace that is not followed by a script is left unconsumed.
    fn trailing_scripts(&mut self, content: &mut String) -> InnerResult<bool> {
        let mut merged = false;
        loop {
            let mark = self.index;
            let spacing = self.gap();
            if matches!(self.peek(), Some('^' | '_')) {
                content.push_str(&spacing);
                content.push_str(&self.script_suffix()?);
                merged = true;
            } else {
                self.index = mark;
                return Ok(merged);
            }
        }
    }

    /// Parse the argument of a command or a script: either a brace group, or a single atom.
    ///
    /// Returns the wrapped argument.
    fn argument(&mut self, in_script: bool) -> InnerResult<String> {
        if matches!(self.peek(), Some('^' | '_')) {
            return Err(ErrorKind::ScriptAsArgument);
        }
        let mut output = String::new();
        match self.atom(in_script)? {
            Piece::Atom { id, content, .. } => wrap(&mut output, id, &content),
            Piece::Raw(text) => output.push_str(&text),
        }
        Ok(output)
    }

    /// Parse an optional `[...]` argument. The marker goes inside the brackets, so that the
    /// renderer still sees an optional argument.
    fn optional_argument(&mut self) -> InnerResult<String> {
        let start = self.index;
        self.index += 1;
        let inner = self.sequence(Stop::Bracket)?;
        self.index += 1;
        let id = self
            .atoms
            .register(self.input, start, self.index, AtomKind::Group);
        let mut output = String::from("[");
        wrap(&mut output, id, &inner);
        output.push(']');
        Ok(output)
    }

    fn command(&mut self, in_script: bool) -> InnerResult<Piece> {
        let start = self.index;
        let token =
            read_command_token_at(self.input, start).ok_or(ErrorKind::EmptyControlSequence)?;
        if token.name.is_empty() {
            return Err(ErrorKind::EmptyControlSequence);
        }
        self.index = token.end;
        let raw = &self.input[start..token.end];

        if token.is_control_symbol {
            let id = self
                .atoms
                .register(self.input, start, self.index, AtomKind::Command);
            return Ok(Piece::Atom {
                id,
                content: raw.to_owned(),
                primary: true,
            });
        }

        let name = token.base_name();
        match name {
            "begin" => return self.environment(start),
            "end" => return Err(ErrorKind::UnexpectedEnd),
            _ => {}
        }

        if tables::is_delimiter_sizing(name) {
            return self.delimiter_sizing(start, name);
        }
        if tables::is_large_operator(name) {
            return self.large_operator(start, in_script);
        }

        let signature = tables::signature(name);
        let mut content = raw.to_owned();
        for _ in 0..signature.optional {
            let mark = self.index;
            let spacing = self.gap();
            if self.peek() == Some('[') {
                content.push_str(&spacing);
                content.push_str(&self.optional_argument()?);
            } else {
                self.index = mark;
            }
        }
        for _ in 0..signature.required {
            let spacing = self.gap();
            if matches!(self.peek(), None | Some('}')) {
                return Err(ErrorKind::MissingArgument(token.name.to_owned()));
            }
            let argument = self.argument(false)?;
            content.push_str(&spacing);
            content.push('{');
            content.push_str(&argument);
            content.push('}');
        }

        let id = self
            .atoms
            .register(self.input, start, self.index, AtomKind::Command);
        Ok(Piece::Atom {
            id,
            content,
            primary: true,
        })
    }

    /// `\left`, `\big`, and friends: consume one raw delimiter token.
    fn delimiter_sizing(&mut self, start: usize, name: &str) -> InnerResult<Piece> {
        let spacing = self.gap();
        let delimiter_start = self.index;
        match self.peek() {
            None => return Err(ErrorKind::MissingDelimiter(name.to_owned())),
            Some('\\') => {
                let token = read_command_token_at(self.input, self.index)
                    .filter(|token| !token.name.is_empty())
                    .ok_or_else(|| ErrorKind::MissingDelimiter(name.to_owned()))?;
                self.index = token.end;
            }
            Some(c) => self.index += c.len_utf8(),
        }
        let delimiter = &self.input[delimiter_start..self.index];
        let mut content = format!("\\{name}{spacing}{delimiter}");

        if tables::is_paired_delimiter(name) {
            // The scripts of `\right)` belong to the whole `\left...\right` construct, which
            // has no atom of its own. Their arguments are still marked.
            if name == "right" {
                self.trailing_scripts(&mut content)?;
            }
            return Ok(Piece::Raw(content));
        }

        let id = self
            .atoms
            .register(self.input, start, self.index, AtomKind::Command);
        Ok(Piece::Atom {
            id,
            content,
            primary: true,
        })
    }

    /// `\sum`, `\int`, and friends: swallow limits modifiers and scripts into the same atom.
    fn large_operator(&mut self, start: usize, in_script: bool) -> InnerResult<Piece> {
        let mut content = self.input[start..self.index].to_owned();
        let mut has_scripts = false;
        loop {
            let mark = self.index;
            let spacing = self.gap();
            match self.peek_command() {
                Some(modifier @ ("limits" | "nolimits" | "displaylimits")) => {
                    content.push_str(&spacing);
                    content.push('\\');
                    content.push_str(modifier);
                    self.index += modifier.len() + 1;
                    continue;
                }
                _ => {}
            }
            if !in_script && matches!(self.peek(), Some('^' | '_')) {
                content.push_str(&spacing);
                content.push_str(&self.script_suffix()?);
                has_scripts = true;
                continue;
            }
            self.index = mark;
            break;
        }

        let kind = if has_scripts {
            AtomKind::Script
        } else {
            AtomKind::Command
        };
        let id = self.atoms.register(self.input, start, self.index, kind);
        Ok(Piece::Atom {
            id,
            content,
            primary: false,
        })
    }

    /// `\begin{name}...\end{name}`, for the supported alignment environments. The whole block
    /// is one atom; each cell is walked atom by atom.
    fn environment(&mut self, start: usize) -> InnerResult<Piece> {
        let name = self.environment_name()?;
        let arguments = tables::environment_arguments(name)
            .ok_or_else(|| ErrorKind::UnsupportedEnvironment(name.to_owned()))?;
        for _ in 0..arguments {
            self.whitespace();
            if self.peek() != Some('{') {
                return Err(ErrorKind::MissingArgument("begin".to_owned()));
            }
            self.index += 1;
            self.raw_group_content()?;
        }
        let mut content = self.input[start..self.index].to_owned();

        self.environments.push(name);
        let body = self.sequence(Stop::Environment)?;
        self.environments.pop();
        content.push_str(&body);

        let end_start = self.index;
        // `sequence` only stops on an environment when `\end` is at the cursor.
        self.index += "\\end".len();
        let found = self.environment_name()?;
        if found != name {
            return Err(ErrorKind::MismatchedEnvironment {
                expected: name.to_owned(),
                found: found.to_owned(),
            });
        }
        content.push_str(&self.input[end_start..self.index]);

        let id = self
            .atoms
            .register(self.input, start, self.index, AtomKind::Command);
        Ok(Piece::Atom {
            id,
            content,
            primary: true,
        })
    }

    /// Parse `{name}` after `\begin` or `\end`.
    fn environment_name(&mut self) -> InnerResult<&'a str> {
        self.whitespace();
        let rest = self.rest();
        let name = rest
            .strip_prefix('{')
            .and_then(|rest| rest.split_once('}'))
            .map(|(name, _)| name)
            .filter(|name| {
                !name.is_empty()
                    && name.bytes().all(|b| b.is_ascii_alphabetic() || b == b'*')
            })
            .ok_or(ErrorKind::EnvironmentName)?;
        self.index += name.len() + 2;
        Ok(name)
    }

    /// Skip the content of a brace group whose `{` is already consumed, without walking it.
    ///
    /// The content is guaranteed to be balanced.
    fn raw_group_content(&mut self) -> InnerResult<&'a str> {
        let bytes = self.rest().as_bytes();
        let mut escaped = false;
        let mut depth = 0u32;
        for (index, &byte) in bytes.iter().enumerate() {
            match byte {
                b'\\' => {
                    escaped = !escaped;
                    continue;
                }
                b'{' if !escaped => depth += 1,
                b'}' if !escaped => {
                    if depth == 0 {
                        let content = &self.rest()[..index];
                        self.index += index + 1;
                        return Ok(content);
                    }
                    depth -= 1;
                }
                _ => {}
            }
            escaped = false;
        }
        Err(ErrorKind::UnbalancedGroup(GroupType::Brace))
    }

    /// `\\` inside an environment, with its optional `[dimension]` argument.
    fn row_break(&mut self, output: &mut String) -> InnerResult<()> {
        let start = self.index;
        self.index += 2;
        if self.peek() == Some('[') {
            let close = self
                .rest()
                .find(']')
                .ok_or(ErrorKind::UnbalancedGroup(GroupType::Bracket))?;
            self.index += close + 1;
        }
        output.push_str(&self.input[start..self.index]);
        Ok(())
    }

    /// Pass a `%` comment through. The line break is kept (or added at the end of the input) so
    /// that the comment cannot swallow the markers closing after it.
    fn comment(&mut self, output: &mut String) {
        let rest = self.rest();
        let len = rest.find('\n').map_or(rest.len(), |i| i + 1);
        output.push_str(&rest[..len]);
        if !rest[..len].ends_with('\n') {
            output.push('\n');
        }
        self.index += len;
    }

    fn symbol(&mut self, c: char) -> Piece {
        let start = self.index;
        self.index += c.len_utf8();
        let kind = if tables::is_operator_char(c) {
            AtomKind::Operator
        } else {
            AtomKind::Symbol
        };
        let id = self.atoms.register(self.input, start, self.index, kind);
        Piece::Atom {
            id,
            content: self.input[start..self.index].to_owned(),
            primary: kind == AtomKind::Symbol,
        }
    }
}

/// Write `content` wrapped in the marker of atom `id`.
fn wrap(output: &mut String, id: AtomId, content: &str) {
    use std::fmt::Write;
    // Writing to a `String` cannot fail.
    let _ = write!(
        output,
        "\\{MARKER_COMMAND}{{{MARKER_KEY}={id}}}{{{content}}}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Instrumented {
        Parser::new(input).parse().unwrap()
    }

    fn snippets(input: &str) -> Vec<(String, AtomKind)> {
        parse(input)
            .atoms
            .iter()
            .map(|atom| (atom.snippet.clone(), atom.kind))
            .collect()
    }

    #[test]
    fn plain_symbols() {
        let result = parse("a+b");
        assert_eq!(
            result.markup,
            r"\htmlData{ltx-id=ltx-0}{a}\htmlData{ltx-id=ltx-1}{+}\htmlData{ltx-id=ltx-2}{b}"
        );
        assert_eq!(
            snippets("a+b"),
            vec![
                ("a".to_owned(), AtomKind::Symbol),
                ("+".to_owned(), AtomKind::Operator),
                ("b".to_owned(), AtomKind::Symbol),
            ]
        );
    }

    #[test]
    fn whitespace_is_kept_outside_markers() {
        let result = parse("a + b");
        assert_eq!(
            result.markup,
            r"\htmlData{ltx-id=ltx-0}{a} \htmlData{ltx-id=ltx-1}{+} \htmlData{ltx-id=ltx-2}{b}"
        );
    }

    #[test]
    fn script_cluster() {
        let result = parse("x^{2}");
        assert_eq!(
            result.markup,
            r"\htmlData{ltx-id=ltx-0}{x^{\htmlData{ltx-id=ltx-2}{{\htmlData{ltx-id=ltx-1}{2}}}}}"
        );
        assert_eq!(
            snippets("x^{2}"),
            vec![
                ("x^{2}".to_owned(), AtomKind::Script),
                ("2".to_owned(), AtomKind::Symbol),
                ("{2}".to_owned(), AtomKind::Group),
            ]
        );
    }

    #[test]
    fn script_cluster_with_spacing() {
        let atoms = snippets("x ^ 2 _i + y");
        assert!(atoms.contains(&("x ^ 2 _i".to_owned(), AtomKind::Script)));
        assert!(atoms.contains(&("2".to_owned(), AtomKind::Symbol)));
        assert!(atoms.contains(&("i".to_owned(), AtomKind::Symbol)));
        assert!(atoms.contains(&("y".to_owned(), AtomKind::Symbol)));
        assert!(!atoms.iter().any(|(s, _)| s.starts_with('^') || s.starts_with('_')));
    }

    #[test]
    fn lone_script() {
        let atoms = snippets("+^2");
        assert!(atoms.contains(&("^2".to_owned(), AtomKind::Script)));
    }

    #[test]
    fn command_arguments() {
        let atoms = snippets(r"\frac{a+b}{c}");
        assert!(atoms.contains(&(r"\frac{a+b}{c}".to_owned(), AtomKind::Command)));
        assert!(atoms.contains(&("{a+b}".to_owned(), AtomKind::Group)));
        assert!(atoms.contains(&("{c}".to_owned(), AtomKind::Group)));

        let atoms = snippets(r"\frac12");
        assert!(atoms.contains(&(r"\frac12".to_owned(), AtomKind::Command)));
        assert_eq!(
            parse(r"\frac12").markup,
            r"\htmlData{ltx-id=ltx-2}{\frac{\htmlData{ltx-id=ltx-0}{1}}{\htmlData{ltx-id=ltx-1}{2}}}"
        );
    }

    #[test]
    fn optional_argument() {
        let result = parse(r"\sqrt[3]{x}");
        assert!(result
            .markup
            .starts_with(r"\htmlData{ltx-id=ltx-4}{\sqrt[\htmlData{ltx-id=ltx-1}{"));
        let atoms = snippets(r"\sqrt[3]{x}");
        assert!(atoms.contains(&("[3]".to_owned(), AtomKind::Group)));
        assert!(atoms.contains(&(r"\sqrt[3]{x}".to_owned(), AtomKind::Command)));

        let atoms = snippets(r"\sqrt {x}");
        assert!(atoms.contains(&(r"\sqrt {x}".to_owned(), AtomKind::Command)));
    }

    #[test]
    fn paired_delimiters_stay_unmarked() {
        let result = parse(r"\left( x \right)^2");
        assert!(result.markup.starts_with(r"\left("));
        assert!(result.markup.contains(r"\right)^{\htmlData"));
        let atoms = snippets(r"\left( x \right)^2");
        assert_eq!(
            atoms,
            vec![
                ("x".to_owned(), AtomKind::Symbol),
                ("2".to_owned(), AtomKind::Symbol),
            ]
        );
    }

    #[test]
    fn sized_delimiters_are_atoms() {
        let atoms = snippets(r"\big\langle x \Bigr)");
        assert!(atoms.contains(&(r"\big\langle".to_owned(), AtomKind::Command)));
        assert!(atoms.contains(&(r"\Bigr)".to_owned(), AtomKind::Command)));
    }

    #[test]
    fn large_operators() {
        let atoms = snippets(r"\sum\limits_{i=1}^{n} i");
        assert!(atoms.contains(&(r"\sum\limits_{i=1}^{n}".to_owned(), AtomKind::Script)));

        let atoms = snippets(r"\int f");
        assert!(atoms.contains(&(r"\int".to_owned(), AtomKind::Command)));
    }

    #[test]
    fn environments() {
        let input = r"\begin{pmatrix} a & b \\ c & d \end{pmatrix}";
        let result = parse(input);
        assert!(result.markup.contains(" & "));
        assert!(result.markup.contains(r"\\"));
        let atoms = snippets(input);
        assert!(atoms.contains(&(input.to_owned(), AtomKind::Command)));
        assert_eq!(atoms.len(), 5);

        let input = r"\begin{array}{cc} 1 & 2 \\[2pt] \hline 3 & 4 \end{array}";
        let result = parse(input);
        assert!(result.markup.starts_with(r"\htmlData{ltx-id=ltx-4}{\begin{array}{cc}"));
        assert!(result.markup.contains(r"\\[2pt] \hline "));
    }

    #[test]
    fn control_symbols() {
        let atoms = snippets(r"50\%");
        assert_eq!(atoms.len(), 3);
        assert!(atoms.contains(&(r"\%".to_owned(), AtomKind::Command)));

        let atoms = snippets(r"\|v\|^2");
        assert!(atoms.contains(&(r"\|^2".to_owned(), AtomKind::Script)));
    }

    #[test]
    fn comments() {
        let result = parse("a % note\n+ b");
        assert!(result.markup.contains("% note\n"));
        assert_eq!(result.atoms.len(), 3);

        let result = parse("a % note");
        assert!(result.markup.ends_with("% note\n"));
    }

    #[test]
    fn comments_before_arguments() {
        let result = parse("x^% note\n2");
        assert_eq!(
            result.markup,
            "\\htmlData{ltx-id=ltx-0}{x^% note\n{\\htmlData{ltx-id=ltx-1}{2}}}"
        );
        assert!(snippets("x^% note\n2").contains(&("x^% note\n2".to_owned(), AtomKind::Script)));

        let input = "\\frac% note\n{a}%\n{b}";
        let result = parse(input);
        assert!(result.markup.starts_with("\\htmlData{ltx-id=ltx-4}{\\frac% note\n{"));
        let atoms = snippets(input);
        assert!(atoms.contains(&(input.to_owned(), AtomKind::Command)));
        assert!(atoms.contains(&("{b}".to_owned(), AtomKind::Group)));

        let atoms = snippets("\\sqrt % note\n[3]{x}");
        assert!(atoms.contains(&("[3]".to_owned(), AtomKind::Group)));
    }

    #[test]
    fn alignment_rules_outside_environments() {
        assert_eq!(
            snippets(r"\hline x"),
            vec![
                (r"\hline".to_owned(), AtomKind::Command),
                ("x".to_owned(), AtomKind::Symbol),
            ]
        );
    }

    #[test]
    fn atoms_nest() {
        for input in [
            r"\sum_{i=1}^{n} a_i \left(\sqrt[3]{x}\right)^2",
            r"{a}^2_3 + \big( x \big)^2 + \|v\|^2",
            r"\begin{pmatrix} a_1 & b^2 \\ c & d \end{pmatrix}^T",
            r"\int\limits_0^1 x^{y^{z}} dx",
            r"\sqrt[n]{x}^2",
        ] {
            let atoms = parse(input).atoms;
            for a in &atoms {
                for b in &atoms {
                    assert!(
                        a.is_disjoint(b) || a.contains(b) || b.contains(a),
                        "{input}: {:?} overlaps {:?}",
                        a.snippet,
                        b.snippet
                    );
                }
            }
        }
    }

    #[test]
    fn errors() {
        let fails = [
            (r"\frac{a}{", ErrorKind::UnbalancedGroup(GroupType::Brace)),
            (r"\sqrt[3{x}", ErrorKind::UnbalancedGroup(GroupType::Bracket)),
            (r"a}", ErrorKind::StrayClosingBrace),
            (r"\frac{a}", ErrorKind::MissingArgument("frac".to_owned())),
            (r"x^", ErrorKind::EmptySuperscript),
            (r"x_{a}_", ErrorKind::EmptySubscript),
            (r"x^^2", ErrorKind::ScriptAsArgument),
            (r"\left", ErrorKind::MissingDelimiter("left".to_owned())),
            (r"\begin{tabular}a\end{tabular}", ErrorKind::UnsupportedEnvironment("tabular".to_owned())),
            (
                r"\begin{matrix}a\end{pmatrix}",
                ErrorKind::MismatchedEnvironment {
                    expected: "matrix".to_owned(),
                    found: "pmatrix".to_owned(),
                },
            ),
            (r"\begin{matrix}a", ErrorKind::UnclosedEnvironment("matrix".to_owned())),
            (r"a\end{matrix}", ErrorKind::UnexpectedEnd),
            (r"x\", ErrorKind::EmptyControlSequence),
        ];
        for (input, kind) in fails {
            let err = Parser::new(input).parse().unwrap_err();
            assert_eq!(err.kind(), &kind, "input: {input}");
        }
    }
}
