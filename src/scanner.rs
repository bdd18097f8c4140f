//! The lowest level cursor over raw markup.
//!
//! The scanner knows nothing about argument arity or groups; it only splits the input into
//! whitespace runs, command words (`\alpha`, `\operatorname*`), control symbols (`\%`, `\,`) and
//! single characters. It never fails: a trailing `\` at the end of the input is reported as an
//! empty control symbol ending at the end of the string.
use std::borrow::Cow;

/// A command read from the input, either a command word or a control symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandToken<'a> {
    /// The name of the command, without the leading `\`.
    ///
    /// For command words this includes a trailing `*` if present. For a dangling backslash at
    /// the end of the input, this is empty.
    pub name: &'a str,
    /// Whether the command is a control symbol (`\` followed by exactly one non-letter).
    pub is_control_symbol: bool,
    /// Byte offset of the `\`.
    pub start: usize,
    /// Byte offset one past the last byte of the token.
    pub end: usize,
}

impl<'a> CommandToken<'a> {
    /// The name with any trailing `*` removed.
    pub fn base_name(&self) -> &'a str {
        self.name.strip_suffix('*').unwrap_or(self.name)
    }
}

/// Read the command token starting at `offset`.
///
/// Returns `None` if the byte at `offset` is not a `\`.
pub fn read_command_token_at(source: &str, offset: usize) -> Option<CommandToken<'_>> {
    let rest = source.get(offset..)?;
    let after_slash = rest.strip_prefix('\\')?;
    let name_start = offset + 1;

    let letters = after_slash
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .count();

    if letters > 0 {
        let mut len = letters;
        if after_slash.as_bytes().get(len) == Some(&b'*') {
            len += 1;
        }
        return Some(CommandToken {
            name: &source[name_start..name_start + len],
            is_control_symbol: false,
            start: offset,
            end: name_start + len,
        });
    }

    let len = after_slash.chars().next().map_or(0, char::len_utf8);
    Some(CommandToken {
        name: &source[name_start..name_start + len],
        is_control_symbol: true,
        start: offset,
        end: name_start + len,
    })
}

/// Return the (possibly empty) run of whitespace starting at `offset`.
pub fn read_whitespace_run(source: &str, offset: usize) -> &str {
    let Some(rest) = source.get(offset..) else {
        return "";
    };
    let len = rest
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(rest.len(), |(index, _)| index);
    &rest[..len]
}

/// List every command word and control symbol of the input, in order.
///
/// Dangling backslashes are not reported.
pub fn command_tokens(source: &str) -> Vec<CommandToken<'_>> {
    let mut tokens = Vec::new();
    let mut index = 0;
    while let Some(offset) = source[index..].find('\\').map(|i| i + index) {
        // `find` guarantees a backslash at `offset`.
        let Some(token) = read_command_token_at(source, offset) else {
            break;
        };
        if !token.name.is_empty() {
            tokens.push(token);
        }
        index = token.end;
    }
    tokens
}

/// The kind of a token produced by [`tokenize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Whitespace,
    CommandWord,
    CommandSymbol,
    Char,
    /// A token that was discarded by a rewriting pass and must not be reassembled.
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// The text of the token, including the leading `\` for commands.
    pub value: Cow<'a, str>,
}

impl Token<'_> {
    /// Whether the token is significant for reassembly.
    pub fn is_meaningful(&self) -> bool {
        !matches!(self.kind, TokenKind::Whitespace | TokenKind::Removed)
    }
}

/// Split the whole input into tokens.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Tokens::new(source).collect()
}

/// Iterator over the tokens of a string.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    source: &'a str,
    index: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, index: 0 }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.source.get(self.index..)?;
        let c = rest.chars().next()?;

        let (kind, len) = if c.is_whitespace() {
            (
                TokenKind::Whitespace,
                read_whitespace_run(self.source, self.index).len(),
            )
        } else if c == '\\' {
            let token = read_command_token_at(self.source, self.index)?;
            let kind = if token.is_control_symbol {
                TokenKind::CommandSymbol
            } else {
                TokenKind::CommandWord
            };
            (kind, token.end - token.start)
        } else {
            (TokenKind::Char, c.len_utf8())
        };

        let value = &rest[..len];
        self.index += len;
        Some(Token {
            kind,
            value: Cow::Borrowed(value),
        })
    }
}
