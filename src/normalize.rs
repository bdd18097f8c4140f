//! Canonical normalization of markup, used to compare what a student typed against a target
//! without rendering either.
//!
//! Normalization is textual and total: it never fails and never rejects input. The output is
//! not meant to be rendered, only compared, but it renders like the input whenever the input
//! is well formed.
//!
//! The rewrites are, in order:
//! - comments are dropped;
//! - spacing commands (`\quad`, `\,`, ...) are dropped;
//! - aliases are replaced by their canonical spelling (`\to` becomes `\rightarrow`, `\le`
//!   becomes `\leq`, ...);
//! - whitespace is dropped, except inside text-mode arguments (`\text{...}`) where each run
//!   (dropped commands included) becomes a single space;
//! - a single token script gets explicit braces, so `x^2` and `x^{2}` agree;
//! - a command word directly followed by a letter is separated from it, so dropping whitespace
//!   never fuses `\alpha b` into `\alphab`.
//!
//! # Examples
//!
//! ```rust
//! use latex_drill::normalize::normalize_latex;
//!
//! assert_eq!(normalize_latex("  x +  y \n"), "x+y");
//! assert_eq!(normalize_latex("x^2"), normalize_latex("x^{2}"));
//! assert_eq!(normalize_latex(r"x\to y"), normalize_latex(r"x\rightarrow y"));
//! ```
use std::borrow::Cow;

use crate::{
    parser::tables::signature,
    scanner::{tokenize, Token, TokenKind},
};

/// Normalize `markup` into its canonical form.
pub fn normalize_latex(markup: &str) -> String {
    let mut tokens = tokenize(markup);
    strip_comments(&mut tokens);
    for token in &mut tokens {
        rewrite(token);
    }
    Reassembler::default().run(&tokens)
}

/// Remove `%` comments, up to (but not including) the end of their line.
fn strip_comments(tokens: &mut [Token<'_>]) {
    let mut in_comment = false;
    for token in tokens {
        if in_comment {
            // A newline ends the comment; `\` followed by a newline is still commented out.
            if token.value.contains('\n') {
                in_comment = false;
                if token.kind == TokenKind::Whitespace {
                    continue;
                }
            }
            token.kind = TokenKind::Removed;
        } else if token.kind == TokenKind::Char && token.value == "%" {
            in_comment = true;
            token.kind = TokenKind::Removed;
        }
    }
}

fn rewrite(token: &mut Token<'_>) {
    let name = match token.kind {
        TokenKind::CommandWord | TokenKind::CommandSymbol => &token.value[1..],
        _ => return,
    };
    if is_spacing(name, token.kind) {
        token.kind = TokenKind::Removed;
    } else if let Some((kind, canonical)) = alias(name) {
        token.kind = kind;
        token.value = Cow::Borrowed(canonical);
    }
}

/// Whether the command only inserts horizontal space.
fn is_spacing(name: &str, kind: TokenKind) -> bool {
    match kind {
        // `\ ` and a dangling backslash are both spacing.
        TokenKind::CommandSymbol => {
            name.trim().is_empty() || matches!(name, "," | ";" | ":" | "!" | ">")
        }
        _ => matches!(
            name,
            "quad"
                | "qquad"
                | "enspace"
                | "thinspace"
                | "medspace"
                | "thickspace"
                | "negthinspace"
                | "negmedspace"
                | "negthickspace"
        ),
    }
}

fn alias(name: &str) -> Option<(TokenKind, &'static str)> {
    use TokenKind::{CommandSymbol, CommandWord};

    Some(match name {
        "to" => (CommandWord, r"\rightarrow"),
        "gets" => (CommandWord, r"\leftarrow"),
        "le" => (CommandWord, r"\leq"),
        "ge" => (CommandWord, r"\geq"),
        "ne" => (CommandWord, r"\neq"),
        "land" => (CommandWord, r"\wedge"),
        "lor" => (CommandWord, r"\vee"),
        "lnot" => (CommandWord, r"\neg"),
        "lbrace" => (CommandSymbol, r"\{"),
        "rbrace" => (CommandSymbol, r"\}"),
        "vert" => (TokenKind::Char, "|"),
        "Vert" => (CommandSymbol, r"\|"),
        _ => return None,
    })
}

/// Commands whose argument is typeset in text mode, where whitespace is significant.
fn is_text_command(name: &str) -> bool {
    matches!(name, "text" | "textrm" | "textbf" | "textit" | "mbox")
}

/// What was last written to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Last {
    #[default]
    Other,
    /// A command word ending in a letter, which a following letter would extend.
    Word { takes_arguments: bool },
}

#[derive(Debug, Default)]
struct Reassembler {
    out: String,
    last: Last,
    /// Brace depth within a text-mode argument, if inside one.
    text_depth: Option<usize>,
    /// Whether the last command word was a text command waiting for its argument.
    awaiting_text: bool,
}

impl Reassembler {
    fn run(mut self, tokens: &[Token<'_>]) -> String {
        let mut index = 0;
        while index < tokens.len() {
            index = self.token(tokens, index);
        }
        self.out
    }

    /// Writes the token at `index`, and returns the index of the next token to process.
    fn token(&mut self, tokens: &[Token<'_>], index: usize) -> usize {
        let token = &tokens[index];
        if let Some(depth) = self.text_depth {
            self.text_token(token, depth);
            return index + 1;
        }

        match token.kind {
            TokenKind::Whitespace | TokenKind::Removed => return index + 1,
            TokenKind::Char => {
                let awaiting_text = std::mem::take(&mut self.awaiting_text);
                match &*token.value {
                    "{" if awaiting_text => {
                        self.text_depth = Some(1);
                        self.push("{", Last::Other);
                    }
                    "^" | "_" => {
                        self.push(&token.value, Last::Other);
                        return self.script(tokens, index + 1);
                    }
                    value => self.char(value),
                }
            }
            TokenKind::CommandSymbol => {
                self.awaiting_text = false;
                self.push(&token.value, Last::Other);
            }
            TokenKind::CommandWord => self.word(&token.value),
        }
        index + 1
    }

    fn text_token(&mut self, token: &Token<'_>, depth: usize) {
        match token.kind {
            TokenKind::Whitespace | TokenKind::Removed => {
                if !self.out.ends_with(' ') {
                    self.out.push(' ');
                }
            }
            _ => {
                let depth = match &*token.value {
                    "{" => depth + 1,
                    "}" => depth - 1,
                    _ => depth,
                };
                self.text_depth = (depth > 0).then_some(depth);
                self.out.push_str(&token.value);
            }
        }
        self.last = Last::Other;
    }

    /// Writes the operand of a script operator, bracing it if it is a single token.
    fn script(&mut self, tokens: &[Token<'_>], start: usize) -> usize {
        let Some(index) = (start..tokens.len()).find(|&i| tokens[i].is_meaningful()) else {
            return tokens.len();
        };
        let token = &tokens[index];
        let braced = match token.kind {
            TokenKind::Char => !matches!(&*token.value, "{" | "}" | "^" | "_" | "&"),
            TokenKind::CommandSymbol => true,
            TokenKind::CommandWord => {
                let name = &token.value[1..];
                let signature = signature(name.strip_suffix('*').unwrap_or(name));
                signature.required == 0 && signature.optional == 0 && !is_text_command(name)
            }
            TokenKind::Whitespace | TokenKind::Removed => false,
        };
        if !braced {
            return index;
        }
        self.out.push('{');
        self.out.push_str(&token.value);
        self.push("}", Last::Other);
        index + 1
    }

    fn char(&mut self, value: &str) {
        let letter = value.len() == 1 && value.as_bytes()[0].is_ascii_alphabetic();
        match self.last {
            Last::Word {
                takes_arguments: true,
            } if letter => {
                // The letter is the first argument of the command.
                self.out.push('{');
                self.out.push_str(value);
                self.push("}", Last::Other);
                return;
            }
            Last::Word { .. } if letter || value == "*" => self.out.push_str("{}"),
            _ => {}
        }
        self.push(value, Last::Other);
    }

    fn word(&mut self, value: &str) {
        let name = &value[1..];
        self.awaiting_text = is_text_command(name);
        let last = if value.ends_with(|c: char| c.is_ascii_alphabetic()) {
            Last::Word {
                takes_arguments: signature(name).required > 0,
            }
        } else {
            Last::Other
        };
        self.push(value, last);
    }

    fn push(&mut self, text: &str, last: Last) {
        self.out.push_str(text);
        self.last = last;
    }
}
