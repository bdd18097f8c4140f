//! The renderer boundary.
//!
//! The hover builder does not draw glyphs itself; it hands markup to a [`Renderer`]. Renderers
//! must honour the trust policy passed in [`RenderOptions`]: any command that can inject raw
//! attributes into the output (`\htmlData`, `\href`, ...) is only rendered if the policy
//! accepts it.
//!
//! Two renderers are provided:
//! - [`PreviewRenderer`], a structural renderer with no dependencies, that checks the markup is
//!   well formed and emits HTML with one `span` per marker;
//! - `KatexRenderer` (behind the `katex` cargo feature), which delegates to KaTeX.

use thiserror::Error;

use crate::{config::DisplayMode, scanner::read_command_token_at};

/// Commands that KaTeX only renders when trusted.
const TRUSTED_COMMANDS: &[&str] = &[
    "htmlData",
    "htmlClass",
    "htmlId",
    "htmlStyle",
    "href",
    "url",
    "includegraphics",
];

/// What a trust policy gets to see about a command that needs trust.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustContext<'a> {
    /// The command, including its leading `\`.
    pub command: &'a str,
    /// The attributes the command would write to the output, as `(name, value)` pairs.
    ///
    /// For `\htmlData{key=value}`, the attribute name is `data-key`.
    pub attributes: &'a [(String, String)],
}

/// Decides whether a command that needs trust may be rendered.
pub type TrustPolicy = fn(&TrustContext<'_>) -> bool;

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub display_mode: DisplayMode,
    /// If `None`, no command that needs trust is rendered.
    pub trust: Option<TrustPolicy>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("command `{0}` is not trusted")]
    Untrusted(String),
    #[error("unbalanced group in markup")]
    UnbalancedGroup,
    #[error("unexpected end of input")]
    EndOfInput,
    #[error("malformed environment `{0}`")]
    Environment(String),
    #[error("renderer failure: {0}")]
    Backend(String),
}

/// Turns markup into HTML.
pub trait Renderer {
    fn render(&self, markup: &str, options: &RenderOptions) -> Result<String, RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn render(&self, markup: &str, options: &RenderOptions) -> Result<String, RenderError> {
        (**self).render(markup, options)
    }
}

/// Check every command of `markup` that needs trust against `trust`.
pub fn check_trust(markup: &str, trust: Option<TrustPolicy>) -> Result<(), RenderError> {
    let mut index = 0;
    while let Some(offset) = markup[index..].find('\\').map(|i| i + index) {
        let Some(token) = read_command_token_at(markup, offset) else {
            break;
        };
        index = token.end;
        if token.is_control_symbol || !TRUSTED_COMMANDS.contains(&token.name) {
            continue;
        }
        let mut rest = &markup[token.end..];
        let attributes = if token.name == "htmlData" {
            data_attributes(&mut rest)?
        } else {
            Vec::new()
        };
        authorize(&markup[token.start..token.end], &attributes, trust)?;
    }
    Ok(())
}

fn authorize(
    command: &str,
    attributes: &[(String, String)],
    trust: Option<TrustPolicy>,
) -> Result<(), RenderError> {
    let context = TrustContext {
        command,
        attributes,
    };
    match trust {
        Some(policy) if policy(&context) => Ok(()),
        _ => Err(RenderError::Untrusted(command.to_owned())),
    }
}

/// Parse the `{key=value,...}` argument of `\htmlData` into `data-` attributes.
fn data_attributes(input: &mut &str) -> Result<Vec<(String, String)>, RenderError> {
    let content = group_argument(input)?;
    Ok(content
        .split(',')
        .filter(|pair| !pair.trim().is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (format!("data-{}", key.trim()), value.trim().to_owned())
        })
        .collect())
}

/// Parse a `{...}` argument, possibly preceded by whitespace, and return its content.
fn group_argument<'a>(input: &mut &'a str) -> Result<&'a str, RenderError> {
    *input = input.trim_start();
    let Some(rest) = input.strip_prefix('{') else {
        return Err(if input.is_empty() {
            RenderError::EndOfInput
        } else {
            RenderError::UnbalancedGroup
        });
    };
    *input = rest;
    group_content(input)
}

/// Parses the inside of a group, when the first `{` is already parsed.
///
/// The output is the content within the group without the surrounding `{}`. This content is
/// guaranteed to be balanced.
fn group_content<'a>(input: &mut &'a str) -> Result<&'a str, RenderError> {
    let mut escaped = false;
    let mut depth = 0u32;
    for (index, byte) in input.bytes().enumerate() {
        match byte {
            b'\\' => {
                escaped = !escaped;
                continue;
            }
            b'{' if !escaped => depth += 1,
            b'}' if !escaped => {
                if depth == 0 {
                    let (content, rest) = input.split_at(index);
                    *input = &rest[1..];
                    return Ok(content);
                }
                depth -= 1;
            }
            _ => {}
        }
        escaped = false;
    }
    Err(RenderError::UnbalancedGroup)
}

fn escape_html(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
}

/// A structural renderer.
///
/// It does not lay anything out: it checks that groups and environments are balanced, enforces
/// the trust policy, and writes the markup as escaped text, turning every trusted
/// `\htmlData{...}{...}` into a `span` carrying the corresponding `data-` attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewRenderer;

impl Renderer for PreviewRenderer {
    fn render(&self, markup: &str, options: &RenderOptions) -> Result<String, RenderError> {
        let mut writer = PreviewWriter {
            out: String::with_capacity(markup.len() * 2),
            trust: options.trust,
            environments: Vec::new(),
        };
        let (open, close) = match options.display_mode {
            DisplayMode::Block => (
                r#"<span class="katex-display"><span class="katex">"#,
                "</span></span>",
            ),
            DisplayMode::Inline => (r#"<span class="katex">"#, "</span>"),
        };
        writer.out.push_str(open);
        writer.out.push_str(r#"<span class="katex-html" aria-hidden="true">"#);
        let mut input = markup;
        writer.sequence(&mut input, false)?;
        if let Some(name) = writer.environments.pop() {
            return Err(RenderError::Environment(name.to_owned()));
        }
        writer.out.push_str("</span>");
        writer.out.push_str(close);
        Ok(writer.out)
    }
}

struct PreviewWriter<'a> {
    out: String,
    trust: Option<TrustPolicy>,
    environments: Vec<&'a str>,
}

impl<'a> PreviewWriter<'a> {
    fn sequence(&mut self, input: &mut &'a str, in_group: bool) -> Result<(), RenderError> {
        loop {
            *input = input.trim_start();
            let Some(c) = input.chars().next() else {
                return if in_group {
                    Err(RenderError::UnbalancedGroup)
                } else {
                    Ok(())
                };
            };
            match c {
                '{' => {
                    *input = &input[1..];
                    self.out.push_str(r#"<span class="mord">"#);
                    self.sequence(input, true)?;
                    self.out.push_str("</span>");
                }
                '}' => {
                    *input = &input[1..];
                    return if in_group {
                        Ok(())
                    } else {
                        Err(RenderError::UnbalancedGroup)
                    };
                }
                '%' => {
                    let len = input.find('\n').map_or(input.len(), |i| i + 1);
                    *input = &input[len..];
                }
                '\\' => self.command(input)?,
                c => {
                    escape_html(&mut self.out, &input[..c.len_utf8()]);
                    *input = &input[c.len_utf8()..];
                }
            }
        }
    }

    fn command(&mut self, input: &mut &'a str) -> Result<(), RenderError> {
        let token = read_command_token_at(input, 0).ok_or(RenderError::EndOfInput)?;
        if token.name.is_empty() {
            return Err(RenderError::EndOfInput);
        }
        let raw = &input[..token.end];
        *input = &input[token.end..];

        if !token.is_control_symbol && TRUSTED_COMMANDS.contains(&token.name) {
            let attributes = if token.name == "htmlData" {
                data_attributes(input)?
            } else {
                Vec::new()
            };
            authorize(raw, &attributes, self.trust)?;
            if token.name != "htmlData" {
                return Err(RenderError::Backend(format!(
                    "`{raw}` is not supported by the preview renderer"
                )));
            }

            *input = input.trim_start();
            *input = input.strip_prefix('{').ok_or(RenderError::EndOfInput)?;
            self.out.push_str("<span");
            for (name, value) in &attributes {
                self.out.push(' ');
                escape_html(&mut self.out, name);
                self.out.push_str("=\"");
                escape_html(&mut self.out, value);
                self.out.push('"');
            }
            self.out.push('>');
            self.sequence(input, true)?;
            self.out.push_str("</span>");
            return Ok(());
        }

        match token.name {
            "begin" => {
                let name = group_argument(input)?;
                self.environments.push(name);
                self.out.push_str(r#"<span class="mtable" data-environment=""#);
                escape_html(&mut self.out, name);
                self.out.push_str(r#"">"#);
            }
            "end" => {
                let name = group_argument(input)?;
                match self.environments.pop() {
                    Some(open) if open == name => self.out.push_str("</span>"),
                    _ => return Err(RenderError::Environment(name.to_owned())),
                }
            }
            _ => {
                self.out.push_str(r#"<span class="mord">"#);
                escape_html(&mut self.out, raw);
                self.out.push_str("</span>");
            }
        }
        Ok(())
    }
}

/// Renders through KaTeX, after enforcing the trust policy on the markup.
#[cfg(feature = "katex")]
#[derive(Debug, Clone, Copy, Default)]
pub struct KatexRenderer;

#[cfg(feature = "katex")]
impl Renderer for KatexRenderer {
    fn render(&self, markup: &str, options: &RenderOptions) -> Result<String, RenderError> {
        // KaTeX only knows a global trust switch, so the policy is applied here first.
        check_trust(markup, options.trust)?;
        let opts = katex::Opts::builder()
            .display_mode(options.display_mode == DisplayMode::Block)
            .throw_on_error(true)
            .trust(options.trust.is_some())
            .build()
            .map_err(|err| RenderError::Backend(err.to_string()))?;
        katex::render_with_opts(markup, &opts).map_err(|err| RenderError::Backend(err.to_string()))
    }
}
