//! Complexity feature extraction, scoring and banding.
//!
//! The extractor never fails: every feature is computed by its own simple scan over the raw
//! markup, so that half-typed or malformed input still gets a score. In particular, group
//! depth is a brace counter that ignores unmatched closing braces, and alignment environments
//! are found by a pattern scan rather than by the [grammar walker](crate::parser).
//!
//! # Examples
//!
//! ```rust
//! use latex_drill::complexity::{analyze_latex_complexity, Difficulty};
//!
//! let report = analyze_latex_complexity(r"x^2 + 1");
//! assert_eq!(report.band, Difficulty::Beginner);
//!
//! let report = analyze_latex_complexity(
//!     r"\oint_{\partial\Sigma} \vec{E} \cdot d\vec{\ell} = -\frac{d}{dt} \iint_{\Sigma} \vec{B} \cdot d\vec{S}",
//! );
//! assert!(report.score > 49);
//! ```
pub mod catalog;

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub use self::catalog::{command_tier, command_tier_weight, is_known_command, CommandTier};
use crate::scanner::{command_tokens, read_command_token_at, CommandToken};

/// Highest score that is still [`Difficulty::Beginner`].
pub const BEGINNER_MAX_SCORE: u32 = 32;
/// Highest score that is still [`Difficulty::Intermediate`].
pub const INTERMEDIATE_MAX_SCORE: u32 = 49;

/// `(cap, weight)` of every scored feature, in the order of [`ComplexityFeatures::scored`].
///
/// A feature contributes `weight * min(value / cap, 1)` to the score.
const FEATURE_SCALES: [(f64, f64); 16] = [
    (90.0, 18.0), // non-whitespace characters
    (14.0, 8.0),  // commands
    (55.0, 7.0),  // command name characters
    (4.0, 2.0),   // control symbols
    (16.0, 3.0),  // delimiter and group tokens
    (4.0, 7.0),   // group depth
    (10.0, 6.0),  // script operators
    (3.0, 5.0),   // script depth
    (5.0, 6.0),   // fractions, roots and binomials
    (3.0, 5.0),   // fraction depth
    (4.0, 4.0),   // large operators
    (6.0, 2.0),   // relations
    (3.0, 2.0),   // delimiter sizing
    (5.0, 5.0),   // alignment environments
    (4.0, 3.0),   // accents
    (8.0, 17.0),  // rarity load
];

/// The difficulty band of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|band| band.as_str() == name)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural measurements of a piece of markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityFeatures {
    pub non_whitespace_chars: usize,
    /// Command words and control symbols.
    pub command_count: usize,
    /// Letters in the names of all commands.
    pub command_name_chars: usize,
    pub control_symbol_escapes: usize,
    /// `{}[]()` characters, plus `\left` and `\right`.
    pub delimiter_group_tokens: usize,
    pub max_group_depth: usize,
    pub script_operator_count: usize,
    /// Deepest nesting of scripts within scripts.
    pub max_script_depth: usize,
    pub frac_root_binom_count: usize,
    pub frac_root_binom_depth: usize,
    pub large_operator_count: usize,
    /// Relation commands plus `=`, `<` and `>` characters.
    pub relation_operator_count: usize,
    pub delimiter_sizing_count: usize,
    /// Sum over alignment environments of `1 + (rows - 1) + (columns - 1)`.
    pub matrix_alignment_complexity: usize,
    pub accent_decorator_count: usize,
    /// Sum of the [tier weights](catalog::command_tier_weight) of all commands.
    pub command_rarity_load: f64,
    pub unknown_command_count: usize,
    pub known_command_count: usize,
}

impl ComplexityFeatures {
    /// The values of the features that count towards the score.
    ///
    /// Known and unknown command counts are informational only.
    pub fn scored(&self) -> [f64; 16] {
        [
            self.non_whitespace_chars as f64,
            self.command_count as f64,
            self.command_name_chars as f64,
            self.control_symbol_escapes as f64,
            self.delimiter_group_tokens as f64,
            self.max_group_depth as f64,
            self.script_operator_count as f64,
            self.max_script_depth as f64,
            self.frac_root_binom_count as f64,
            self.frac_root_binom_depth as f64,
            self.large_operator_count as f64,
            self.relation_operator_count as f64,
            self.delimiter_sizing_count as f64,
            self.matrix_alignment_complexity as f64,
            self.accent_decorator_count as f64,
            self.command_rarity_load,
        ]
    }
}

/// The score, band and features of a piece of markup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexityReport {
    pub score: u32,
    pub band: Difficulty,
    pub features: ComplexityFeatures,
}

/// Extract, score and classify `markup` in one go.
pub fn analyze_latex_complexity(markup: &str) -> ComplexityReport {
    let features = extract_complexity_features(markup);
    let score = compute_complexity_score(&features);
    ComplexityReport {
        score,
        band: classify_complexity(score),
        features,
    }
}

/// Combine the features into a score in `[0, 100]`.
pub fn compute_complexity_score(features: &ComplexityFeatures) -> u32 {
    let total: f64 = features
        .scored()
        .iter()
        .zip(FEATURE_SCALES)
        .map(|(&value, (cap, weight))| weight * (value / cap).min(1.))
        .sum();
    total.round().clamp(0., 100.) as u32
}

pub fn classify_complexity(score: u32) -> Difficulty {
    if score <= BEGINNER_MAX_SCORE {
        Difficulty::Beginner
    } else if score <= INTERMEDIATE_MAX_SCORE {
        Difficulty::Intermediate
    } else {
        Difficulty::Advanced
    }
}

pub fn extract_complexity_features(markup: &str) -> ComplexityFeatures {
    let commands = command_tokens(markup);
    let words = || commands.iter().filter(|token| !token.is_control_symbol);
    let count_words = |predicate: fn(&str) -> bool| words().filter(|t| predicate(t.name)).count();

    let (max_group_depth, command_depths) = group_depths(markup);
    let (script_operator_count, max_script_depth) = script_metrics(markup);

    let mut command_rarity_load = 0.;
    let mut known_command_count = 0;
    let mut unknown_command_count = 0;
    for token in &commands {
        command_rarity_load += command_tier_weight(token.name, token.is_control_symbol);
        if token.is_control_symbol {
            continue;
        }
        if is_known_command(token.name) {
            known_command_count += 1;
        } else {
            unknown_command_count += 1;
        }
    }

    ComplexityFeatures {
        non_whitespace_chars: markup.chars().filter(|c| !c.is_whitespace()).count(),
        command_count: commands.len(),
        command_name_chars: commands
            .iter()
            .map(|token| token.name.bytes().filter(u8::is_ascii_alphabetic).count())
            .sum(),
        control_symbol_escapes: commands.iter().filter(|t| t.is_control_symbol).count(),
        delimiter_group_tokens: markup
            .bytes()
            .filter(|b| matches!(b, b'{' | b'}' | b'[' | b']' | b'(' | b')'))
            .count()
            + count_words(|name| matches!(name, "left" | "right")),
        max_group_depth,
        script_operator_count,
        max_script_depth,
        frac_root_binom_count: count_words(is_frac_root_binom),
        frac_root_binom_depth: fraction_depth(&commands, &command_depths),
        large_operator_count: count_words(is_large_operator),
        relation_operator_count: count_words(is_relation)
            + markup
                .bytes()
                .filter(|b| matches!(b, b'=' | b'<' | b'>'))
                .count(),
        delimiter_sizing_count: count_words(crate::parser::tables::is_delimiter_sizing),
        matrix_alignment_complexity: alignment_complexity(markup),
        accent_decorator_count: count_words(is_accent),
        command_rarity_load,
        unknown_command_count,
        known_command_count,
    }
}

fn is_frac_root_binom(name: &str) -> bool {
    matches!(
        name,
        "frac" | "dfrac" | "tfrac" | "binom" | "sqrt" | "genfrac"
    )
}

fn is_large_operator(name: &str) -> bool {
    matches!(
        name,
        "sum" | "prod" | "int" | "oint" | "iint" | "iiint" | "iiiint" | "idotsint"
            | "bigcup" | "bigcap" | "bigsqcup" | "bigvee" | "bigwedge"
            | "bigodot" | "bigotimes" | "bigoplus" | "biguplus"
    )
}

fn is_relation(name: &str) -> bool {
    matches!(
        name,
        "approx" | "cong" | "equiv" | "geq" | "geqslant" | "gtr" | "iff" | "implies" | "in"
            | "leq" | "leqslant" | "lessgtr" | "lt" | "neq" | "notin" | "sim" | "subset"
            | "subseteq" | "supset" | "supseteq" | "to"
    )
}

fn is_accent(name: &str) -> bool {
    matches!(
        name,
        "bar" | "dot" | "ddot" | "hat" | "overline" | "overbrace" | "overrightarrow"
            | "underline" | "underbrace" | "underleftarrow" | "underrightarrow" | "vec"
            | "widehat" | "widetilde"
    )
}

fn is_alignment_environment(name: &str) -> bool {
    matches!(
        name,
        "aligned" | "alignedat" | "array" | "Bmatrix" | "bmatrix" | "cases" | "matrix"
            | "pmatrix" | "smallmatrix" | "split" | "vmatrix" | "Vmatrix"
    )
}

/// Byte offset one past the command starting at `index`, which must hold a `\`.
fn skip_command(source: &str, index: usize) -> usize {
    read_command_token_at(source, index).map_or(index + 1, |token| token.end)
}

/// Returns the maximum brace depth of the markup, and the brace depth at the start of every
/// command, in order.
///
/// Braces that are part of a control symbol (`\{`) do not count, and unmatched closing braces
/// are ignored.
fn group_depths(source: &str) -> (usize, Vec<usize>) {
    let bytes = source.as_bytes();
    let mut depth = 0usize;
    let mut max_depth = 0;
    let mut command_depths = Vec::new();
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'\\' => {
                if index + 1 < bytes.len() {
                    command_depths.push(depth);
                }
                index = skip_command(source, index);
                continue;
            }
            b'{' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        index += 1;
    }
    (max_depth, command_depths)
}

/// Returns the number of script operators and the deepest nesting of scripts.
fn script_metrics(source: &str) -> (usize, usize) {
    let bytes = source.as_bytes();
    let mut count = 0;
    let mut max_depth = 0;
    let mut depth = 0usize;
    // Group depth at which each open braced script closes.
    let mut open_scripts: Vec<usize> = Vec::new();

    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'\\' => {
                index = skip_command(source, index);
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                while open_scripts.last().is_some_and(|&end| end > depth) {
                    open_scripts.pop();
                }
            }
            b'^' | b'_' => {
                count += 1;
                if source[index + 1..].trim_start().starts_with('{') {
                    open_scripts.push(depth + 1);
                    max_depth = max_depth.max(open_scripts.len());
                } else {
                    max_depth = max_depth.max(open_scripts.len() + 1);
                }
            }
            _ => {}
        }
        index += 1;
    }
    (count, max_depth)
}

/// Nesting depth of fractions, roots and binomials.
///
/// The deepest fraction seen so far at each brace level, or at any enclosing level, is the
/// parent of the next one.
fn fraction_depth(commands: &[CommandToken<'_>], command_depths: &[usize]) -> usize {
    let mut by_level: Vec<usize> = Vec::new();
    let mut max_depth = 0;
    for (token, &level) in commands.iter().zip(command_depths) {
        if token.is_control_symbol || !is_frac_root_binom(token.name) {
            continue;
        }
        if by_level.len() <= level {
            by_level.resize(level + 1, 0);
        }
        let parent = by_level[..=level].iter().copied().max().unwrap_or(0);
        let current = parent + 1;
        by_level[level] = by_level[level].max(current);
        max_depth = max_depth.max(current);
    }
    max_depth
}

static BEGIN_ENVIRONMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\begin\{([A-Za-z*]+)\}").expect("valid environment pattern"));

fn alignment_complexity(source: &str) -> usize {
    let mut complexity = 0;
    let mut position = 0;
    while let Some(captures) = BEGIN_ENVIRONMENT.captures_at(source, position) {
        let (Some(begin), Some(name)) = (captures.get(0), captures.get(1)) else {
            break;
        };
        let name = name.as_str();
        let end_tag = format!(r"\end{{{name}}}");
        let Some(body_len) = source[begin.end()..].find(&end_tag) else {
            position = begin.end();
            continue;
        };
        let body = &source[begin.end()..begin.end() + body_len];
        position = begin.end() + body_len + end_tag.len();

        if is_alignment_environment(name) {
            let rows = body.split(r"\\");
            let (row_count, max_columns) = rows.fold((0, 1), |(rows, columns), row| {
                (rows + 1, columns.max(row.split('&').count()))
            });
            complexity += 1 + (row_count - 1) + (max_columns - 1);
        }
    }
    complexity
}
