//! This crate provides the `LaTeX` math plumbing of a formula typing trainer: a grammar walker
//! that instruments markup for hover inspection (available through the [`hover`] module), a
//! complexity scorer for expressions, available through the [`complexity`] module, and a
//! canonical normalizer used to decide whether a typed answer matches its target.
//!
//! ```rust
//! use latex_drill::{build_instrumented_render, normalize_latex, analyze_latex_complexity};
//!
//! let render = build_instrumented_render(r"\alpha + x^{2}");
//! let snippets: Vec<_> = render.atoms.snippets().collect();
//! assert!(snippets.contains(&"x^{2}"));
//!
//! assert_eq!(normalize_latex(r"x \le y"), normalize_latex(r"x\leq y"));
//! assert!(analyze_latex_complexity(r"\frac{1}{2}").score < 33);
//! ```

pub mod atom;
pub mod cache;
pub mod complexity;
pub mod config;
pub mod dataset;
pub mod hover;
pub mod matcher;
pub mod normalize;
pub mod parser;
pub mod render;
pub mod scanner;

#[doc(inline)]
pub use parser::{Parser, ParserError};
#[doc(inline)]
pub use config::{DisplayMode, HoverConfig, MatchConfig};
#[doc(inline)]
pub use hover::{build_instrumented_render, extract_hover_snippet, HoverBuilder};
#[doc(inline)]
pub use complexity::{analyze_latex_complexity, Difficulty};
#[doc(inline)]
pub use normalize::normalize_latex;
#[doc(inline)]
pub use matcher::compare_latex;
#[doc(inline)]
pub use render::{PreviewRenderer, Renderer};
