//! The hover instrumentation builder.
//!
//! Given markup typed by a user, the builder produces HTML where every atom of the markup is
//! wrapped in an element carrying a `data-ltx-id` attribute, together with the [`AtomTable`]
//! mapping those ids back to source snippets. A host UI can then show the source snippet of
//! whatever glyph the pointer is over.
//!
//! Building never fails. If the markup cannot be walked, it is rendered without
//! instrumentation and the atom table is empty; if it cannot even be rendered, a fixed
//! placeholder is returned.
//!
//! # Examples
//!
//! ```rust
//! use latex_drill::hover::{build_instrumented_render, extract_hover_snippet};
//!
//! let render = build_instrumented_render("a+b");
//! assert!(render.html.contains("data-ltx-id"));
//! assert_eq!(extract_hover_snippet("ltx-1", &render.atoms), Some("+"));
//! assert_eq!(extract_hover_snippet("ltx-9", &render.atoms), None);
//! ```
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, warn};
use once_cell::sync::Lazy;

use crate::{
    atom::{AtomTable, ID_PREFIX},
    cache::RenderCache,
    config::HoverConfig,
    parser::{Parser, MARKER_COMMAND, MARKER_KEY},
    render::{PreviewRenderer, RenderOptions, Renderer, TrustContext},
};

/// The HTML returned when the markup cannot be rendered at all.
pub const RENDER_ERROR_HTML: &str =
    "<span class='formula-error'>Unable to render formula.</span>";

/// Rendered HTML together with the atoms its markers refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentedRender {
    pub html: String,
    /// Empty when the markup could not be instrumented.
    pub atoms: AtomTable,
}

impl InstrumentedRender {
    pub fn is_instrumented(&self) -> bool {
        !self.atoms.is_empty()
    }
}

/// The trust policy used when rendering instrumented markup.
///
/// Only the id marker itself is accepted: `\htmlData` with a single `data-ltx-id` attribute
/// whose value is `ltx-` followed by lowercase base 36 digits. Any other use of a command that
/// needs trust is rejected, so that the markup of a user cannot inject attributes in the
/// output.
pub fn trust_marker(context: &TrustContext<'_>) -> bool {
    let Some(command) = context.command.strip_prefix('\\') else {
        return false;
    };
    if command != MARKER_COMMAND {
        return false;
    }
    let [(name, value)] = context.attributes else {
        return false;
    };
    name.strip_prefix("data-") == Some(MARKER_KEY)
        && value.strip_prefix(ID_PREFIX).is_some_and(|digits| {
            !digits.is_empty()
                && digits
                    .bytes()
                    .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
        })
}

/// Instrument and render `markup` without caching.
///
/// If the instrumented markup cannot be built or rendered, `markup` itself is rendered with no
/// trust at all.
pub fn instrument<R: Renderer + ?Sized>(
    renderer: &R,
    config: &HoverConfig,
    markup: &str,
) -> InstrumentedRender {
    let options = RenderOptions {
        display_mode: config.display_mode,
        trust: Some(trust_marker),
    };

    match Parser::new(markup).parse() {
        Ok(instrumented) => match renderer.render(&instrumented.markup, &options) {
            Ok(html) => {
                return InstrumentedRender {
                    html,
                    atoms: instrumented.atoms,
                }
            }
            Err(err) => debug!("instrumented markup failed to render, falling back: {err}"),
        },
        Err(err) => debug!("markup could not be instrumented, falling back: {err}"),
    }

    // The original markup carries no markers of ours, so nothing in it is trusted.
    let options = RenderOptions {
        trust: None,
        ..options
    };
    let html = match renderer.render(markup, &options) {
        Ok(html) => html,
        Err(err) => {
            warn!("markup failed to render: {err}");
            RENDER_ERROR_HTML.to_owned()
        }
    };
    InstrumentedRender {
        html,
        atoms: AtomTable::new(),
    }
}

/// Builds instrumented renders with a given renderer, memoizing results by markup.
#[derive(Debug)]
pub struct HoverBuilder<R> {
    renderer: R,
    config: HoverConfig,
    cache: RenderCache<Arc<InstrumentedRender>>,
}

impl<R: Renderer> HoverBuilder<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_config(renderer, HoverConfig::default())
    }

    pub fn with_config(renderer: R, config: HoverConfig) -> Self {
        Self {
            renderer,
            cache: RenderCache::new(config.cache_capacity),
            config,
        }
    }

    pub fn build(&mut self, markup: &str) -> Arc<InstrumentedRender> {
        if let Some(render) = self.cache.get(markup) {
            return Arc::clone(render);
        }
        let render = Arc::new(instrument(&self.renderer, &self.config, markup));
        self.cache.insert(markup.to_owned(), Arc::clone(&render));
        render
    }

    pub fn config(&self) -> &HoverConfig {
        &self.config
    }

    /// The number of renders currently memoized.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

static DEFAULT_BUILDER: Lazy<Mutex<HoverBuilder<PreviewRenderer>>> =
    Lazy::new(|| Mutex::new(HoverBuilder::new(PreviewRenderer)));

/// Build an instrumented render of `markup` with the process-wide builder.
///
/// The process-wide builder uses the [`PreviewRenderer`] and the default [`HoverConfig`].
/// Results are shared between threads.
pub fn build_instrumented_render(markup: &str) -> Arc<InstrumentedRender> {
    DEFAULT_BUILDER
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .build(markup)
}

/// Returns the source snippet of the atom with the given id, if any.
pub fn extract_hover_snippet<'a>(atom_id: &str, atoms: &'a AtomTable) -> Option<&'a str> {
    atoms.get_by_str(atom_id).map(|atom| atom.snippet.as_str())
}
