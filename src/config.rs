//! Configuration for the hover builder and the matcher.

/// How the renderer lays out the formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// The formula is rendered inline with the surrounding text.
    Inline,
    /// The formula is rendered in display style (so `\int` and `\sum` are large, for example),
    /// centered on its own line.
    #[default]
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverConfig {
    /// Display mode handed to the renderer for both the instrumented and the fallback render.
    /// (default: [`DisplayMode::Block`])
    pub display_mode: DisplayMode,
    /// Maximum number of rendered formulas kept by the builder's cache. When the cache is full,
    /// the least recently used entry is evicted. A capacity of `0` disables caching.
    /// (default: 512)
    pub cache_capacity: usize,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::Block,
            cache_capacity: 512,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    /// Largest mismatch ratio, in `[0, 1]`, that the rendered comparison still accepts as a
    /// match. (default: 0.018)
    pub tolerance: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self { tolerance: 0.018 }
    }
}
