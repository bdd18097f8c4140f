//! Decides whether what a student typed matches a target expression.
//!
//! Both markups are first [normalized](crate::normalize); if they agree, the answer is an
//! exact match. Otherwise the decision is delegated to a [`RenderComparator`], which renders
//! both and measures how many pixels differ. Comparing pixels is out of the scope of this
//! crate: the host provides the comparator.
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{config::MatchConfig, normalize::normalize_latex, render::RenderError};

/// How a [`MatchResult`] was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Both markups normalize to the same string.
    Exact,
    /// The comparator measured the difference between both renders.
    Render,
    /// One of the markups is empty, or the comparator failed.
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub is_match: bool,
    /// Fraction of differing pixels, in `[0, 1]`.
    pub mismatch_ratio: f64,
    pub strategy: MatchStrategy,
}

impl MatchResult {
    fn fail() -> Self {
        Self {
            is_match: false,
            mismatch_ratio: 1.,
            strategy: MatchStrategy::Fail,
        }
    }
}

#[derive(Debug, Error)]
pub enum ComparatorError {
    #[error("could not render markup: {0}")]
    Render(#[from] RenderError),
    #[error("could not compare renders: {0}")]
    Measure(String),
}

/// Measures the visual difference between the renders of two markups.
pub trait RenderComparator {
    /// Returns the fraction of pixels that differ between both renders.
    fn mismatch_ratio(&self, input: &str, target: &str) -> Result<f64, ComparatorError>;
}

impl<F> RenderComparator for F
where
    F: Fn(&str, &str) -> Result<f64, ComparatorError>,
{
    fn mismatch_ratio(&self, input: &str, target: &str) -> Result<f64, ComparatorError> {
        self(input, target)
    }
}

/// Compare `input` against `target`.
///
/// The comparator receives the markups as given, not their normalized form. This never fails:
/// a comparator error (or a ratio that is not a number) yields a [`MatchStrategy::Fail`]
/// result.
///
/// # Examples
///
/// ```rust
/// use latex_drill::{config::MatchConfig, matcher::{compare_latex, ComparatorError, MatchStrategy}};
///
/// let comparator = |_: &str, _: &str| -> Result<f64, ComparatorError> { Ok(0.01) };
/// let config = MatchConfig::default();
///
/// let result = compare_latex("x^2", "x^{2}", &config, &comparator);
/// assert_eq!(result.strategy, MatchStrategy::Exact);
///
/// let result = compare_latex(r"\frac12", r"\tfrac12", &config, &comparator);
/// assert_eq!(result.strategy, MatchStrategy::Render);
/// assert!(result.is_match);
/// ```
pub fn compare_latex<C: RenderComparator + ?Sized>(
    input: &str,
    target: &str,
    config: &MatchConfig,
    comparator: &C,
) -> MatchResult {
    let normalized_input = normalize_latex(input);
    let normalized_target = normalize_latex(target);

    if normalized_input.is_empty() || normalized_target.is_empty() {
        return MatchResult::fail();
    }

    if normalized_input == normalized_target {
        debug!("{input:?} matches {target:?} after normalization");
        return MatchResult {
            is_match: true,
            mismatch_ratio: 0.,
            strategy: MatchStrategy::Exact,
        };
    }

    match comparator.mismatch_ratio(input, target) {
        Ok(ratio) if !ratio.is_nan() => MatchResult {
            is_match: ratio <= config.tolerance,
            mismatch_ratio: ratio,
            strategy: MatchStrategy::Render,
        },
        Ok(_) => {
            debug!("comparator returned no ratio for {input:?} against {target:?}");
            MatchResult::fail()
        }
        Err(err) => {
            debug!("comparator failed for {input:?} against {target:?}: {err}");
            MatchResult::fail()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn config() -> MatchConfig {
        MatchConfig::default()
    }

    #[test]
    fn exact_without_comparator_call() {
        let calls = Cell::new(0);
        let comparator = |_: &str, _: &str| -> Result<f64, ComparatorError> {
            calls.set(calls.get() + 1);
            Ok(1.)
        };
        let result = compare_latex(r"x \to y", r"x\rightarrow y", &config(), &comparator);
        assert_eq!(result.strategy, MatchStrategy::Exact);
        assert!(result.is_match);
        assert_eq!(result.mismatch_ratio, 0.);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn empty_sides_fail() {
        let comparator = |_: &str, _: &str| -> Result<f64, ComparatorError> { Ok(0.) };
        for (input, target) in [("", "x"), ("x", "  "), (r"\quad", "x")] {
            let result = compare_latex(input, target, &config(), &comparator);
            assert_eq!(result, MatchResult::fail());
        }
    }

    #[test]
    fn tolerance() {
        let comparator = |_: &str, _: &str| -> Result<f64, ComparatorError> { Ok(0.018) };
        let result = compare_latex("a", "b", &config(), &comparator);
        assert_eq!(result.strategy, MatchStrategy::Render);
        assert!(result.is_match);

        let strict = MatchConfig { tolerance: 0.01 };
        let result = compare_latex("a", "b", &strict, &comparator);
        assert!(!result.is_match);
        assert_eq!(result.mismatch_ratio, 0.018);
    }

    #[test]
    fn comparator_receives_raw_markup() {
        let comparator = |input: &str, target: &str| -> Result<f64, ComparatorError> {
            assert_eq!(input, "a ");
            assert_eq!(target, " b");
            Ok(0.5)
        };
        compare_latex("a ", " b", &config(), &comparator);
    }

    #[test]
    fn comparator_failure() {
        let comparator = |_: &str, _: &str| -> Result<f64, ComparatorError> {
            Err(ComparatorError::Render(RenderError::UnbalancedGroup))
        };
        assert_eq!(
            compare_latex("a", "b", &config(), &comparator),
            MatchResult::fail()
        );

        let comparator = |_: &str, _: &str| -> Result<f64, ComparatorError> { Ok(f64::NAN) };
        assert_eq!(
            compare_latex("a", "b", &config(), &comparator),
            MatchResult::fail()
        );
    }
}
