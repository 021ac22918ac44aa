//! Image-based localization dispatch
//!
//! Concrete localizers (feature matchers, classifiers, ...) live outside of
//! this crate and plug in through the [`Localizer`] trait. The
//! [`LocalizerRegistry`] tries them in priority order and always produces a
//! well-formed [`LocalizationResult`].

mod registry;
mod types;

pub use registry::LocalizerRegistry;
pub use types::{
    FallbackPosition, LocalizationResult, Localizer, LocalizerError, LocalizerMatch,
    DEFAULT_MATCH_CONFIDENCE, FALLBACK_METHOD,
};
