use std::panic::{AssertUnwindSafe, catch_unwind};

use log::{debug, info, warn};

use super::types::{
    FallbackPosition, LocalizationResult, Localizer, LocalizerError, LocalizerMatch,
};

/// Priority-ordered set of localizers.
///
/// Localizers are tried in registration order; the first match wins. A
/// failing or panicking localizer is logged and skipped, never aborting the
/// dispatch.
pub struct LocalizerRegistry {
    localizers: Vec<Box<dyn Localizer>>,
    fallback: FallbackPosition,
}

impl Default for LocalizerRegistry {
    fn default() -> Self {
        Self::new(FallbackPosition::default())
    }
}

impl std::fmt::Debug for LocalizerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizerRegistry")
            .field("localizers", &self.names())
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl LocalizerRegistry {
    pub fn new(fallback: FallbackPosition) -> Self {
        Self {
            localizers: Vec::new(),
            fallback,
        }
    }

    /// Appends a localizer at the lowest priority
    pub fn register(&mut self, localizer: Box<dyn Localizer>) {
        info!("Registered localizer: {}", localizer.name());
        self.localizers.push(localizer);
    }

    pub fn with_localizer(mut self, localizer: Box<dyn Localizer>) -> Self {
        self.register(localizer);
        self
    }

    pub fn len(&self) -> usize {
        self.localizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.localizers.is_empty()
    }

    /// Names of all registered localizers in priority order
    pub fn names(&self) -> Vec<&str> {
        self.localizers.iter().map(|l| l.name()).collect()
    }

    /// Names of the localizers that currently report themselves available
    pub fn available(&self) -> Vec<&str> {
        self.localizers
            .iter()
            .filter(|l| l.is_available())
            .map(|l| l.name())
            .collect()
    }

    pub fn fallback(&self) -> &FallbackPosition {
        &self.fallback
    }

    /// Localizes an image with the first localizer that recognizes it,
    /// or returns the fallback position with `success = false`.
    pub fn detect_and_localize(&self, image: &[u8]) -> LocalizationResult {
        for localizer in &self.localizers {
            let name = localizer.name();
            if !localizer.is_available() {
                debug!("Localizer {name} not available");
                continue;
            }

            match Self::invoke(localizer.as_ref(), image) {
                Ok(Some(found)) => {
                    let result = LocalizationResult::from_match(name, found);
                    info!(
                        "Localized by {name}: ({:.1}, {:.1}) confidence {:.2}",
                        result.x, result.y, result.confidence
                    );
                    return result;
                }
                Ok(None) => debug!("Localizer {name} found no match"),
                Err(e) => warn!("Localizer {name} failed: {e}"),
            }
        }

        debug!("No localizer matched, using fallback position");
        self.fallback.to_result()
    }

    /// Runs one localizer, turning a panic into an ordinary failure
    fn invoke(
        localizer: &dyn Localizer,
        image: &[u8],
    ) -> Result<Option<LocalizerMatch>, LocalizerError> {
        catch_unwind(AssertUnwindSafe(|| localizer.localize(image))).unwrap_or_else(|payload| {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic".to_string());
            Err(LocalizerError::Failed(reason))
        })
    }
}
