//! Localizer capability and result types

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::NodeId;

/// Confidence assumed when a localizer reports a match without one
pub const DEFAULT_MATCH_CONFIDENCE: f64 = 0.8;

/// `method` tag of the fallback result
pub const FALLBACK_METHOD: &str = "fallback";

/// Errors a single localizer may report.
///
/// These never leave the registry: any of them simply marks the localizer
/// as unavailable for the current request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocalizerError {
    #[error("Image could not be decoded: {0}")]
    ImageDecode(String),
    #[error("Localizer unavailable")]
    Unavailable,
    #[error("Localization failed: {0}")]
    Failed(String),
}

/// Raw position reported by a localizer before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizerMatch {
    pub node_id: Option<NodeId>,
    /// Planar map coordinates, meters
    pub x: f64,
    pub y: f64,
    pub confidence: Option<f64>,
}

/// Trait for pluggable image localizers.
///
/// Implementors determine the user's planar position from a camera image,
/// typically for a single building.
pub trait Localizer: Send + Sync {
    /// Returns the localizer's name; it doubles as the building label.
    fn name(&self) -> &str;

    /// Whether the localizer can currently serve requests.
    fn is_available(&self) -> bool {
        true
    }

    /// Attempts to localize the raw (already base64-decoded) image bytes.
    ///
    /// # Returns
    ///
    /// `Ok(Some(..))` on a match, `Ok(None)` when the image does not belong
    /// to this localizer.
    fn localize(&self, image: &[u8]) -> Result<Option<LocalizerMatch>, LocalizerError>;
}

/// Normalized outcome of a localization attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizationResult {
    pub success: bool,
    pub building: String,
    pub node_id: Option<NodeId>,
    pub x: f64,
    pub y: f64,
    /// Always within `[0, 1]`
    pub confidence: f64,
    pub method: String,
}

impl LocalizationResult {
    /// Builds a successful result from a localizer match
    pub fn from_match(localizer: &str, found: LocalizerMatch) -> Self {
        let confidence = found
            .confidence
            .filter(|c| c.is_finite())
            .unwrap_or(DEFAULT_MATCH_CONFIDENCE)
            .clamp(0.0, 1.0);

        Self {
            success: true,
            building: localizer.to_string(),
            node_id: found.node_id,
            x: found.x,
            y: found.y,
            confidence,
            method: format!("{localizer}_CV"),
        }
    }
}

/// Position reported when no localizer succeeds; usually a well-known
/// landmark such as the main campus entrance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackPosition {
    pub building: String,
    pub x: f64,
    pub y: f64,
}

impl Default for FallbackPosition {
    fn default() -> Self {
        Self {
            building: "Unknown".to_string(),
            x: 1200.0,
            y: 200.0,
        }
    }
}

impl FallbackPosition {
    pub fn to_result(&self) -> LocalizationResult {
        LocalizationResult {
            success: false,
            building: self.building.clone(),
            node_id: None,
            x: self.x,
            y: self.y,
            confidence: 0.0,
            method: FALLBACK_METHOD.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(confidence: Option<f64>) -> LocalizerMatch {
        LocalizerMatch {
            node_id: Some("N64".to_string()),
            x: 1240.0,
            y: 780.0,
            confidence,
        }
    }

    #[test]
    fn test_match_is_normalized() {
        let result = LocalizationResult::from_match("Library", found(Some(0.93)));
        assert!(result.success);
        assert_eq!(result.building, "Library");
        assert_eq!(result.method, "Library_CV");
        assert_eq!(result.node_id.as_deref(), Some("N64"));
        assert_eq!(result.confidence, 0.93);
    }

    #[test]
    fn test_confidence_defaults_and_clamps() {
        assert_eq!(
            LocalizationResult::from_match("L", found(None)).confidence,
            DEFAULT_MATCH_CONFIDENCE
        );
        assert_eq!(LocalizationResult::from_match("L", found(Some(3.0))).confidence, 1.0);
        assert_eq!(LocalizationResult::from_match("L", found(Some(-1.0))).confidence, 0.0);
        assert_eq!(
            LocalizationResult::from_match("L", found(Some(f64::NAN))).confidence,
            DEFAULT_MATCH_CONFIDENCE
        );
    }

    #[test]
    fn test_default_fallback() {
        let result = FallbackPosition::default().to_result();
        assert!(!result.success);
        assert_eq!(result.building, "Unknown");
        assert_eq!(result.node_id, None);
        assert_eq!((result.x, result.y), (1200.0, 200.0));
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.method, FALLBACK_METHOD);
    }
}
