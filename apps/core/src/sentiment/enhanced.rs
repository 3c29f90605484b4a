//! Shape of the richer prediction produced by a complex-case analyzer.
//!
//! The analyzer itself lives behind [`crate::actors::traits::ComplexCaseAnalyzer`];
//! this module only defines its output and the fallback built from a plain
//! Naive Bayes prediction.

use serde::{Deserialize, Serialize};

use super::label::{Label, SentimentPrediction};

/// Signals reported by the analyzer. `Default` is the all-zero bag used on fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplexityFeatures {
    pub sarcasm_score: f64,
    pub has_quoted_positives: bool,
    pub has_contradictions: bool,
    pub has_slang: bool,
    pub has_typos: bool,
    pub normalized_confidence: f64,
    pub temporal_context: Option<String>,
    pub double_negation: bool,
    pub cultural_context: Option<String>,
    pub emotional_intensity: f64,
    pub contradictory_signals: u32,
    pub detected_language: Option<String>,
    pub is_mixed_language: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedPrediction {
    pub label: Label,
    pub confidence: f64,
    pub score: f64,
    pub complexity_score: f64,
    pub features: ComplexityFeatures,
    pub reasoning: Vec<String>,
    pub fallback_used: bool,
}

impl EnhancedPrediction {
    /// Wrap a base prediction after the analyzer could not answer.
    pub fn fallback(prediction: SentimentPrediction, reason: &str) -> Self {
        Self {
            label: prediction.label,
            confidence: prediction.confidence,
            score: prediction.score,
            complexity_score: 0.0,
            features: ComplexityFeatures::default(),
            reasoning: vec![format!(
                "Complex-case analysis unavailable ({}), used Naive Bayes prediction",
                reason
            )],
            fallback_used: true,
        }
    }

    pub fn base_prediction(&self) -> SentimentPrediction {
        SentimentPrediction {
            label: self.label,
            confidence: self.confidence,
            score: self.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_zeroes_features() {
        let base = SentimentPrediction {
            label: Label::Negative,
            confidence: 0.8,
            score: -0.6,
        };
        let enhanced = EnhancedPrediction::fallback(base.clone(), "timeout");

        assert!(enhanced.fallback_used);
        assert_eq!(enhanced.features, ComplexityFeatures::default());
        assert_eq!(enhanced.complexity_score, 0.0);
        assert_eq!(enhanced.base_prediction(), base);
        assert!(enhanced.reasoning[0].contains("timeout"));
    }

    #[test]
    fn test_features_accept_partial_json() {
        let features: ComplexityFeatures =
            serde_json::from_str(r#"{"sarcasmScore": 0.9, "hasSlang": true}"#).unwrap();
        assert_eq!(features.sarcasm_score, 0.9);
        assert!(features.has_slang);
        assert!(!features.has_typos);
    }
}
