pub mod features;
pub mod remote;
pub mod rules;

use crate::models::{Landmark, LandmarkSet, SignLabel};
use features::FeatureVector;
use rules::Rule;

/// Frame-local, threshold-driven sign classifier.
///
/// Stateless: there is no hysteresis between frames, so a held pose near a
/// threshold can flicker between labels.
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    rules: Vec<Rule>,
}

impl RuleClassifier {
    pub fn new() -> Self {
        Self {
            rules: rules::RULES.to_vec(),
        }
    }

    /// Use a custom ordered rule table instead of the built-in one.
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn classify_features(&self, features: &FeatureVector) -> SignLabel {
        rules::first_match(&self.rules, features)
    }

    pub fn classify_set(&self, set: &LandmarkSet) -> SignLabel {
        self.classify_features(&FeatureVector::extract(set))
    }

    /// Classify raw detector output. Anything other than 21 points is Unknown.
    pub fn classify(&self, points: &[Landmark]) -> SignLabel {
        match features::extract_features(points) {
            Some(features) => self.classify_features(&features),
            None => {
                tracing::debug!("Skipping malformed hand with {} landmarks", points.len());
                SignLabel::Unknown
            }
        }
    }
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify raw landmarks with the built-in rule table.
pub fn classify_landmarks(points: &[Landmark]) -> SignLabel {
    match features::extract_features(points) {
        Some(features) => rules::classify(&features),
        None => SignLabel::Unknown,
    }
}
