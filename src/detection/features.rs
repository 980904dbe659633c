use crate::models::{
    INDEX_TIP, Landmark, LandmarkSet, MIDDLE_TIP, PINKY_TIP, RING_TIP, THUMB_TIP,
};

/// Planar distances the rule classifier works from.
///
/// `d4`..`d20` are fingertip-to-wrist distances named after the fingertip
/// index; `d_ti` is the thumb tip to index tip distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub d4: f64,
    pub d8: f64,
    pub d12: f64,
    pub d16: f64,
    pub d20: f64,
    pub d_ti: f64,
}

impl FeatureVector {
    /// Compute the feature vector from x,y only.
    pub fn extract(set: &LandmarkSet) -> Self {
        let points = set.points();
        let wrist = set.wrist();
        let from_wrist = |index: usize| points[index].distance_2d(wrist);

        Self {
            d4: from_wrist(THUMB_TIP),
            d8: from_wrist(INDEX_TIP),
            d12: from_wrist(MIDDLE_TIP),
            d16: from_wrist(RING_TIP),
            d20: from_wrist(PINKY_TIP),
            d_ti: points[THUMB_TIP].distance_2d(&points[INDEX_TIP]),
        }
    }

    /// Fingertip distances in thumb, index, middle, ring, pinky order.
    pub fn tip_distances(&self) -> [f64; 5] {
        [self.d4, self.d8, self.d12, self.d16, self.d20]
    }

    pub fn all_tips_below(&self, threshold: f64) -> bool {
        self.tip_distances().iter().all(|d| *d < threshold)
    }

    pub fn all_tips_above(&self, threshold: f64) -> bool {
        self.tip_distances().iter().all(|d| *d > threshold)
    }
}

/// Extract features from raw detector output.
///
/// Returns `None` when the hand does not have exactly 21 points.
pub fn extract_features(points: &[Landmark]) -> Option<FeatureVector> {
    LandmarkSet::from_slice(points)
        .ok()
        .map(|set| FeatureVector::extract(&set))
}
