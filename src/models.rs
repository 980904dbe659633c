use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of keypoints in one hand skeleton.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

/// Fingertip indices in thumb, index, middle, ring, pinky order.
pub const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// One detected keypoint, normalized to the image (z is relative depth).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Planar distance; depth is ignored.
    pub fn distance_2d(&self, other: &Landmark) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LandmarkError {
    #[error("expected 21 landmarks, got {0}")]
    Malformed(usize),
}

/// The complete 21-point skeleton of one hand in one frame.
///
/// Construction validates the point count, so every `LandmarkSet` in the
/// program is known to be well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkSet {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    pub fn from_slice(points: &[Landmark]) -> Result<Self, LandmarkError> {
        let points: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkError::Malformed(points.len()))?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    pub fn wrist(&self) -> &Landmark {
        &self.points[WRIST]
    }

    pub fn point(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    /// Flatten to the 63-value model input: x, y, z per landmark in index order.
    pub fn flatten(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkSet {
    type Error = LandmarkError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        Self::from_slice(&points)
    }
}

impl Serialize for LandmarkSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.points.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LandmarkSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let points = Vec::<Landmark>::deserialize(deserializer)?;
        LandmarkSet::try_from(points).map_err(serde::de::Error::custom)
    }
}

/// A named hand pose the system can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignLabel {
    Fist,
    OpenPalm,
    Cshape,
    Peace,
    Lshape,
    Unknown,
}

impl SignLabel {
    /// Labels a user may attach to a captured sample, in selection order.
    pub const CAPTURABLE: [SignLabel; 5] = [
        SignLabel::Fist,
        SignLabel::OpenPalm,
        SignLabel::Cshape,
        SignLabel::Peace,
        SignLabel::Lshape,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignLabel::Fist => "A (Fist)",
            SignLabel::OpenPalm => "B (Open Palm)",
            SignLabel::Cshape => "C (C-shape)",
            SignLabel::Peace => "V (Peace)",
            SignLabel::Lshape => "L (L-shape)",
            SignLabel::Unknown => "Unknown",
        }
    }

    fn variant_name(&self) -> &'static str {
        match self {
            SignLabel::Fist => "Fist",
            SignLabel::OpenPalm => "OpenPalm",
            SignLabel::Cshape => "Cshape",
            SignLabel::Peace => "Peace",
            SignLabel::Lshape => "Lshape",
            SignLabel::Unknown => "Unknown",
        }
    }

    pub fn is_capturable(&self) -> bool {
        !matches!(self, SignLabel::Unknown)
    }
}

impl fmt::Display for SignLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unrecognized sign label: {0:?}")]
pub struct ParseSignLabelError(pub String);

impl FromStr for SignLabel {
    type Err = ParseSignLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        SignLabel::CAPTURABLE
            .iter()
            .chain(std::iter::once(&SignLabel::Unknown))
            .find(|label| {
                needle.eq_ignore_ascii_case(label.as_str())
                    || needle.eq_ignore_ascii_case(label.variant_name())
            })
            .copied()
            .ok_or_else(|| ParseSignLabelError(s.to_string()))
    }
}

impl Serialize for SignLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SignLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Where the currently displayed label came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationSource {
    RuleEngine,
    RemoteModel,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationResult {
    pub label: SignLabel,
    pub source: ClassificationSource,
}

impl ClassificationResult {
    /// The neutral "no sign detected" state.
    pub fn cleared() -> Self {
        Self {
            label: SignLabel::Unknown,
            source: ClassificationSource::None,
        }
    }

    pub fn from_rules(label: SignLabel) -> Self {
        Self {
            label,
            source: ClassificationSource::RuleEngine,
        }
    }

    pub fn from_remote(label: SignLabel) -> Self {
        Self {
            label,
            source: ClassificationSource::RemoteModel,
        }
    }

    /// True when a concrete sign should be shown to the user.
    pub fn is_detected(&self) -> bool {
        self.label != SignLabel::Unknown
    }
}

impl Default for ClassificationResult {
    fn default() -> Self {
        Self::cleared()
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_detected() {
            write!(f, "Detected Sign: {}", self.label)
        } else {
            f.write_str("no sign detected")
        }
    }
}

/// A user-labeled copy of one hand pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedSample {
    pub label: SignLabel,
    pub landmarks: LandmarkSet,
}

/// Everything the landmark detector reported for one frame.
///
/// Hands are kept raw so that malformed detections reach the classifier,
/// which treats them as Unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frame {
    pub hands: Vec<Vec<Landmark>>,
}

impl Frame {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(hand: Vec<Landmark>) -> Self {
        Self { hands: vec![hand] }
    }
}
