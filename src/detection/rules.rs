use crate::detection::features::FeatureVector;
use crate::models::SignLabel;

pub const CURLED_MAX: f64 = 0.15;
pub const OPEN_MIN: f64 = 0.25;
pub const CURVED_MIN: f64 = 0.18;
pub const PINCH_MAX: f64 = 0.13;
pub const EXTENDED_MIN: f64 = 0.22;
pub const THUMB_TUCKED_MAX: f64 = 0.18;
pub const THUMB_OUT_MIN: f64 = 0.18;

/// A single (predicate, label) entry of the rule table.
#[derive(Clone, Copy)]
pub struct Rule {
    pub label: SignLabel,
    pub matches: fn(&FeatureVector) -> bool,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("label", &self.label).finish()
    }
}

fn is_fist(f: &FeatureVector) -> bool {
    f.all_tips_below(CURLED_MAX)
}

fn is_open_palm(f: &FeatureVector) -> bool {
    f.all_tips_above(OPEN_MIN)
}

fn is_c_shape(f: &FeatureVector) -> bool {
    f.all_tips_above(CURVED_MIN) && f.d_ti < PINCH_MAX
}

fn is_peace(f: &FeatureVector) -> bool {
    f.d8 > EXTENDED_MIN
        && f.d12 > EXTENDED_MIN
        && f.d16 < CURLED_MAX
        && f.d20 < CURLED_MAX
        && f.d4 < THUMB_TUCKED_MAX
}

fn is_l_shape(f: &FeatureVector) -> bool {
    f.d8 > EXTENDED_MIN
        && f.d4 > THUMB_OUT_MIN
        && f.d12 < CURLED_MAX
        && f.d16 < CURLED_MAX
        && f.d20 < CURLED_MAX
}

/// Ordered rule table, evaluated first-match-wins.
///
/// Predicate regions overlap (an open palm with a pinched thumb satisfies
/// both OpenPalm and Cshape), so the order is part of the contract.
pub const RULES: [Rule; 5] = [
    Rule { label: SignLabel::Fist, matches: is_fist },
    Rule { label: SignLabel::OpenPalm, matches: is_open_palm },
    Rule { label: SignLabel::Cshape, matches: is_c_shape },
    Rule { label: SignLabel::Peace, matches: is_peace },
    Rule { label: SignLabel::Lshape, matches: is_l_shape },
];

/// Run `rules` in order and return the first matching label, else Unknown.
pub fn first_match(rules: &[Rule], features: &FeatureVector) -> SignLabel {
    rules
        .iter()
        .find(|rule| (rule.matches)(features))
        .map(|rule| rule.label)
        .unwrap_or(SignLabel::Unknown)
}

/// Classify with the built-in rule table.
pub fn classify(features: &FeatureVector) -> SignLabel {
    first_match(&RULES, features)
}
