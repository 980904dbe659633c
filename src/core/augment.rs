use rand::Rng;
use rand::seq::IndexedRandom;

use crate::core::dataset::Dataset;
use crate::models::{LandmarkSet, SignLabel};

/// Parameters for class balancing by jittered duplication.
#[derive(Debug, Clone)]
pub struct AugmentOptions {
    pub labels: Vec<SignLabel>,
    pub target_count: usize,
    /// Maximum absolute offset added to each coordinate.
    pub noise: f64,
}

impl Default for AugmentOptions {
    fn default() -> Self {
        Self {
            labels: vec![
                SignLabel::Fist,
                SignLabel::Cshape,
                SignLabel::Peace,
                SignLabel::Lshape,
            ],
            target_count: 135,
            noise: 0.01,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AugmentReport {
    pub dataset: Dataset,
    /// Samples added per requested label (zero when already at target).
    pub added: Vec<(SignLabel, usize)>,
}

/// Top up under-represented labels with noisy copies of their own samples.
///
/// The input dataset is left untouched; new samples are appended after the
/// originals. Labels with no samples at all cannot be augmented. Fails when
/// `noise` is not a finite number.
pub fn augment<R: Rng + ?Sized>(
    dataset: &Dataset,
    options: &AugmentOptions,
    rng: &mut R,
) -> anyhow::Result<AugmentReport> {
    anyhow::ensure!(
        options.noise.is_finite(),
        "Augmentation noise must be finite, got {}",
        options.noise
    );
    let noise = options.noise.abs();
    let mut augmented = dataset.clone();
    let mut added = Vec::with_capacity(options.labels.len());

    for &label in &options.labels {
        let pool: Vec<_> = dataset.iter().filter(|s| s.label == label).collect();
        let missing = options.target_count.saturating_sub(pool.len());
        if missing == 0 || pool.is_empty() {
            tracing::info!("No augmentation needed for {}", label);
            added.push((label, 0));
            continue;
        }

        for _ in 0..missing {
            let Some(base) = pool.choose(rng) else { break };
            let mut sample = (*base).clone();
            let mut points = *sample.landmarks.points();
            for p in points.iter_mut() {
                p.x += rng.random_range(-noise..=noise);
                p.y += rng.random_range(-noise..=noise);
                p.z += rng.random_range(-noise..=noise);
            }
            sample.landmarks = LandmarkSet::new(points);
            augmented.push(sample);
        }
        tracing::info!("Augmented {}: added {} samples", label, missing);
        added.push((label, missing));
    }

    Ok(AugmentReport {
        dataset: augmented,
        added,
    })
}
