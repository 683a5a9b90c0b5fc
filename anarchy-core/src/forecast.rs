use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ForecastError;
use crate::vector::Vec3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub time: f32,
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Ball forecast for one tick: ordered, finite, non-empty. Repeated
/// timestamps are allowed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
}

impl Trajectory {
    pub fn new(samples: Vec<TrajectorySample>) -> Result<Self, ForecastError> {
        if let Err(err) = validate(&samples) {
            warn!(%err, samples = samples.len(), "rejected ball forecast");
            return Err(err);
        }
        Ok(Self { samples })
    }

    #[inline]
    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> &TrajectorySample {
        &self.samples[self.samples.len() - 1]
    }

    pub fn horizon_from(&self, now: f32) -> f32 {
        self.last().time - now
    }
}

fn validate(samples: &[TrajectorySample]) -> Result<(), ForecastError> {
    if samples.is_empty() {
        return Err(ForecastError::Empty);
    }

    for (index, sample) in samples.iter().enumerate() {
        if !sample.time.is_finite() || !sample.position.is_finite() || !sample.velocity.is_finite() {
            return Err(ForecastError::NonFiniteSample { index });
        }
        if index > 0 {
            let previous = samples[index - 1].time;
            if sample.time < previous {
                return Err(ForecastError::TimestampWentBackwards {
                    index,
                    previous,
                    current: sample.time,
                });
            }
        }
    }
    Ok(())
}

impl<'de> Deserialize<'de> for Trajectory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            samples: Vec<TrajectorySample>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Trajectory::new(raw.samples).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: f32) -> TrajectorySample {
        TrajectorySample {
            time,
            position: Vec3::new(0.0, 0.0, 100.0),
            velocity: Vec3::ZERO,
        }
    }

    #[test]
    fn rejects_empty_forecast() {
        assert_eq!(Trajectory::new(Vec::new()), Err(ForecastError::Empty));
    }

    #[test]
    fn rejects_backwards_timestamps() {
        let err = Trajectory::new(vec![sample(1.0), sample(1.1), sample(1.05)]).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::TimestampWentBackwards { index: 2, .. }
        ));
    }

    #[test]
    fn rejects_non_finite_samples() {
        let mut bad = sample(0.5);
        bad.velocity.z = f32::NAN;
        let err = Trajectory::new(vec![sample(0.0), bad]).unwrap_err();
        assert_eq!(err, ForecastError::NonFiniteSample { index: 1 });
    }

    #[test]
    fn accepts_repeated_timestamps() {
        let t = Trajectory::new(vec![sample(0.0), sample(0.0), sample(0.1)]).unwrap();
        assert_eq!(t.len(), 3);
        assert!((t.horizon_from(0.0) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn deserialization_validates() {
        let ok = r#"{"samples":[{"time":0.0,"position":{"x":0.0,"y":0.0,"z":93.0},"velocity":{"x":0.0,"y":0.0,"z":0.0}}]}"#;
        assert!(serde_json::from_str::<Trajectory>(ok).is_ok());
        assert!(serde_json::from_str::<Trajectory>(r#"{"samples":[]}"#).is_err());
    }
}
