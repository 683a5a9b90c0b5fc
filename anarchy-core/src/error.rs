use core::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum ForecastError {
    Empty,
    NonFiniteSample { index: usize },
    TimestampWentBackwards { index: usize, previous: f32, current: f32 },
}

impl fmt::Display for ForecastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "forecast has no samples"),
            Self::NonFiniteSample { index } => {
                write!(f, "forecast sample {index} has a non-finite component")
            }
            Self::TimestampWentBackwards {
                index,
                previous,
                current,
            } => write!(
                f,
                "forecast timestamp went backwards at sample {index}: {previous} -> {current}"
            ),
        }
    }
}

impl std::error::Error for ForecastError {}
