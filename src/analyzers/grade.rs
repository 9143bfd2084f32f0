use serde::{Deserialize, Serialize};

/// Five-step classification of a pair's average delay in minutes.
///
/// | Average delay | Bucket      | Color     | Weight |
/// |---------------|-------------|-----------|--------|
/// | <= 0          | on_time     | `#00FF00` | 2      |
/// | <= 2          | slight      | `#FFFF00` | 3      |
/// | <= 5          | moderate    | `#FFA500` | 4      |
/// | <= 10         | significant | `#FF6600` | 5      |
/// | > 10          | major       | `#FF0000` | 6      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayBucket {
    OnTime,
    Slight,
    Moderate,
    Significant,
    Major,
}

impl DelayBucket {
    pub fn from_average(minutes: f64) -> Self {
        match minutes {
            m if m <= 0.0 => Self::OnTime,
            m if m <= 2.0 => Self::Slight,
            m if m <= 5.0 => Self::Moderate,
            m if m <= 10.0 => Self::Significant,
            _ => Self::Major,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::OnTime => "#00FF00",
            Self::Slight => "#FFFF00",
            Self::Moderate => "#FFA500",
            Self::Significant => "#FF6600",
            Self::Major => "#FF0000",
        }
    }

    pub fn weight(self) -> u8 {
        match self {
            Self::OnTime => 2,
            Self::Slight => 3,
            Self::Moderate => 4,
            Self::Significant => 5,
            Self::Major => 6,
        }
    }
}

/// Worst-case classification of a pair's maximum delay in minutes.
///
/// Boundaries are exclusive on the upper side: `< 5` low, `< 15` minor,
/// `< 30` moderate, anything else severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxDelayTier {
    Low,
    Minor,
    Moderate,
    Severe,
}

impl MaxDelayTier {
    pub fn from_max(minutes: i64) -> Self {
        match minutes {
            m if m < 5 => Self::Low,
            m if m < 15 => Self::Minor,
            m if m < 30 => Self::Moderate,
            _ => Self::Severe,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Low => "#00C851",
            Self::Minor => "#FFD700",
            Self::Moderate => "#FF8800",
            Self::Severe => "#AA0000",
        }
    }
}
