use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NpmError;
use crate::schema::{Field, Shape, Validated};

/// Download-count window supported by the downloads service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Period {
    LastDay,
    LastWeek,
    #[default]
    LastMonth,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::LastDay, Period::LastWeek, Period::LastMonth];

    pub fn as_str(self) -> &'static str {
        match self {
            Period::LastDay => "last-day",
            Period::LastWeek => "last-week",
            Period::LastMonth => "last-month",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = NpmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                NpmError::invalid_argument(format!(
                    "unknown period `{s}`, expected one of last-day, last-week, last-month"
                ))
            })
    }
}

/// Total downloads over one [`Period`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DownloadPoint {
    pub downloads: u64,
    pub start: String,
    pub end: String,
    pub package: String,
}

impl Validated for DownloadPoint {
    fn shape() -> Shape {
        Shape::object([
            Field::required("downloads", Shape::Count),
            Field::required("start", Shape::String),
            Field::required("end", Shape::String),
            Field::required("package", Shape::String),
        ])
    }
}
