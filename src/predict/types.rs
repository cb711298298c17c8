use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

/// Look angles from an observer to a satellite at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAngles {
    pub elevation_rad: f64,
    pub azimuth_rad: f64,
    pub range_km: f64,
}

impl LookAngles {
    pub fn elevation_deg(&self) -> f64 {
        self.elevation_rad.to_degrees()
    }

    /// Absolute deviation from the zenith, in degrees.
    pub fn zenith_offset_deg(&self) -> f64 {
        (90.0 - self.elevation_deg()).abs()
    }
}

/// A contiguous interval during which a satellite stayed within range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct VisibilityWindow {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PassReport {
    pub total_passes: usize,
    pub visible_windows: Vec<VisibilityWindow>,
}

impl From<Vec<VisibilityWindow>> for PassReport {
    fn from(windows: Vec<VisibilityWindow>) -> Self {
        PassReport {
            total_passes: windows.len(),
            visible_windows: windows,
        }
    }
}

/// Pass reports for a set of satellites, kept in catalog order.
///
/// Serializes as a JSON object keyed by satellite name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassSummary {
    reports: Vec<(String, PassReport)>,
}

impl PassSummary {
    pub fn push(&mut self, name: &str, report: PassReport) {
        self.reports.push((name.to_string(), report));
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&PassReport> {
        self.reports
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, report)| report)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PassReport)> {
        self.reports.iter().map(|(n, r)| (n.as_str(), r))
    }
}

impl Serialize for PassSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.reports.len()))?;
        for (name, report) in &self.reports {
            map.serialize_entry(name, report)?;
        }
        map.end()
    }
}

/// Outcome of a next-visible search.
#[derive(Debug, Clone, PartialEq)]
pub enum NextVisible {
    InRange {
        satellite: String,
        at: DateTime<Utc>,
    },
    NotInRange {
        satellite: String,
        horizon_hours: u32,
        until: DateTime<Utc>,
    },
}

impl NextVisible {
    pub fn summary(&self) -> String {
        match self {
            NextVisible::InRange { satellite, at } => format!(
                "satellite: {} will be in visible range at {}",
                satellite,
                at.to_rfc3339()
            ),
            NextVisible::NotInRange {
                satellite,
                horizon_hours,
                ..
            } => format!(
                "satellite: {} will not be in visible range in next {} hrs",
                satellite, horizon_hours
            ),
        }
    }

    /// `summary` plus the last instant checked when nothing was in range.
    pub fn log_line(&self) -> String {
        match self {
            NextVisible::InRange { .. } => self.summary(),
            NextVisible::NotInRange { until, .. } => {
                format!("{}, checked till {}", self.summary(), until.to_rfc3339())
            }
        }
    }
}
