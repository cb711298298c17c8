use chrono::{DateTime, Utc};

use crate::predict::catalog::Catalog;
use crate::predict::error::PredictError;
use crate::predict::observer::ObserverLocation;
use crate::predict::propagation::LookAngleSource;

#[derive(Debug, Clone, PartialEq)]
pub struct OverheadCandidate {
    pub name: String,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub zenith_offset_deg: f64,
}

/// Satellite whose elevation at `at` is closest to 90°.
///
/// One oracle call per catalog entry, in catalog order. Ties go to the entry scanned
/// first. `None` only for an empty catalog.
pub fn nearest_overhead(
    catalog: &Catalog,
    oracle: &dyn LookAngleSource,
    observer: &ObserverLocation,
    at: DateTime<Utc>,
) -> Result<Option<OverheadCandidate>, PredictError> {
    let mut best: Option<OverheadCandidate> = None;

    for record in catalog.iter() {
        let angles = oracle.look_angles(record, observer, at)?;
        let offset = angles.zenith_offset_deg();
        if best.as_ref().is_none_or(|b| offset < b.zenith_offset_deg) {
            best = Some(OverheadCandidate {
                name: record.name.clone(),
                elevation_deg: angles.elevation_deg(),
                azimuth_deg: angles.azimuth_rad.to_degrees(),
                zenith_offset_deg: offset,
            });
        }
    }

    Ok(best)
}
