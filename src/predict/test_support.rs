//! Fixtures shared by the predict tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeZone, Utc};

use crate::predict::catalog::{Catalog, TleRecord};
use crate::predict::error::PredictError;
use crate::predict::observer::ObserverLocation;
use crate::predict::propagation::LookAngleSource;
use crate::predict::types::LookAngles;

pub const ISS_LINE1: &str =
    "1 25544U 98067A   25278.49802050  .00011384  00000+0  20935-3 0  9990";
pub const ISS_LINE2: &str =
    "2 25544  51.6327 120.3420 0000884 206.2421 153.8523 15.49697304532279";
pub const OLD_ISS_LINE1: &str =
    "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
pub const OLD_ISS_LINE2: &str =
    "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

pub fn iss_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 5, 12, 0, 0).unwrap()
}

/// A valid record under an arbitrary name.
pub fn iss(name: &str) -> TleRecord {
    TleRecord::parse(name, ISS_LINE1, ISS_LINE2).unwrap()
}

pub fn catalog_of(names: &[&str]) -> Catalog {
    Catalog::new(names.iter().map(|n| iss(n)))
}

pub fn observer() -> ObserverLocation {
    ObserverLocation {
        longitude_deg: 77.59,
        latitude_deg: 12.97,
        height_km: 0.1,
    }
}

pub fn angles(elevation_deg: f64, range_km: f64) -> LookAngles {
    LookAngles {
        elevation_rad: elevation_deg.to_radians(),
        azimuth_rad: 0.0,
        range_km,
    }
}

type Script = dyn Fn(&str, DateTime<Utc>) -> LookAngles + Send + Sync;

/// Oracle driven by a closure over (satellite name, instant). Counts its calls.
pub struct ScriptedOracle {
    script: Box<Script>,
    calls: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new(script: impl Fn(&str, DateTime<Utc>) -> LookAngles + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every satellite, every instant, the same answer.
    pub fn constant(elevation_deg: f64, range_km: f64) -> Self {
        Self::new(move |_, _| angles(elevation_deg, range_km))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LookAngleSource for ScriptedOracle {
    fn look_angles(
        &self,
        record: &TleRecord,
        _observer: &ObserverLocation,
        at: DateTime<Utc>,
    ) -> Result<LookAngles, PredictError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((self.script)(&record.name, at))
    }
}

/// Oracle that fails for every call.
pub struct FailingOracle;

impl LookAngleSource for FailingOracle {
    fn look_angles(
        &self,
        record: &TleRecord,
        _observer: &ObserverLocation,
        _at: DateTime<Utc>,
    ) -> Result<LookAngles, PredictError> {
        Err(PredictError::propagation(&record.name, "satellite has decayed"))
    }
}
