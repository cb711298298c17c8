use chrono::{DateTime, Utc};

use crate::predict::catalog::TleRecord;
use crate::predict::error::PredictError;
use crate::predict::observer::ObserverLocation;
use crate::predict::types::LookAngles;

/// Anything that can answer "where is this satellite as seen from here, right now".
///
/// Implementations must be pure: the same inputs give the same answer, and nothing is
/// cached between calls.
pub trait LookAngleSource: Send + Sync {
    fn look_angles(
        &self,
        record: &TleRecord,
        observer: &ObserverLocation,
        at: DateTime<Utc>,
    ) -> Result<LookAngles, PredictError>;
}

/// SGP4 propagation through the `sgp4` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sgp4Oracle;

impl LookAngleSource for Sgp4Oracle {
    fn look_angles(
        &self,
        record: &TleRecord,
        observer: &ObserverLocation,
        at: DateTime<Utc>,
    ) -> Result<LookAngles, PredictError> {
        let minutes = record
            .elements
            .datetime_to_minutes_since_epoch(&at.naive_utc())
            .map_err(|e| PredictError::propagation(&record.name, e))?;

        let prediction = record
            .constants
            .propagate(minutes)
            .map_err(|e| PredictError::propagation(&record.name, e))?;

        let sidereal =
            sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&at.naive_utc()));

        let sat_ecef = teme_to_ecef_position(prediction.position, sidereal);
        let obs_ecef = observer.position_ecef_km();
        let dr = [
            sat_ecef[0] - obs_ecef[0],
            sat_ecef[1] - obs_ecef[1],
            sat_ecef[2] - obs_ecef[2],
        ];
        let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

        let (east, north, up) = ecef_to_enu(dr, observer.lat_rad(), observer.lon_rad());
        let azimuth_rad = east.atan2(north).rem_euclid(std::f64::consts::TAU);
        let elevation_rad = if range_km > 0.0 {
            (up / range_km).clamp(-1.0, 1.0).asin()
        } else {
            0.0
        };

        Ok(LookAngles {
            elevation_rad,
            azimuth_rad,
            range_km,
        })
    }
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::test_support::{iss, iss_epoch};
    use chrono::Duration;

    #[test]
    fn enu_of_local_vertical_is_up() {
        let lat = 40.0f64.to_radians();
        let lon = -3.0f64.to_radians();
        let dr = [
            lat.cos() * lon.cos(),
            lat.cos() * lon.sin(),
            lat.sin(),
        ];
        let (e, n, u) = ecef_to_enu(dr, lat, lon);
        assert!(e.abs() < 1e-12);
        assert!(n.abs() < 1e-12);
        assert!((u - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_sidereal_angle_is_identity() {
        assert_eq!(teme_to_ecef_position([1.0, 2.0, 3.0], 0.0), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn iss_look_angles_are_physical() {
        let record = iss("ISS");
        let observer = ObserverLocation {
            longitude_deg: 2.3522,
            latitude_deg: 48.8566,
            height_km: 0.035,
        };

        for hours in 0..12 {
            let at = iss_epoch() + Duration::minutes(hours * 37);
            let angles = Sgp4Oracle.look_angles(&record, &observer, at).unwrap();
            // Low Earth orbit: never closer than its altitude, never beyond the far side.
            assert!(angles.range_km > 350.0, "range {}", angles.range_km);
            assert!(angles.range_km < 14_000.0, "range {}", angles.range_km);
            assert!(angles.elevation_deg() >= -90.0 && angles.elevation_deg() <= 90.0);
            assert!(angles.azimuth_rad >= 0.0 && angles.azimuth_rad < std::f64::consts::TAU);
        }
    }

    #[test]
    fn oracle_is_deterministic() {
        let record = iss("ISS");
        let observer = ObserverLocation {
            longitude_deg: 0.0,
            latitude_deg: 0.0,
            height_km: 0.1,
        };
        let a = Sgp4Oracle.look_angles(&record, &observer, iss_epoch()).unwrap();
        let b = Sgp4Oracle.look_angles(&record, &observer, iss_epoch()).unwrap();
        assert_eq!(a, b);
    }
}
