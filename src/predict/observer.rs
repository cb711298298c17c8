/// WGS-84 equatorial radius, km.
const EARTH_RADIUS_KM: f64 = 6378.137;
/// WGS-84 first eccentricity squared.
const EARTH_E2: f64 = 0.006_694_379_990_14;

/// A ground observer. Height is in kilometres above sea level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverLocation {
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub height_km: f64,
}

impl ObserverLocation {
    /// Builds an observer from raw query values.
    ///
    /// Returns `None` unless both values are present, numeric, finite and within
    /// geographic bounds. Surrounding whitespace is ignored.
    pub fn from_query(
        longitude: Option<&str>,
        latitude: Option<&str>,
        height_km: f64,
    ) -> Option<Self> {
        let lon = parse_coordinate(longitude?)?;
        let lat = parse_coordinate(latitude?)?;
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        Some(Self {
            longitude_deg: lon,
            latitude_deg: lat,
            height_km,
        })
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = EARTH_RADIUS_KM / (1.0 - EARTH_E2 * sin_lat * sin_lat).sqrt();
        [
            (n + self.height_km) * cos_lat * lon.cos(),
            (n + self.height_km) * cos_lat * lon.sin(),
            (n * (1.0 - EARTH_E2) + self.height_km) * sin_lat,
        ]
    }
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_strings() {
        let obs = ObserverLocation::from_query(Some(" -0.1276 "), Some("51.5072"), 0.1).unwrap();
        assert_eq!(obs.longitude_deg, -0.1276);
        assert_eq!(obs.latitude_deg, 51.5072);
        assert_eq!(obs.height_km, 0.1);
    }

    #[test]
    fn rejects_missing_or_garbage() {
        assert!(ObserverLocation::from_query(None, Some("10"), 0.1).is_none());
        assert!(ObserverLocation::from_query(Some("10"), None, 0.1).is_none());
        assert!(ObserverLocation::from_query(Some(""), Some("10"), 0.1).is_none());
        assert!(ObserverLocation::from_query(Some("east"), Some("10"), 0.1).is_none());
        assert!(ObserverLocation::from_query(Some("NaN"), Some("10"), 0.1).is_none());
        assert!(ObserverLocation::from_query(Some("inf"), Some("10"), 0.1).is_none());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(ObserverLocation::from_query(Some("181"), Some("0"), 0.1).is_none());
        assert!(ObserverLocation::from_query(Some("0"), Some("-90.5"), 0.1).is_none());
        assert!(ObserverLocation::from_query(Some("-180"), Some("90"), 0.1).is_some());
    }

    #[test]
    fn equator_sits_on_the_semi_major_axis() {
        let obs = ObserverLocation {
            longitude_deg: 0.0,
            latitude_deg: 0.0,
            height_km: 0.0,
        };
        let [x, y, z] = obs.position_ecef_km();
        assert!((x - EARTH_RADIUS_KM).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
        assert!(z.abs() < 1e-9);
    }

    #[test]
    fn pole_is_closer_than_equator() {
        let pole = ObserverLocation {
            longitude_deg: 0.0,
            latitude_deg: 90.0,
            height_km: 0.0,
        };
        let [_, _, z] = pole.position_ecef_km();
        assert!(z > 6356.0 && z < 6357.0);
    }
}
