use std::ops::ControlFlow;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};

use crate::config::VisibilityConfig;
use crate::predict::catalog::TleRecord;
use crate::predict::error::PredictError;
use crate::predict::observer::ObserverLocation;
use crate::predict::propagation::LookAngleSource;
use crate::predict::sampler::Sampler;
use crate::predict::types::NextVisible;

/// First sampled instant, starting at `now`, at which the satellite is within
/// `visual_range_km`.
///
/// Samples every `next_visible_check_interval_min` minutes up to and including
/// `now + next_visible_window_hrs`.
pub fn next_visible(
    oracle: &dyn LookAngleSource,
    record: &TleRecord,
    observer: &ObserverLocation,
    now: DateTime<Utc>,
    config: &VisibilityConfig,
    deadline: Option<Instant>,
) -> Result<NextVisible, PredictError> {
    let sampler = Sampler::inclusive(
        now,
        Duration::minutes(i64::from(config.next_visible_check_interval_min)),
        Duration::minutes(config.horizon_minutes()),
    )
    .deadline(deadline);

    let hit = sampler.run(|_, at| {
        let angles = oracle.look_angles(record, observer, at)?;
        Ok(if angles.range_km <= config.visual_range_km {
            ControlFlow::Break(at)
        } else {
            ControlFlow::Continue(())
        })
    })?;

    Ok(match hit {
        Some(at) => NextVisible::InRange {
            satellite: record.name.clone(),
            at,
        },
        None => NextVisible::NotInRange {
            satellite: record.name.clone(),
            horizon_hours: config.next_visible_window_hrs,
            until: sampler.last(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::test_support::{angles, iss, iss_epoch, observer, ScriptedOracle};

    fn config() -> VisibilityConfig {
        VisibilityConfig::default()
    }

    #[test]
    fn in_range_now_reports_now() {
        let oracle = ScriptedOracle::constant(30.0, 1200.0);
        let now = iss_epoch();
        let result = next_visible(&oracle, &iss("ISS"), &observer(), now, &config(), None).unwrap();
        assert_eq!(
            result,
            NextVisible::InRange {
                satellite: "ISS".into(),
                at: now,
            }
        );
        assert_eq!(oracle.calls(), 1);
    }

    #[test]
    fn threshold_is_inclusive() {
        let oracle = ScriptedOracle::constant(30.0, 2000.0);
        let result =
            next_visible(&oracle, &iss("ISS"), &observer(), iss_epoch(), &config(), None).unwrap();
        assert!(matches!(result, NextVisible::InRange { .. }));
    }

    #[test]
    fn reports_the_first_qualifying_sample() {
        let now = iss_epoch();
        let arrival = now + Duration::minutes(42);
        let oracle = ScriptedOracle::new(move |_, at| {
            if at >= arrival {
                angles(20.0, 1800.0)
            } else {
                angles(-20.0, 6000.0)
            }
        });
        let result = next_visible(&oracle, &iss("ISS"), &observer(), now, &config(), None).unwrap();
        // 5-minute steps: 0, 5, …, 40, 45.
        assert_eq!(
            result,
            NextVisible::InRange {
                satellite: "ISS".into(),
                at: now + Duration::minutes(45),
            }
        );
        assert_eq!(oracle.calls(), 10);
    }

    #[test]
    fn exhausts_after_horizon_over_interval_plus_one_samples() {
        let oracle = ScriptedOracle::constant(-40.0, 9000.0);
        let now = iss_epoch();
        let result = next_visible(&oracle, &iss("ISS"), &observer(), now, &config(), None).unwrap();
        assert_eq!(
            result,
            NextVisible::NotInRange {
                satellite: "ISS".into(),
                horizon_hours: 24,
                until: now + Duration::hours(24),
            }
        );
        assert_eq!(oracle.calls(), 24 * 60 / 5 + 1);
    }

    #[test]
    fn visible_exactly_at_the_horizon_boundary() {
        let now = iss_epoch();
        let boundary = now + Duration::hours(1);
        let oracle = ScriptedOracle::new(move |_, at| {
            if at == boundary {
                angles(10.0, 1999.0)
            } else {
                angles(-10.0, 4000.0)
            }
        });
        let config = VisibilityConfig {
            next_visible_window_hrs: 1,
            next_visible_check_interval_min: 7,
            ..VisibilityConfig::default()
        };
        // 60 is not a multiple of 7, so the last sample lands at 56 minutes.
        let result = next_visible(&oracle, &iss("ISS"), &observer(), now, &config, None).unwrap();
        assert!(matches!(result, NextVisible::NotInRange { .. }));
        assert_eq!(oracle.calls(), 60 / 7 + 1);

        let config = VisibilityConfig {
            next_visible_check_interval_min: 6,
            ..config
        };
        let result = next_visible(&oracle, &iss("ISS"), &observer(), now, &config, None).unwrap();
        assert_eq!(
            result,
            NextVisible::InRange {
                satellite: "ISS".into(),
                at: boundary,
            }
        );
    }

    #[test]
    fn repeated_calls_with_frozen_clock_agree() {
        let now = iss_epoch();
        let oracle = ScriptedOracle::new(move |_, at| {
            let minutes = (at - now).num_minutes();
            angles(0.0, 5000.0 - minutes as f64 * 10.0)
        });
        let first = next_visible(&oracle, &iss("ISS"), &observer(), now, &config(), None).unwrap();
        let second = next_visible(&oracle, &iss("ISS"), &observer(), now, &config(), None).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.summary(), second.summary());
    }
}
