use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};

use crate::config::VisibilityConfig;
use crate::predict::catalog::Catalog;
use crate::predict::error::PredictError;
use crate::predict::next_visible::next_visible;
use crate::predict::observer::ObserverLocation;
use crate::predict::overhead::{nearest_overhead, OverheadCandidate};
use crate::predict::pass_finder::find_windows;
use crate::predict::propagation::LookAngleSource;
use crate::predict::sampler::Sampler;
use crate::predict::types::{NextVisible, PassSummary};

/// Pass scans always step one minute at a time.
const PASS_STEP_MINUTES: i64 = 1;

/// Visibility queries over a fixed catalog.
///
/// Cheap to clone; the catalog and oracle are shared.
#[derive(Clone)]
pub struct Engine {
    catalog: Arc<Catalog>,
    oracle: Arc<dyn LookAngleSource>,
    config: VisibilityConfig,
}

impl Engine {
    pub fn new(
        catalog: Arc<Catalog>,
        oracle: Arc<dyn LookAngleSource>,
        config: VisibilityConfig,
    ) -> Self {
        Self {
            catalog,
            oracle,
            config,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &VisibilityConfig {
        &self.config
    }

    // Zero disables the budget, as does one too large to represent as an `Instant`.
    fn deadline(&self) -> Option<Instant> {
        let budget = self.config.scan_timeout;
        if budget.is_zero() {
            return None;
        }
        Instant::now().checked_add(budget)
    }

    pub fn overhead(
        &self,
        observer: &ObserverLocation,
        at: DateTime<Utc>,
    ) -> Result<Option<OverheadCandidate>, PredictError> {
        let best = nearest_overhead(&self.catalog, self.oracle.as_ref(), observer, at)?;
        if let Some(candidate) = &best {
            log::debug!(
                "Nearest overhead at {}: {} (el {:.2} deg, az {:.2} deg)",
                at,
                candidate.name,
                candidate.elevation_deg,
                candidate.azimuth_deg
            );
        }
        Ok(best)
    }

    pub fn next_visible(
        &self,
        observer: &ObserverLocation,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<NextVisible, PredictError> {
        let record = self
            .catalog
            .get(name)
            .ok_or_else(|| PredictError::UnknownSatellite(name.to_string()))?;

        let outcome = next_visible(
            self.oracle.as_ref(),
            record,
            observer,
            now,
            &self.config,
            self.deadline(),
        )?;
        log::info!("{}", outcome.log_line());
        Ok(outcome)
    }

    /// Visibility windows over the horizon for every satellite, or only for `only`.
    pub fn passes(
        &self,
        observer: &ObserverLocation,
        now: DateTime<Utc>,
        only: Option<&str>,
    ) -> Result<PassSummary, PredictError> {
        let records: Vec<_> = match only {
            Some(name) => vec![self
                .catalog
                .get(name)
                .ok_or_else(|| PredictError::UnknownSatellite(name.to_string()))?],
            None => self.catalog.iter().collect(),
        };

        let sampler = Sampler::exclusive(
            now,
            Duration::minutes(PASS_STEP_MINUTES),
            Duration::minutes(self.config.horizon_minutes()),
        )
        .deadline(self.deadline());

        let mut summary = PassSummary::default();
        for record in records {
            let windows = find_windows(
                self.oracle.as_ref(),
                record,
                observer,
                &sampler,
                self.config.visual_range_km,
                self.config.trailing_windows,
            )?;
            summary.push(&record.name, windows.into());
        }

        log::debug!(
            "Computed {} passes for {} satellites over {} samples each",
            summary.iter().map(|(_, r)| r.total_passes).sum::<usize>(),
            summary.len(),
            sampler.samples()
        );
        Ok(summary)
    }
}
