use std::ops::ControlFlow;

use crate::config::TrailingWindow;
use crate::predict::catalog::TleRecord;
use crate::predict::error::PredictError;
use crate::predict::observer::ObserverLocation;
use crate::predict::propagation::LookAngleSource;
use crate::predict::sampler::Sampler;
use crate::predict::types::VisibilityWindow;

#[derive(Clone, Copy)]
enum Visibility {
    NotVisible,
    Visible(VisibilityWindow),
}

/// Visibility windows of one satellite over the sampler's ticks.
///
/// A satellite is visible while its range is strictly below `range_km`. A window opens on
/// the first in-range tick, its `stop` follows every in-range tick, and it is emitted on
/// the first tick back out of range. What happens to a window still open after the last
/// tick is decided by `trailing`.
pub fn find_windows(
    oracle: &dyn LookAngleSource,
    record: &TleRecord,
    observer: &ObserverLocation,
    sampler: &Sampler,
    range_km: f64,
    trailing: TrailingWindow,
) -> Result<Vec<VisibilityWindow>, PredictError> {
    let mut windows = Vec::new();
    let mut state = Visibility::NotVisible;

    sampler.run::<(), _>(|_, at| {
        let in_range = oracle.look_angles(record, observer, at)?.range_km < range_km;

        state = match (state, in_range) {
            (Visibility::NotVisible, true) => Visibility::Visible(VisibilityWindow {
                start: at,
                stop: at,
            }),
            (Visibility::Visible(window), true) => Visibility::Visible(VisibilityWindow {
                stop: at,
                ..window
            }),
            (Visibility::Visible(window), false) => {
                windows.push(window);
                Visibility::NotVisible
            }
            (Visibility::NotVisible, false) => Visibility::NotVisible,
        };

        Ok(ControlFlow::Continue(()))
    })?;

    if let Visibility::Visible(window) = state {
        match trailing {
            TrailingWindow::Drop => {
                log::debug!(
                    "{}: dropping window open since {} at end of scan",
                    record.name,
                    window.start
                );
            }
            TrailingWindow::Close => windows.push(window),
        }
    }

    Ok(windows)
}
