mod catalog;
mod engine;
mod error;
mod next_visible;
mod observer;
mod overhead;
mod pass_finder;
mod propagation;
mod sampler;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{load as load_catalog, Catalog};
pub use engine::Engine;
pub use error::PredictError;
pub use observer::ObserverLocation;
pub use propagation::Sgp4Oracle;
pub use types::{PassReport, PassSummary, VisibilityWindow};
