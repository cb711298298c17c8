use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::visibility::SatelliteList;
use crate::predict::{PassReport, VisibilityWindow};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::visibility::usage,
        super::api::visibility::brighest,
        super::api::visibility::next_visible,
        super::api::visibility::satellite_passes,
        super::api::visibility::list_satellites,
    ),
    components(schemas(ErrorResponse, PassReport, VisibilityWindow, SatelliteList)),
    info(
        title = "Overhead Visibility API",
        description = "Which satellites are overhead, when they come into range, and how often",
        version = "0.1.0"
    ),
    tags(
        (name = "visibility", description = "Satellite visibility queries")
    )
)]
pub struct ApiDoc;
