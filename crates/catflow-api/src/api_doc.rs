//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::services::health::StatusReport;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catflow Ingest API",
        version = "0.1.0",
        description = "Stores uploaded files in object storage and announces each stored key to downstream consumers over RabbitMQ."
    ),
    paths(
        handlers::ingest::ingest_file,
        handlers::status::status,
        handlers::status::liveness,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::ingest::IngestResponse,
        StatusReport,
    )),
    tags(
        (name = "ingest", description = "File ingestion"),
        (name = "health", description = "Health probes"),
    )
)]
pub struct ApiDoc;

/// Returns the OpenAPI spec served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_every_route() {
        let spec = get_openapi_spec();
        for path in ["/ingest", "/status", "/live"] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
