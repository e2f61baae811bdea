use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Simple health service for the HMS API.
///
/// Reports liveness only; it does not check the document store.
#[derive(Clone, Debug, Default)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }

    /// Static check, preferred over building an instance.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "HMS is alive".into(),
        }
    }
}
