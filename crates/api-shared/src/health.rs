use crate::dto::HealthRes;

/// Health service shared by the REST server and the combined runner.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }

    /// Reports the service as alive. Does not probe the meal API.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Recipebox is alive".into(),
        }
    }
}
