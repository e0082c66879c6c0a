//! Clients for the 1stPayGateway APIs.

use crate::{apis::auth::Credentials, client::Environment, result::ResultOptions};
use chrono_tz::Tz;
use reqwest_middleware::ClientWithMiddleware;
use std::{
    fmt::{Debug, Formatter},
    sync::Arc,
};

pub mod auth;
pub mod transactions;

pub(crate) struct GatewayClientInner {
    pub(crate) client: ClientWithMiddleware,
    pub(crate) credentials: Credentials,
    pub(crate) environment: Environment,
    pub(crate) result_options: Arc<ResultOptions>,
    /// Zone naive query boundaries are interpreted in. `None` means the system zone.
    pub(crate) local_timezone: Option<Tz>,
}

impl Debug for GatewayClientInner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClientInner")
            .field("processor_id", &self.credentials.processor_id)
            .field("environment", &self.environment)
            .field("result_options", &self.result_options)
            .field("local_timezone", &self.local_timezone)
            .finish_non_exhaustive()
    }
}
