//! Module containing the main 1stPayGateway API client.

use crate::{
    apis::{
        auth::{Credentials, MerchantKey},
        transactions::{Action, TransactionsApi},
        GatewayClientInner,
    },
    common::{PRODUCTION_TRANSACTION_URL, TEST_TRANSACTION_URL, TRANSACTION_PATH},
    middlewares::inject_user_agent::InjectUserAgentMiddleware,
    result::ResultOptions,
    Error,
};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;
use std::sync::Arc;
use urlencoding::encode;

static PRODUCTION_URL: Lazy<Url> =
    Lazy::new(|| Url::parse(PRODUCTION_TRANSACTION_URL).expect("valid production URL"));
static TEST_URL: Lazy<Url> =
    Lazy::new(|| Url::parse(TEST_TRANSACTION_URL).expect("valid test URL"));

/// Client for the 1stPayGateway transaction APIs.
///
/// Cheap to clone: all the clones share the same HTTP connection pool and configuration.
/// Requests are never retried.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    /// Transaction APIs client.
    pub transactions: TransactionsApi,
}

impl GatewayClient {
    /// Builds a new [`GatewayClient`](crate::client::GatewayClient) for the production gateway,
    /// with the default configuration.
    pub fn new(merchant_key: impl Into<MerchantKey>, processor_id: impl Into<String>) -> Self {
        GatewayClientBuilder::new(Credentials::new(merchant_key, processor_id)).build()
    }

    /// Returns a new builder to configure a new [`GatewayClient`](crate::client::GatewayClient).
    pub fn builder(credentials: Credentials) -> GatewayClientBuilder {
        GatewayClientBuilder::new(credentials)
    }

    /// Builds a new [`GatewayClient`](crate::client::GatewayClient) from a configuration
    /// loaded from a file or the environment.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, Error> {
        let mut builder = GatewayClientBuilder::new(Credentials::new(
            config.merchant_key.clone(),
            config.processor_id.clone(),
        ))
        .with_test_mode(config.test_mode);

        if let Some(ref tz) = config.gateway_timezone {
            builder = builder.with_gateway_timezone(parse_timezone(tz)?);
        }

        if let Some(ref tz) = config.local_timezone {
            builder = builder.with_local_timezone(parse_timezone(tz)?);
        }

        if let Some(ref url) = config.base_url {
            let url = Url::parse(url).map_err(|e| {
                Error::InvalidConfiguration(format!("invalid base URL `{}`: {}", url, e))
            })?;
            builder = builder.with_environment(Environment::from_single_url(&url));
        }

        Ok(builder.build())
    }
}

/// Builder for a [`GatewayClient`](crate::client::GatewayClient).
#[derive(Debug)]
pub struct GatewayClientBuilder {
    client: reqwest::Client,
    credentials: Credentials,
    environment: Environment,
    gateway_timezone: Option<Tz>,
    local_timezone: Option<Tz>,
}

impl GatewayClientBuilder {
    /// Creates a new builder to configure a [`GatewayClient`](crate::client::GatewayClient).
    pub fn new(credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            environment: Environment::Production,
            gateway_timezone: None,
            local_timezone: None,
        }
    }

    /// Consumes the builder and builds a new [`GatewayClient`](crate::client::GatewayClient).
    pub fn build(self) -> GatewayClient {
        let inner = Arc::new(GatewayClientInner {
            client: build_client_with_middleware(self.client),
            credentials: self.credentials,
            environment: self.environment,
            result_options: Arc::new(ResultOptions {
                gateway_timezone: self.gateway_timezone,
            }),
            local_timezone: self.local_timezone,
        });

        GatewayClient {
            transactions: TransactionsApi::new(inner),
        }
    }

    /// Sets a specific reqwest [`Client`](reqwest::Client) to use.
    ///
    /// Timeouts are configured on this client.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Sets the timezone in which the gateway reports naive transaction timestamps.
    ///
    /// When set, `trans_date_and_time` fields are read as UTC timestamps.
    pub fn with_gateway_timezone(mut self, tz: Tz) -> Self {
        self.gateway_timezone = Some(tz);
        self
    }

    /// Sets the timezone naive query boundaries are interpreted in.
    ///
    /// Defaults to the system timezone.
    pub fn with_local_timezone(mut self, tz: Tz) -> Self {
        self.local_timezone = Some(tz);
        self
    }

    /// Selects the gateway test environment instead of production.
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.environment = Environment::from_test_mode(test_mode);
        self
    }

    /// Sets the environment to which this client should connect.
    ///
    /// Defaults to [`Environment::Production`].
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }
}

/// Gateway environment to which a [`GatewayClient`](crate::client::GatewayClient) connects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Live gateway.
    Production,
    /// Gateway test environment. No real money is moved.
    Test,
    /// Custom transaction endpoint, for mock gateways.
    Custom { transaction_url: Url },
}

impl Environment {
    /// Selects [`Environment::Test`] or [`Environment::Production`].
    pub fn from_test_mode(test_mode: bool) -> Self {
        if test_mode {
            Environment::Test
        } else {
            Environment::Production
        }
    }

    /// Custom environment serving the transaction endpoint on `url`, under the same path as
    /// the real gateway.
    pub fn from_single_url(url: &Url) -> Self {
        let mut transaction_url = url.clone();
        transaction_url.set_path(TRANSACTION_PATH);
        Environment::Custom { transaction_url }
    }

    /// Base URL of the transaction endpoint.
    pub fn transaction_url(&self) -> &Url {
        match self {
            Environment::Production => &*PRODUCTION_URL,
            Environment::Test => &*TEST_URL,
            Environment::Custom { transaction_url } => transaction_url,
        }
    }

    /// URL `action` is posted to.
    pub fn action_url(&self, action: Action) -> Result<Url, Error> {
        self.transaction_url()
            .join(&encode(action.as_str()))
            .map_err(|e| Error::Other(e.into()))
    }
}

/// Client configuration, as loaded from a config file or the environment.
///
/// ```rust
/// # use firstpay_rust::client::GatewayConfig;
/// let config: GatewayConfig = serde_json::from_str(r#"{
///     "merchant_key": "my-merchant-key",
///     "processor_id": "my-processor-id",
///     "gateway_timezone": "America/New_York",
///     "test_mode": true
/// }"#).unwrap();
///
/// assert!(config.test_mode);
/// assert!(config.local_timezone.is_none());
/// ```
#[derive(Deserialize, Debug, Clone)]
pub struct GatewayConfig {
    pub merchant_key: MerchantKey,
    pub processor_id: String,
    /// IANA identifier of the zone the gateway reports timestamps in.
    #[serde(default)]
    pub gateway_timezone: Option<String>,
    #[serde(default)]
    pub test_mode: bool,
    /// IANA identifier of the zone naive query boundaries are interpreted in.
    #[serde(default)]
    pub local_timezone: Option<String>,
    /// Custom base URL, overriding `test_mode`.
    #[serde(default)]
    pub base_url: Option<String>,
}

fn parse_timezone(name: &str) -> Result<Tz, Error> {
    name.parse()
        .map_err(|_| Error::InvalidConfiguration(format!("unknown timezone `{}`", name)))
}

fn build_client_with_middleware(client: reqwest::Client) -> ClientWithMiddleware {
    reqwest_middleware::ClientBuilder::new(client)
        .with(TracingMiddleware::default())
        .with(InjectUserAgentMiddleware::new())
        .build()
}
