use crate::{
    apis::{
        transactions::{build_payload, expand_query_dates, Action, Params, RequestPayload},
        GatewayClientInner,
    },
    common::{CHARSET_HEADER, MERCHANT_KEY_FIELD},
    error::classify,
    result::ResultView,
    Error,
};
use chrono::Local;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::sync::Arc;

static JSON_CONTENT_TYPE: &str = "application/json";
static UTF8_CHARSET: &str = "utf-8";

/// 1stPayGateway transaction APIs client.
///
/// Every [`Action`] the gateway supports goes through [`execute`](TransactionsApi::execute).
#[derive(Clone, Debug)]
pub struct TransactionsApi {
    inner: Arc<GatewayClientInner>,
}

impl TransactionsApi {
    pub(crate) fn new(inner: Arc<GatewayClientInner>) -> Self {
        Self { inner }
    }

    /// Executes a gateway action.
    ///
    /// Returns the decoded response when the gateway reports success. Unsuccessful responses
    /// are turned into [`Error::ValidationError`] or [`Error::GatewayError`].
    ///
    /// [`Action::Query`] gets its date range expanded, see [`query`](TransactionsApi::query).
    #[tracing::instrument(
        name = "Execute Gateway Action",
        skip(self, action, params),
        fields(action = %action)
    )]
    pub async fn execute(&self, action: Action, params: Params) -> Result<ResultView, Error> {
        let params = match action {
            Action::Query => self.expand_query_dates(params)?,
            _ => params,
        };

        self.send(action, &params).await
    }

    /// Searches transactions.
    ///
    /// `start_date` and `end_date` can be given as dates, naive datetimes (interpreted in the
    /// client's local timezone), zoned datetimes or ISO-8601 strings. They are sent to the
    /// gateway as separate UTC date and time components.
    #[tracing::instrument(name = "Query Transactions", skip(self, params))]
    pub async fn query(&self, params: Params) -> Result<ResultView, Error> {
        self.execute(Action::Query, params).await
    }

    fn expand_query_dates(&self, params: Params) -> Result<Params, Error> {
        match self.inner.local_timezone {
            Some(ref tz) => expand_query_dates(params, tz),
            None => expand_query_dates(params, &Local),
        }
    }

    async fn send(&self, action: Action, params: &Params) -> Result<ResultView, Error> {
        let url = self.inner.environment.action_url(action)?;
        let payload = build_payload(params, &self.inner.credentials);

        tracing::debug!(
            %url,
            content_type = JSON_CONTENT_TYPE,
            charset = UTF8_CHARSET,
            payload = %redact_credentials(&payload),
            "Sending gateway request"
        );

        let body = serde_json::to_string_pretty(&payload).map_err(|e| Error::Other(e.into()))?;
        let res = self
            .inner
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(CHARSET_HEADER, UTF8_CHARSET)
            .body(body)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        tracing::debug!(%status, body = %text, "Received gateway response");

        let result = ResultView::from_body(&text, self.inner.result_options.clone());
        if result.is_success() {
            Ok(result)
        } else {
            Err(classify(result))
        }
    }
}

fn redact_credentials(payload: &RequestPayload) -> Value {
    let mut redacted = payload.clone();
    if let Some(key) = redacted.get_mut(MERCHANT_KEY_FIELD) {
        *key = Value::String("[REDACTED]".to_string());
    }
    Value::Object(redacted)
}
