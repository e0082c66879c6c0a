use crate::{
    apis::auth::Credentials,
    common::{MERCHANT_KEY_FIELD, PROCESSOR_ID_FIELD},
    naming::to_upper_camel,
    temporal::{self, Temporal},
    Error,
};
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    SecondsFormat, TimeZone, Timelike, Utc,
};
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::{collections::BTreeMap, fmt, str::FromStr};

macro_rules! actions {
    ($($(#[$doc:meta])* $variant:ident),* $(,)?) => {
        /// Transaction actions exposed by the gateway.
        ///
        /// Each action is posted to the path segment of the same name.
        #[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Action {
            $($(#[$doc])* $variant,)*
        }

        impl Action {
            /// Every action, in declaration order.
            pub const ALL: &'static [Action] = &[$(Action::$variant,)*];

            /// Name of the action, as used in the request path.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Action::$variant => stringify!($variant),)*
                }
            }
        }

        impl FromStr for Action {
            type Err = UnknownAction;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok(Action::$variant),)*
                    _ => Err(UnknownAction(s.to_string())),
                }
            }
        }
    };
}

actions! {
    Auth,
    AuthUsingVault,
    Sale,
    SaleUsingVault,
    Credit,
    CreditRetailOnly,
    CreditRetailOnlyUsingVault,
    Void,
    ReAuth,
    ReSale,
    ReDebit,
    /// Transaction search. See [`TransactionsApi::query`](crate::apis::transactions::TransactionsApi::query).
    Query,
    CloseBatch,
    Settle,
    TipAdjust,
    AchVoid,
    AchCredit,
    AchDebit,
    AchCreditUsingVault,
    AchDebitUsingVault,
    AchGetCategories,
    AchCreateCategory,
    AchDeleteCategory,
    AchSetupStore,
    VaultCreateContainer,
    VaultCreateAchRecord,
    VaultCreateCCRecord,
    VaultCreateShippingRecord,
    VaultDeleteContainerAndAllAsscData,
    VaultDeleteAchRecord,
    VaultDeleteCCRecord,
    VaultDeleteShippingRecord,
    VaultUpdateContainer,
    VaultUpdateAchRecord,
    VaultUpdateCCRecord,
    VaultUpdateShippingRecord,
    VaultQueryVault,
    VaultQueryCCRecord,
    VaultQueryAchRecord,
    VaultQueryShippingRecord,
    RecurringModify,
    AccountUpdaterSubmit,
    AccountUpdaterSubmitVault,
    AccountUpdaterReturn,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown action name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown gateway action: {0}")]
pub struct UnknownAction(pub String);

/// A single request parameter.
///
/// Dates and times are sent as ISO-8601 strings. Values of any other type can be sent as text
/// with [`ParamValue::text`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    /// Datetime without timezone.
    DateTime(NaiveDateTime),
    /// Datetime with a fixed UTC offset.
    ZonedDateTime(DateTime<FixedOffset>),
    List(Vec<ParamValue>),
    Map(Params),
}

impl ParamValue {
    /// Textual representation of a value with no dedicated variant.
    pub fn text(value: impl fmt::Display) -> Self {
        ParamValue::String(value.to_string())
    }

    pub fn to_json(&self) -> Value {
        match self {
            ParamValue::Null => Value::Null,
            ParamValue::Bool(b) => Value::Bool(*b),
            ParamValue::Number(n) => Value::Number(n.clone()),
            ParamValue::String(s) => Value::String(s.clone()),
            ParamValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            ParamValue::Time(t) => Value::String(t.format("%H:%M:%S%.f").to_string()),
            ParamValue::DateTime(dt) => {
                Value::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
            ParamValue::ZonedDateTime(dt) => {
                Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, false))
            }
            ParamValue::List(items) => Value::Array(items.iter().map(ParamValue::to_json).collect()),
            ParamValue::Map(params) => Value::Object(
                params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

macro_rules! param_from_number {
    ($($t:ty),*) => {
        $(impl From<$t> for ParamValue {
            fn from(n: $t) -> Self {
                ParamValue::Number(n.into())
            }
        })*
    };
}

param_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for ParamValue {
    /// Non-finite numbers cannot be represented in JSON and become `null`.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(ParamValue::Null, ParamValue::Number)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<NaiveDate> for ParamValue {
    fn from(d: NaiveDate) -> Self {
        ParamValue::Date(d)
    }
}

impl From<NaiveTime> for ParamValue {
    fn from(t: NaiveTime) -> Self {
        ParamValue::Time(t)
    }
}

impl From<NaiveDateTime> for ParamValue {
    fn from(dt: NaiveDateTime) -> Self {
        ParamValue::DateTime(dt)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for ParamValue {
    fn from(dt: DateTime<Tz>) -> Self {
        let offset = dt.offset().fix();
        ParamValue::ZonedDateTime(dt.with_timezone(&offset))
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(items: Vec<T>) -> Self {
        ParamValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<Params> for ParamValue {
    fn from(params: Params) -> Self {
        ParamValue::Map(params)
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ParamValue::Null,
            Value::Bool(b) => ParamValue::Bool(b),
            Value::Number(n) => ParamValue::Number(n),
            Value::String(s) => ParamValue::String(s),
            Value::Array(items) => ParamValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => ParamValue::Map(map.into_iter().collect()),
        }
    }
}

/// Parameters of a gateway action, keyed by snake_case name.
///
/// ```rust
/// # use firstpay_rust::apis::transactions::Params;
/// let params = Params::new()
///     .with("transaction_amount", "10.00")
///     .with("card_number", "4111111111111111")
///     .with("card_exp_month", "12")
///     .with("card_exp_year", "30");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value with the same name.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<ParamValue>> Extend<(K, V)> for Params {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// JSON body posted to the gateway.
pub type RequestPayload = Map<String, Value>;

/// Builds the request body for `params`.
///
/// Top-level names are converted to camelCase; nested maps are sent as given. The credentials
/// are added last and win over parameters with the same name.
pub fn build_payload(params: &Params, credentials: &Credentials) -> RequestPayload {
    let mut payload: RequestPayload = params
        .iter()
        .map(|(name, value)| (to_upper_camel(name), value.to_json()))
        .collect();

    payload.insert(
        MERCHANT_KEY_FIELD.to_string(),
        Value::String(credentials.merchant_key.expose_secret().to_string()),
    );
    payload.insert(
        PROCESSOR_ID_FIELD.to_string(),
        Value::String(credentials.processor_id.clone()),
    );

    payload
}

/// Which end of a query date range a boundary is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    Start,
    End,
}

impl BoundaryKind {
    fn prefix(&self) -> &'static str {
        match self {
            BoundaryKind::Start => "start",
            BoundaryKind::End => "end",
        }
    }

    /// Time a bare date is combined with.
    fn default_time(&self) -> NaiveTime {
        match self {
            BoundaryKind::Start => NaiveTime::MIN,
            BoundaryKind::End => NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
                .unwrap_or(NaiveTime::MIN),
        }
    }
}

/// One end of a query date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBoundary {
    /// Whole day: the start of day for a start boundary, the end of day for an end boundary.
    Date(NaiveDate),
    /// Wall-clock time in the local timezone.
    Naive(NaiveDateTime),
    /// Exact instant.
    Zoned(DateTime<FixedOffset>),
}

impl DateBoundary {
    /// Converts a query parameter into a boundary.
    ///
    /// Strings are accepted when they hold an ISO-8601 or `MMDDYYYY` date or datetime.
    pub fn from_param(name: &str, value: &ParamValue) -> Result<Self, Error> {
        let invalid = || Error::InvalidParameter(format!("`{}` is not a date or datetime", name));

        match value {
            ParamValue::Date(d) => Ok(DateBoundary::Date(*d)),
            ParamValue::DateTime(dt) => Ok(DateBoundary::Naive(*dt)),
            ParamValue::ZonedDateTime(dt) => Ok(DateBoundary::Zoned(*dt)),
            ParamValue::String(s) => match temporal::extract(&Value::String(s.clone())) {
                Some(Temporal::Date(d)) => Ok(DateBoundary::Date(d)),
                Some(Temporal::DateTime(dt)) => Ok(DateBoundary::Naive(dt)),
                _ => Err(invalid()),
            },
            _ => Err(invalid()),
        }
    }

    /// Resolves the boundary to a UTC instant, interpreting wall-clock values in `local_tz`.
    pub fn to_utc<Tz: TimeZone>(
        &self,
        kind: BoundaryKind,
        local_tz: &Tz,
    ) -> Result<DateTime<Utc>, Error> {
        let naive = match self {
            DateBoundary::Zoned(dt) => return Ok(dt.with_timezone(&Utc)),
            DateBoundary::Date(d) => d.and_time(kind.default_time()),
            DateBoundary::Naive(dt) => *dt,
        };

        temporal::localize_to_utc(&naive, local_tz).ok_or_else(|| {
            Error::InvalidParameter(format!("{} does not exist in the local timezone", naive))
        })
    }
}

impl From<NaiveDate> for DateBoundary {
    fn from(d: NaiveDate) -> Self {
        DateBoundary::Date(d)
    }
}

impl From<NaiveDateTime> for DateBoundary {
    fn from(dt: NaiveDateTime) -> Self {
        DateBoundary::Naive(dt)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateBoundary {
    fn from(dt: DateTime<Tz>) -> Self {
        let offset = dt.offset().fix();
        DateBoundary::Zoned(dt.with_timezone(&offset))
    }
}

/// Expands a date range boundary into the six parameters the gateway's query action expects:
/// `query_<start|end>_{year,month,day,hour,minute,AMPM}`, all in UTC with a 12-hour clock.
pub fn date_range_params<Tz: TimeZone>(
    kind: BoundaryKind,
    boundary: &DateBoundary,
    local_tz: &Tz,
) -> Result<Params, Error> {
    let utc = boundary.to_utc(kind, local_tz)?;
    let prefix = kind.prefix();

    Ok(Params::new()
        .with(format!("query_{}_year", prefix), utc.year())
        .with(format!("query_{}_month", prefix), utc.month())
        .with(format!("query_{}_day", prefix), utc.day())
        .with(format!("query_{}_hour", prefix), utc.hour() % 12)
        .with(format!("query_{}_minute", prefix), utc.minute())
        .with(
            format!("query_{}_AMPM", prefix),
            if utc.hour() < 12 { "AM" } else { "PM" },
        ))
}

/// Replaces the `start_date` and `end_date` parameters of a query with the gateway's
/// date range parameters.
///
/// When either boundary is present, `query_time_zone_offset` is set to `0` since every
/// boundary is sent in UTC. `null` boundaries are dropped.
pub fn expand_query_dates<Tz: TimeZone>(mut params: Params, local_tz: &Tz) -> Result<Params, Error> {
    let boundaries = [
        (BoundaryKind::Start, "start_date", params.remove("start_date")),
        (BoundaryKind::End, "end_date", params.remove("end_date")),
    ];

    let mut has_range = false;
    for (kind, name, value) in boundaries {
        let value = match value {
            None | Some(ParamValue::Null) => continue,
            Some(value) => value,
        };

        let boundary = DateBoundary::from_param(name, &value)?;
        params.extend(date_range_params(kind, &boundary, local_tz)?.0);
        has_range = true;
    }

    if has_range {
        params.insert("query_time_zone_offset", 0);
    }

    Ok(params)
}
