use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// Credentials identifying a merchant to the gateway.
///
/// Both values are sent with every request, as the `merchantKey` and `processorId` fields.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Credentials {
    pub merchant_key: MerchantKey,
    pub processor_id: String,
}

impl Credentials {
    pub fn new(merchant_key: impl Into<MerchantKey>, processor_id: impl Into<String>) -> Self {
        Self {
            merchant_key: merchant_key.into(),
            processor_id: processor_id.into(),
        }
    }
}

/// Wrapper for the merchant key that makes it harder to accidentally expose it
/// and ensures the backing memory is wiped on drop.
///
/// It is a wrapper around a [`secrecy::Secret`](secrecy::Secret).
///
/// ```rust
/// # use firstpay_rust::apis::auth::MerchantKey;
/// let key = MerchantKey::new("supersecret");
///
/// // The key is redacted when printed with Debug
/// assert!(!format!("{:?}", key).contains("supersecret"));
///
/// // But can be manually exposed calling `expose_secret()`...
/// assert_eq!(key.expose_secret(), "supersecret");
///
/// // ... Or if serialized with Serde
/// let serialized = serde_json::to_string(&key).unwrap();
/// assert!(serialized.contains("supersecret"));
/// ```
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MerchantKey(#[serde(serialize_with = "serialize_secret")] Secret<String>);

impl MerchantKey {
    /// Wraps a merchant key in a new `MerchantKey`.
    pub fn new<T: Into<String>>(s: T) -> Self {
        Self(Secret::new(s.into()))
    }

    /// Exposes a reference to the underlying key.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl<T> From<T> for MerchantKey
where
    T: Into<String>,
{
    fn from(s: T) -> Self {
        MerchantKey::new(s)
    }
}

fn serialize_secret<S>(secret: &Secret<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::ser::Serializer,
{
    secret.expose_secret().serialize(serializer)
}
