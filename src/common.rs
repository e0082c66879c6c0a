// Default URLs
pub static PRODUCTION_TRANSACTION_URL: &str =
    "https://secure.1stpaygateway.net/secure/RestGW/Gateway/Transaction/";
pub static TEST_TRANSACTION_URL: &str =
    "https://secure-v.goemerchant.com/secure/RestGW/Gateway/Transaction/";
pub static TRANSACTION_PATH: &str = "/secure/RestGW/Gateway/Transaction/";

// Header names
pub static CHARSET_HEADER: &str = "Charset";

// Credential fields injected into every request
pub static MERCHANT_KEY_FIELD: &str = "merchantKey";
pub static PROCESSOR_ID_FIELD: &str = "processorId";

// Response fields
pub static IS_SUCCESS_FIELD: &str = "isSuccess";
pub static ERROR_MESSAGES_FIELD: &str = "errorMessages";
