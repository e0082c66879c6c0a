use crate::common::test_context::TestContext;
use firstpay_rust::{
    apis::{
        auth::Credentials,
        transactions::{Action, Params},
    },
    Error, GatewayClient,
};

#[tokio::test]
async fn invalid_credentials() {
    let ctx = TestContext::start().await;

    // Create a new client with a set of invalid credentials pointing to the same gateway
    let client = GatewayClient::builder(Credentials::new("invalid", "invalid"))
        .with_environment(ctx.gateway_environment())
        .build();

    let err = client
        .transactions
        .execute(Action::VaultQueryVault, Params::new().with("id", "1"))
        .await
        .expect_err("Expected error");

    assert!(matches!(err, Error::GatewayError(_)));
    assert!(!err.error_messages().is_empty());
}

#[tokio::test]
async fn credentials_cannot_be_overridden_by_params() {
    let ctx = TestContext::start().await;

    let res = ctx
        .client
        .transactions
        .execute(
            Action::VaultCreateContainer,
            Params::new()
                .with("owner_name", "Some One")
                .with("merchant_key", "invalid")
                .with("processor_id", "invalid"),
        )
        .await
        .unwrap();

    assert!(res.is_success());
    assert!(!ctx.credentials.processor_id.is_empty());
}

#[cfg(not(feature = "acceptance-tests"))]
#[tokio::test]
async fn non_json_response_is_a_gateway_error() {
    let ctx = TestContext::start().await;

    // The mock gateway answers actions it does not implement with a plain text page
    let err = ctx
        .client
        .transactions
        .execute(Action::AchGetCategories, Params::new())
        .await
        .expect_err("Expected error");

    assert!(matches!(err, Error::GatewayError(_)));
    assert_eq!(err.error_messages(), &["Service Unavailable".to_string()]);
    assert_eq!(
        err.result().and_then(|r| r.raw_body()),
        Some("Service Unavailable")
    );
}

#[tokio::test]
async fn unreachable_gateway_is_an_http_error() {
    // Nothing listens on port 1
    let client = GatewayClient::builder(Credentials::new("key", "processor"))
        .with_environment(firstpay_rust::client::Environment::from_single_url(
            &reqwest::Url::parse("http://127.0.0.1:1").unwrap(),
        ))
        .build();

    let err = client
        .transactions
        .execute(Action::Sale, Params::new())
        .await
        .expect_err("Expected error");

    assert!(matches!(err, Error::HttpError(_)));
}
