use crate::common::test_context::TestContext;
use chrono::{Duration, Utc};
use firstpay_rust::{
    apis::transactions::{Action, Params},
    Error,
};

fn sale_params(amount: &str) -> Params {
    Params::new()
        .with("transaction_amount", amount)
        .with("card_number", "4111111111111111")
        .with("card_exp_month", "12")
        .with("card_exp_year", "30")
        .with("owner_name", "Some One")
}

#[tokio::test]
async fn sale_is_approved() {
    let ctx = TestContext::start().await;

    let res = ctx
        .client
        .transactions
        .execute(Action::Sale, sale_params("10.00"))
        .await
        .unwrap();

    assert!(res.is_success());
    let data = res.get_object("data").unwrap();
    assert!(!data.get_string("ref_number").unwrap().is_empty());
    assert!(data.has_field("auth_code"));

    // Transaction timestamps are reported in the gateway zone and read back in UTC
    let trans_date_and_time = data.get_datetime("trans_date_and_time").unwrap();
    assert!((Utc::now() - trans_date_and_time).abs() < Duration::minutes(5));
}

#[tokio::test]
async fn auth_then_void() {
    let ctx = TestContext::start().await;

    let auth = ctx
        .client
        .transactions
        .execute(Action::Auth, sale_params("5.00"))
        .await
        .unwrap();
    let ref_number = auth
        .get_object("data")
        .unwrap()
        .get_string("ref_number")
        .unwrap();

    let void = ctx
        .client
        .transactions
        .execute(Action::Void, Params::new().with("ref_number", ref_number.as_str()))
        .await
        .unwrap();

    assert!(void.is_success());
}

#[tokio::test]
async fn sale_with_missing_fields_fails_validation() {
    let ctx = TestContext::start().await;

    let err = ctx
        .client
        .transactions
        .execute(Action::Sale, Params::new().with("owner_name", "Some One"))
        .await
        .expect_err("Expected error");

    let validation_error = match err {
        Error::ValidationError(e) => e,
        e => panic!("Unexpected error: {:?}", e),
    };
    assert!(!validation_error.validation_failures().is_empty());
    assert_eq!(
        validation_error.error_messages().len(),
        validation_error.validation_failures().len()
    );
    assert!(validation_error
        .validation_failures()
        .iter()
        .any(|failure| failure.field.as_deref() == Some("transactionAmount")));
    assert!(!validation_error.result().is_success());
}

#[cfg(not(feature = "acceptance-tests"))]
#[tokio::test]
async fn declined_sale_is_a_gateway_error() {
    use crate::common::DECLINED_CARD_NUMBER;

    let ctx = TestContext::start().await;

    let err = ctx
        .client
        .transactions
        .execute(
            Action::Sale,
            sale_params("10.00").with("card_number", DECLINED_CARD_NUMBER),
        )
        .await
        .expect_err("Expected error");

    assert!(matches!(err, Error::GatewayError(_)));
    assert_eq!(err.to_string(), "Card declined");
    assert_eq!(
        err.error_messages(),
        &["Card declined".to_string(), "Do not honor".to_string()]
    );
}

#[tokio::test]
async fn void_of_unknown_transaction_fails() {
    let ctx = TestContext::start().await;

    let err = ctx
        .client
        .transactions
        .execute(Action::Void, Params::new().with("ref_number", "0"))
        .await
        .expect_err("Expected error");

    assert!(matches!(err, Error::GatewayError(_) | Error::ValidationError(_)));
    assert!(!err.error_messages().is_empty());
}
