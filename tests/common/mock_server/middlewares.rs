use actix_web::{
    dev::{ServiceRequest, ServiceResponse},
    HttpResponse,
};

/// Checks that all the requests contain the right user agent header
pub(super) fn validate_user_agent(req: &ServiceRequest) -> Result<(), anyhow::Error> {
    anyhow::ensure!(
        req.headers()
            .get("User-Agent")
            .map(|v| v.to_str())
            .transpose()?
            == Some(concat!("firstpay-rust/", env!("CARGO_PKG_VERSION"))),
        "Invalid User-Agent"
    );

    Ok(())
}

/// Checks the content type and charset headers the gateway relies on to decode the body
pub(super) fn validate_json_headers(req: &ServiceRequest) -> Result<(), anyhow::Error> {
    let header = |name: &str| req.headers().get(name).and_then(|v| v.to_str().ok());

    anyhow::ensure!(
        header("Content-Type") == Some("application/json"),
        "Invalid Content-Type"
    );
    anyhow::ensure!(
        header("Charset") == Some("utf-8"),
        "Invalid or missing Charset"
    );

    Ok(())
}

/// The real gateway answers malformed requests with plain text, not JSON
pub(super) fn reject(req: ServiceRequest, error: anyhow::Error) -> ServiceResponse {
    req.into_response(
        HttpResponse::BadRequest()
            .content_type("text/plain")
            .body(format!("Bad Request: {}", error)),
    )
}
