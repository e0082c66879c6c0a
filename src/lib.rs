//! Rust client for the [1stPayGateway](https://1stpaygateway.net) transaction REST API.
//!
//! Every gateway action (sales, authorizations, voids, ACH transfers, vault records,
//! transaction queries, ...) is a POST of a flat JSON document to
//! `.../secure/RestGW/Gateway/Transaction/<Action>`. This crate takes care of naming
//! conventions, credentials, date handling and error classification, and hands back a
//! read-only [`ResultView`](crate::result::ResultView) of the gateway's response.
//!
//! # Usage
//!
//! ## Prerequisites
//!
//! You need a merchant key and a processor ID, both issued by the gateway.
//! The gateway also offers a test environment, which is selected with
//! [`with_test_mode(true)`](crate::client::GatewayClientBuilder::with_test_mode).
//!
//! ## Initialize a new `GatewayClient`
//!
//! ```rust,no_run
//! # use firstpay_rust::{GatewayClient, apis::auth::Credentials};
//! let client = GatewayClient::builder(Credentials::new("my-merchant-key", "my-processor-id"))
//!     .with_test_mode(true)
//!     .with_gateway_timezone(chrono_tz::America::New_York)
//!     .build();
//! ```
//!
//! A client can also be built from a [`GatewayConfig`](crate::client::GatewayConfig) loaded
//! with any `serde` compatible configuration library.
//!
//! ## Run a sale
//!
//! Parameters are given with snake_case names and sent with the camelCase names the gateway
//! expects. Response fields are read back with snake_case names as well.
//!
//! ```rust,no_run
//! # use firstpay_rust::{GatewayClient, Error, apis::transactions::*};
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let client: GatewayClient = unreachable!();
//! #
//! let res = client
//!     .transactions
//!     .execute(
//!         Action::Sale,
//!         Params::new()
//!             .with("transaction_amount", "10.00")
//!             .with("card_number", "4111111111111111")
//!             .with("card_exp_month", "12")
//!             .with("card_exp_year", "30"),
//!     )
//!     .await;
//!
//! match res {
//!     Ok(result) => {
//!         let data = result.get_object("data")?;
//!         println!("Approved: {}", data.get_string("ref_number")?);
//!     }
//!     Err(Error::ValidationError(e)) => {
//!         for failure in e.validation_failures() {
//!             println!("Invalid field: {}", failure);
//!         }
//!     }
//!     Err(e) => println!("Sale failed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Query transactions
//!
//! ```rust,no_run
//! # use firstpay_rust::{GatewayClient, Error, apis::transactions::*};
//! # use chrono::NaiveDate;
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! # let client: GatewayClient = unreachable!();
//! #
//! let res = client
//!     .transactions
//!     .query(
//!         Params::new()
//!             .with("start_date", NaiveDate::from_ymd_opt(2023, 1, 1))
//!             .with("end_date", NaiveDate::from_ymd_opt(2023, 1, 31)),
//!     )
//!     .await?;
//!
//! println!("{}", res);
//! # Ok(())
//! # }
//! ```
//!
//! ## More examples
//!
//! Look into the [`demos`](../demos) for more example usages of this library.
//!
//! To run an example, use `cargo run` like this:
//!
//! ```shell
//! cargo run --example sale
//! ```

#![deny(missing_debug_implementations)]
#![forbid(unsafe_code)]

pub mod apis;
pub mod client;
mod common;
pub mod error;
mod middlewares;
pub mod naming;
pub mod result;
pub mod temporal;

pub use client::GatewayClient;
pub use error::Error;
