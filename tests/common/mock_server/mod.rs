mod middlewares;
mod routes;

use actix_web::{dev::Service, web, App, HttpServer};
use futures::future::{self, Either};
use reqwest::Url;
use serde_json::{Map, Value};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use tokio::sync::oneshot;

#[derive(Clone)]
struct MockServerConfiguration {
    merchant_key: String,
    processor_id: String,
}

#[derive(Clone, Default)]
struct MockServerStorageInner {
    /// Approved transactions, keyed by reference number.
    transactions: HashMap<String, Map<String, Value>>,
    /// Vault containers, keyed by id.
    vault: HashMap<String, Map<String, Value>>,
}

/// In-memory storage for transactions and vault records created on the mock server.
type MockServerStorage = Arc<RwLock<MockServerStorageInner>>;

/// Simple mock of the 1stPayGateway transaction API used in local integration tests.
pub struct GatewayMockServer {
    url: Url,
    shutdown: Option<oneshot::Sender<()>>,
}

impl GatewayMockServer {
    pub async fn start(merchant_key: &str, processor_id: &str) -> Self {
        let configuration = MockServerConfiguration {
            merchant_key: merchant_key.to_string(),
            processor_id: processor_id.to_string(),
        };

        let storage = MockServerStorage::default();

        // Setup the mock HTTP server and bind it to a random port
        let http_server_factory = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(configuration.clone()))
                .app_data(web::Data::new(storage.clone()))
                .wrap_fn(|req, srv| match middlewares::validate_user_agent(&req) {
                    Ok(()) => Either::Left(srv.call(req)),
                    Err(e) => Either::Right(future::ok(middlewares::reject(req, e))),
                })
                .service(
                    web::resource("/secure/RestGW/Gateway/Transaction/{action}")
                        .wrap_fn(|req, srv| match middlewares::validate_json_headers(&req) {
                            Ok(()) => Either::Left(srv.call(req)),
                            Err(e) => Either::Right(future::ok(middlewares::reject(req, e))),
                        })
                        .route(web::post().to(routes::transaction)),
                )
        })
        .workers(1)
        .bind("127.0.0.1:0")
        .unwrap();

        // Retrieve the address and port the server was bound to
        let addr = http_server_factory.addrs().first().cloned().unwrap();

        // Prepare a oneshot channel to kill the HTTP server when this struct is dropped
        let (shutdown_sender, shutdown_recv) = oneshot::channel();

        // Start the server in another task
        let http_server = http_server_factory.run();
        tokio::spawn(async move {
            tokio::select! {
                _ = http_server => panic!("HTTP server crashed"),
                _ = shutdown_recv => { /* Intentional shutdown */ }
            }
        });

        Self {
            url: Url::parse(&format!("http://{}", addr)).unwrap(),
            shutdown: Some(shutdown_sender),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Drop for GatewayMockServer {
    fn drop(&mut self) {
        // Send a shutdown signal to the actix server on drop
        let _ = self.shutdown.take().unwrap().send(());
    }
}
