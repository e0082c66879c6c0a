use anyhow::Context;
use chrono::{Duration, Local};
use firstpay_rust::{
    apis::transactions::{Action, Params},
    client::GatewayConfig,
    result::FieldValue,
    GatewayClient,
};

fn read_config() -> anyhow::Result<GatewayConfig> {
    config::Config::builder()
        .add_source(config::File::with_name("config"))
        .add_source(config::Environment::with_prefix("FIRSTPAY"))
        .build()?
        .try_deserialize()
        .context("Failed to assemble the required configuration")
}

async fn run() -> anyhow::Result<()> {
    let config = read_config()?;
    let client = GatewayClient::from_config(&config)?;

    // Everything settled during the last week
    let today = Local::now().date_naive();
    let res = client
        .transactions
        .query(
            Params::new()
                .with("start_date", today - Duration::days(7))
                .with("end_date", today),
        )
        .await?;

    let orders = res.get_object("data")?.get_list("orders")?;
    tracing::info!("Found {} transactions", orders.len());

    for order in orders.iter().filter_map(FieldValue::as_object) {
        tracing::info!(
            "{} {} at {}",
            order.get_string("ref_number").unwrap_or_default(),
            order.get_string("transaction_amount").unwrap_or_default(),
            order
                .get_temporal("trans_date_and_time")
                .map(|t| t.to_string())
                .unwrap_or_default(),
        );
    }

    // Close the current batch
    let batch = client
        .transactions
        .execute(Action::CloseBatch, Params::new())
        .await?;
    tracing::info!("Batch closed: {}", batch);

    Ok(())
}

#[tokio::main]
async fn main() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Setting default subscriber failed");

    if let Err(e) = run().await {
        tracing::error!("Fatal error: {:?}", e);
        std::process::exit(1);
    }
}
