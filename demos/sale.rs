use anyhow::Context;
use firstpay_rust::{
    apis::transactions::{Action, Params},
    client::GatewayConfig,
    Error, GatewayClient,
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

    // Setup the gateway client
    let client = GatewayClient::from_config(&config)?;

    // Run a sale on a test card
    let res = client
        .transactions
        .execute(
            Action::Sale,
            Params::new()
                .with("transaction_amount", "1.00")
                .with("card_number", "4111111111111111")
                .with("card_exp_month", "12")
                .with("card_exp_year", "30")
                .with("cvv", "123")
                .with("owner_name", "Some One")
                .with("owner_zip", "10001"),
        )
        .await;

    let sale = match res {
        Ok(sale) => sale,
        Err(Error::ValidationError(e)) => {
            for failure in e.validation_failures() {
                tracing::warn!("Rejected field: {}", failure);
            }
            return Err(Error::ValidationError(e).into());
        }
        Err(e) => return Err(e.into()),
    };

    let data = sale.get_object("data")?;
    let ref_number = data.get_string("ref_number")?;
    tracing::info!("Sale approved: {}", ref_number);
    tracing::info!("{}", sale);

    // Void it straight away
    client
        .transactions
        .execute(Action::Void, Params::new().with("ref_number", ref_number))
        .await?;

    tracing::info!("Sale voided");

    Ok(())
}

#[tokio::main]
async fn main() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Setting default subscriber failed");

    if let Err(e) = run().await {
        tracing::error!("Fatal error: {:?}", e);
        std::process::exit(1);
    }
}
