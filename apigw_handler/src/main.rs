use std::env;

use apigw_handler::{function_handler, DynamoRecordStore, HandlerConfig};
use lambda_http::{run, service_fn, Error};
use tracing::{error, info};

const TRACE_DEBUG: &str = "TRACE_DEBUG";

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_max_level(match env::var(TRACE_DEBUG) {
            Ok(_) => tracing::Level::DEBUG,
            Err(_) => tracing::Level::INFO
        })
        // disable printing the name of the module in every log line.
        .with_target(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .init();

    let config = match HandlerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error_type = "ConfigError", error_message = %e, "configuration error");
            return Err(e.into());
        }
    };
    info!(table_name = %config.table_name, "loaded table name from environment");

    let store = DynamoRecordStore::from_config(&config).await;

    run(service_fn(|event| function_handler(&store, &config, event))).await
}
