use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_dynamodb as ddb;
use tracing::debug;

use crate::config::HandlerConfig;
use crate::error::StoreError;
use crate::record::Record;

/// Destination for inserted records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn put_record(&self, table_name: &str, record: &Record) -> Result<(), StoreError>;
}

/// DynamoDB-backed store. The client is built once per function instance and
/// shared by every invocation.
pub struct DynamoRecordStore {
    client: ddb::Client,
}

impl DynamoRecordStore {
    pub fn new(client: ddb::Client) -> DynamoRecordStore {
        DynamoRecordStore { client }
    }

    pub async fn from_config(handler_config: &HandlerConfig) -> DynamoRecordStore {
        let region_provider = RegionProviderChain::default_provider().or_else("us-east-1");
        let config = aws_config::from_env().region(region_provider).load().await;
        let ddb_config = match &handler_config.dynamodb_endpoint {
            Some(endpoint) => ddb::config::Builder::from(&config).endpoint_url(endpoint).build(),
            None => ddb::config::Builder::from(&config).build()
        };
        DynamoRecordStore::new(ddb::Client::from_conf(ddb_config))
    }
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    async fn put_record(&self, table_name: &str, record: &Record) -> Result<(), StoreError> {
        debug!(table_name, item_id = %record.id, "put_item");
        self.client.put_item()
            .table_name(table_name)
            .set_item(Some(record.to_item()))
            .send()
            .await
            .map_err(|e| StoreError::PutItem {
                table: table_name.to_string(),
                source: e.into(),
            })?;
        Ok(())
    }
}
