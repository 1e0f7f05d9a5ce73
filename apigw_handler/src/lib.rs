pub mod config;
pub mod error;
pub mod record;
pub mod store;

use chrono::{SecondsFormat, Utc};
use lambda_http::request::RequestContext;
use lambda_http::{Body, Request, Response};
use lambda_runtime::Context;
use serde::Serialize;
use tracing::{debug, error, field, info, info_span, Instrument, Span};

pub use config::HandlerConfig;
pub use error::{ConfigError, HandlerError, StoreError, ValidationError};
pub use record::{Record, Year};
pub use store::{DynamoRecordStore, RecordStore};

pub const SUCCESS_MESSAGE: &str = "Successfully inserted data!";
const UNKNOWN: &str = "unknown";

#[derive(Debug, Serialize)]
pub struct InsertResponse {
    pub message: String,
}

/// Caller and invocation identifiers attached to every log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationMeta {
    pub source_ip: String,
    pub user_agent: String,
    pub request_id: String,
    pub function_name: String,
}

impl Default for InvocationMeta {
    fn default() -> Self {
        InvocationMeta {
            source_ip: UNKNOWN.to_string(),
            user_agent: UNKNOWN.to_string(),
            request_id: UNKNOWN.to_string(),
            function_name: UNKNOWN.to_string(),
        }
    }
}

impl InvocationMeta {
    pub fn from_request(event: &Request) -> InvocationMeta {
        let (source_ip, user_agent) = match event.extensions().get::<RequestContext>() {
            Some(RequestContext::ApiGatewayV1(ctx)) => {
                (ctx.identity.source_ip.clone(), ctx.identity.user_agent.clone())
            }
            Some(RequestContext::ApiGatewayV2(ctx)) => {
                (ctx.http.source_ip.clone(), ctx.http.user_agent.clone())
            }
            _ => (None, None),
        };
        let (request_id, function_name) = match event.extensions().get::<Context>() {
            Some(ctx) => (Some(ctx.request_id.clone()), Some(ctx.env_config.function_name.clone())),
            None => (None, None),
        };
        InvocationMeta {
            source_ip: or_unknown(source_ip),
            user_agent: or_unknown(user_agent),
            request_id: or_unknown(request_id),
            function_name: or_unknown(function_name),
        }
    }
}

fn or_unknown(value: Option<String>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(|| UNKNOWN.to_string())
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Returns the body bytes, or `None` when the request carries no payload.
fn payload(body: &Body) -> Option<&[u8]> {
    match body {
        Body::Text(s) if !s.is_empty() => Some(s.as_bytes()),
        Body::Binary(b) if !b.is_empty() => Some(b.as_slice()),
        _ => None,
    }
}

pub fn success_response() -> Result<Response<Body>, HandlerError> {
    let body = serde_json::to_string(&InsertResponse { message: SUCCESS_MESSAGE.to_string() })
        .map_err(HandlerError::Encode)?;
    Ok(Response::builder()
        .status(200)
        .header("content-type", "application/json")
        .body(body.into())?)
}

/// Writes one record, either parsed from the body or the default one, and
/// answers with the success message.
pub async fn handle(
    store: &dyn RecordStore,
    config: &HandlerConfig,
    meta: &InvocationMeta,
    body: &Body,
) -> Result<Response<Body>, HandlerError> {
    let span = info_span!(
        "lambda_handler",
        table_name = %config.table_name,
        source_ip = %meta.source_ip,
        request_id = %meta.request_id,
        function_name = %meta.function_name,
        has_payload = field::Empty,
        item_id = field::Empty,
    );
    async move {
        info!(
            event_type = "api_request_received",
            source_ip = %meta.source_ip,
            user_agent = %meta.user_agent,
            request_id = %meta.request_id,
            function_name = %meta.function_name,
            table_name = %config.table_name,
            timestamp = %timestamp(),
            "api_request_received"
        );

        let result = match payload(body) {
            Some(bytes) => insert_payload(store, config, bytes).await,
            None => insert_default(store, config).await,
        };

        match result.and_then(|_| success_response()) {
            Ok(response) => {
                info!(
                    event_type = "api_request_completed",
                    status = "success",
                    request_id = %meta.request_id,
                    timestamp = %timestamp(),
                    "api_request_completed"
                );
                Ok(response)
            }
            Err(err) => {
                error!(
                    event_type = "api_request_error",
                    error_type = err.kind(),
                    error_message = %err,
                    request_id = %meta.request_id,
                    source_ip = %meta.source_ip,
                    table_name = %config.table_name,
                    timestamp = %timestamp(),
                    "api_request_error"
                );
                Err(err)
            }
        }
    }
    .instrument(span)
    .await
}

async fn insert_payload(
    store: &dyn RecordStore,
    config: &HandlerConfig,
    body: &[u8],
) -> Result<String, HandlerError> {
    let handler_span = Span::current();
    handler_span.record("has_payload", true);
    async move {
        let record = Record::from_payload(body)?;
        debug!(payload = ?record, "received payload");
        handler_span.record("item_id", record.id.as_str());
        info!(
            event_type = "data_processing_start",
            has_payload = true,
            item_id = %record.id,
            "data_processing_start"
        );
        store.put_record(&config.table_name, &record).await?;
        info!(
            event_type = "dynamodb_write_success",
            item_id = %record.id,
            "dynamodb_write_success"
        );
        Ok(record.id)
    }
    .instrument(info_span!("process_request_with_payload"))
    .await
}

async fn insert_default(
    store: &dyn RecordStore,
    config: &HandlerConfig,
) -> Result<String, HandlerError> {
    let handler_span = Span::current();
    handler_span.record("has_payload", false);
    async move {
        let record = Record::generate_default();
        handler_span.record("item_id", record.id.as_str());
        info!(
            event_type = "data_processing_start",
            has_payload = false,
            default_processing = true,
            item_id = %record.id,
            "data_processing_start"
        );
        store.put_record(&config.table_name, &record).await?;
        info!(
            event_type = "dynamodb_write_success",
            item_id = %record.id,
            default_processing = true,
            "dynamodb_write_success"
        );
        Ok(record.id)
    }
    .instrument(info_span!("process_request_without_payload"))
    .await
}

/// Entry point handed to `lambda_http::run`.
pub async fn function_handler(
    store: &dyn RecordStore,
    config: &HandlerConfig,
    event: Request,
) -> Result<Response<Body>, lambda_http::Error> {
    let meta = InvocationMeta::from_request(&event);
    Ok(handle(store, config, &meta, event.body()).await?)
}
