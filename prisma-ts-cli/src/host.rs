//! Generator host protocol.
//!
//! The Prisma CLI spawns the generator and talks newline-delimited JSON-RPC
//! 2.0 with it: requests arrive on stdin and every response is written as a
//! single JSON line to stderr. Lines on stderr that are not JSON are treated
//! as logs by the host, so tracing output can share the stream.
//!
//! Two methods are served:
//!
//! - `getManifest` returns `{"manifest": {...}}`
//! - `generate` runs a full pass and returns `null`

use crate::error::CliResult;
use prisma_ts::config::GeneratorOptions;
use prisma_ts::GenerateError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{BufRead, Write};

/// Code for a request line that is not valid JSON-RPC.
pub const PARSE_ERROR: i64 = -32700;

/// Code for an unknown method.
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Code for a failed `generate` or `getManifest` call.
pub const GENERATOR_FAILURE: i64 = -32000;

const JSONRPC_VERSION: &str = "2.0";

/// A request sent by the host.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    /// Protocol version, `"2.0"`.
    #[serde(default)]
    pub jsonrpc: Option<String>,

    /// Method name.
    pub method: String,

    /// Method parameters.
    #[serde(default)]
    pub params: Value,

    /// Request id, echoed in the response.
    #[serde(default)]
    pub id: Value,
}

/// Error object of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    /// Create an error without data.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach structured data.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    fn parse(error: &impl std::fmt::Display) -> Self {
        Self::new(PARSE_ERROR, format!("Parse error: {error}"))
    }

    fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {method}"))
    }

    fn invalid_params(error: &serde_json::Error) -> Self {
        Self::new(GENERATOR_FAILURE, format!("Invalid generator options: {error}"))
            .with_data(json!({ "kind": "params" }))
    }
}

impl From<&GenerateError> for RpcError {
    fn from(error: &GenerateError) -> Self {
        let kind = match error {
            GenerateError::Config(_) => "config",
            GenerateError::Validation(_) => "validation",
            GenerateError::Format(_) => "format",
            GenerateError::Write(_) => "write",
        };
        Self::new(GENERATOR_FAILURE, error.to_string()).with_data(json!({
            "kind": kind,
            "configMissing": error.is_config_missing(),
        }))
    }
}

/// A response line.
#[derive(Debug, Clone, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    /// A successful response. A `null` result is still serialized.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    /// A failed response.
    pub fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Whether the call succeeded.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Serve requests until the reader reaches EOF.
///
/// Requests are handled one at a time, in order. Each produces exactly one
/// response line. Blank lines are skipped.
pub fn serve<R: BufRead, W: Write>(mut reader: R, mut writer: W) -> CliResult<()> {
    tracing::debug!("Waiting for generator requests");

    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(line),
            Err(e) => {
                tracing::error!(error = %e, "Request is not valid UTF-8");
                RpcResponse::failure(Value::Null, RpcError::parse(&e))
            }
        };

        serde_json::to_writer(&mut writer, &response)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    tracing::debug!("Host closed the request stream");
    Ok(())
}

/// Decode and handle a single request line.
pub fn handle_line(line: &str) -> RpcResponse {
    match serde_json::from_str::<RpcRequest>(line) {
        Ok(request) => handle_request(request),
        Err(e) => {
            tracing::error!(error = %e, "Malformed request");
            RpcResponse::failure(Value::Null, RpcError::parse(&e))
        }
    }
}

/// Dispatch a decoded request.
pub fn handle_request(request: RpcRequest) -> RpcResponse {
    let RpcRequest {
        method, params, id, ..
    } = request;

    tracing::debug!(method = %method, id = %id, "Handling request");

    let outcome = match method.as_str() {
        "getManifest" => get_manifest(),
        "generate" => generate(params),
        other => Err(RpcError::method_not_found(other)),
    };

    match outcome {
        Ok(result) => RpcResponse::success(id, result),
        Err(error) => {
            tracing::error!(
                method = %method,
                id = %id,
                code = error.code,
                error_message = %error.message,
                "Request failed"
            );
            RpcResponse::failure(id, error)
        }
    }
}

fn get_manifest() -> Result<Value, RpcError> {
    let manifest = serde_json::to_value(prisma_ts::manifest())
        .map_err(|e| RpcError::new(GENERATOR_FAILURE, e.to_string()))?;
    Ok(json!({ "manifest": manifest }))
}

fn generate(params: Value) -> Result<Value, RpcError> {
    let options: GeneratorOptions =
        serde_json::from_value(params).map_err(|e| RpcError::invalid_params(&e))?;
    prisma_ts::generate(&options).map_err(|e| RpcError::from(&e))?;
    Ok(Value::Null)
}
