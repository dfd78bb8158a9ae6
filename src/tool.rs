//! Tool surface for agent hosts.
//!
//! Exposes the extractor as a single named tool, `extract`, taking one
//! required string argument `url`. Hosts discover it through
//! [`tool_definitions`] and invoke it through [`call_tool`]; the reply text is
//! either the Markdown document or an `"Error: "`-prefixed message.

use crate::config::ExtractionConfig;
use crate::convert::{extract, ERROR_PREFIX};
use crate::error::Web2MdError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Name of the only tool this service exposes.
pub const EXTRACT_TOOL: &str = "extract";

/// Service descriptor printed by `web2md --info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub description: String,
    pub version: String,
    pub capabilities: Vec<String>,
}

/// A tool the service exposes, with a JSON Schema for its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Result of one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    fn error(e: &Web2MdError) -> Self {
        Self {
            text: format!("{ERROR_PREFIX}{e}"),
            is_error: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExtractArgs {
    url: String,
}

pub fn service_info() -> ServiceInfo {
    ServiceInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        description: "Extracts the readable article from a web page, follows its \
                      pagination and returns the whole article as Markdown."
            .to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        capabilities: vec!["tools".to_string()],
    }
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![ToolDefinition {
        name: EXTRACT_TOOL.to_string(),
        description: "Extract the main content of a web article as Markdown, \
                      following next-page links across a paginated article."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "Absolute http(s) URL of the article's first page"
                }
            },
            "required": ["url"]
        }),
    }]
}

/// Invoke a tool by name.
///
/// Never returns `Err`: unknown tools, bad arguments and extraction failures
/// all come back as a [`ToolOutput`] with `is_error` set.
pub async fn call_tool(name: &str, args: &Value, config: &ExtractionConfig) -> ToolOutput {
    if name != EXTRACT_TOOL {
        return ToolOutput::error(&Web2MdError::UnknownTool {
            name: name.to_string(),
        });
    }

    let args: ExtractArgs = match serde_json::from_value(args.clone()) {
        Ok(args) => args,
        Err(e) => {
            return ToolOutput::error(&Web2MdError::InvalidToolArguments {
                tool: name.to_string(),
                detail: e.to_string(),
            })
        }
    };

    match extract(&args.url, config).await {
        Ok(output) => ToolOutput {
            text: output.markdown,
            is_error: false,
        },
        Err(e) => {
            tracing::error!("Tool call '{}' failed: {}", name, e);
            ToolOutput::error(&e)
        }
    }
}
