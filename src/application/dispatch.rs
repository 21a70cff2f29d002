//! # Tool Dispatcher
//!
//! Resolves a tool call against the catalog, builds the matching [`ApiRequest`]
//! and hands it to the [`ApiClient`].

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::sync::{Arc, LazyLock};

use crate::application::catalog::{self, BodyRule, ToolSpec};
use crate::domain::error::ToolError;
use crate::domain::traits::ApiClient;
use crate::domain::types::ApiRequest;
use crate::strings::logs;

/// Arguments object of a tool call
pub type Arguments = Map<String, Value>;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\{(\w+)(\?)?\}").expect("placeholder pattern is valid"));

/// Whether an argument counts as not supplied, so a default applies.
///
/// Absent, `null`, `false`, zero and the empty string are all unset.
pub fn is_unset(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Textual form of an argument for paths and query strings.
///
/// Whole-valued floats drop their fraction, so `2.0` renders as `2`.
fn as_segment(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn render_path(template: &str, args: &Arguments) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let value = args.get(&caps[1]);
            let optional = caps.get(2).is_some();
            match value {
                Some(v) if optional && !is_unset(Some(v)) => format!("/{}", as_segment(v)),
                _ if optional => String::new(),
                Some(Value::Null) => "/null".to_string(),
                Some(v) => format!("/{}", as_segment(v)),
                // Stays on the resource route; left for the remote API to reject
                None => "/undefined".to_string(),
            }
        })
        .into_owned()
}

fn build_body(rule: BodyRule, args: &Arguments) -> Option<Value> {
    match rule {
        BodyRule::None => None,
        BodyRule::Arguments(defaults) => {
            let mut body = args.clone();
            for (key, default) in defaults {
                if is_unset(body.get(*key)) {
                    body.insert(key.to_string(), Value::String(default.to_string()));
                }
            }
            Some(Value::Object(body))
        }
        BodyRule::Pick(fields) => {
            let body: Arguments = fields
                .iter()
                .filter_map(|field| args.get(*field).map(|v| (field.to_string(), v.clone())))
                .collect();
            Some(Value::Object(body))
        }
        BodyRule::Field(field) => args.get(field).cloned(),
    }
}

/// Translate a tool call into the HTTP request it stands for.
pub fn build_request(tool: &ToolSpec, args: &Arguments) -> ApiRequest {
    let mut request = ApiRequest::new(tool.method, render_path(tool.path, args));

    for param in tool.query {
        let value = args.get(param.name);
        if !is_unset(value) {
            request = request.with_query(param.name, value.map(as_segment).unwrap_or_default());
        } else if let Some(default) = param.default {
            request = request.with_query(param.name, default.to_string());
        }
    }

    match build_body(tool.body, args) {
        Some(body) => request.with_body(body),
        None => request,
    }
}

/// Routes tool calls to the trading API
pub struct Dispatcher {
    client: Arc<dyn ApiClient>,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self { client }
    }

    /// The full tool catalog
    pub fn tools(&self) -> &'static [ToolSpec] {
        catalog::TOOLS
    }

    /// Execute one tool call and return the remote response body.
    ///
    /// Calls without an arguments object are rejected before the name is looked up.
    pub async fn call(&self, name: &str, args: Option<&Arguments>) -> Result<Value, ToolError> {
        tracing::info!("{}", logs::tool_called(name));

        let args = args.ok_or(ToolError::MissingArguments)?;
        let tool = catalog::find(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let request = build_request(tool, args);
        Ok(self.client.send(request).await?)
    }
}
