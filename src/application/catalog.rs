//! # Tool Catalog
//!
//! Every tool the adapter exposes, described as data: its schema for the MCP host
//! and the shape of the single HTTP call it maps to. The dispatcher and the
//! `tools/list` response are both driven from [`TOOLS`], so they cannot drift apart.

use serde_json::{Map, Value, json};

use crate::domain::types::HttpMethod;
use ParamKind::{Boolean, Number, String as Str};

/// JSON-schema type of a tool parameter.
#[derive(Debug, Clone, Copy)]
pub enum ParamKind {
    String,
    Number,
    Boolean,
    /// String restricted to the listed values
    Enum(&'static [&'static str]),
    StringArray,
    /// Array of objects with the given fields
    ObjectArray(&'static [Param]),
}

/// One declared parameter of a tool.
#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: Option<&'static str>,
    pub required: bool,
}

impl Param {
    pub const fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description: Some(description),
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description: Some(description),
            required: false,
        }
    }

    /// Undocumented nested field (used inside array items)
    pub const fn field(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            description: None,
            required: false,
        }
    }

    fn schema(&self) -> Value {
        let mut schema = match self.kind {
            ParamKind::String => json!({"type": "string"}),
            ParamKind::Number => json!({"type": "number"}),
            ParamKind::Boolean => json!({"type": "boolean"}),
            ParamKind::Enum(values) => json!({"type": "string", "enum": values}),
            ParamKind::StringArray => json!({"type": "array", "items": {"type": "string"}}),
            ParamKind::ObjectArray(fields) => {
                json!({"type": "array", "items": object_schema(fields)})
            }
        };
        if let (Some(description), Some(obj)) = (self.description, schema.as_object_mut()) {
            obj.insert("description".into(), Value::String(description.into()));
        }
        schema
    }
}

/// A query-string parameter; `default` is sent when the argument is unset.
#[derive(Debug, Clone, Copy)]
pub struct QueryParam {
    pub name: &'static str,
    pub default: Option<u64>,
}

const fn paged(name: &'static str, default: u64) -> QueryParam {
    QueryParam {
        name,
        default: Some(default),
    }
}

/// How the request body is built from the arguments.
#[derive(Debug, Clone, Copy)]
pub enum BodyRule {
    None,
    /// The whole arguments object, with defaults filled in for unset keys
    Arguments(&'static [(&'static str, &'static str)]),
    /// An object holding only the listed arguments
    Pick(&'static [&'static str]),
    /// The raw value of one argument
    Field(&'static str),
}

/// Declarative description of one tool.
///
/// `path` is a template: `{name}` is replaced by the argument, and a trailing
/// `/{name?}` segment is dropped entirely when the argument is unset.
#[derive(Debug)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub params: &'static [Param],
    pub query: &'static [QueryParam],
    pub body: BodyRule,
}

impl ToolSpec {
    /// JSON schema of the tool's arguments object
    pub fn input_schema(&self) -> Map<String, Value> {
        match object_schema(self.params) {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

fn object_schema(params: &[Param]) -> Value {
    let properties: Map<String, Value> = params
        .iter()
        .map(|param| (param.name.to_string(), param.schema()))
        .collect();

    let required: Vec<&str> = params
        .iter()
        .filter(|param| param.required)
        .map(|param| param.name)
        .collect();

    let mut schema = json!({"type": "object", "properties": properties});
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema
}

/// Look up a tool by name
pub fn find(name: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|tool| tool.name == name)
}

const ACCOUNT_ID: Param = Param::required("accountId", Str, "Account ID");
const PORTFOLIO_ID: Param = Param::required("portfolioId", Str, "Portfolio ID");
const SYMBOL: Param = Param::required("symbol", Str, "Stock symbol");
const PAGE: Param = Param::optional("page", Number, "Page number (default: 1)");

const ORDER_SIDES: &[&str] = &["BUY_TO_OPEN", "SELL_TO_CLOSE", "SELL_TO_OPEN", "BUY_TO_CLOSE"];
const ORDER_TYPES: &[&str] = &["MARKET", "LIMIT", "STOP", "STOP_LIMIT"];
const TIMES_IN_FORCE: &[&str] = &["DAY", "GTC", "IOC", "FOK"];

const BATCH_ORDER_FIELDS: &[Param] = &[
    Param::field("portfolioId", Str),
    Param::field("symbol", Str),
    Param::field("quantity", Number),
    Param::field("side", Str),
    Param::field("type", Str),
];

pub static TOOLS: &[ToolSpec] = &[
    // Accounts
    ToolSpec {
        name: "get_account",
        description: "Get account details by ID",
        method: HttpMethod::Get,
        path: "/accounts/{accountId}",
        params: &[ACCOUNT_ID],
        query: &[],
        body: BodyRule::None,
    },
    ToolSpec {
        name: "update_account",
        description: "Update account details",
        method: HttpMethod::Put,
        path: "/accounts/{accountId}",
        params: &[ACCOUNT_ID, Param::optional("name", Str, "New account name")],
        query: &[],
        body: BodyRule::Pick(&["name"]),
    },
    ToolSpec {
        name: "freeze_account",
        description: "Freeze a trading account",
        method: HttpMethod::Put,
        path: "/accounts/{accountId}/freeze",
        params: &[Param::required("accountId", Str, "Account ID to freeze")],
        query: &[],
        body: BodyRule::None,
    },
    // Portfolios
    ToolSpec {
        name: "create_portfolio",
        description: "Create a new portfolio",
        method: HttpMethod::Post,
        path: "/accounts/portfolios",
        params: &[
            ACCOUNT_ID,
            Param::required("name", Str, "Portfolio name"),
            Param::required("type", Str, "Portfolio type (e.g., INDIVIDUAL, IRA)"),
        ],
        query: &[],
        body: BodyRule::Arguments(&[]),
    },
    ToolSpec {
        name: "get_portfolio",
        description: "Get portfolio details",
        method: HttpMethod::Get,
        path: "/accounts/portfolios/{portfolioId}",
        params: &[PORTFOLIO_ID],
        query: &[],
        body: BodyRule::None,
    },
    ToolSpec {
        name: "get_account_portfolios",
        description: "Get all portfolios for an account",
        method: HttpMethod::Get,
        path: "/accounts/{accountId}/portfolios",
        params: &[ACCOUNT_ID],
        query: &[],
        body: BodyRule::None,
    },
    ToolSpec {
        name: "reset_portfolio",
        description: "Reset portfolio to initial state",
        method: HttpMethod::Post,
        path: "/accounts/portfolios/{portfolioId}/reset",
        params: &[Param::required("portfolioId", Str, "Portfolio ID to reset")],
        query: &[],
        body: BodyRule::None,
    },
    // Positions
    ToolSpec {
        name: "get_portfolio_equities",
        description: "Get all equity positions in a portfolio",
        method: HttpMethod::Get,
        path: "/accounts/portfolios/{portfolioId}/equities",
        params: &[PORTFOLIO_ID],
        query: &[],
        body: BodyRule::None,
    },
    ToolSpec {
        name: "get_portfolio_options",
        description: "Get all option positions in a portfolio",
        method: HttpMethod::Get,
        path: "/accounts/portfolios/{portfolioId}/options",
        params: &[PORTFOLIO_ID],
        query: &[],
        body: BodyRule::None,
    },
    // Trading
    ToolSpec {
        name: "create_order",
        description: "Create a new trading order",
        method: HttpMethod::Post,
        path: "/orders",
        params: &[
            PORTFOLIO_ID,
            SYMBOL,
            Param::required("quantity", Number, "Number of shares"),
            Param::required("side", ParamKind::Enum(ORDER_SIDES), "Order side"),
            Param::required("type", ParamKind::Enum(ORDER_TYPES), "Order type"),
            Param::optional(
                "timeInForce",
                ParamKind::Enum(TIMES_IN_FORCE),
                "Time in force (default: DAY)",
            ),
            Param::optional("limitPrice", Number, "Limit price (for limit orders)"),
            Param::optional("stopPrice", Number, "Stop price (for stop orders)"),
            Param::optional("assetClass", Str, "Asset class (default: EQUITY)"),
            Param::optional("session", Str, "Trading session (default: REGULAR)"),
        ],
        query: &[],
        body: BodyRule::Arguments(&[
            ("assetClass", "EQUITY"),
            ("session", "REGULAR"),
            ("timeInForce", "DAY"),
        ]),
    },
    ToolSpec {
        name: "create_batch_orders",
        description: "Create multiple orders at once",
        method: HttpMethod::Post,
        path: "/orders/batch",
        params: &[Param::required(
            "orders",
            ParamKind::ObjectArray(BATCH_ORDER_FIELDS),
            "Array of order objects",
        )],
        query: &[],
        body: BodyRule::Field("orders"),
    },
    ToolSpec {
        name: "get_order",
        description: "Get order details by ID",
        method: HttpMethod::Get,
        path: "/orders/{orderId}",
        params: &[Param::required("orderId", Str, "Order ID")],
        query: &[],
        body: BodyRule::None,
    },
    ToolSpec {
        name: "cancel_order",
        description: "Cancel an existing order",
        method: HttpMethod::Put,
        path: "/orders/{orderId}/cancel",
        params: &[Param::required("orderId", Str, "Order ID to cancel")],
        query: &[],
        body: BodyRule::None,
    },
    ToolSpec {
        name: "get_account_orders",
        description: "Get orders for an account",
        method: HttpMethod::Get,
        path: "/orders/account/{accountId}",
        params: &[
            ACCOUNT_ID,
            PAGE,
            Param::optional("limit", Number, "Results per page (default: 10)"),
        ],
        query: &[paged("page", 1), paged("limit", 10)],
        body: BodyRule::None,
    },
    ToolSpec {
        name: "cancel_all_account_orders",
        description: "Cancel all orders for an account",
        method: HttpMethod::Delete,
        path: "/orders/account/{accountId}",
        params: &[ACCOUNT_ID],
        query: &[],
        body: BodyRule::None,
    },
    ToolSpec {
        name: "get_today_filled_orders",
        description: "Get all orders filled today",
        method: HttpMethod::Get,
        path: "/orders/filled/today",
        params: &[
            PAGE,
            Param::optional("limit", Number, "Results per page (default: 10)"),
        ],
        query: &[paged("page", 1), paged("limit", 10)],
        body: BodyRule::None,
    },
    // Market data
    ToolSpec {
        name: "get_quote",
        description: "Get real-time quote for a symbol",
        method: HttpMethod::Get,
        path: "/market-data/quote/{symbol}",
        params: &[SYMBOL],
        query: &[],
        body: BodyRule::None,
    },
    ToolSpec {
        name: "get_batch_quotes",
        description: "Get real-time quotes for multiple symbols",
        method: HttpMethod::Post,
        path: "/market-data/quotes/batch",
        params: &[Param::required(
            "symbols",
            ParamKind::StringArray,
            "Array of stock symbols",
        )],
        query: &[],
        body: BodyRule::Pick(&["symbols"]),
    },
    ToolSpec {
        name: "get_market_hours",
        description: "Get market hours for an exchange",
        method: HttpMethod::Get,
        path: "/market-data/market-hours/{exchange?}",
        params: &[Param::optional("exchange", Str, "Exchange name (optional)")],
        query: &[],
        body: BodyRule::None,
    },
    ToolSpec {
        name: "is_market_open",
        description: "Check if market is open for a symbol",
        method: HttpMethod::Get,
        path: "/market-data/is-market-open/{symbol}",
        params: &[SYMBOL],
        query: &[],
        body: BodyRule::None,
    },
    // Activity log
    ToolSpec {
        name: "get_portfolio_activities",
        description: "Get activity log for a portfolio",
        method: HttpMethod::Get,
        path: "/activity-log/portfolio/{portfolioId}",
        params: &[
            PORTFOLIO_ID,
            PAGE,
            Param::optional("limit", Number, "Results per page (default: 20)"),
            Param::optional("category", Str, "Filter by category (optional)"),
        ],
        query: &[
            paged("page", 1),
            paged("limit", 20),
            QueryParam {
                name: "category",
                default: None,
            },
        ],
        body: BodyRule::None,
    },
    ToolSpec {
        name: "get_day_trades",
        description: "Get day trade activity for a portfolio",
        method: HttpMethod::Get,
        path: "/accounts/portfolios/{portfolioId}/day-trades",
        params: &[
            PORTFOLIO_ID,
            PAGE,
            Param::optional("limit", Number, "Results per page (default: 50)"),
        ],
        query: &[paged("page", 1), paged("limit", 50)],
        body: BodyRule::None,
    },
    // Margin
    ToolSpec {
        name: "upgrade_to_margin",
        description: "Upgrade portfolio to margin account",
        method: HttpMethod::Put,
        path: "/accounts/portfolios/{portfolioId}/margin-upgrade",
        params: &[
            PORTFOLIO_ID,
            Param::required("marginAgreement", Boolean, "User agrees to margin terms"),
        ],
        query: &[],
        body: BodyRule::Pick(&["marginAgreement"]),
    },
];
