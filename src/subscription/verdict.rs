//! Interpretation of subscription-status response bodies.
//!
//! The status service is not consistent about its response format, so the body
//! is matched against an ordered list of rules and the first match wins.

use serde_json::Value;

/// Body returned by the subscription endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    Json(Value),
    Text(String),
}

impl ResponseShape {
    pub fn parse(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(body.to_string()),
        }
    }
}

/// A single way a response can indicate an active subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveRule {
    /// Body is the JSON literal `true`.
    BareTrue,
    /// `"active": true`
    ActiveFlag,
    /// `"status"` equals `"active"`, ignoring case.
    StatusActive,
    /// `"is_active": true`
    IsActiveFlag,
    /// `"code"` is numerically 200.
    SuccessCode,
    /// `"subscribed": true` or `"is_subscribed": true`
    SubscribedFlag,
    /// Non-JSON body containing `active`, `true` or `1`, ignoring case.
    TextMatch,
}

/// Rules for JSON bodies, in precedence order.
pub const JSON_RULES: [ActiveRule; 6] = [
    ActiveRule::BareTrue,
    ActiveRule::ActiveFlag,
    ActiveRule::StatusActive,
    ActiveRule::IsActiveFlag,
    ActiveRule::SuccessCode,
    ActiveRule::SubscribedFlag,
];

pub const TEXT_RULES: [ActiveRule; 1] = [ActiveRule::TextMatch];

impl ActiveRule {
    pub fn matches(self, shape: &ResponseShape) -> bool {
        match (self, shape) {
            (Self::BareTrue, ResponseShape::Json(value)) => *value == Value::Bool(true),
            (Self::ActiveFlag, ResponseShape::Json(value)) => is_true(value, "active"),
            (Self::StatusActive, ResponseShape::Json(value)) => value
                .get("status")
                .and_then(Value::as_str)
                .is_some_and(|status| status.eq_ignore_ascii_case("active")),
            (Self::IsActiveFlag, ResponseShape::Json(value)) => is_true(value, "is_active"),
            (Self::SuccessCode, ResponseShape::Json(value)) => {
                value.get("code").and_then(numeric).is_some_and(|code| code == 200.0)
            }
            (Self::SubscribedFlag, ResponseShape::Json(value)) => {
                is_true(value, "subscribed") || is_true(value, "is_subscribed")
            }
            (Self::TextMatch, ResponseShape::Text(text)) => {
                let lower = text.to_lowercase();
                // TODO: a bare "1" also matches unrelated ids in error pages; tighten
                // once the status service documents its plain-text format.
                lower.contains("active") || lower.contains("true") || lower.contains('1')
            }
            _ => false,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::BareTrue => "response boolean true",
            Self::ActiveFlag => "json.active === true",
            Self::StatusActive => "json.status === active",
            Self::IsActiveFlag => "json.is_active === true",
            Self::SuccessCode => "json.code === 200",
            Self::SubscribedFlag => "subscribed flag",
            Self::TextMatch => "text match",
        }
    }
}

fn is_true(value: &Value, field: &str) -> bool {
    value.get(field) == Some(&Value::Bool(true))
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Whether a subscriber is active, and which rule decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionVerdict {
    pub active: bool,
    pub matched: Option<ActiveRule>,
}

impl SubscriptionVerdict {
    pub fn inactive() -> Self {
        Self {
            active: false,
            matched: None,
        }
    }

    pub fn from_body(body: &str) -> Self {
        Self::from_shape(&ResponseShape::parse(body))
    }

    pub fn from_shape(shape: &ResponseShape) -> Self {
        let rules: &[ActiveRule] = match shape {
            ResponseShape::Json(_) => &JSON_RULES,
            ResponseShape::Text(_) => &TEXT_RULES,
        };

        match rules.iter().copied().find(|rule| rule.matches(shape)) {
            Some(rule) => Self {
                active: true,
                matched: Some(rule),
            },
            None => Self::inactive(),
        }
    }
}
