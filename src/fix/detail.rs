//! Human-readable explanations for fixes
//!
//! Rendering is a pure function of the fix mode and its payload. Missing or
//! odd payload fields never fail; they render as a placeholder, and any mode
//! we can't place falls through to the cast branch keyed by defect kind and
//! then operand count.

use super::FixMode;
use serde::{Deserialize, Serialize};

const PLACEHOLDER: &str = "?";

/// Mode-specific fields that accompany a fix's geometry.
///
/// Field names follow the backend's underscore-prefixed keys. Everything is
/// optional so a partial payload still renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixPayload {
    #[serde(rename = "_defect", default, skip_serializing_if = "Option::is_none")]
    pub defect: Option<String>,
    #[serde(rename = "_ary", default, skip_serializing_if = "Option::is_none")]
    pub arity: Option<u8>,
    #[serde(rename = "_op", default, skip_serializing_if = "Option::is_none")]
    pub operand: Option<String>,
    #[serde(rename = "_op1", default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(rename = "_op2", default, skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    #[serde(rename = "_optr", default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(rename = "_sign", default, skip_serializing_if = "Option::is_none")]
    pub signed: Option<u8>,
    #[serde(rename = "_origin", default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(rename = "_target", default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(rename = "_var", default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
}

/// The explanation variant chosen for a fix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixDetail {
    Specifier {
        variable: String,
        origin: Option<String>,
        target: String,
    },
    ArithCheck {
        operator: String,
        left: String,
        right: String,
        signed: Option<bool>,
    },
    ConversionCheck {
        expression: String,
        origin: String,
        target: String,
    },
    ConversionCast {
        expression: String,
        origin: String,
        target: String,
    },
    BinaryOverflowCast {
        operator: String,
        left: String,
        right: String,
        signed: Option<bool>,
    },
    UnaryOverflowCast {
        operator: String,
        operand: String,
        signed: Option<bool>,
    },
}

fn field(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string()
}

fn signedness(flag: Option<u8>) -> Option<bool> {
    match flag {
        Some(0) => Some(false),
        Some(1) => Some(true),
        _ => None,
    }
}

impl FixDetail {
    pub fn classify(mode: &FixMode, payload: &FixPayload) -> Self {
        match mode {
            FixMode::Specifier => FixDetail::Specifier {
                variable: field(&payload.variable.clone().or_else(|| payload.operand.clone())),
                origin: payload.origin.clone().filter(|s| !s.trim().is_empty()),
                target: field(&payload.target),
            },
            FixMode::CheckArith => FixDetail::ArithCheck {
                operator: field(&payload.operator),
                left: field(&payload.left),
                right: field(&payload.right),
                signed: signedness(payload.signed),
            },
            FixMode::CheckConv => FixDetail::ConversionCheck {
                expression: field(&payload.operand),
                origin: field(&payload.origin),
                target: field(&payload.target),
            },
            FixMode::Cast | FixMode::Unknown(_) => Self::classify_cast(payload),
        }
    }

    fn classify_cast(payload: &FixPayload) -> Self {
        let defect = payload
            .defect
            .as_deref()
            .map(|d| d.trim().to_ascii_lowercase());
        if defect.as_deref() == Some("conversion") {
            return FixDetail::ConversionCast {
                expression: field(&payload.operand),
                origin: field(&payload.origin),
                target: field(&payload.target),
            };
        }
        match payload.arity {
            Some(2) => FixDetail::BinaryOverflowCast {
                operator: field(&payload.operator),
                left: field(&payload.left),
                right: field(&payload.right),
                signed: signedness(payload.signed),
            },
            _ => FixDetail::UnaryOverflowCast {
                operator: field(&payload.operator),
                operand: field(&payload.operand.clone().or_else(|| payload.left.clone())),
                signed: signedness(payload.signed),
            },
        }
    }

    pub fn render(&self) -> String {
        match self {
            FixDetail::Specifier {
                variable,
                origin,
                target,
            } => match origin {
                Some(origin) => format!(
                    "Change the declared type of {} from {} to {} so every value assigned to it fits.",
                    code(variable),
                    code(origin),
                    code(target)
                ),
                None => format!(
                    "Change the declared type of {} to {} so every value assigned to it fits.",
                    code(variable),
                    code(target)
                ),
            },
            FixDetail::ArithCheck {
                operator,
                left,
                right,
                signed,
            } => format!(
                "Insert a sanity check before {} {} {} that stops on {} overflow.",
                code(left),
                code(operator),
                code(right),
                signed_word(*signed)
            ),
            FixDetail::ConversionCheck {
                expression,
                origin,
                target,
            } => format!(
                "Insert a range check before {} is converted from {} to {}, so values outside the target range are caught.",
                code(expression),
                code(origin),
                code(target)
            ),
            FixDetail::ConversionCast {
                expression,
                origin,
                target,
            } => format!(
                "Insert an explicit cast converting {} from {} to {}.",
                code(expression),
                code(origin),
                code(target)
            ),
            FixDetail::BinaryOverflowCast {
                operator,
                left,
                right,
                signed,
            } => format!(
                "Insert an explicit cast on the operands of {} {} {} so the {} arithmetic is done in a wider type and cannot overflow.",
                code(left),
                code(operator),
                code(right),
                signed_word(*signed)
            ),
            FixDetail::UnaryOverflowCast {
                operator,
                operand,
                signed,
            } => format!(
                "Insert an explicit cast on the operand of {}{} so the {} operation is done in a wider type and cannot overflow.",
                code(operator),
                code(operand),
                signed_word(*signed)
            ),
        }
    }
}

fn signed_word(signed: Option<bool>) -> &'static str {
    match signed {
        Some(true) => "signed",
        Some(false) => "unsigned",
        None => "integer",
    }
}

/// Wrap an identifier, type, or operator as inline code
pub fn code(token: &str) -> String {
    format!("`{}`", token)
}

/// Explanation text for a fix
pub fn render_detail(mode: &FixMode, payload: &FixPayload) -> String {
    FixDetail::classify(mode, payload).render()
}
