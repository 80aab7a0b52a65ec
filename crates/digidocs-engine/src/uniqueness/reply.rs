use serde::Deserialize;
use serde_json::Value;

use super::StatusReply;
use crate::error::UniquenessError;

/// Submission and status endpoint of the uniqueness service.
pub const ENDPOINT: &str = "https://api.text.ru/post";
/// Account endpoint answering balance queries.
pub const ACCOUNT_ENDPOINT: &str = "https://api.text.ru/account";
/// Public report page; the text uid is appended.
pub const REPORT_BASE: &str = "https://text.ru/antiplagiat/";
/// Error code meaning the check has not finished yet.
pub const STILL_PROCESSING: i64 = 181;

const MISSING_UID: &str = "UID не получен";

/// Form fields submitting `text` for a check.
pub fn submit_form(text: &str, key: &str) -> Vec<(&'static str, String)> {
    vec![
        ("text", text.to_string()),
        ("userkey", key.to_string()),
        ("visible", "vis_on".to_string()),
        ("json", "1".to_string()),
    ]
}

/// Form fields querying the status of a submitted text.
pub fn status_form(uid: &str, key: &str) -> Vec<(&'static str, String)> {
    vec![
        ("userkey", key.to_string()),
        ("uid", uid.to_string()),
        ("json", "1".to_string()),
    ]
}

/// Form fields asking for the remaining character balance of `key`.
pub fn account_form(key: &str) -> Vec<(&'static str, String)> {
    vec![
        ("userkey", key.to_string()),
        ("method", "get_packages_info".to_string()),
        ("json", "1".to_string()),
    ]
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServiceReply {
    text_uid: Option<String>,
    error_code: Option<Value>,
    error_desc: Option<String>,
    text_unique: Option<Value>,
    size: Option<Value>,
}

impl ServiceReply {
    fn parse(status: u16, body: &str) -> Result<Self, UniquenessError> {
        if !(200..300).contains(&status) {
            return Err(UniquenessError::Status {
                status,
                body: body.to_string(),
            });
        }
        serde_json::from_str(body).map_err(|_| UniquenessError::Malformed {
            body: body.to_string(),
        })
    }

    /// The error code, if it is present and non-zero.
    fn code(&self) -> Option<i64> {
        let code = match self.error_code.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        code.filter(|c| *c != 0)
    }
}

/// Extracts the text uid from a submission reply.
pub fn parse_submit_reply(status: u16, body: &str) -> Result<String, UniquenessError> {
    let reply = ServiceReply::parse(status, body)?;
    let code = reply.code();
    match reply.text_uid {
        Some(uid) if code.is_none() && !uid.is_empty() => Ok(uid),
        _ => Err(UniquenessError::Rejected {
            code,
            description: reply
                .error_desc
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| MISSING_UID.to_string()),
        }),
    }
}

/// Interprets a status reply.
pub fn parse_status_reply(status: u16, body: &str) -> Result<StatusReply, UniquenessError> {
    let reply = ServiceReply::parse(status, body)?;

    Ok(match reply.code() {
        Some(STILL_PROCESSING) => StatusReply::Processing,
        Some(code) => StatusReply::Rejected {
            code,
            description: reply.error_desc.unwrap_or_default(),
        },
        None => match reply.text_unique {
            None | Some(Value::Null) => StatusReply::Inconclusive,
            Some(Value::String(unique)) => StatusReply::Checked { unique },
            Some(other) => StatusReply::Checked {
                unique: other.to_string(),
            },
        },
    })
}

/// Extracts the remaining character balance from an account reply.
///
/// A missing or unreadable `size` counts as zero.
pub fn parse_balance_reply(status: u16, body: &str) -> Result<u64, UniquenessError> {
    let reply = ServiceReply::parse(status, body)?;
    if let Some(code) = reply.code() {
        return Err(UniquenessError::Rejected {
            code: Some(code),
            description: reply.error_desc.unwrap_or_default(),
        });
    }

    let size = match reply.size {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f.trunc() as u64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(size.unwrap_or(0))
}

/// Groups digits in threes with no-break spaces, as Russian number formatting does.
pub fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() * 2);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('\u{a0}');
        }
        out.push(c);
    }
    out
}

/// The line shown to the user for a balance.
pub fn balance_line(size: u64) -> String {
    format!("💰 Остаток символов: {}", group_digits(size))
}
