// SPDX-License-Identifier: GPL-3.0-only

pub mod booking;
pub mod customer;
pub mod room;
pub mod timestamp;
pub mod transaction;

use serde::{Deserialize, Deserializer};

/// Accepts both `"3"` and `3` for text fields the backend is not consistent about
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}
