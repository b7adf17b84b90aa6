//! Typed view over the JSON carried by a `data:` line.

use serde::Deserialize;
use serde_json::Value;

use crate::types::Usage;

/// `extra_input.block_data` of a workflow block event.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct BlockData {
    #[serde(default)]
    pub block_type: Option<String>,
    #[serde(default)]
    pub block_status: Option<String>,
    #[serde(default)]
    pub out_put: Option<BlockOutput>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct BlockOutput {
    #[serde(default)]
    pub out_content: Option<String>,
}

impl BlockData {
    /// Output text of a finished `output` block, if non-empty.
    pub fn finished_output(&self) -> Option<&str> {
        if self.block_type.as_deref() != Some("output")
            || self.block_status.as_deref() != Some("finished")
        {
            return None;
        }
        self.out_put
            .as_ref()
            .and_then(|o| o.out_content.as_deref())
            .filter(|c| !c.is_empty())
    }
}

/// The three payload shapes the agent emits, plus everything else.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamPayload {
    /// `{"extra_input": {"block_data": {...}}}`
    Block(BlockData),
    /// `{"msg": "..."}` with a non-empty message.
    Message(String),
    /// `{"usage": {...}}` without a message.
    Usage(Usage),
    Other,
}

impl StreamPayload {
    /// Shape precedence: a block event wins over `msg`, and `usage` only
    /// counts when `msg` is absent or empty.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::Other;
        };

        if let Some(extra) = obj.get("extra_input") {
            let block = extra
                .get("block_data")
                .cloned()
                .and_then(|b| serde_json::from_value::<BlockData>(b).ok())
                .unwrap_or_default();
            return Self::Block(block);
        }

        let msg = obj.get("msg").and_then(Value::as_str).unwrap_or_default();
        if !msg.is_empty() {
            return Self::Message(msg.to_string());
        }

        match obj.get("usage") {
            Some(usage) => serde_json::from_value::<Usage>(usage.clone())
                .map(Self::Usage)
                .unwrap_or(Self::Other),
            None => Self::Other,
        }
    }
}
