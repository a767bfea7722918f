use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 设备指令
///
/// 线上形态为 camelCase JSON（`deviceId` / `command` / `value` /
/// `timestamp`），与设备侧约定一致。按需构造，不持久化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandMessage {
    pub device_id: String,

    pub command: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<CommandValue>,

    pub timestamp: DateTime<Utc>,
}

impl CommandMessage {
    /// 构造指令，时间戳取当前时刻
    pub fn new(
        device_id: impl Into<String>,
        command: impl Into<String>,
        value: Option<CommandValue>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            command: command.into(),
            value,
            timestamp: Utc::now(),
        }
    }
}

/// 指令参数：字符串或数值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandValue {
    Number(f64),
    Text(String),
}

impl From<f64> for CommandValue {
    fn from(value: f64) -> Self {
        CommandValue::Number(value)
    }
}

impl From<&str> for CommandValue {
    fn from(value: &str) -> Self {
        CommandValue::Text(value.to_string())
    }
}

impl From<String> for CommandValue {
    fn from(value: String) -> Self {
        CommandValue::Text(value)
    }
}

/// 自由文本入口使用的指令类别
///
/// 文本解析为 JSON 成功走 `custom`，失败回落到 `message` 携带原始
/// 文本。两者在设备侧的处理不同，回落必须显式可见。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCommandKind {
    Custom,
    Message,
}

impl TextCommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextCommandKind::Custom => "custom",
            TextCommandKind::Message => "message",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serializes_to_camel_case() {
        let command = CommandMessage::new("dev1", "toggle", None);
        let json = serde_json::to_value(&command).unwrap();

        assert_eq!(json["deviceId"], "dev1");
        assert_eq!(json["command"], "toggle");
        assert!(json.get("value").is_none());
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn test_command_value_is_untagged() {
        let command = CommandMessage::new("dev1", "setValue", Some(CommandValue::Number(25.0)));
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["value"], 25.0);

        let command = CommandMessage::new("dev1", "message", Some("hello".into()));
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["value"], "hello");
    }
}
