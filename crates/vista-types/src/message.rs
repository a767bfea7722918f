use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 入站消息信封
///
/// 传输层只负责搬运字节，负载解析（以及解析失败的处理）属于管道层。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub id: Uuid,
    pub topic: String,
    pub payload: Bytes,
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic: topic.into(),
            payload: payload.into(),
            received_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message() {
        let msg = InboundMessage::new("devices/dev1/data", &b"{\"sensorValue\":1.0}"[..]);
        assert_eq!(msg.topic, "devices/dev1/data");
        assert!(!msg.payload.is_empty());
    }
}
