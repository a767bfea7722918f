use serde::Deserialize;

use vista_types::topic;

use crate::error::DecodeError;

/// 数据主题过滤器
pub const DATA_TOPIC_FILTER: &str = "devices/+/data";

/// 状态主题过滤器
pub const STATUS_TOPIC_FILTER: &str = "devices/+/status";

/// `devices/{id}/data` 负载的线上形态（camelCase）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataPayload {
    id: Option<String>,
    #[serde(rename = "type")]
    sensor_type: Option<String>,
    sensor_value: Option<f64>,
    unit: Option<String>,
    status: Option<String>,
}

/// `devices/{id}/status` 负载的线上形态
#[derive(Debug, Deserialize)]
struct StatusPayload {
    id: Option<String>,
    status: String,
}

/// 解码后的入站事件
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedEvent {
    /// 遥测数据（可能同时携带状态）
    Data(TelemetryData),
    /// 仅状态更新
    Status(StatusUpdate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryData {
    pub device_id: String,
    pub sensor_type: Option<String>,
    pub sensor_value: Option<f64>,
    pub unit: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub device_id: String,
    pub status: String,
}

/// 解码入站消息
///
/// 负载形态不可信，按标签化方式显式校验字段，全部校验先于任何
/// 状态变更。负载里的 `id` 优先，缺省回落到主题段。
pub fn decode(topic_name: &str, payload: &[u8]) -> Result<DecodedEvent, DecodeError> {
    if topic::matches(DATA_TOPIC_FILTER, topic_name) {
        let topic_device =
            topic::device_id(topic_name).ok_or(DecodeError::MissingField("device id"))?;
        let parsed: DataPayload = serde_json::from_slice(payload)?;

        Ok(DecodedEvent::Data(TelemetryData {
            device_id: parsed.id.unwrap_or_else(|| topic_device.to_string()),
            sensor_type: parsed.sensor_type,
            sensor_value: parsed.sensor_value,
            unit: parsed.unit,
            status: parsed.status,
        }))
    } else if topic::matches(STATUS_TOPIC_FILTER, topic_name) {
        let topic_device =
            topic::device_id(topic_name).ok_or(DecodeError::MissingField("device id"))?;
        let parsed: StatusPayload = serde_json::from_slice(payload)?;

        Ok(DecodedEvent::Status(StatusUpdate {
            device_id: parsed.id.unwrap_or_else(|| topic_device.to_string()),
            status: parsed.status,
        }))
    } else {
        Err(DecodeError::UnknownTopic(topic_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_data_payload() {
        let payload = br#"{"id":"dev1","type":"temperature","sensorValue":21.5,"unit":"C"}"#;
        let event = decode("devices/dev1/data", payload).unwrap();

        match event {
            DecodedEvent::Data(data) => {
                assert_eq!(data.device_id, "dev1");
                assert_eq!(data.sensor_type.as_deref(), Some("temperature"));
                assert_eq!(data.sensor_value, Some(21.5));
                assert_eq!(data.unit.as_deref(), Some("C"));
            }
            other => panic!("Expected data event, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_falls_back_to_topic_device_id() {
        let payload = br#"{"type":"humidity","sensorValue":60.0}"#;
        let event = decode("devices/sensor-7/data", payload).unwrap();

        match event {
            DecodedEvent::Data(data) => assert_eq!(data.device_id, "sensor-7"),
            other => panic!("Expected data event, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_status_payload() {
        let payload = br#"{"status":"off"}"#;
        let event = decode("devices/dev2/status", payload).unwrap();

        assert_eq!(
            event,
            DecodedEvent::Status(StatusUpdate {
                device_id: "dev2".to_string(),
                status: "off".to_string(),
            })
        );
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        let result = decode("devices/dev1/data", b"not json");
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_wrong_field_type() {
        // sensorValue 必须是数值
        let result = decode("devices/dev1/data", br#"{"sensorValue":"hot"}"#);
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_unknown_topic() {
        let result = decode("gateways/gw1/data", b"{}");
        assert!(matches!(result, Err(DecodeError::UnknownTopic(_))));
    }

    #[test]
    fn test_decode_status_requires_status_field() {
        let result = decode("devices/dev1/status", b"{}");
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }
}
