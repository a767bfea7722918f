//! 主题工具
//!
//! 入站遥测主题约定：`devices/{device_id}/data`、`devices/{device_id}/status`。

/// 主题过滤器匹配
///
/// MQTT 通配符规则：
/// - `+` 匹配单个层级
/// - `#` 匹配剩余所有层级（只能在末尾）
///
/// 示例：`devices/+/data` 匹配 `devices/dev1/data`，
/// 但不匹配 `devices/dev1/room1/data`。
pub fn matches(filter: &str, topic: &str) -> bool {
    // 快速路径：无通配符
    if !filter.contains('+') && !filter.contains('#') {
        return filter == topic;
    }

    let filter_parts: Vec<&str> = filter.split('/').collect();
    let topic_parts: Vec<&str> = topic.split('/').collect();

    matches_parts(&filter_parts, &topic_parts)
}

fn matches_parts(filter: &[&str], topic: &[&str]) -> bool {
    match (filter.first(), topic.first()) {
        // 两者都耗尽，匹配成功
        (None, None) => true,

        // # 匹配所有剩余层级
        (Some(&"#"), _) => true,

        // + 匹配单个层级
        (Some(&"+"), Some(_)) => matches_parts(&filter[1..], &topic[1..]),

        // 精确匹配当前层级
        (Some(f), Some(t)) if f == t => matches_parts(&filter[1..], &topic[1..]),

        _ => false,
    }
}

/// 从 `devices/{device_id}/...` 主题中提取设备 ID
pub fn device_id(topic: &str) -> Option<&str> {
    let mut parts = topic.split('/');
    match (parts.next(), parts.next()) {
        (Some("devices"), Some(id)) if !id.is_empty() => Some(id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(matches("devices/dev1/data", "devices/dev1/data"));
        assert!(!matches("devices/dev1/data", "devices/dev1/status"));
    }

    #[test]
    fn test_single_level_wildcard() {
        assert!(matches("devices/+/data", "devices/dev1/data"));
        assert!(matches("devices/+/data", "devices/dev2/data"));
        // + 只匹配一个层级
        assert!(!matches("devices/+/data", "devices/dev1/room1/data"));
        assert!(!matches("devices/+/data", "devices/data"));

        assert!(matches("+/+/status", "devices/dev1/status"));
    }

    #[test]
    fn test_multi_level_wildcard() {
        assert!(matches("devices/#", "devices/dev1/data"));
        assert!(matches("devices/#", "devices/dev1/a/b"));
        assert!(!matches("devices/#", "gateways/dev1/data"));
        assert!(matches("#", "anything/goes/here"));
    }

    #[test]
    fn test_device_id_extraction() {
        assert_eq!(device_id("devices/dev1/data"), Some("dev1"));
        assert_eq!(device_id("devices/sensor-42/status"), Some("sensor-42"));
        assert_eq!(device_id("gateways/dev1/data"), None);
        assert_eq!(device_id("devices"), None);
    }
}
