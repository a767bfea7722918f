use chrono::{DateTime, Utc};

/// 在线判定阈值（毫秒）
///
/// 最近一次活跃距今不足 5 分钟视为在线。
pub const ONLINE_THRESHOLD_MS: i64 = 300_000;

/// 在线判定
///
/// 纯函数：`now - last_seen < ONLINE_THRESHOLD_MS`。
/// 恰好等于阈值视为离线。
pub fn is_online(last_seen: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    (now - last_seen).num_milliseconds() < ONLINE_THRESHOLD_MS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_recent_device_is_online() {
        let now = Utc::now();
        assert!(is_online(now, now));
        assert!(is_online(now - Duration::milliseconds(299_999), now));
    }

    #[test]
    fn test_threshold_boundary_is_offline() {
        let now = Utc::now();
        // 恰好 300000 毫秒：离线
        assert!(!is_online(now - Duration::milliseconds(ONLINE_THRESHOLD_MS), now));
        assert!(!is_online(now - Duration::milliseconds(ONLINE_THRESHOLD_MS + 1), now));
    }
}
