use chrono::Utc;
use tracing::debug;

use crate::model::{Device, DeviceUpdate, UNKNOWN_SENSOR_TYPE};

/// 设备注册表
///
/// 每个设备 ID 至多一条记录。列表顺序为首次出现顺序，更新不改变
/// 位置。设备从不删除：停止上报的设备一直可见，由在线判定自然降级。
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 合并式更新
    ///
    /// 已存在则按字段覆盖（缺省字段保留旧值），否则新建记录。
    pub fn upsert(&mut self, update: DeviceUpdate) -> &Device {
        match self.devices.iter().position(|d| d.id == update.id) {
            Some(index) => {
                let device = &mut self.devices[index];
                if let Some(device_type) = update.device_type {
                    device.device_type = device_type;
                }
                if let Some(status) = update.status {
                    device.status = Some(status);
                }
                if let Some(value) = update.sensor_value {
                    device.sensor_value = Some(value);
                }
                if let Some(unit) = update.unit {
                    device.unit = Some(unit);
                }
                if let Some(last_seen) = update.last_seen {
                    device.last_seen = last_seen;
                }

                debug!(device_id = %device.id, "Device updated");
                &self.devices[index]
            }
            None => {
                let device = Device {
                    id: update.id,
                    device_type: update
                        .device_type
                        .unwrap_or_else(|| UNKNOWN_SENSOR_TYPE.to_string()),
                    last_seen: update.last_seen.unwrap_or_else(Utc::now),
                    status: update.status,
                    sensor_value: update.sensor_value,
                    unit: update.unit,
                };

                debug!(device_id = %device.id, "Device registered");
                self.devices.push(device);
                let index = self.devices.len() - 1;
                &self.devices[index]
            }
        }
    }

    /// 查询设备
    pub fn get(&self, device_id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == device_id)
    }

    /// 首次出现顺序的设备列表
    pub fn list(&self) -> &[Device] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_creates_then_merges() {
        let mut registry = DeviceRegistry::new();

        registry.upsert(DeviceUpdate {
            id: "dev1".to_string(),
            device_type: Some("temperature".to_string()),
            sensor_value: Some(21.5),
            ..Default::default()
        });

        registry.upsert(DeviceUpdate {
            id: "dev1".to_string(),
            status: Some("on".to_string()),
            ..Default::default()
        });

        // 两次 upsert 合并成一条记录，两个字段都在
        assert_eq!(registry.len(), 1);
        let device = registry.get("dev1").unwrap();
        assert_eq!(device.device_type, "temperature");
        assert_eq!(device.sensor_value, Some(21.5));
        assert_eq!(device.status.as_deref(), Some("on"));
    }

    #[test]
    fn test_one_entry_per_id() {
        let mut registry = DeviceRegistry::new();

        for i in 0..10 {
            registry.upsert(DeviceUpdate {
                id: format!("dev{}", i % 3),
                sensor_value: Some(i as f64),
                ..Default::default()
            });
        }

        assert_eq!(registry.len(), 3);
        // 最后一次合并的字段生效
        assert_eq!(registry.get("dev0").unwrap().sensor_value, Some(9.0));
    }

    #[test]
    fn test_list_keeps_first_seen_order() {
        let mut registry = DeviceRegistry::new();

        registry.upsert(DeviceUpdate::new("b"));
        registry.upsert(DeviceUpdate::new("a"));
        registry.upsert(DeviceUpdate::new("c"));
        // 重复出现的设备不挪动位置
        registry.upsert(DeviceUpdate::new("a"));

        let ids: Vec<&str> = registry.list().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_missing_type_defaults_to_unknown() {
        let mut registry = DeviceRegistry::new();
        registry.upsert(DeviceUpdate::new("dev1"));
        assert_eq!(registry.get("dev1").unwrap().device_type, "unknown");
    }

    #[test]
    fn test_absent_fields_keep_previous_values() {
        let mut registry = DeviceRegistry::new();
        let seen = Utc::now();

        registry.upsert(DeviceUpdate {
            id: "dev1".to_string(),
            device_type: Some("switch".to_string()),
            last_seen: Some(seen),
            ..Default::default()
        });

        // 不带 last_seen 的更新（手工编辑）不改动活跃时间
        registry.upsert(DeviceUpdate {
            id: "dev1".to_string(),
            status: Some("off".to_string()),
            ..Default::default()
        });

        let device = registry.get("dev1").unwrap();
        assert_eq!(device.last_seen, seen);
        assert_eq!(device.device_type, "switch");
    }
}
