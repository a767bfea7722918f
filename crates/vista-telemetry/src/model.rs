use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 负载缺省类型时的占位值
pub const UNKNOWN_SENSOR_TYPE: &str = "unknown";

/// 设备信息
///
/// 以 `id` 为唯一标识，只增不删。在线/离线是派生状态，不落在记录上。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// 设备 ID（全局唯一）
    pub id: String,

    /// 设备类型（温度、湿度、开关……）
    pub device_type: String,

    /// 最近一次活跃时间
    pub last_seen: DateTime<Utc>,

    /// 设备自报状态（如 "on" / "off"）
    pub status: Option<String>,

    /// 最近一次传感器数值
    pub sensor_value: Option<f64>,

    /// 数值单位
    pub unit: Option<String>,
}

/// 设备的局部更新
///
/// 只携带要覆盖的字段，缺省字段保留旧值。来自入站遥测事件的更新
/// 带事件接收时间作为 `last_seen`；手工编辑不改动 `last_seen`。
#[derive(Debug, Clone, Default)]
pub struct DeviceUpdate {
    pub id: String,
    pub device_type: Option<String>,
    pub status: Option<String>,
    pub sensor_value: Option<f64>,
    pub unit: Option<String>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl DeviceUpdate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// 传感器读数
///
/// 进入窗口后不可变，只会被逐出。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub timestamp: DateTime<Utc>,
    pub device_id: String,
    pub sensor_type: String,
    pub value: f64,
}

impl SensorReading {
    /// 序列键
    ///
    /// 同一设备的多种传感器在所有聚合视图中互相区分。
    pub fn series_key(&self) -> String {
        series_key(&self.device_id, &self.sensor_type)
    }
}

/// 构造序列键：`{device_id}_{sensor_type}`
pub fn series_key(device_id: &str, sensor_type: &str) -> String {
    format!("{}_{}", device_id, sensor_type)
}
