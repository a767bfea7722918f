use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use vista_types::{InboundMessage, SessionEvent};

use crate::aggregate::{self, LatestValue, SeriesStats, TimeBucket};
use crate::decode::{self, DecodedEvent};
use crate::error::DecodeError;
use crate::model::{DeviceUpdate, SensorReading, UNKNOWN_SENSOR_TYPE};
use crate::registry::DeviceRegistry;
use crate::window::SensorWindow;

/// 遥测管道
///
/// 唯一消费者逐条处理会话事件，注册表与窗口的更新因此天然串行化，
/// 无需加锁。事件按投递顺序处理，不按负载时间戳重排：乱序投递导致
/// 的 `last_seen` 回退是接受的行为。
///
/// 每条消息的注册表 + 窗口更新是一个原子单元：解码与校验全部通过
/// 之后才触碰状态，失败时两者保持不变。
pub struct TelemetryPipeline {
    registry: DeviceRegistry,
    window: SensorWindow,
    connected: bool,
}

impl Default for TelemetryPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryPipeline {
    pub fn new() -> Self {
        Self {
            registry: DeviceRegistry::new(),
            window: SensorWindow::new(),
            connected: false,
        }
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn window(&self) -> &SensorWindow {
        &self.window
    }

    /// 传输层当前是否连接（由事件流驱动）
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// 消费事件流直到通道关闭
    pub async fn run(&mut self, mut events: mpsc::Receiver<SessionEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }

        info!("Event stream closed, pipeline stopped");
    }

    /// 处理单个会话事件
    ///
    /// 解码失败只丢弃当前消息，错误不越过消息处理边界。
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connected => {
                self.connected = true;
                info!("Transport connected");
            }
            SessionEvent::Disconnected => {
                self.connected = false;
                warn!("Transport disconnected");
            }
            SessionEvent::Error(error) => {
                warn!(error = %error, "Transport error");
            }
            SessionEvent::Message(message) => {
                if let Err(e) = self.handle_message(&message) {
                    match e {
                        DecodeError::UnknownTopic(_) => {
                            debug!(topic = %message.topic, "Ignoring message outside telemetry convention");
                        }
                        e => {
                            warn!(topic = %message.topic, error = %e, "Dropping malformed payload");
                        }
                    }
                }
            }
        }
    }

    /// 处理一条入站消息
    pub fn handle_message(&mut self, message: &InboundMessage) -> Result<(), DecodeError> {
        let decoded = decode::decode(&message.topic, &message.payload)?;

        match decoded {
            DecodedEvent::Data(data) => {
                self.registry.upsert(DeviceUpdate {
                    id: data.device_id.clone(),
                    device_type: data.sensor_type.clone(),
                    status: data.status,
                    sensor_value: data.sensor_value,
                    unit: data.unit,
                    last_seen: Some(message.received_at),
                });

                // 只有携带数值的读数才进入可视化窗口
                if let Some(value) = data.sensor_value {
                    self.window.append(SensorReading {
                        timestamp: message.received_at,
                        device_id: data.device_id,
                        sensor_type: data
                            .sensor_type
                            .unwrap_or_else(|| UNKNOWN_SENSOR_TYPE.to_string()),
                        value,
                    });
                }
            }
            DecodedEvent::Status(update) => {
                self.registry.upsert(DeviceUpdate {
                    id: update.device_id,
                    status: Some(update.status),
                    last_seen: Some(message.received_at),
                    ..Default::default()
                });
            }
        }

        Ok(())
    }

    /// 最新值快照（读取时重算，不缓存）
    pub fn latest_values(&self) -> Vec<LatestValue> {
        aggregate::latest_values(&self.window)
    }

    /// 时间桶表
    pub fn time_buckets(&self) -> Vec<TimeBucket> {
        aggregate::time_buckets(&self.window)
    }

    /// 序列统计
    pub fn series_statistics(&self) -> Vec<SeriesStats> {
        aggregate::series_statistics(&self.window)
    }
}
