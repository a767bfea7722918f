use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use vista_transport::MqttSession;

use crate::channel::CommandChannel;
use crate::model::CommandMessage;

/// 指令主题模板
///
/// 每设备一个指令主题，与入站的 data / status 主题分开。
const COMMAND_TOPIC_TEMPLATE: &str = "devices/{device_id}/commands";

/// 构建指令主题
pub fn command_topic(device_id: &str) -> String {
    COMMAND_TOPIC_TEMPLATE.replace("{device_id}", device_id)
}

/// MQTT 指令通道
pub struct MqttCommandChannel {
    session: Arc<MqttSession>,
}

impl MqttCommandChannel {
    pub fn new(session: Arc<MqttSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CommandChannel for MqttCommandChannel {
    async fn send_command(&self, command: &CommandMessage) -> anyhow::Result<()> {
        let topic = command_topic(&command.device_id);
        let payload = serde_json::to_vec(command)?;

        self.session.publish(&topic, payload).await?;

        info!(
            device_id = %command.device_id,
            command = %command.command,
            topic = %topic,
            "Command sent via MQTT"
        );

        Ok(())
    }
}
