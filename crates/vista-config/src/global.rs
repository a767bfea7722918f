use serde::{Deserialize, Serialize};

/// 全局配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VistaConfig {
    pub broker: BrokerConfig,
    pub subscriptions: SubscriptionConfig,
    pub flow_editor: FlowEditorConfig,
}

/// MQTT Broker 连接配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// 心跳间隔（秒）
    pub keep_alive_secs: u64,
    /// 首次连接超时（秒）
    pub connect_timeout_secs: u64,
    /// 断线重连间隔（秒）
    pub reconnect_secs: u64,
}

/// 默认订阅的主题过滤器
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SubscriptionConfig {
    pub topics: Vec<String>,
}

/// 流程编辑器（外部协作方，仅按 URL 引用）
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FlowEditorConfig {
    pub url: String,
}

impl Default for VistaConfig {
    fn default() -> Self {
        Self {
            broker: BrokerConfig::default(),
            subscriptions: SubscriptionConfig::default(),
            flow_editor: FlowEditorConfig::default(),
        }
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1883,
            client_id: format!("vista-dashboard-{}", uuid::Uuid::new_v4().simple()),
            username: None,
            password: None,
            keep_alive_secs: 30,
            connect_timeout_secs: 4,
            reconnect_secs: 1,
        }
    }
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            topics: vec![
                "devices/+/data".to_string(),
                "devices/+/status".to_string(),
            ],
        }
    }
}

impl Default for FlowEditorConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:1880".to_string(),
        }
    }
}
