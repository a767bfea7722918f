use thiserror::Error;

/// 传输层错误类型
#[derive(Error, Debug)]
pub enum TransportError {
    /// 连接失败（不可达 / 被拒绝 / 超时）
    #[error("Connect failed: {0}")]
    Connect(String),

    /// 订阅失败
    #[error("Subscribe failed: {0}")]
    Subscribe(String),

    /// 发布失败
    #[error("Publish failed: {0}")]
    Publish(String),

    /// 未连接时的快速失败，不排队等待
    #[error("Not connected to broker")]
    NotConnected,
}

/// 传输层结果类型
pub type Result<T> = std::result::Result<T, TransportError>;
