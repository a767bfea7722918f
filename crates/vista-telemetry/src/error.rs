use thiserror::Error;

/// 入站负载解码错误
///
/// 解码失败只丢弃当前消息，绝不能让注册表或窗口进入半更新状态。
#[derive(Error, Debug)]
pub enum DecodeError {
    /// 主题不在遥测约定内
    #[error("Topic not in telemetry convention: {0}")]
    UnknownTopic(String),

    /// 非法 JSON 或字段类型不符
    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    /// 缺少必需字段
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
