//! 错误定义模块

use thiserror::Error;

/// 系统统一错误类型
#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("表单校验错误: {0}")]
    Validation(String),

    #[error("后端服务错误: {0}")]
    Backend(String),

    #[error("网络错误: {0}")]
    Network(String),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("系统内部错误: {0}")]
    Internal(String),
}

/// 系统统一结果类型
pub type Result<T> = std::result::Result<T, ClinicError>;
