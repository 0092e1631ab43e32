//! 配置管理
//!
//! 分层加载：配置文件（可选）+ CLINIC_ 前缀环境变量，
//! 所有段落均有可用默认值。只读加载，不支持保存与热更新。

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use clinic_core::{ClinicDirectory, ClinicError, Result};

/// 系统完整配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicSettings {
    /// Web服务配置
    pub server: ServerSettings,
    /// 后端服务配置
    pub backend: BackendSettings,
    /// 日志配置
    pub logging: LoggingSettings,
    /// 静态名录
    pub directory: ClinicDirectory,
}

/// Web服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// 监听主机
    pub host: String,
    /// 监听端口
    pub port: u16,
}

/// 后端服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// 服务端点
    pub endpoint: String,
    /// API密钥（可选）
    pub api_key: Option<String>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 日志级别
    pub level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9000/api/v1".to_string(),
            api_key: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ClinicSettings {
    /// 从文件与环境变量加载配置
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path));
        }
        let settings = builder
            .add_source(Environment::with_prefix("CLINIC").separator("_"))
            .build()
            .map_err(|e| ClinicError::Config(e.to_string()))?;

        let settings: ClinicSettings = settings
            .try_deserialize()
            .map_err(|e| ClinicError::Config(e.to_string()))?;

        settings.validate()?;
        info!("Configuration loaded successfully");
        Ok(settings)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ClinicError::Config("Server port cannot be 0".to_string()));
        }
        if self.backend.endpoint.trim().is_empty() {
            return Err(ClinicError::Config(
                "Backend endpoint cannot be empty".to_string(),
            ));
        }
        if self.directory.doctors.is_empty() {
            return Err(ClinicError::Config(
                "Physician roster cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
