//! 诊所前端层服务器主程序

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use clinic_core::Result;
use clinic_integration::{AuthenticationConfig, BackendConfig, BackendConnector};
use clinic_web::{AppState, ClinicSettings, WebServer};

/// 服务器命令行参数
#[derive(Parser, Debug)]
#[command(name = "clinic-server")]
#[command(about = "患者登记与预约挂号系统 (Patient Intake & Appointment Booking) Web服务器")]
struct Args {
    /// 监听端口
    #[arg(short, long)]
    port: Option<u16>,

    /// 后端服务端点
    #[arg(short, long)]
    backend: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(&args.log_level)
        .init();

    info!("启动诊所Web服务器...");

    // 加载配置；命令行参数优先
    let mut settings = ClinicSettings::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if let Some(endpoint) = args.backend {
        settings.backend.endpoint = endpoint;
    }

    // 创建后端连接器
    let authentication = match &settings.backend.api_key {
        Some(key) => AuthenticationConfig::ApiKey {
            key: key.clone(),
            header: None,
        },
        None => AuthenticationConfig::None,
    };
    let connector = Arc::new(BackendConnector::new(BackendConfig {
        endpoint: settings.backend.endpoint.clone(),
        authentication,
    }));

    if !connector.check_connection().await {
        warn!("后端健康检查未通过，服务仍将启动");
    }

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("服务器配置:");
    info!("  监听地址: {}", addr);
    info!("  后端端点: {}", settings.backend.endpoint);
    info!("  医师名录: {} 位医师", settings.directory.doctors.len());

    let state = AppState {
        patients: connector.clone(),
        appointments: connector,
        directory: settings.directory.clone(),
    };

    // 启动服务器
    let server = WebServer::new(state);
    if let Err(e) = server.run(&addr).await {
        error!("服务器启动失败: {}", e);
        return Err(clinic_core::ClinicError::Internal(e.to_string()));
    }

    Ok(())
}
