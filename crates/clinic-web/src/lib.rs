//! # Clinic Web
//!
//! 页面层：页面处理器先从后端取回既有记录（用户或患者），
//! 再渲染对应表单；提交处理器运行表单并返回导航目标。

pub mod handlers;
pub mod server;
pub mod settings;

pub use handlers::AppState;
pub use server::{create_routes, WebServer};
pub use settings::ClinicSettings;
