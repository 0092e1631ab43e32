//! # Clinic Core
//!
//! 患者登记与预约系统的核心模块，提供基础数据结构、错误定义和通用工具。

pub mod directory;
pub mod error;
pub mod models;
pub mod utils;

pub use directory::ClinicDirectory;
pub use error::{ClinicError, Result};
pub use models::*;
