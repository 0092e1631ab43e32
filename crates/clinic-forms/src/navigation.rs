//! 导航效果
//!
//! 表单提交成功后的客户端可见去向。路由与跳转的执行
//! 委托给框架层，本层只产出目标描述。

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 提交后的导航效果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Navigation {
    /// 跳转到该用户的注册页
    RegisterPage { user_id: Uuid },
    /// 跳转到该用户的新预约页
    NewAppointmentPage { user_id: Uuid },
    /// 跳转到预约成功页，携带新预约标识
    AppointmentSuccess {
        user_id: Uuid,
        appointment_id: Uuid,
    },
    /// 关闭外层模态框
    CloseModal,
    /// 停留在当前表单（校验失败或提交失败）
    Stay,
}

impl Navigation {
    /// 对应的跳转路径；无跳转时为 None
    pub fn path(&self) -> Option<String> {
        match self {
            Self::RegisterPage { user_id } => Some(format!("/patients/{}/register", user_id)),
            Self::NewAppointmentPage { user_id } => {
                Some(format!("/patients/{}/new-appointment", user_id))
            }
            Self::AppointmentSuccess {
                user_id,
                appointment_id,
            } => Some(format!(
                "/patients/{}/new-appointment/success?appointmentId={}",
                user_id, appointment_id
            )),
            Self::CloseModal | Self::Stay => None,
        }
    }
}
