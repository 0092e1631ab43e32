//! 核心数据模型定义

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ClinicError;

/// 就诊用户账户
///
/// 通过登记表单创建一次，之后对本层只读。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// 性别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl TryFrom<&str> for Gender {
    type Error = ClinicError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(ClinicError::Validation(format!("无效的性别值: {}", value))),
        }
    }
}

/// 主治医师条目（来自静态名录）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub name: String,
    pub image: String,
}

/// 证件文件载荷
///
/// 传输层中立的多部分载荷：二进制内容 + 申报文件名。
/// 申报文件名必须与用户所选文件的原始名称一致。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl DocumentPayload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }
}

/// 患者档案
///
/// 注册时创建一次，本层之后不再修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub address: String,
    pub occupation: String,
    pub emergency_contact_name: String,
    pub emergency_contact_number: String,
    pub primary_physician: String,
    pub insurance_provider: String,
    pub insurance_policy_number: String,
    pub allergies: Option<String>,
    pub current_medication: Option<String>,
    pub family_medical_history: Option<String>,
    pub past_medical_history: Option<String>,
    pub identification_type: Option<String>,
    pub identification_number: Option<String>,
    pub identification_document: Option<DocumentPayload>,
    pub treatment_consent: bool,
    pub disclosure_consent: bool,
    pub privacy_consent: bool,
    pub created_at: DateTime<Utc>,
}

/// 预约状态
///
/// 静态标签，不构成受管理的状态转换图；
/// 状态由表单模式派生，转换发生在后端。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Scheduled,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for AppointmentStatus {
    type Error = ClinicError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "scheduled" => Ok(Self::Scheduled),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ClinicError::Validation(format!("无效的预约状态: {}", value))),
        }
    }
}

/// 预约表单模式
///
/// 作为模式标记随更新请求一并发送给后端。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentMode {
    Create,
    Schedule,
    Cancel,
}

impl AppointmentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Schedule => "schedule",
            Self::Cancel => "cancel",
        }
    }

    /// 由模式派生提交状态，忽略表单默认数据中的任何状态值
    pub fn derived_status(&self) -> AppointmentStatus {
        match self {
            Self::Create => AppointmentStatus::Pending,
            Self::Schedule => AppointmentStatus::Scheduled,
            Self::Cancel => AppointmentStatus::Cancelled,
        }
    }
}

impl TryFrom<&str> for AppointmentMode {
    type Error = ClinicError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "create" => Ok(Self::Create),
            "schedule" => Ok(Self::Schedule),
            "cancel" => Ok(Self::Cancel),
            _ => Err(ClinicError::Validation(format!("无效的表单模式: {}", value))),
        }
    }
}

/// 预约记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub patient_id: Uuid,
    pub primary_physician: String,
    pub schedule: DateTime<Utc>,
    pub reason: String,
    pub note: Option<String>,
    pub status: AppointmentStatus,
    /// 仅当状态为 cancelled 时有意义
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::from_str::<AppointmentStatus>("\"cancelled\"").unwrap(),
            AppointmentStatus::Cancelled
        );
    }

    #[test]
    fn test_mode_derived_status() {
        assert_eq!(AppointmentMode::Create.derived_status(), AppointmentStatus::Pending);
        assert_eq!(AppointmentMode::Schedule.derived_status(), AppointmentStatus::Scheduled);
        assert_eq!(AppointmentMode::Cancel.derived_status(), AppointmentStatus::Cancelled);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(AppointmentMode::try_from("schedule").unwrap(), AppointmentMode::Schedule);
        assert!(AppointmentMode::try_from("reschedule").is_err());
    }

    #[test]
    fn test_gender_parsing() {
        assert_eq!(Gender::try_from("Male").unwrap(), Gender::Male);
        assert_eq!(Gender::try_from("female").unwrap(), Gender::Female);
        assert!(Gender::try_from("unknown").is_err());
    }

    #[test]
    fn test_document_payload_keeps_declared_name() {
        let doc = DocumentPayload::new("passport.png", "image/png", vec![1, 2, 3]);
        assert_eq!(doc.file_name, "passport.png");
        assert_eq!(doc.data.len(), 3);
    }
}
