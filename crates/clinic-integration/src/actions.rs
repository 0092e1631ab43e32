//! 后端动作接口定义
//!
//! 表单层通过这两个trait调用远端服务：
//! - 用户创建/查询、患者注册/查询
//! - 预约创建/更新
//!
//! 具体传输方式由实现决定，表单层不感知。

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clinic_core::{
    Appointment, AppointmentMode, AppointmentStatus, DocumentPayload, Gender, Patient, Result,
    User,
};

/// 创建用户请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// 患者注册请求
///
/// 证件文件不进入JSON正文，由连接器作为多部分载荷单独上传。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPatientRequest {
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
    #[serde(skip)]
    pub identification_document: Option<DocumentPayload>,
    pub treatment_consent: bool,
    pub disclosure_consent: bool,
    pub privacy_consent: bool,
}

/// 创建预约请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub user_id: Uuid,
    pub patient_id: Uuid,
    pub primary_physician: String,
    pub schedule: DateTime<Utc>,
    pub reason: String,
    pub note: Option<String>,
    pub status: AppointmentStatus,
}

/// 预约变更字段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentPatch {
    pub primary_physician: Option<String>,
    pub schedule: Option<DateTime<Utc>>,
    pub status: AppointmentStatus,
    pub cancellation_reason: Option<String>,
}

/// 更新预约请求
///
/// 模式标记随请求发送，提示后端本次更新来自哪种表单。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub user_id: Uuid,
    pub appointment_id: Uuid,
    pub appointment: AppointmentPatch,
    #[serde(rename = "type")]
    pub mode: AppointmentMode,
}

/// 用户与患者动作接口
#[async_trait]
pub trait PatientActions: Send + Sync {
    /// 创建用户
    async fn create_user(&self, request: CreateUserRequest) -> Result<User>;

    /// 按标识查询用户
    async fn get_user(&self, user_id: Uuid) -> Result<User>;

    /// 注册患者
    async fn register_patient(&self, request: RegisterPatientRequest) -> Result<Patient>;

    /// 按用户标识查询患者
    async fn get_patient(&self, user_id: Uuid) -> Result<Patient>;
}

/// 预约动作接口
#[async_trait]
pub trait AppointmentActions: Send + Sync {
    /// 创建预约
    async fn create_appointment(&self, request: CreateAppointmentRequest) -> Result<Appointment>;

    /// 更新预约（改期/取消）
    async fn update_appointment(&self, request: UpdateAppointmentRequest) -> Result<Appointment>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_carries_mode_tag() {
        let request = UpdateAppointmentRequest {
            user_id: Uuid::nil(),
            appointment_id: Uuid::nil(),
            appointment: AppointmentPatch {
                primary_physician: None,
                schedule: None,
                status: AppointmentStatus::Cancelled,
                cancellation_reason: Some("Urgent meeting came up".to_string()),
            },
            mode: AppointmentMode::Cancel,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "cancel");
        assert_eq!(json["appointment"]["status"], "cancelled");
    }

    #[test]
    fn test_create_appointment_status_wire_format() {
        let request = CreateAppointmentRequest {
            user_id: Uuid::nil(),
            patient_id: Uuid::nil(),
            primary_physician: "Leila Cameron".to_string(),
            schedule: Utc::now(),
            reason: "Annual check-up".to_string(),
            note: None,
            status: AppointmentStatus::Pending,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_register_request_excludes_document_from_json() {
        let request = RegisterPatientRequest {
            user_id: Uuid::nil(),
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+2348022894950".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 2, 15).unwrap(),
            gender: Gender::Female,
            address: "14 street, New York, NY - 5101".to_string(),
            occupation: "Software Engineer".to_string(),
            emergency_contact_name: "John Doe".to_string(),
            emergency_contact_number: "+2348022894951".to_string(),
            primary_physician: "Leila Cameron".to_string(),
            insurance_provider: "BlueCross".to_string(),
            insurance_policy_number: "ABC123456789".to_string(),
            allergies: None,
            current_medication: None,
            family_medical_history: None,
            past_medical_history: None,
            identification_type: Some("Passport".to_string()),
            identification_number: Some("123456789".to_string()),
            identification_document: Some(DocumentPayload::new(
                "passport.png",
                "image/png",
                vec![0u8; 16],
            )),
            treatment_consent: true,
            disclosure_consent: true,
            privacy_consent: true,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("identification_document").is_none());
        assert_eq!(json["identification_type"], "Passport");
    }
}
