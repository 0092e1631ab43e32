//! HTTP处理器

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use clinic_core::{
    Appointment, AppointmentMode, ClinicDirectory, ClinicError, DocumentPayload,
};
use clinic_forms::{
    AppointmentForm, FieldView, FormSection, FormState, Navigation, PatientIntakeForm,
    RegisterForm,
};
use clinic_integration::{AppointmentActions, PatientActions};

/// 应用共享状态
///
/// 后端动作与静态名录均为注入依赖，测试时可整体替换。
#[derive(Clone)]
pub struct AppState {
    pub patients: Arc<dyn PatientActions>,
    pub appointments: Arc<dyn AppointmentActions>,
    pub directory: ClinicDirectory,
}

/// 表单页载荷
#[derive(Debug, Serialize)]
pub struct FormPage {
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<FormSection>>,
    pub submit_label: String,
}

/// 提交响应
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    /// 成功后的跳转路径
    pub redirect: Option<String>,
    /// 是否应关闭外层模态框
    pub close_modal: bool,
    /// 逐字段校验错误
    pub errors: HashMap<String, String>,
    /// 用户可见的提交失败提示
    pub error: Option<String>,
}

fn submission_response(
    navigation: &Navigation,
    state: &FormState,
) -> (StatusCode, Json<SubmissionResponse>) {
    let response = SubmissionResponse {
        redirect: navigation.path(),
        close_modal: *navigation == Navigation::CloseModal,
        errors: state.errors().clone(),
        error: state.banner().map(str::to_string),
    };

    let status = if response.redirect.is_some() || response.close_modal {
        StatusCode::OK
    } else if !response.errors.is_empty() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(response))
}

fn not_found(what: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("{} not found", what) })),
    )
}

/// 健康检查处理器
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": "0.1.0"
    }))
}

/// 登记页处理器
pub async fn intake_page(State(state): State<AppState>) -> Json<FormPage> {
    let form = PatientIntakeForm::new(state.patients.clone());
    Json(FormPage {
        title: "Hi there".to_string(),
        subtitle: "Schedule your first appointment".to_string(),
        fields: Some(form.fields()),
        sections: None,
        submit_label: "Get Started".to_string(),
    })
}

/// 登记提交正文
#[derive(Debug, Deserialize)]
pub struct IntakeSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// 登记提交处理器
pub async fn submit_intake(
    State(state): State<AppState>,
    Json(submission): Json<IntakeSubmission>,
) -> (StatusCode, Json<SubmissionResponse>) {
    info!("Intake submission for {}", submission.email);

    let mut form = PatientIntakeForm::new(state.patients.clone());
    form.set_name(&submission.name);
    form.set_email(&submission.email);
    form.set_phone(&submission.phone);

    let navigation = form.submit().await;
    submission_response(&navigation, form.state())
}

/// 注册页处理器
///
/// 先取回用户记录，再渲染注册表单。
pub async fn register_page(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<FormPage>, (StatusCode, Json<serde_json::Value>)> {
    let user = match state.patients.get_user(user_id).await {
        Ok(user) => user,
        Err(ClinicError::NotFound(_)) => return Err(not_found("user")),
        Err(e) => {
            error!("Failed to fetch user {}: {}", user_id, e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "failed to load user" })),
            ));
        }
    };

    let form = RegisterForm::new(state.patients.clone(), state.directory.clone(), user);
    Ok(Json(FormPage {
        title: "Welcome 👋".to_string(),
        subtitle: "Let us know more about you.".to_string(),
        fields: None,
        sections: Some(form.sections()),
        submit_label: "Get Started".to_string(),
    }))
}

/// 注册提交正文
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub occupation: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
    pub primary_physician: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_policy_number: Option<String>,
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
}

/// 注册提交处理器
pub async fn submit_registration(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(submission): Json<RegistrationSubmission>,
) -> Result<(StatusCode, Json<SubmissionResponse>), (StatusCode, Json<serde_json::Value>)> {
    let user = match state.patients.get_user(user_id).await {
        Ok(user) => user,
        Err(ClinicError::NotFound(_)) => return Err(not_found("user")),
        Err(e) => {
            error!("Failed to fetch user {}: {}", user_id, e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "failed to load user" })),
            ));
        }
    };

    let mut form = RegisterForm::new(state.patients.clone(), state.directory.clone(), user);
    {
        let form_state = form.state_mut();
        let mut apply = |name: &str, value: &Option<String>| {
            if let Some(value) = value {
                form_state.set_text(name, value);
            }
        };
        apply("name", &submission.name);
        apply("email", &submission.email);
        apply("gender", &submission.gender);
        apply("address", &submission.address);
        apply("occupation", &submission.occupation);
        apply("emergency_contact_name", &submission.emergency_contact_name);
        apply("primary_physician", &submission.primary_physician);
        apply("insurance_provider", &submission.insurance_provider);
        apply(
            "insurance_policy_number",
            &submission.insurance_policy_number,
        );
        apply("allergies", &submission.allergies);
        apply("current_medication", &submission.current_medication);
        apply("family_medical_history", &submission.family_medical_history);
        apply("past_medical_history", &submission.past_medical_history);
        apply("identification_type", &submission.identification_type);
        apply("identification_number", &submission.identification_number);

        if let Some(phone) = &submission.phone {
            form_state.set_phone("phone", phone);
        }
        if let Some(number) = &submission.emergency_contact_number {
            form_state.set_phone("emergency_contact_number", number);
        }
        if let Some(birth_date) = submission.birth_date {
            form_state.set_datetime("birth_date", birth_date);
        }
        form_state.set_flag("treatment_consent", submission.treatment_consent);
        form_state.set_flag("disclosure_consent", submission.disclosure_consent);
        form_state.set_flag("privacy_consent", submission.privacy_consent);
    }
    if let Some(document) = submission.identification_document {
        form.attach_identification_document(document);
    }

    let navigation = form.submit().await;
    Ok(submission_response(&navigation, form.state()))
}

/// 新预约页处理器
///
/// 先取回患者记录，再以创建模式渲染预约表单。
pub async fn new_appointment_page(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<FormPage>, (StatusCode, Json<serde_json::Value>)> {
    let patient = match state.patients.get_patient(user_id).await {
        Ok(patient) => patient,
        Err(ClinicError::NotFound(_)) => return Err(not_found("patient")),
        Err(e) => {
            error!("Failed to fetch patient for user {}: {}", user_id, e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "failed to load patient" })),
            ));
        }
    };

    let form = AppointmentForm::for_create(
        state.appointments.clone(),
        state.directory.clone(),
        user_id,
        patient.id,
    );
    Ok(Json(FormPage {
        title: "New Appointment".to_string(),
        subtitle: "Request a new appointment in 10 seconds".to_string(),
        fields: Some(form.fields()),
        sections: None,
        submit_label: form.submit_label().to_string(),
    }))
}

/// 预约提交正文
#[derive(Debug, Deserialize)]
pub struct AppointmentSubmission {
    #[serde(rename = "type")]
    pub mode: AppointmentMode,
    /// 创建模式：目标患者
    pub patient_id: Option<Uuid>,
    /// 改期/取消模式：既有预约记录
    pub appointment: Option<Appointment>,
    pub primary_physician: Option<String>,
    pub schedule: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub note: Option<String>,
    pub cancellation_reason: Option<String>,
}

/// 预约提交处理器
pub async fn submit_appointment(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(submission): Json<AppointmentSubmission>,
) -> Result<(StatusCode, Json<SubmissionResponse>), (StatusCode, Json<serde_json::Value>)> {
    let mut form = match submission.mode {
        AppointmentMode::Create => {
            let patient_id = submission.patient_id.ok_or_else(|| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "patient_id is required to create an appointment" })),
                )
            })?;
            AppointmentForm::for_create(
                state.appointments.clone(),
                state.directory.clone(),
                user_id,
                patient_id,
            )
        }
        mode => {
            let appointment = submission.appointment.clone().ok_or_else(|| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "appointment record is required to update" })),
                )
            })?;
            AppointmentForm::for_update(
                state.appointments.clone(),
                state.directory.clone(),
                mode,
                user_id,
                appointment,
            )
        }
    };

    {
        let form_state = form.state_mut();
        if let Some(physician) = &submission.primary_physician {
            form_state.set_text("primary_physician", physician);
        }
        if let Some(schedule) = submission.schedule {
            form_state.set_datetime("schedule", schedule);
        }
        if let Some(reason) = &submission.reason {
            form_state.set_text("reason", reason);
        }
        if let Some(note) = &submission.note {
            form_state.set_text("note", note);
        }
        if let Some(reason) = &submission.cancellation_reason {
            form_state.set_text("cancellation_reason", reason);
        }
    }

    let navigation = form.submit().await;
    Ok(submission_response(&navigation, form.state()))
}
