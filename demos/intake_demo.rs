//! 患者登记流程演示程序
//!
//! 展示登记表单与注册表单的完整流程：校验拦截、用户创建、
//! 携带证件扫描件的患者注册，以及每一步的导航去向。

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use clinic_core::{
    ClinicDirectory, ClinicError, DocumentPayload, Patient, Result, User,
};
use clinic_forms::{Navigation, PatientIntakeForm, RegisterForm};
use clinic_integration::{CreateUserRequest, PatientActions, RegisterPatientRequest};

/// 内存后端：把创建的记录存进HashMap，供演示使用
#[derive(Default)]
struct InMemoryBackend {
    users: Mutex<HashMap<Uuid, User>>,
    patients: Mutex<HashMap<Uuid, Patient>>,
}

#[async_trait]
impl PatientActions for InMemoryBackend {
    async fn create_user(&self, request: CreateUserRequest) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            phone: request.phone,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<User> {
        self.users
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| ClinicError::NotFound("user".to_string()))
    }

    async fn register_patient(&self, request: RegisterPatientRequest) -> Result<Patient> {
        let patient = Patient {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            name: request.name,
            email: request.email,
            phone: request.phone,
            birth_date: request.birth_date,
            gender: request.gender,
            address: request.address,
            occupation: request.occupation,
            emergency_contact_name: request.emergency_contact_name,
            emergency_contact_number: request.emergency_contact_number,
            primary_physician: request.primary_physician,
            insurance_provider: request.insurance_provider,
            insurance_policy_number: request.insurance_policy_number,
            allergies: request.allergies,
            current_medication: request.current_medication,
            family_medical_history: request.family_medical_history,
            past_medical_history: request.past_medical_history,
            identification_type: request.identification_type,
            identification_number: request.identification_number,
            identification_document: request.identification_document,
            treatment_consent: request.treatment_consent,
            disclosure_consent: request.disclosure_consent,
            privacy_consent: request.privacy_consent,
            created_at: Utc::now(),
        };
        self.patients
            .lock()
            .unwrap()
            .insert(patient.user_id, patient.clone());
        Ok(patient)
    }

    async fn get_patient(&self, user_id: Uuid) -> Result<Patient> {
        self.patients
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| ClinicError::NotFound("patient".to_string()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt::init();

    let backend = Arc::new(InMemoryBackend::default());
    let directory = ClinicDirectory::default();

    println!("🏥 患者登记流程演示\n");

    // 1. 空表单提交：校验拦截，后端不被调用
    let mut intake = PatientIntakeForm::new(backend.clone());
    let navigation = intake.submit().await;
    assert_eq!(navigation, Navigation::Stay);
    println!("✅ 空表单被校验拦截:");
    for field in intake.fields() {
        if let Some(error) = &field.error {
            println!("   - {}: {}", field.name, error);
        }
    }

    // 2. 填写三个字段并提交
    intake.set_name("Jane Doe");
    intake.set_email("jane@example.com");
    intake.set_phone("+234 802 289 4950");
    let navigation = intake.submit().await;
    let user_id = match navigation {
        Navigation::RegisterPage { user_id } => user_id,
        other => panic!("unexpected navigation: {:?}", other),
    };
    println!("\n✅ 用户创建完成，跳转到: {}", navigation.path().unwrap());

    // 3. 页面层取回用户记录，渲染注册表单
    let user = backend.get_user(user_id).await?;
    let mut register = RegisterForm::new(backend.clone(), directory, user);
    let sections = register.sections();
    println!("\n📋 注册表单分节:");
    for section in &sections {
        println!(
            "   - {} ({} 个字段)",
            section.title.as_deref().unwrap_or("(untitled)"),
            section.fields.len()
        );
    }

    // 4. 填写注册信息，附加证件扫描件
    {
        let state = register.state_mut();
        state.set_datetime("birth_date", Utc::now());
        state.set_text("gender", "Female");
        state.set_text("address", "14 street, New York, NY - 5101");
        state.set_text("occupation", "Software Engineer");
        state.set_text("emergency_contact_name", "John Doe");
        state.set_phone("emergency_contact_number", "+234 802 289 4951");
        state.set_text("primary_physician", "Leila Cameron");
        state.set_text("insurance_provider", "BlueCross");
        state.set_text("insurance_policy_number", "ABC123456789");
        state.set_text("allergies", "Penicillin");
        state.set_flag("treatment_consent", true);
        state.set_flag("disclosure_consent", true);
        state.set_flag("privacy_consent", true);
    }
    register.attach_identification_document(DocumentPayload::new(
        "passport-scan.png",
        "image/png",
        vec![0u8; 128],
    ));

    let navigation = register.submit().await;
    println!("\n✅ 患者注册完成，跳转到: {}", navigation.path().unwrap());

    // 5. 确认证件文件名完整往返
    let patient = backend.get_patient(user_id).await?;
    let document = patient.identification_document.as_ref().unwrap();
    println!("📎 证件扫描件: {} ({} 字节)", document.file_name, document.data.len());

    Ok(())
}
