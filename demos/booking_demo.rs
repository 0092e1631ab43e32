//! 预约挂号流程演示程序
//!
//! 展示预约表单的三种模式：创建（状态 pending）、
//! 改期（状态 scheduled）、取消（状态 cancelled）。

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use clinic_core::{
    Appointment, AppointmentMode, ClinicDirectory, ClinicError, Result,
};
use clinic_forms::{AppointmentForm, Navigation};
use clinic_integration::{
    AppointmentActions, CreateAppointmentRequest, UpdateAppointmentRequest,
};

/// 内存后端：保存预约记录并应用更新
#[derive(Default)]
struct InMemoryBackend {
    appointments: Mutex<HashMap<Uuid, Appointment>>,
}

#[async_trait]
impl AppointmentActions for InMemoryBackend {
    async fn create_appointment(&self, request: CreateAppointmentRequest) -> Result<Appointment> {
        let appointment = Appointment {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            patient_id: request.patient_id,
            primary_physician: request.primary_physician,
            schedule: request.schedule,
            reason: request.reason,
            note: request.note,
            status: request.status,
            cancellation_reason: None,
            created_at: Utc::now(),
        };
        self.appointments
            .lock()
            .unwrap()
            .insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn update_appointment(&self, request: UpdateAppointmentRequest) -> Result<Appointment> {
        let mut appointments = self.appointments.lock().unwrap();
        let appointment = appointments
            .get_mut(&request.appointment_id)
            .ok_or_else(|| ClinicError::NotFound("appointment".to_string()))?;

        if let Some(physician) = request.appointment.primary_physician {
            appointment.primary_physician = physician;
        }
        if let Some(schedule) = request.appointment.schedule {
            appointment.schedule = schedule;
        }
        appointment.status = request.appointment.status;
        appointment.cancellation_reason = request.appointment.cancellation_reason;

        Ok(appointment.clone())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt::init();

    let backend = Arc::new(InMemoryBackend::default());
    let directory = ClinicDirectory::default();
    let user_id = Uuid::new_v4();
    let patient_id = Uuid::new_v4();

    println!("📅 预约挂号流程演示\n");

    // 1. 创建模式：完整字段集，提交状态为 pending
    let mut create_form = AppointmentForm::for_create(
        backend.clone(),
        directory.clone(),
        user_id,
        patient_id,
    );
    println!("📋 创建模式字段: {} 个", create_form.fields().len());

    create_form
        .state_mut()
        .set_text("primary_physician", "David Livingston");
    create_form
        .state_mut()
        .set_datetime("schedule", Utc::now() + Duration::days(3));
    create_form
        .state_mut()
        .set_text("reason", "Annual check-up");
    create_form
        .state_mut()
        .set_text("note", "Prefer afternoon appointments, if possible");

    let navigation = create_form.submit().await;
    let appointment_id = match &navigation {
        Navigation::AppointmentSuccess { appointment_id, .. } => *appointment_id,
        other => panic!("unexpected navigation: {:?}", other),
    };
    println!("✅ 预约创建完成，跳转到: {}", navigation.path().unwrap());

    let appointment = backend
        .appointments
        .lock()
        .unwrap()
        .get(&appointment_id)
        .cloned()
        .unwrap();
    println!("   状态: {}", appointment.status.as_str());

    // 2. 改期模式：同一字段集，提交状态强制为 scheduled
    let mut schedule_form = AppointmentForm::for_update(
        backend.clone(),
        directory.clone(),
        AppointmentMode::Schedule,
        user_id,
        appointment.clone(),
    );
    schedule_form
        .state_mut()
        .set_datetime("schedule", Utc::now() + Duration::days(7));

    let navigation = schedule_form.submit().await;
    assert_eq!(navigation, Navigation::CloseModal);
    let appointment = backend
        .appointments
        .lock()
        .unwrap()
        .get(&appointment_id)
        .cloned()
        .unwrap();
    println!("\n✅ 预约已改期，关闭模态框");
    println!("   状态: {}", appointment.status.as_str());

    // 3. 取消模式：只有取消原因一个字段
    let mut cancel_form = AppointmentForm::for_update(
        backend.clone(),
        directory,
        AppointmentMode::Cancel,
        user_id,
        appointment,
    );
    println!("\n📋 取消模式字段: {} 个", cancel_form.fields().len());

    cancel_form
        .state_mut()
        .set_text("cancellation_reason", "Urgent meeting came up");
    let navigation = cancel_form.submit().await;
    assert_eq!(navigation, Navigation::CloseModal);

    let appointment = backend
        .appointments
        .lock()
        .unwrap()
        .get(&appointment_id)
        .cloned()
        .unwrap();
    println!("✅ 预约已取消");
    println!("   状态: {}", appointment.status.as_str());
    println!(
        "   取消原因: {}",
        appointment.cancellation_reason.as_deref().unwrap_or("-")
    );

    Ok(())
}
