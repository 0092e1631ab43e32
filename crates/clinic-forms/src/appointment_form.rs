//! 预约表单
//!
//! 按模式运作：创建、改期、取消。模式在实例生命周期内固定；
//! 模式切换由外层用不同模式重新构造表单完成，
//! 本层不维护状态转换图。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use clinic_core::{
    Appointment, AppointmentMode, ClinicDirectory, ClinicError, Result,
};
use clinic_integration::{
    AppointmentActions, AppointmentPatch, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use uuid::Uuid;

use crate::field::{FieldKind, FieldSpec, SelectOption};
use crate::form_field::{render_field, FieldView};
use crate::navigation::Navigation;
use crate::schema::{appointment_schema, Schema};
use crate::state::{FormState, FormValue};

const SUBMIT_FAILED_BANNER: &str = "Something went wrong. Please try again.";

/// 预约表单
pub struct AppointmentForm {
    actions: Arc<dyn AppointmentActions>,
    directory: ClinicDirectory,
    mode: AppointmentMode,
    user_id: Uuid,
    patient_id: Option<Uuid>,
    appointment: Option<Appointment>,
    schema: Schema,
    state: FormState,
}

impl AppointmentForm {
    /// 创建模式：为指定患者发起新预约
    pub fn for_create(
        actions: Arc<dyn AppointmentActions>,
        directory: ClinicDirectory,
        user_id: Uuid,
        patient_id: Uuid,
    ) -> Self {
        Self::build(
            actions,
            directory,
            AppointmentMode::Create,
            user_id,
            Some(patient_id),
            None,
        )
    }

    /// 改期/取消模式：针对既有预约记录
    pub fn for_update(
        actions: Arc<dyn AppointmentActions>,
        directory: ClinicDirectory,
        mode: AppointmentMode,
        user_id: Uuid,
        appointment: Appointment,
    ) -> Self {
        Self::build(actions, directory, mode, user_id, None, Some(appointment))
    }

    fn build(
        actions: Arc<dyn AppointmentActions>,
        directory: ClinicDirectory,
        mode: AppointmentMode,
        user_id: Uuid,
        patient_id: Option<Uuid>,
        appointment: Option<Appointment>,
    ) -> Self {
        // 默认值来自既有预约记录，否则为空/当前时间
        let mut defaults = HashMap::new();
        let schedule = appointment
            .as_ref()
            .map(|a| a.schedule)
            .unwrap_or_else(Utc::now);
        defaults.insert("schedule".to_string(), FormValue::DateTime(schedule));
        if let Some(existing) = &appointment {
            defaults.insert(
                "primary_physician".to_string(),
                FormValue::Text(existing.primary_physician.clone()),
            );
            defaults.insert(
                "reason".to_string(),
                FormValue::Text(existing.reason.clone()),
            );
            if let Some(note) = &existing.note {
                defaults.insert("note".to_string(), FormValue::Text(note.clone()));
            }
            if let Some(reason) = &existing.cancellation_reason {
                defaults.insert(
                    "cancellation_reason".to_string(),
                    FormValue::Text(reason.clone()),
                );
            }
        }

        Self {
            actions,
            directory,
            mode,
            user_id,
            patient_id,
            appointment,
            schema: appointment_schema(mode),
            state: FormState::with_defaults(defaults),
        }
    }

    pub fn mode(&self) -> AppointmentMode {
        self.mode
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    /// 提交按钮文案
    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            AppointmentMode::Create => "Create Appointment",
            AppointmentMode::Schedule => "Schedule Appointment",
            AppointmentMode::Cancel => "Cancel Appointment",
        }
    }

    /// 渲染当前模式可见的字段集
    ///
    /// 取消模式只显示取消原因；其余模式显示完整字段集。
    pub fn fields(&self) -> Vec<FieldView> {
        let render = |spec: &FieldSpec| render_field(spec, &self.state);

        match self.mode {
            AppointmentMode::Cancel => vec![render(
                &FieldSpec::new(
                    "cancellation_reason",
                    "Reason for cancellation",
                    FieldKind::Textarea,
                )
                .with_placeholder("Urgent meeting came up"),
            )],
            AppointmentMode::Create | AppointmentMode::Schedule => {
                let physicians: Vec<SelectOption> = self
                    .directory
                    .doctors
                    .iter()
                    .map(|doctor| {
                        SelectOption::with_image(doctor.name.clone(), doctor.image.clone())
                    })
                    .collect();

                vec![
                    render(
                        &FieldSpec::new(
                            "primary_physician",
                            "Primary Physician",
                            FieldKind::select(physicians),
                        )
                        .with_placeholder("Select a physician"),
                    ),
                    render(
                        &FieldSpec::new(
                            "schedule",
                            "Expected appointment date",
                            FieldKind::date_time_picker("MM/dd/yyyy - h:mm aa"),
                        )
                        .with_placeholder("Select your appointment date"),
                    ),
                    render(
                        &FieldSpec::new("reason", "Reason for appointment", FieldKind::Textarea)
                            .with_placeholder("ex: Annual monthly check-up"),
                    ),
                    render(
                        &FieldSpec::new("note", "Additional comments", FieldKind::Textarea)
                            .with_placeholder("ex: Prefer afternoon appointments, if possible"),
                    ),
                ]
            }
        }
    }

    /// 提交表单
    ///
    /// 提交状态始终由模式派生，忽略默认数据中的状态值。
    pub async fn submit(&mut self) -> Navigation {
        let report = self.schema.validate(&self.state);
        if !report.is_valid() {
            self.state.set_errors(report.into_errors());
            return Navigation::Stay;
        }

        if !self.state.begin_submit() {
            return Navigation::Stay;
        }

        let outcome = self.try_submit().await;
        self.state.finish_submit();

        match outcome {
            Ok(navigation) => {
                if navigation == Navigation::CloseModal {
                    self.state.reset();
                }
                navigation
            }
            Err(e) => {
                error!("预约提交失败 ({}): {}", self.mode.as_str(), e);
                self.state.set_banner(SUBMIT_FAILED_BANNER);
                Navigation::Stay
            }
        }
    }

    async fn try_submit(&self) -> Result<Navigation> {
        let status = self.mode.derived_status();

        match self.mode {
            AppointmentMode::Create => {
                let patient_id = self
                    .patient_id
                    .ok_or_else(|| ClinicError::Validation("缺少患者标识".to_string()))?;
                let schedule = self
                    .state
                    .datetime("schedule")
                    .ok_or_else(|| ClinicError::Validation("缺少预约时间".to_string()))?;

                let note = self.state.text("note").trim();
                let request = CreateAppointmentRequest {
                    user_id: self.user_id,
                    patient_id,
                    primary_physician: self.state.text("primary_physician").to_string(),
                    schedule,
                    reason: self.state.text("reason").to_string(),
                    note: (!note.is_empty()).then(|| note.to_string()),
                    status,
                };

                let appointment = self.actions.create_appointment(request).await?;
                info!("预约创建完成: {}", appointment.id);

                Ok(Navigation::AppointmentSuccess {
                    user_id: self.user_id,
                    appointment_id: appointment.id,
                })
            }
            AppointmentMode::Schedule | AppointmentMode::Cancel => {
                let appointment_id = self
                    .appointment
                    .as_ref()
                    .map(|a| a.id)
                    .ok_or_else(|| ClinicError::Validation("缺少预约记录".to_string()))?;

                let physician = self.state.text("primary_physician").trim();
                let cancellation_reason = self.state.text("cancellation_reason").trim();
                let request = UpdateAppointmentRequest {
                    user_id: self.user_id,
                    appointment_id,
                    appointment: AppointmentPatch {
                        primary_physician: (!physician.is_empty())
                            .then(|| physician.to_string()),
                        schedule: self.state.datetime("schedule"),
                        status,
                        cancellation_reason: (!cancellation_reason.is_empty())
                            .then(|| cancellation_reason.to_string()),
                    },
                    mode: self.mode,
                };

                let updated = self.actions.update_appointment(request).await?;
                info!(
                    "预约更新完成: {} -> {}",
                    updated.id,
                    updated.status.as_str()
                );

                Ok(Navigation::CloseModal)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use clinic_core::AppointmentStatus;

    #[derive(Default)]
    struct MockBackend {
        calls: AtomicUsize,
        fail: bool,
        last_create: Mutex<Option<CreateAppointmentRequest>>,
        last_update: Mutex<Option<UpdateAppointmentRequest>>,
    }

    #[async_trait]
    impl AppointmentActions for MockBackend {
        async fn create_appointment(
            &self,
            request: CreateAppointmentRequest,
        ) -> clinic_core::Result<Appointment> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ClinicError::Backend("create appointment: 500".to_string()));
            }
            let appointment = Appointment {
                id: Uuid::new_v4(),
                user_id: request.user_id,
                patient_id: request.patient_id,
                primary_physician: request.primary_physician.clone(),
                schedule: request.schedule,
                reason: request.reason.clone(),
                note: request.note.clone(),
                status: request.status,
                cancellation_reason: None,
                created_at: Utc::now(),
            };
            *self.last_create.lock().unwrap() = Some(request);
            Ok(appointment)
        }

        async fn update_appointment(
            &self,
            request: UpdateAppointmentRequest,
        ) -> clinic_core::Result<Appointment> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ClinicError::Backend("update appointment: 500".to_string()));
            }
            let appointment = Appointment {
                id: request.appointment_id,
                user_id: request.user_id,
                patient_id: Uuid::new_v4(),
                primary_physician: request
                    .appointment
                    .primary_physician
                    .clone()
                    .unwrap_or_default(),
                schedule: request.appointment.schedule.unwrap_or_else(Utc::now),
                reason: "Annual check-up".to_string(),
                note: None,
                status: request.appointment.status,
                cancellation_reason: request.appointment.cancellation_reason.clone(),
                created_at: Utc::now(),
            };
            *self.last_update.lock().unwrap() = Some(request);
            Ok(appointment)
        }
    }

    fn existing_appointment(user_id: Uuid) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            user_id,
            patient_id: Uuid::new_v4(),
            primary_physician: "Leila Cameron".to_string(),
            schedule: Utc::now(),
            reason: "Annual check-up".to_string(),
            note: Some("Prefer afternoon".to_string()),
            // 故意放一个与模式不符的状态，提交必须忽略它
            status: AppointmentStatus::Pending,
            cancellation_reason: None,
            created_at: Utc::now(),
        }
    }

    fn create_form(backend: Arc<MockBackend>) -> (AppointmentForm, Uuid) {
        let user_id = Uuid::new_v4();
        let mut form = AppointmentForm::for_create(
            backend,
            ClinicDirectory::default(),
            user_id,
            Uuid::new_v4(),
        );
        form.state_mut().set_text("primary_physician", "Leila Cameron");
        form.state_mut().set_datetime("schedule", Utc::now());
        form.state_mut().set_text("reason", "Annual check-up");
        (form, user_id)
    }

    #[tokio::test]
    async fn test_create_mode_always_submits_pending() {
        let backend = Arc::new(MockBackend::default());
        let (mut form, user_id) = create_form(backend.clone());

        let navigation = form.submit().await;

        match navigation {
            Navigation::AppointmentSuccess {
                user_id: nav_user, ..
            } => assert_eq!(nav_user, user_id),
            other => panic!("unexpected navigation: {:?}", other),
        }
        let request = backend.last_create.lock().unwrap().clone().unwrap();
        assert_eq!(request.status, AppointmentStatus::Pending);
    }

    #[tokio::test]
    async fn test_schedule_mode_forces_scheduled_status() {
        let backend = Arc::new(MockBackend::default());
        let user_id = Uuid::new_v4();
        let appointment = existing_appointment(user_id);
        let mut form = AppointmentForm::for_update(
            backend.clone(),
            ClinicDirectory::default(),
            AppointmentMode::Schedule,
            user_id,
            appointment.clone(),
        );

        let navigation = form.submit().await;

        assert_eq!(navigation, Navigation::CloseModal);
        let request = backend.last_update.lock().unwrap().clone().unwrap();
        assert_eq!(request.appointment_id, appointment.id);
        assert_eq!(request.appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(request.mode, AppointmentMode::Schedule);
    }

    #[tokio::test]
    async fn test_cancel_mode_shows_only_reason_field() {
        let backend = Arc::new(MockBackend::default());
        let user_id = Uuid::new_v4();
        let form = AppointmentForm::for_update(
            backend,
            ClinicDirectory::default(),
            AppointmentMode::Cancel,
            user_id,
            existing_appointment(user_id),
        );

        let fields = form.fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "cancellation_reason");
    }

    #[tokio::test]
    async fn test_cancel_mode_forces_cancelled_status() {
        let backend = Arc::new(MockBackend::default());
        let user_id = Uuid::new_v4();
        let mut form = AppointmentForm::for_update(
            backend.clone(),
            ClinicDirectory::default(),
            AppointmentMode::Cancel,
            user_id,
            existing_appointment(user_id),
        );
        form.state_mut()
            .set_text("cancellation_reason", "Urgent meeting came up");

        let navigation = form.submit().await;

        assert_eq!(navigation, Navigation::CloseModal);
        let request = backend.last_update.lock().unwrap().clone().unwrap();
        assert_eq!(request.appointment.status, AppointmentStatus::Cancelled);
        assert_eq!(
            request.appointment.cancellation_reason.as_deref(),
            Some("Urgent meeting came up")
        );
        assert_eq!(request.mode, AppointmentMode::Cancel);
    }

    #[tokio::test]
    async fn test_cancel_requires_reason() {
        let backend = Arc::new(MockBackend::default());
        let user_id = Uuid::new_v4();
        let mut form = AppointmentForm::for_update(
            backend.clone(),
            ClinicDirectory::default(),
            AppointmentMode::Cancel,
            user_id,
            existing_appointment(user_id),
        );

        let navigation = form.submit().await;

        assert_eq!(navigation, Navigation::Stay);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert!(form.state().error("cancellation_reason").is_some());
    }

    #[tokio::test]
    async fn test_schedule_success_resets_form() {
        let backend = Arc::new(MockBackend::default());
        let user_id = Uuid::new_v4();
        let appointment = existing_appointment(user_id);
        let mut form = AppointmentForm::for_update(
            backend,
            ClinicDirectory::default(),
            AppointmentMode::Schedule,
            user_id,
            appointment.clone(),
        );
        form.state_mut().set_text("reason", "Follow-up visit");

        let navigation = form.submit().await;

        assert_eq!(navigation, Navigation::CloseModal);
        // 重置回既有预约记录播种的默认值
        assert_eq!(form.state().text("reason"), "Annual check-up");
        assert!(!form.state().is_submitting());
    }

    #[tokio::test]
    async fn test_resubmit_while_in_flight_is_noop() {
        let backend = Arc::new(MockBackend::default());
        let (mut form, _) = create_form(backend.clone());

        assert!(form.state_mut().begin_submit());
        let navigation = form.submit().await;

        assert_eq!(navigation, Navigation::Stay);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_backend_failure_sets_banner_without_navigation() {
        let backend = Arc::new(MockBackend {
            fail: true,
            ..MockBackend::default()
        });
        let (mut form, _) = create_form(backend.clone());

        let navigation = form.submit().await;

        assert_eq!(navigation, Navigation::Stay);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert!(!form.state().is_submitting());
        assert!(form.state().banner().is_some());
    }

    #[test]
    fn test_submit_labels_follow_mode() {
        let backend = Arc::new(MockBackend::default());
        let user_id = Uuid::new_v4();
        let create = AppointmentForm::for_create(
            backend.clone(),
            ClinicDirectory::default(),
            user_id,
            Uuid::new_v4(),
        );
        assert_eq!(create.submit_label(), "Create Appointment");

        let cancel = AppointmentForm::for_update(
            backend,
            ClinicDirectory::default(),
            AppointmentMode::Cancel,
            user_id,
            existing_appointment(user_id),
        );
        assert_eq!(cancel.submit_label(), "Cancel Appointment");
    }
}
