//! 患者登记表单
//!
//! 三个字段（姓名、邮箱、电话）。提交成功后创建用户记录，
//! 并导航到该用户的注册页。

use std::sync::Arc;

use tracing::{error, info};

use clinic_core::Result;
use clinic_integration::{CreateUserRequest, PatientActions};

use crate::field::{FieldKind, FieldSpec};
use crate::form_field::{render_field, FieldView};
use crate::navigation::Navigation;
use crate::schema::{user_schema, Schema};
use crate::state::FormState;

/// 提交失败时的用户可见提示
const SUBMIT_FAILED_BANNER: &str = "Something went wrong. Please try again.";

/// 患者登记表单
pub struct PatientIntakeForm {
    actions: Arc<dyn PatientActions>,
    schema: Schema,
    state: FormState,
}

impl PatientIntakeForm {
    pub fn new(actions: Arc<dyn PatientActions>) -> Self {
        Self {
            actions,
            schema: user_schema(),
            state: FormState::new(),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    pub fn set_name(&mut self, name: &str) {
        self.state.set_text("name", name);
    }

    pub fn set_email(&mut self, email: &str) {
        self.state.set_text("email", email);
    }

    pub fn set_phone(&mut self, phone: &str) {
        self.state.set_phone("phone", phone);
    }

    /// 渲染表单字段
    pub fn fields(&self) -> Vec<FieldView> {
        let specs = [
            FieldSpec::new(
                "name",
                "Full name",
                FieldKind::input_with_icon("/assets/icons/user.svg"),
            )
            .with_placeholder("John Doe"),
            FieldSpec::new(
                "email",
                "Email",
                FieldKind::input_with_icon("/assets/icons/email.svg"),
            )
            .with_placeholder("johndoe@prime.com"),
            FieldSpec::new("phone", "Phone number", FieldKind::phone())
                .with_placeholder("+234 802 289 4950"),
        ];

        specs
            .iter()
            .map(|spec| render_field(spec, &self.state))
            .collect()
    }

    /// 提交表单
    ///
    /// 校验失败或提交仍在进行时不触发后端调用。
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
            Ok(navigation) => navigation,
            Err(e) => {
                error!("创建用户失败: {}", e);
                self.state.set_banner(SUBMIT_FAILED_BANNER);
                Navigation::Stay
            }
        }
    }

    async fn try_submit(&self) -> Result<Navigation> {
        let request = CreateUserRequest {
            name: self.state.text("name").to_string(),
            email: self.state.text("email").to_string(),
            phone: self.state.text("phone").to_string(),
        };

        let user = self.actions.create_user(request).await?;
        info!("用户登记完成: {}", user.id);

        Ok(Navigation::RegisterPage { user_id: user.id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    use clinic_core::{ClinicError, Patient, User};
    use clinic_integration::RegisterPatientRequest;

    /// 记录调用的模拟后端
    #[derive(Default)]
    struct MockBackend {
        calls: AtomicUsize,
        fail: bool,
        user_id: Uuid,
        last_request: Mutex<Option<CreateUserRequest>>,
    }

    impl MockBackend {
        fn with_user_id(user_id: Uuid) -> Self {
            Self {
                user_id,
                ..Self::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl PatientActions for MockBackend {
        async fn create_user(&self, request: CreateUserRequest) -> clinic_core::Result<User> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ClinicError::Backend("create user: 500".to_string()));
            }
            let user = User {
                id: self.user_id,
                name: request.name.clone(),
                email: request.email.clone(),
                phone: request.phone.clone(),
                created_at: Utc::now(),
            };
            *self.last_request.lock().unwrap() = Some(request);
            Ok(user)
        }

        async fn get_user(&self, _user_id: Uuid) -> clinic_core::Result<User> {
            Err(ClinicError::Internal("not used".to_string()))
        }

        async fn register_patient(
            &self,
            _request: RegisterPatientRequest,
        ) -> clinic_core::Result<Patient> {
            Err(ClinicError::Internal("not used".to_string()))
        }

        async fn get_patient(&self, _user_id: Uuid) -> clinic_core::Result<Patient> {
            Err(ClinicError::Internal("not used".to_string()))
        }
    }

    fn filled_form(backend: Arc<MockBackend>) -> PatientIntakeForm {
        let mut form = PatientIntakeForm::new(backend);
        form.set_name("Jane Doe");
        form.set_email("jane@example.com");
        form.set_phone("+2348022894950");
        form
    }

    #[tokio::test]
    async fn test_empty_submission_blocked_without_backend_call() {
        let backend = Arc::new(MockBackend::default());
        let mut form = PatientIntakeForm::new(backend.clone());

        let navigation = form.submit().await;

        assert_eq!(navigation, Navigation::Stay);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert!(form.state().error("name").is_some());
        assert!(form.state().error("email").is_some());
        assert!(form.state().error("phone").is_some());
    }

    #[tokio::test]
    async fn test_well_formed_submission_navigates_to_register() {
        let user_id = Uuid::new_v4();
        let backend = Arc::new(MockBackend::with_user_id(user_id));
        let mut form = filled_form(backend.clone());

        let navigation = form.submit().await;

        assert_eq!(navigation, Navigation::RegisterPage { user_id });
        assert_eq!(
            navigation.path().unwrap(),
            format!("/patients/{}/register", user_id)
        );
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);

        // 后端收到的正是这三个值
        let request = backend.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(
            request,
            CreateUserRequest {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "+2348022894950".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_resubmit_while_in_flight_is_noop() {
        let backend = Arc::new(MockBackend::default());
        let mut form = filled_form(backend.clone());

        // 模拟一次仍在进行的提交
        assert!(form.state_mut().begin_submit());

        let navigation = form.submit().await;

        assert_eq!(navigation, Navigation::Stay);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        // 原提交的标志不受影响
        assert!(form.state().is_submitting());
    }

    #[tokio::test]
    async fn test_backend_failure_sets_banner_and_clears_flag() {
        let backend = Arc::new(MockBackend::failing());
        let mut form = filled_form(backend.clone());

        let navigation = form.submit().await;

        assert_eq!(navigation, Navigation::Stay);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert!(!form.state().is_submitting());
        assert_eq!(form.state().banner(), Some(SUBMIT_FAILED_BANNER));
    }

    #[test]
    fn test_renders_three_fields() {
        let backend = Arc::new(MockBackend::default());
        let form = PatientIntakeForm::new(backend);

        let fields = form.fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name, "name");
        assert_eq!(fields[1].name, "email");
        assert_eq!(fields[2].name, "phone");
    }
}
