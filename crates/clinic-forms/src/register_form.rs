//! 患者注册表单
//!
//! 多分节大表单：个人信息、医疗信息、证件核验、知情同意。
//! 提交成功后创建患者档案，可附带一份证件扫描件，
//! 然后导航到该用户的新预约页。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use clinic_core::{ClinicDirectory, DocumentPayload, Gender, Result, User};
use clinic_integration::{PatientActions, RegisterPatientRequest};

use crate::composite::{FileUploadField, RadioGroupField};
use crate::field::{FieldKind, FieldSpec, SelectOption};
use crate::form_field::{render_field, FormSection};
use crate::navigation::Navigation;
use crate::schema::{patient_schema, Schema};
use crate::state::{FormState, FormValue};

const SUBMIT_FAILED_BANNER: &str = "Something went wrong. Please try again.";

/// 患者注册表单
pub struct RegisterForm {
    actions: Arc<dyn PatientActions>,
    directory: ClinicDirectory,
    user: User,
    schema: Schema,
    state: FormState,
}

impl RegisterForm {
    /// 以已创建的用户记录和静态名录构造表单
    ///
    /// 默认值为名录提供的注册默认项，并入用户的三个身份字段。
    pub fn new(actions: Arc<dyn PatientActions>, directory: ClinicDirectory, user: User) -> Self {
        let mut defaults = HashMap::new();
        defaults.insert("name".to_string(), FormValue::Text(user.name.clone()));
        defaults.insert("email".to_string(), FormValue::Text(user.email.clone()));
        defaults.insert("phone".to_string(), FormValue::Text(user.phone.clone()));
        defaults.insert(
            "birth_date".to_string(),
            FormValue::DateTime(Utc::now()),
        );
        defaults.insert(
            "gender".to_string(),
            FormValue::Text(directory.patient_defaults.gender.clone()),
        );
        defaults.insert(
            "identification_type".to_string(),
            FormValue::Text(directory.patient_defaults.identification_type.clone()),
        );

        Self {
            actions,
            user,
            schema: patient_schema(),
            state: FormState::with_defaults(defaults),
            directory,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    /// 附加证件扫描件
    pub fn attach_identification_document(&mut self, document: DocumentPayload) {
        self.state.set_document("identification_document", document);
    }

    fn physician_options(&self) -> Vec<SelectOption> {
        self.directory
            .doctors
            .iter()
            .map(|doctor| SelectOption::with_image(doctor.name.clone(), doctor.image.clone()))
            .collect()
    }

    /// 渲染分节后的完整字段集
    pub fn sections(&self) -> Vec<FormSection> {
        let render = |spec: &FieldSpec| render_field(spec, &self.state);

        let personal = vec![
            render(
                &FieldSpec::new(
                    "name",
                    "Full name",
                    FieldKind::input_with_icon("/assets/icons/user.svg"),
                )
                .with_placeholder("John Doe"),
            ),
            render(
                &FieldSpec::new(
                    "email",
                    "Email",
                    FieldKind::input_with_icon("/assets/icons/email.svg"),
                )
                .with_placeholder("johndoe@prime.com"),
            ),
            render(
                &FieldSpec::new("phone", "Phone number", FieldKind::phone())
                    .with_placeholder("+234 802 289 4950"),
            ),
            render(&FieldSpec::new(
                "birth_date",
                "Date of birth",
                FieldKind::date_picker(),
            )),
            render(&FieldSpec::new(
                "gender",
                "Gender",
                FieldKind::composite(RadioGroupField::new(self.directory.gender_options.clone())),
            )),
            render(
                &FieldSpec::new("address", "Address", FieldKind::input())
                    .with_placeholder("ex: 14 street, New York, NY - 5101"),
            ),
            render(
                &FieldSpec::new("occupation", "Occupation", FieldKind::input())
                    .with_placeholder("Software Engineer"),
            ),
            render(
                &FieldSpec::new(
                    "emergency_contact_name",
                    "Emergency contact name",
                    FieldKind::input(),
                )
                .with_placeholder("Guardian's name"),
            ),
            render(
                &FieldSpec::new(
                    "emergency_contact_number",
                    "Emergency contact number",
                    FieldKind::phone(),
                )
                .with_placeholder("+234 802 289 4950"),
            ),
        ];

        let medical = vec![
            render(
                &FieldSpec::new(
                    "primary_physician",
                    "Primary Physician",
                    FieldKind::select(self.physician_options()),
                )
                .with_placeholder("Select a physician"),
            ),
            render(
                &FieldSpec::new("insurance_provider", "Insurance provider", FieldKind::input())
                    .with_placeholder("BlueCross"),
            ),
            render(
                &FieldSpec::new(
                    "insurance_policy_number",
                    "Insurance policy number",
                    FieldKind::input(),
                )
                .with_placeholder("ABC123456789"),
            ),
            render(
                &FieldSpec::new("allergies", "Allergies (if any)", FieldKind::Textarea)
                    .with_placeholder("Peanut, Penicillin, Pollen"),
            ),
            render(
                &FieldSpec::new(
                    "current_medication",
                    "Current medication (if any)",
                    FieldKind::Textarea,
                )
                .with_placeholder("E.g: Ibuprofen 200mg"),
            ),
            render(&FieldSpec::new(
                "family_medical_history",
                "Family medical history",
                FieldKind::Textarea,
            )),
            render(&FieldSpec::new(
                "past_medical_history",
                "Past medical history",
                FieldKind::Textarea,
            )),
        ];

        let identification = vec![
            render(
                &FieldSpec::new(
                    "identification_type",
                    "Identification type",
                    FieldKind::select(
                        self.directory
                            .identification_types
                            .iter()
                            .map(|kind| SelectOption::plain(kind.as_str()))
                            .collect(),
                    ),
                )
                .with_placeholder("Select identification type"),
            ),
            render(
                &FieldSpec::new(
                    "identification_number",
                    "Identification number",
                    FieldKind::input(),
                )
                .with_placeholder("123456789"),
            ),
            render(&FieldSpec::new(
                "identification_document",
                "Scanned copy of identification document",
                FieldKind::composite(FileUploadField),
            )),
        ];

        let consent = vec![
            render(&FieldSpec::new(
                "treatment_consent",
                "I consent to receive treatment for my health condition.",
                FieldKind::Checkbox,
            )),
            render(&FieldSpec::new(
                "disclosure_consent",
                "I consent to the use and disclosure of my health information for treatment purposes.",
                FieldKind::Checkbox,
            )),
            render(&FieldSpec::new(
                "privacy_consent",
                "I acknowledge that I have reviewed and agree to the privacy policy",
                FieldKind::Checkbox,
            )),
        ];

        vec![
            FormSection::titled("Personal Information", personal),
            FormSection::titled("Medical Information", medical),
            FormSection::titled("Identification and Verification", identification),
            FormSection::titled("Consent and Privacy", consent),
        ]
    }

    /// 提交表单
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
                error!("注册患者失败: {}", e);
                self.state.set_banner(SUBMIT_FAILED_BANNER);
                Navigation::Stay
            }
        }
    }

    async fn try_submit(&self) -> Result<Navigation> {
        let opt = |name: &str| {
            let value = self.state.text(name).trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        // 出生日期在校验阶段已确认存在
        let birth_date = self
            .state
            .datetime("birth_date")
            .map(|dt| dt.date_naive())
            .ok_or_else(|| clinic_core::ClinicError::Validation("缺少出生日期".to_string()))?;
        let gender = Gender::try_from(self.state.text("gender"))?;

        let request = RegisterPatientRequest {
            user_id: self.user.id,
            name: self.state.text("name").to_string(),
            email: self.state.text("email").to_string(),
            phone: self.state.text("phone").to_string(),
            birth_date,
            gender,
            address: self.state.text("address").to_string(),
            occupation: self.state.text("occupation").to_string(),
            emergency_contact_name: self.state.text("emergency_contact_name").to_string(),
            emergency_contact_number: self.state.text("emergency_contact_number").to_string(),
            primary_physician: self.state.text("primary_physician").to_string(),
            insurance_provider: self.state.text("insurance_provider").to_string(),
            insurance_policy_number: self.state.text("insurance_policy_number").to_string(),
            allergies: opt("allergies"),
            current_medication: opt("current_medication"),
            family_medical_history: opt("family_medical_history"),
            past_medical_history: opt("past_medical_history"),
            identification_type: opt("identification_type"),
            identification_number: opt("identification_number"),
            identification_document: self.state.document("identification_document").cloned(),
            treatment_consent: self.state.flag("treatment_consent"),
            disclosure_consent: self.state.flag("disclosure_consent"),
            privacy_consent: self.state.flag("privacy_consent"),
        };

        let patient = self.actions.register_patient(request).await?;
        info!("患者注册完成: {}", patient.id);

        Ok(Navigation::NewAppointmentPage {
            user_id: self.user.id,
        })
    }
}
