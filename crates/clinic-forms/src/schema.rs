//! 表单校验
//!
//! 提交前的声明式逐字段校验；失败的字段在提交被阻止的同时
//! 得到各自的错误消息，后端调用不会发生。

use std::collections::HashMap;

use regex::Regex;

use clinic_core::AppointmentMode;

use crate::state::FormState;

/// 字段校验规则
#[derive(Debug, Clone)]
pub enum Rule {
    /// 文本非空
    Required,
    /// 非空时的长度区间
    Length { min: usize, max: usize },
    /// 电子邮箱格式
    Email,
    /// 国际电话格式（+ 后接10–15位数字）
    Phone,
    /// 必须选择日期
    RequiredDate,
    /// 复选框必须勾选
    Accepted,
}

/// 单字段规则集
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub field: String,
    pub label: String,
    pub rules: Vec<Rule>,
}

impl FieldRules {
    pub fn new(field: impl Into<String>, label: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            rules,
        }
    }
}

/// 校验结果
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    errors: HashMap<String, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn into_errors(self) -> HashMap<String, String> {
        self.errors
    }

    /// 记录字段错误；保留该字段最先命中的规则消息
    fn add(&mut self, field: &str, message: String) {
        self.errors.entry(field.to_string()).or_insert(message);
    }
}

/// 表单校验模式
#[derive(Debug)]
pub struct Schema {
    fields: Vec<FieldRules>,
    email_re: Regex,
    phone_re: Regex,
}

impl Schema {
    pub fn new(fields: Vec<FieldRules>) -> Self {
        Self {
            fields,
            email_re: Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap(),
            phone_re: Regex::new(r"^\+\d{10,15}$").unwrap(),
        }
    }

    /// 校验整个表单状态
    pub fn validate(&self, state: &FormState) -> ValidationReport {
        let mut report = ValidationReport::default();

        for field in &self.fields {
            for rule in &field.rules {
                match rule {
                    Rule::Required => {
                        if state.text(&field.field).trim().is_empty() {
                            report.add(&field.field, format!("{} is required", field.label));
                        }
                    }
                    Rule::Length { min, max } => {
                        let value = state.text(&field.field).trim();
                        if !value.is_empty() && (value.chars().count() < *min || value.chars().count() > *max) {
                            report.add(
                                &field.field,
                                format!(
                                    "{} must be between {} and {} characters",
                                    field.label, min, max
                                ),
                            );
                        }
                    }
                    Rule::Email => {
                        let value = state.text(&field.field).trim();
                        if !value.is_empty() && !self.email_re.is_match(value) {
                            report.add(&field.field, "Invalid email address".to_string());
                        }
                    }
                    Rule::Phone => {
                        let value = state.text(&field.field).trim();
                        if !value.is_empty() && !self.phone_re.is_match(value) {
                            report.add(&field.field, "Invalid phone number".to_string());
                        }
                    }
                    Rule::RequiredDate => {
                        if state.datetime(&field.field).is_none() {
                            report.add(&field.field, format!("{} is required", field.label));
                        }
                    }
                    Rule::Accepted => {
                        if !state.flag(&field.field) {
                            report.add(
                                &field.field,
                                format!("You must consent to {} in order to proceed", field.label),
                            );
                        }
                    }
                }
            }
        }

        report
    }
}

/// 登记表单校验模式
pub fn user_schema() -> Schema {
    Schema::new(vec![
        FieldRules::new(
            "name",
            "Name",
            vec![Rule::Required, Rule::Length { min: 2, max: 50 }],
        ),
        FieldRules::new("email", "Email", vec![Rule::Required, Rule::Email]),
        FieldRules::new("phone", "Phone number", vec![Rule::Required, Rule::Phone]),
    ])
}

/// 注册表单校验模式
pub fn patient_schema() -> Schema {
    Schema::new(vec![
        FieldRules::new(
            "name",
            "Name",
            vec![Rule::Required, Rule::Length { min: 2, max: 50 }],
        ),
        FieldRules::new("email", "Email", vec![Rule::Required, Rule::Email]),
        FieldRules::new("phone", "Phone number", vec![Rule::Required, Rule::Phone]),
        FieldRules::new("birth_date", "Date of birth", vec![Rule::RequiredDate]),
        FieldRules::new("gender", "Gender", vec![Rule::Required]),
        FieldRules::new(
            "address",
            "Address",
            vec![Rule::Required, Rule::Length { min: 5, max: 500 }],
        ),
        FieldRules::new(
            "occupation",
            "Occupation",
            vec![Rule::Required, Rule::Length { min: 2, max: 500 }],
        ),
        FieldRules::new(
            "emergency_contact_name",
            "Emergency contact name",
            vec![Rule::Required, Rule::Length { min: 2, max: 50 }],
        ),
        FieldRules::new(
            "emergency_contact_number",
            "Emergency contact number",
            vec![Rule::Required, Rule::Phone],
        ),
        FieldRules::new(
            "primary_physician",
            "Primary physician",
            vec![Rule::Required],
        ),
        FieldRules::new(
            "insurance_provider",
            "Insurance provider",
            vec![Rule::Required, Rule::Length { min: 2, max: 50 }],
        ),
        FieldRules::new(
            "insurance_policy_number",
            "Insurance policy number",
            vec![Rule::Required, Rule::Length { min: 2, max: 50 }],
        ),
        FieldRules::new(
            "treatment_consent",
            "treatment",
            vec![Rule::Accepted],
        ),
        FieldRules::new(
            "disclosure_consent",
            "disclosure",
            vec![Rule::Accepted],
        ),
        FieldRules::new("privacy_consent", "privacy", vec![Rule::Accepted]),
    ])
}

/// 预约表单校验模式
///
/// 三种模式共用同一构造函数，但必填集按模式叠加：
/// 取消模式只要求取消原因，其余模式要求完整字段集。
pub fn appointment_schema(mode: AppointmentMode) -> Schema {
    match mode {
        AppointmentMode::Create | AppointmentMode::Schedule => Schema::new(vec![
            FieldRules::new(
                "primary_physician",
                "Primary physician",
                vec![Rule::Required],
            ),
            FieldRules::new(
                "schedule",
                "Expected appointment date",
                vec![Rule::RequiredDate],
            ),
            FieldRules::new(
                "reason",
                "Reason for appointment",
                vec![Rule::Required, Rule::Length { min: 2, max: 500 }],
            ),
            FieldRules::new("note", "Additional comments", vec![Rule::Length { min: 2, max: 500 }]),
        ]),
        AppointmentMode::Cancel => Schema::new(vec![FieldRules::new(
            "cancellation_reason",
            "Reason for cancellation",
            vec![Rule::Required, Rule::Length { min: 2, max: 500 }],
        )]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields_blocked_when_empty() {
        let schema = user_schema();
        let state = FormState::new();

        let report = schema.validate(&state);
        assert!(!report.is_valid());
        assert_eq!(report.error("name"), Some("Name is required"));
        assert_eq!(report.error("email"), Some("Email is required"));
        assert_eq!(report.error("phone"), Some("Phone number is required"));
    }

    #[test]
    fn test_well_formed_user_passes() {
        let schema = user_schema();
        let mut state = FormState::new();
        state.set_text("name", "Jane Doe");
        state.set_text("email", "jane@example.com");
        state.set_text("phone", "+2348022894950");

        assert!(schema.validate(&state).is_valid());
    }

    #[test]
    fn test_email_format() {
        let schema = user_schema();
        let mut state = FormState::new();
        state.set_text("name", "Jane Doe");
        state.set_text("email", "not-an-email");
        state.set_text("phone", "+2348022894950");

        let report = schema.validate(&state);
        assert_eq!(report.error("email"), Some("Invalid email address"));
    }

    #[test]
    fn test_phone_format() {
        let schema = user_schema();
        let mut state = FormState::new();
        state.set_text("name", "Jane Doe");
        state.set_text("email", "jane@example.com");

        // 缺少加号前缀
        state.set_text("phone", "2348022894950");
        assert_eq!(
            schema.validate(&state).error("phone"),
            Some("Invalid phone number")
        );

        // 位数不足
        state.set_text("phone", "+12345");
        assert_eq!(
            schema.validate(&state).error("phone"),
            Some("Invalid phone number")
        );
    }

    #[test]
    fn test_length_bounds() {
        let schema = user_schema();
        let mut state = FormState::new();
        state.set_text("name", "J");
        state.set_text("email", "jane@example.com");
        state.set_text("phone", "+2348022894950");

        let report = schema.validate(&state);
        assert_eq!(
            report.error("name"),
            Some("Name must be between 2 and 50 characters")
        );
    }

    #[test]
    fn test_consents_must_be_accepted() {
        let schema = patient_schema();
        let mut state = FormState::new();

        let report = schema.validate(&state);
        assert!(report.error("treatment_consent").is_some());
        assert!(report.error("disclosure_consent").is_some());
        assert!(report.error("privacy_consent").is_some());
    }

    #[test]
    fn test_cancel_schema_requires_only_reason() {
        let schema = appointment_schema(AppointmentMode::Cancel);
        let state = FormState::new();

        let report = schema.validate(&state);
        assert!(report.error("cancellation_reason").is_some());
        assert!(report.error("primary_physician").is_none());
        assert!(report.error("schedule").is_none());
    }

    #[test]
    fn test_create_schema_requires_full_set() {
        let schema = appointment_schema(AppointmentMode::Create);
        let state = FormState::new();

        let report = schema.validate(&state);
        assert!(report.error("primary_physician").is_some());
        assert!(report.error("schedule").is_some());
        assert!(report.error("reason").is_some());
        // 备注可选
        assert!(report.error("note").is_none());
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let schema = user_schema();
        let mut state = FormState::new();
        state.set_text("email", "jane@example.com");
        state.set_text("phone", "+2348022894950");

        // name 同时命中 Required；只报告一条
        let report = schema.validate(&state);
        assert_eq!(report.error("name"), Some("Name is required"));
    }
}
