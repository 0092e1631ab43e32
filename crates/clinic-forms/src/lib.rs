//! # Clinic Forms
//!
//! 表单呈现层：字段渲染器、通用表单字段、表单状态与校验，
//! 以及三张业务表单（登记、注册、预约）。
//!
//! 表单自身只负责渲染控件描述、本地校验和调用后端动作；
//! 实体生命周期归后端所有。

pub mod appointment_form;
pub mod composite;
pub mod field;
pub mod form_field;
pub mod navigation;
pub mod patient_form;
pub mod register_form;
pub mod schema;
pub mod state;

pub use appointment_form::AppointmentForm;
pub use composite::{CompositeField, FileUploadField, RadioGroupField};
pub use field::{Control, FieldKind, FieldSpec, SelectOption};
pub use form_field::{render_field, FieldView, FormSection};
pub use navigation::Navigation;
pub use patient_form::PatientIntakeForm;
pub use register_form::RegisterForm;
pub use schema::{appointment_schema, patient_schema, user_schema, Rule, Schema, ValidationReport};
pub use state::{FormState, FormValue};
