//! 字段渲染器
//!
//! 把字段种类映射为绑定到表单状态的具体控件描述。
//! 种类集合是封闭枚举，派发在编译期穷尽；
//! 不存在"未知种类静默渲染为空"的情况。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::composite::CompositeField;
use crate::state::FormState;

/// 下拉选项（由协作方提供，例如医师名录）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub image: Option<String>,
}

impl SelectOption {
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
            image: None,
        }
    }

    pub fn with_image(value: impl Into<String>, image: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
            image: Some(image.into()),
        }
    }
}

/// 字段种类
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// 文本框，可带前置图标
    Input { icon: Option<String> },
    /// 国际电话号码控件，回写规范化号码
    Phone { default_country: String },
    /// 日期/时间控件
    DatePicker {
        show_time_select: bool,
        date_format: String,
    },
    /// 下拉框，选项由调用方传入
    Select { options: Vec<SelectOption> },
    /// 多行文本框
    Textarea,
    /// 布尔开关，标签内联
    Checkbox,
    /// 组合控件扩展点（单选组、文件上传等）
    Composite(Arc<dyn CompositeField>),
}

impl FieldKind {
    pub fn input() -> Self {
        Self::Input { icon: None }
    }

    pub fn input_with_icon(icon: impl Into<String>) -> Self {
        Self::Input {
            icon: Some(icon.into()),
        }
    }

    /// 默认国家区号沿用产品现状
    pub fn phone() -> Self {
        Self::Phone {
            default_country: "NG".to_string(),
        }
    }

    pub fn date_picker() -> Self {
        Self::DatePicker {
            show_time_select: false,
            date_format: "MM/dd/yyyy".to_string(),
        }
    }

    pub fn date_time_picker(date_format: impl Into<String>) -> Self {
        Self::DatePicker {
            show_time_select: true,
            date_format: date_format.into(),
        }
    }

    pub fn select(options: Vec<SelectOption>) -> Self {
        Self::Select { options }
    }

    pub fn composite(field: impl CompositeField + 'static) -> Self {
        Self::Composite(Arc::new(field))
    }
}

/// 单个命名表单字段的声明
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub description: Option<String>,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            placeholder: None,
            description: None,
            kind,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// 渲染后的控件描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Control {
    TextInput {
        name: String,
        placeholder: Option<String>,
        icon: Option<String>,
        value: String,
    },
    PhoneInput {
        name: String,
        placeholder: Option<String>,
        default_country: String,
        value: String,
    },
    DatePicker {
        name: String,
        placeholder: Option<String>,
        show_time_select: bool,
        date_format: String,
        value: Option<DateTime<Utc>>,
    },
    Select {
        name: String,
        placeholder: Option<String>,
        options: Vec<SelectOption>,
        selected: Option<String>,
    },
    Textarea {
        name: String,
        placeholder: Option<String>,
        value: String,
    },
    Checkbox {
        name: String,
        label: String,
        checked: bool,
    },
    RadioGroup {
        name: String,
        options: Vec<String>,
        selected: Option<String>,
    },
    FileUpload {
        name: String,
        file_name: Option<String>,
    },
}

/// 把字段声明渲染为绑定当前状态的控件
pub fn render_control(spec: &FieldSpec, state: &FormState) -> Control {
    let name = spec.name.clone();
    match &spec.kind {
        FieldKind::Input { icon } => Control::TextInput {
            placeholder: spec.placeholder.clone(),
            icon: icon.clone(),
            value: state.text(&spec.name).to_string(),
            name,
        },
        FieldKind::Phone { default_country } => Control::PhoneInput {
            placeholder: spec.placeholder.clone(),
            default_country: default_country.clone(),
            value: state.text(&spec.name).to_string(),
            name,
        },
        FieldKind::DatePicker {
            show_time_select,
            date_format,
        } => Control::DatePicker {
            placeholder: spec.placeholder.clone(),
            show_time_select: *show_time_select,
            date_format: date_format.clone(),
            value: state.datetime(&spec.name),
            name,
        },
        FieldKind::Select { options } => {
            let current = state.text(&spec.name);
            Control::Select {
                placeholder: spec.placeholder.clone(),
                options: options.clone(),
                selected: (!current.is_empty()).then(|| current.to_string()),
                name,
            }
        }
        FieldKind::Textarea => Control::Textarea {
            placeholder: spec.placeholder.clone(),
            value: state.text(&spec.name).to_string(),
            name,
        },
        FieldKind::Checkbox => Control::Checkbox {
            label: spec.label.clone(),
            checked: state.flag(&spec.name),
            name,
        },
        FieldKind::Composite(field) => field.render(spec, state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_rendering() {
        let mut state = FormState::new();
        state.set_text("name", "Jane Doe");
        let spec = FieldSpec::new("name", "Full name", FieldKind::input_with_icon("/assets/icons/user.svg"))
            .with_placeholder("John Doe");

        match render_control(&spec, &state) {
            Control::TextInput {
                name, icon, value, ..
            } => {
                assert_eq!(name, "name");
                assert_eq!(icon.as_deref(), Some("/assets/icons/user.svg"));
                assert_eq!(value, "Jane Doe");
            }
            other => panic!("unexpected control: {:?}", other),
        }
    }

    #[test]
    fn test_phone_rendering_defaults_country() {
        let state = FormState::new();
        let spec = FieldSpec::new("phone", "Phone number", FieldKind::phone());

        match render_control(&spec, &state) {
            Control::PhoneInput {
                default_country, ..
            } => assert_eq!(default_country, "NG"),
            other => panic!("unexpected control: {:?}", other),
        }
    }

    #[test]
    fn test_select_rendering_reports_selection() {
        let mut state = FormState::new();
        let spec = FieldSpec::new(
            "primary_physician",
            "Primary Physician",
            FieldKind::select(vec![
                SelectOption::with_image("John Green", "/assets/images/dr-green.png"),
                SelectOption::with_image("Leila Cameron", "/assets/images/dr-cameron.png"),
            ]),
        );

        match render_control(&spec, &state) {
            Control::Select { selected, .. } => assert!(selected.is_none()),
            other => panic!("unexpected control: {:?}", other),
        }

        state.set_text("primary_physician", "Leila Cameron");
        match render_control(&spec, &state) {
            Control::Select {
                selected, options, ..
            } => {
                assert_eq!(selected.as_deref(), Some("Leila Cameron"));
                assert_eq!(options.len(), 2);
            }
            other => panic!("unexpected control: {:?}", other),
        }
    }

    #[test]
    fn test_checkbox_carries_inline_label() {
        let mut state = FormState::new();
        state.set_flag("privacy_consent", true);
        let spec = FieldSpec::new(
            "privacy_consent",
            "I acknowledge that I have reviewed and agree to the privacy policy",
            FieldKind::Checkbox,
        );

        match render_control(&spec, &state) {
            Control::Checkbox { label, checked, .. } => {
                assert!(checked);
                assert!(label.starts_with("I acknowledge"));
            }
            other => panic!("unexpected control: {:?}", other),
        }
    }

    #[test]
    fn test_date_picker_rendering() {
        let mut state = FormState::new();
        let now = Utc::now();
        state.set_datetime("schedule", now);
        let spec = FieldSpec::new(
            "schedule",
            "Expected appointment date",
            FieldKind::date_time_picker("MM/dd/yyyy - h:mm aa"),
        );

        match render_control(&spec, &state) {
            Control::DatePicker {
                show_time_select,
                date_format,
                value,
                ..
            } => {
                assert!(show_time_select);
                assert_eq!(date_format, "MM/dd/yyyy - h:mm aa");
                assert_eq!(value, Some(now));
            }
            other => panic!("unexpected control: {:?}", other),
        }
    }
}
