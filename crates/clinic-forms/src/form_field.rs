//! 通用表单字段
//!
//! 把字段声明与表单状态组合为完整的字段视图：
//! 标签、控件、描述槽与校验消息槽。纯组合，无副作用。

use serde::{Deserialize, Serialize};

use crate::field::{render_control, Control, FieldKind, FieldSpec};
use crate::state::FormState;

/// 渲染后的完整字段视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldView {
    pub name: String,
    /// 复选框自带内联标签，此处为空
    pub label: Option<String>,
    pub control: Control,
    pub description: Option<String>,
    /// 字段当前的校验错误
    pub error: Option<String>,
}

/// 表单分节（注册表单按主题分节展示）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSection {
    pub title: Option<String>,
    pub fields: Vec<FieldView>,
}

impl FormSection {
    pub fn untitled(fields: Vec<FieldView>) -> Self {
        Self {
            title: None,
            fields,
        }
    }

    pub fn titled(title: impl Into<String>, fields: Vec<FieldView>) -> Self {
        Self {
            title: Some(title.into()),
            fields,
        }
    }
}

/// 渲染单个命名字段
pub fn render_field(spec: &FieldSpec, state: &FormState) -> FieldView {
    let label = match spec.kind {
        FieldKind::Checkbox => None,
        _ => Some(spec.label.clone()),
    };

    FieldView {
        name: spec.name.clone(),
        label,
        control: render_control(spec, state),
        description: spec.description.clone(),
        error: state.error(&spec.name).map(str::to_string),
    }
}
