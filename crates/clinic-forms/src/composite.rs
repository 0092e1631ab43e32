//! 组合控件扩展点
//!
//! 固定字段种类之外的复合控件（单选组、文件上传）通过
//! 该trait接入，替代开放式渲染回调。

use std::fmt::Debug;

use crate::field::{Control, FieldSpec};
use crate::state::FormState;

/// 组合控件能力接口
pub trait CompositeField: Debug + Send + Sync {
    /// 渲染绑定当前状态的组合控件
    fn render(&self, spec: &FieldSpec, state: &FormState) -> Control;
}

/// 单选组（例如性别选项）
#[derive(Debug, Clone)]
pub struct RadioGroupField {
    pub options: Vec<String>,
}

impl RadioGroupField {
    pub fn new(options: Vec<String>) -> Self {
        Self { options }
    }
}

impl CompositeField for RadioGroupField {
    fn render(&self, spec: &FieldSpec, state: &FormState) -> Control {
        let current = state.text(&spec.name);
        Control::RadioGroup {
            name: spec.name.clone(),
            options: self.options.clone(),
            selected: (!current.is_empty()).then(|| current.to_string()),
        }
    }
}

/// 单文件上传（证件扫描件）
#[derive(Debug, Clone, Default)]
pub struct FileUploadField;

impl CompositeField for FileUploadField {
    fn render(&self, spec: &FieldSpec, state: &FormState) -> Control {
        Control::FileUpload {
            name: spec.name.clone(),
            file_name: state
                .document(&spec.name)
                .map(|doc| doc.file_name.clone()),
        }
    }
}
