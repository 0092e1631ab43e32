//! 表单状态管理
//!
//! 每个表单实例独占一份本地状态：字段值、逐字段错误、
//! 提交进行中标志与用户可见的错误横幅。
//! 表单实例之间不共享任何可变资源。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use clinic_core::{utils, DocumentPayload};

/// 表单字段值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FormValue {
    Text(String),
    Flag(bool),
    DateTime(DateTime<Utc>),
    Document(DocumentPayload),
}

/// 表单本地状态
#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: HashMap<String, FormValue>,
    defaults: HashMap<String, FormValue>,
    errors: HashMap<String, String>,
    submitting: bool,
    banner: Option<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以默认值初始化；reset() 会恢复到这组默认值
    pub fn with_defaults(defaults: HashMap<String, FormValue>) -> Self {
        Self {
            values: defaults.clone(),
            defaults,
            ..Self::default()
        }
    }

    pub fn set_text(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), FormValue::Text(value.into()));
        self.errors.remove(name);
    }

    /// 写入规范化后的电话号码
    pub fn set_phone(&mut self, name: &str, raw: &str) {
        self.set_text(name, utils::normalize_phone(raw));
    }

    pub fn set_flag(&mut self, name: &str, value: bool) {
        self.values.insert(name.to_string(), FormValue::Flag(value));
        self.errors.remove(name);
    }

    pub fn set_datetime(&mut self, name: &str, value: DateTime<Utc>) {
        self.values.insert(name.to_string(), FormValue::DateTime(value));
        self.errors.remove(name);
    }

    pub fn set_document(&mut self, name: &str, document: DocumentPayload) {
        self.values
            .insert(name.to_string(), FormValue::Document(document));
        self.errors.remove(name);
    }

    pub fn clear_value(&mut self, name: &str) {
        self.values.remove(name);
    }

    /// 字段文本值；缺失或非文本时为空串
    pub fn text(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(FormValue::Text(s)) => s,
            _ => "",
        }
    }

    /// 字段布尔值；缺失或非布尔时为 false
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(FormValue::Flag(true)))
    }

    pub fn datetime(&self, name: &str) -> Option<DateTime<Utc>> {
        match self.values.get(name) {
            Some(FormValue::DateTime(dt)) => Some(*dt),
            _ => None,
        }
    }

    pub fn document(&self, name: &str) -> Option<&DocumentPayload> {
        match self.values.get(name) {
            Some(FormValue::Document(doc)) => Some(doc),
            _ => None,
        }
    }

    pub fn set_errors(&mut self, errors: HashMap<String, String>) {
        self.errors = errors;
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn errors(&self) -> &HashMap<String, String> {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 占用提交标志
    ///
    /// 提交已在进行时返回 false，调用方必须放弃本次提交；
    /// 对应的后端调用因此最多发生一次。
    pub fn begin_submit(&mut self) -> bool {
        if self.submitting {
            warn!("提交仍在进行中，忽略重复提交");
            return false;
        }
        self.submitting = true;
        self.banner = None;
        true
    }

    /// 清除提交标志；成功与失败路径都必须调用
    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// 设置用户可见的错误横幅
    pub fn set_banner(&mut self, message: impl Into<String>) {
        self.banner = Some(message.into());
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// 恢复默认值，清除错误与横幅
    pub fn reset(&mut self) {
        self.values = self.defaults.clone();
        self.errors.clear();
        self.banner = None;
        self.submitting = false;
    }
}
