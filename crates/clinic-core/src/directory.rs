//! 静态名录配置
//!
//! 医师名录、性别选项、证件类型与注册表单默认值。
//! 作为显式配置注入各表单组件，而不是作为环境常量引用，
//! 测试时可以整体替换。

use serde::{Deserialize, Serialize};

use crate::models::Doctor;

/// 诊所静态名录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicDirectory {
    /// 医师名录
    pub doctors: Vec<Doctor>,
    /// 性别选项
    pub gender_options: Vec<String>,
    /// 证件类型
    pub identification_types: Vec<String>,
    /// 注册表单默认值
    pub patient_defaults: PatientDefaults,
}

/// 注册表单默认值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientDefaults {
    /// 默认性别选项
    pub gender: String,
    /// 默认证件类型
    pub identification_type: String,
}

impl ClinicDirectory {
    /// 名录中是否存在指定医师
    pub fn has_doctor(&self, name: &str) -> bool {
        self.doctors.iter().any(|d| d.name == name)
    }
}

impl Default for PatientDefaults {
    fn default() -> Self {
        Self {
            gender: "Male".to_string(),
            identification_type: "Birth Certificate".to_string(),
        }
    }
}

impl Default for ClinicDirectory {
    fn default() -> Self {
        let doctor = |name: &str, image: &str| Doctor {
            name: name.to_string(),
            image: image.to_string(),
        };

        Self {
            doctors: vec![
                doctor("John Green", "/assets/images/dr-green.png"),
                doctor("Leila Cameron", "/assets/images/dr-cameron.png"),
                doctor("David Livingston", "/assets/images/dr-livingston.png"),
                doctor("Evan Peter", "/assets/images/dr-peter.png"),
                doctor("Jane Powell", "/assets/images/dr-powell.png"),
                doctor("Alex Ramirez", "/assets/images/dr-remirez.png"),
                doctor("Jasmine Lee", "/assets/images/dr-lee.png"),
                doctor("Alyana Cruz", "/assets/images/dr-cruz.png"),
                doctor("Hardik Sharma", "/assets/images/dr-sharma.png"),
            ],
            gender_options: vec![
                "Male".to_string(),
                "Female".to_string(),
                "Other".to_string(),
            ],
            identification_types: vec![
                "Birth Certificate".to_string(),
                "Driver's License".to_string(),
                "Medical Insurance Card/Policy".to_string(),
                "Military ID Card".to_string(),
                "National Identity Card".to_string(),
                "Passport".to_string(),
                "Resident Alien Card (Green Card)".to_string(),
                "Social Security Card".to_string(),
                "State ID Card".to_string(),
                "Student ID Card".to_string(),
                "Voter ID Card".to_string(),
            ],
            patient_defaults: PatientDefaults::default(),
        }
    }
}
