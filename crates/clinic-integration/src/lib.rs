//! # Clinic Integration
//!
//! 后端协作方接口层：本层把用户、患者与预约的增改查视为
//! 不透明的远程调用，只负责构造载荷并转发，不实现任何持久化。

pub mod actions;
pub mod connector;

pub use actions::{
    AppointmentActions, AppointmentPatch, CreateAppointmentRequest, CreateUserRequest,
    PatientActions, RegisterPatientRequest, UpdateAppointmentRequest,
};
pub use connector::{AuthenticationConfig, BackendConfig, BackendConnector};
