//! 后端HTTP连接器
//!
//! 以HTTP方式实现后端动作接口，支持：
//! - 常见认证方式（API密钥、Bearer令牌、基础认证）
//! - 证件文件的多部分上传，保留申报文件名
//! - 连接健康检查
//!
//! 未对挂起的请求设置超时或取消；请求悬挂时表单停留在提交中状态。

use async_trait::async_trait;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use clinic_core::{Appointment, ClinicError, Patient, Result, User};

use crate::actions::{
    AppointmentActions, CreateAppointmentRequest, CreateUserRequest, PatientActions,
    RegisterPatientRequest, UpdateAppointmentRequest,
};

/// 认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AuthenticationConfig {
    None,
    BasicAuth { username: String, password: String },
    ApiKey { key: String, header: Option<String> },
    BearerToken { token: String },
}

/// 后端连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// 服务端点，例如 http://localhost:9000/api/v1
    pub endpoint: String,
    /// 认证方式
    pub authentication: AuthenticationConfig,
}

impl BackendConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            authentication: AuthenticationConfig::None,
        }
    }
}

/// 后端连接器
pub struct BackendConnector {
    config: BackendConfig,
    client: reqwest::Client,
}

impl BackendConnector {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// 拼接请求地址
    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// 添加认证头
    fn add_auth_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.authentication {
            AuthenticationConfig::None => request,
            AuthenticationConfig::BasicAuth { username, password } => {
                request.basic_auth(username, Some(password))
            }
            AuthenticationConfig::ApiKey { key, header } => {
                let header_name = header.as_deref().unwrap_or("X-API-Key");
                request.header(header_name, key)
            }
            AuthenticationConfig::BearerToken { token } => request.bearer_auth(token),
        }
    }

    /// 检查后端连接状态
    pub async fn check_connection(&self) -> bool {
        let request = self.add_auth_headers(self.client.get(self.url("/health")));
        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Backend health check failed: {}", e);
                false
            }
        }
    }

    /// 发送请求并解析JSON响应
    async fn send_json<T>(&self, request: reqwest::RequestBuilder, what: &str) -> Result<T>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let response = request
            .send()
            .await
            .map_err(|e| ClinicError::Network(format!("{}: {}", what, e)))?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ClinicError::Backend(format!("{}: invalid response body: {}", what, e)))
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Err(ClinicError::NotFound(what.to_string()))
        } else {
            Err(ClinicError::Backend(format!("{}: {}", what, status)))
        }
    }
}

#[async_trait]
impl PatientActions for BackendConnector {
    async fn create_user(&self, request: CreateUserRequest) -> Result<User> {
        debug!("Creating user: {}", request.email);
        let builder = self
            .add_auth_headers(self.client.post(self.url("/users")))
            .json(&request);
        let user: User = self.send_json(builder, "create user").await?;
        info!("User created: {}", user.id);
        Ok(user)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<User> {
        let builder = self.add_auth_headers(self.client.get(self.url(&format!("/users/{}", user_id))));
        self.send_json(builder, "get user").await
    }

    async fn register_patient(&self, request: RegisterPatientRequest) -> Result<Patient> {
        debug!("Registering patient for user {}", request.user_id);

        let builder = if let Some(document) = &request.identification_document {
            // 文件与表单数据分离：JSON元数据 + 文件部分，保留申报文件名
            let metadata = serde_json::to_string(&request)?;
            let part = multipart::Part::bytes(document.data.clone())
                .file_name(document.file_name.clone())
                .mime_str(&document.content_type)
                .map_err(|e| ClinicError::Validation(format!("无效的文件内容类型: {}", e)))?;
            let form = multipart::Form::new()
                .text("patient", metadata)
                .part("identification_document", part);
            self.add_auth_headers(self.client.post(self.url("/patients")))
                .multipart(form)
        } else {
            self.add_auth_headers(self.client.post(self.url("/patients")))
                .json(&request)
        };

        let patient: Patient = self.send_json(builder, "register patient").await?;
        info!("Patient registered: {}", patient.id);
        Ok(patient)
    }

    async fn get_patient(&self, user_id: Uuid) -> Result<Patient> {
        let builder =
            self.add_auth_headers(self.client.get(self.url(&format!("/patients/{}", user_id))));
        self.send_json(builder, "get patient").await
    }
}

#[async_trait]
impl AppointmentActions for BackendConnector {
    async fn create_appointment(&self, request: CreateAppointmentRequest) -> Result<Appointment> {
        debug!(
            "Creating appointment for patient {} with {}",
            request.patient_id, request.primary_physician
        );
        let builder = self
            .add_auth_headers(self.client.post(self.url("/appointments")))
            .json(&request);
        let appointment: Appointment = self.send_json(builder, "create appointment").await?;
        info!("Appointment created: {}", appointment.id);
        Ok(appointment)
    }

    async fn update_appointment(&self, request: UpdateAppointmentRequest) -> Result<Appointment> {
        debug!(
            "Updating appointment {} ({})",
            request.appointment_id,
            request.mode.as_str()
        );
        let builder = self
            .add_auth_headers(
                self.client
                    .patch(self.url(&format!("/appointments/{}", request.appointment_id))),
            )
            .json(&request);
        let appointment: Appointment = self.send_json(builder, "update appointment").await?;
        info!(
            "Appointment {} updated to {}",
            appointment.id,
            appointment.status.as_str()
        );
        Ok(appointment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector(auth: AuthenticationConfig) -> BackendConnector {
        BackendConnector::new(BackendConfig {
            endpoint: "http://localhost:9000/api/v1/".to_string(),
            authentication: auth,
        })
    }

    #[test]
    fn test_url_joining() {
        let c = connector(AuthenticationConfig::None);
        assert_eq!(c.url("/users"), "http://localhost:9000/api/v1/users");
        assert_eq!(c.url("users"), "http://localhost:9000/api/v1/users");
    }

    #[test]
    fn test_api_key_header() {
        let c = connector(AuthenticationConfig::ApiKey {
            key: "secret".to_string(),
            header: None,
        });
        let request = c
            .add_auth_headers(c.client.get("http://localhost/x"))
            .build()
            .unwrap();
        assert_eq!(request.headers().get("X-API-Key").unwrap(), "secret");
    }

    #[test]
    fn test_bearer_token_header() {
        let c = connector(AuthenticationConfig::BearerToken {
            token: "t0ken".to_string(),
        });
        let request = c
            .add_auth_headers(c.client.get("http://localhost/x"))
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get("Authorization").unwrap(),
            "Bearer t0ken"
        );
    }
}
