//! 远程调用网关
//!
//! gloo-net 封装：统一拼接 base URL、附加 Bearer 认证头、
//! 按状态码分类错误并提取 `{message}` 错误体。401 时向 window
//! 广播 `auth:unauthorized` 事件，由认证层统一清场。

use async_trait::async_trait;
use classdesk_session::{SessionError, SessionProvider, SessionResult};
use classdesk_shared::{
    Announcement, AuthPayload, ChangePasswordRequest, Fee, ForgotPasswordRequest, LoginRequest,
    MessageResponse, Page, RefreshRequest, RegisterRequest, ResetPasswordRequest, SchoolClass,
    Section, Student, Subject, Teacher, User, STORAGE_TOKEN,
};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;

use crate::web::storage::LocalStorage;

/// 默认后端地址（可通过编译期环境变量 CLASSDESK_API_URL 覆盖）
const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// 向 window 广播 401 事件
fn dispatch_unauthorized() {
    if let Some(window) = web_sys::window() {
        if let Ok(event) = web_sys::CustomEvent::new("auth:unauthorized") {
            let _ = window.dispatch_event(&event);
        }
    }
}

/// 学校 ERP 后端网关
#[derive(Clone, Debug, PartialEq)]
pub struct SchoolApi {
    base_url: String,
}

impl Default for SchoolApi {
    fn default() -> Self {
        Self::new()
    }
}

impl SchoolApi {
    pub fn new() -> Self {
        Self::with_base_url(option_env!("CLASSDESK_API_URL").unwrap_or(DEFAULT_BASE_URL))
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 附加 Bearer 认证头（无持久化 token 时不附加）
    fn with_auth(builder: RequestBuilder) -> RequestBuilder {
        match LocalStorage::get(STORAGE_TOKEN) {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }

    /// 按状态码分类非 2xx 响应
    ///
    /// 错误体若携带 `{message}` 则透传给 UI。401 额外广播
    /// `auth:unauthorized`；不做静默刷新重试，token 刷新是
    /// 显式的会话迁移（见 machine::refresh）。
    async fn classify(path: &str, response: Response) -> SessionResult<Response> {
        if response.ok() {
            return Ok(response);
        }

        let status = response.status();
        let message = response
            .json::<MessageResponse>()
            .await
            .ok()
            .map(|m| m.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Request failed with status {status}"));

        let error = match status {
            400 => SessionError::invalid_input(message),
            401 => {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "[Api] 401 Unauthorized on {path}"
                )));
                dispatch_unauthorized();
                SessionError::unauthorized(message)
            }
            403 => {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "[Api] 403 Forbidden on {path}"
                )));
                SessionError::forbidden(message)
            }
            404 => {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "[Api] 404 Not Found on {path}"
                )));
                SessionError::not_found(message)
            }
            409 => SessionError::conflict(message),
            422 => SessionError::integrity(message),
            s if s >= 500 => {
                web_sys::console::error_1(&JsValue::from_str(&format!(
                    "[Api] Server error {s} on {path}"
                )));
                SessionError::transport(message)
            }
            _ => SessionError::transport(message),
        };

        Err(error.in_op_with("api.request", path))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> SessionResult<T> {
        let response = Self::with_auth(Request::get(&self.url(path)))
            .send()
            .await
            .map_err(|e| {
                SessionError::transport("Network request failed")
                    .with_source(e)
                    .in_op_with("api.get", path)
            })?;

        let response = Self::classify(path, response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| SessionError::serialization(e.to_string()).in_op_with("api.get", path))
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> SessionResult<T> {
        let response = Self::with_auth(Request::post(&self.url(path)))
            .header("Content-Type", "application/json")
            .json(body)
            .map_err(|e| {
                SessionError::serialization(e.to_string()).in_op_with("api.post", path)
            })?
            .send()
            .await
            .map_err(|e| {
                SessionError::transport("Network request failed")
                    .with_source(e)
                    .in_op_with("api.post", path)
            })?;

        let response = Self::classify(path, response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| SessionError::serialization(e.to_string()).in_op_with("api.post", path))
    }

    /// 无请求体的 POST（如登出）
    async fn post_empty(&self, path: &str) -> SessionResult<()> {
        let response = Self::with_auth(Request::post(&self.url(path)))
            .send()
            .await
            .map_err(|e| {
                SessionError::transport("Network request failed")
                    .with_source(e)
                    .in_op_with("api.post", path)
            })?;

        Self::classify(path, response).await?;
        Ok(())
    }

    // =========================================================
    // 密码找回 / 修改
    // =========================================================

    pub async fn forgot_password(&self, email: &str) -> SessionResult<MessageResponse> {
        let body = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.post_json("/auth/forgot-password", &body).await
    }

    pub async fn reset_password(
        &self,
        token: &str,
        password: &str,
    ) -> SessionResult<MessageResponse> {
        let body = ResetPasswordRequest {
            token: token.to_string(),
            password: password.to_string(),
        };
        self.post_json("/auth/reset-password", &body).await
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> SessionResult<MessageResponse> {
        let body = ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.post_json("/auth/change-password", &body).await
    }

    // =========================================================
    // 实体列表
    // =========================================================

    pub async fn get_classes(&self) -> SessionResult<Page<SchoolClass>> {
        self.get_json("/school/classes").await
    }

    pub async fn get_sections(&self) -> SessionResult<Page<Section>> {
        self.get_json("/school/sections").await
    }

    pub async fn get_subjects(&self) -> SessionResult<Page<Subject>> {
        self.get_json("/school/subjects").await
    }

    pub async fn get_students(&self) -> SessionResult<Page<Student>> {
        self.get_json("/school/students").await
    }

    pub async fn get_teachers(&self) -> SessionResult<Page<Teacher>> {
        self.get_json("/school/teachers").await
    }

    pub async fn get_fees(&self) -> SessionResult<Page<Fee>> {
        self.get_json("/finance/fees").await
    }

    pub async fn get_announcements(&self) -> SessionResult<Page<Announcement>> {
        self.get_json("/communication/announcements").await
    }
}

// =========================================================
// 会话提供方实现（真实 HTTP 路径）
// =========================================================

#[async_trait(?Send)]
impl SessionProvider for SchoolApi {
    async fn login(&self, credentials: &LoginRequest) -> SessionResult<AuthPayload> {
        self.post_json("/auth/login", credentials).await
    }

    async fn register(&self, data: &RegisterRequest) -> SessionResult<()> {
        let _: MessageResponse = self.post_json("/auth/register", data).await?;
        Ok(())
    }

    async fn refresh(&self, refresh_token: &str) -> SessionResult<AuthPayload> {
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.post_json("/auth/refresh", &body).await
    }

    async fn logout(&self) -> SessionResult<()> {
        self.post_empty("/auth/logout").await
    }

    async fn fetch_profile(&self) -> SessionResult<User> {
        self.get_json("/auth/profile").await
    }
}
