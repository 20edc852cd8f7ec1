use std::fmt;

use serde::{Deserialize, Serialize};

// =========================================================
// 错误状态枚举
// =========================================================

/// 错误状态枚举
/// 会话域的错误分类：认证 / 授权 / 完整性 / 传输 / 校验
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionErrorStatus {
    /// 400: 客户端输入校验失败
    InvalidInput,
    /// 401: 认证失败（凭据错误、token 过期/无效）
    Unauthorized,
    /// 403: 授权失败（角色/权限不足）
    Forbidden,
    /// 404: 资源未找到
    NotFound,
    /// 409: 已有同类操作在进行中（single-flight 拒绝）
    Conflict,
    /// 422: 响应缺少必需字段（如 refresh 响应缺 accessToken）
    Integrity,
    /// 500: JSON 解析或序列化错误
    Serialization,
    /// 502: 网络/服务器传输错误
    Transport,
}

impl SessionErrorStatus {
    pub fn status_code(&self) -> u16 {
        match self {
            SessionErrorStatus::InvalidInput => 400,
            SessionErrorStatus::Unauthorized => 401,
            SessionErrorStatus::Forbidden => 403,
            SessionErrorStatus::NotFound => 404,
            SessionErrorStatus::Conflict => 409,
            SessionErrorStatus::Integrity => 422,
            SessionErrorStatus::Serialization => 500,
            SessionErrorStatus::Transport => 502,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            SessionErrorStatus::InvalidInput => "INVALID_INPUT",
            SessionErrorStatus::Unauthorized => "UNAUTHORIZED",
            SessionErrorStatus::Forbidden => "FORBIDDEN",
            SessionErrorStatus::NotFound => "RESOURCE_NOT_FOUND",
            SessionErrorStatus::Conflict => "OPERATION_IN_FLIGHT",
            SessionErrorStatus::Integrity => "MALFORMED_RESPONSE",
            SessionErrorStatus::Serialization => "JSON_PARSE_ERROR",
            SessionErrorStatus::Transport => "TRANSPORT_ERROR",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
/// 记录错误发生时的操作和相关细节
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorSpan {
    /// 操作名称，如 "store.get", "auth.refresh"
    pub operation: String,
    /// 额外的细节信息，如存储键名等
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// Session Domain Errors
///
/// 高内聚的错误定义：
/// - status: 错误类型/语义
/// - message: 错误消息（可直接进入 SessionState.error 供 UI 展示）
/// - source: 原始错误（可选，用于错误链）
/// - spans: 结构化的调用追踪栈
#[derive(Debug)]
pub struct SessionError {
    pub status: SessionErrorStatus,
    pub message: String,
    /// 原始错误源（供调试用，不参与序列化）
    source: Option<Box<dyn std::error::Error>>,
    /// 结构化的操作追踪
    spans: Vec<ErrorSpan>,
}

impl SessionError {
    pub fn new(status: SessionErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(SessionErrorStatus::InvalidInput, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(SessionErrorStatus::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(SessionErrorStatus::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(SessionErrorStatus::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(SessionErrorStatus::Conflict, message)
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::new(SessionErrorStatus::Integrity, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(SessionErrorStatus::Serialization, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(SessionErrorStatus::Transport, message)
    }

    // --- Context builders ---

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    /// 设置原始错误源
    pub fn with_source<E: std::error::Error + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // --- Accessors ---

    pub fn status_code(&self) -> u16 {
        self.status.status_code()
    }

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    /// 是否属于认证类错误（401 广播与 initialize 的清场判定用）
    pub fn is_unauthorized(&self) -> bool {
        self.status == SessionErrorStatus::Unauthorized
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(e: serde_json::Error) -> Self {
        SessionError::serialization(e.to_string())
    }
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_and_trace() {
        let e = SessionError::unauthorized("bad credentials")
            .in_op("auth.login")
            .in_op_with("store.get", "token");
        let rendered = e.to_string();
        assert!(rendered.contains("[UNAUTHORIZED] bad credentials"));
        assert!(rendered.contains("auth.login -> store.get(token)"));
    }

    #[test]
    fn status_code_mapping() {
        assert_eq!(SessionError::transport("x").status_code(), 502);
        assert_eq!(SessionError::integrity("x").status_code(), 422);
        assert_eq!(SessionError::conflict("x").status_code(), 409);
    }
}
