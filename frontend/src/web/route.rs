//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖 DOM 或 web_sys。
//! 定义应用的所有路由及其守卫属性（是否需认证、所需角色）。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 注册页面
    Register,
    /// 找回密码
    ForgotPassword,
    /// 演示模式入口
    DemoEntry,
    /// 控制面板 (需要认证)
    Dashboard,
    /// 班级管理
    Classes,
    /// 分部管理
    Sections,
    /// 科目管理
    Subjects,
    /// 学生名册
    Students,
    /// 教师名册
    Teachers,
    /// 费用管理 (仅 admin)
    Fees,
    /// 公告
    Announcements,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/login" => Self::Login,
            "/register" => Self::Register,
            "/forgot-password" => Self::ForgotPassword,
            "/demo" => Self::DemoEntry,
            "/app" | "/app/dashboard" => Self::Dashboard,
            "/app/school/classes" => Self::Classes,
            "/app/school/sections" => Self::Sections,
            "/app/school/subjects" => Self::Subjects,
            "/app/school/students" => Self::Students,
            "/app/school/teachers" => Self::Teachers,
            "/app/finance/fees" => Self::Fees,
            "/app/communication/announcements" => Self::Announcements,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::ForgotPassword => "/forgot-password",
            Self::DemoEntry => "/demo",
            Self::Dashboard => "/app/dashboard",
            Self::Classes => "/app/school/classes",
            Self::Sections => "/app/school/sections",
            Self::Subjects => "/app/school/subjects",
            Self::Students => "/app/school/students",
            Self::Teachers => "/app/school/teachers",
            Self::Fees => "/app/finance/fees",
            Self::Announcements => "/app/communication/announcements",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫属性：该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        self.to_path().starts_with("/app")
    }

    /// 该路由要求的角色列表（空 = 任何已认证用户）
    pub fn required_roles(&self) -> &'static [&'static str] {
        match self {
            Self::Fees => &["admin"],
            _ => &[],
        }
    }

    /// 已认证用户是否应该离开此路由（登录/注册等公共入口）
    pub fn public_only(&self) -> bool {
        matches!(
            self,
            Self::Login | Self::Register | Self::ForgotPassword | Self::DemoEntry
        )
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 认证成功时的默认落地页
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_roundtrip() {
        for route in [
            AppRoute::Register,
            AppRoute::Dashboard,
            AppRoute::Fees,
            AppRoute::Announcements,
        ] {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
    }

    #[test]
    fn app_index_lands_on_dashboard() {
        assert_eq!(AppRoute::from_path("/app"), AppRoute::Dashboard);
    }

    #[test]
    fn guard_attributes() {
        assert!(AppRoute::Fees.requires_auth());
        assert_eq!(AppRoute::Fees.required_roles(), &["admin"]);
        assert!(AppRoute::Login.public_only());
        assert!(!AppRoute::Dashboard.public_only());
        assert!(!AppRoute::Login.requires_auth());
    }
}
