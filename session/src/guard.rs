//! 路由守卫决策
//!
//! 纯决策函数，无副作用：输入会话状态，输出 Allow / Redirect / Deny。
//! 渲染与导航由前端路由层根据决策执行。

use crate::machine::SessionState;

/// 守卫决策结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// 会话仍在加载，先渲染占位，不做裁决
    Loading,
    /// 放行
    Allow,
    /// 未认证：重定向到登录入口，保留原始请求路径供登录后返回
    RedirectToLogin { from: String },
    /// 已认证但角色不满足：渲染拒绝访问视图
    Denied,
    /// 已认证用户访问公共页（登录/注册）：送回默认落地页
    RedirectToDashboard,
}

/// 私有守卫：受保护页面的准入裁决
///
/// 角色规则：`required_roles` 非空时，用户的 `role` 或 `roles[]`
/// 必须与之相交；没有隐式 admin 放行。
pub fn check_private(
    state: &SessionState,
    requested_path: &str,
    required_roles: &[&str],
) -> GuardDecision {
    if state.is_loading {
        return GuardDecision::Loading;
    }

    if !state.is_authenticated {
        return GuardDecision::RedirectToLogin {
            from: requested_path.to_string(),
        };
    }

    if !required_roles.is_empty() {
        match &state.user {
            Some(user) if user.has_any_role(required_roles) => {}
            _ => return GuardDecision::Denied,
        }
    }

    GuardDecision::Allow
}

/// 公共守卫：阻止已认证用户（含演示模式）回到登录/注册页
pub fn check_public(state: &SessionState) -> GuardDecision {
    if state.is_authenticated {
        GuardDecision::RedirectToDashboard
    } else {
        GuardDecision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::demo_user;
    use classdesk_shared::User;

    fn authenticated(user: User) -> SessionState {
        SessionState {
            user: Some(user),
            token: Some("tok".into()),
            refresh_token: Some("ref".into()),
            is_authenticated: true,
            ..SessionState::default()
        }
    }

    fn teacher() -> User {
        let mut u = demo_user();
        u.role = "teacher".into();
        u.roles = vec!["teacher".into()];
        u
    }

    #[test]
    fn loading_defers_the_decision() {
        let state = SessionState {
            is_loading: true,
            ..SessionState::default()
        };
        assert_eq!(check_private(&state, "/app/fees", &[]), GuardDecision::Loading);
    }

    #[test]
    fn anonymous_is_redirected_with_original_path() {
        let state = SessionState::default();
        assert_eq!(
            check_private(&state, "/app/school/classes", &[]),
            GuardDecision::RedirectToLogin {
                from: "/app/school/classes".into()
            }
        );
    }

    #[test]
    fn role_requirement_denies_teacher_for_admin_page() {
        let state = authenticated(teacher());
        assert_eq!(
            check_private(&state, "/app/finance/fees", &["admin"]),
            GuardDecision::Denied
        );
    }

    #[test]
    fn roles_list_grants_access_even_when_primary_role_differs() {
        let mut user = teacher();
        user.roles.push("admin".into());
        let state = authenticated(user);
        assert_eq!(
            check_private(&state, "/app/finance/fees", &["admin"]),
            GuardDecision::Allow
        );
    }

    #[test]
    fn no_role_requirement_allows_any_authenticated_user() {
        let state = authenticated(teacher());
        assert_eq!(check_private(&state, "/app/dashboard", &[]), GuardDecision::Allow);
    }

    #[test]
    fn public_guard_redirects_authenticated_sessions() {
        let state = authenticated(demo_user());
        assert_eq!(check_public(&state), GuardDecision::RedirectToDashboard);
        assert_eq!(check_public(&SessionState::default()), GuardDecision::Allow);
    }

    #[test]
    fn public_guard_redirects_demo_sessions_too() {
        let state = SessionState {
            user: Some(demo_user()),
            token: Some("demo-token".into()),
            is_authenticated: true,
            is_demo_mode: true,
            ..SessionState::default()
        };
        assert_eq!(check_public(&state), GuardDecision::RedirectToDashboard);
    }
}
