//! ClassDesk 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎，含守卫执行）
//! - `auth`: 会话引擎与响应式系统的桥接
//! - `api`: 远程调用网关
//! - `data`: 数据源分支点（演示 / 远程）
//! - `components`: UI 组件层

mod api;
mod auth;
mod data;
mod components {
    pub mod announcements;
    pub mod classes;
    pub mod dashboard;
    pub mod demo;
    pub mod fees;
    pub mod forgot_password;
    pub mod layout;
    pub mod login;
    pub mod register;
    pub mod sections;
    pub mod students;
    pub mod subjects;
    pub mod teachers;
}

// 原生 Web API 适配模块
pub(crate) mod web {
    pub mod route;
    pub mod router;
    pub mod storage;
    pub mod timer;
}

use leptos::prelude::*;

use crate::auth::{AuthContext, init_auth};
use crate::components::announcements::AnnouncementsPage;
use crate::components::classes::ClassesPage;
use crate::components::dashboard::DashboardPage;
use crate::components::demo::DemoEntryPage;
use crate::components::fees::FeesPage;
use crate::components::forgot_password::ForgotPasswordPage;
use crate::components::login::LoginPage;
use crate::components::register::RegisterPage;
use crate::components::sections::SectionsPage;
use crate::components::students::StudentsPage;
use crate::components::subjects::SubjectsPage;
use crate::components::teachers::TeachersPage;
use crate::web::route::AppRoute;
use crate::web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::ForgotPassword => view! { <ForgotPasswordPage /> }.into_any(),
        AppRoute::DemoEntry => view! { <DemoEntryPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Classes => view! { <ClassesPage /> }.into_any(),
        AppRoute::Sections => view! { <SectionsPage /> }.into_any(),
        AppRoute::Subjects => view! { <SubjectsPage /> }.into_any(),
        AppRoute::Students => view! { <StudentsPage /> }.into_any(),
        AppRoute::Teachers => view! { <TeachersPage /> }.into_any(),
        AppRoute::Fees => view! { <FeesPage /> }.into_any(),
        AppRoute::Announcements => view! { <AnnouncementsPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文（内含会话引擎）
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx.clone());

    // 2. 启动会话恢复 + 401 广播监听
    init_auth(&auth_ctx);

    // 3. 会话状态信号注入路由服务（解耦！）
    let session = auth_ctx.session_signal();

    view! {
        // 4. 路由器组件：注入会话信号实现守卫
        <Router session=session>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
