//! 路由服务模块 - 核心引擎
//!
//! 封装 web_sys 的 History API，实现"监听 -> 守卫裁决 -> 处理 -> 加载"
//! 的导航流程。守卫逻辑本身是会话核心的纯函数（check_private /
//! check_public），路由层只负责执行裁决：重定向在导航时处理，
//! Loading / Denied 在出口组件渲染时处理。

use classdesk_session::{GuardDecision, SessionState, check_private, check_public};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入完整的会话状态信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 会话状态（注入的信号）
    session: Signal<SessionState>,
    /// 登录后要返回的原始请求路径
    return_to: ReadSignal<Option<String>>,
    set_return_to: WriteSignal<Option<String>>,
}

impl RouterService {
    fn new(session: Signal<SessionState>) -> Self {
        let path = current_path();
        let initial_route = AppRoute::from_path(&path);
        let (current_route, set_route) = signal(initial_route);
        let (return_to, set_return_to) = signal(Option::<String>::None);

        Self {
            current_route,
            set_route,
            session,
            return_to,
            set_return_to,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 会话状态信号（出口组件渲染裁决用）
    pub fn session_state(&self) -> Signal<SessionState> {
        self.session
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), true);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let state = self.session.get_untracked();

        // --- Step 1: 守卫裁决 ---
        if target_route.requires_auth() {
            if let GuardDecision::RedirectToLogin { from } =
                check_private(&state, target_route.to_path(), target_route.required_roles())
            {
                web_sys::console::log_1(&"[Router] Access denied. Redirecting to login.".into());
                // 保留原始请求路径，登录成功后返回
                self.set_return_to.set(Some(from));
                let redirect = AppRoute::auth_failure_redirect();
                if use_push {
                    push_history_state(redirect.to_path());
                } else {
                    replace_history_state(redirect.to_path());
                }
                self.set_route.set(redirect);
                return;
            }
            // Loading / Denied / Allow 交给出口组件渲染
        } else if target_route.public_only()
            && check_public(&state) == GuardDecision::RedirectToDashboard
        {
            web_sys::console::log_1(
                &"[Router] Already authenticated. Redirecting to dashboard.".into(),
            );
            let redirect = AppRoute::auth_success_redirect();
            if use_push {
                push_history_state(redirect.to_path());
            } else {
                replace_history_state(redirect.to_path());
            }
            self.set_route.set(redirect);
            return;
        }

        // --- Step 2: 加载页面 (更新状态) ---
        if use_push {
            push_history_state(target_route.to_path());
        } else {
            replace_history_state(target_route.to_path());
        }
        self.set_route.set(target_route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let service = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target_route = AppRoute::from_path(&current_path());
            // popstate 时同样执行守卫流程，但不推入新的历史记录
            service.navigate_to_route(target_route, false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证状态变化时的自动重定向
    fn setup_auth_redirect(&self) {
        let service = *self;

        Effect::new(move |_| {
            let state = service.session.get();
            let route = service.current_route.get_untracked();

            if state.is_authenticated {
                // 刚登录：离开公共页，优先回到登录前尝试访问的路径
                if route.public_only() {
                    let target = service
                        .return_to
                        .get_untracked()
                        .map(|p| AppRoute::from_path(&p))
                        .filter(|r| r.requires_auth())
                        .unwrap_or_else(AppRoute::auth_success_redirect);
                    service.set_return_to.set(None);
                    push_history_state(target.to_path());
                    service.set_route.set(target);
                }
            } else if !state.is_loading && route.requires_auth() {
                // 登出或会话失效：离开受保护页面
                service.set_return_to.set(Some(route.to_path().to_string()));
                let redirect = AppRoute::auth_failure_redirect();
                push_history_state(redirect.to_path());
                service.set_route.set(redirect);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<SessionState>) -> RouterService {
    let router = RouterService::new(session);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

/// 导航函数（返回一个可调用的闭包）
pub fn use_navigate() -> impl Fn(&str) + Clone {
    let router = use_router();
    move |to: &str| {
        router.navigate(to);
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话状态信号
    session: Signal<SessionState>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

fn loading_view() -> AnyView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
    .into_any()
}

fn access_denied_view() -> AnyView {
    let on_back = move |_| {
        if let Some(window) = web_sys::window() {
            if let Ok(history) = window.history() {
                let _ = history.back();
            }
        }
    };

    view! {
        <div class="min-h-screen flex items-center justify-center bg-base-200">
            <div class="text-center max-w-md mx-auto p-6">
                <h2 class="text-2xl font-bold mb-2">"Access Denied"</h2>
                <p class="text-base-content/70 mb-4">
                    "You don't have permission to access this page. Please contact your administrator."
                </p>
                <button class="btn btn-primary" on:click=on_back>"Go Back"</button>
            </div>
        </div>
    }
    .into_any()
}

/// 路由出口组件
///
/// 根据当前路由与守卫裁决渲染对应的组件：
/// Loading 渲染占位，Denied 渲染拒绝访问视图，Allow 渲染页面。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let route = router.current_route().get();
        if route.requires_auth() {
            let state = router.session_state().get();
            match check_private(&state, route.to_path(), route.required_roles()) {
                GuardDecision::Loading => loading_view(),
                // 重定向由导航层/认证效应处理，渲染占位避免闪烁
                GuardDecision::RedirectToLogin { .. } => loading_view(),
                GuardDecision::Denied => access_denied_view(),
                GuardDecision::Allow | GuardDecision::RedirectToDashboard => matcher(route),
            }
        } else {
            matcher(route)
        }
    }
}
