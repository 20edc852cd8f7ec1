//! 认证模块
//!
//! 把会话状态机接入 Leptos 的响应式系统：引擎每次状态变更
//! 通过观察者回调写入信号，路由与页面只读信号，与引擎解耦。
//!
//! 引擎本体不是线程安全的（Rc + RefCell），存放在线程本地的
//! arena 槽位里；上下文只携带可随意复制进视图闭包的句柄。

use std::rc::Rc;

use classdesk_session::{SessionEngine, SessionState};
use classdesk_shared::{LoginRequest, RegisterRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;

use crate::api::SchoolApi;
use crate::web::storage::LocalStorage;
use crate::web::timer::{BrowserClock, BrowserLatency};

/// 浏览器环境下的会话引擎类型
pub type Engine = SessionEngine<SchoolApi, LocalStorage>;

/// 认证上下文
///
/// 通过 Context 在组件间共享。`state` 是引擎状态的响应式镜像。
#[derive(Clone)]
pub struct AuthContext {
    /// 会话状态（只读信号）
    pub state: ReadSignal<SessionState>,
    /// 会话引擎的线程本地句柄
    engine: StoredValue<Rc<Engine>, leptos::prelude::LocalStorage>,
    /// HTTP 网关（密码找回等不经过引擎的调用）
    pub api: SchoolApi,
}

impl AuthContext {
    pub fn new() -> Self {
        let api = SchoolApi::new();
        let engine = Rc::new(SessionEngine::new(
            api.clone(),
            Rc::new(LocalStorage),
            Rc::new(BrowserClock),
            Rc::new(BrowserLatency),
        ));

        let (state, set_state) = signal(engine.snapshot());
        engine.set_observer(move |s| set_state.set(s.clone()));

        Self {
            state,
            engine: StoredValue::new_local(engine),
            api,
        }
    }

    /// 会话引擎（仅在浏览器主线程有效）
    pub fn engine(&self) -> Rc<Engine> {
        self.engine.with_value(|e| e.clone())
    }

    /// 会话状态信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<SessionState> {
        self.state.into()
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 启动会话恢复（持久化 token / 演示模式），并监听网关广播的
/// `auth:unauthorized` 事件做统一清场。
pub fn init_auth(ctx: &AuthContext) {
    let engine = ctx.engine();
    spawn_local(async move {
        if let Err(e) = engine.initialize().await {
            web_sys::console::warn_1(&JsValue::from_str(&format!(
                "[Auth] Session restore failed: {e}"
            )));
        }
    });

    let engine = ctx.engine();
    let closure = Closure::<dyn Fn()>::new(move || {
        web_sys::console::warn_1(&JsValue::from_str(
            "[Auth] Received auth:unauthorized, clearing session",
        ));
        engine.handle_unauthorized();
    });
    if let Some(window) = web_sys::window() {
        let _ = window.add_event_listener_with_callback(
            "auth:unauthorized",
            closure.as_ref().unchecked_ref(),
        );
    }
    // 泄漏闭包以保持监听器存活
    closure.forget();
}

/// 凭据登录
///
/// 错误消息经由状态信号（`state.error`）反映给表单。
pub async fn login(ctx: &AuthContext, email: String, password: String) -> bool {
    ctx.engine()
        .login(LoginRequest { email, password })
        .await
        .is_ok()
}

/// 注册新账号；成功不建立会话，由页面引导用户去登录
pub async fn register(ctx: &AuthContext, data: RegisterRequest) -> bool {
    ctx.engine().register(data).await.is_ok()
}

/// 注销并清除状态
///
/// 导航由路由服务的认证状态监听自动处理。
pub fn logout(ctx: &AuthContext) {
    let engine = ctx.engine();
    spawn_local(async move {
        // 远端失败已在引擎内吞掉，本地清场无条件完成
        let _ = engine.logout().await;
    });
}
