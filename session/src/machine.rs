//! 会话状态机
//!
//! 进程内唯一的会话真相，显式构造、显式注入（无模块级单例）。
//! 所有 transition 都走同一个 `SessionProvider` 抽象；
//! 演示/远程的分支点只有 `active_provider` 一处。
//!
//! 每次状态变更都会通知注入的观察者，响应式 UI 层（或测试）
//! 据此同步自己的视图。观察者回调内不得再触发 transition。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use classdesk_shared::{
    DEMO_EMAIL, DEMO_PASSWORD, DEMO_REHYDRATED_TOKEN, LoginRequest, RegisterRequest, User,
};

use crate::demo::DemoProvider;
use crate::env::{Clock, Latency};
use crate::error::{SessionError, SessionResult};
use crate::provider::SessionProvider;
use crate::store::{self, CredentialStore};

// =========================================================
// 会话状态
// =========================================================

/// 会话状态快照
///
/// 不变式：`is_authenticated == true` 必然有 `user != None`；
/// `is_demo_mode == true` 时 `user` 是固定的演示管理员。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub is_authenticated: bool,
    pub is_demo_mode: bool,
    pub is_loading: bool,
    pub is_token_expired: bool,
    pub error: Option<String>,
}

/// 进行中的互斥操作（single-flight 守卫）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingOp {
    Login,
    Refresh,
}

/// pending 标记的 RAII 守卫：提前 return 也能正确清除
struct PendingGuard<'a> {
    cell: &'a Cell<Option<PendingOp>>,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.cell.set(None);
    }
}

// =========================================================
// 状态机引擎
// =========================================================

pub struct SessionEngine<P: SessionProvider, S: CredentialStore> {
    remote: P,
    demo: DemoProvider<S>,
    store: Rc<S>,
    state: RefCell<SessionState>,
    pending: Cell<Option<PendingOp>>,
    initialized: Cell<bool>,
    observer: RefCell<Option<Box<dyn Fn(&SessionState)>>>,
}

impl<P: SessionProvider, S: CredentialStore> SessionEngine<P, S> {
    pub fn new(
        remote: P,
        store: Rc<S>,
        clock: Rc<dyn Clock>,
        latency: Rc<dyn Latency>,
    ) -> Self {
        let demo = DemoProvider::new(store.clone(), clock, latency);
        Self {
            remote,
            demo,
            store,
            state: RefCell::new(SessionState::default()),
            pending: Cell::new(None),
            initialized: Cell::new(false),
            observer: RefCell::new(None),
        }
    }

    /// 注册状态观察者（通常是 UI 信号的写端）
    pub fn set_observer(&self, observer: impl Fn(&SessionState) + 'static) {
        *self.observer.borrow_mut() = Some(Box::new(observer));
    }

    /// 当前状态的克隆快照
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// 演示数据提供方（实体 getter 供页面层使用）
    pub fn demo(&self) -> &DemoProvider<S> {
        &self.demo
    }

    fn mutate(&self, f: impl FnOnce(&mut SessionState)) {
        {
            let mut state = self.state.borrow_mut();
            f(&mut state);
            debug_assert!(
                !state.is_authenticated || state.user.is_some(),
                "session invariant violated: authenticated without a user"
            );
        }
        if let Some(observer) = self.observer.borrow().as_ref() {
            observer(&self.state.borrow());
        }
    }

    /// 唯一的模式分支点：其余 transition 一律经由此处取提供方
    fn active_provider(&self) -> &dyn SessionProvider {
        if self.state.borrow().is_demo_mode {
            &self.demo
        } else {
            &self.remote
        }
    }

    fn acquire(&self, op: PendingOp) -> SessionResult<PendingGuard<'_>> {
        if self.pending.get().is_some() {
            return Err(SessionError::conflict(
                "Another authentication request is already in flight",
            ));
        }
        self.pending.set(Some(op));
        Ok(PendingGuard { cell: &self.pending })
    }

    fn is_demo_credentials(credentials: &LoginRequest) -> bool {
        credentials.email == DEMO_EMAIL && credentials.password == DEMO_PASSWORD
    }

    // =====================================================
    // Transitions
    // =====================================================

    /// 启动时调用一次；重复调用为 no-op。
    ///
    /// 优先级：持久化的演示标志 > 持久化 token。两者同时存在时
    /// 演示模式直接短路，不会尝试拉取远端档案。
    /// 有 token 时在档案真正取回之前保持未认证，避免以空身份
    /// 渲染受保护内容。
    pub async fn initialize(&self) -> SessionResult<()> {
        if self.initialized.replace(true) {
            return Ok(());
        }

        let record = store::load_record(self.store.as_ref());

        if record.demo_mode {
            let user = record
                .demo_user
                .unwrap_or_else(crate::fixtures::demo_user);
            self.mutate(|s| {
                s.user = Some(user);
                s.token = Some(DEMO_REHYDRATED_TOKEN.into());
                s.is_authenticated = true;
                s.is_demo_mode = true;
            });
            return Ok(());
        }

        let has_token = record.token.is_some();
        self.mutate(|s| {
            s.token = record.token;
            s.refresh_token = record.refresh_token;
        });

        if !has_token {
            return Ok(());
        }

        self.mutate(|s| s.is_loading = true);
        match self.remote.fetch_profile().await {
            Ok(user) => {
                self.mutate(|s| {
                    s.user = Some(user);
                    s.is_authenticated = true;
                    s.is_loading = false;
                });
                Ok(())
            }
            Err(e) if e.is_unauthorized() => {
                // 持久化凭据已失效：清场，标记过期
                store::clear_tokens(self.store.as_ref());
                self.mutate(|s| {
                    s.user = None;
                    s.token = None;
                    s.refresh_token = None;
                    s.is_authenticated = false;
                    s.is_token_expired = true;
                    s.is_loading = false;
                });
                Err(e.in_op("session.initialize"))
            }
            Err(e) => {
                // 瞬态故障不销毁仍可能有效的凭据
                log::warn!("profile fetch failed during initialize: {}", e);
                let message = e.message().to_string();
                self.mutate(|s| {
                    s.is_loading = false;
                    s.error = Some(message);
                });
                Err(e.in_op("session.initialize"))
            }
        }
    }

    /// 凭据登录
    ///
    /// 演示凭据对在任何网络调用之前就地短路到演示提供方。
    /// 成功载荷必须带非空 access token 与用户档案，否则按完整性
    /// 错误处理。
    pub async fn login(&self, credentials: LoginRequest) -> SessionResult<()> {
        let _guard = self.acquire(PendingOp::Login)?;

        self.mutate(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let demo_attempt = Self::is_demo_credentials(&credentials);
        let result = if demo_attempt {
            self.demo.login(&credentials).await
        } else {
            self.remote.login(&credentials).await
        };

        let payload = match result {
            Ok(payload) => payload,
            Err(e) => {
                let message = e.message().to_string();
                self.mutate(|s| {
                    s.is_loading = false;
                    s.is_authenticated = false;
                    s.error = Some(message);
                });
                return Err(e.in_op("session.login"));
            }
        };

        if payload.access_token.is_empty() || payload.user.is_none() {
            let e = SessionError::integrity("Login response is missing token or user")
                .in_op("session.login");
            let message = e.message().to_string();
            self.mutate(|s| {
                s.is_loading = false;
                s.is_authenticated = false;
                s.error = Some(message);
            });
            return Err(e);
        }

        store::persist_tokens(self.store.as_ref(), &payload.access_token, &payload.refresh_token);
        self.mutate(|s| {
            s.user = payload.user;
            s.token = Some(payload.access_token);
            s.refresh_token = Some(payload.refresh_token);
            s.is_authenticated = true;
            s.is_demo_mode = demo_attempt;
            s.is_loading = false;
            s.error = None;
        });
        Ok(())
    }

    /// 注册；成功不建立会话（注册与登录解耦，模拟邮箱验证门）
    pub async fn register(&self, data: RegisterRequest) -> SessionResult<()> {
        self.mutate(|s| {
            s.is_loading = true;
            s.error = None;
        });

        match self.active_provider().register(&data).await {
            Ok(()) => {
                self.mutate(|s| {
                    s.is_loading = false;
                    s.error = None;
                });
                Ok(())
            }
            Err(e) => {
                let message = e.message().to_string();
                self.mutate(|s| {
                    s.is_loading = false;
                    s.error = Some(message);
                });
                Err(e.in_op("session.register"))
            }
        }
    }

    /// 刷新 token 对
    ///
    /// fulfilled 但缺 access token：记错误，认证状态保持原值。
    /// rejected：对会话是致命的 —— 清除两个 token、标记过期、
    /// 强制回到匿名态，不做静默重试。
    pub async fn refresh(&self) -> SessionResult<()> {
        let _guard = self.acquire(PendingOp::Refresh)?;

        self.mutate(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let refresh_token = self.state.borrow().refresh_token.clone();
        let result = match refresh_token {
            Some(token) => self.active_provider().refresh(&token).await,
            None => Err(SessionError::unauthorized("No refresh token available")),
        };

        match result {
            Ok(payload) if !payload.access_token.is_empty() => {
                store::persist_tokens(
                    self.store.as_ref(),
                    &payload.access_token,
                    &payload.refresh_token,
                );
                self.mutate(|s| {
                    s.token = Some(payload.access_token);
                    s.refresh_token = Some(payload.refresh_token);
                    s.is_authenticated = true;
                    if let Some(user) = payload.user {
                        s.user = Some(user);
                    }
                    s.is_token_expired = false;
                    s.is_loading = false;
                    s.error = None;
                });
                Ok(())
            }
            Ok(_) => {
                // fulfilled 却没有 token：按错误处理而不是静默认证
                let e = SessionError::integrity("Invalid token response").in_op("session.refresh");
                self.mutate(|s| {
                    s.is_loading = false;
                    s.error = Some("Invalid token response".into());
                });
                Err(e)
            }
            Err(e) => {
                store::clear_tokens(self.store.as_ref());
                self.mutate(|s| {
                    s.user = None;
                    s.token = None;
                    s.refresh_token = None;
                    s.is_authenticated = false;
                    s.is_token_expired = true;
                    s.is_loading = false;
                    s.error = Some("Token refresh failed".into());
                });
                Err(e.in_op("session.refresh"))
            }
        }
    }

    /// 登出
    ///
    /// 远端登出失败只记日志不阻塞 —— 本地清场无条件执行，
    /// 客户端绝不违背自身意图停在"已认证"状态。
    pub async fn logout(&self) -> SessionResult<()> {
        if let Err(e) = self.active_provider().logout().await {
            log::warn!("remote logout failed, tearing down locally anyway: {}", e);
        }

        store::clear_tokens(self.store.as_ref());
        self.mutate(|s| *s = SessionState::default());
        Ok(())
    }

    /// 开启演示模式：同步本地 transition，无网络
    pub fn enable_demo_mode(&self) -> SessionResult<()> {
        let user = self.demo.enable()?;
        let (access_token, refresh_token) = self.demo.mint_tokens();
        store::persist_tokens(self.store.as_ref(), &access_token, &refresh_token);
        self.mutate(|s| {
            s.user = Some(user);
            s.token = Some(access_token);
            s.refresh_token = Some(refresh_token);
            s.is_authenticated = true;
            s.is_demo_mode = true;
            s.is_loading = false;
            s.error = None;
        });
        Ok(())
    }

    /// 关闭演示模式：清除全部会话与凭据字段，回到匿名基线
    pub fn disable_demo_mode(&self) {
        self.demo.disable();
        store::clear_tokens(self.store.as_ref());
        self.mutate(|s| *s = SessionState::default());
    }

    /// 跨切面 401 广播的处理：无条件清场并标记过期
    pub fn handle_unauthorized(&self) {
        store::clear_tokens(self.store.as_ref());
        self.mutate(|s| {
            s.user = None;
            s.token = None;
            s.refresh_token = None;
            s.is_authenticated = false;
            s.is_token_expired = true;
            s.is_loading = false;
            s.error = Some("Authentication failed".into());
        });
    }

    pub fn clear_error(&self) {
        self.mutate(|s| s.error = None);
    }

    pub fn set_token_expired(&self, expired: bool) {
        self.mutate(|s| s.is_token_expired = expired);
    }

    /// 局部更新用户档案（个人资料编辑后合并）
    pub fn update_user(&self, apply: impl FnOnce(&mut User)) {
        self.mutate(|s| {
            if let Some(user) = s.user.as_mut() {
                apply(user);
            }
        });
    }
}

#[cfg(test)]
mod tests;
