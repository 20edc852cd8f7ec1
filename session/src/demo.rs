//! 演示数据提供方
//!
//! 演示模式激活时完全替代后端：fixture 数据 + 人工延迟。
//! 同时实现 `SessionProvider`，让状态机的演示路径与远程路径
//! 走同一个抽象接口。

use std::rc::Rc;

use async_trait::async_trait;
use classdesk_shared::{
    Announcement, AuthPayload, DEMO_EMAIL, DEMO_PASSWORD, Fee, LoginRequest, Page,
    RegisterRequest, SchoolClass, Section, Student, Subject, Teacher, User,
};

use crate::env::{Clock, Latency};
use crate::error::{SessionError, SessionResult};
use crate::fixtures::FixtureBundle;
use crate::provider::SessionProvider;
use crate::store::{self, CredentialStore};

/// 模拟网络调用的固定延迟，让 UI 的 loading 状态与真实请求一致
pub const DEMO_LATENCY_MS: u32 = 500;

/// Fixture 会话提供方
///
/// 持有一份生成一次的静态数据模板；演示模式标志与用户快照
/// 镜像在注入的凭据存储里（`demoMode` / `demoUser` 键）。
pub struct DemoProvider<S: CredentialStore> {
    store: Rc<S>,
    clock: Rc<dyn Clock>,
    latency: Rc<dyn Latency>,
    data: FixtureBundle,
}

impl<S: CredentialStore> DemoProvider<S> {
    pub fn new(store: Rc<S>, clock: Rc<dyn Clock>, latency: Rc<dyn Latency>) -> Self {
        Self {
            store,
            clock,
            latency,
            data: FixtureBundle::generate(),
        }
    }

    /// 演示模式是否已开启（以持久化标志为准）
    pub fn is_enabled(&self) -> bool {
        store::load_record(self.store.as_ref()).demo_mode
    }

    /// 当前演示用户：优先持久化快照，缺失则回退到模板
    pub fn demo_user(&self) -> Option<User> {
        if !self.is_enabled() {
            return None;
        }
        Some(
            store::load_record(self.store.as_ref())
                .demo_user
                .unwrap_or_else(|| self.data.user.clone()),
        )
    }

    /// 开启演示模式：持久化标志与用户快照，返回该用户
    pub fn enable(&self) -> SessionResult<User> {
        store::persist_demo(self.store.as_ref(), &self.data.user)?;
        Ok(self.data.user.clone())
    }

    /// 关闭演示模式：清除持久化键
    pub fn disable(&self) {
        store::clear_demo(self.store.as_ref());
    }

    /// 生成一对带时间戳的合成 token
    pub fn mint_tokens(&self) -> (String, String) {
        let now = self.clock.now_millis();
        (
            format!("demo-access-token-{}", now),
            format!("demo-refresh-token-{}", now),
        )
    }

    /// 人工延迟后原样返回数据，模拟一次网络往返
    pub async fn simulate_call<T>(&self, value: T) -> T {
        self.latency.sleep(DEMO_LATENCY_MS).await;
        value
    }

    fn matches_demo_credentials(credentials: &LoginRequest) -> bool {
        credentials.email == DEMO_EMAIL && credentials.password == DEMO_PASSWORD
    }

    // --- 实体数据（固定单页分页，见 Page::single 的说明）---

    pub async fn classes(&self) -> SessionResult<Page<SchoolClass>> {
        Ok(self.simulate_call(Page::single(self.data.classes.clone())).await)
    }

    pub async fn sections(&self) -> SessionResult<Page<Section>> {
        Ok(self.simulate_call(Page::single(self.data.sections.clone())).await)
    }

    pub async fn subjects(&self) -> SessionResult<Page<Subject>> {
        Ok(self.simulate_call(Page::single(self.data.subjects.clone())).await)
    }

    pub async fn students(&self) -> SessionResult<Page<Student>> {
        Ok(self.simulate_call(Page::single(self.data.students.clone())).await)
    }

    pub async fn teachers(&self) -> SessionResult<Page<Teacher>> {
        Ok(self.simulate_call(Page::single(self.data.teachers.clone())).await)
    }

    pub async fn fees(&self) -> SessionResult<Page<Fee>> {
        Ok(self.simulate_call(Page::single(self.data.fees.clone())).await)
    }

    pub async fn announcements(&self) -> SessionResult<Page<Announcement>> {
        Ok(self
            .simulate_call(Page::single(self.data.announcements.clone()))
            .await)
    }
}

#[async_trait(?Send)]
impl<S: CredentialStore> SessionProvider for DemoProvider<S> {
    /// 只接受唯一的演示凭据对；不匹配时报错而不是静默成功
    async fn login(&self, credentials: &LoginRequest) -> SessionResult<AuthPayload> {
        if !Self::matches_demo_credentials(credentials) {
            return Err(SessionError::unauthorized(format!(
                "Invalid demo credentials. Use {} / {}",
                DEMO_EMAIL, DEMO_PASSWORD
            ))
            .in_op("demo.login"));
        }

        let user = self.enable()?;
        let (access_token, refresh_token) = self.mint_tokens();
        Ok(AuthPayload {
            user: Some(user),
            access_token,
            refresh_token,
        })
    }

    async fn register(&self, _data: &RegisterRequest) -> SessionResult<()> {
        Err(SessionError::invalid_input(
            "Registration is not available in demo mode",
        )
        .in_op("demo.register"))
    }

    async fn refresh(&self, _refresh_token: &str) -> SessionResult<AuthPayload> {
        let user = self
            .demo_user()
            .ok_or_else(|| SessionError::unauthorized("Demo mode is not enabled").in_op("demo.refresh"))?;
        let (access_token, refresh_token) = self.mint_tokens();
        Ok(AuthPayload {
            user: Some(user),
            access_token,
            refresh_token,
        })
    }

    /// 演示登出 = 清除演示持久化键，无网络调用
    async fn logout(&self) -> SessionResult<()> {
        self.disable();
        Ok(())
    }

    async fn fetch_profile(&self) -> SessionResult<User> {
        let user = self
            .demo_user()
            .ok_or_else(|| SessionError::unauthorized("Demo mode is not enabled").in_op("demo.profile"))?;
        Ok(self.simulate_call(user).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FixedClock, NoLatency, new_memory_store};

    fn provider() -> DemoProvider<crate::testutil::MemoryStore> {
        let store = new_memory_store();
        DemoProvider::new(store, Rc::new(FixedClock(1_700_000_000_000)), Rc::new(NoLatency))
    }

    #[tokio::test]
    async fn login_accepts_only_the_fixed_pair() {
        let demo = provider();
        let err = demo
            .login(&LoginRequest {
                email: DEMO_EMAIL.into(),
                password: "wrong".into(),
            })
            .await
            .unwrap_err();
        assert!(err.message().contains("Invalid demo credentials"));
        assert!(!demo.is_enabled());

        let payload = demo
            .login(&LoginRequest {
                email: DEMO_EMAIL.into(),
                password: DEMO_PASSWORD.into(),
            })
            .await
            .unwrap();
        assert!(demo.is_enabled());
        assert_eq!(payload.user.unwrap().email, DEMO_EMAIL);
        assert_eq!(payload.access_token, "demo-access-token-1700000000000");
    }

    #[tokio::test]
    async fn enable_disable_roundtrip_clears_persisted_keys() {
        let demo = provider();
        demo.enable().unwrap();
        assert!(demo.is_enabled());
        assert!(demo.demo_user().is_some());

        demo.disable();
        assert!(!demo.is_enabled());
        assert!(demo.demo_user().is_none());
    }

    #[tokio::test]
    async fn getters_return_single_page() {
        let demo = provider();
        let page = demo.classes().await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.total_pages, 1);

        let fees = demo.fees().await.unwrap();
        assert_eq!(fees.pagination.page, 1);
    }

    #[tokio::test]
    async fn profile_requires_enabled_mode() {
        let demo = provider();
        assert!(demo.fetch_profile().await.is_err());
        demo.enable().unwrap();
        assert_eq!(demo.fetch_profile().await.unwrap().email, DEMO_EMAIL);
    }

    #[tokio::test]
    async fn fixture_mutations_do_not_leak_back() {
        let demo = provider();
        let mut page = demo.fees().await.unwrap();
        page.items[1].status = classdesk_shared::FeeStatus::Paid;

        let fresh = demo.fees().await.unwrap();
        assert_eq!(fresh.items[1].status, classdesk_shared::FeeStatus::Pending);
    }
}
