use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use classdesk_shared::{
    AuthPayload, DEMO_EMAIL, DEMO_PASSWORD, LoginRequest, RegisterRequest, STORAGE_DEMO_MODE,
    STORAGE_DEMO_USER, STORAGE_REFRESH_TOKEN, STORAGE_TOKEN, User,
};
use tokio::sync::Notify;

use super::*;
use crate::error::SessionErrorStatus;
use crate::fixtures::demo_user;
use crate::testutil::{FixedClock, MemoryStore, NoLatency, new_memory_store};

// =========================================================
// Shared Mock Components
// =========================================================

struct TestContext {
    /// Operation log to verify which collaborators were contacted
    log: RefCell<Vec<String>>,
    fail_login: Cell<bool>,
    fail_refresh: Cell<bool>,
    /// Fulfilled refresh whose payload carries no access token
    refresh_missing_token: Cell<bool>,
    fail_logout: Cell<bool>,
    profile_unauthorized: Cell<bool>,
    profile_transport_error: Cell<bool>,
    /// When set, login blocks until notified (for single-flight tests)
    login_gate: RefCell<Option<Rc<Notify>>>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            log: RefCell::new(Vec::new()),
            fail_login: Cell::new(false),
            fail_refresh: Cell::new(false),
            refresh_missing_token: Cell::new(false),
            fail_logout: Cell::new(false),
            profile_unauthorized: Cell::new(false),
            profile_transport_error: Cell::new(false),
            login_gate: RefCell::new(None),
        }
    }

    fn push_log(&self, msg: impl Into<String>) {
        self.log.borrow_mut().push(msg.into());
    }

    fn remote_calls(&self) -> usize {
        self.log.borrow().len()
    }
}

fn remote_user() -> User {
    let mut user = demo_user();
    user.id = "user-remote-001".into();
    user.email = "teacher@school.com".into();
    user.role = "teacher".into();
    user.roles = vec!["teacher".into()];
    user
}

struct MockRemote {
    ctx: Rc<TestContext>,
}

#[async_trait(?Send)]
impl SessionProvider for MockRemote {
    async fn login(&self, credentials: &LoginRequest) -> SessionResult<AuthPayload> {
        self.ctx.push_log(format!("remote:login:{}", credentials.email));
        let gate = self.ctx.login_gate.borrow().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.ctx.fail_login.get() {
            return Err(SessionError::unauthorized("Invalid email or password"));
        }
        Ok(AuthPayload {
            user: Some(remote_user()),
            access_token: "remote-access-1".into(),
            refresh_token: "remote-refresh-1".into(),
        })
    }

    async fn register(&self, data: &RegisterRequest) -> SessionResult<()> {
        self.ctx.push_log(format!("remote:register:{}", data.email));
        Ok(())
    }

    async fn refresh(&self, refresh_token: &str) -> SessionResult<AuthPayload> {
        self.ctx.push_log(format!("remote:refresh:{}", refresh_token));
        if self.ctx.fail_refresh.get() {
            return Err(SessionError::unauthorized("Refresh token expired"));
        }
        if self.ctx.refresh_missing_token.get() {
            return Ok(AuthPayload {
                user: None,
                access_token: String::new(),
                refresh_token: String::new(),
            });
        }
        Ok(AuthPayload {
            user: None,
            access_token: "remote-access-2".into(),
            refresh_token: "remote-refresh-2".into(),
        })
    }

    async fn logout(&self) -> SessionResult<()> {
        self.ctx.push_log("remote:logout");
        if self.ctx.fail_logout.get() {
            return Err(SessionError::transport("Network unreachable"));
        }
        Ok(())
    }

    async fn fetch_profile(&self) -> SessionResult<User> {
        self.ctx.push_log("remote:profile");
        if self.ctx.profile_unauthorized.get() {
            return Err(SessionError::unauthorized("Token is invalid"));
        }
        if self.ctx.profile_transport_error.get() {
            return Err(SessionError::transport("Connection refused"));
        }
        Ok(remote_user())
    }
}

type TestEngine = SessionEngine<MockRemote, MemoryStore>;

fn setup_env() -> (Rc<TestContext>, Rc<TestEngine>, Rc<MemoryStore>) {
    let ctx = Rc::new(TestContext::new());
    let store = new_memory_store();
    let engine = SessionEngine::new(
        MockRemote { ctx: ctx.clone() },
        store.clone(),
        Rc::new(FixedClock(1_700_000_000_000)),
        Rc::new(NoLatency),
    );
    (ctx, Rc::new(engine), store)
}

fn remote_credentials() -> LoginRequest {
    LoginRequest {
        email: "teacher@school.com".into(),
        password: "secret".into(),
    }
}

fn demo_credentials() -> LoginRequest {
    LoginRequest {
        email: DEMO_EMAIL.into(),
        password: DEMO_PASSWORD.into(),
    }
}

fn assert_invariant(state: &SessionState) {
    assert!(
        !state.is_authenticated || state.user.is_some(),
        "authenticated without a user: {:?}",
        state
    );
    if state.is_demo_mode {
        assert_eq!(
            state.user.as_ref().map(|u| u.id.as_str()),
            Some("demo-user-001"),
            "demo mode without the demo administrator"
        );
    }
}

// =========================================================
// Initialize
// =========================================================

#[tokio::test]
async fn initialize_without_credentials_stays_anonymous() {
    let (ctx, engine, _) = setup_env();
    engine.initialize().await.unwrap();

    let state = engine.snapshot();
    assert_eq!(state, SessionState::default());
    assert_eq!(ctx.remote_calls(), 0);
}

#[tokio::test]
async fn initialize_prefers_demo_flag_over_token() {
    let (ctx, engine, store) = setup_env();
    store.set(STORAGE_DEMO_MODE, "true");
    store.set(
        STORAGE_DEMO_USER,
        &serde_json::to_string(&demo_user()).unwrap(),
    );
    store.set(STORAGE_TOKEN, "stale-real-token");

    engine.initialize().await.unwrap();

    let state = engine.snapshot();
    assert!(state.is_demo_mode);
    assert!(state.is_authenticated);
    assert_eq!(state.user.unwrap().email, DEMO_EMAIL);
    // Demo short-circuits: no profile fetch was ever attempted.
    assert_eq!(ctx.remote_calls(), 0);
}

#[tokio::test]
async fn initialize_with_token_resolves_profile_before_authenticating() {
    let (ctx, engine, store) = setup_env();
    store.set(STORAGE_TOKEN, "persisted-token");
    store.set(STORAGE_REFRESH_TOKEN, "persisted-refresh");

    engine.initialize().await.unwrap();

    let state = engine.snapshot();
    assert!(state.is_authenticated);
    assert_eq!(state.user.unwrap().email, "teacher@school.com");
    assert_eq!(state.token.as_deref(), Some("persisted-token"));
    assert!(ctx.log.borrow().contains(&"remote:profile".to_string()));
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let (ctx, engine, store) = setup_env();
    store.set(STORAGE_TOKEN, "persisted-token");

    engine.initialize().await.unwrap();
    let calls = ctx.remote_calls();
    engine.initialize().await.unwrap();
    assert_eq!(ctx.remote_calls(), calls);
}

#[tokio::test]
async fn initialize_unauthorized_profile_purges_credentials() {
    let (ctx, engine, store) = setup_env();
    store.set(STORAGE_TOKEN, "expired-token");
    store.set(STORAGE_REFRESH_TOKEN, "expired-refresh");
    ctx.profile_unauthorized.set(true);

    assert!(engine.initialize().await.is_err());

    let state = engine.snapshot();
    assert!(!state.is_authenticated);
    assert!(state.is_token_expired);
    assert!(state.token.is_none());
    assert!(store.get(STORAGE_TOKEN).is_none());
    assert!(store.get(STORAGE_REFRESH_TOKEN).is_none());
}

#[tokio::test]
async fn initialize_transport_failure_keeps_credentials() {
    let (ctx, engine, store) = setup_env();
    store.set(STORAGE_TOKEN, "maybe-valid-token");
    ctx.profile_transport_error.set(true);

    assert!(engine.initialize().await.is_err());

    let state = engine.snapshot();
    assert!(!state.is_authenticated);
    assert!(!state.is_token_expired);
    assert_eq!(state.token.as_deref(), Some("maybe-valid-token"));
    assert!(state.error.is_some());
    // A transient failure must not destroy a possibly valid credential.
    assert_eq!(store.get(STORAGE_TOKEN).as_deref(), Some("maybe-valid-token"));
}

// =========================================================
// Login
// =========================================================

#[tokio::test]
async fn login_success_persists_tokens() {
    let (_, engine, store) = setup_env();
    engine.login(remote_credentials()).await.unwrap();

    let state = engine.snapshot();
    assert!(state.is_authenticated);
    assert!(!state.is_demo_mode);
    assert!(!state.is_loading);
    assert_eq!(state.token.as_deref(), Some("remote-access-1"));
    assert_eq!(store.get(STORAGE_TOKEN).as_deref(), Some("remote-access-1"));
    assert_eq!(
        store.get(STORAGE_REFRESH_TOKEN).as_deref(),
        Some("remote-refresh-1")
    );
}

#[tokio::test]
async fn login_rejection_surfaces_error() {
    let (ctx, engine, _) = setup_env();
    ctx.fail_login.set(true);

    let err = engine.login(remote_credentials()).await.unwrap_err();
    assert_eq!(err.status, SessionErrorStatus::Unauthorized);

    let state = engine.snapshot();
    assert!(!state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some("Invalid email or password"));
}

#[tokio::test]
async fn demo_login_never_contacts_the_gateway() {
    let (ctx, engine, _) = setup_env();
    engine.login(demo_credentials()).await.unwrap();

    let state = engine.snapshot();
    assert!(state.is_authenticated);
    assert!(state.is_demo_mode);
    assert_eq!(state.user.unwrap().email, DEMO_EMAIL);
    assert_eq!(ctx.remote_calls(), 0);
}

#[tokio::test]
async fn wrong_demo_password_rejects_without_network() {
    let (ctx, engine, _) = setup_env();
    let err = engine
        .login(LoginRequest {
            email: DEMO_EMAIL.into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();

    assert!(err.message().contains("Invalid demo credentials"));
    let state = engine.snapshot();
    assert!(!state.is_authenticated);
    assert!(state.error.as_deref().unwrap().contains("Invalid demo credentials"));
    assert_eq!(ctx.remote_calls(), 0);
}

#[tokio::test]
async fn second_login_while_pending_is_rejected() {
    let (ctx, engine, _) = setup_env();
    let gate = Rc::new(Notify::new());
    *ctx.login_gate.borrow_mut() = Some(gate.clone());

    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let first = tokio::task::spawn_local({
                let engine = engine.clone();
                async move { engine.login(remote_credentials()).await }
            });
            tokio::task::yield_now().await;

            // The first call is parked on the gate; a concurrent attempt
            // must be rejected immediately, not interleaved.
            let err = engine.login(remote_credentials()).await.unwrap_err();
            assert_eq!(err.status, SessionErrorStatus::Conflict);

            *ctx.login_gate.borrow_mut() = None;
            gate.notify_one();
            first.await.unwrap().unwrap();
            assert!(engine.snapshot().is_authenticated);
        })
        .await;
}

// =========================================================
// Register
// =========================================================

#[tokio::test]
async fn register_success_does_not_authenticate() {
    let (ctx, engine, _) = setup_env();
    engine
        .register(RegisterRequest {
            first_name: "New".into(),
            last_name: "Teacher".into(),
            email: "new@school.com".into(),
            password: "pw".into(),
            role: None,
        })
        .await
        .unwrap();

    let state = engine.snapshot();
    assert!(!state.is_authenticated);
    assert!(state.user.is_none());
    assert!(state.error.is_none());
    assert!(ctx.log.borrow().contains(&"remote:register:new@school.com".to_string()));
}

// =========================================================
// Refresh
// =========================================================

#[tokio::test]
async fn refresh_success_rotates_tokens() {
    let (_, engine, store) = setup_env();
    engine.login(remote_credentials()).await.unwrap();
    engine.refresh().await.unwrap();

    let state = engine.snapshot();
    assert!(state.is_authenticated);
    assert!(!state.is_token_expired);
    assert_eq!(state.token.as_deref(), Some("remote-access-2"));
    assert_eq!(store.get(STORAGE_TOKEN).as_deref(), Some("remote-access-2"));
    // User survives a refresh payload that carries no profile.
    assert!(state.user.is_some());
}

#[tokio::test]
async fn refresh_fulfilled_without_token_is_an_error_not_a_transition() {
    let (ctx, engine, _) = setup_env();
    engine.login(remote_credentials()).await.unwrap();
    ctx.refresh_missing_token.set(true);

    let err = engine.refresh().await.unwrap_err();
    assert_eq!(err.status, SessionErrorStatus::Integrity);

    let state = engine.snapshot();
    // Authenticated flag keeps its pre-call value; never forced either way.
    assert!(state.is_authenticated);
    assert_eq!(state.token.as_deref(), Some("remote-access-1"));
    assert_eq!(state.error.as_deref(), Some("Invalid token response"));
}

#[tokio::test]
async fn refresh_rejection_is_fatal_to_the_session() {
    let (ctx, engine, store) = setup_env();
    engine.login(remote_credentials()).await.unwrap();
    ctx.fail_refresh.set(true);

    assert!(engine.refresh().await.is_err());

    let state = engine.snapshot();
    assert!(!state.is_authenticated);
    assert!(state.is_token_expired);
    assert!(state.token.is_none());
    assert!(state.refresh_token.is_none());
    assert_eq!(state.error.as_deref(), Some("Token refresh failed"));
    assert!(store.get(STORAGE_TOKEN).is_none());
    assert!(store.get(STORAGE_REFRESH_TOKEN).is_none());
}

#[tokio::test]
async fn refresh_without_stored_token_tears_down() {
    let (ctx, engine, _) = setup_env();
    assert!(engine.refresh().await.is_err());
    assert!(engine.snapshot().is_token_expired);
    // No provider call was possible without a refresh token.
    assert_eq!(ctx.remote_calls(), 0);
}

// =========================================================
// Logout
// =========================================================

#[tokio::test]
async fn logout_tears_down_even_when_remote_call_fails() {
    let (ctx, engine, store) = setup_env();
    engine.login(remote_credentials()).await.unwrap();
    ctx.fail_logout.set(true);

    engine.logout().await.unwrap();

    assert_eq!(engine.snapshot(), SessionState::default());
    assert!(store.get(STORAGE_TOKEN).is_none());
    assert!(ctx.log.borrow().contains(&"remote:logout".to_string()));
}

#[tokio::test]
async fn demo_logout_skips_the_network_and_clears_demo_keys() {
    let (ctx, engine, store) = setup_env();
    engine.login(demo_credentials()).await.unwrap();
    assert_eq!(store.get(STORAGE_DEMO_MODE).as_deref(), Some("true"));

    engine.logout().await.unwrap();

    assert_eq!(engine.snapshot(), SessionState::default());
    assert!(store.get(STORAGE_DEMO_MODE).is_none());
    assert!(store.get(STORAGE_DEMO_USER).is_none());
    assert!(!ctx.log.borrow().iter().any(|l| l == "remote:logout"));
}

// =========================================================
// Demo mode toggles
// =========================================================

#[tokio::test]
async fn enable_demo_mode_populates_a_synthetic_session() {
    let (ctx, engine, store) = setup_env();
    engine.enable_demo_mode().unwrap();

    let state = engine.snapshot();
    assert!(state.is_authenticated);
    assert!(state.is_demo_mode);
    assert_eq!(state.user.unwrap().email, DEMO_EMAIL);
    assert_eq!(state.token.as_deref(), Some("demo-access-token-1700000000000"));
    assert_eq!(store.get(STORAGE_DEMO_MODE).as_deref(), Some("true"));
    assert_eq!(ctx.remote_calls(), 0);
}

#[tokio::test]
async fn enable_then_disable_restores_the_anonymous_baseline() {
    let (_, engine, store) = setup_env();
    engine.enable_demo_mode().unwrap();
    engine.disable_demo_mode();

    assert_eq!(engine.snapshot(), SessionState::default());
    assert!(store.get(STORAGE_TOKEN).is_none());
    assert!(store.get(STORAGE_REFRESH_TOKEN).is_none());
    assert!(store.get(STORAGE_DEMO_MODE).is_none());
    assert!(store.get(STORAGE_DEMO_USER).is_none());
}

// =========================================================
// 401 broadcast / field reducers
// =========================================================

#[tokio::test]
async fn unauthorized_broadcast_forces_teardown() {
    let (_, engine, store) = setup_env();
    engine.login(remote_credentials()).await.unwrap();

    engine.handle_unauthorized();

    let state = engine.snapshot();
    assert!(!state.is_authenticated);
    assert!(state.is_token_expired);
    assert!(state.user.is_none());
    assert_eq!(state.error.as_deref(), Some("Authentication failed"));
    assert!(store.get(STORAGE_TOKEN).is_none());
}

#[tokio::test]
async fn clear_error_and_update_user() {
    let (_, engine, _) = setup_env();
    engine.login(remote_credentials()).await.unwrap();

    engine.handle_unauthorized();
    engine.clear_error();
    assert!(engine.snapshot().error.is_none());

    engine.login(remote_credentials()).await.unwrap();
    engine.update_user(|u| u.phone = Some("+1 (555) 000-0000".into()));
    assert_eq!(
        engine.snapshot().user.unwrap().phone.as_deref(),
        Some("+1 (555) 000-0000")
    );
}

// =========================================================
// Invariant walk
// =========================================================

#[tokio::test]
async fn invariant_holds_across_every_transition() {
    let (ctx, engine, _) = setup_env();

    let observed: Rc<RefCell<Vec<SessionState>>> = Rc::new(RefCell::new(Vec::new()));
    engine.set_observer({
        let observed = observed.clone();
        move |state| observed.borrow_mut().push(state.clone())
    });

    engine.initialize().await.unwrap();
    ctx.fail_login.set(true);
    let _ = engine.login(remote_credentials()).await;
    ctx.fail_login.set(false);
    engine.login(remote_credentials()).await.unwrap();
    engine.refresh().await.unwrap();
    engine.logout().await.unwrap();
    engine.enable_demo_mode().unwrap();
    engine.disable_demo_mode();
    engine.login(demo_credentials()).await.unwrap();
    engine.logout().await.unwrap();
    engine.handle_unauthorized();

    let observed = observed.borrow();
    assert!(!observed.is_empty());
    for state in observed.iter() {
        assert_invariant(state);
    }
}
