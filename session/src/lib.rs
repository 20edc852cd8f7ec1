//! ClassDesk 会话核心
//!
//! 平台无关的会话逻辑层：不依赖浏览器 API，所有宿主能力
//! （凭据存储、网络提供方、时钟、延迟）都通过注入的适配器进入。
//! 前端 crate 提供 wasm 实现；单元测试注入内存 Mock。
//!
//! - `machine`: 会话状态机（登录/注册/刷新/登出/演示模式/401 清场）
//! - `guard`: 路由守卫的纯决策函数
//! - `demo`: 演示数据提供方（fixture + 人工延迟）
//! - `store`: 凭据存储抽象与类型化快照
//! - `provider`: 会话提供方能力接口（演示/远程双实现）

pub mod demo;
pub mod env;
pub mod error;
pub mod fixtures;
pub mod guard;
pub mod machine;
pub mod provider;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

pub use demo::DemoProvider;
pub use env::{Clock, Latency};
pub use error::{SessionError, SessionErrorStatus, SessionResult};
pub use guard::{GuardDecision, check_private, check_public};
pub use machine::{SessionEngine, SessionState};
pub use provider::SessionProvider;
pub use store::{CredentialRecord, CredentialStore};
