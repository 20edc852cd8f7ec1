//! 会话提供方抽象
//!
//! 把"远程 / 演示"双路径收敛到一个能力接口：状态机的每个
//! transition 只调用一个抽象方法，自身不再按模式分支。两个实现：
//! - `DemoProvider`（本 crate）：纯本地 fixture 数据
//! - `SchoolApi`（前端 crate）：真实 HTTP 网关

use async_trait::async_trait;
use classdesk_shared::{AuthPayload, LoginRequest, RegisterRequest, User};

use crate::error::SessionResult;

#[async_trait(?Send)]
pub trait SessionProvider {
    /// 凭据登录；成功返回 token 对与用户档案
    async fn login(&self, credentials: &LoginRequest) -> SessionResult<AuthPayload>;

    /// 注册新用户；成功不代表建立会话（注册与登录解耦）
    async fn register(&self, data: &RegisterRequest) -> SessionResult<()>;

    /// 用 refresh token 换取新的 token 对
    async fn refresh(&self, refresh_token: &str) -> SessionResult<AuthPayload>;

    /// 远端登出；失败由调用方决定是否吞掉
    async fn logout(&self) -> SessionResult<()>;

    /// 获取当前凭据对应的用户档案
    async fn fetch_profile(&self) -> SessionResult<User>;
}
