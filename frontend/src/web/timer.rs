//! 定时与时钟适配模块
//!
//! 为会话核心提供浏览器实现：`gloo-timers` 的 TimeoutFuture 做
//! 人工延迟，`js_sys::Date` 做毫秒时钟。

use async_trait::async_trait;
use classdesk_session::{Clock, Latency};
use gloo_timers::future::TimeoutFuture;

/// 浏览器延迟适配器（setTimeout 封装）
pub struct BrowserLatency;

#[async_trait(?Send)]
impl Latency for BrowserLatency {
    async fn sleep(&self, millis: u32) {
        TimeoutFuture::new(millis).await;
    }
}

/// 浏览器时钟适配器
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_millis(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}
