//! 环境适配器
//!
//! 把时间与延迟这两个宿主能力抽象出来，让核心逻辑在
//! 浏览器 (wasm) 与原生测试环境下都能运行。

use async_trait::async_trait;

/// 时钟适配器：提供 Unix 毫秒时间戳
///
/// 演示模式的合成 token 带有创建时刻的时间戳后缀。
pub trait Clock {
    fn now_millis(&self) -> u64;
}

/// 延迟适配器：模拟网络调用的等待
#[async_trait(?Send)]
pub trait Latency {
    async fn sleep(&self, millis: u32);
}
