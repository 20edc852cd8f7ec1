//! 凭据存储抽象
//!
//! Credential Record 是唯一跨进程重启存活的会话状态。
//! 浏览器环境由 LocalStorage 实现，测试环境由内存 Map 实现。

use classdesk_shared::{
    STORAGE_DEMO_MODE, STORAGE_DEMO_USER, STORAGE_REFRESH_TOKEN, STORAGE_TOKEN, User,
};

use crate::error::{SessionError, SessionResult};

// =========================================================
// 抽象存储接口
// =========================================================

/// 凭据存储适配器：负责四个固定键的持久化
///
/// 注意：两个 token 键之间没有事务保证，写入中途崩溃可能留下
/// 不一致的键对；恢复路径是后续认证调用失败触发的登出清场。
pub trait CredentialStore {
    /// 读取指定键的值
    fn get(&self, key: &str) -> Option<String>;
    /// 写入键值
    fn set(&self, key: &str, value: &str);
    /// 删除键
    fn remove(&self, key: &str);
}

// =========================================================
// 类型化快照与便捷操作
// =========================================================

/// 持久化凭据的类型化快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CredentialRecord {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub demo_mode: bool,
    pub demo_user: Option<User>,
}

/// 从存储读取完整的 Credential Record
///
/// demoUser 反序列化失败视为不存在（记录告警，不中断初始化）。
pub fn load_record<S: CredentialStore + ?Sized>(store: &S) -> CredentialRecord {
    let demo_user = store.get(STORAGE_DEMO_USER).and_then(|raw| {
        serde_json::from_str::<User>(&raw)
            .map_err(|e| {
                log::warn!("stored demo user is unreadable, ignoring: {}", e);
            })
            .ok()
    });

    CredentialRecord {
        token: store.get(STORAGE_TOKEN),
        refresh_token: store.get(STORAGE_REFRESH_TOKEN),
        demo_mode: store.get(STORAGE_DEMO_MODE).as_deref() == Some("true"),
        demo_user,
    }
}

/// 持久化一对 token
pub fn persist_tokens<S: CredentialStore + ?Sized>(store: &S, token: &str, refresh_token: &str) {
    store.set(STORAGE_TOKEN, token);
    store.set(STORAGE_REFRESH_TOKEN, refresh_token);
}

/// 清除 token 键对
pub fn clear_tokens<S: CredentialStore + ?Sized>(store: &S) {
    store.remove(STORAGE_TOKEN);
    store.remove(STORAGE_REFRESH_TOKEN);
}

/// 持久化演示模式标志与演示用户快照
pub fn persist_demo<S: CredentialStore + ?Sized>(store: &S, user: &User) -> SessionResult<()> {
    let raw = serde_json::to_string(user)
        .map_err(|e| SessionError::from(e).in_op_with("store.set", STORAGE_DEMO_USER))?;
    store.set(STORAGE_DEMO_MODE, "true");
    store.set(STORAGE_DEMO_USER, &raw);
    Ok(())
}

/// 清除演示模式键
pub fn clear_demo<S: CredentialStore + ?Sized>(store: &S) {
    store.remove(STORAGE_DEMO_MODE);
    store.remove(STORAGE_DEMO_USER);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MemoryStore;
    use classdesk_shared::DEMO_EMAIL;

    #[test]
    fn record_roundtrip() {
        let store = MemoryStore::new();
        persist_tokens(&store, "tok", "ref");
        persist_demo(&store, &crate::fixtures::demo_user()).unwrap();

        let record = load_record(&store);
        assert_eq!(record.token.as_deref(), Some("tok"));
        assert_eq!(record.refresh_token.as_deref(), Some("ref"));
        assert!(record.demo_mode);
        assert_eq!(record.demo_user.unwrap().email, DEMO_EMAIL);
    }

    #[test]
    fn corrupt_demo_user_is_ignored() {
        let store = MemoryStore::new();
        store.set(STORAGE_DEMO_MODE, "true");
        store.set(STORAGE_DEMO_USER, "{not json");

        let record = load_record(&store);
        assert!(record.demo_mode);
        assert!(record.demo_user.is_none());
    }

    #[test]
    fn clear_removes_only_its_keys() {
        let store = MemoryStore::new();
        persist_tokens(&store, "tok", "ref");
        persist_demo(&store, &crate::fixtures::demo_user()).unwrap();

        clear_demo(&store);
        let record = load_record(&store);
        assert!(!record.demo_mode);
        assert!(record.demo_user.is_none());
        assert_eq!(record.token.as_deref(), Some("tok"));

        clear_tokens(&store);
        assert_eq!(load_record(&store), CredentialRecord::default());
    }
}
