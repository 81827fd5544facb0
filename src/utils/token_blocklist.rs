use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// 已登出令牌的黑名单。
///
/// 令牌只需保留到其自身过期为止；过期后签名校验本身就会拒绝它，
/// 所以过期条目视为未拉黑，并由后台任务定期清理。
/// 在 `main` 中创建一次，克隆后注入认证服务与中间件。
#[derive(Clone, Default)]
pub struct TokenBlocklist {
    entries: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl TokenBlocklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self, token: &str, expires_at: DateTime<Utc>) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(token.to_string(), expires_at);
    }

    pub fn is_blocked(&self, token: &str) -> bool {
        self.is_blocked_at(token, Utc::now())
    }

    pub fn is_blocked_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(token)
            .map(|expires_at| *expires_at > now)
            .unwrap_or(false)
    }

    /// 删除已过期的条目，返回删除数量
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at > now);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
