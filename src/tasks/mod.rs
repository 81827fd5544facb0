//! 后台定时任务，启动时调用一次 `spawn_all`

use crate::utils::TokenBlocklist;

const BLOCKLIST_PURGE_INTERVAL_SECS: u64 = 10 * 60;

/// Spawn all background tasks. Detached via `tokio::spawn`; does not block.
pub fn spawn_all(blocklist: TokenBlocklist) {
    // 清理已过期的黑名单令牌（每 10 分钟）
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(std::time::Duration::from_secs(BLOCKLIST_PURGE_INTERVAL_SECS)).await;
            let removed = blocklist.purge_expired();
            if removed > 0 {
                log::info!("Purged {removed} expired tokens from blocklist");
            }
        }
    });
}
