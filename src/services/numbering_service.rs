use crate::entities::numbering_entity as numberings;
use crate::error::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QuerySelect, Set};

/// 订单编号计数器的键
pub const ORDER_NUMBERING: &str = "order";

/// 事务内编号分配。
///
/// `reserve` 对计数器行加排他锁 (SELECT ... FOR UPDATE)，锁持有到调用方事务
/// 提交或回滚为止；并发的下单事务在此处排队，各自拿到不同的序号。
/// 调用方必须在事务内先于其它写操作调用 `reserve`，并在同一事务内 `advance`。
#[derive(Clone, Default)]
pub struct NumberingService;

impl NumberingService {
    pub fn new() -> Self {
        Self
    }

    pub async fn reserve<C>(&self, txn: &C, key: &str) -> AppResult<numberings::Model>
    where
        C: ConnectionTrait,
    {
        numberings::Entity::find_by_id(key.to_string())
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| AppError::InternalError(format!("Numbering '{key}' is not seeded")))
    }

    pub async fn advance<C>(&self, txn: &C, numbering: numberings::Model) -> AppResult<i64>
    where
        C: ConnectionTrait,
    {
        let next = numbering.number + 1;
        let mut am = numbering.into_active_model();
        am.number = Set(next);
        am.update(txn).await?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::setup_db;
    use sea_orm::{DatabaseBackend, MockDatabase, TransactionTrait};

    #[tokio::test]
    async fn test_reserve_and_advance() {
        let db = setup_db().await;
        let svc = NumberingService::new();

        let txn = db.begin().await.unwrap();
        let n = svc.reserve(&txn, ORDER_NUMBERING).await.unwrap();
        assert_eq!(n.number, 1);
        assert_eq!(svc.advance(&txn, n).await.unwrap(), 2);
        txn.commit().await.unwrap();

        let txn = db.begin().await.unwrap();
        let n = svc.reserve(&txn, ORDER_NUMBERING).await.unwrap();
        assert_eq!(n.number, 2);
    }

    #[tokio::test]
    async fn test_rolled_back_advance_is_discarded() {
        let db = setup_db().await;
        let svc = NumberingService::new();

        {
            let txn = db.begin().await.unwrap();
            let n = svc.reserve(&txn, ORDER_NUMBERING).await.unwrap();
            svc.advance(&txn, n).await.unwrap();
            // 未提交即丢弃 -> 回滚
        }

        let n = svc.reserve(&db, ORDER_NUMBERING).await.unwrap();
        assert_eq!(n.number, 1);
    }

    #[tokio::test]
    async fn test_reserve_locks_counter_row_on_postgres() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![numberings::Model {
                id: ORDER_NUMBERING.to_string(),
                number: 7,
            }]])
            .into_connection();

        let n = NumberingService::new()
            .reserve(&db, ORDER_NUMBERING)
            .await
            .unwrap();
        assert_eq!(n.number, 7);

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("numberings"), "{sql}");
        assert!(sql.contains("FOR UPDATE"), "{sql}");
    }

    #[tokio::test]
    async fn test_missing_counter_is_internal_error() {
        let db = setup_db().await;
        let err = NumberingService::new()
            .reserve(&db, "invoice")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
    }
}
