// ==========================================
// 产品生产追踪系统 - 序列号计数器仓储
// ==========================================
// 职责: 按作用域（厂商前缀 + 分类代码）发放单调递增的计数器
// 约束: 取值与自增在同一事务内完成
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct SerialCounterRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SerialCounterRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 取出作用域的下一个计数值并自增
    ///
    /// # 参数
    /// - scope: 计数器作用域
    /// - start: 作用域首次使用时的起始值
    pub fn next_value(&self, scope: &str, start: i64) -> RepositoryResult<i64> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            "INSERT OR IGNORE INTO serial_counter (scope, next_value) VALUES (?1, ?2)",
            params![scope, start],
        )?;
        let value: i64 = tx.query_row(
            "SELECT next_value FROM serial_counter WHERE scope = ?1",
            params![scope],
            |row| row.get(0),
        )?;
        tx.execute(
            "UPDATE serial_counter SET next_value = next_value + 1 WHERE scope = ?1",
            params![scope],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(value)
    }
}
