// ==========================================
// 产品生产追踪系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value, scope_id='global')
// ==========================================

use crate::db::configure_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        tracing::debug!(key, value, "配置已更新");
        Ok(())
    }

    /// 读取整数配置，不存在或格式错误时返回默认值
    fn get_i64_or(&self, key: &str, default: i64) -> RepositoryResult<i64> {
        let raw = self.get_global_config_value(key)?;
        Ok(match raw {
            Some(v) => match v.trim().parse::<i64>() {
                Ok(n) => n,
                Err(_) => {
                    tracing::warn!(key, value = %v, default, "配置值不是整数，使用默认值");
                    default
                }
            },
            None => default,
        })
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&json!(config_map))
            .map_err(|e| RepositoryError::SnapshotError(e.to_string()))
    }

    // ===== 序列号 =====

    /// 新作用域计数器的起始值（负值按默认处理）
    pub fn get_serial_counter_start(&self) -> RepositoryResult<i64> {
        let v = self.get_i64_or(config_keys::SERIAL_COUNTER_START, defaults::SERIAL_COUNTER_START)?;
        Ok(if v < 0 { defaults::SERIAL_COUNTER_START } else { v })
    }

    // ===== 生产日志 =====

    /// 生产日志默认展示条数（至少 1）
    pub fn get_production_log_limit(&self) -> RepositoryResult<usize> {
        let v = self.get_i64_or(config_keys::PRODUCTION_LOG_LIMIT, defaults::PRODUCTION_LOG_LIMIT)?;
        Ok(v.max(1) as usize)
    }

    /// CSV 导出分隔符（取首个 ASCII 字符）
    pub fn get_csv_delimiter(&self) -> RepositoryResult<u8> {
        let raw = self.get_global_config_value(config_keys::CSV_DELIMITER)?;
        Ok(raw
            .and_then(|v| v.chars().next())
            .filter(|c| c.is_ascii())
            .map(|c| c as u8)
            .unwrap_or(defaults::CSV_DELIMITER))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 序列号
    pub const SERIAL_COUNTER_START: &str = "serial_counter_start";

    // 生产日志
    pub const PRODUCTION_LOG_LIMIT: &str = "production_log_limit";
    pub const CSV_DELIMITER: &str = "csv_delimiter";
}

// 默认值
pub mod defaults {
    pub const SERIAL_COUNTER_START: i64 = 1;
    pub const PRODUCTION_LOG_LIMIT: i64 = 100;
    pub const CSV_DELIMITER: u8 = b',';
}
