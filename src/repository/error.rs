// ==========================================
// 产品生产追踪系统 - 仓储层错误类型
// ==========================================
// 约束: SQLite 约束失败按类型区分（序列号重复 / 产品不存在）
// ==========================================

use crate::domain::error::DomainError;
use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    // 例如 idx_production_serial
    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    // production_record.product_id 指向不存在的产品
    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    /// 已存储的行无法还原为合法领域对象
    #[error("存储值非法 (field={field}): {message}")]
    InvalidStoredValue { field: String, message: String },

    #[error("配置快照序列化失败: {0}")]
    SnapshotError(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("UNIQUE") => {
                RepositoryError::UniqueConstraintViolation(msg)
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("FOREIGN KEY") => {
                RepositoryError::ForeignKeyViolation(msg)
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::DatabaseQueryError(msg),
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            other => RepositoryError::DatabaseQueryError(other.to_string()),
        }
    }
}

impl From<DomainError> for RepositoryError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { field, message } => {
                RepositoryError::InvalidStoredValue { field, message }
            }
            DomainError::InvalidStateTransition { from, to } => {
                RepositoryError::InvalidStateTransition { from, to }
            }
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
