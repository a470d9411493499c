// ==========================================
// 产品生产追踪系统 - 领域层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 职责: 输入校验失败、非法状态转换
// ==========================================

use thiserror::Error;

/// 领域层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// 输入校验失败（空名称、空厂商、非正数量、负计数器等）
    #[error("数据验证失败 (field={field}): {message}")]
    Validation { field: String, message: String },

    /// 生命周期状态只能单向推进
    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },
}

impl DomainError {
    /// 构造字段校验错误
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

/// 校验字符串字段非空（忽略首尾空白）
pub(crate) fn require_non_blank(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "不能为空"));
    }
    Ok(())
}
