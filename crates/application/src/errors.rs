//! 应用层错误定义
//!
//! 定义应用层特定的错误类型。

use domain::errors::DomainError;
use thiserror::Error;

/// 应用层错误类型
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 领域层错误
    #[error("领域错误: {0}")]
    Domain(#[from] DomainError),

    /// 验证错误
    #[error("验证失败: {0}")]
    Validation(String),

    /// 未找到资源
    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 并发冲突
    #[error("并发冲突: {0}")]
    Conflict(String),

    /// 基础设施层错误
    #[error("基础设施错误: {0}")]
    Infrastructure(String),
}

impl ApplicationError {
    /// 是否为"未找到"类错误
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Domain(e) => e.is_not_found(),
            _ => false,
        }
    }
}

/// 应用层结果类型
pub type ApplicationResult<T> = Result<T, ApplicationError>;
