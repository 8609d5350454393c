//! 数据访问错误类型定义

use thiserror::Error;

/// 数据访问相关错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    /// 索引越界
    #[error("索引越界: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}
