//! 数据模块
//!
//! 提供内置数据集与采样工具。
//!
//! # 主要组件
//!
//! - [`XorDataset`]: XOR 真值表数据集（分类任务）
//! - [`DataError`]: 数据访问错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use mini_torch::data::XorDataset;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let dataset = XorDataset::new();
//! let mut rng = StdRng::seed_from_u64(42);
//! let idx = dataset.sample_index(&mut rng);
//! let (x, y) = dataset.get(idx)?;
//! ```

pub mod error;
mod xor;


// Re-exports
pub use error::DataError;
pub use xor::XorDataset;
