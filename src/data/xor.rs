//! XOR 真值表数据集
//!
//! 经典的异或问题：线性模型无法拟合，最小的"非平凡"分类任务。
//! 标签采用 one-hot 编码：`(0, 1)`表示异或结果为0，`(1, 0)`表示异或结果为1。

use rand::rngs::StdRng;
use rand::Rng;

use super::DataError;
use crate::tensor::Tensor;

/// 固定的4条样本：输入为2维（两个布尔量），标签为2类one-hot
const XOR_SAMPLES: [([f32; 2], [f32; 2]); 4] = [
    ([0.0, 0.0], [0.0, 1.0]),
    ([1.0, 0.0], [1.0, 0.0]),
    ([0.0, 1.0], [1.0, 0.0]),
    ([1.0, 1.0], [0.0, 1.0]),
];

/// XOR 数据集
///
/// 每个样本是`([1, 2], [1, 2])`形状的(输入, 标签)张量对。
pub struct XorDataset;

impl XorDataset {
    pub fn new() -> Self {
        Self
    }

    /// 样本数（恒为4）
    pub fn len(&self) -> usize {
        XOR_SAMPLES.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// 获取第`index`条样本，返回(输入, one-hot标签)
    pub fn get(&self, index: usize) -> Result<(Tensor, Tensor), DataError> {
        let (x, y) = XOR_SAMPLES
            .get(index)
            .ok_or(DataError::IndexOutOfBounds {
                index,
                len: XOR_SAMPLES.len(),
            })?;
        Ok((Tensor::new(x, &[1, 2]), Tensor::new(y, &[1, 2])))
    }

    /// 均匀随机抽取一个样本下标
    pub fn sample_index(&self, rng: &mut StdRng) -> usize {
        rng.gen_range(0..XOR_SAMPLES.len())
    }
}

impl Default for XorDataset {
    fn default() -> Self {
        Self::new()
    }
}
