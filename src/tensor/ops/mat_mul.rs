/*
 * @Author       : 老董
 * @Date         : 2026-02-07
 * @Description  : 矩阵乘法。只支持2维矩阵：[m,k] @ [k,n] = [m,n]。
 */

use crate::errors::TensorError;
use crate::tensor::Tensor;
use ndarray::Ix2;

impl Tensor {
    /// 矩阵乘法：`self @ other`
    ///
    /// # Panics
    /// - 任一操作数不是2维矩阵
    /// - `self`的列数不等于`other`的行数
    pub fn mat_mul(&self, other: &Self) -> Self {
        assert!(
            self.dimension() == 2,
            "{}",
            TensorError::NotA2dMatrix(self.dimension())
        );
        assert!(
            other.dimension() == 2,
            "{}",
            TensorError::NotA2dMatrix(other.dimension())
        );
        assert!(
            self.shape()[1] == other.shape()[0],
            "{}",
            TensorError::MatMulShapeMismatch {
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            }
        );

        let lhs = self
            .data
            .view()
            .into_dimensionality::<Ix2>()
            .expect("2维张量转换失败");
        let rhs = other
            .data
            .view()
            .into_dimensionality::<Ix2>()
            .expect("2维张量转换失败");

        Self {
            data: lhs.dot(&rhs).into_dyn(),
        }
    }
}
