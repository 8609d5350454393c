/*
 * @Author       : 老董
 * @Date         : 2026-02-07
 * @Description  : 张量的乘法，实现了两个张量“逐元素”（或张量与纯数）相乘的运算，并返回一个新的张量。
 *                 注意：这里是Hadamard积（逐元素相乘），不是矩阵乘法，矩阵乘法见`mat_mul`。
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use std::ops::Mul;

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓f32 *（不）带引用的张量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Mul<Tensor> for f32 {
    type Output = Tensor;

    fn mul(self, tensor: Tensor) -> Tensor {
        Tensor {
            data: self * &tensor.data,
        }
    }
}
impl<'a> Mul<&'a Tensor> for f32 {
    type Output = Tensor;

    fn mul(self, tensor: &'a Tensor) -> Tensor {
        Tensor {
            data: self * &tensor.data,
        }
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑f32 *（不）带引用的张量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓（不）带引用的张量 * f32↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Mul<f32> for Tensor {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            data: &self.data * scalar,
        }
    }
}
impl Mul<f32> for &Tensor {
    type Output = Tensor;

    fn mul(self, scalar: f32) -> Tensor {
        Tensor {
            data: &self.data * scalar,
        }
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑（不）带引用的张量 * f32↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓（不）带引用的张量 *（不）带引用的张量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Mul for Tensor {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        mul_within_tensors(&self, &other)
    }
}

impl<'a> Mul<&'a Self> for Tensor {
    type Output = Self;

    fn mul(self, other: &'a Self) -> Self {
        mul_within_tensors(&self, other)
    }
}

impl Mul<Tensor> for &Tensor {
    type Output = Tensor;

    fn mul(self, other: Tensor) -> Tensor {
        mul_within_tensors(self, &other)
    }
}

impl<'b> Mul<&'b Tensor> for &Tensor {
    type Output = Tensor;

    fn mul(self, other: &'b Tensor) -> Tensor {
        mul_within_tensors(self, other)
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑（不）带引用的张量 *（不）带引用的张量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/// 两个张量逐元素相乘，支持NumPy风格广播（broadcasting）
///
/// # Panics
/// 如果形状不兼容（无法广播）
fn mul_within_tensors(tensor_1: &Tensor, tensor_2: &Tensor) -> Tensor {
    assert!(
        tensor_1.can_broadcast_with(tensor_2),
        "{}",
        TensorError::OperatorError {
            operator: Operator::Mul,
            tensor1_shape: tensor_1.shape().to_vec(),
            tensor2_shape: tensor_2.shape().to_vec(),
        }
    );
    Tensor {
        data: &tensor_1.data * &tensor_2.data,
    }
}
