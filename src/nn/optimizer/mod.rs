/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : 优化器模块，实现 PyTorch 风格的梯度优化算法
 */

mod sgd;

pub use sgd::SGD;

use crate::nn::{GraphError, Var};

/// Optimizer trait（PyTorch 风格）
///
/// # 设计要点
/// - Optimizer 绑定特定参数（通过 Var）
/// - `backward()` 计算所有参数的梯度（由 Var 调用）
/// - `step()` 只更新 Optimizer 绑定的参数
///
/// # 使用示例
/// ```ignore
/// let mut optimizer = SGD::new(&graph, &model.parameters(), 0.1);
///
/// // 训练循环
/// optimizer.zero_grad()?;
/// let loss_val = loss.backward()?;
/// optimizer.step()?;
///
/// // 或者一步完成
/// let loss_val = optimizer.minimize(&loss)?;
/// ```
pub trait Optimizer {
    /// 清零所有绑定参数的梯度
    fn zero_grad(&mut self) -> Result<(), GraphError>;

    /// 更新参数（只更新 Optimizer 绑定的参数）
    fn step(&mut self) -> Result<(), GraphError>;

    /// 一步完成：zero_grad + forward + backward + step
    ///
    /// # 返回
    /// loss 的标量值
    fn minimize(&mut self, loss: &Var) -> Result<f32, GraphError>;

    /// 获取学习率
    fn learning_rate(&self) -> f32;

    /// 设置学习率
    fn set_learning_rate(&mut self, lr: f32);

    /// 重置累积状态（如动量）
    fn reset(&mut self);
}
