/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : SGD 优化器
 */

use std::cell::RefCell;
use std::rc::Rc;

use super::Optimizer;
use crate::nn::graph::GraphInner;
use crate::nn::{Graph, GraphError, NodeId, Var};

/// SGD 优化器（PyTorch 风格）
///
/// 随机梯度下降：θ = θ - α * ∇θ
///
/// # 使用示例
/// ```ignore
/// let mut optimizer = SGD::new(&graph, &model.parameters(), 0.1);
/// optimizer.zero_grad()?;
/// loss.backward()?;
/// optimizer.step()?;
/// ```
pub struct SGD {
    /// 图引用
    graph: Rc<RefCell<GraphInner>>,
    /// 要优化的参数节点 ID
    params: Vec<NodeId>,
    /// 学习率
    lr: f32,
}

impl SGD {
    /// 创建新的 SGD 优化器
    ///
    /// # 参数
    /// - `graph`: 图句柄
    /// - `params`: 要优化的参数 Var 列表
    /// - `lr`: 学习率
    pub fn new(graph: &Graph, params: &[Var], lr: f32) -> Self {
        Self {
            graph: graph.inner_rc(),
            params: params.iter().map(Var::node_id).collect(),
            lr,
        }
    }
}

impl Optimizer for SGD {
    fn zero_grad(&mut self) -> Result<(), GraphError> {
        let mut g = self.graph.borrow_mut();
        for &node_id in &self.params {
            g.clear_node_grad(node_id)?;
        }
        Ok(())
    }

    fn step(&mut self) -> Result<(), GraphError> {
        let mut g = self.graph.borrow_mut();
        for &node_id in &self.params {
            let grad = match g.get_node_grad(node_id)? {
                Some(grad) => grad.clone(),
                // 未参与本次反向传播的参数跳过
                None => continue,
            };
            let current = g
                .get_node_value(node_id)?
                .ok_or_else(|| {
                    GraphError::ComputationError(format!("参数节点 {node_id:?} 没有值"))
                })?
                .clone();
            let new_value = current - self.lr * &grad;
            g.set_node_value(node_id, Some(&new_value))?;
        }
        Ok(())
    }

    fn minimize(&mut self, loss: &Var) -> Result<f32, GraphError> {
        self.zero_grad()?;
        let loss_val = loss.backward()?;
        self.step()?;
        Ok(loss_val)
    }

    fn learning_rate(&self) -> f32 {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.lr = lr;
    }

    fn reset(&mut self) {
        // SGD 无状态
    }
}
