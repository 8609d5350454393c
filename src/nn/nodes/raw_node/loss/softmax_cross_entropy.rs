use super::super::{NodeHandle, TraitNode};
use crate::nn::{GraphError, NodeId};
use crate::tensor::Tensor;

/// Softmax交叉熵损失节点（融合实现）。
///
/// 前向：对logits逐行做数值稳定的softmax，再与one-hot标签求交叉熵，
/// 输出对batch取均值后的标量损失（形状`[1, 1]`）。
/// 反向：对logits的梯度为`(softmax - labels) / batch_size`，
/// 融合形式绕过了单独对softmax求雅可比的数值问题。
pub(in crate::nn) struct SoftmaxCrossEntropy {
    logits_parent_id: NodeId,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    /// 前向时缓存的softmax概率与标签，反向传播时直接复用
    softmax_cache: Option<Tensor>,
    labels_cache: Option<Tensor>,
}

impl SoftmaxCrossEntropy {
    /// 创建损失节点，父节点依次为logits与labels，二者形状须一致且为2维
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        if parents.len() != 2 {
            return Err(GraphError::InvalidOperation(format!(
                "Softmax交叉熵节点需要2个父节点（logits与labels），实际为{}个",
                parents.len()
            )));
        }
        for parent in parents {
            let dim = parent.value_expected_shape().len();
            if dim != 2 {
                return Err(GraphError::DimensionMismatch {
                    expected: 2,
                    got: dim,
                    message: format!("{}不是2维矩阵，无法参与交叉熵计算", parent),
                });
            }
        }
        let logits_shape = parents[0].value_expected_shape();
        let labels_shape = parents[1].value_expected_shape();
        if logits_shape != labels_shape {
            return Err(GraphError::ShapeMismatch {
                expected: logits_shape.to_vec(),
                got: labels_shape.to_vec(),
                message: format!("{}与{}的形状不一致，无法计算交叉熵", parents[0], parents[1]),
            });
        }
        Ok(Self {
            logits_parent_id: parents[0].id(),
            value: None,
            grad: None,
            softmax_cache: None,
            labels_cache: None,
        })
    }
}

impl TraitNode for SoftmaxCrossEntropy {
    fn value_expected_shape(&self) -> &[usize] {
        // 损失恒为标量
        &[1, 1]
    }

    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let logits = parents[0]
            .value()
            .ok_or_else(|| GraphError::ComputationError(format!("{}的值尚未计算", parents[0])))?;
        let labels = parents[1]
            .value()
            .ok_or_else(|| GraphError::ComputationError(format!("{}的值尚未计算", parents[1])))?;

        let batch_size = logits.shape()[0];
        let num_classes = logits.shape()[1];
        let mut softmax = Tensor::zeros(logits.shape());
        let mut total_loss = 0.0;

        for row in 0..batch_size {
            // 数值稳定：先减去该行最大值再取指数
            let mut max_logit = f32::NEG_INFINITY;
            for col in 0..num_classes {
                max_logit = max_logit.max(logits[[row, col]]);
            }
            let mut exp_sum = 0.0;
            for col in 0..num_classes {
                let exp_val = (logits[[row, col]] - max_logit).exp();
                softmax[[row, col]] = exp_val;
                exp_sum += exp_val;
            }
            // loss_row = log(Σexp) - Σ label·(logit - max)
            let log_sum = exp_sum.ln();
            for col in 0..num_classes {
                softmax[[row, col]] /= exp_sum;
                total_loss -= labels[[row, col]] * (logits[[row, col]] - max_logit - log_sum);
            }
        }

        self.value = Some(Tensor::new(&[total_loss / batch_size as f32], &[1, 1]));
        self.softmax_cache = Some(softmax);
        self.labels_cache = Some(labels.clone());
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn calc_grad_to_parent(
        &self,
        target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        _assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        if target_parent.id() != self.logits_parent_id {
            return Err(GraphError::InvalidOperation(
                "Softmax交叉熵节点不支持对标签求梯度".to_string(),
            ));
        }
        let softmax = self.softmax_cache.as_ref().ok_or_else(|| {
            GraphError::ComputationError("损失节点尚未前向传播，无法计算梯度".to_string())
        })?;
        let labels = self.labels_cache.as_ref().ok_or_else(|| {
            GraphError::ComputationError("损失节点尚未前向传播，无法计算梯度".to_string())
        })?;
        let upstream_scalar = upstream_grad.get_data_number().ok_or_else(|| {
            GraphError::ComputationError("损失节点的上游梯度应为标量".to_string())
        })?;

        let batch_size = softmax.shape()[0] as f32;
        Ok(&(softmax - labels) * (upstream_scalar / batch_size))
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.grad = grad.cloned();
        Ok(())
    }
}
