use super::super::{NodeHandle, TraitNode};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// ReLU激活节点：`max(0, x)`
pub(in crate::nn) struct ReLU {
    shape: Vec<usize>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    /// 前向时缓存的父节点值，反向传播时用于计算掩码
    parent_value_cache: Option<Tensor>,
}

impl ReLU {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        if parents.len() != 1 {
            return Err(GraphError::InvalidOperation(format!(
                "ReLU节点需要1个父节点，实际为{}个",
                parents.len()
            )));
        }
        Ok(Self {
            shape: parents[0].value_expected_shape().to_vec(),
            value: None,
            grad: None,
            parent_value_cache: None,
        })
    }
}

impl TraitNode for ReLU {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let parent_value = parents[0]
            .value()
            .ok_or_else(|| GraphError::ComputationError(format!("{}的值尚未计算", parents[0])))?;
        self.value = Some(parent_value.where_with_f32(|x| x > 0.0, |x| x, |_| 0.0));
        self.parent_value_cache = Some(parent_value.clone());
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn calc_grad_to_parent(
        &self,
        _target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        _assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        let parent_value = self.parent_value_cache.as_ref().ok_or_else(|| {
            GraphError::ComputationError("ReLU节点尚未前向传播，无法计算梯度".to_string())
        })?;
        // x>0处导数为1，其余为0
        let mask = parent_value.where_with_f32(|x| x > 0.0, |_| 1.0, |_| 0.0);
        Ok(upstream_grad * &mask)
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.grad = grad.cloned();
        Ok(())
    }
}
