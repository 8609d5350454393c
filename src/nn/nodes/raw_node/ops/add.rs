use super::super::{NodeHandle, TraitNode};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 加法节点：两个同形状父节点的逐元素相加
pub(in crate::nn) struct Add {
    shape: Vec<usize>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
}

impl Add {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        if parents.len() != 2 {
            return Err(GraphError::InvalidOperation(format!(
                "加法节点需要2个父节点，实际为{}个",
                parents.len()
            )));
        }
        let shape_a = parents[0].value_expected_shape();
        let shape_b = parents[1].value_expected_shape();
        if shape_a != shape_b {
            return Err(GraphError::ShapeMismatch {
                expected: shape_a.to_vec(),
                got: shape_b.to_vec(),
                message: format!("{}与{}的形状不一致，无法相加", parents[0], parents[1]),
            });
        }
        Ok(Self {
            shape: shape_a.to_vec(),
            value: None,
            grad: None,
        })
    }
}

impl TraitNode for Add {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let a = parents[0]
            .value()
            .ok_or_else(|| GraphError::ComputationError(format!("{}的值尚未计算", parents[0])))?;
        let b = parents[1]
            .value()
            .ok_or_else(|| GraphError::ComputationError(format!("{}的值尚未计算", parents[1])))?;
        self.value = Some(a + b);
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
        // 加法对任一父节点的雅可比都是单位阵，梯度原样传递
        Ok(upstream_grad.clone())
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.grad = grad.cloned();
        Ok(())
    }
}
