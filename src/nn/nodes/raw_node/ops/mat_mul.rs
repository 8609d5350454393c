use super::super::{NodeHandle, TraitNode};
use crate::nn::{GraphError, NodeId};
use crate::tensor::Tensor;

/// 矩阵乘法节点：`[m, k] × [k, n] → [m, n]`
pub(in crate::nn) struct MatMul {
    shape: Vec<usize>,
    left_parent_id: NodeId,
    value: Option<Tensor>,
    grad: Option<Tensor>,
}

impl MatMul {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        if parents.len() != 2 {
            return Err(GraphError::InvalidOperation(format!(
                "矩阵乘法节点需要2个父节点，实际为{}个",
                parents.len()
            )));
        }
        for parent in parents {
            let dim = parent.value_expected_shape().len();
            if dim != 2 {
                return Err(GraphError::DimensionMismatch {
                    expected: 2,
                    got: dim,
                    message: format!("{}不是2维矩阵，无法参与矩阵乘法", parent),
                });
            }
        }
        let shape_a = parents[0].value_expected_shape();
        let shape_b = parents[1].value_expected_shape();
        if shape_a[1] != shape_b[0] {
            return Err(GraphError::ShapeMismatch {
                expected: shape_a.to_vec(),
                got: shape_b.to_vec(),
                message: format!(
                    "{}的列数({})与{}的行数({})不一致，无法相乘",
                    parents[0], shape_a[1], parents[1], shape_b[0]
                ),
            });
        }
        Ok(Self {
            shape: vec![shape_a[0], shape_b[1]],
            left_parent_id: parents[0].id(),
            value: None,
            grad: None,
        })
    }
}

impl TraitNode for MatMul {
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
        self.value = Some(a.mat_mul(b));
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn calc_grad_to_parent(
        &self,
        target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        let assistant = assistant_parent.ok_or_else(|| {
            GraphError::InvalidOperation(
                "矩阵乘法节点计算梯度时需要另一个父节点作为辅助".to_string(),
            )
        })?;
        let assistant_value = assistant
            .value()
            .ok_or_else(|| GraphError::ComputationError(format!("{}的值尚未计算", assistant)))?;

        // C = A×B：∂L/∂A = ∂L/∂C × Bᵀ，∂L/∂B = Aᵀ × ∂L/∂C
        if target_parent.id() == self.left_parent_id {
            Ok(upstream_grad.mat_mul(&assistant_value.transpose()))
        } else {
            Ok(assistant_value.transpose().mat_mul(upstream_grad))
        }
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.grad = grad.cloned();
        Ok(())
    }
}
