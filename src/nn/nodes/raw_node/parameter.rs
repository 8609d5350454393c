use super::{NodeHandle, TraitNode};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 参数节点：可训练的权重/偏置，梯度在反向传播时累积，由优化器读取和清零
pub(in crate::nn) struct Parameter {
    shape: Vec<usize>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
}

impl Parameter {
    pub(in crate::nn) fn new(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            value: None,
            grad: None,
        }
    }
}

impl TraitNode for Parameter {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, _parents: &[&NodeHandle]) -> Result<(), GraphError> {
        // 参数节点没有父节点，其值在创建时初始化，之后由优化器更新
        if self.value.is_none() {
            return Err(GraphError::ComputationError(
                "参数节点的值尚未初始化".to_string(),
            ));
        }
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        match value {
            Some(tensor) => {
                if tensor.shape() != self.shape.as_slice() {
                    return Err(GraphError::ShapeMismatch {
                        expected: self.shape.clone(),
                        got: tensor.shape().to_vec(),
                        message: "设置参数节点的值时形状与节点声明的形状不符".to_string(),
                    });
                }
                self.value = Some(tensor.clone());
            }
            None => self.value = None,
        }
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        _target_parent: &NodeHandle,
        _upstream_grad: &Tensor,
        _assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(
            "参数节点没有父节点，无法计算对父节点的梯度".to_string(),
        ))
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        if let Some(g) = grad {
            if g.shape() != self.shape.as_slice() {
                return Err(GraphError::ShapeMismatch {
                    expected: self.shape.clone(),
                    got: g.shape().to_vec(),
                    message: "参数节点的梯度形状与值形状不符".to_string(),
                });
            }
        }
        self.grad = grad.cloned();
        Ok(())
    }

    fn is_trainable(&self) -> bool {
        true
    }
}
