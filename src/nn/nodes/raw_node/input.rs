use super::{NodeHandle, TraitNode};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 输入节点：值由外部喂入（样本、标签等），不参与训练，也没有梯度
pub(in crate::nn) struct Input {
    shape: Vec<usize>,
    value: Option<Tensor>,
}

impl Input {
    pub(in crate::nn) fn new(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            value: None,
        }
    }
}

impl TraitNode for Input {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, _parents: &[&NodeHandle]) -> Result<(), GraphError> {
        // 输入节点没有父节点，其值只能由外部设置
        if self.value.is_none() {
            return Err(GraphError::ComputationError(
                "输入节点的值尚未设置，请先调用set_value".to_string(),
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
                        message: "设置输入节点的值时形状与节点声明的形状不符".to_string(),
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
            "输入节点没有父节点，无法计算对父节点的梯度".to_string(),
        ))
    }

    fn grad(&self) -> Option<&Tensor> {
        None
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        if grad.is_some() {
            return Err(GraphError::InvalidOperation(
                "输入节点不应该持有梯度".to_string(),
            ));
        }
        Ok(())
    }
}
