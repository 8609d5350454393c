mod input;
mod loss;
mod ops;
mod parameter;

pub(in crate::nn) use input::Input;
pub(in crate::nn) use loss::SoftmaxCrossEntropy;
pub(in crate::nn) use ops::{Add, MatMul, ReLU};
pub(in crate::nn) use parameter::Parameter;

use super::NodeHandle;
use crate::nn::GraphError;
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
pub(in crate::nn) enum NodeType {
    Input(Input),
    Parameter(Parameter),
    Add(Add),
    MatMul(MatMul),
    ReLU(ReLU),
    SoftmaxCrossEntropy(SoftmaxCrossEntropy),
}

#[enum_dispatch(NodeType)]
pub(in crate::nn) trait TraitNode {
    /// 节点的预期输出形状（创建时即确定）
    fn value_expected_shape(&self) -> &[usize];

    // 根据父节点的值计算本节点的值（注意：由于该接口只在Graph中使用，所以实现时不用关心
    // 父节点的值是否已被计算，所有父节点的值已预先被计算过了）
    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError>;

    fn value(&self) -> Option<&Tensor>;

    fn set_value(&mut self, _value: Option<&Tensor>) -> Result<(), GraphError> {
        Err(GraphError::InvalidOperation(
            "该类型节点的值不应该被手动设置".to_string(),
        ))
    }

    /// VJP：给定上游梯度，计算损失对目标父节点的梯度。
    /// 二元节点需要借助`assistant_parent`（另一个父节点）的值。
    fn calc_grad_to_parent(
        &self,
        target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError>;

    fn grad(&self) -> Option<&Tensor>;

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError>;

    /// 返回该节点的参数是否应该在训练过程中被更新
    fn is_trainable(&self) -> bool {
        false
    }
}
