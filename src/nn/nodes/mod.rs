/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : 节点层：NodeId、NodeHandle 与各类原始节点（raw node）
 */

pub(in crate::nn) mod raw_node;

pub(in crate::nn) use raw_node::{NodeType, TraitNode};

use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 节点 ID（图内唯一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// 节点句柄：持有节点 ID、名称与具体的原始节点
pub struct NodeHandle {
    id: NodeId,
    name: String,
    raw_node: NodeType,
}

impl NodeHandle {
    pub(in crate::nn) fn new<T: Into<NodeType>>(id: NodeId, name: String, raw_node: T) -> Self {
        Self {
            id,
            name,
            raw_node: raw_node.into(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub(in crate::nn) fn node_type(&self) -> &NodeType {
        &self.raw_node
    }

    /// 节点的预期输出形状（创建时即确定）
    pub fn value_expected_shape(&self) -> &[usize] {
        self.raw_node.value_expected_shape()
    }

    pub fn value(&self) -> Option<&Tensor> {
        self.raw_node.value()
    }

    pub fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        self.raw_node.set_value(value)
    }

    pub fn grad(&self) -> Option<&Tensor> {
        self.raw_node.grad()
    }

    pub fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.raw_node.set_grad(grad)
    }

    pub fn clear_grad(&mut self) -> Result<(), GraphError> {
        self.raw_node.set_grad(None)
    }

    pub fn is_trainable(&self) -> bool {
        self.raw_node.is_trainable()
    }

    pub(in crate::nn) fn calc_value_by_parents(
        &mut self,
        parents: &[&NodeHandle],
    ) -> Result<(), GraphError> {
        self.raw_node.calc_value_by_parents(parents)
    }

    pub(in crate::nn) fn calc_grad_to_parent(
        &self,
        target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        self.raw_node
            .calc_grad_to_parent(target_parent, upstream_grad, assistant_parent)
    }
}

impl std::fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "节点[{}(id={})]", self.name, self.id.0)
    }
}
