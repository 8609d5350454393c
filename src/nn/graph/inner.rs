/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : GraphInner：计算图的底层实现（节点管理、前向传播、反向传播）
 */

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;

use crate::nn::nodes::raw_node::{Add, Input, MatMul, Parameter, ReLU, SoftmaxCrossEntropy};
use crate::nn::nodes::{NodeHandle, NodeId, NodeType};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 计算图的底层实现。
///
/// 一般用户应通过`Graph`/`Var`句柄使用，不直接操作本类型。
pub struct GraphInner {
    name: String,
    nodes: HashMap<NodeId, NodeHandle>,
    /// 节点 → 父节点
    backward_edges: HashMap<NodeId, Vec<NodeId>>,
    next_id: u64,
    is_eval_mode: bool,
    /// 图级随机数发生器：有种子时参数初始化可复现
    pub(in crate::nn) rng: Option<StdRng>,
}

impl GraphInner {
    pub(in crate::nn) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: HashMap::new(),
            backward_edges: HashMap::new(),
            next_id: 0,
            is_eval_mode: false,
            rng: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_eval_mode(&self) -> bool {
        self.is_eval_mode
    }

    pub fn set_eval_mode(&mut self, eval: bool) {
        self.is_eval_mode = eval;
    }

    // ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓ 节点构建 ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓
    fn generate_node_name(&mut self, base: Option<&str>, node_type: &str) -> String {
        match base {
            Some(name) => name.to_string(),
            None => format!("{}_{}", node_type, self.next_id),
        }
    }

    fn register_node(
        &mut self,
        raw_node: NodeType,
        parents: &[NodeId],
        name: Option<&str>,
        node_type: &str,
    ) -> NodeId {
        let id = NodeId(self.next_id);
        let name = self.generate_node_name(name, node_type);
        self.next_id += 1;

        self.backward_edges.insert(id, parents.to_vec());
        self.nodes.insert(id, NodeHandle::new(id, name, raw_node));
        id
    }

    fn collect_parents(&self, parent_ids: &[NodeId]) -> Result<Vec<&NodeHandle>, GraphError> {
        parent_ids.iter().map(|id| self.get_node(*id)).collect()
    }

    pub fn new_input_node(
        &mut self,
        shape: &[usize],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        Ok(self.register_node(Input::new(shape).into(), &[], name, "input"))
    }

    pub fn new_parameter_node(
        &mut self,
        shape: &[usize],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        Ok(self.register_node(Parameter::new(shape).into(), &[], name, "parameter"))
    }

    pub fn new_add_node(
        &mut self,
        parents: &[NodeId],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let raw_node = Add::new(&self.collect_parents(parents)?)?;
        Ok(self.register_node(raw_node.into(), parents, name, "add"))
    }

    pub fn new_mat_mul_node(
        &mut self,
        left: NodeId,
        right: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [left, right];
        let raw_node = MatMul::new(&self.collect_parents(&parents)?)?;
        Ok(self.register_node(raw_node.into(), &parents, name, "mat_mul"))
    }

    pub fn new_relu_node(
        &mut self,
        parent: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [parent];
        let raw_node = ReLU::new(&self.collect_parents(&parents)?)?;
        Ok(self.register_node(raw_node.into(), &parents, name, "relu"))
    }

    pub fn new_softmax_cross_entropy_node(
        &mut self,
        logits: NodeId,
        labels: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [logits, labels];
        let raw_node = SoftmaxCrossEntropy::new(&self.collect_parents(&parents)?)?;
        Ok(self.register_node(raw_node.into(), &parents, name, "softmax_cross_entropy"))
    }
    // ↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑ 节点构建 ↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑

    // ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓ 节点访问 ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓
    pub fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    fn get_node_mut(&mut self, id: NodeId) -> Result<&mut NodeHandle, GraphError> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    fn get_node_parents(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        self.backward_edges
            .get(&id)
            .cloned()
            .ok_or(GraphError::NodeNotFound(id))
    }

    pub fn get_node_value(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        Ok(self.get_node(id)?.value())
    }

    pub fn set_node_value(&mut self, id: NodeId, value: Option<&Tensor>) -> Result<(), GraphError> {
        self.get_node_mut(id)?.set_value(value)
    }

    pub fn get_node_value_expected_shape(&self, id: NodeId) -> Result<&[usize], GraphError> {
        Ok(self.get_node(id)?.value_expected_shape())
    }

    pub fn get_node_grad(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        let node = self.get_node(id)?;
        if matches!(node.node_type(), NodeType::Input(_)) {
            return Err(GraphError::InvalidOperation(format!(
                "{}是输入节点，没有梯度",
                node
            )));
        }
        Ok(node.grad())
    }

    pub fn clear_node_grad(&mut self, id: NodeId) -> Result<(), GraphError> {
        self.get_node_mut(id)?.clear_grad()
    }

    /// 清空图中所有参数节点的梯度
    pub fn clear_grad(&mut self) -> Result<(), GraphError> {
        let trainable = self.get_trainable_nodes();
        for id in trainable {
            self.clear_node_grad(id)?;
        }
        Ok(())
    }

    /// 所有参数节点的 ID，按创建顺序排列
    pub fn get_trainable_nodes(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|node| node.is_trainable())
            .map(|node| node.id())
            .collect();
        ids.sort_by_key(|id| id.0);
        ids
    }
    // ↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑ 节点访问 ↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑

    // ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓ 前向传播 ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓
    /// 递归计算`id`节点的值（先保证所有父节点已计算）。
    /// 每次调用都会重新计算整条祖先链，保证喂入新输入后值是新鲜的。
    pub fn forward(&mut self, id: NodeId) -> Result<(), GraphError> {
        let parents = self.get_node_parents(id)?;
        for parent_id in &parents {
            self.forward(*parent_id)?;
        }

        // 这里将节点暂时从表中取出，以便同时借用父节点
        let mut node = self.nodes.remove(&id).ok_or(GraphError::NodeNotFound(id))?;
        let result = match self.collect_parents(&parents) {
            Ok(parent_refs) => node.calc_value_by_parents(&parent_refs),
            Err(e) => Err(e),
        };
        self.nodes.insert(id, node);
        result
    }
    // ↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑ 前向传播 ↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑

    // ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓ 反向传播 ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓
    /// 从`loss_id`出发做一次反向传播（VJP），返回损失的标量值。
    ///
    /// 中间节点的梯度每次都会重置；参数节点的梯度跨多次backward累积，
    /// 直到优化器调用`clear_grad`。
    pub fn backward(&mut self, loss_id: NodeId) -> Result<f32, GraphError> {
        if self.is_eval_mode {
            eprintln!(
                "[mini_torch 警告] 图`{}`处于eval模式，backward仍会计算梯度",
                self.name
            );
        }

        let loss_node = self.get_node(loss_id)?;
        let loss_value = loss_node.value().ok_or_else(|| {
            GraphError::ComputationError(format!("{}的值尚未计算，请先forward", loss_node))
        })?;
        let loss_scalar = loss_value.get_data_number().ok_or_else(|| {
            GraphError::InvalidOperation(format!(
                "{}的值不是标量，无法作为损失进行反向传播",
                loss_node
            ))
        })?;

        let topo_order = self.topological_sort_backward(loss_id)?;

        // 重置本次传播涉及的所有中间节点梯度（参数节点的梯度保留以便累积）
        for id in &topo_order {
            let node = self.get_node_mut(*id)?;
            if !node.is_trainable() {
                if matches!(node.node_type(), NodeType::Input(_)) {
                    continue;
                }
                node.clear_grad()?;
            }
        }

        // 损失对自身的梯度为1
        self.accumulate_grad(loss_id, &Tensor::ones(&[1, 1]))?;

        for node_id in topo_order {
            let node = self.get_node(node_id)?;
            if matches!(node.node_type(), NodeType::Input(_)) {
                continue;
            }
            let upstream_grad = match node.grad() {
                Some(grad) => grad.clone(),
                // 与损失无关的节点不会拿到梯度
                None => continue,
            };

            let parents = self.get_node_parents(node_id)?;
            for parent_id in &parents {
                let parent = self.get_node(*parent_id)?;
                if matches!(parent.node_type(), NodeType::Input(_)) {
                    continue;
                }
                let assistant_id = parents.iter().find(|id| **id != *parent_id).copied();
                let assistant = match assistant_id {
                    Some(id) => Some(self.get_node(id)?),
                    None => None,
                };
                let grad_to_parent = self.get_node(node_id)?.calc_grad_to_parent(
                    parent,
                    &upstream_grad,
                    assistant,
                )?;
                self.accumulate_grad(*parent_id, &grad_to_parent)?;
            }
        }

        Ok(loss_scalar)
    }

    fn accumulate_grad(&mut self, id: NodeId, grad: &Tensor) -> Result<(), GraphError> {
        let node = self.get_node_mut(id)?;
        let new_grad = match node.grad() {
            Some(existing) => existing + grad,
            None => grad.clone(),
        };
        node.set_grad(Some(&new_grad))
    }

    /// 反向传播的处理顺序：保证每个节点在其全部子节点之后被处理
    fn topological_sort_backward(&self, start: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let mut visited = HashSet::new();
        let mut post_order = Vec::new();
        self.visit_ancestors(start, &mut visited, &mut post_order)?;
        post_order.reverse();
        Ok(post_order)
    }

    fn visit_ancestors(
        &self,
        id: NodeId,
        visited: &mut HashSet<NodeId>,
        post_order: &mut Vec<NodeId>,
    ) -> Result<(), GraphError> {
        if !visited.insert(id) {
            return Ok(());
        }
        for parent_id in self.get_node_parents(id)? {
            self.visit_ancestors(parent_id, visited, post_order)?;
        }
        post_order.push(id);
        Ok(())
    }
    // ↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑ 反向传播 ↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑
}
