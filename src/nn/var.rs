/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : Var：面向用户的变量句柄；Init：参数初始化策略
 */

use std::cell::RefCell;
use std::ops::Add;
use std::rc::Rc;

use super::graph::{Graph, GraphInner};
use super::{GraphError, NodeId};
use crate::tensor::Tensor;

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓ 参数初始化 ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/

/// 参数初始化策略。本库的层只用到两种：
/// 权重走Kaiming（配合ReLU），偏置清零。
#[derive(Debug, Clone, Copy)]
pub enum Init {
    /// 全零
    Zeros,
    /// Kaiming/He正态初始化，std = sqrt(2 / fan_in)
    Kaiming,
}

impl Init {
    /// 按策略生成初始值（线程本地RNG）
    pub fn generate(self, shape: &[usize]) -> Tensor {
        match self {
            Self::Zeros => Tensor::zeros(shape),
            Self::Kaiming => Tensor::normal(0.0, Self::kaiming_std(shape), shape),
        }
    }

    /// 按策略生成初始值（外部传入RNG，结果可复现）
    pub fn generate_with_rng(self, shape: &[usize], rng: &mut rand::rngs::StdRng) -> Tensor {
        match self {
            Self::Zeros => Tensor::zeros(shape),
            Self::Kaiming => {
                Tensor::normal_with_rng(0.0, Self::kaiming_std(shape), shape, rng)
            }
        }
    }

    // fan_in取shape[0]，即线性层的输入维度
    fn kaiming_std(shape: &[usize]) -> f32 {
        (2.0 / shape[0] as f32).sqrt()
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑ 参数初始化 ↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/// 变量句柄：一个节点ID加上它所在图的强引用。
///
/// 克隆只复制一次`Rc`；任意一个句柄存活，图就不会被释放。
/// 配合算子重载与扩展trait，可以像写PyTorch脚本一样搭图：
///
/// ```ignore
/// let h = x.matmul(&w)?.relu();
/// let loss = (&h + &b).cross_entropy(&target)?;
/// loss.backward()?;
/// ```
#[derive(Clone)]
pub struct Var {
    id: NodeId,
    graph: Rc<RefCell<GraphInner>>,
}

impl Var {
    pub(crate) const fn new(id: NodeId, graph: Rc<RefCell<GraphInner>>) -> Self {
        Self { id, graph }
    }

    /// 由本句柄派生出同图的新句柄（扩展trait创建完新节点后用）
    pub(crate) fn derived(&self, id: NodeId) -> Self {
        Self::new(id, Rc::clone(&self.graph))
    }

    pub const fn node_id(&self) -> NodeId {
        self.id
    }

    pub(crate) const fn graph(&self) -> &Rc<RefCell<GraphInner>> {
        &self.graph
    }

    /// 两个句柄是否指向同一张图
    pub fn same_graph(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.graph, &other.graph)
    }

    pub(crate) fn assert_same_graph(&self, other: &Self) {
        assert!(
            self.same_graph(other),
            "不能对来自不同Graph的Var进行操作"
        );
    }

    /// 取回所属图的`Graph`句柄。
    /// Var自身持有图的强引用，即便最初的`Graph`已drop也能取回。
    pub fn get_graph(&self) -> Graph {
        Graph::from_rc(Rc::clone(&self.graph))
    }

    /// 节点建图时就确定下来的输出形状
    pub fn value_expected_shape(&self) -> Vec<usize> {
        self.graph
            .borrow()
            .get_node_value_expected_shape(self.id)
            .expect("获取形状失败")
            .to_vec()
    }

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓ 值与梯度 ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/

    /// 节点当前的值（克隆一份；尚未前向过则为None）
    pub fn value(&self) -> Result<Option<Tensor>, GraphError> {
        Ok(self.graph.borrow().get_node_value(self.id)?.cloned())
    }

    /// 喂入新值（形状必须与建图时一致）
    pub fn set_value(&self, value: &Tensor) -> Result<(), GraphError> {
        self.graph.borrow_mut().set_node_value(self.id, Some(value))
    }

    /// 节点当前的梯度（克隆一份；未反向或已清零则为None）
    pub fn grad(&self) -> Result<Option<Tensor>, GraphError> {
        Ok(self.graph.borrow().get_node_grad(self.id)?.cloned())
    }

    /// 取1x1张量中的那个纯数
    pub fn item(&self) -> Result<f32, GraphError> {
        match self.value()? {
            Some(v) => v
                .get_data_number()
                .ok_or_else(|| GraphError::InvalidOperation("Tensor 不是标量".to_string())),
            None => Err(GraphError::NodeNotFound(self.id)),
        }
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑ 值与梯度 ↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓ 前向/反向 ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/

    /// 以本节点为终点执行前向传播
    pub fn forward(&self) -> Result<(), GraphError> {
        self.graph.borrow_mut().forward(self.id)
    }

    /// 以本节点（须是标量损失）为起点执行反向传播，返回损失值。
    /// 会先补一次前向，保证损失值是最新的。
    pub fn backward(&self) -> Result<f32, GraphError> {
        let mut g = self.graph.borrow_mut();
        g.forward(self.id)?;
        g.backward(self.id)
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑ 前向/反向 ↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /// 加法的可失败版本：跨图或形状不匹配时返回错误而非panic
    pub fn try_add(&self, other: &Self) -> Result<Self, GraphError> {
        if !self.same_graph(other) {
            return Err(GraphError::InvalidOperation(
                "不能对来自不同 Graph 的 Var 进行加法".to_string(),
            ));
        }
        let id = self
            .graph
            .borrow_mut()
            .new_add_node(&[self.id, other.id], None)?;
        Ok(self.derived(id))
    }
}

impl std::fmt::Debug for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Var").field("id", &self.id).finish()
    }
}

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓ 算子重载（四种引用组合都落到 &Var + &Var）↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Add<&Var> for &Var {
    type Output = Var;

    fn add(self, rhs: &Var) -> Var {
        self.try_add(rhs).expect("Var 加法失败")
    }
}

impl Add<Var> for &Var {
    type Output = Var;

    fn add(self, rhs: Var) -> Var {
        self + &rhs
    }
}

impl Add<&Self> for Var {
    type Output = Self;

    fn add(self, rhs: &Self) -> Self {
        &self + rhs
    }
}

impl Add for Var {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        &self + &rhs
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑ 算子重载（四种引用组合都落到 &Var + &Var）↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
