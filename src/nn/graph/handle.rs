/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : Graph：计算图的用户级句柄（PyTorch 风格）
 */

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use rand::{rngs::StdRng, SeedableRng};

use super::inner::GraphInner;
use super::GraphError;
use crate::nn::var::{Init, Var};
use crate::tensor::Tensor;

/// 计算图句柄：内部共享同一个`GraphInner`，可廉价克隆。
///
/// 典型用法：
/// ```ignore
/// let graph = Graph::new();
/// let x = graph.input(&[1, 2])?;
/// let w = graph.parameter(&[2, 8], Init::Kaiming, "w")?;
/// ```
#[derive(Clone)]
pub struct Graph {
    inner: Rc<RefCell<GraphInner>>,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(GraphInner::new("default_graph"))),
        }
    }

    /// 创建带种子的图：参数初始化使用图自有的随机数发生器，结果可复现
    pub fn new_with_seed(seed: u64) -> Self {
        let graph = Self::new();
        graph.inner.borrow_mut().rng = Some(StdRng::seed_from_u64(seed));
        graph
    }

    pub(in crate::nn) fn from_rc(inner: Rc<RefCell<GraphInner>>) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> Ref<'_, GraphInner> {
        self.inner.borrow()
    }

    pub fn inner_mut(&self) -> RefMut<'_, GraphInner> {
        self.inner.borrow_mut()
    }

    pub(in crate::nn) fn inner_rc(&self) -> Rc<RefCell<GraphInner>> {
        self.inner.clone()
    }

    // ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓ 节点创建 ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓
    /// 创建一个输入节点（值由外部喂入）
    pub fn input(&self, shape: &[usize]) -> Result<Var, GraphError> {
        let id = self.inner_mut().new_input_node(shape, None)?;
        Ok(Var::new(id, self.inner_rc()))
    }

    /// 创建一个输入节点并立即喂入值
    pub fn input_with_value(&self, value: &Tensor) -> Result<Var, GraphError> {
        let var = self.input(value.shape())?;
        var.set_value(value)?;
        Ok(var)
    }

    /// 创建一个参数节点并按`init`初始化。
    /// 若图带种子，初始化使用图自有的随机数发生器。
    pub fn parameter(&self, shape: &[usize], init: Init, name: &str) -> Result<Var, GraphError> {
        let mut inner = self.inner_mut();
        let id = inner.new_parameter_node(shape, Some(name))?;
        let initial = match inner.rng.as_mut() {
            Some(rng) => init.generate_with_rng(shape, rng),
            None => init.generate(shape),
        };
        inner.set_node_value(id, Some(&initial))?;
        drop(inner);
        Ok(Var::new(id, self.inner_rc()))
    }

    /// 全零常量（以已喂值的输入节点表示）
    pub fn zeros(&self, shape: &[usize]) -> Result<Var, GraphError> {
        self.input_with_value(&Tensor::zeros(shape))
    }

    /// 全一常量（以已喂值的输入节点表示）
    pub fn ones(&self, shape: &[usize]) -> Result<Var, GraphError> {
        self.input_with_value(&Tensor::ones(shape))
    }
    // ↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑ 节点创建 ↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑

    // ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓ 训练/推理模式 ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓
    pub fn train(&self) {
        self.inner_mut().set_eval_mode(false);
    }

    pub fn eval(&self) {
        self.inner_mut().set_eval_mode(true);
    }

    pub fn is_eval(&self) -> bool {
        self.inner().is_eval_mode()
    }

    /// 在无梯度（eval模式）下执行闭包，结束后恢复原模式
    pub fn no_grad_scope<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let was_eval = self.is_eval();
        self.eval();
        let result = f();
        self.inner_mut().set_eval_mode(was_eval);
        result
    }
    // ↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑ 训练/推理模式 ↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑

    /// 清空所有参数节点的梯度
    pub fn zero_grad(&self) -> Result<(), GraphError> {
        self.inner_mut().clear_grad()
    }

    pub fn nodes_count(&self) -> usize {
        self.inner().nodes_count()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
