/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : 负责神经网络（neural network）的构建：计算图、层、优化器与Var句柄
 */

mod graph;
pub mod layer;
mod module;
mod nodes;
pub mod optimizer;
mod var;
mod var_ops;

pub use graph::{Graph, GraphError, GraphInner};
pub use layer::Linear;
pub use module::Module;
pub use nodes::NodeId;
pub use optimizer::{Optimizer, SGD};
pub use var::{Init, Var};
pub use var_ops::{VarActivationOps, VarLossOps, VarMatrixOps};

#[cfg(test)]
mod tests;
