/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : 矩阵运算类的Var扩展方法
 */

use crate::nn::{GraphError, Var};

/// 为`Var`补充矩阵运算
pub trait VarMatrixOps {
    /// 矩阵乘法：[m, k] @ [k, n]得到[m, n]，维度对不上则返回错误
    fn matmul(&self, other: &Var) -> Result<Var, GraphError>;
}

impl VarMatrixOps for Var {
    fn matmul(&self, other: &Var) -> Result<Var, GraphError> {
        self.assert_same_graph(other);
        let id = self
            .graph()
            .borrow_mut()
            .new_mat_mul_node(self.node_id(), other.node_id(), None)?;
        Ok(self.derived(id))
    }
}
