/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : 损失函数类的Var扩展方法
 */

use crate::nn::{GraphError, Var};

/// 为`Var`补充损失函数
pub trait VarLossOps {
    /// Softmax与交叉熵融合成的单个损失节点，`target`须是one-hot标签。
    /// 前向后该节点的值为1x1的标量损失。
    fn cross_entropy(&self, target: &Var) -> Result<Var, GraphError>;
}

impl VarLossOps for Var {
    fn cross_entropy(&self, target: &Var) -> Result<Var, GraphError> {
        self.assert_same_graph(target);
        let id = self.graph().borrow_mut().new_softmax_cross_entropy_node(
            self.node_id(),
            target.node_id(),
            None,
        )?;
        Ok(self.derived(id))
    }
}
