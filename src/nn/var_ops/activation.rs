/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : 激活函数类的Var扩展方法
 */

use crate::nn::Var;

/// 为`Var`补充激活函数。
///
/// 激活节点的形状由父节点唯一确定，创建不会失败，因此直接返回`Var`。
pub trait VarActivationOps {
    /// 逐元素ReLU：max(0, x)
    fn relu(&self) -> Var;
}

impl VarActivationOps for Var {
    fn relu(&self) -> Var {
        let id = self
            .graph()
            .borrow_mut()
            .new_relu_node(self.node_id(), None)
            .expect("创建 ReLU 节点失败");
        self.derived(id)
    }
}
