/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : 全连接层：output = x @ W + b
 */

use crate::nn::{Graph, GraphError, Init, Module, Var, VarMatrixOps};

/// 全连接层。
///
/// 权重形状[`in_features`, `out_features`]（Kaiming初始化），
/// 偏置形状[1, `out_features`]（零初始化，可关闭）。
/// 输入[batch, `in_features`]，输出[batch, `out_features`]。
pub struct Linear {
    weights: Var,
    bias: Option<Var>,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// 创建全连接层，并在图中注册其参数节点。
    /// `name`用作参数节点的命名前缀：`{name}_W`与`{name}_b`。
    pub fn new(
        graph: &Graph,
        in_features: usize,
        out_features: usize,
        use_bias: bool,
        name: &str,
    ) -> Result<Self, GraphError> {
        let weights = graph.parameter(
            &[in_features, out_features],
            Init::Kaiming,
            &format!("{name}_W"),
        )?;
        let bias = if use_bias {
            Some(graph.parameter(&[1, out_features], Init::Zeros, &format!("{name}_b"))?)
        } else {
            None
        };

        Ok(Self {
            weights,
            bias,
            in_features,
            out_features,
        })
    }

    /// 前向：x @ W（有偏置时再加上广播后的b）
    ///
    /// # Panics
    /// `x`的列数不等于`in_features`时panic
    pub fn forward(&self, x: &Var) -> Var {
        let out = x.matmul(&self.weights).expect("Linear 前向失败");
        match &self.bias {
            Some(bias) => &out + &Self::broadcast_bias(x, bias),
            None => out,
        }
    }

    // 把[1, out]的偏置借矩阵乘法顶成[batch, out]：
    // ones[batch, 1] @ b[1, out]
    fn broadcast_bias(x: &Var, bias: &Var) -> Var {
        let batch_size = x.value_expected_shape()[0];
        let ones = x
            .get_graph()
            .ones(&[batch_size, 1])
            .expect("创建 ones 节点失败");
        ones.matmul(bias).expect("偏置广播失败")
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }

    pub fn weights(&self) -> &Var {
        &self.weights
    }

    pub fn bias(&self) -> Option<&Var> {
        self.bias.as_ref()
    }
}

impl Module for Linear {
    fn parameters(&self) -> Vec<Var> {
        match &self.bias {
            Some(bias) => vec![self.weights.clone(), bias.clone()],
            None => vec![self.weights.clone()],
        }
    }
}
