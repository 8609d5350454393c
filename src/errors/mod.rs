use std::fmt::{self, Display};

use thiserror::Error;

/// 张量二元运算的算子种类（用于拼装错误信息）
#[derive(Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "相加",
            Self::Sub => "相减",
            Self::Mul => "相乘",
            Self::Div => "相除",
        })
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 张量二元运算
    #[error(
        "形状不一致，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },

    #[error("矩阵乘法要求前者的列数等于后者的行数：{tensor1_shape:?}与{tensor2_shape:?}")]
    MatMulShapeMismatch {
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },

    #[error("矩阵运算只支持2维张量，但得到{0}维")]
    NotA2dMatrix(usize),
}
