//! # Mini Torch
//!
//! `mini_torch`是一个用纯rust实现的极简版[pytorch](https://pytorch.org)式
//! 自动微分框架：张量、计算图、全连接层、SGD优化器，一应俱全但都只保留最小可用子集。
//! 随库附带一个`xor`二进制（`cargo run --bin xor`），用单样本随机梯度下降
//! 训练一个2->8->2的小网络来拟合异或函数。
//!

pub mod data;
pub mod errors;
pub mod nn;
pub mod tensor;
