/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : Var的扩展方法，按功能域拆成独立trait（激活/损失/矩阵），
 *                 用哪类运算就import哪个trait。
 */

mod activation;
mod loss;
mod matrix;

pub use activation::VarActivationOps;
pub use loss::VarLossOps;
pub use matrix::VarMatrixOps;
