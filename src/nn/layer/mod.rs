/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : 神经网络层
 */

mod linear;

pub use linear::Linear;
