/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : nn 模块测试
 */

mod layer_linear;
mod node_relu;
mod node_softmax_cross_entropy;
