/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : ReLU 节点测试
 */

use crate::nn::{Graph, VarActivationOps, VarLossOps};
use crate::tensor::Tensor;

#[test]
fn test_relu_forward() {
    let graph = Graph::new();
    let x = graph.input(&[1, 4]).unwrap();
    let y = x.relu();

    x.set_value(&Tensor::new(&[-2.0, -0.5, 0.0, 3.0], &[1, 4]))
        .unwrap();
    y.forward().unwrap();

    assert_eq!(
        y.value().unwrap().unwrap(),
        Tensor::new(&[0.0, 0.0, 0.0, 3.0], &[1, 4])
    );
}

#[test]
fn test_relu_expected_shape() {
    let graph = Graph::new();
    let x = graph.input(&[2, 3]).unwrap();
    let y = x.relu();
    assert_eq!(y.value_expected_shape(), vec![2, 3]);
}

#[test]
fn test_relu_forward_refreshes_after_new_input() {
    let graph = Graph::new();
    let x = graph.input(&[1, 2]).unwrap();
    let y = x.relu();

    x.set_value(&Tensor::new(&[1.0, -1.0], &[1, 2])).unwrap();
    y.forward().unwrap();
    assert_eq!(
        y.value().unwrap().unwrap(),
        Tensor::new(&[1.0, 0.0], &[1, 2])
    );

    // 喂入新值后重新前向，旧值不应残留
    x.set_value(&Tensor::new(&[-1.0, 2.0], &[1, 2])).unwrap();
    y.forward().unwrap();
    assert_eq!(
        y.value().unwrap().unwrap(),
        Tensor::new(&[0.0, 2.0], &[1, 2])
    );
}

#[test]
fn test_relu_backward_masks_negative_inputs() {
    // loss = cross_entropy(relu(p), label)
    // p = [-1, 1]：relu输出[0, 1]，对p[0]的梯度应被掩为0
    let graph = Graph::new();
    let p = graph
        .parameter(&[1, 2], crate::nn::Init::Zeros, "p")
        .unwrap();
    p.set_value(&Tensor::new(&[-1.0, 1.0], &[1, 2])).unwrap();

    let label = graph.input(&[1, 2]).unwrap();
    label.set_value(&Tensor::new(&[1.0, 0.0], &[1, 2])).unwrap();

    let h = p.relu();
    let loss = h.cross_entropy(&label).unwrap();
    loss.backward().unwrap();

    let grad = p.grad().unwrap().unwrap();
    // relu输出[0, 1]的softmax为[1/(1+e), e/(1+e)]，对h的梯度为softmax - [1, 0]
    // p[0]=-1 < 0，梯度被掩为0；p[1]=1 > 0，梯度原样通过
    let e = std::f32::consts::E;
    assert_eq!(grad[[0, 0]], 0.0);
    assert!((grad[[0, 1]] - e / (1.0 + e)).abs() < 1e-6);
}
