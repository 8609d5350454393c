/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : Linear 层测试
 */

use crate::nn::{Graph, Linear, Module};
use crate::tensor::Tensor;

#[test]
fn test_linear_creation() {
    let graph = Graph::new();
    let fc = Linear::new(&graph, 2, 8, true, "fc").unwrap();

    assert_eq!(fc.in_features(), 2);
    assert_eq!(fc.out_features(), 8);
    assert_eq!(fc.weights().value_expected_shape(), vec![2, 8]);
    assert_eq!(fc.bias().unwrap().value_expected_shape(), vec![1, 8]);
}

#[test]
fn test_linear_forward_with_known_weights() {
    let graph = Graph::new();
    let x = graph.input(&[1, 2]).unwrap();
    let fc = Linear::new(&graph, 2, 3, true, "fc").unwrap();

    // 手动设置权重和偏置，使前向结果可手算
    fc.weights()
        .set_value(&Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]))
        .unwrap();
    fc.bias()
        .unwrap()
        .set_value(&Tensor::new(&[0.5, 0.5, 0.5], &[1, 3]))
        .unwrap();

    let y = fc.forward(&x);
    x.set_value(&Tensor::new(&[1.0, 2.0], &[1, 2])).unwrap();
    y.forward().unwrap();

    // x @ W = [1*1+2*4, 1*2+2*5, 1*3+2*6] = [9, 12, 15]，加偏置后 [9.5, 12.5, 15.5]
    assert_eq!(
        y.value().unwrap().unwrap(),
        Tensor::new(&[9.5, 12.5, 15.5], &[1, 3])
    );
}

#[test]
fn test_linear_without_bias() {
    let graph = Graph::new();
    let x = graph.input(&[1, 2]).unwrap();
    let fc = Linear::new(&graph, 2, 2, false, "fc").unwrap();

    fc.weights()
        .set_value(&Tensor::new(&[1.0, 0.0, 0.0, 1.0], &[2, 2]))
        .unwrap();

    let y = fc.forward(&x);
    x.set_value(&Tensor::new(&[3.0, 4.0], &[1, 2])).unwrap();
    y.forward().unwrap();

    assert_eq!(
        y.value().unwrap().unwrap(),
        Tensor::new(&[3.0, 4.0], &[1, 2])
    );
}

#[test]
fn test_linear_parameters() {
    let graph = Graph::new();
    let fc_with_bias = Linear::new(&graph, 2, 8, true, "fc1").unwrap();
    let fc_no_bias = Linear::new(&graph, 8, 2, false, "fc2").unwrap();

    assert_eq!(fc_with_bias.parameters().len(), 2);
    assert_eq!(fc_with_bias.num_params(), 2);
    assert_eq!(fc_no_bias.parameters().len(), 1);
}

#[test]
fn test_linear_bias_broadcast_over_batch() {
    let graph = Graph::new();
    let x = graph.input(&[3, 2]).unwrap();
    let fc = Linear::new(&graph, 2, 2, true, "fc").unwrap();

    fc.weights()
        .set_value(&Tensor::zeros(&[2, 2]))
        .unwrap();
    fc.bias()
        .unwrap()
        .set_value(&Tensor::new(&[1.0, 2.0], &[1, 2]))
        .unwrap();

    let y = fc.forward(&x);
    x.set_value(&Tensor::zeros(&[3, 2])).unwrap();
    y.forward().unwrap();

    // 权重为零时输出即偏置，且每一行都应得到同样的偏置
    assert_eq!(
        y.value().unwrap().unwrap(),
        Tensor::new(&[1.0, 2.0, 1.0, 2.0, 1.0, 2.0], &[3, 2])
    );
}
