/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : Softmax 交叉熵节点测试（预期值均为手算）
 */

use approx::assert_abs_diff_eq;

use crate::nn::{Graph, GraphError, Init, VarLossOps};
use crate::tensor::Tensor;

#[test]
fn test_uniform_logits_loss_is_ln2() {
    // logits = [0, 0] => softmax = [0.5, 0.5]
    // loss = -ln(0.5) = ln(2) ≈ 0.6931472
    let graph = Graph::new();
    let logits = graph.input(&[1, 2]).unwrap();
    let label = graph.input(&[1, 2]).unwrap();
    logits
        .set_value(&Tensor::new(&[0.0, 0.0], &[1, 2]))
        .unwrap();
    label.set_value(&Tensor::new(&[1.0, 0.0], &[1, 2])).unwrap();

    let loss = logits.cross_entropy(&label).unwrap();
    loss.forward().unwrap();

    assert_abs_diff_eq!(
        loss.item().unwrap(),
        std::f32::consts::LN_2,
        epsilon = 1e-6
    );
}

#[test]
fn test_loss_shape_is_scalar() {
    let graph = Graph::new();
    let logits = graph.input(&[4, 2]).unwrap();
    let label = graph.input(&[4, 2]).unwrap();
    let loss = logits.cross_entropy(&label).unwrap();
    assert_eq!(loss.value_expected_shape(), vec![1, 1]);
}

#[test]
fn test_gradient_is_softmax_minus_labels() {
    // p = [0, 0], label = [1, 0]
    // softmax = [0.5, 0.5]，grad = (softmax - label) / batch = [-0.5, 0.5]
    let graph = Graph::new();
    let p = graph.parameter(&[1, 2], Init::Zeros, "p").unwrap();
    let label = graph.input(&[1, 2]).unwrap();
    label.set_value(&Tensor::new(&[1.0, 0.0], &[1, 2])).unwrap();

    let loss = p.cross_entropy(&label).unwrap();
    loss.backward().unwrap();

    let grad = p.grad().unwrap().unwrap();
    assert_abs_diff_eq!(grad[[0, 0]], -0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(grad[[0, 1]], 0.5, epsilon = 1e-6);
}

#[test]
fn test_batch_loss_is_averaged() {
    // 两行同样的 [0, 0] logits，batch均值后损失仍为 ln(2)
    let graph = Graph::new();
    let logits = graph.input(&[2, 2]).unwrap();
    let label = graph.input(&[2, 2]).unwrap();
    logits
        .set_value(&Tensor::new(&[0.0, 0.0, 0.0, 0.0], &[2, 2]))
        .unwrap();
    label
        .set_value(&Tensor::new(&[1.0, 0.0, 0.0, 1.0], &[2, 2]))
        .unwrap();

    let loss = logits.cross_entropy(&label).unwrap();
    loss.forward().unwrap();

    assert_abs_diff_eq!(
        loss.item().unwrap(),
        std::f32::consts::LN_2,
        epsilon = 1e-6
    );
}

#[test]
fn test_numerically_stable_with_large_logits() {
    // 不做 max 平移的朴素实现会在这里得到 inf/nan
    let graph = Graph::new();
    let logits = graph.input(&[1, 2]).unwrap();
    let label = graph.input(&[1, 2]).unwrap();
    logits
        .set_value(&Tensor::new(&[1000.0, 0.0], &[1, 2]))
        .unwrap();
    label.set_value(&Tensor::new(&[1.0, 0.0], &[1, 2])).unwrap();

    let loss = logits.cross_entropy(&label).unwrap();
    loss.forward().unwrap();

    let loss_val = loss.item().unwrap();
    assert!(loss_val.is_finite());
    assert_abs_diff_eq!(loss_val, 0.0, epsilon = 1e-6);
}

#[test]
fn test_shape_mismatch_between_logits_and_labels() {
    let graph = Graph::new();
    let logits = graph.input(&[1, 2]).unwrap();
    let label = graph.input(&[1, 3]).unwrap();

    let result = logits.cross_entropy(&label);
    assert!(matches!(result, Err(GraphError::ShapeMismatch { .. })));
}
