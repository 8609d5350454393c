//! 张量四则运算与矩阵乘法相关测试

use crate::tensor::Tensor;

#[test]
fn test_add_same_shape() {
    let a = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let b = Tensor::new(&[10.0, 20.0, 30.0, 40.0], &[2, 2]);
    let c = &a + &b;
    assert_eq!(c.data_as_slice(), &[11.0, 22.0, 33.0, 44.0]);
}

#[test]
fn test_add_scalar() {
    let a = Tensor::new(&[1.0, 2.0], &[1, 2]);
    assert_eq!((&a + 1.0).data_as_slice(), &[2.0, 3.0]);
    assert_eq!((1.0 + &a).data_as_slice(), &[2.0, 3.0]);
}

#[test]
#[should_panic(expected = "无法相加")]
fn test_add_incompatible_shapes() {
    let a = Tensor::new(&[1.0, 2.0, 3.0], &[1, 3]);
    let b = Tensor::new(&[1.0, 2.0], &[1, 2]);
    let _ = &a + &b;
}

#[test]
fn test_sub() {
    let a = Tensor::new(&[5.0, 7.0], &[1, 2]);
    let b = Tensor::new(&[2.0, 3.0], &[1, 2]);
    assert_eq!((&a - &b).data_as_slice(), &[3.0, 4.0]);
}

#[test]
fn test_scalar_mul() {
    let g = Tensor::new(&[2.0, -4.0], &[1, 2]);
    let scaled = 0.1 * &g;
    assert_eq!(scaled.data_as_slice(), &[0.2, -0.4]);
}

#[test]
fn test_elementwise_mul() {
    let a = Tensor::new(&[1.0, 2.0, 3.0], &[1, 3]);
    let mask = Tensor::new(&[1.0, 0.0, 1.0], &[1, 3]);
    assert_eq!((&a * &mask).data_as_slice(), &[1.0, 0.0, 3.0]);
}

#[test]
fn test_div_by_scalar() {
    let a = Tensor::new(&[2.0, 4.0], &[1, 2]);
    assert_eq!((&a / 2.0).data_as_slice(), &[1.0, 2.0]);
}

#[test]
fn test_mat_mul() {
    // [1,2] @ [2,3] = [1,3]
    let x = Tensor::new(&[1.0, 2.0], &[1, 2]);
    let w = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let y = x.mat_mul(&w);
    assert_eq!(y.shape(), &[1, 3]);
    assert_eq!(y.data_as_slice(), &[9.0, 12.0, 15.0]);
}

#[test]
#[should_panic(expected = "矩阵乘法要求")]
fn test_mat_mul_shape_mismatch() {
    let x = Tensor::new(&[1.0, 2.0, 3.0], &[1, 3]);
    let w = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let _ = x.mat_mul(&w);
}
