//! 张量构造与属性相关测试

use crate::tensor::Tensor;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_new_and_shape() {
    let x = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    assert_eq!(x.shape(), &[2, 3]);
    assert_eq!(x.dimension(), 2);
    assert_eq!(x.size(), 6);
    assert_eq!(x[[0, 0]], 1.0);
    assert_eq!(x[[1, 2]], 6.0);
}

#[test]
fn test_zeros_and_ones() {
    let z = Tensor::zeros(&[2, 4]);
    assert!(z.data_as_slice().iter().all(|&x| x == 0.0));

    let o = Tensor::ones(&[2, 4]);
    assert!(o.data_as_slice().iter().all(|&x| x == 1.0));
}

#[test]
fn test_scalar_number() {
    let s = Tensor::new(&[3.5], &[1, 1]);
    assert!(s.is_scalar());
    assert_eq!(s.get_data_number(), Some(3.5));

    let v = Tensor::new(&[1.0, 2.0], &[1, 2]);
    assert!(!v.is_scalar());
    assert_eq!(v.get_data_number(), None);
}

#[test]
fn test_normal_with_rng_is_reproducible() {
    let mut rng1 = StdRng::seed_from_u64(42);
    let mut rng2 = StdRng::seed_from_u64(42);
    let a = Tensor::normal_with_rng(0.0, 1.0, &[4, 4], &mut rng1);
    let b = Tensor::normal_with_rng(0.0, 1.0, &[4, 4], &mut rng2);
    assert_eq!(a, b);
}

#[test]
fn test_normal_statistics() {
    let mut rng = StdRng::seed_from_u64(7);
    let x = Tensor::normal_with_rng(0.0, 0.5, &[100, 50], &mut rng);
    let data = x.data_as_slice();
    let mean = data.iter().sum::<f32>() / data.len() as f32;
    let var = data.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / data.len() as f32;
    assert!(mean.abs() < 0.05);
    assert!((var.sqrt() - 0.5).abs() < 0.05);
}

#[test]
fn test_transpose() {
    let x = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let t = x.transpose();
    assert_eq!(t.shape(), &[3, 2]);
    assert_eq!(t[[0, 1]], 4.0);
    assert_eq!(t[[2, 0]], 3.0);
}

#[test]
fn test_where_with_f32() {
    let x = Tensor::new(&[-2.0, -1.0, 0.0, 3.0], &[1, 4]);
    let relu = x.where_with_f32(|v| v > 0.0, |v| v, |_| 0.0);
    assert_eq!(relu.data_as_slice(), &[0.0, 0.0, 0.0, 3.0]);
}
