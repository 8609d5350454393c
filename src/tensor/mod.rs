use ndarray::{Array, IxDyn};
use rand::distributions::{Distribution, Standard};
use rand::rngs::StdRng;

mod ops {
    pub mod add;
    pub mod div;
    pub mod mat_mul;
    pub mod mul;
    pub mod sub;
}

mod property;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：只要通过Tensor初始化的都是张量（即使标量也是张量）；
/// 而通常意义上的数字（类型为usize、i32、f32等）就只是纯数（number），在这里不被认为是张量。
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量，若为标量，`shape`可以是[1]、[1,1]；
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]。
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等，否则panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec())
            .expect("data长度与shape不匹配");
        Self { data }
    }

    /// 创建一个全零张量
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    /// 创建一个全一张量
    pub fn ones(shape: &[usize]) -> Self {
        Self {
            data: Array::ones(IxDyn(shape)),
        }
    }

    /// 创建一个服从正态分布的随机张量（使用线程本地RNG）
    pub fn normal(mean: f32, std_dev: f32, shape: &[usize]) -> Self {
        let mut rng = rand::thread_rng();
        Self::normal_impl(mean, std_dev, shape, &mut rng)
    }

    /// 创建一个服从正态分布的随机张量（使用指定的RNG，保证可重复性）
    pub fn normal_with_rng(mean: f32, std_dev: f32, shape: &[usize], rng: &mut StdRng) -> Self {
        Self::normal_impl(mean, std_dev, shape, rng)
    }

    // Box-Muller变换：由均匀分布样本生成正态分布样本
    fn normal_impl<R: rand::Rng>(mean: f32, std_dev: f32, shape: &[usize], rng: &mut R) -> Self {
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);

        while data.len() < data_len {
            let u1: f32 = Standard.sample(rng);
            let u2: f32 = Standard.sample(rng);
            let r = (-2.0 * u1.max(f32::MIN_POSITIVE).ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Self::new(&data, shape)
    }

    /// 按条件逐元素映射：满足`cond`的元素经`if_true`变换，否则经`if_false`变换
    pub fn where_with_f32<C, T, F>(&self, cond: C, if_true: T, if_false: F) -> Self
    where
        C: Fn(f32) -> bool,
        T: Fn(f32) -> f32,
        F: Fn(f32) -> f32,
    {
        Self {
            data: self.data.mapv(|x| if cond(x) { if_true(x) } else { if_false(x) }),
        }
    }

    /// 2维矩阵转置
    ///
    /// # Panics
    /// 张量不是2维矩阵时panic
    pub fn transpose(&self) -> Self {
        assert!(
            self.dimension() == 2,
            "{}",
            crate::errors::TensorError::NotA2dMatrix(self.dimension())
        );
        Self {
            data: self.data.t().to_owned(),
        }
    }
}

// 私有方法
impl Tensor {
    fn generate_index_array(&self, shape: &[usize]) -> Vec<usize> {
        shape.iter().map(|_| 0).collect()
    }
}

// 二维索引：`tensor[[row, col]]`
impl std::ops::Index<[usize; 2]> for Tensor {
    type Output = f32;

    fn index(&self, index: [usize; 2]) -> &Self::Output {
        &self.data[IxDyn(&index)]
    }
}

impl std::ops::IndexMut<[usize; 2]> for Tensor {
    fn index_mut(&mut self, index: [usize; 2]) -> &mut Self::Output {
        &mut self.data[IxDyn(&index)]
    }
}
