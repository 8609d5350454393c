/*
 * @Author       : 老董
 * @Date         : 2026-02-07
 * @Description  : 本文件仅包含张量的属性方法，不包含任何运算方法，所以不会需要用到mut
 */

use super::Tensor;

impl Tensor {
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]。
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数
    /// 即`shape()`的元素个数--如：形状为`[]`的标量阶数为0，向量阶数为1，矩阵阶数为2，以此类推
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 计算张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 判断两个张量的形状是否严格一致。如：形状为[1, 4]和[4]是不一致的，会返回false
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 判断张量是否为标量
    pub fn is_scalar(&self) -> bool {
        self.shape().is_empty() || self.shape().iter().all(|x| *x == 1)
    }

    /// 判断两个张量能否按NumPy广播规则运算：
    /// 从右向左对齐维度，每个维度必须相等或其中一个为1
    pub fn can_broadcast_with(&self, other: &Self) -> bool {
        let (s1, s2) = (self.shape(), other.shape());
        s1.iter()
            .rev()
            .zip(s2.iter().rev())
            .all(|(&d1, &d2)| d1 == d2 || d1 == 1 || d2 == 1)
    }

    /// 转化为纯数（number）。若为标量，则返回Some(number)，否则返回None
    pub fn get_data_number(&self) -> Option<f32> {
        if self.is_scalar() {
            let shape = self.shape();
            let index_array = self.generate_index_array(shape);
            Some(self.data[&index_array[..]])
        } else {
            None
        }
    }

    /// 以扁平切片的形式访问张量数据（行优先）
    pub fn data_as_slice(&self) -> &[f32] {
        self.data.as_slice().expect("张量数据不连续")
    }

    /// 返回（按行优先展平后）最大元素的索引。多个最大值时取第一个。
    ///
    /// 本方法面向固定长度的向量（如分类logits），更高维张量也按展平处理。
    ///
    /// # Panics
    /// 空张量会panic
    pub fn argmax(&self) -> usize {
        assert!(self.size() > 0, "argmax：张量为空");
        let mut best = 0;
        let mut best_val = f32::NEG_INFINITY;
        for (i, &v) in self.data.iter().enumerate() {
            if v > best_val {
                best = i;
                best_val = v;
            }
        }
        best
    }
}
