//! # XOR 异或问题训练脚本
//!
//! 网络结构：Input(2) -> Linear(8, ReLU) -> Linear(2, ReLU)
//! 优化器：SGD (lr=0.1)，损失：CrossEntropy
//!
//! 训练4000步（每步从4条样本中均匀抽取1条），随后前向50步统计准确率。
//!
//! ## 运行
//! ```bash
//! cargo run --bin xor
//! ```

use std::error::Error;

use rand::rngs::StdRng;
use rand::SeedableRng;

use mini_torch::data::XorDataset;
use mini_torch::nn::{
    Graph, GraphError, Linear, Module, Optimizer, Var, VarActivationOps, VarLossOps, SGD,
};
use mini_torch::tensor::Tensor;

const TRAIN_ITERS: usize = 4000;
const EVAL_ITERS: usize = 50;
const LEARNING_RATE: f32 = 0.1;

/// XOR 多层感知机
///
/// 注意：输出层同样接了ReLU再进交叉熵。对分类头来说这并不典型
/// （负logit会被置零），此处保留原始行为。
struct XorNet {
    x: Var,
    target: Var,
    logits: Var,
    loss: Var,
    optimizer: SGD,
}

impl XorNet {
    fn new(graph: &Graph) -> Result<Self, GraphError> {
        let fc1 = Linear::new(graph, 2, 8, true, "fc1")?;
        let fc2 = Linear::new(graph, 8, 2, true, "fc2")?;

        // 输入/输出占位符（每步迭代喂入新数据）
        let x = graph.zeros(&[1, 2])?;
        let target = graph.zeros(&[1, 2])?;

        // 图只构建一次，之后反复前向/反向
        let logits = fc2.forward(&fc1.forward(&x).relu()).relu();
        let loss = logits.cross_entropy(&target)?;

        let params = [fc1.parameters(), fc2.parameters()].concat();
        let optimizer = SGD::new(graph, &params, LEARNING_RATE);

        Ok(Self {
            x,
            target,
            logits,
            loss,
            optimizer,
        })
    }

    /// 前向传播：喂入样本，返回logits
    fn forward(&self, input: &Tensor) -> Result<Tensor, GraphError> {
        self.x.set_value(input)?;
        self.logits.forward()?;
        self.logits
            .value()?
            .ok_or_else(|| GraphError::ComputationError("logits节点没有值".to_string()))
    }

    /// 反向传播：喂入标签，做一次SGD更新，返回更新前的损失值
    fn backward(&mut self, target: &Tensor) -> Result<f32, GraphError> {
        self.target.set_value(target)?;
        self.optimizer.zero_grad()?;
        let loss_val = self.loss.backward()?;
        self.optimizer.step()?;
        Ok(loss_val)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let graph = Graph::new();
    let mut model = XorNet::new(&graph)?;

    let dataset = XorDataset::new();
    let mut rng = StdRng::from_entropy();

    // 训练
    for _ in 0..TRAIN_ITERS {
        let idx = dataset.sample_index(&mut rng);
        let (input, target) = dataset.get(idx)?;

        model.forward(&input)?;
        let loss = model.backward(&target)?;

        println!("Loss: {loss}");
    }

    // 评估（只前向，不更新参数）
    let mut total = 0;
    let mut correct = 0;

    graph.no_grad_scope(|| -> Result<(), Box<dyn Error>> {
        for _ in 0..EVAL_ITERS {
            let idx = dataset.sample_index(&mut rng);
            let (input, target) = dataset.get(idx)?;

            let pred = model.forward(&input)?;

            total += 1;
            if pred.argmax() == target.argmax() {
                correct += 1;
            }
        }
        Ok(())
    })?;

    println!("{}", accuracy_line(correct, total));
    Ok(())
}

/// 准确率按百分比输出。用`{:?}`保留小数部分，整百分比也打印成`92.0`而非`92`
fn accuracy_line(correct: i32, total: i32) -> String {
    format!("Accuracy: {:?}", 100.0 * correct as f32 / total as f32)
}

#[cfg(test)]
mod tests {
    use super::accuracy_line;

    #[test]
    fn test_accuracy_line_keeps_fractional_part() {
        assert_eq!(accuracy_line(46, 50), "Accuracy: 92.0");
        assert_eq!(accuracy_line(35, 40), "Accuracy: 87.5");
        assert_eq!(accuracy_line(50, 50), "Accuracy: 100.0");
    }
}
