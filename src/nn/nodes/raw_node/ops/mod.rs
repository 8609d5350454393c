mod add;
mod mat_mul;
mod relu;

pub(in crate::nn) use add::Add;
pub(in crate::nn) use mat_mul::MatMul;
pub(in crate::nn) use relu::ReLU;
