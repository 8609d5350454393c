mod basic;
mod ops;
