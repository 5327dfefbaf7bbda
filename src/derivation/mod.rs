pub mod accumulation;
pub mod error;
pub mod spline;
pub mod threshold;
