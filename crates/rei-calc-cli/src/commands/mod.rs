pub mod commercial;
pub mod pricing;
pub mod residential;
pub mod wholesale;
