pub mod brrrr;
pub mod costs;
pub mod flip;
