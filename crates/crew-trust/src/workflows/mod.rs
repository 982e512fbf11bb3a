pub mod competency;
mod fault;
pub mod stability;
pub mod trust;

pub use fault::ComputationError;
