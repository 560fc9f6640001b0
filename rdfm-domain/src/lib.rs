pub mod device_model;
pub mod request_output;

pub use device_model::*;
pub use request_output::*;
