pub mod dataset;
pub mod features;
pub mod model;
pub mod trainer;
