pub mod geometry;
pub mod sections;
pub mod circuit;
pub mod generator;

pub use circuit::{Circuit, CircuitPerimeter};
pub use generator::{CircuitGenerator, GeneratorConfig};
