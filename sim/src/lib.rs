// Library exports for the simulated NAO

pub mod simulated_robot;

pub use simulated_robot::{SimCommand, SimState, SimulatedRobot};
