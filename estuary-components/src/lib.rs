pub mod forcing;
pub mod model;
pub mod scenario;

pub use model::{Contributions, EstuaryModel};
pub use scenario::{run_scenario, Scenario};
