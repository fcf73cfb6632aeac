pub mod branches;
pub mod buses;
pub mod graph;
pub mod sections;
pub mod telemetry;
pub mod util;
