#![deny(warnings)]

//! Run loops for the farm production simulator.
//!
//! Two entry points drive everything:
//! - [`pipeline::simulate_year`] runs a config-described farm through one
//!   year of growing, harvesting, and machine processing
//! - [`save_sim::simulate_save`] replays a farm snapshot day by day,
//!   replanting tiles with the scoring heuristic as they open up
//!
//! Animals, bees, and fruit trees have their own closed-form or
//! day-stepped simulators whose outputs feed the same profit layer.

pub mod animals;
pub mod bees;
pub mod fruit_trees;
pub mod pipeline;
pub mod save_sim;

pub use animals::simulate_animals;
pub use bees::simulate_bees;
pub use fruit_trees::build_daily_fruit;
pub use pipeline::{simulate_single_crop, simulate_year, PipelineInput};
pub use save_sim::{simulate_save, SimulationOptions, SimulationResult};
