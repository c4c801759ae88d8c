//! ListStore integration tests

mod editing;
mod engagement;
mod failures;
mod publishing;
mod viewing;
