pub mod arena;
pub mod benchmark;
pub mod config;
pub mod rng;
pub mod runner;
pub mod util;
