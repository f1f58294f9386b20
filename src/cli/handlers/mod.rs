// src/cli/handlers/mod.rs

pub mod define;
pub mod kill;
pub mod normalize;
pub mod run;
pub mod substitute;
pub mod tokenize;
pub mod truthy;
