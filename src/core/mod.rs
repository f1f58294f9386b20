// src/core/mod.rs

pub mod arg_parser;
pub mod interpolator;
pub mod marshaller;
pub mod paths;
pub mod text;
pub mod truthiness;
