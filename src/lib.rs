//! killscope - Mutation testing analysis for memory-model litmus test runs
//!
//! This library post-processes the output of a GPU memory-consistency test
//! harness: per-test weak-behavior kill rates, mutation scores by mutant
//! category, environment merging under a reproducibility target, and
//! correlation between tests' weak-behavior counts.

pub mod cli;
pub mod config;
pub mod correlation;
pub mod dataset;
pub mod json_output;
pub mod merge;
pub mod mutant;
pub mod rate;
pub mod scoring;
pub mod text_output;
