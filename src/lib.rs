//! Attrition Sherpa - Guided HR attrition analysis.
//!
//! This crate drives a staged workflow over an employee dataset:
//! upload, explore, score, rank by risk, and inspect one employee.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
