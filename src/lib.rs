//! Cable tray fill engine.
//!
//! Sizes cable trays for a set of circular cables: a gravity-greedy placer lays
//! the cables into a tray cross-section, width solvers search for the narrowest
//! standard tray per tier, and a matrix generator evaluates tier count and width
//! combinations. `physics` checks placements after the fact.
//!
//! ```
//! use tray_fill::model::CableSpec;
//! use tray_fill::optimizer::SolverConfig;
//! use tray_fill::solver::{SolveParams, solve_system};
//!
//! let cables: Vec<CableSpec> = (0..5)
//!     .map(|i| CableSpec::new(format!("C{i}"), 10.0).unwrap())
//!     .collect();
//! let params = SolveParams::new(1, 60.0, 40.0).unwrap();
//! let result = solve_system(&cables, &params, &SolverConfig::default());
//! assert!(result.success);
//! assert_eq!(result.system_width, 100.0);
//! ```

pub mod api;
pub mod config;
pub mod geometry;
pub mod matrix;
pub mod model;
pub mod optimizer;
pub mod physics;
pub mod solver;
pub mod types;
