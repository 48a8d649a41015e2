//! # Statistics Primitives
//!
//! Self-contained numerical building blocks for the analytics engine.
//!
//! - `distribution`: special functions (normal CDF and its inverse, log-gamma,
//!   regularized incomplete beta) and the Student's t helpers built on them.
//! - `descriptive`: mean, variance, median, percentiles and friends.
//!
//! Every function is total. Empty or degenerate input produces a documented
//! neutral value instead of a panic or an error.

pub mod descriptive;
pub mod distribution;

pub use descriptive::{
    max, mean, median, min, percentile, percentile_rank, population_std_dev, std_dev, sum,
    variance, z_score,
};
pub use distribution::{
    gamma_ln, incomplete_beta, normal_cdf, normal_inverse_cdf, t_critical_value,
    t_distribution_p_value,
};
