//! Resource pool: energy cost matching, payment and refresh.

pub mod pool;

pub use pool::{element_tally, has_enough_energy, pay, plan_payment, refresh, CostPlan};
