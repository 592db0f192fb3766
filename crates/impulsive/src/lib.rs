//! Impulsive transfer estimates in the coplanar, circular limit.

pub mod hohmann;

pub use hohmann::{HohmannEstimate, TransferError, earth_to_mars_mean, half_period_days, hohmann};
