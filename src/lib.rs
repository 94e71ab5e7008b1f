pub mod booster;
pub mod config;
pub mod incentive;
pub mod watch;
