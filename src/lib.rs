pub mod battle_stats;
pub mod cards;
pub mod config;
pub mod dashboard;
pub mod history;
pub mod logging;
pub mod metrics;
pub mod payload;
pub mod sections;
