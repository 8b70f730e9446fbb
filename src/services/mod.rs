pub mod aggregator;
pub mod connect;
pub mod render;
