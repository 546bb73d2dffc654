pub mod aggregator;

pub use aggregator::calculate_statistics;
