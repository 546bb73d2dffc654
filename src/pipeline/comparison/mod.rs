pub mod cycle_comparator;
pub mod edit_distance;

pub use cycle_comparator::CycleComparator;
pub use edit_distance::levenshtein;
