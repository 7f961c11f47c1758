/*
 * Extraction Infrastructure
 */

mod recorded_oracle;

pub use recorded_oracle::RecordedOracle;
