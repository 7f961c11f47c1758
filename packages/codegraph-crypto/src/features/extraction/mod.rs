/*
 * Binding Extraction Boundary
 *
 * Fired transitions emit binding queries; the program analysis oracle
 * answers them, possibly late. Unanswered queries are held in a pending
 * registry whose listeners re-run evaluation once values arrive.
 *
 * Architecture:
 * - Domain: BindingQuery, PendingBindings
 * - Infrastructure: RecordedOracle (precomputed values)
 * - Ports: ProgramAnalysisOracle (async)
 */

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{BindingListener, BindingQuery, PendingBindings};
pub use infrastructure::RecordedOracle;
pub use ports::{OracleError, ProgramAnalysisOracle};
