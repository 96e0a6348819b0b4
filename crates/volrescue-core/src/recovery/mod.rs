/// Recovery orchestration, output naming and reporting
pub mod engine;
pub mod naming;
pub mod report;

pub use engine::{RecoveryEngine, RecoveryProgress, ResolvedRange};
pub use report::{RecoveredFile, RecoveryFailure, RecoveryReport};
