//! 核心编排层：错误分类、请求阶段、结果聚合、编排器、优雅关闭

pub mod aggregate;
pub mod error;
pub mod orchestrator;
pub mod shutdown;
pub mod state;

pub use aggregate::{AggregatedResponse, Segment, NO_APPLICABLE_CAPABILITY};
pub use error::{CapabilityError, PlannerError, ResolveError};
pub use orchestrator::Orchestrator;
pub use shutdown::ShutdownManager;
pub use state::RequestPhase;
