//! 核心审阅层：游标状态机、失败类型、事件上报、状态投影、主控循环

pub mod cursor;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod state;

pub use cursor::ReviewCursor;
pub use error::ReviewFailure;
pub use events::{NoticeObserver, ReviewObserver};
pub use orchestrator::{create_reviewer, Command};
pub use state::{ReviewPhase, UiState};
