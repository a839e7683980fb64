//! Leave-application core: directory access, availability lookup, and the
//! per-day replacement evaluation that decides whether a leave request is
//! auto-approved.

pub mod evaluator;
pub mod report;
pub mod store;

pub use evaluator::{LeaveRequest, evaluate};
pub use report::{DayReport, LeaveDecision, SlotReport};
pub use store::{FacultyDirectory, MySqlDirectory};
