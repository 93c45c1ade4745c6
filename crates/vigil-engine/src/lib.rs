//! The Vigil scheduling engine: hall allocation, session booking, preference
//! matching and staff assignment over any [`vigil_core::store::DirectoryStore`].
//!
//! Every operation is a request-scoped read-then-write sequence; there is no
//! long-lived scheduler loop. Services pre-validate against a read for
//! precise errors, then delegate to an atomic store write whose conditional
//! guards are authoritative under concurrency.

pub mod allocation;
pub mod assignment;
pub mod booking;
pub mod exams;
pub mod preferences;

pub use allocation::AllocationService;
pub use assignment::{AssignmentReport, AssignmentService};
pub use booking::BookingService;
pub use exams::ExamService;
pub use preferences::PreferenceService;
