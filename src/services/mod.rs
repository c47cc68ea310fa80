//! Domain logic kept free of the HTTP and storage layers:
//! - `hierarchy`: task-tree progress propagation and descendant collection
//! - `archive`: weekly study-log bucketing
//! - `analysis`: target-score gap analysis and exam-sitting grouping
//! - `gamification`: XP, streak, and badge math
//! - `subjects`: static subject display catalog

pub mod analysis;
pub mod archive;
pub mod gamification;
pub mod hierarchy;
pub mod subjects;
