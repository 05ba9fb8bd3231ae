//! Dependency-graph analysis.
//!
//! Everything in this module is a synchronous, pure function of an in-memory
//! snapshot of the task list:
//!
//! - [`critical_path`]: longest-path leveling and critical path extraction
//! - [`schedule`]: earliest-start inference, due-date ordering rule and
//!   display ordering
//! - [`board`]: the derived view combining all of the above
//!
//! [`TaskGraph`] is the petgraph index the store keeps alongside its tasks.
//! It answers the reachability check run before a dependency set is
//! accepted. It is derived data: the authoritative edges are each task's
//! `dependencies` list, and it can always be rebuilt from them with
//! [`TaskGraph::from_tasks`].
//!
//! # Edge Direction Convention
//!
//! Edges point from the **dependent** to the **prerequisite**. If task 2
//! depends on task 1, the graph holds `2 -> 1`.

pub mod board;
pub mod critical_path;
mod index;
pub mod schedule;

pub use board::{Board, BoardEntry, GraphEdge, GraphNode, GraphView, TaskDetails};
pub use critical_path::{CriticalPathAnalysis, analyze};
pub use index::TaskGraph;
pub use schedule::{check_due_dates, earliest_start, earliest_starts, sort_for_display};
