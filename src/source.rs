//! Everything about getting data out of the VQE stream file.
//!
//! - [locate] finds the stream file of a CK program entry.
//! - [record] classifies single lines of the stream file.
//! - [follower] tails the stream file, detecting when an experiment is restarted.
pub mod follower;
pub mod locate;
pub mod record;
