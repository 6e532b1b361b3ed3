//! Core data models.
//!
//! All entities here are view-model shapes mirroring the core stats API
//! responses. The hub does not own these records; it caches and presents them.

pub mod challenge;
pub mod digest;
pub mod leaderboard;
pub mod player;
pub mod report;
pub mod round;
pub mod server;
pub mod slug;

pub use challenge::*;
pub use digest::*;
pub use leaderboard::*;
pub use player::*;
pub use report::*;
pub use round::*;
pub use server::*;
pub use slug::*;
