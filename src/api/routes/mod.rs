pub mod challenges;
pub mod digests;
pub mod leaderboard;
pub mod meta;
pub mod players;
pub mod reports;
pub mod servers;
pub mod wiki;
