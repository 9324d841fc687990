pub mod battle;
pub mod feed;
pub mod monitor;
pub mod scoring;
