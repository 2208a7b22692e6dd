// Drill logic and persistence. The terminal front end lives in the binary.
pub mod config;
pub mod engine;
pub mod session;
pub mod store;
pub mod text;
