pub mod defs;
pub mod baseline;
pub mod empty;
pub mod state;
