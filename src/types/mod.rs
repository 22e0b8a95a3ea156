pub mod matcher;
pub mod message;
pub mod state;
