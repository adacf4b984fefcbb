pub mod args;
pub mod scenario;
