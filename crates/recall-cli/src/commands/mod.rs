pub mod context;
pub mod history;
pub mod monitor;
pub mod settings;
