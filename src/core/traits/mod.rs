pub mod change_log;
pub mod resolver;
