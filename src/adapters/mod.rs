pub mod change_log;
pub mod directory;
pub mod jsonl;
