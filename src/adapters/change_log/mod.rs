pub mod jsonl_change_log;
