pub mod activity_entry;
pub mod change_record;
pub mod scope;
