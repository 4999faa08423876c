pub mod activity_generator;
pub mod entry_builder;
pub mod feed_merge;
pub mod integrity_service;
pub mod scope_guard;
