pub mod json_directory;
