pub mod check;
pub mod feed;
pub mod init;
pub mod workspace;
