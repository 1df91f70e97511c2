pub mod export;
pub mod init;
pub mod papers;
pub mod parse;
pub mod serve;
pub mod status;
