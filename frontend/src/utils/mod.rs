pub mod cache;
pub mod jwt;
pub mod storage;
pub mod time;
