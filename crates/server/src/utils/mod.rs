pub mod shutdown;
pub mod storage;
