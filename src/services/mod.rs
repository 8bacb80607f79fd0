pub mod local_configuration;
pub mod storage;
