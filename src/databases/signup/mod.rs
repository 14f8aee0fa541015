pub mod sessiondb;
