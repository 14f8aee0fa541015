pub mod databases;
pub mod flow;
pub mod routes;
pub mod services;
pub mod session;
pub mod validate;
