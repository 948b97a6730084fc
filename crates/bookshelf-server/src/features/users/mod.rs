//! User registration and login

pub mod commands;
pub mod routes;
