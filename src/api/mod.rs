// API routes and handlers

pub mod health;
pub mod plans;
pub mod profile;
pub mod routes;
