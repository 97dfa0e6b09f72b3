pub mod form;
pub mod models;
pub mod response;
pub mod routes;
