pub mod routes;
pub mod startup;
pub mod envelope;
pub mod errors;
pub mod openapi;

pub use routes::ServerState;
pub use startup::run;
