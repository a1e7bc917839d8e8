pub mod connection;
pub mod entities;
pub mod schema;

pub use connection::*;
pub use entities::*;
