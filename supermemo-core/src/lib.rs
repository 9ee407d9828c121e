pub mod classic;
pub mod config;
pub mod errors;
pub mod models;
pub mod plus;
pub mod simulate;

pub use classic::*;
pub use config::*;
pub use errors::*;
pub use models::*;
pub use plus::*;
pub use simulate::*;
