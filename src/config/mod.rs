pub mod parser;
pub mod schema;
pub mod types;
pub mod security;
pub mod env;

pub use types::*;
pub use parser::{parse_config, load_config};
pub use env::ScanEnvironment;
