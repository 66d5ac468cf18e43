pub mod types;
pub mod error;
pub mod config;
pub mod link;
pub mod classify;
pub mod tokenize;
pub mod pattern;
pub mod extract;
pub mod builder;
pub mod lookup;

pub use types::*;
pub use error::ActiveTextError;
pub use config::*;
pub use link::*;
pub use classify::*;
pub use tokenize::*;
pub use pattern::*;
pub use extract::*;
pub use builder::*;
pub use lookup::*;

#[cfg(test)]
mod tests;
