pub mod account;
pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod ens;
pub mod error;

pub use controller::{AccountsController, DisplaySettings};
pub use error::AccountsError;
