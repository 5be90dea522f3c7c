#![doc = include_str!("../README.md")]

//! # Storage engine
//!
//! Everything the ORM needs from a relational database: scalar values, a
//! connection contract and a default SQLite implementation.

#![forbid(unsafe_code)]

mod connection;
pub mod sqlite;
mod value;

pub use crate::connection::{Connection, Executed, Record};
pub use crate::sqlite::{ConnectOptions, SqliteDb};
pub use crate::value::Value;
