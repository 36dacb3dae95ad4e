//! Integration tests driving the library facade

mod circulation;
mod cli;
mod common;
mod persistence;
