#![warn(clippy::all, clippy::pedantic)]

//! End-to-end scenarios over real on-disk databases.

mod scenarios;
