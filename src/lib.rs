#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![warn(clippy::style)]
#![allow(clippy::multiple_crate_versions)]

//! Scrapes a playlist page for its video count and per-video durations, then
//! summarizes the total watch time at several playback speeds.

pub mod extract;
pub mod fetch;
pub mod report;
