//! Weather dashboard backend: a provider-neutral weather contract and a USGS
//! earthquake feed, served over HTTP.

pub mod client;
pub mod condition;
pub mod config;
pub mod error;
pub mod forecast;
pub mod models;
pub mod routes;
pub mod seismic;
pub mod utils;
