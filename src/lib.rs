//! poimap - Browse, export and map the shops and amenities of a locality
//! from OpenStreetMap data

pub mod api;
pub mod config;
pub mod domain;
pub mod export;
pub mod map;
pub mod osm;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod server;
