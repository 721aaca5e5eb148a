//! Core light-transport abstractions: math and frames, importance-sampling
//! distribution tables, the scene/intersection contracts, and the BSDF,
//! light, medium, sampler and renderer interfaces shared by the plugin
//! crates.

pub mod bsdf;
pub mod camera;
pub mod common;
pub mod error;
pub mod film;
pub mod geometry;
pub mod interaction;
pub mod light;
pub mod medium;
pub mod microfacet;
pub mod paramset;
pub mod registry;
pub mod renderer;
pub mod rng;
pub mod sampler;
pub mod sampling;
pub mod scene;
pub mod shape;
pub mod spectrum;
pub mod texture;
