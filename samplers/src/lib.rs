//! Sampler implementations.

mod independent;

pub use independent::*;

use rad_core::error::{Error, Result};
use rad_core::paramset::ParamSet;
use rad_core::sampler::Sampler;

/// Construct a sampler prototype by type identifier. Samplers are handed out
/// by value (the render loop clones and re-seeds them per tile), so this
/// family bypasses the shared-ownership registry.
///
/// * `name`   - Type identifier.
/// * `params` - Resolved parameters.
pub fn create_sampler(name: &str, params: &ParamSet) -> Result<Box<dyn Sampler>> {
    match name {
        "independent" => Ok(Box::new(IndependentSampler::new(
            params.find_one_int("seed", 0) as u64,
        ))),
        _ => Err(Error::UnknownPlugin(name.to_string())),
    }
}
