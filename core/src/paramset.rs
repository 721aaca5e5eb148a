//! Resolved plugin parameters.
//!
//! The external configuration layer resolves names and file references into
//! typed values before handing them to plugin constructors; the core never
//! touches the configuration format itself.

use crate::bsdf::ArcBsdf;
use crate::common::*;
use crate::error::{Error, Result};
use crate::geometry::{Point3f, Transform, Vector3f};
use crate::medium::ArcMedium;
use crate::shape::ArcShape;
use crate::spectrum::Spectrum;
use crate::texture::ArcTexture;
use std::collections::HashMap;
use std::sync::Arc;

/// A resolved parameter value.
#[derive(Clone)]
pub enum ParamValue {
    /// Floating point scalar.
    Float(Float),

    /// Integer scalar.
    Int(i64),

    /// Boolean.
    Bool(bool),

    /// String.
    String(String),

    /// RGB value.
    Spectrum(Spectrum),

    /// 3-D point.
    Point3(Point3f),

    /// 3-D vector.
    Vector3(Vector3f),

    /// Affine transform.
    Transform(Transform),

    /// Already-constructed texture.
    Texture(ArcTexture),

    /// Already-constructed BSDF (composite materials nest these).
    Bsdf(ArcBsdf),

    /// Already-constructed shape (area lights wrap these).
    Shape(ArcShape),

    /// Already-constructed medium.
    Medium(ArcMedium),

    /// Shared float array (grid densities, vertex data from the asset layer).
    Floats(Arc<Vec<Float>>),

    /// Shared integer array (index data from the asset layer).
    Ints(Arc<Vec<i64>>),
}

/// A bag of resolved parameters keyed by name.
#[derive(Clone, Default)]
pub struct ParamSet {
    values: HashMap<String, ParamValue>,
}

impl ParamSet {
    /// Create an empty `ParamSet`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value under the same name.
    ///
    /// * `name`  - Parameter name.
    /// * `value` - The value.
    pub fn insert(&mut self, name: &str, value: ParamValue) -> &mut Self {
        self.values.insert(name.to_string(), value);
        self
    }

    /// Find a float, falling back to a documented default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default when absent.
    pub fn find_one_float(&self, name: &str, default: Float) -> Float {
        match self.values.get(name) {
            Some(ParamValue::Float(v)) => *v,
            Some(ParamValue::Int(v)) => *v as Float,
            _ => default,
        }
    }

    /// Find an integer, falling back to a documented default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default when absent.
    pub fn find_one_int(&self, name: &str, default: i64) -> i64 {
        match self.values.get(name) {
            Some(ParamValue::Int(v)) => *v,
            _ => default,
        }
    }

    /// Find a boolean, falling back to a documented default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default when absent.
    pub fn find_one_bool(&self, name: &str, default: bool) -> bool {
        match self.values.get(name) {
            Some(ParamValue::Bool(v)) => *v,
            _ => default,
        }
    }

    /// Find a string, falling back to a documented default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default when absent.
    pub fn find_one_string(&self, name: &str, default: &str) -> String {
        match self.values.get(name) {
            Some(ParamValue::String(v)) => v.clone(),
            _ => default.to_string(),
        }
    }

    /// Find a spectrum, falling back to a documented default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default when absent.
    pub fn find_one_spectrum(&self, name: &str, default: Spectrum) -> Spectrum {
        match self.values.get(name) {
            Some(ParamValue::Spectrum(v)) => *v,
            Some(ParamValue::Float(v)) => Spectrum::splat(*v),
            _ => default,
        }
    }

    /// Find a point, falling back to a documented default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default when absent.
    pub fn find_one_point3(&self, name: &str, default: Point3f) -> Point3f {
        match self.values.get(name) {
            Some(ParamValue::Point3(v)) => *v,
            _ => default,
        }
    }

    /// Find a vector, falling back to a documented default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default when absent.
    pub fn find_one_vector3(&self, name: &str, default: Vector3f) -> Vector3f {
        match self.values.get(name) {
            Some(ParamValue::Vector3(v)) => *v,
            _ => default,
        }
    }

    /// Find a transform, falling back to identity.
    ///
    /// * `name` - Parameter name.
    pub fn find_one_transform(&self, name: &str) -> Transform {
        match self.values.get(name) {
            Some(ParamValue::Transform(v)) => *v,
            _ => Transform::default(),
        }
    }

    /// Find a texture; a spectrum or float under the same name is promoted to
    /// a constant texture.
    ///
    /// * `name` - Parameter name.
    pub fn find_texture(&self, name: &str) -> Option<ArcTexture> {
        match self.values.get(name) {
            Some(ParamValue::Texture(t)) => Some(Arc::clone(t)),
            Some(ParamValue::Spectrum(s)) => {
                Some(Arc::new(crate::texture::ConstantTexture::new(*s)))
            }
            Some(ParamValue::Float(v)) => Some(Arc::new(crate::texture::ConstantTexture::new(
                Spectrum::splat(*v),
            ))),
            _ => None,
        }
    }

    /// A required texture.
    ///
    /// * `name` - Parameter name.
    pub fn require_texture(&self, name: &str) -> Result<ArcTexture> {
        self.find_texture(name)
            .ok_or_else(|| Error::MissingParam(name.to_string()))
    }

    /// A required nested BSDF.
    ///
    /// * `name` - Parameter name.
    pub fn require_bsdf(&self, name: &str) -> Result<ArcBsdf> {
        match self.values.get(name) {
            Some(ParamValue::Bsdf(b)) => Ok(Arc::clone(b)),
            Some(_) => Err(Error::ParamType(name.to_string())),
            None => Err(Error::MissingParam(name.to_string())),
        }
    }

    /// A required shape handle.
    ///
    /// * `name` - Parameter name.
    pub fn require_shape(&self, name: &str) -> Result<ArcShape> {
        match self.values.get(name) {
            Some(ParamValue::Shape(s)) => Ok(Arc::clone(s)),
            Some(_) => Err(Error::ParamType(name.to_string())),
            None => Err(Error::MissingParam(name.to_string())),
        }
    }

    /// Find a shared float array.
    ///
    /// * `name` - Parameter name.
    pub fn find_floats(&self, name: &str) -> Option<Arc<Vec<Float>>> {
        match self.values.get(name) {
            Some(ParamValue::Floats(v)) => Some(Arc::clone(v)),
            _ => None,
        }
    }

    /// A required float array.
    ///
    /// * `name` - Parameter name.
    pub fn require_floats(&self, name: &str) -> Result<Arc<Vec<Float>>> {
        match self.values.get(name) {
            Some(ParamValue::Floats(v)) => Ok(Arc::clone(v)),
            Some(_) => Err(Error::ParamType(name.to_string())),
            None => Err(Error::MissingParam(name.to_string())),
        }
    }

    /// A required integer array.
    ///
    /// * `name` - Parameter name.
    pub fn require_ints(&self, name: &str) -> Result<Arc<Vec<i64>>> {
        match self.values.get(name) {
            Some(ParamValue::Ints(v)) => Ok(Arc::clone(v)),
            Some(_) => Err(Error::ParamType(name.to_string())),
            None => Err(Error::MissingParam(name.to_string())),
        }
    }

    /// A required float.
    ///
    /// * `name` - Parameter name.
    pub fn require_float(&self, name: &str) -> Result<Float> {
        match self.values.get(name) {
            Some(ParamValue::Float(v)) => Ok(*v),
            Some(ParamValue::Int(v)) => Ok(*v as Float),
            Some(_) => Err(Error::ParamType(name.to_string())),
            None => Err(Error::MissingParam(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_required_fields() {
        let mut params = ParamSet::new();
        params.insert("ior", ParamValue::Float(1.5));
        assert_eq!(params.find_one_float("ior", 1.0), 1.5);
        assert_eq!(params.find_one_float("absent", 2.0), 2.0);
        assert!(params.require_float("ior").is_ok());
        assert!(matches!(
            params.require_float("absent"),
            Err(Error::MissingParam(_))
        ));
    }

    #[test]
    fn spectra_promote_to_constant_textures() {
        let mut params = ParamSet::new();
        params.insert("reflectance", ParamValue::Spectrum(Spectrum::splat(0.25)));
        let tex = params.require_texture("reflectance").unwrap();
        assert_eq!(
            tex.evaluate(&crate::geometry::Point2f::new(0.3, 0.8)),
            Spectrum::splat(0.25)
        );
    }
}
