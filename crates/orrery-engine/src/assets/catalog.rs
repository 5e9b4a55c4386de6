use std::collections::HashSet;
use std::f32::consts::PI;

use serde::{Deserialize, Deserializer};

use crate::components::material::Color;
use crate::error::CatalogError;

/// One portfolio section rendered as an orbiting body.
/// Loaded from a JSON catalog at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyDescriptor {
    pub id: String,
    pub display_name: String,
    /// Relative path to a binary glTF model (e.g., "models/about.glb").
    #[serde(default)]
    pub model_reference: Option<String>,
    /// Body radius in world units.
    pub size: f32,
    pub orbit_radius: f32,
    /// Radians per second.
    pub orbit_speed: f32,
    /// Radians per frame.
    pub rotation_speed: f32,
    /// Radians.
    #[serde(default)]
    pub initial_angle: f32,
    #[serde(deserialize_with = "hex_color")]
    pub color: Color,
    #[serde(deserialize_with = "hex_color")]
    pub atmosphere_color: Color,
    #[serde(default)]
    pub related_content: Vec<RelatedContent>,
}

/// Project-like record shown alongside a body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelatedContent {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The central, non-interactive star.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SunDescriptor {
    #[serde(default = "default_sun_size")]
    pub size: f32,
    #[serde(default = "default_sun_color", deserialize_with = "hex_color")]
    pub color: Color,
}

impl Default for SunDescriptor {
    fn default() -> Self {
        Self {
            size: default_sun_size(),
            color: default_sun_color(),
        }
    }
}

fn default_sun_size() -> f32 {
    2.5
}

fn default_sun_color() -> Color {
    Color::hex(0xffaa33)
}

/// Accepts `"#rrggbb"`, `"0xrrggbb"` or a bare integer.
fn hex_color<'de, D: Deserializer<'de>>(d: D) -> Result<Color, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u32),
        Str(String),
    }
    match Raw::deserialize(d)? {
        Raw::Int(v) => Ok(Color::hex(v)),
        Raw::Str(s) => {
            let digits = s
                .strip_prefix('#')
                .or_else(|| s.strip_prefix("0x"))
                .unwrap_or(&s);
            u32::from_str_radix(digits, 16)
                .map(Color::hex)
                .map_err(|_| serde::de::Error::custom(format!("invalid color `{s}`")))
        }
    }
}

/// Ordered list of bodies plus the sun. Order is significant: bodies are
/// addressed by catalog index throughout the engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BodyCatalog {
    #[serde(default)]
    pub sun: SunDescriptor,
    pub bodies: Vec<BodyDescriptor>,
}

impl BodyCatalog {
    /// Parse and validate a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.bodies.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut ids = HashSet::new();
        for body in &self.bodies {
            if !ids.insert(body.id.as_str()) {
                return Err(CatalogError::DuplicateId(body.id.clone()));
            }
            for (field, value) in [("size", body.size), ("orbitRadius", body.orbit_radius)] {
                if !value.is_finite() || value <= 0.0 {
                    return Err(CatalogError::InvalidParameter { id: body.id.clone(), field });
                }
            }
        }
        if !self.sun.size.is_finite() || self.sun.size <= 0.0 {
            return Err(CatalogError::InvalidParameter { id: "sun".into(), field: "size" });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BodyDescriptor> {
        self.bodies.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BodyDescriptor> {
        self.bodies.iter()
    }
}

impl Default for BodyCatalog {
    /// Built-in portfolio layout used when the host supplies no catalog.
    fn default() -> Self {
        let body = |id: &str,
                    name: &str,
                    size: f32,
                    orbit_radius: f32,
                    orbit_speed: f32,
                    rotation_speed: f32,
                    initial_angle: f32,
                    color: u32,
                    atmosphere: u32| BodyDescriptor {
            id: id.into(),
            display_name: name.into(),
            model_reference: Some(format!("models/{id}.glb")),
            size,
            orbit_radius,
            orbit_speed,
            rotation_speed,
            initial_angle,
            color: Color::hex(color),
            atmosphere_color: Color::hex(atmosphere),
            related_content: Vec::new(),
        };
        Self {
            sun: SunDescriptor::default(),
            bodies: vec![
                body("about", "About", 0.8, 6.0, 0.12, 0.005, 0.0, 0x4a90d9, 0x87ceeb),
                body("skills", "Skills", 0.6, 8.0, 0.09, 0.007, PI * 0.4, 0xd9734a, 0xffb07a),
                body("projects", "Projects", 1.0, 10.5, 0.07, 0.004, PI * 1.2, 0x5fbf6a, 0x9cf0a6),
                body("experience", "Experience", 0.9, 12.5, 0.05, 0.006, PI * 1.6, 0xb07ad9, 0xd8b4ff),
                body("contact", "Contact", 0.7, 14.0, 0.04, 0.008, PI * 0.8, 0xd9c34a, 0xfff09c),
            ],
        }
    }
}
