use serde::Serialize;

/// Blend mode for translucent materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Standard alpha blending (src-alpha, one-minus-src-alpha).
    #[default]
    Normal,
    /// Additive blending for glow (src-alpha, one).
    Additive,
}

/// Which faces are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

/// Linear RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// From a packed `0xRRGGBB` value.
    pub fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as f32 / 255.0,
            g: ((rgb >> 8) & 0xff) as f32 / 255.0,
            b: (rgb & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn scaled(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }
}

/// Lit PBR-style surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardMaterial {
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub side: Side,
    pub depth_write: bool,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            roughness: 0.7,
            metalness: 0.1,
            opacity: 1.0,
            transparent: false,
            side: Side::Front,
            depth_write: true,
        }
    }
}

impl StandardMaterial {
    pub fn new(color: Color) -> Self {
        Self { color, ..Default::default() }
    }

    pub fn translucent(mut self, opacity: f32, side: Side) -> Self {
        self.opacity = opacity;
        self.transparent = true;
        self.side = side;
        self.depth_write = false;
        self
    }
}

/// Unlit self-illuminated surface (the sun).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmissiveMaterial {
    pub color: Color,
    pub intensity: f32,
}

/// Built-in shader programs the renderer knows how to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ShaderProgram {
    /// View-dependent fresnel halo, animated by `time`.
    FresnelGlow,
}

/// Uniform block for the fresnel glow program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlowUniforms {
    pub color: Color,
    /// Fresnel bias.
    pub c: f32,
    /// Fresnel exponent.
    pub p: f32,
    pub time: f32,
}

/// Custom shader surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShaderMaterial {
    pub program: ShaderProgram,
    pub uniforms: GlowUniforms,
    pub opacity: f32,
    pub blend: BlendMode,
    pub side: Side,
}

/// Sprite-per-vertex particle material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsMaterial {
    pub size: f32,
    pub opacity: f32,
    pub blend: BlendMode,
    pub vertex_colors: bool,
    pub size_attenuation: bool,
}

/// Tagged material variant; the renderer dispatches on the tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Material {
    Standard(StandardMaterial),
    Emissive(EmissiveMaterial),
    Shader(ShaderMaterial),
    Points(PointsMaterial),
}

impl Material {
    /// Current opacity regardless of variant.
    pub fn opacity(&self) -> f32 {
        match self {
            Material::Standard(m) => m.opacity,
            Material::Emissive(_) => 1.0,
            Material::Shader(m) => m.opacity,
            Material::Points(m) => m.opacity,
        }
    }

    /// Set opacity where the variant supports it. Emissive is always opaque.
    pub fn set_opacity(&mut self, opacity: f32) {
        match self {
            Material::Standard(m) => m.opacity = opacity,
            Material::Emissive(_) => {}
            Material::Shader(m) => m.opacity = opacity,
            Material::Points(m) => m.opacity = opacity,
        }
    }

    pub fn is_transparent(&self) -> bool {
        match self {
            Material::Standard(m) => m.transparent,
            Material::Emissive(_) => false,
            Material::Shader(_) | Material::Points(_) => true,
        }
    }
}
