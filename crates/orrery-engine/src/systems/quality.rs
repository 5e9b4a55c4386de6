//! Discrete rendering-quality profiles and the manager that applies them to
//! the renderer, the post chain and scene materials.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::types::MaterialId;
use crate::components::material::{BlendMode, Material};
use crate::core::scene::Scene;
use crate::error::ConfigError;
use crate::renderer::postprocess::{BloomParams, PostProcess};
use crate::renderer::traits::{Renderer, ShadowKind, ShadowSettings};
use crate::systems::builder::{ParticleHandles, SceneIndex};

/// Scale applied to particle size and translucent opacity below High.
const MEDIUM_FADE: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityProfile {
    #[default]
    High,
    Medium,
}

impl FromStr for QualityProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(QualityProfile::High),
            "medium" => Ok(QualityProfile::Medium),
            _ => Err(ConfigError::UnknownQuality(s.to_string())),
        }
    }
}

/// Fixed parameter bundle for one profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualitySettings {
    pub pixel_ratio_cap: f32,
    pub bloom: BloomParams,
    pub shadows: ShadowSettings,
    /// Multiplier on snapshot particle size and translucent opacity.
    pub fade: f32,
    pub particle_blend: BlendMode,
}

impl QualityProfile {
    pub fn settings(self) -> QualitySettings {
        match self {
            QualityProfile::High => QualitySettings {
                pixel_ratio_cap: 2.0,
                bloom: BloomParams { strength: 0.6, radius: 0.75, threshold: 0.4 },
                shadows: ShadowSettings { enabled: true, kind: ShadowKind::PcfSoft },
                fade: 1.0,
                particle_blend: BlendMode::Normal,
            },
            QualityProfile::Medium => QualitySettings {
                pixel_ratio_cap: 0.8,
                bloom: BloomParams { strength: 0.4, radius: 0.5, threshold: 0.5 },
                shadows: ShadowSettings { enabled: false, kind: ShadowKind::Basic },
                fade: MEDIUM_FADE,
                particle_blend: BlendMode::Additive,
            },
        }
    }
}

/// Material values captured before the first profile change.
#[derive(Debug, Clone)]
struct Snapshot {
    /// (material, size, opacity) per particle system.
    particles: Vec<(MaterialId, f32, f32)>,
    /// (material, opacity) per atmosphere shell.
    shells: Vec<(MaterialId, f32)>,
}

impl Snapshot {
    fn capture(scene: &Scene, index: &SceneIndex) -> Self {
        let resources = scene.resources();
        let particles = [index.stars, index.dust]
            .iter()
            .filter_map(|p: &ParticleHandles| match resources.material(p.material) {
                Some(Material::Points(m)) => Some((p.material, m.size, m.opacity)),
                _ => None,
            })
            .collect();
        let shells = index
            .bodies
            .iter()
            .flat_map(|b| b.shell_materials.iter())
            .filter_map(|&id| resources.material(id).map(|m| (id, m.opacity())))
            .collect();
        Self { particles, shells }
    }
}

/// Applies quality profiles. Every application derives material values from
/// the snapshot, so applying the same profile twice is a no-op.
#[derive(Debug, Clone)]
pub struct QualityManager {
    profile: QualityProfile,
    device_pixel_ratio: f32,
    snapshot: Option<Snapshot>,
}

impl QualityManager {
    pub fn new(profile: QualityProfile, device_pixel_ratio: f32) -> Self {
        Self {
            profile,
            device_pixel_ratio,
            snapshot: None,
        }
    }

    pub fn profile(&self) -> QualityProfile {
        self.profile
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio.min(self.profile.settings().pixel_ratio_cap)
    }

    pub fn shadows(&self) -> ShadowSettings {
        self.profile.settings().shadows
    }

    pub fn apply(
        &mut self,
        profile: QualityProfile,
        scene: &mut Scene,
        index: &SceneIndex,
        renderer: &mut dyn Renderer,
        post: &mut PostProcess,
    ) {
        let snapshot = self.snapshot.get_or_insert_with(|| Snapshot::capture(scene, index));
        let settings = profile.settings();
        self.profile = profile;

        let resources = scene.resources_mut();
        for &(id, size, opacity) in &snapshot.particles {
            if let Some(Material::Points(m)) = resources.material_mut(id) {
                m.size = size * settings.fade;
                m.opacity = opacity * settings.fade;
                m.blend = settings.particle_blend;
            }
        }
        for &(id, opacity) in &snapshot.shells {
            if let Some(m) = resources.material_mut(id) {
                m.set_opacity(opacity * settings.fade);
            }
        }

        post.bloom = settings.bloom;
        renderer.set_shadows(settings.shadows);
        renderer.set_pixel_ratio(self.pixel_ratio());
        log::debug!("quality -> {:?} (pixel ratio {})", profile, self.pixel_ratio());
    }

    /// Track a new device pixel ratio and re-apply the cap.
    pub fn resize(&mut self, device_pixel_ratio: f32, renderer: &mut dyn Renderer) {
        self.device_pixel_ratio = device_pixel_ratio;
        renderer.set_pixel_ratio(self.pixel_ratio());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::catalog::BodyCatalog;
    use crate::renderer::headless::HeadlessRenderer;
    use crate::systems::builder::build_scene;
    use crate::systems::device::DeviceClass;
    use approx::assert_relative_eq;

    struct Fixture {
        scene: Scene,
        index: SceneIndex,
        renderer: HeadlessRenderer,
        post: PostProcess,
    }

    fn fixture() -> Fixture {
        let mut scene = Scene::new();
        let index = build_scene(&mut scene, &BodyCatalog::default(), &DeviceClass::Desktop.defaults(), 7);
        Fixture {
            scene,
            index,
            renderer: HeadlessRenderer::new(800, 600),
            post: PostProcess::new(QualityProfile::High.settings().bloom),
        }
    }

    fn points(scene: &Scene, id: MaterialId) -> (f32, f32, BlendMode) {
        match scene.resources().material(id) {
            Some(Material::Points(m)) => (m.size, m.opacity, m.blend),
            other => panic!("expected points material, got {other:?}"),
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("HIGH".parse::<QualityProfile>().unwrap(), QualityProfile::High);
        assert_eq!("Medium".parse::<QualityProfile>().unwrap(), QualityProfile::Medium);
        assert!(matches!("ultra".parse::<QualityProfile>(), Err(ConfigError::UnknownQuality(_))));
    }

    #[test]
    fn medium_on_dpr_three_caps_pixel_ratio() {
        let mut f = fixture();
        let mut manager = QualityManager::new(QualityProfile::High, 3.0);
        manager.apply(QualityProfile::Medium, &mut f.scene, &f.index, &mut f.renderer, &mut f.post);
        assert_relative_eq!(f.renderer.pixel_ratio, 0.8);
        assert!(!f.renderer.shadows.enabled);
        assert_eq!(f.renderer.shadows.kind, ShadowKind::Basic);
        assert_eq!(f.post.bloom, BloomParams { strength: 0.4, radius: 0.5, threshold: 0.5 });
    }

    #[test]
    fn high_caps_at_two_and_enables_soft_shadows() {
        let mut f = fixture();
        let mut manager = QualityManager::new(QualityProfile::Medium, 3.0);
        manager.apply(QualityProfile::High, &mut f.scene, &f.index, &mut f.renderer, &mut f.post);
        assert_relative_eq!(f.renderer.pixel_ratio, 2.0);
        assert_eq!(f.renderer.shadows, ShadowSettings { enabled: true, kind: ShadowKind::PcfSoft });
    }

    #[test]
    fn medium_fades_particles_and_shells() {
        let mut f = fixture();
        let (size, opacity, _) = points(&f.scene, f.index.stars.material);
        let shell = f.index.bodies[0].shell_materials[0];
        let shell_opacity = f.scene.resources().material(shell).unwrap().opacity();

        let mut manager = QualityManager::new(QualityProfile::High, 1.0);
        manager.apply(QualityProfile::Medium, &mut f.scene, &f.index, &mut f.renderer, &mut f.post);

        let (s, o, blend) = points(&f.scene, f.index.stars.material);
        assert_relative_eq!(s, size * 0.75);
        assert_relative_eq!(o, opacity * 0.75);
        assert_eq!(blend, BlendMode::Additive);
        assert_relative_eq!(f.scene.resources().material(shell).unwrap().opacity(), shell_opacity * 0.75);
    }

    #[test]
    fn repeated_application_is_idempotent() {
        let mut f = fixture();
        let mut manager = QualityManager::new(QualityProfile::High, 1.0);
        manager.apply(QualityProfile::Medium, &mut f.scene, &f.index, &mut f.renderer, &mut f.post);
        let once = points(&f.scene, f.index.dust.material);
        for _ in 0..5 {
            manager.apply(QualityProfile::Medium, &mut f.scene, &f.index, &mut f.renderer, &mut f.post);
        }
        assert_eq!(points(&f.scene, f.index.dust.material), once);
    }

    #[test]
    fn returning_to_high_restores_snapshot() {
        let mut f = fixture();
        let original = points(&f.scene, f.index.dust.material);
        let mut manager = QualityManager::new(QualityProfile::High, 1.0);
        manager.apply(QualityProfile::Medium, &mut f.scene, &f.index, &mut f.renderer, &mut f.post);
        manager.apply(QualityProfile::High, &mut f.scene, &f.index, &mut f.renderer, &mut f.post);
        assert_eq!(points(&f.scene, f.index.dust.material), original);
        assert_eq!(original.2, BlendMode::Normal);
    }

    #[test]
    fn resize_reapplies_cap() {
        let mut f = fixture();
        let mut manager = QualityManager::new(QualityProfile::High, 1.0);
        manager.apply(QualityProfile::Medium, &mut f.scene, &f.index, &mut f.renderer, &mut f.post);
        manager.resize(2.0, &mut f.renderer);
        assert_relative_eq!(f.renderer.pixel_ratio, 0.8);
        manager.resize(0.5, &mut f.renderer);
        assert_relative_eq!(f.renderer.pixel_ratio, 0.5);
    }
}
