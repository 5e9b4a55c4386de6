use glam::{Vec2, Vec3};

use crate::api::config::EngineConfig;
use crate::api::types::Notification;
use crate::assets::catalog::{BodyCatalog, BodyDescriptor};
use crate::assets::loader::{AssetLoader, LoadOutcome, LoadTicket};
use crate::core::scene::Scene;
use crate::core::time::Clock;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::camera::Camera;
use crate::renderer::draw_list::DrawList;
use crate::renderer::postprocess::PostProcess;
use crate::renderer::traits::{FrameData, Renderer};
use crate::systems::builder::{attach_model, build_scene, LoadProgress, SceneIndex};
use crate::systems::controls::OrbitControls;
use crate::systems::device::RenderDefaults;
use crate::systems::interaction::{InteractionResolver, PointerAction};
use crate::systems::orbit;
use crate::systems::quality::{QualityManager, QualityProfile};
use crate::systems::render::build_draw_list;
use crate::systems::sampler::PerformanceSampler;
use crate::systems::spotlight::{spotlight, Rect, SPOTLIGHT_PADDING};
use crate::systems::transition::{TransitionController, TransitionEvent, TransitionState};

/// Canvas size in CSS pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, dpr: f32) -> Self {
        Self { width, height, dpr }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// One body model to fetch. The host runs the fetch asynchronously and hands
/// the outcome back through [`Context::complete_load`].
#[derive(Debug, Clone)]
pub struct LoadJob {
    pub index: usize,
    pub descriptor: BodyDescriptor,
    pub ticket: LoadTicket,
}

/// Owns the scene, camera and every per-frame system. Created once per
/// canvas; `dispose` tears it down and freezes it.
pub struct Context {
    catalog: BodyCatalog,
    config: EngineConfig,
    scene: Scene,
    index: SceneIndex,
    camera: Camera,
    controls: OrbitControls,
    transition: TransitionController,
    interaction: InteractionResolver,
    quality: QualityManager,
    post: PostProcess,
    sampler: PerformanceSampler,
    clock: Clock,
    input: InputQueue,
    draw_list: DrawList,
    loader: AssetLoader,
    /// Outstanding loads by catalog index.
    tickets: Vec<(usize, LoadTicket)>,
    progress: LoadProgress,
    notifications: Vec<Notification>,
    viewport: Viewport,
    frame: u64,
    disposed: bool,
}

impl Context {
    /// Build the scene and apply the device's default quality profile.
    pub fn new(
        catalog: BodyCatalog,
        config: EngineConfig,
        defaults: RenderDefaults,
        viewport: Viewport,
        renderer: &mut dyn Renderer,
    ) -> Self {
        let mut scene = Scene::new();
        let index = build_scene(&mut scene, &catalog, &defaults, config.seed);

        let cam = config.camera;
        let mut camera = Camera::new(cam.fov, 1.0, cam.near, cam.far);
        camera.set_viewport(viewport.width, viewport.height);
        camera.eye = config.overview_position;
        camera.look_at(config.overview_target);

        let mut controls = OrbitControls::new(config.controls);
        controls.target = config.overview_target;

        let mut quality = QualityManager::new(defaults.quality, viewport.dpr);
        let mut post = PostProcess::new(defaults.quality.settings().bloom);
        renderer.set_antialias(defaults.antialias);
        renderer.resize(viewport.width.max(0.0) as u32, viewport.height.max(0.0) as u32);
        quality.apply(defaults.quality, &mut scene, &index, renderer, &mut post);

        log::info!(
            "context ready: {} bodies, backend {}, quality {:?}",
            catalog.len(),
            renderer.backend(),
            defaults.quality
        );

        Self {
            transition: TransitionController::new(&config),
            interaction: InteractionResolver::new(config.drag_threshold_px),
            sampler: PerformanceSampler::new(config.sample_window_ms),
            loader: AssetLoader::new(defaults.sphere_segments),
            progress: LoadProgress::new(catalog.len()),
            catalog,
            config,
            scene,
            index,
            camera,
            controls,
            quality,
            post,
            clock: Clock::new(),
            input: InputQueue::new(),
            draw_list: DrawList::new(),
            tickets: Vec::new(),
            notifications: Vec::new(),
            viewport,
            frame: 0,
            disposed: false,
        }
    }

    pub fn catalog(&self) -> &BodyCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn index(&self) -> &SceneIndex {
        &self.index
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn transition_state(&self) -> TransitionState {
        self.transition.state()
    }

    pub fn quality(&self) -> QualityProfile {
        self.quality.profile()
    }

    pub fn post(&self) -> &PostProcess {
        &self.post
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn loader(&self) -> AssetLoader {
        self.loader
    }

    /// Frames rendered so far. Frozen once disposed.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // -- Loading --

    /// Issue a load job for every body that has neither a model nor a load in
    /// flight. Each job carries a ticket that `dispose` cancels.
    pub fn begin_loads(&mut self) -> Vec<LoadJob> {
        if self.disposed {
            return Vec::new();
        }
        let jobs: Vec<LoadJob> = self
            .catalog
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                !self.index.bodies[*i].loaded && !self.tickets.iter().any(|(pending, _)| pending == i)
            })
            .map(|(index, descriptor)| LoadJob {
                index,
                descriptor: descriptor.clone(),
                ticket: LoadTicket::new(),
            })
            .collect();
        self.tickets.extend(jobs.iter().map(|job| (job.index, job.ticket.clone())));
        log::info!("loading {} body models", jobs.len());
        jobs
    }

    /// Attach a resolved model, evicting any model it replaces from the
    /// renderer. Returns false if the outcome was discarded (cancelled, or the
    /// context is already disposed).
    pub fn complete_load(&mut self, outcome: LoadOutcome, renderer: &mut dyn Renderer) -> bool {
        if self.disposed {
            return false;
        }
        let Some(model) = outcome.into_model() else {
            return false;
        };
        let body = model.tag.index;
        self.tickets.retain(|(pending, _)| *pending != body);
        let first = self.index.bodies.get(body).is_some_and(|b| !b.loaded);

        for resource in attach_model(&mut self.scene, &mut self.index, model) {
            renderer.release(resource);
        }
        if first {
            self.notifications.extend(self.progress.resolve());
        }
        true
    }

    // -- Input & notifications --

    pub fn push_input(&mut self, event: InputEvent) {
        if !self.disposed {
            self.input.push(event);
        }
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Tutorial highlight around an anchor rectangle, or the whole viewport.
    pub fn spotlight(&self, anchor: Option<Rect>) -> Rect {
        spotlight(anchor, self.viewport.width, self.viewport.height, SPOTLIGHT_PADDING)
    }

    // -- Frame --

    /// Run one frame: input, orbits, camera, render, sampling.
    pub fn tick(&mut self, now_ms: f64, renderer: &mut dyn Renderer) {
        if self.disposed {
            return;
        }
        let t = self.clock.advance(now_ms);

        for event in self.input.drain() {
            self.handle_event(event, now_ms, renderer);
        }

        orbit::simulate(&mut self.scene, &self.index, &self.catalog, t);

        if self.transition.is_idle() {
            self.controls.update(&mut self.camera);
        } else {
            let (scene, index) = (&self.scene, &self.index);
            let landed = self.transition.update(now_ms, &mut self.camera, |i| {
                index.bodies.get(i).map(|b| scene.world_matrix(b.body).transform_point3(Vec3::ZERO))
            });
            match landed {
                Some(TransitionEvent::Arrived { focus, .. }) | Some(TransitionEvent::Returned { focus }) => {
                    self.controls.target = focus;
                }
                None => {}
            }
        }

        self.post.update(t);
        build_draw_list(&self.scene, &mut self.draw_list);
        let stats = renderer.draw(&FrameData {
            frame: self.frame,
            time: t,
            camera: &self.camera,
            draw_list: &self.draw_list,
            resources: self.scene.resources(),
            post: &self.post,
            pixel_ratio: self.quality.pixel_ratio(),
            shadows: self.quality.shadows(),
        });
        self.frame += 1;

        if let Some(sample) = self.sampler.record(now_ms, &stats) {
            self.notifications.push(Notification::Performance(sample));
        }
    }

    fn handle_event(&mut self, event: InputEvent, now_ms: f64, renderer: &mut dyn Renderer) {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.interaction.pointer_down(x, y);
            }
            InputEvent::PointerMove { x, y } => match self.interaction.pointer_move(x, y) {
                PointerAction::Drag(delta) if self.transition.is_idle() => {
                    self.controls.rotate(delta.x, delta.y);
                }
                PointerAction::Hover(p) => {
                    let over = self
                        .interaction
                        .pick_at(&self.scene, &self.camera, p, self.viewport.size())
                        .is_some();
                    if let Some(cursor) = self.interaction.hover(over) {
                        self.notifications.push(Notification::CursorChanged(cursor));
                    }
                }
                _ => {}
            },
            InputEvent::PointerUp { x, y } => {
                if let PointerAction::Click(p) = self.interaction.pointer_up(x, y) {
                    if let Some(hit) = self.interaction.pick_at(&self.scene, &self.camera, p, self.viewport.size()) {
                        self.select(hit.body, now_ms);
                    }
                }
            }
            InputEvent::PointerCancel => {
                self.interaction.cancel();
                if let Some(cursor) = self.interaction.hover(false) {
                    self.notifications.push(Notification::CursorChanged(cursor));
                }
            }
            InputEvent::Wheel { delta_y } => {
                if self.transition.is_idle() {
                    self.controls.dolly(delta_y);
                }
            }
            InputEvent::Resize { width, height, dpr } => {
                self.viewport = Viewport::new(width, height, dpr);
                self.camera.set_viewport(width, height);
                renderer.resize(width.max(0.0) as u32, height.max(0.0) as u32);
                self.quality.resize(dpr, renderer);
            }
            InputEvent::Deselect => {
                if self.transition.return_home(&self.camera, now_ms) {
                    self.controls.stop();
                }
            }
            InputEvent::SetQuality(profile) => {
                self.quality
                    .apply(profile, &mut self.scene, &self.index, renderer, &mut self.post);
            }
            InputEvent::Focus { index } => {
                if index < self.catalog.len() {
                    self.select(index, now_ms);
                } else {
                    log::warn!("focus: no body at index {index}");
                }
            }
        }
    }

    /// Fly to a body and tell the host to show its content.
    fn select(&mut self, body: usize, now_ms: f64) {
        let (Some(handles), Some(descriptor)) = (self.index.bodies.get(body), self.catalog.get(body)) else {
            return;
        };
        let position = self.scene.world_matrix(handles.body).transform_point3(Vec3::ZERO);
        self.controls.stop();
        self.transition.fly_to(body, position, &self.camera, now_ms);
        self.notifications.push(Notification::Navigate(descriptor.id.clone()));
    }

    // -- Teardown --

    /// Cancel pending loads and release every scene resource through the
    /// renderer. Idempotent; returns the number of resources released.
    pub fn dispose(&mut self, renderer: &mut dyn Renderer) -> usize {
        if self.disposed {
            return 0;
        }
        for (_, ticket) in self.tickets.drain(..) {
            ticket.cancel();
        }
        let released = self.scene.dispose(|resource| renderer.release(resource));
        self.input.clear();
        self.notifications.clear();
        self.draw_list.clear();
        self.disposed = true;
        log::info!("context disposed after {} frames, {} resources released", self.frame, released);
        released
    }
}
