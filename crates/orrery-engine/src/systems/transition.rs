// systems/transition.rs
//
// Three-state camera transition machine, ticked once per frame:
//
//   Idle ──select──▶ FlyingTo(i) ──arrive──▶ Idle
//     ▲                  │ deselect
//     └──arrive── Returning ◀┘
//
// A new request always supersedes the active one and starts from wherever
// the camera is at that instant.

use glam::Vec3;

use crate::api::config::EngineConfig;
use crate::extensions::easing::Easing;
use crate::extensions::tween::Tween;
use crate::renderer::camera::Camera;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionState {
    #[default]
    Idle,
    /// Flying toward the body at this catalog index.
    FlyingTo(usize),
    /// Easing back to the overview pose.
    Returning,
}

/// Emitted on the frame a transition lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionEvent {
    /// Arrived at a body; `focus` is the body's position on that frame.
    Arrived { body: usize, focus: Vec3 },
    /// Back at the overview; `focus` is the overview look-at point.
    Returned { focus: Vec3 },
}

#[derive(Debug, Clone)]
pub struct TransitionController {
    state: TransitionState,
    tween: Option<Tween>,
    /// Body the user last selected; cleared by a return.
    selected: Option<usize>,
    fly_duration_ms: f64,
    return_duration_ms: f64,
    fly_offset: Vec3,
    overview_position: Vec3,
    overview_target: Vec3,
    easing: Easing,
}

impl TransitionController {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            state: TransitionState::Idle,
            tween: None,
            selected: None,
            fly_duration_ms: config.fly_duration_ms,
            return_duration_ms: config.return_duration_ms,
            fly_offset: config.fly_offset,
            overview_position: config.overview_position,
            overview_target: config.overview_target,
            easing: config.easing,
        }
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == TransitionState::Idle
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Start flying toward `body`, currently at `body_position`.
    pub fn fly_to(&mut self, body: usize, body_position: Vec3, camera: &Camera, now_ms: f64) {
        let to = body_position + self.fly_offset;
        self.tween = Some(Tween::new(camera.eye, to, now_ms, self.fly_duration_ms, self.easing));
        self.state = TransitionState::FlyingTo(body);
        self.selected = Some(body);
        log::debug!("transition: fly to body {body} ({to})");
    }

    /// Start returning to the overview. Does nothing unless a body is
    /// selected; returns whether a transition started.
    pub fn return_home(&mut self, camera: &Camera, now_ms: f64) -> bool {
        if self.selected.take().is_none() {
            return false;
        }
        self.tween = Some(Tween::new(
            camera.eye,
            self.overview_position,
            now_ms,
            self.return_duration_ms,
            self.easing,
        ));
        self.state = TransitionState::Returning;
        log::debug!("transition: return to overview");
        true
    }

    /// Advance the active transition. `body_position` resolves a catalog
    /// index to the body's current world position.
    pub fn update(
        &mut self,
        now_ms: f64,
        camera: &mut Camera,
        body_position: impl Fn(usize) -> Option<Vec3>,
    ) -> Option<TransitionEvent> {
        let tween = self.tween?;
        camera.eye = tween.sample(now_ms);

        let focus = match self.state {
            TransitionState::Idle => return None,
            TransitionState::FlyingTo(body) => body_position(body).unwrap_or(camera.target),
            TransitionState::Returning => self.overview_target,
        };
        camera.look_at(focus);

        if !tween.is_complete(now_ms) {
            return None;
        }
        let event = match self.state {
            TransitionState::FlyingTo(body) => TransitionEvent::Arrived { body, focus },
            _ => TransitionEvent::Returned { focus },
        };
        self.state = TransitionState::Idle;
        self.tween = None;
        log::debug!("transition: landed {event:?}");
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn overview_camera() -> Camera {
        let mut cam = Camera::new(75.0, 1.0, 0.1, 1000.0);
        cam.eye = Vec3::new(0.0, 5.0, 25.0);
        cam
    }

    #[test]
    fn fly_to_converges_on_offset_target() {
        let config = EngineConfig::default();
        let mut tc = TransitionController::new(&config);
        let mut cam = overview_camera();
        let body = Vec3::new(-11.33, 0.3, 8.23);
        tc.fly_to(2, body, &cam, 0.0);
        assert_eq!(tc.state(), TransitionState::FlyingTo(2));

        assert!(tc.update(1000.0, &mut cam, |_| Some(body)).is_none());
        assert_eq!(cam.target, body);

        let event = tc.update(2000.0, &mut cam, |_| Some(body));
        assert_eq!(event, Some(TransitionEvent::Arrived { body: 2, focus: body }));
        assert_eq!(cam.eye, body + Vec3::new(0.0, 2.0, 10.0));
        assert!(tc.is_idle());
    }

    #[test]
    fn fly_to_follows_the_moving_body() {
        let mut tc = TransitionController::new(&EngineConfig::default());
        let mut cam = overview_camera();
        tc.fly_to(0, Vec3::new(8.0, 0.0, 0.0), &cam, 0.0);
        let moved = Vec3::new(0.0, 0.0, 8.0);
        tc.update(500.0, &mut cam, |_| Some(moved));
        assert_eq!(cam.target, moved);
    }

    #[test]
    fn cubic_out_easing_front_loads_motion() {
        let mut tc = TransitionController::new(&EngineConfig::default());
        let mut cam = overview_camera();
        let start = cam.eye;
        let body = Vec3::new(10.0, 0.0, 0.0);
        let end = body + Vec3::new(0.0, 2.0, 10.0);
        tc.fly_to(0, body, &cam, 0.0);
        tc.update(1000.0, &mut cam, |_| Some(body));
        // 1 - (1 - 0.5)^3 = 0.875
        let expected = start.lerp(end, 0.875);
        assert_relative_eq!(cam.eye.distance(expected), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn select_then_deselect_returns_to_overview() {
        let mut tc = TransitionController::new(&EngineConfig::default());
        let mut cam = overview_camera();
        let body = Vec3::new(12.0, 0.0, 0.0);
        tc.fly_to(1, body, &cam, 0.0);
        tc.update(2000.0, &mut cam, |_| Some(body));

        assert!(tc.return_home(&cam, 3000.0));
        assert_eq!(tc.state(), TransitionState::Returning);
        assert!(tc.update(3750.0, &mut cam, |_| None).is_none());
        assert_eq!(cam.target, Vec3::ZERO);

        let event = tc.update(4500.0, &mut cam, |_| None);
        assert_eq!(event, Some(TransitionEvent::Returned { focus: Vec3::ZERO }));
        assert_eq!(cam.eye, Vec3::new(0.0, 5.0, 25.0));
        assert_eq!(tc.selected(), None);
    }

    #[test]
    fn deselect_without_selection_is_ignored() {
        let mut tc = TransitionController::new(&EngineConfig::default());
        let mut cam = overview_camera();
        cam.eye = Vec3::new(3.0, 3.0, 3.0);
        assert!(!tc.return_home(&cam, 0.0));
        assert!(tc.is_idle());
        assert!(tc.update(100.0, &mut cam, |_| None).is_none());
        assert_eq!(cam.eye, Vec3::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn new_request_supersedes_from_current_position() {
        let mut tc = TransitionController::new(&EngineConfig::default());
        let mut cam = overview_camera();
        let a = Vec3::new(10.0, 0.0, 0.0);
        let b = Vec3::new(-10.0, 0.0, 0.0);
        tc.fly_to(0, a, &cam, 0.0);
        tc.update(500.0, &mut cam, |_| Some(a));
        let midway = cam.eye;

        tc.fly_to(1, b, &cam, 500.0);
        tc.update(500.0, &mut cam, |_| Some(b));
        assert_eq!(cam.eye, midway);
        let event = tc.update(2500.0, &mut cam, |_| Some(b));
        assert_eq!(event, Some(TransitionEvent::Arrived { body: 1, focus: b }));
        assert_eq!(cam.eye, b + Vec3::new(0.0, 2.0, 10.0));
    }

    #[test]
    fn deselect_mid_flight_turns_around() {
        let mut tc = TransitionController::new(&EngineConfig::default());
        let mut cam = overview_camera();
        let body = Vec3::new(10.0, 0.0, 0.0);
        tc.fly_to(0, body, &cam, 0.0);
        tc.update(400.0, &mut cam, |_| Some(body));
        assert!(tc.return_home(&cam, 400.0));
        tc.update(1900.0, &mut cam, |_| Some(body));
        assert_eq!(cam.eye, Vec3::new(0.0, 5.0, 25.0));
        assert!(tc.is_idle());
    }
}
