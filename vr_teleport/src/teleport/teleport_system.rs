use std::{fmt, time::Duration};

use cgmath::Vector3;
use engine::{Time, teleport_log};
use serde::{Deserialize, Serialize};

use super::{
    ActivationConfig, ActivationState, ActivationStateMachine, ArbiterConfig, ArcResult,
    ArcSampler, ArcSamplerConfig, ArcTrajectory, CurveDegree, InputSource, PoseSource,
    SceneCollisionQuery, TeleportArbiter, TeleportSinks,
};
use crate::{
    input_context::{ButtonEdgeTracker, ControllerFrame, InputContext, TeleportButton},
    vr_config::Handedness,
};

/// Configuration for the teleport system
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportConfig {
    pub enabled: bool,
    /// Hand the arc is cast from
    pub hand: Handedness,
    /// Double-click toggles aiming
    pub activation_button: TeleportButton,
    /// Press while aiming at a valid spot to teleport
    pub confirm_button: TeleportButton,
    pub trigger_threshold: f32,
    pub double_click_window_secs: f32,
    pub segment_count: usize,
    pub curve_degree: CurveDegree,
    pub initial_reach: f32,
    pub min_reach: f32,
    pub max_reach: f32,
    pub extension_speed: f32,
    pub extension_axis_threshold: f32,
    pub forward_projection_extend: f32,
    pub drop_height: f32,
    pub end_overshoot: f32,
    pub landing_height_offset: f32,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        let sampler = ArcSamplerConfig::default();
        TeleportConfig {
            enabled: true,
            hand: Handedness::Left,
            activation_button: TeleportButton::BButton,
            confirm_button: TeleportButton::Trigger,
            trigger_threshold: 0.5,
            double_click_window_secs: 0.5,
            segment_count: sampler.segment_count,
            curve_degree: sampler.degree,
            initial_reach: sampler.initial_reach,
            min_reach: sampler.min_reach,
            max_reach: sampler.max_reach,
            extension_speed: sampler.extension_speed,
            extension_axis_threshold: 0.8,
            forward_projection_extend: sampler.forward_projection_extend,
            drop_height: sampler.drop_height,
            end_overshoot: sampler.end_overshoot,
            landing_height_offset: ArbiterConfig::default().landing_height_offset,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TeleportConfigError {
    /// Reach bounds are not positive or not ordered
    ReachBounds { min: f32, max: f32 },
    /// Starting reach lies outside the bounds
    InitialReach { reach: f32, min: f32, max: f32 },
    ZeroSegments,
    DoubleClickWindow { seconds: f32 },
    /// A distance or rate is NaN or infinite
    NonFinite { field: &'static str, value: f32 },
}

impl fmt::Display for TeleportConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeleportConfigError::ReachBounds { min, max } => {
                write!(f, "Invalid reach bounds [{}, {}]", min, max)
            }
            TeleportConfigError::InitialReach { reach, min, max } => {
                write!(f, "Initial reach {} is outside [{}, {}]", reach, min, max)
            }
            TeleportConfigError::ZeroSegments => write!(f, "Arc needs at least one segment"),
            TeleportConfigError::DoubleClickWindow { seconds } => {
                write!(f, "Double-click window must be positive, got {}s", seconds)
            }
            TeleportConfigError::NonFinite { field, value } => {
                write!(f, "Field '{}' must be finite, got {}", field, value)
            }
        }
    }
}

impl std::error::Error for TeleportConfigError {}

impl TeleportConfig {
    pub fn validate(&self) -> Result<(), TeleportConfigError> {
        let finite_fields = [
            ("trigger_threshold", self.trigger_threshold),
            ("double_click_window_secs", self.double_click_window_secs),
            ("initial_reach", self.initial_reach),
            ("min_reach", self.min_reach),
            ("max_reach", self.max_reach),
            ("extension_speed", self.extension_speed),
            ("extension_axis_threshold", self.extension_axis_threshold),
            ("forward_projection_extend", self.forward_projection_extend),
            ("drop_height", self.drop_height),
            ("end_overshoot", self.end_overshoot),
            ("landing_height_offset", self.landing_height_offset),
        ];
        if let Some((field, value)) = finite_fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(TeleportConfigError::NonFinite {
                field: *field,
                value: *value,
            });
        }

        if self.min_reach <= 0.0 || self.min_reach > self.max_reach {
            return Err(TeleportConfigError::ReachBounds {
                min: self.min_reach,
                max: self.max_reach,
            });
        }
        if !(self.min_reach..=self.max_reach).contains(&self.initial_reach) {
            return Err(TeleportConfigError::InitialReach {
                reach: self.initial_reach,
                min: self.min_reach,
                max: self.max_reach,
            });
        }
        if self.segment_count == 0 {
            return Err(TeleportConfigError::ZeroSegments);
        }
        if self.double_click_window_secs <= 0.0 {
            return Err(TeleportConfigError::DoubleClickWindow {
                seconds: self.double_click_window_secs,
            });
        }

        Ok(())
    }

    /// Parse a JSON config; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn sampler_config(&self) -> ArcSamplerConfig {
        ArcSamplerConfig {
            segment_count: self.segment_count,
            degree: self.curve_degree,
            initial_reach: self.initial_reach,
            min_reach: self.min_reach,
            max_reach: self.max_reach,
            extension_speed: self.extension_speed,
            forward_projection_extend: self.forward_projection_extend,
            drop_height: self.drop_height,
            end_overshoot: self.end_overshoot,
        }
    }

    pub fn activation_config(&self) -> ActivationConfig {
        let window = Duration::try_from_secs_f32(self.double_click_window_secs)
            .unwrap_or_else(|_| ActivationConfig::default().double_click_window);
        ActivationConfig {
            double_click_window: window,
        }
    }

    pub fn arbiter_config(&self) -> ArbiterConfig {
        ArbiterConfig {
            landing_height_offset: self.landing_height_offset,
        }
    }
}

/// What happened during one teleport update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TeleportUpdate {
    /// New activation state, if this frame toggled it
    pub transition: Option<ActivationState>,
    pub result: ArcResult,
    /// Where the player was moved, if a confirm landed this frame
    pub relocated_to: Option<Vector3<f32>>,
}

/// Per-frame driver: activation, then sampling, then arbitration.
pub struct TeleportSystem {
    config: TeleportConfig,
    activation: ActivationStateMachine,
    sampler: ArcSampler,
    arbiter: TeleportArbiter,
    edge_tracker: ButtonEdgeTracker,
}

impl TeleportSystem {
    pub fn new(config: TeleportConfig) -> Self {
        TeleportSystem {
            activation: ActivationStateMachine::new(config.activation_config()),
            sampler: ArcSampler::new(config.sampler_config()),
            arbiter: TeleportArbiter::new(config.arbiter_config()),
            edge_tracker: ButtonEdgeTracker::new(config.trigger_threshold),
            config,
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(TeleportConfig::default())
    }

    /// Put the external visuals into the idle state: no arc drawn, marker hidden.
    ///
    /// The system starts idle but owns no sinks, so hosts call this once after
    /// `new` and before the first update.
    pub fn initialize(&self, sinks: &mut TeleportSinks<'_>) {
        sinks.renderer.set_drawing(false);
        sinks.marker.set_visible(false);
    }

    /// Update from raw controller state, tracking button edges internally.
    pub fn update_from_input_context(
        &mut self,
        time: &Time,
        input_context: &InputContext,
        scene: &dyn SceneCollisionQuery,
        sinks: &mut TeleportSinks<'_>,
    ) -> TeleportUpdate {
        if !self.config.enabled {
            return TeleportUpdate::default();
        }

        let frame = ControllerFrame::sample(
            input_context,
            self.config.hand,
            &mut self.edge_tracker,
            self.config.extension_axis_threshold,
        );
        self.update(time, &frame, &frame, scene, sinks)
    }

    pub fn update(
        &mut self,
        time: &Time,
        input: &dyn InputSource,
        pose: &dyn PoseSource,
        scene: &dyn SceneCollisionQuery,
        sinks: &mut TeleportSinks<'_>,
    ) -> TeleportUpdate {
        if !self.config.enabled {
            return TeleportUpdate::default();
        }
        let _span = tracing::trace_span!("teleport_update").entered();

        let mut update = TeleportUpdate::default();

        let toggle_down = input.is_button_down_this_frame(self.config.activation_button);
        update.transition = self.activation.update(time.total, toggle_down);
        if let Some(state) = update.transition {
            self.apply_transition(state, sinks);
        }

        let drawing = self.sampler.is_drawing();
        let trajectory = self.sampler.update(
            &pose.emitter_pose(),
            time.delta_seconds(),
            input.extension_rate(),
            scene,
        );
        if drawing {
            sinks.renderer.set_points(&trajectory.points);
        }
        update.result = trajectory.result;

        if self.activation.is_aiming() {
            let confirm_down = input.is_button_down_this_frame(self.config.confirm_button);
            update.relocated_to = self.arbiter.resolve(
                &update.result,
                confirm_down,
                &mut *sinks.marker,
                &mut *sinks.relocation,
            );
        }

        update
    }

    /// Switch teleporting on or off at runtime.
    ///
    /// Turning it off drops back to idle (hiding the arc and marker), forgets
    /// any half-finished double-click and clears held-button state.
    pub fn set_enabled(&mut self, enabled: bool, sinks: &mut TeleportSinks<'_>) {
        if self.config.enabled == enabled {
            return;
        }
        self.config.enabled = enabled;
        teleport_log!(debug, enabled, "teleport enabled changed");

        if !enabled {
            if self.activation.is_aiming() {
                self.apply_transition(ActivationState::Idle, sinks);
            }
            self.activation = ActivationStateMachine::new(self.config.activation_config());
            self.edge_tracker.reset();
        }
    }

    fn apply_transition(&mut self, state: ActivationState, sinks: &mut TeleportSinks<'_>) {
        let aiming = state == ActivationState::Aiming;
        teleport_log!(debug, aiming, "teleport aiming changed");

        self.sampler.set_drawing(aiming);
        sinks.renderer.set_drawing(aiming);
        if !aiming {
            sinks.marker.set_visible(false);
        }
    }

    pub fn activation_state(&self) -> ActivationState {
        self.activation.state()
    }

    pub fn is_aiming(&self) -> bool {
        self.activation.is_aiming()
    }

    pub fn trajectory(&self) -> &ArcTrajectory {
        self.sampler.trajectory()
    }

    pub fn reach(&self) -> f32 {
        self.sampler.reach()
    }

    /// Get current configuration
    pub fn get_config(&self) -> &TeleportConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        effect::{Effect, EffectQueue},
        teleport::{
            ArcRendererSink, EmitterPose, MarkerSink, RayHit, RelocationSink,
        },
    };
    use cgmath::{InnerSpace, vec3};
    use std::cell::Cell;

    #[derive(Default)]
    struct RecordingRenderer {
        drawing: bool,
        points: Vec<Vector3<f32>>,
        set_points_calls: usize,
    }

    impl ArcRendererSink for RecordingRenderer {
        fn set_drawing(&mut self, enabled: bool) {
            self.drawing = enabled;
        }

        fn set_points(&mut self, points: &[Vector3<f32>]) {
            self.points = points.to_vec();
            self.set_points_calls += 1;
        }
    }

    #[derive(Default)]
    struct RecordingMarker {
        visible: bool,
        position: Option<Vector3<f32>>,
    }

    impl MarkerSink for RecordingMarker {
        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
        }

        fn set_position(&mut self, position: Vector3<f32>) {
            self.position = Some(position);
        }
    }

    #[derive(Default)]
    struct Player {
        position: Option<Vector3<f32>>,
    }

    impl RelocationSink for Player {
        fn set_player_position(&mut self, position: Vector3<f32>) {
            self.position = Some(position);
        }
    }

    /// Scene whose only surface is hit by the first segment.
    struct WallScene {
        hit: Option<Vector3<f32>>,
        queries: Cell<usize>,
    }

    impl WallScene {
        fn empty() -> Self {
            WallScene {
                hit: None,
                queries: Cell::new(0),
            }
        }

        fn hitting(point: Vector3<f32>) -> Self {
            WallScene {
                hit: Some(point),
                queries: Cell::new(0),
            }
        }
    }

    impl SceneCollisionQuery for WallScene {
        fn raycast(
            &self,
            origin: Vector3<f32>,
            _direction: Vector3<f32>,
            _max_distance: f32,
        ) -> Option<RayHit> {
            self.queries.set(self.queries.get() + 1);
            self.hit.map(|point| RayHit {
                point,
                distance: (point - origin).magnitude(),
            })
        }
    }

    #[derive(Default)]
    struct ScriptedInput {
        toggle: bool,
        confirm: bool,
    }

    impl InputSource for ScriptedInput {
        fn is_button_down_this_frame(&self, button: TeleportButton) -> bool {
            match button {
                TeleportButton::BButton => self.toggle,
                TeleportButton::Trigger => self.confirm,
                _ => false,
            }
        }
    }

    struct FixedPose;

    impl PoseSource for FixedPose {
        fn emitter_pose(&self) -> EmitterPose {
            EmitterPose::new(vec3(0.0, 1.0, 0.0), vec3(0.0, 0.0, 1.0))
        }
    }

    struct Harness {
        system: TeleportSystem,
        renderer: RecordingRenderer,
        marker: RecordingMarker,
        player: Player,
        frame: u32,
    }

    impl Harness {
        fn new() -> Self {
            Harness {
                system: TeleportSystem::with_default_config(),
                renderer: RecordingRenderer::default(),
                marker: RecordingMarker::default(),
                player: Player::default(),
                frame: 0,
            }
        }

        fn step(&mut self, input: ScriptedInput, scene: &WallScene) -> TeleportUpdate {
            self.frame += 1;
            let time = Time::new(
                Duration::from_millis(10),
                Duration::from_millis(10 * self.frame as u64),
            );
            let mut sinks = TeleportSinks {
                renderer: &mut self.renderer,
                marker: &mut self.marker,
                relocation: &mut self.player,
            };
            self.system.update(&time, &input, &FixedPose, scene, &mut sinks)
        }

        fn double_click(&mut self, scene: &WallScene) -> TeleportUpdate {
            self.step(ScriptedInput { toggle: true, confirm: false }, scene);
            self.step(ScriptedInput { toggle: true, confirm: false }, scene)
        }
    }

    #[test]
    fn test_double_click_starts_aiming_and_drawing() {
        let mut harness = Harness::new();
        let scene = WallScene::empty();

        let update = harness.double_click(&scene);

        assert_eq!(update.transition, Some(ActivationState::Aiming));
        assert!(harness.system.is_aiming());
        assert!(harness.renderer.drawing);
        assert_eq!(harness.renderer.points.len(), 51);
        assert_eq!(scene.queries.get(), 50);
    }

    #[test]
    fn test_idle_does_no_sampling() {
        let mut harness = Harness::new();
        let scene = WallScene::hitting(vec3(0.0, 0.0, 1.0));

        harness.step(ScriptedInput { toggle: false, confirm: true }, &scene);

        assert_eq!(scene.queries.get(), 0);
        assert_eq!(harness.renderer.set_points_calls, 0);
        assert!(harness.player.position.is_none());
    }

    #[test]
    fn test_confirm_relocates_and_stays_aiming() {
        let mut harness = Harness::new();
        let scene = WallScene::hitting(vec3(3.0, 0.0, 4.0));
        harness.double_click(&scene);
        assert!(harness.marker.visible);

        let update = harness.step(ScriptedInput { toggle: false, confirm: true }, &scene);

        assert_eq!(update.relocated_to, Some(vec3(3.0, 0.5, 4.0)));
        assert_eq!(harness.player.position, Some(vec3(3.0, 0.5, 4.0)));
        assert_eq!(harness.marker.position, Some(vec3(3.0, 0.0, 4.0)));
        assert!(harness.system.is_aiming());
    }

    #[test]
    fn test_confirm_without_landing_point_does_nothing() {
        let mut harness = Harness::new();
        let scene = WallScene::empty();
        harness.double_click(&scene);

        let update = harness.step(ScriptedInput { toggle: false, confirm: true }, &scene);

        assert_eq!(update.relocated_to, None);
        assert!(harness.player.position.is_none());
        assert!(!harness.marker.visible);
    }

    #[test]
    fn test_second_double_click_stops_aiming_and_hides_marker() {
        let mut harness = Harness::new();
        let scene = WallScene::hitting(vec3(0.0, 0.0, 2.0));
        harness.double_click(&scene);
        assert!(harness.marker.visible);

        // let the earlier click window lapse
        for _ in 0..60 {
            harness.step(ScriptedInput::default(), &scene);
        }
        let update = harness.double_click(&scene);

        assert_eq!(update.transition, Some(ActivationState::Idle));
        assert!(!harness.system.is_aiming());
        assert!(!harness.renderer.drawing);
        assert!(!harness.marker.visible);
        assert!(!harness.system.trajectory().is_valid());
    }

    #[test]
    fn test_disabled_system_ignores_input() {
        let mut system = TeleportSystem::new(TeleportConfig {
            enabled: false,
            ..Default::default()
        });
        let mut renderer = RecordingRenderer::default();
        let mut marker = RecordingMarker::default();
        let mut effects = EffectQueue::new();
        let scene = WallScene::hitting(vec3(0.0, 0.0, 1.0));

        for frame in 1..=4u64 {
            let time = Time::new(Duration::from_millis(10), Duration::from_millis(10 * frame));
            let mut sinks = TeleportSinks {
                renderer: &mut renderer,
                marker: &mut marker,
                relocation: &mut effects,
            };
            let input = ScriptedInput { toggle: true, confirm: true };
            system.update(&time, &input, &FixedPose, &scene, &mut sinks);
        }

        assert!(!system.is_aiming());
        assert_eq!(scene.queries.get(), 0);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_initialize_hides_arc_and_marker() {
        let system = TeleportSystem::with_default_config();
        let mut renderer = RecordingRenderer {
            drawing: true,
            ..Default::default()
        };
        let mut marker = RecordingMarker {
            visible: true,
            ..Default::default()
        };
        let mut player = Player::default();

        system.initialize(&mut TeleportSinks {
            renderer: &mut renderer,
            marker: &mut marker,
            relocation: &mut player,
        });

        assert!(!renderer.drawing);
        assert!(!marker.visible);
        assert_eq!(renderer.set_points_calls, 0);
        assert!(player.position.is_none());
    }

    #[test]
    fn test_disabling_while_aiming_returns_to_idle() {
        let mut harness = Harness::new();
        let scene = WallScene::hitting(vec3(0.0, 0.0, 2.0));
        harness.double_click(&scene);
        assert!(harness.marker.visible);
        assert!(harness.renderer.drawing);

        harness.system.set_enabled(
            false,
            &mut TeleportSinks {
                renderer: &mut harness.renderer,
                marker: &mut harness.marker,
                relocation: &mut harness.player,
            },
        );

        assert!(!harness.system.is_aiming());
        assert!(!harness.system.get_config().enabled);
        assert!(!harness.renderer.drawing);
        assert!(!harness.marker.visible);
        assert!(!harness.system.trajectory().is_valid());

        let queries = scene.queries.get();
        harness.step(ScriptedInput { toggle: true, confirm: true }, &scene);
        assert_eq!(scene.queries.get(), queries);
        assert!(harness.player.position.is_none());
    }

    #[test]
    fn test_reenabling_treats_held_button_as_new_press() {
        let mut system = TeleportSystem::with_default_config();
        let mut renderer = RecordingRenderer::default();
        let mut marker = RecordingMarker::default();
        let mut effects = EffectQueue::new();
        let scene = WallScene::empty();

        let mut held = InputContext::default();
        held.left_hand.b_value = 1.0;
        let released = InputContext::default();

        let mut run = |system: &mut TeleportSystem, frame: u32, context: &InputContext| {
            let mut sinks = TeleportSinks {
                renderer: &mut renderer,
                marker: &mut marker,
                relocation: &mut effects,
            };
            system.update_from_input_context(&Time::at_frame(frame, 72.0), context, &scene, &mut sinks);
        };

        run(&mut system, 0, &held);

        let mut idle_renderer = RecordingRenderer::default();
        let mut idle_marker = RecordingMarker::default();
        let mut idle_player = Player::default();
        for enabled in [false, true] {
            system.set_enabled(
                enabled,
                &mut TeleportSinks {
                    renderer: &mut idle_renderer,
                    marker: &mut idle_marker,
                    relocation: &mut idle_player,
                },
            );
        }

        // still held: counts as the first click of a fresh double-click
        run(&mut system, 1, &held);
        run(&mut system, 2, &released);
        assert!(!system.is_aiming());
        run(&mut system, 3, &held);

        assert!(system.is_aiming());
    }

    #[test]
    fn test_update_from_input_context_uses_configured_buttons() {
        let mut system = TeleportSystem::with_default_config();
        let mut renderer = RecordingRenderer::default();
        let mut marker = RecordingMarker::default();
        let mut effects = EffectQueue::new();
        let scene = WallScene::hitting(vec3(0.0, 0.0, 1.0));

        let mut pressed = InputContext::default();
        pressed.left_hand.b_value = 1.0;
        let released = InputContext::default();
        let mut confirm = InputContext::default();
        confirm.left_hand.trigger_value = 1.0;

        let script = [&pressed, &released, &pressed, &released, &confirm];
        for (frame, context) in script.iter().enumerate() {
            let time = Time::at_frame(frame as u32, 72.0);
            let mut sinks = TeleportSinks {
                renderer: &mut renderer,
                marker: &mut marker,
                relocation: &mut effects,
            };
            system.update_from_input_context(&time, context, &scene, &mut sinks);
        }

        assert!(system.is_aiming());
        assert_eq!(
            effects.drain(),
            vec![Effect::SetPlayerPosition {
                position: vec3(0.0, 0.5, 1.0),
                is_teleport: true,
            }]
        );
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(TeleportConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_config_validation_errors() {
        let bad_bounds = TeleportConfig {
            min_reach: 8.0,
            max_reach: 3.0,
            ..Default::default()
        };
        assert!(matches!(
            bad_bounds.validate(),
            Err(TeleportConfigError::ReachBounds { .. })
        ));

        let bad_reach = TeleportConfig {
            initial_reach: 9.0,
            ..Default::default()
        };
        assert!(matches!(
            bad_reach.validate(),
            Err(TeleportConfigError::InitialReach { .. })
        ));

        let no_segments = TeleportConfig {
            segment_count: 0,
            ..Default::default()
        };
        assert_eq!(no_segments.validate(), Err(TeleportConfigError::ZeroSegments));

        let nan_drop = TeleportConfig {
            drop_height: f32::NAN,
            ..Default::default()
        };
        let err = nan_drop.validate().unwrap_err();
        assert!(err.to_string().contains("drop_height"));

        let negative_window = TeleportConfig {
            double_click_window_secs: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            negative_window.validate(),
            Err(TeleportConfigError::DoubleClickWindow { .. })
        ));
        assert_eq!(
            negative_window.activation_config().double_click_window,
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_config_deserializes_partial_json() {
        let config =
            TeleportConfig::from_json_str(r#"{ "segment_count": 20, "hand": "Right" }"#).unwrap();

        assert_eq!(config.segment_count, 20);
        assert_eq!(config.hand, Handedness::Right);
        assert_eq!(config.max_reach, 7.5);
        assert_eq!(config.activation_config().double_click_window, Duration::from_millis(500));
    }
}
