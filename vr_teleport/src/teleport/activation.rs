use std::time::Duration;

use engine::scoped_log;

const LOG_SCOPE: &str = "teleport::activation";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActivationState {
    #[default]
    Idle,
    Aiming,
}

impl ActivationState {
    pub fn toggled(self) -> Self {
        match self {
            ActivationState::Idle => ActivationState::Aiming,
            ActivationState::Aiming => ActivationState::Idle,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActivationConfig {
    /// Longest gap between the two clicks of a double-click
    pub double_click_window: Duration,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        ActivationConfig {
            double_click_window: Duration::from_millis(500),
        }
    }
}

/// Toggles aiming on a double-click of the activation button.
///
/// `now` must be unscaled time so pausing or slow motion doesn't stretch the
/// double-click window.
#[derive(Clone, Debug)]
pub struct ActivationStateMachine {
    config: ActivationConfig,
    state: ActivationState,
    pending_click: bool,
    pending_click_timestamp: Duration,
}

impl ActivationStateMachine {
    pub fn new(config: ActivationConfig) -> Self {
        ActivationStateMachine {
            config,
            state: ActivationState::Idle,
            pending_click: false,
            pending_click_timestamp: Duration::ZERO,
        }
    }

    pub fn state(&self) -> ActivationState {
        self.state
    }

    pub fn is_aiming(&self) -> bool {
        self.state == ActivationState::Aiming
    }

    pub fn has_pending_click(&self) -> bool {
        self.pending_click
    }

    /// Process one frame. Returns the new state if this frame toggled it.
    ///
    /// A stale first click is forgotten before the button is looked at, so a
    /// press arriving after the window always starts a new double-click.
    pub fn update(&mut self, now: Duration, button_down: bool) -> Option<ActivationState> {
        self.expire_pending_click(now);

        if !button_down {
            return None;
        }

        if self.pending_click {
            self.pending_click = false;
            Some(self.toggle())
        } else {
            self.pending_click = true;
            self.pending_click_timestamp = now;
            None
        }
    }

    /// Flip between idle and aiming unconditionally.
    pub fn toggle(&mut self) -> ActivationState {
        self.state = self.state.toggled();
        scoped_log!(debug, LOG_SCOPE, state = ?self.state, "teleport mode toggled");
        self.state
    }

    fn expire_pending_click(&mut self, now: Duration) {
        if self.pending_click
            && now.saturating_sub(self.pending_click_timestamp) > self.config.double_click_window
        {
            self.pending_click = false;
        }
    }
}

impl Default for ActivationStateMachine {
    fn default() -> Self {
        Self::new(ActivationConfig::default())
    }
}
