//! # Host Runtime
//!
//! The poll loop that ties everything together: script actions become
//! switch states on the simulated keypad, the clock moves one poll step,
//! and the composer samples the keypad exactly as firmware would.

use std::collections::VecDeque;

use compose_core::{
    Composer, ComposerConfig, ComposerOutcome, ComposerSnapshot, ConfigError, OutgoingMessage,
    SendReport,
};
use console_grid::GridConsole;
use hal::{KeypadTranslator, TimerDevice};
use input_types::KeypadKey;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::key_script::{KeyScript, KeyScriptError, ScriptedInput};
use crate::sim::{SimClock, SimKeypad};
use crate::transport::{LoopbackTransport, SentMessage, Transport};

/// Default poll interval in milliseconds
pub const DEFAULT_POLL_MS: u64 = 10;

/// How long a scripted tap keeps its key down
pub const DEFAULT_PRESS_MS: u64 = 50;

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Invalid composer configuration: {0}")]
    Config(ConfigError),

    #[error("Script error: {0}")]
    Script(#[from] KeyScriptError),

    #[error("Poll interval must be greater than zero")]
    ZeroPollInterval,
}

/// Host runtime configuration
#[derive(Debug, Clone)]
pub struct HostRuntimeConfig {
    /// Composer settings
    pub composer: ComposerConfig,
    /// Optional keypad script
    pub script: Option<String>,
    /// Clock advance per step
    pub poll_ms: u64,
    /// Key-down time of a scripted tap
    pub press_ms: u64,
    /// Maximum steps to run (0 = unlimited)
    pub max_steps: usize,
}

impl Default for HostRuntimeConfig {
    fn default() -> Self {
        Self {
            composer: ComposerConfig::default(),
            script: None,
            poll_ms: DEFAULT_POLL_MS,
            press_ms: DEFAULT_PRESS_MS,
            max_steps: 0,
        }
    }
}

/// Keypad state held for a stretch of time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Phase {
    key: Option<KeypadKey>,
    remaining_ms: u64,
}

/// Host runtime
pub struct HostRuntime<T: Transport = LoopbackTransport> {
    config: HostRuntimeConfig,
    composer: Composer<GridConsole>,
    keypad: KeypadTranslator<SimKeypad>,
    clock: SimClock,
    script: KeyScript,
    phases: VecDeque<Phase>,
    transport: T,
    sent: Vec<SentMessage>,
    failed_sends: usize,
    steps: usize,
}

impl HostRuntime<LoopbackTransport> {
    /// Creates a runtime that delivers through a [`LoopbackTransport`]
    pub fn new(config: HostRuntimeConfig) -> Result<Self, HostError> {
        Self::with_transport(config, LoopbackTransport::new())
    }
}

impl<T: Transport> HostRuntime<T> {
    /// Creates a runtime with the given transport
    pub fn with_transport(config: HostRuntimeConfig, transport: T) -> Result<Self, HostError> {
        if config.poll_ms == 0 {
            return Err(HostError::ZeroPollInterval);
        }

        let geometry = config.composer.geometry;
        let display = GridConsole::new(geometry.chars_per_line, geometry.visible_lines);
        let composer = Composer::new(config.composer, display).map_err(HostError::Config)?;

        let script = match &config.script {
            Some(text) => KeyScript::from_text(text, config.composer.timing.multitap_ms)?,
            None => KeyScript::new(),
        };

        let mut runtime = Self {
            config,
            composer,
            keypad: KeypadTranslator::new(SimKeypad::new()),
            clock: SimClock::new(),
            script,
            phases: VecDeque::new(),
            transport,
            sent: Vec::new(),
            failed_sends: 0,
            steps: 0,
        };

        let now = runtime.clock.now_ms();
        runtime.composer.start(now);
        info!(
            capacity = runtime.config.composer.capacity,
            actions = runtime.script.remaining(),
            "host runtime ready"
        );

        Ok(runtime)
    }

    /// Runs until the script is exhausted or the step limit is hit
    pub fn run(&mut self) {
        while !self.is_finished() {
            if self.config.max_steps > 0 && self.steps >= self.config.max_steps {
                warn!(steps = self.steps, "step limit reached before script end");
                break;
            }
            self.step();
        }

        info!(
            steps = self.steps,
            sent = self.sent.len(),
            failed = self.failed_sends,
            "run finished"
        );
    }

    /// Executes one poll step
    ///
    /// 1. Apply the current script phase to the keypad
    /// 2. Advance the clock by `poll_ms`
    /// 3. Let the composer sample the keypad
    /// 4. Deliver a requested message
    pub fn step(&mut self) -> ComposerOutcome {
        let poll_ms = self.config.poll_ms;

        let active = self.next_phase();
        match active.and_then(|phase| phase.key) {
            Some(key) => self.keypad.device_mut().press(key),
            None => self.keypad.device_mut().release(),
        }

        let now = self.clock.advance(poll_ms);
        let key_down = self.keypad.key_down();
        let outcome = self.composer.poll(key_down, now);

        if active.is_some() {
            if let Some(phase) = self.phases.front_mut() {
                phase.remaining_ms = phase.remaining_ms.saturating_sub(poll_ms);
            }
        }

        if let ComposerOutcome::RequestSend(message) = &outcome {
            self.deliver(message, now);
        }

        self.steps += 1;
        outcome
    }

    /// Returns the phase to apply this step, pulling script actions as needed
    fn next_phase(&mut self) -> Option<Phase> {
        loop {
            if let Some(phase) = self.phases.front().copied() {
                if phase.remaining_ms > 0 {
                    return Some(phase);
                }
                self.phases.pop_front();
                continue;
            }

            let input = self.script.next_input()?;
            debug!(?input, "script action");
            let phases = self.expand(input);
            self.phases.extend(phases);
        }
    }

    /// Turns a script action into keypad phases
    ///
    /// Taps and holds end with one poll of released keys so the composer
    /// sees the release.
    fn expand(&self, input: ScriptedInput) -> Vec<Phase> {
        let release = Phase {
            key: None,
            remaining_ms: self.config.poll_ms,
        };
        match input {
            ScriptedInput::Tap(key) => vec![
                Phase {
                    key: Some(key),
                    remaining_ms: self.config.press_ms.max(self.config.poll_ms),
                },
                release,
            ],
            ScriptedInput::Hold(key, millis) => vec![
                Phase {
                    key: Some(key),
                    remaining_ms: millis.max(self.config.poll_ms),
                },
                release,
            ],
            ScriptedInput::Wait(millis) => vec![Phase {
                key: None,
                remaining_ms: millis,
            }],
        }
    }

    fn deliver(&mut self, message: &OutgoingMessage, now: u64) {
        let report = match self.transport.send(message) {
            Ok(id) => {
                info!(%id, len = message.body.len(), "message delivered");
                self.sent.push(SentMessage {
                    id,
                    body: message.body.clone(),
                });
                SendReport::Delivered
            }
            Err(err) => {
                warn!(error = %err, "message delivery failed");
                self.failed_sends += 1;
                SendReport::Failed
            }
        };
        self.composer.complete_send(report, now);
    }

    /// Returns true once every script action has played out
    pub fn is_finished(&self) -> bool {
        !self.script.has_more() && self.phases.iter().all(|phase| phase.remaining_ms == 0)
    }

    /// Returns the current frame of the display
    pub fn frame(&self) -> String {
        self.composer.display().render()
    }

    /// Returns the composer state snapshot
    pub fn snapshot(&self) -> ComposerSnapshot {
        self.composer.snapshot()
    }

    pub fn composer(&self) -> &Composer<GridConsole> {
        &self.composer
    }

    /// Messages the transport accepted, oldest first
    pub fn sent(&self) -> &[SentMessage] {
        &self.sent
    }

    pub fn failed_sends(&self) -> usize {
        self.failed_sends
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Current simulated time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.clock.now()
    }

    pub fn step_count(&self) -> usize {
        self.steps
    }
}
