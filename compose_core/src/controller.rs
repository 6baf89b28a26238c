//! Composer state machine
//!
//! Owns the buffer, decoder, viewport and hold tracker and drives a
//! [`GridDisplay`] in response to key events and clock ticks. Nothing here
//! performs I/O beyond drawing: sending is requested from the host through
//! [`ComposerOutcome::RequestSend`] and confirmed with
//! [`Composer::complete_send`].

use alloc::format;
use alloc::string::String;

use hal::{CellPos, CursorShape, GridDisplay, Ink};
use input_types::{KeyEvent, KeypadKey};
use tracing::{debug, info, trace, warn};

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use crate::buffer::TextBuffer;
use crate::config::{ComposerConfig, ConfigError};
use crate::decoder::InputDecoder;
use crate::hold::HoldTracker;
use crate::mode::CaseMode;
use crate::snapshot::ComposerSnapshot;
use crate::viewport::{Direction, PageFlip, ViewportModel};

/// Help table shown by a short `#`
pub const HELP_LINES: [&str; 4] = [
    "0: Clear  2: Up",
    "5: Send   4: Left",
    "*: Mode   6: Right",
    "#: Del    8: Down",
];

const SENDING_NOTICE: &str = "Sending...";
const SENT_NOTICE: &str = "SMS sent.";
const FAILED_NOTICE: &str = "Not sent";

/// Multi-tap state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub enum ComposerState {
    /// No character awaiting a repeat tap
    Idle,
    /// The last character can still be cycled
    Cycling,
}

/// What the text area currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Message,
    Help,
    /// Waiting for the host to report a send result
    Sending,
    /// Send result on screen until `until`
    Notice { until: u64 },
}

/// A message handed to the host for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub body: String,
}

/// Delivery result reported back by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendReport {
    Delivered,
    Failed,
}

/// Result of feeding an event to the composer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerOutcome {
    /// Nothing changed
    Continue,
    /// State or screen changed
    Changed,
    /// Host should deliver the message and call `complete_send`
    RequestSend(OutgoingMessage),
}

impl ComposerOutcome {
    /// Combines two outcomes of the same poll, keeping the most significant
    pub fn merge(self, other: ComposerOutcome) -> ComposerOutcome {
        match (self, other) {
            (send @ ComposerOutcome::RequestSend(_), _)
            | (_, send @ ComposerOutcome::RequestSend(_)) => send,
            (ComposerOutcome::Changed, _) | (_, ComposerOutcome::Changed) => {
                ComposerOutcome::Changed
            }
            _ => ComposerOutcome::Continue,
        }
    }
}

/// Text composition engine bound to a display
pub struct Composer<D: GridDisplay> {
    config: ComposerConfig,
    buffer: TextBuffer,
    decoder: InputDecoder,
    viewport: ViewportModel,
    hold: HoldTracker,
    case_mode: CaseMode,
    state: ComposerState,
    screen: Screen,
    cursor_enabled: bool,
    cursor_visible: bool,
    last_blink_ms: u64,
    last_move_ms: Option<u64>,
    last_delete_ms: Option<u64>,
    display: D,
}

impl<D: GridDisplay> Composer<D> {
    /// Creates a composer with an empty message
    pub fn new(config: ComposerConfig, display: D) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            buffer: TextBuffer::with_capacity(config.capacity),
            decoder: InputDecoder::new(config.timing.multitap_ms),
            viewport: ViewportModel::new(config.geometry),
            hold: HoldTracker::new(config.timing.long_press_ms),
            case_mode: CaseMode::default(),
            state: ComposerState::Idle,
            screen: Screen::Message,
            cursor_enabled: true,
            cursor_visible: false,
            last_blink_ms: 0,
            last_move_ms: None,
            last_delete_ms: None,
            display,
        })
    }

    /// Draws the initial screen
    pub fn start(&mut self, now: u64) {
        self.redraw_text();
        self.display.set_cursor(self.cursor_cell());
        self.show_cursor(now);
        self.draw_header();
        self.display.flush();
    }

    /// Feeds one keypad sample and advances the clock
    pub fn poll(&mut self, key_down: Option<KeypadKey>, now: u64) -> ComposerOutcome {
        let outcome = match self.hold.sample(key_down, now) {
            Some(event) => self.on_key_event(event, now),
            None => ComposerOutcome::Continue,
        };
        outcome.merge(self.on_tick(now))
    }

    /// Handles a classified key event
    pub fn on_key_event(&mut self, event: KeyEvent, now: u64) -> ComposerOutcome {
        let outcome = match self.screen {
            Screen::Message => self.handle_message_key(event, now),
            Screen::Help => self.handle_help_key(event, now),
            Screen::Sending | Screen::Notice { .. } => {
                debug!(%event, "key ignored while a send is on screen");
                return ComposerOutcome::Continue;
            }
        };

        if outcome != ComposerOutcome::Continue {
            debug!(%event, cursor = self.buffer.cursor(), len = self.buffer.len(), "handled key");
        }
        self.draw_header();
        self.display.flush();
        outcome
    }

    /// Advances timers: multi-tap expiry, cursor blink and notice timeout
    pub fn on_tick(&mut self, now: u64) -> ComposerOutcome {
        match self.screen {
            Screen::Message => {}
            Screen::Notice { until } if now >= until => {
                self.screen = Screen::Message;
                self.redraw_text();
                self.display.set_cursor(self.cursor_cell());
                self.cursor_enabled = true;
                self.show_cursor(now);
                self.draw_header();
                self.display.flush();
                return ComposerOutcome::Changed;
            }
            _ => return ComposerOutcome::Continue,
        }

        let mut outcome = ComposerOutcome::Continue;

        if self.state == ComposerState::Cycling && !self.decoder.is_pending(now) {
            self.state = ComposerState::Idle;
            self.cursor_enabled = true;
            outcome = ComposerOutcome::Changed;
        }

        if self.cursor_enabled
            && now.saturating_sub(self.last_blink_ms) >= self.config.timing.blink_ms
        {
            let visible = !self.cursor_visible;
            self.draw_cursor(visible);
            self.last_blink_ms = now;
            self.display.flush();
            trace!(visible, "cursor blink");
            outcome = ComposerOutcome::Changed;
        }

        outcome
    }

    /// Reports the result of a send requested through `RequestSend`
    pub fn complete_send(&mut self, report: SendReport, now: u64) -> ComposerOutcome {
        if self.screen != Screen::Sending {
            warn!(?report, "send result without a pending send");
            return ComposerOutcome::Continue;
        }

        let notice_row = 1usize.min(self.viewport.visible_lines() - 1);
        match report {
            SendReport::Delivered => {
                info!(len = self.buffer.len(), "message sent");
                self.buffer.clear();
                self.viewport.reset();
                self.decoder.reset();
                self.state = ComposerState::Idle;
                self.draw_line(notice_row, SENT_NOTICE);
            }
            SendReport::Failed => {
                warn!(len = self.buffer.len(), "message not sent");
                self.draw_line(notice_row, FAILED_NOTICE);
            }
        }

        self.screen = Screen::Notice {
            until: now + self.config.timing.notice_ms,
        };
        self.draw_header();
        self.display.flush();
        ComposerOutcome::Changed
    }

    pub fn rendered_message_length(&self) -> usize {
        self.buffer.len()
    }

    pub fn remaining_capacity(&self) -> usize {
        self.buffer.remaining()
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn viewport(&self) -> &ViewportModel {
        &self.viewport
    }

    pub fn case_mode(&self) -> CaseMode {
        self.case_mode
    }

    pub fn state(&self) -> ComposerState {
        self.state
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_help_visible(&self) -> bool {
        self.screen == Screen::Help
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn cursor_enabled(&self) -> bool {
        self.cursor_enabled
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn into_display(self) -> D {
        self.display
    }

    /// Get a complete snapshot of composer state (for parity testing)
    pub fn snapshot(&self) -> ComposerSnapshot {
        ComposerSnapshot {
            text: self.buffer.as_string(),
            cursor: self.buffer.cursor(),
            length: self.buffer.len(),
            scroll_offset_lines: self.viewport.scroll_offset_lines(),
            case_mode: self.case_mode,
            state: self.state,
            help_visible: self.is_help_visible(),
            cursor_visible: self.cursor_visible,
            cursor_enabled: self.cursor_enabled,
        }
    }

    // Event handlers

    fn handle_message_key(&mut self, event: KeyEvent, now: u64) -> ComposerOutcome {
        if event.held {
            return match event.key {
                KeypadKey::Num2 => self.navigate(Direction::Up, now),
                KeypadKey::Num4 => self.navigate(Direction::Left, now),
                KeypadKey::Num6 => self.navigate(Direction::Right, now),
                KeypadKey::Num8 => self.navigate(Direction::Down, now),
                KeypadKey::Hash => self.delete(now),
                _ => ComposerOutcome::Continue,
            };
        }

        match event.key {
            KeypadKey::Star => self.switch_mode(),
            KeypadKey::Hash => self.show_help(),
            key => self.enter_char(key, now),
        }
    }

    fn handle_help_key(&mut self, event: KeyEvent, now: u64) -> ComposerOutcome {
        if event.held {
            return ComposerOutcome::Continue;
        }

        match event.key {
            KeypadKey::Hash => self.hide_help(now),
            KeypadKey::Star => self.switch_mode(),
            KeypadKey::Num0 => self.clear_message(now),
            KeypadKey::Num5 => self.request_send(),
            _ => ComposerOutcome::Continue,
        }
    }

    fn enter_char(&mut self, key: KeypadKey, now: u64) -> ComposerOutcome {
        if !self.decoder.is_cycle(key, now) && self.buffer.is_full() {
            debug!(%key, capacity = self.buffer.capacity(), "buffer full, tap ignored");
            return ComposerOutcome::Continue;
        }

        let Some(decoded) = self
            .decoder
            .decode(key, now, self.case_mode, &self.buffer)
        else {
            return ComposerOutcome::Continue;
        };

        self.draw_cursor(false);
        self.cursor_enabled = false;
        self.state = ComposerState::Cycling;

        if decoded.is_cycle {
            self.buffer.retreat_cursor();
        }
        let index = self.buffer.cursor();
        self.buffer.set_at_cursor(decoded.ch);
        self.buffer.advance_cursor();

        match self.viewport.cell_of(index) {
            Some(cell) => self.display.draw_char(cell, decoded.ch),
            // The cycled character sits on the previous page after a flip;
            // show the candidate one step left of the draw cursor instead
            None if decoded.is_cycle => {
                let cell = self
                    .viewport
                    .target_cell(self.display.cursor(), Direction::Left);
                self.display.draw_char(cell, decoded.ch);
            }
            None => {}
        }

        if self.viewport.follow(self.buffer.cursor()) != PageFlip::Stay {
            debug!(
                offset = self.viewport.scroll_offset_lines(),
                "page flip while typing"
            );
            self.redraw_text();
            self.display.set_cursor(CellPos::origin());
        } else {
            self.display.set_cursor(self.cursor_cell());
        }

        ComposerOutcome::Changed
    }

    fn navigate(&mut self, direction: Direction, now: u64) -> ComposerOutcome {
        // Any navigation event ends a multi-tap cycle, even one that moves nothing
        self.decoder.reset();
        self.state = ComposerState::Idle;
        self.cursor_enabled = true;

        let cursor = self.buffer.cursor();
        let Some(target) = self
            .viewport
            .nav_target(direction, cursor, self.buffer.len())
        else {
            self.show_cursor(now);
            return ComposerOutcome::Changed;
        };

        if let Some(last) = self.last_move_ms {
            if now.saturating_sub(last) <= self.config.timing.move_repeat_ms {
                return ComposerOutcome::Continue;
            }
        }

        self.draw_cursor(false);

        let from = self.display.cursor();
        self.buffer.set_cursor(target);

        match self.viewport.follow(target) {
            PageFlip::Stay => {
                let cell = self.viewport.target_cell(from, direction);
                debug_assert_eq!(Some(cell), self.viewport.cell_of(target));
                self.display.set_cursor(cell);
            }
            flip => {
                debug!(?flip, offset = self.viewport.scroll_offset_lines(), "page flip");
                self.redraw_text();
                self.display.set_cursor(self.cursor_cell());
            }
        }

        self.show_cursor(now);
        self.last_move_ms = Some(now);
        ComposerOutcome::Changed
    }

    fn delete(&mut self, now: u64) -> ComposerOutcome {
        if let Some(last) = self.last_delete_ms {
            if now.saturating_sub(last) <= self.config.timing.delete_repeat_ms {
                return ComposerOutcome::Continue;
            }
        }

        self.decoder.reset();
        self.state = ComposerState::Idle;
        self.last_delete_ms = Some(now);

        let cursor = self.buffer.cursor();
        if cursor == 0 {
            return ComposerOutcome::Continue;
        }

        self.draw_cursor(false);

        // Tail delete empties the last slot; inner delete shifts the rest left
        if cursor == self.buffer.len() {
            self.buffer.retreat_cursor();
            self.buffer.truncate_at_cursor();
        } else {
            self.buffer.remove_at(cursor);
        }

        let flip = self.viewport.follow(self.buffer.cursor());
        if flip != PageFlip::Stay {
            debug!(?flip, offset = self.viewport.scroll_offset_lines(), "page flip");
        }
        self.redraw_text();
        self.display.set_cursor(self.cursor_cell());

        self.cursor_enabled = true;
        self.show_cursor(now);
        ComposerOutcome::Changed
    }

    fn switch_mode(&mut self) -> ComposerOutcome {
        self.case_mode = self.case_mode.next();
        debug!(mode = self.case_mode.as_str(), "case mode");
        ComposerOutcome::Changed
    }

    fn show_help(&mut self) -> ComposerOutcome {
        self.decoder.reset();
        self.state = ComposerState::Idle;
        self.draw_cursor(false);
        self.cursor_enabled = false;

        self.screen = Screen::Help;
        self.display
            .fill_region(self.viewport.text_region(), Ink::Off);
        self.display.draw_overlay(&HELP_LINES);
        ComposerOutcome::Changed
    }

    fn hide_help(&mut self, now: u64) -> ComposerOutcome {
        self.screen = Screen::Message;
        self.redraw_text();
        self.display.set_cursor(self.cursor_cell());
        self.cursor_enabled = true;
        self.show_cursor(now);
        ComposerOutcome::Changed
    }

    fn clear_message(&mut self, now: u64) -> ComposerOutcome {
        debug!(len = self.buffer.len(), "clear message");
        self.buffer.clear();
        self.viewport.reset();
        self.decoder.reset();
        self.state = ComposerState::Idle;
        self.hide_help(now)
    }

    fn request_send(&mut self) -> ComposerOutcome {
        if self.buffer.is_empty() {
            debug!("send ignored, message is empty");
            return ComposerOutcome::Continue;
        }

        info!(len = self.buffer.len(), "sending message");
        self.screen = Screen::Sending;
        self.display
            .fill_region(self.viewport.text_region(), Ink::Off);
        self.draw_line(0, SENDING_NOTICE);

        ComposerOutcome::RequestSend(OutgoingMessage {
            body: self.buffer.as_string(),
        })
    }

    // Drawing helpers

    fn cursor_cell(&self) -> CellPos {
        self.viewport
            .cell_of(self.buffer.cursor())
            .unwrap_or(CellPos::origin())
    }

    fn show_cursor(&mut self, now: u64) {
        self.draw_cursor(true);
        self.last_blink_ms = now;
    }

    fn draw_cursor(&mut self, visible: bool) {
        let shape = if self.buffer.char_at_cursor().is_some() {
            CursorShape::Outline
        } else {
            CursorShape::Block
        };
        let ink = if visible { Ink::On } else { Ink::Off };
        let cell = self.display.cursor();
        self.display.draw_cursor(cell, shape, ink);
        self.cursor_visible = visible;
    }

    /// Clears the text area and draws the visible page
    fn redraw_text(&mut self) {
        self.display
            .fill_region(self.viewport.text_region(), Ink::Off);
        for index in self.viewport.visible_range(self.buffer.len()) {
            if let (Some(cell), Some(ch)) =
                (self.viewport.cell_of(index), self.buffer.char_at(index))
            {
                self.display.draw_char(cell, ch);
            }
        }
    }

    fn draw_line(&mut self, row: usize, text: &str) {
        for (col, ch) in text.chars().take(self.viewport.chars_per_line()).enumerate() {
            self.display.draw_char(CellPos::new(row, col), ch);
        }
    }

    fn draw_header(&mut self) {
        let line = format!("Line {}", self.viewport.row_of(self.buffer.cursor()) + 1);
        let stats = format!("{}/{}", self.buffer.remaining(), self.viewport.page());
        self.display
            .draw_status(self.case_mode.label(), &line, &stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Geometry;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    /// Display that only remembers the draw cursor and the status line
    #[derive(Default)]
    struct NullDisplay {
        cursor: CellPos,
        status: Vec<String>,
        flushes: usize,
    }

    impl GridDisplay for NullDisplay {
        fn draw_char(&mut self, _cell: CellPos, _ch: char) {}
        fn fill_region(&mut self, _region: hal::CellRegion, _ink: Ink) {}
        fn draw_cursor(&mut self, _cell: CellPos, _shape: CursorShape, _ink: Ink) {}
        fn set_cursor(&mut self, cell: CellPos) {
            self.cursor = cell;
        }
        fn cursor(&self) -> CellPos {
            self.cursor
        }
        fn draw_status(&mut self, left: &str, center: &str, right: &str) {
            self.status.clear();
            self.status.push(left.to_string());
            self.status.push(center.to_string());
            self.status.push(right.to_string());
        }
        fn draw_overlay(&mut self, _lines: &[&str]) {}
        fn flush(&mut self) {
            self.flushes += 1;
        }
    }

    fn composer() -> Composer<NullDisplay> {
        let config = ComposerConfig {
            capacity: 40,
            geometry: Geometry {
                chars_per_line: 12,
                visible_lines: 3,
            },
            ..ComposerConfig::default()
        };
        let mut composer = Composer::new(config, NullDisplay::default()).unwrap();
        composer.start(0);
        composer
    }

    fn tap(composer: &mut Composer<NullDisplay>, key: KeypadKey, now: u64) -> ComposerOutcome {
        composer.on_key_event(KeyEvent::short(key), now)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ComposerConfig {
            capacity: 0,
            ..ComposerConfig::default()
        };
        assert!(matches!(
            Composer::new(config, NullDisplay::default()),
            Err(ConfigError::ZeroCapacity)
        ));
    }

    #[test]
    fn test_outcome_merge() {
        let send = ComposerOutcome::RequestSend(OutgoingMessage {
            body: "hi".to_string(),
        });
        assert_eq!(
            ComposerOutcome::Changed.merge(send.clone()),
            send.clone()
        );
        assert_eq!(send.clone().merge(ComposerOutcome::Continue), send);
        assert_eq!(
            ComposerOutcome::Continue.merge(ComposerOutcome::Changed),
            ComposerOutcome::Changed
        );
        assert_eq!(
            ComposerOutcome::Continue.merge(ComposerOutcome::Continue),
            ComposerOutcome::Continue
        );
    }

    #[test]
    fn test_header_after_typing() {
        let mut composer = composer();
        tap(&mut composer, KeypadKey::Num2, 1_000);
        let status = &composer.display().status;
        assert_eq!(status[0], "abc");
        assert_eq!(status[1], "Line 1");
        assert_eq!(status[2], "39/1");
    }

    #[test]
    fn test_typing_disables_cursor_until_window_expires() {
        let mut composer = composer();
        tap(&mut composer, KeypadKey::Num2, 1_000);
        assert_eq!(composer.state(), ComposerState::Cycling);
        assert!(!composer.cursor_enabled());

        composer.on_tick(1_499);
        assert_eq!(composer.state(), ComposerState::Cycling);

        composer.on_tick(1_500);
        assert_eq!(composer.state(), ComposerState::Idle);
        assert!(composer.cursor_enabled());
        assert!(composer.cursor_visible());
    }

    #[test]
    fn test_blink_toggles_on_interval() {
        let mut composer = composer();
        assert!(composer.cursor_visible());

        assert_eq!(composer.on_tick(499), ComposerOutcome::Continue);
        assert!(composer.cursor_visible());

        assert_eq!(composer.on_tick(500), ComposerOutcome::Changed);
        assert!(!composer.cursor_visible());

        composer.on_tick(1_000);
        assert!(composer.cursor_visible());
    }

    #[test]
    fn test_mode_switch_keeps_buffer() {
        let mut composer = composer();
        tap(&mut composer, KeypadKey::Num2, 1_000);
        tap(&mut composer, KeypadKey::Star, 2_000);
        assert_eq!(composer.case_mode(), CaseMode::Upper);
        assert_eq!(composer.buffer().as_string(), "a");
        assert_eq!(composer.display().status[0], "ABC");
    }

    #[test]
    fn test_complete_send_without_request_is_ignored() {
        let mut composer = composer();
        assert_eq!(
            composer.complete_send(SendReport::Delivered, 0),
            ComposerOutcome::Continue
        );
    }

    #[test]
    fn test_every_handled_event_flushes() {
        let mut composer = composer();
        let before = composer.display().flushes;
        tap(&mut composer, KeypadKey::Num3, 1_000);
        assert_eq!(composer.display().flushes, before + 1);
    }
}
