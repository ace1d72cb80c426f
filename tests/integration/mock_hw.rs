//! Mock hardware for integration tests.
//!
//! Every mock keeps its observable state behind an `Rc`, so a test can
//! hand the mock to the controller by value and still inspect what the
//! controller did with it afterwards.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use bigredbutton::app::events::PressOutcome;
use bigredbutton::app::ports::{
    ByteStream, Clock, LinkPort, LinkStatus, OutcomeSink, PinPort, ReadStatus, StreamPort,
};
use bigredbutton::app::service::ButtonController;
use bigredbutton::config::ButtonConfig;
use bigredbutton::error::{LinkError, TransportError};
use embedded_hal::delay::DelayNs;

/// Sampling cadence the helpers drive the controller at.
pub const TICK_MS: u64 = 5;

/// Defaults with budgets short enough to keep failure tests readable.
pub fn test_config() -> ButtonConfig {
    ButtonConfig {
        link_timeout_ms: 1_000,
        link_poll_interval_ms: 100,
        request_timeout_ms: 500,
        ..ButtonConfig::default()
    }
}

// ── FakeClock ─────────────────────────────────────────────────

/// Manually driven clock. Delays advance time instantly.
#[derive(Clone, Default)]
pub struct FakeClock {
    now_us: Rc<Cell<u64>>,
}

#[allow(dead_code)]
impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now_us.set(self.now_us.get() + ms * 1_000);
    }
}

impl DelayNs for FakeClock {
    fn delay_ns(&mut self, ns: u32) {
        self.now_us.set(self.now_us.get() + (ns as u64).div_ceil(1_000));
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now_us.get() / 1_000
    }
}

// ── LevelPin ──────────────────────────────────────────────────

/// Button pin whose level the test sets directly.
pub struct LevelPin {
    pub level: bool,
    pub reads: u32,
}

impl LevelPin {
    pub fn idle(config: &ButtonConfig) -> Self {
        Self { level: !config.pressed_level(), reads: 0 }
    }
}

impl PinPort for LevelPin {
    fn read_pin(&mut self) -> bool {
        self.reads += 1;
        self.level
    }
}

// ── ScriptedLink ──────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct LinkScript {
    /// Status polls before a join comes up. `None` = never.
    pub polls_until_up: Option<u32>,
    pub reject_joins: bool,
    pub refuse_joins: bool,
    pub joins: u32,
    pub disconnects: u32,
    joining: bool,
    polls: u32,
    up: bool,
}

/// WiFi driver whose behaviour is set through a shared [`LinkScript`].
#[derive(Clone)]
pub struct ScriptedLink {
    pub script: Rc<RefCell<LinkScript>>,
}

#[allow(dead_code)]
impl ScriptedLink {
    pub fn up_after(polls: u32) -> Self {
        Self::with(LinkScript { polls_until_up: Some(polls), ..Default::default() })
    }

    pub fn never_up() -> Self {
        Self::with(LinkScript::default())
    }

    pub fn rejecting() -> Self {
        Self::with(LinkScript { reject_joins: true, ..Default::default() })
    }

    fn with(script: LinkScript) -> Self {
        Self { script: Rc::new(RefCell::new(script)) }
    }

    /// Drop an established association, as if the AP went away.
    pub fn drop_link(&self) {
        let mut s = self.script.borrow_mut();
        s.up = false;
        s.joining = false;
    }

    pub fn joins(&self) -> u32 {
        self.script.borrow().joins
    }

    pub fn disconnects(&self) -> u32 {
        self.script.borrow().disconnects
    }
}

impl LinkPort for ScriptedLink {
    fn join(&mut self, _ssid: &str, _passphrase: &str) -> Result<(), LinkError> {
        let mut s = self.script.borrow_mut();
        s.joins += 1;
        if s.refuse_joins {
            return Err(LinkError::Refused);
        }
        s.joining = true;
        s.polls = 0;
        s.up = false;
        Ok(())
    }

    fn status(&mut self) -> LinkStatus {
        let mut s = self.script.borrow_mut();
        if s.up {
            return LinkStatus::Up;
        }
        if !s.joining {
            return LinkStatus::Down;
        }
        s.polls += 1;
        if s.reject_joins {
            return LinkStatus::Rejected;
        }
        match s.polls_until_up {
            Some(n) if s.polls > n => {
                s.up = true;
                s.joining = false;
                LinkStatus::Up
            }
            _ => LinkStatus::Joining,
        }
    }

    fn disconnect(&mut self) {
        let mut s = self.script.borrow_mut();
        s.disconnects += 1;
        s.up = false;
        s.joining = false;
    }
}

// ── ScriptedTransport ─────────────────────────────────────────

/// One step of what the peer does when the client reads.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Reply {
    Bytes(&'static [u8]),
    /// Nothing arrives for the whole read timeout.
    Silence,
    Eof,
    Reset,
}

#[derive(Debug, Default)]
pub struct TransportLog {
    pub fail_open: bool,
    /// Returned by every `write` instead of accepting the bytes.
    pub fail_write: Option<Result<usize, TransportError>>,
    pub replies: Vec<Reply>,
    pub opens: u32,
    pub closes: u32,
    pub reads: u32,
    pub written: Vec<u8>,
    pub last_target: Option<(String, u16)>,
}

/// Byte-stream factory that replays the same [`Reply`] script on every open.
#[derive(Clone)]
pub struct ScriptedTransport {
    pub log: Rc<RefCell<TransportLog>>,
    clock: FakeClock,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn replying(clock: &FakeClock, replies: Vec<Reply>) -> Self {
        Self {
            log: Rc::new(RefCell::new(TransportLog { replies, ..Default::default() })),
            clock: clock.clone(),
        }
    }

    pub fn http(clock: &FakeClock, response: &'static [u8]) -> Self {
        Self::replying(clock, vec![Reply::Bytes(response)])
    }

    pub fn unreachable(clock: &FakeClock) -> Self {
        let t = Self::replying(clock, Vec::new());
        t.log.borrow_mut().fail_open = true;
        t
    }

    pub fn opens(&self) -> u32 {
        self.log.borrow().opens
    }

    pub fn closes(&self) -> u32 {
        self.log.borrow().closes
    }

    pub fn written(&self) -> Vec<u8> {
        self.log.borrow().written.clone()
    }
}

impl StreamPort for ScriptedTransport {
    type Stream = ScriptedStream;

    fn open(&mut self, host: &str, port: u16, _timeout_ms: u64) -> Result<ScriptedStream, TransportError> {
        let mut log = self.log.borrow_mut();
        log.last_target = Some((host.to_string(), port));
        if log.fail_open {
            return Err(TransportError::Connect);
        }
        log.opens += 1;
        Ok(ScriptedStream {
            replies: log.replies.iter().cloned().collect(),
            log: self.log.clone(),
            clock: self.clock.clone(),
            open: true,
        })
    }
}

pub struct ScriptedStream {
    replies: VecDeque<Reply>,
    log: Rc<RefCell<TransportLog>>,
    clock: FakeClock,
    open: bool,
}

impl ByteStream for ScriptedStream {
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let mut log = self.log.borrow_mut();
        if let Some(result) = log.fail_write {
            return result;
        }
        log.written.extend_from_slice(data);
        Ok(data.len())
    }

    fn read(&mut self, buf: &mut [u8], timeout_ms: u64) -> Result<ReadStatus, TransportError> {
        self.log.borrow_mut().reads += 1;
        match self.replies.pop_front() {
            Some(Reply::Bytes(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                if n < bytes.len() {
                    self.replies.push_front(Reply::Bytes(&bytes[n..]));
                }
                Ok(ReadStatus::Data(n))
            }
            Some(Reply::Silence) => {
                self.clock.advance(timeout_ms);
                Ok(ReadStatus::TimedOut)
            }
            Some(Reply::Reset) => Err(TransportError::Read),
            Some(Reply::Eof) | None => Ok(ReadStatus::Eof),
        }
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.log.borrow_mut().closes += 1;
        }
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub outcomes: Vec<PressOutcome>,
}

impl OutcomeSink for RecordingSink {
    fn report(&mut self, outcome: &PressOutcome) {
        self.outcomes.push(*outcome);
    }
}

// ── Tick helpers ──────────────────────────────────────────────

/// Tick the controller every [`TICK_MS`] for `duration_ms` of fake time.
pub fn run_for<L: LinkPort, T: StreamPort>(
    ctl: &mut ButtonController<'_, L, T>,
    pin: &mut LevelPin,
    clock: &mut FakeClock,
    sink: &mut RecordingSink,
    duration_ms: u64,
) {
    let end = clock.now_ms() + duration_ms;
    while clock.now_ms() < end {
        let now = clock.now_ms();
        ctl.on_tick(now, pin, clock, sink);
        clock.advance(TICK_MS);
    }
}

/// Hold the button down for `hold_ms`, then release it for 200 ms.
#[allow(dead_code)]
pub fn press<L: LinkPort, T: StreamPort>(
    ctl: &mut ButtonController<'_, L, T>,
    config: &ButtonConfig,
    pin: &mut LevelPin,
    clock: &mut FakeClock,
    sink: &mut RecordingSink,
    hold_ms: u64,
) {
    pin.level = config.pressed_level();
    run_for(ctl, pin, clock, sink, hold_ms);
    pin.level = !config.pressed_level();
    run_for(ctl, pin, clock, sink, 200);
}
