//! Shared fakes for the orchestrator scenarios

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use cab_core::{DebouncedButton, GameRules, HardwareReadError, InputLine, RandomSource, TimingConfig};
use cab_daemon::GameOrchestrator;
use cab_link::{LinkConfig, MemoryConnector, MemoryWire, PeripheralLink};
use cab_present::{AnimationSet, Cue, DisplayResult, Frame, FrameSink, PresentationSequencer, SoundBank};
use parking_lot::Mutex;

pub const BUTTON_PIN: u8 = 20;

// ============ Input ============

#[derive(Default)]
struct LineState {
    samples: VecDeque<Result<bool, HardwareReadError>>,
    reads: usize,
    releases: usize,
}

/// Button line that replays a script, then reads "released" forever
#[derive(Clone, Default)]
pub struct ScriptedLine {
    state: Arc<Mutex<LineState>>,
}

impl ScriptedLine {
    pub fn new(samples: impl IntoIterator<Item = bool>) -> Self {
        let line = Self::default();
        line.state.lock().samples = samples.into_iter().map(Ok).collect();
        line
    }

    pub fn push_error(&self, reason: &str) {
        self.state
            .lock()
            .samples
            .push_back(Err(HardwareReadError::new(BUTTON_PIN, reason)));
    }

    pub fn reads(&self) -> usize {
        self.state.lock().reads
    }

    pub fn releases(&self) -> usize {
        self.state.lock().releases
    }
}

impl InputLine for ScriptedLine {
    fn pin(&self) -> u8 {
        BUTTON_PIN
    }

    fn read_pressed(&mut self) -> Result<bool, HardwareReadError> {
        let mut state = self.state.lock();
        state.reads += 1;
        state.samples.pop_front().unwrap_or(Ok(false))
    }

    fn release(&mut self) {
        self.state.lock().releases += 1;
    }
}

// ============ Random ============

/// Replays fixed unit draws; falls back to 0.5 (a loss at p = 0.2)
pub struct ScriptedRandom(VecDeque<f64>);

impl ScriptedRandom {
    pub fn new(draws: &[f64]) -> Self {
        Self(draws.iter().copied().collect())
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        self.0.pop_front().unwrap_or(0.5)
    }
}

// ============ Display ============

#[derive(Clone, Default)]
pub struct RecordingSink {
    shown: Arc<Mutex<usize>>,
}

impl RecordingSink {
    pub fn frames_shown(&self) -> usize {
        *self.shown.lock()
    }
}

impl FrameSink for RecordingSink {
    fn show(&mut self, _frame: &Frame) -> DisplayResult<()> {
        *self.shown.lock() += 1;
        Ok(())
    }
}

// ============ Audio ============

#[derive(Default)]
struct SoundLog {
    cues: Vec<Cue>,
    music_playing: bool,
    music_stops: usize,
}

#[derive(Clone, Default)]
pub struct RecordingSoundBank {
    log: Arc<Mutex<SoundLog>>,
}

impl RecordingSoundBank {
    pub fn cues(&self) -> Vec<Cue> {
        self.log.lock().cues.clone()
    }

    pub fn music_playing(&self) -> bool {
        self.log.lock().music_playing
    }

    pub fn music_stops(&self) -> usize {
        self.log.lock().music_stops
    }
}

impl SoundBank for RecordingSoundBank {
    fn trigger(&mut self, cue: Cue) -> bool {
        self.log.lock().cues.push(cue);
        true
    }

    fn is_busy(&mut self) -> bool {
        false
    }

    fn start_music(&mut self) -> bool {
        self.log.lock().music_playing = true;
        true
    }

    fn stop_music(&mut self) {
        let mut log = self.log.lock();
        log.music_playing = false;
        log.music_stops += 1;
    }
}

// ============ Cabinet ============

pub type TestOrchestrator = GameOrchestrator<
    ScriptedLine,
    MemoryConnector,
    RecordingSink,
    RecordingSoundBank,
    ScriptedRandom,
>;

/// Handles onto the fakes owned by the orchestrator
pub struct Cabinet {
    pub wire: MemoryWire,
    pub line: ScriptedLine,
    pub sink: RecordingSink,
    pub sounds: RecordingSoundBank,
}

/// 3 spin, 2 win and 2 lose frames: every presentation takes 500 ms at 10 fps
pub fn animations() -> AnimationSet {
    let frames = |count| vec![Frame::new(1, 1); count];
    AnimationSet::new(frames(3), frames(2), frames(2))
}

pub fn cabinet(line: ScriptedLine, draws: &[f64]) -> (TestOrchestrator, Cabinet) {
    cabinet_with(line, draws, animations())
}

pub fn cabinet_with(
    line: ScriptedLine,
    draws: &[f64],
    animations: AnimationSet,
) -> (TestOrchestrator, Cabinet) {
    let wire = MemoryWire::new();
    let sink = RecordingSink::default();
    let sounds = RecordingSoundBank::default();
    let rules = GameRules::default();

    let mut presenter = PresentationSequencer::new(
        sink.clone(),
        sounds.clone(),
        ScriptedRandom::new(draws),
        animations,
        &rules,
    );
    presenter.start_background_music();

    let orchestrator = GameOrchestrator::new(
        DebouncedButton::new(line.clone()),
        PeripheralLink::new(wire.connector(), LinkConfig::default()),
        presenter,
        rules.wager,
        TimingConfig::default(),
    );

    (
        orchestrator,
        Cabinet {
            wire,
            line,
            sink,
            sounds,
        },
    )
}

/// Virtual-time sleeps can overshoot by a timer tick each
pub fn assert_about(actual: Duration, expected_ms: u64) {
    let expected = Duration::from_millis(expected_ms);
    assert!(
        actual >= expected && actual <= expected + Duration::from_millis(20),
        "expected ~{expected:?}, got {actual:?}"
    );
}
