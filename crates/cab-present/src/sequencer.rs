//! Presentation Sequencer
//!
//! One spin presentation, each step finishing before the next starts:
//!
//! 1. Spin cue + spin animation
//! 2. Win gate, then payout draw on a win
//! 3. Win (or jackpot) cue + win animation, or lose cue + lose animation
//! 4. The outcome goes back to the caller for reporting

use std::time::Duration;

use cab_core::{GameOutcome, GameRules, PayoutTable, RandomSource, WinGate, decide_outcome};

use crate::audio::{Cue, SoundBank, wait_for_audio_idle};
use crate::display::{DEFAULT_FPS, FrameSink, play_animation};
use crate::frames::{AnimationSet, Sequence};

/// Default poll interval for the blocking spin cue
pub const DEFAULT_AUDIO_POLL: Duration = Duration::from_millis(100);

/// Owns the display, speaker and random source for the presentation
pub struct PresentationSequencer<S, A, R> {
    sink: S,
    sounds: A,
    rng: R,
    animations: AnimationSet,
    gate: WinGate,
    payouts: PayoutTable,
    fps: u32,
    /// Poll interval when waiting on the spin cue, `None` = don't wait
    spin_cue_poll: Option<Duration>,
}

impl<S: FrameSink, A: SoundBank, R: RandomSource> PresentationSequencer<S, A, R> {
    pub fn new(sink: S, sounds: A, rng: R, animations: AnimationSet, rules: &GameRules) -> Self {
        Self {
            sink,
            sounds,
            rng,
            animations,
            gate: rules.win_probability,
            payouts: rules.payouts.clone(),
            fps: DEFAULT_FPS,
            spin_cue_poll: None,
        }
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Hold the turn after the spin animation until the spin cue stops
    pub fn with_spin_cue_wait(mut self, poll: Duration) -> Self {
        self.spin_cue_poll = Some(poll);
        self
    }

    /// Audible acknowledgement of a button press
    pub fn acknowledge_press(&mut self) {
        self.sounds.trigger(Cue::Button);
    }

    /// Run one presentation and return its outcome
    pub async fn run_spin_presentation(&mut self) -> GameOutcome {
        self.sounds.trigger(Cue::Spin);
        play_animation(
            &mut self.sink,
            self.animations.frames(Sequence::Spin),
            self.fps,
        )
        .await;

        if let Some(poll) = self.spin_cue_poll {
            wait_for_audio_idle(&mut self.sounds, poll).await;
        }

        let outcome = decide_outcome(&self.gate, &self.payouts, &mut self.rng);

        let (cue, sequence) = if !outcome.won {
            (Cue::Lose, Sequence::Lose)
        } else if outcome.payout == self.payouts.max_amount() {
            (Cue::Jackpot, Sequence::Win)
        } else {
            (Cue::Win, Sequence::Win)
        };

        log::info!(
            "[Present] Outcome: {} (payout {})",
            if outcome.won { "win" } else { "lose" },
            outcome.payout
        );

        self.sounds.trigger(cue);
        play_animation(&mut self.sink, self.animations.frames(sequence), self.fps).await;

        outcome
    }

    pub fn start_background_music(&mut self) -> bool {
        self.sounds.start_music()
    }

    pub fn stop_music(&mut self) {
        self.sounds.stop_music();
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sounds(&self) -> &A {
        &self.sounds
    }

    pub fn animations(&self) -> &AnimationSet {
        &self.animations
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DisplayResult;
    use crate::frames::Frame;
    use image::{Rgb, RgbImage};
    use std::collections::VecDeque;
    use tokio::time::Instant;

    struct Scripted(VecDeque<f64>);

    impl RandomSource for Scripted {
        fn next_unit(&mut self) -> f64 {
            self.0.pop_front().unwrap_or(0.5)
        }
    }

    /// Records the red channel of each shown frame
    #[derive(Default)]
    struct TagSink(Vec<u8>);

    impl FrameSink for TagSink {
        fn show(&mut self, frame: &Frame) -> DisplayResult<()> {
            self.0.push(frame.get_pixel(0, 0).0[0]);
            Ok(())
        }
    }

    #[derive(Default)]
    struct CueLog {
        cues: Vec<Cue>,
        busy_polls: u32,
        music: bool,
    }

    impl SoundBank for CueLog {
        fn trigger(&mut self, cue: Cue) -> bool {
            self.cues.push(cue);
            true
        }

        fn is_busy(&mut self) -> bool {
            if self.busy_polls == 0 {
                return false;
            }
            self.busy_polls -= 1;
            true
        }

        fn start_music(&mut self) -> bool {
            self.music = true;
            true
        }

        fn stop_music(&mut self) {
            self.music = false;
        }
    }

    fn tagged(tag: u8, count: usize) -> Vec<Frame> {
        vec![RgbImage::from_pixel(1, 1, Rgb([tag, 0, 0])); count]
    }

    fn animations() -> AnimationSet {
        AnimationSet::new(tagged(1, 3), tagged(2, 2), tagged(3, 4))
    }

    fn sequencer(
        draws: &[f64],
        animations: AnimationSet,
    ) -> PresentationSequencer<TagSink, CueLog, Scripted> {
        PresentationSequencer::new(
            TagSink::default(),
            CueLog::default(),
            Scripted(draws.iter().copied().collect()),
            animations,
            &GameRules::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_loss_sequence() {
        let mut seq = sequencer(&[0.5], animations());
        let start = Instant::now();

        let outcome = seq.run_spin_presentation().await;

        assert_eq!(outcome, GameOutcome::loss());
        assert_eq!(seq.sink().0, vec![1, 1, 1, 3, 3, 3, 3]);
        assert_eq!(seq.sounds().cues, vec![Cue::Spin, Cue::Lose]);
        // 7 frames at 10 fps
        assert!(start.elapsed() >= Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn test_win_sequence() {
        let mut seq = sequencer(&[0.1, 0.0], animations());
        let outcome = seq.run_spin_presentation().await;

        assert_eq!(outcome, GameOutcome::win(10));
        assert_eq!(seq.sink().0, vec![1, 1, 1, 2, 2]);
        assert_eq!(seq.sounds().cues, vec![Cue::Spin, Cue::Win]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_forced_ten_thousand() {
        let mut seq = sequencer(&[0.0, 0.998], animations());
        assert_eq!(seq.run_spin_presentation().await, GameOutcome::win(10000));
        assert_eq!(seq.sounds().cues, vec![Cue::Spin, Cue::Win]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_top_payout_plays_jackpot() {
        let mut seq = sequencer(&[0.0, 0.9999], animations());
        let outcome = seq.run_spin_presentation().await;

        assert_eq!(outcome, GameOutcome::win(100000));
        assert_eq!(seq.sounds().cues, vec![Cue::Spin, Cue::Jackpot]);
        assert_eq!(seq.sink().0, vec![1, 1, 1, 2, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_animations_finish_immediately() {
        let mut seq = sequencer(&[0.5], AnimationSet::default());
        let start = Instant::now();

        assert_eq!(seq.run_spin_presentation().await, GameOutcome::loss());
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(seq.sink().0.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spin_cue_wait() {
        let mut seq =
            sequencer(&[0.5], AnimationSet::default()).with_spin_cue_wait(DEFAULT_AUDIO_POLL);
        seq.sounds.busy_polls = 4;
        let start = Instant::now();

        seq.run_spin_presentation().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(400), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(500), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_spin_cue_not_awaited_by_default() {
        let mut seq = sequencer(&[0.5], AnimationSet::default());
        seq.sounds.busy_polls = 4;
        let start = Instant::now();

        seq.run_spin_presentation().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fps_override() {
        let mut seq = sequencer(&[0.5], animations()).with_fps(20);
        let start = Instant::now();
        seq.run_spin_presentation().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(350), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(450), "{elapsed:?}");
    }

    #[test]
    fn test_press_and_music() {
        let mut seq = sequencer(&[], AnimationSet::default());
        seq.acknowledge_press();
        assert_eq!(seq.sounds().cues, vec![Cue::Button]);

        assert!(seq.start_background_music());
        assert!(seq.sounds().music);
        seq.stop_music();
        assert!(!seq.sounds().music);
    }
}
