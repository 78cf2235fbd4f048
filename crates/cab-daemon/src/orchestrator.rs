//! Game Orchestrator

use std::future::Future;

use cab_core::{DebouncedButton, GameOutcome, HardwareReadError, InputLine, RandomSource, TimingConfig};
use cab_link::{CabinetCommand, Connector, PeripheralLink};
use cab_present::{FrameSink, PresentationSequencer, SoundBank};

use crate::error::OrchestratorError;

/// Where the game cycle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WaitForLink,
    WaitForButton,
    SendGambleNotice,
    RunPresentation,
    ReportOutcome,
    Cooldown,
}

/// Top-level game loop.
///
/// Exclusively owns the button line, the link and the presentation. All
/// protocol traffic goes through [`PeripheralLink`].
pub struct GameOrchestrator<L, C, S, A, R>
where
    L: InputLine,
    C: Connector,
    S: FrameSink,
    A: SoundBank,
    R: RandomSource,
{
    button: DebouncedButton<L>,
    link: PeripheralLink<C>,
    presenter: PresentationSequencer<S, A, R>,
    /// Amount announced in every `GAMBLE` notice
    wager: u64,
    timing: TimingConfig,
    phase: Phase,
    turns: u64,
    torn_down: bool,
}

impl<L, C, S, A, R> GameOrchestrator<L, C, S, A, R>
where
    L: InputLine,
    C: Connector,
    S: FrameSink,
    A: SoundBank,
    R: RandomSource,
{
    pub fn new(
        button: DebouncedButton<L>,
        link: PeripheralLink<C>,
        presenter: PresentationSequencer<S, A, R>,
        wager: u64,
        timing: TimingConfig,
    ) -> Self {
        Self {
            button,
            link,
            presenter,
            wager,
            timing,
            phase: Phase::WaitForLink,
            turns: 0,
            torn_down: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Completed turns
    pub fn turns_played(&self) -> u64 {
        self.turns
    }

    pub fn link(&self) -> &PeripheralLink<C> {
        &self.link
    }

    pub fn presenter(&self) -> &PresentationSequencer<S, A, R> {
        &self.presenter
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Run the game cycle until `shutdown` resolves or the button line fails.
    ///
    /// Teardown runs before this returns, on both paths.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), OrchestratorError>
    where
        F: Future<Output = ()>,
    {
        let result = tokio::select! {
            result = self.cycle() => result,
            () = shutdown => {
                log::info!("[Game] Shutdown requested during {:?}", self.phase);
                Ok(())
            }
        };

        if let Err(e) = &result {
            log::error!("[Game] Stopping: {}", e);
        }
        self.teardown();
        result
    }

    async fn cycle(&mut self) -> Result<(), OrchestratorError> {
        loop {
            if !self.link.is_connected() {
                self.wait_for_link().await;
            }
            self.wait_for_button().await?;
            self.play_turn().await;
        }
    }

    /// Connect, retrying at the fixed interval until it succeeds
    pub async fn wait_for_link(&mut self) {
        self.phase = Phase::WaitForLink;
        log::info!("[Game] Connecting to payout controller...");

        let mut attempts = 1u64;
        while self.link.connect().is_err() {
            tokio::time::sleep(self.timing.connect_retry()).await;
            attempts += 1;
        }
        log::info!(
            "[Game] Payout controller connected ({} attempt{})",
            attempts,
            if attempts == 1 { "" } else { "s" }
        );
    }

    /// Poll the button at the fixed cadence until a rising edge
    pub async fn wait_for_button(&mut self) -> Result<(), HardwareReadError> {
        self.phase = Phase::WaitForButton;
        loop {
            if self.button.poll()? {
                log::info!("[Game] Spin button pressed, starting spin");
                return Ok(());
            }
            tokio::time::sleep(self.timing.button_poll()).await;
        }
    }

    /// One turn: notice, presentation, report, cooldown
    pub async fn play_turn(&mut self) -> GameOutcome {
        self.presenter.acknowledge_press();

        self.phase = Phase::SendGambleNotice;
        self.send(CabinetCommand::Gamble(self.wager));

        self.phase = Phase::RunPresentation;
        let outcome = self.presenter.run_spin_presentation().await;

        self.phase = Phase::ReportOutcome;
        let report = if outcome.won {
            CabinetCommand::Win(outcome.payout)
        } else {
            CabinetCommand::Lose
        };
        self.send(report);
        self.turns += 1;

        self.phase = Phase::Cooldown;
        tokio::time::sleep(self.timing.cooldown()).await;

        outcome
    }

    /// Send failures are logged and the turn carries on
    fn send(&mut self, command: CabinetCommand) {
        let line = command.to_string();
        match self.link.send_line(&line) {
            Ok(()) => log::info!("[Game] Sent: {}", line),
            Err(e) => log::warn!("[Game] Could not send {}: {}", line, e),
        }
    }

    /// Stop music, close the link, release the button line. Runs once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        log::info!("[Game] Shutting down...");
        self.presenter.stop_music();
        self.link.disconnect();
        self.button.release();
    }
}

impl<L, C, S, A, R> Drop for GameOrchestrator<L, C, S, A, R>
where
    L: InputLine,
    C: Connector,
    S: FrameSink,
    A: SoundBank,
    R: RandomSource,
{
    fn drop(&mut self) {
        self.teardown();
    }
}
