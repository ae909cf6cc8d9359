//! A play session: one match at a time, results fed to progression

use rand::Rng;
use rand_pcg::Pcg32;

use crate::progress::{Progress, ProgressSink};
use crate::settings::Settings;
use crate::sim::{GameEvent, Intent, Match};

/// Owns the active match and forwards completed levels to a [`ProgressSink`]
#[derive(Debug)]
pub struct Session<P = Progress, R = Pcg32> {
    game: Match<R>,
    progress: P,
}

impl Session<Progress, Pcg32> {
    /// Session on level 1 with the settings' pacing and progression policy
    pub fn new(settings: &Settings, progress: Progress, seed: u64) -> Self {
        let progress = progress.with_rules(settings.progression);
        Self::with_match(Match::new(1, seed, settings.pacing()), progress)
    }
}

impl<P: ProgressSink, R: Rng> Session<P, R> {
    /// Wrap an existing match
    pub fn with_match(game: Match<R>, progress: P) -> Self {
        Self { game, progress }
    }

    /// The active match
    pub fn game(&self) -> &Match<R> {
        &self.game
    }

    /// The progress sink
    pub fn progress(&self) -> &P {
        &self.progress
    }

    /// End the session, handing back progress for saving
    pub fn into_progress(self) -> P {
        self.progress
    }

    /// Start a level if the sink reports it unlocked
    pub fn start_level(&mut self, level_id: u32) -> bool {
        if !self.progress.is_unlocked(level_id) {
            log::info!("Level {} is locked", level_id);
            return false;
        }
        self.game.start_level(level_id);
        self.pump();
        true
    }

    /// Forward to [`Match::place`], returning the events it produced
    pub fn place(&mut self, row: usize, column: usize) -> Vec<GameEvent> {
        self.game.place(row, column);
        self.pump()
    }

    /// Forward to [`Match::attack`]
    pub fn attack(&mut self, row: usize, column: usize) -> Vec<GameEvent> {
        self.game.attack(row, column);
        self.pump()
    }

    /// Forward to [`Match::apply`]
    pub fn apply(&mut self, intent: Intent) -> Vec<GameEvent> {
        self.game.apply(intent);
        self.pump()
    }

    /// Advance pending beats; a win reached here is still reported
    pub fn tick(&mut self, dt_ms: u32) -> Vec<GameEvent> {
        self.game.tick(dt_ms);
        self.pump()
    }

    /// Forward to [`Match::settle`]
    pub fn settle(&mut self) -> Vec<GameEvent> {
        self.game.settle();
        self.pump()
    }

    /// Forward to [`Match::restart_level`]
    pub fn restart_level(&mut self) -> Vec<GameEvent> {
        self.game.restart_level();
        self.pump()
    }

    /// Drain match events, notifying progression of completed levels
    fn pump(&mut self) -> Vec<GameEvent> {
        let events = self.game.take_events();
        for event in &events {
            if let GameEvent::LevelCompleted { level_id } = *event {
                self.progress.on_level_completed(level_id);
            }
        }
        events
    }
}
