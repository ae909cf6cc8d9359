//! Crazy Bird Eggs entry point
//!
//! Plays one idle-mode match against the scripted AI and records the result.
//!
//! Usage: `crazy-bird-eggs [level] [seed] [pacing]`

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crazy_bird_eggs::sim::{GameEvent, MatchOutcome, Side, idle_intent};
use crazy_bird_eggs::{PacingPreset, Progress, Session, Settings};

/// Simulated frame length for paced matches
const FRAME_MS: u32 = 16;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let level_id: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);

    let mut settings = Settings::load(Settings::STORAGE_FILE);
    if let Some(preset) = args.next().as_deref().and_then(PacingPreset::from_str) {
        settings.pacing_preset = preset;
    }
    log::info!(
        "Crazy Bird Eggs starting (level {}, seed {}, pacing {})",
        level_id,
        seed,
        settings.pacing_preset.as_str()
    );

    let progress = Progress::load(Progress::STORAGE_FILE, settings.progression);
    let mut session = Session::new(&settings, progress, seed);
    if !session.start_level(level_id) {
        println!("Level {} is locked", level_id);
        return;
    }

    let mut rng = Pcg32::seed_from_u64(seed ^ 0x5eed);
    let mut rounds = 0u32;
    let mut elapsed_ms = 0u64;
    while session.game().outcome().is_none() {
        let events = match idle_intent(session.game().state(), &mut rng) {
            Some(intent) => session.apply(intent),
            None => {
                elapsed_ms += u64::from(FRAME_MS);
                session.tick(FRAME_MS)
            }
        };
        for event in events {
            match event {
                GameEvent::AttackStarted {
                    attacker: Side::Human,
                    ..
                } => rounds += 1,
                GameEvent::Placed { .. } | GameEvent::AttackStarted { .. } => {}
                GameEvent::Advanced { .. } | GameEvent::Bounced(_) => {
                    log::debug!("{:?}", event);
                }
                other => log::info!("{:?}", other),
            }
        }
    }

    let outcome = session.game().outcome();
    let progress = session.into_progress();
    match outcome {
        Some(MatchOutcome::HumanWon) => println!("You won level {}!", level_id),
        _ => println!("The AI reached the arena first."),
    }
    println!(
        "Rounds: {}, simulated time: {:.1}s, score: {}, unlocked: {}",
        rounds,
        elapsed_ms as f64 / 1000.0,
        progress.total_score,
        progress.unlocked_levels
    );

    if let Err(err) = progress.save(Progress::STORAGE_FILE) {
        log::error!("Could not save progress: {}", err);
    }
}
