use super::round::RoundService;
use crate::domain::address::AddressSource;
use crate::domain::errors::RoundError;
use crate::domain::ports::{MapView, MarkerKind, PlayerPrompt, TextSlot};
use crate::domain::session::group_thousands;
use crate::domain::{Bounds, Coordinate, GameSession, LocatedTarget, RoundResult};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    // Every round was played and the player declined another game.
    Completed,
    // Input closed mid-round.
    Abandoned,
}

/// Drives a full session: one round in flight at a time, guesses only after the target
/// is resolved, final summary and optional replay.
pub async fn run_game<A: AddressSource>(
    rounds: &mut RoundService<A>,
    session: &mut GameSession,
    view: &mut dyn MapView,
    prompt: &mut dyn PlayerPrompt,
) -> Result<GameOutcome, RoundError> {
    loop {
        let Some(result) = play_round(rounds, session, view, prompt).await? else {
            info!(round = session.current_round(), "player left mid-round");
            return Ok(GameOutcome::Abandoned);
        };

        session.record(result);
        view.display_text(TextSlot::TotalScore, &session.total_score().to_string());

        if session.advance() {
            continue;
        }

        info!(
            total_score = session.total_score(),
            percent = session.percent(),
            "game finished"
        );
        view.display_text(
            TextSlot::Final,
            &format!(
                "Final score: {}\n\n{}",
                group_thousands(session.total_score()),
                session.share_text()
            ),
        );

        if !prompt.confirm("Play again?").await {
            return Ok(GameOutcome::Completed);
        }
        session.reset();
        view.display_text(TextSlot::TotalScore, "0");
    }
}

async fn play_round<A: AddressSource>(
    rounds: &mut RoundService<A>,
    session: &GameSession,
    view: &mut dyn MapView,
    prompt: &mut dyn PlayerPrompt,
) -> Result<Option<RoundResult>, RoundError> {
    view.clear();
    view.display_text(
        TextSlot::Round,
        &format!("Round {}/{}", session.current_round(), session.total_rounds()),
    );
    view.display_text(TextSlot::Address, "Loading...");

    let target = rounds
        .start_round_with_retry(view)
        .await
        .inspect_err(|e| {
            error!(round = session.current_round(), error = %e, "round could not start");
            view.display_text(TextSlot::Address, &format!("Error: {e}"));
        })?;
    view.display_text(TextSlot::Address, &target.source_address.to_string());

    let Some(guess) = prompt.next_guess().await else {
        return Ok(None);
    };
    view.render_marker(MarkerKind::Guess, guess);

    let result = rounds.evaluate_guess(guess, &target);
    show_result(view, &target, guess, result);
    info!(
        round = session.current_round(),
        address = %target.source_address,
        country = %target.country.code,
        distance_km = result.distance_km,
        points = result.points,
        "round scored"
    );

    Ok(Some(result))
}

fn show_result(
    view: &mut dyn MapView,
    target: &LocatedTarget,
    guess: Coordinate,
    result: RoundResult,
) {
    let actual = target.country.centroid;
    view.render_marker(MarkerKind::Actual, actual);
    view.render_line(guess, actual);
    view.fit_bounds(Bounds::enclosing(guess, actual));
    view.display_text(
        TextSlot::Result,
        &format!(
            "Distance: {} km\nPoints: {}\nActual: {}",
            group_thousands(result.distance_km.round() as u64),
            result.points,
            target.country.name
        ),
    );
}
