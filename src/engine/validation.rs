use crate::domain::player::Player;
use crate::domain::PlayerId;
use crate::engine::actions::PlayerActionKind;
use crate::engine::errors::EngineError;
use crate::engine::phase::Phase;

/// Фаза, в которой допустимо действие игрока.
pub fn required_phase(action: &PlayerActionKind) -> Phase {
    match action {
        PlayerActionKind::Bid | PlayerActionKind::Pass => Phase::Bidding,
        PlayerActionKind::Block { .. } | PlayerActionKind::SkipBlock => Phase::Blocking,
        PlayerActionKind::SelectItem(_) => Phase::Selection,
    }
}

/// Команда допустима только в фазе `expected`.
pub fn ensure_phase(actual: Phase, expected: Phase) -> Result<(), EngineError> {
    if actual == Phase::GameOver && expected != Phase::GameOver {
        return Err(EngineError::GameOver);
    }
    if actual != expected {
        return Err(EngineError::WrongPhase {
            expected: phase_name(expected),
            actual,
        });
    }
    Ok(())
}

/// Игрок сидит в этой сессии.
pub fn ensure_player(players: &[Player], player_id: PlayerId) -> Result<(), EngineError> {
    if players.iter().any(|p| p.id == player_id) {
        Ok(())
    } else {
        Err(EngineError::UnknownPlayer(player_id))
    }
}

/// Переход фазы по таблице; иначе внутренняя ошибка.
pub fn ensure_transition(from: Phase, to: Phase) -> Result<(), EngineError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(EngineError::Internal("недопустимый переход фазы"))
    }
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::CategoryChoice => "CategoryChoice",
        Phase::Drawing => "Drawing",
        Phase::Bidding => "Bidding",
        Phase::Blocking => "Blocking",
        Phase::Selection => "Selection",
        Phase::Ranking => "Ranking",
        Phase::Reveal => "Reveal",
        Phase::Scoring => "Scoring",
        Phase::RoundComplete => "RoundComplete",
        Phase::GameOver => "GameOver",
    }
}
