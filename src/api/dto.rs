use serde::{Deserialize, Serialize};

use crate::domain::catalog::Prompt;
use crate::domain::round::RoundOutcome;
use crate::domain::stats::PlayerStats;
use crate::domain::token::Denomination;
use crate::domain::{CategoryId, ItemId, PlayerId, RoundNumber, SessionId};
use crate::engine::bidding::PassOutcome;
use crate::engine::reveal::{RevealMark, RevealStatus};
use crate::engine::selection::SelectionSource;
use crate::engine::{GameSession, Phase, ScoringReport};

/// DTO игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlayerViewDto {
    pub player_id: PlayerId,
    pub name: String,
    pub score: u32,
    /// Токены по номиналам (2, 4, 6).
    pub tokens: Vec<(Denomination, u32)>,
    pub owned_items: u32,
    pub stats: PlayerStats,
}

/// DTO текущего раунда.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoundViewDto {
    pub number: RoundNumber,
    pub category: Option<CategoryId>,
    pub prompt: Option<Prompt>,
    pub pool: Vec<ItemId>,
    pub blocked: Vec<ItemId>,
    pub current_bid: u32,
    pub high_bidder: Option<PlayerId>,
    /// Победитель торгов (после закрытия торгов).
    pub bidder: Option<PlayerId>,
    pub current_blocker: Option<PlayerId>,
    pub selected: Vec<ItemId>,
    pub ranking: Vec<ItemId>,
    pub revealed: usize,
    pub marks: Vec<RevealMark>,
    pub outcome: Option<RoundOutcome>,
}

/// DTO сессии целиком.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionViewDto {
    pub session_id: SessionId,
    pub phase: Phase,
    pub round_number: RoundNumber,
    pub max_rounds: u32,
    pub winning_score: u32,
    pub players: Vec<PlayerViewDto>,
    pub round: RoundViewDto,
    /// Заполняется только после конца партии.
    pub winners: Vec<PlayerId>,
}

/// Ответ API на команду.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum CommandResponse {
    /// Вернуть обновлённое состояние сессии.
    State(SessionViewDto),

    /// Категория выбрана, вот задание.
    PromptChosen(Prompt),

    /// Пул раунда.
    PoolDrawn(Vec<ItemId>),

    BidAccepted { amount: u32 },

    Passed(PassOutcome),

    ItemSelected(SelectionSource),

    Revealed(RevealStatus),

    RoundScored(ScoringReport),

    /// Фаза после `advance_round`.
    Advanced(Phase),
}

pub fn build_player_views(session: &GameSession) -> Vec<PlayerViewDto> {
    session
        .players()
        .iter()
        .map(|p| PlayerViewDto {
            player_id: p.id,
            name: p.name.clone(),
            score: p.score,
            tokens: session
                .inventory(p.id)
                .map(|inv| inv.iter().collect())
                .unwrap_or_default(),
            owned_items: session.ledger().owned_count(p.id),
            stats: session.stats().get(p.id),
        })
        .collect()
}

pub fn build_round_view(session: &GameSession) -> RoundViewDto {
    let round = session.round();
    let (revealed, marks) = round
        .reveal
        .as_ref()
        .map(|v| (v.revealed, v.marks.clone()))
        .unwrap_or_default();

    RoundViewDto {
        number: session.round_number(),
        category: round.category.clone(),
        prompt: round.prompt.clone(),
        pool: round.pool.clone(),
        blocked: round.blocking.blocked_items(),
        current_bid: round.bidding.current_bid,
        high_bidder: round.bidding.high_bidder,
        bidder: session.bidder(),
        current_blocker: session.current_blocker(),
        selected: round
            .selection
            .as_ref()
            .map(|s| s.selected.clone())
            .unwrap_or_default(),
        ranking: round.ranking.clone(),
        revealed,
        marks,
        outcome: round.outcome,
    }
}

pub fn build_session_view(session: &GameSession) -> SessionViewDto {
    SessionViewDto {
        session_id: session.id(),
        phase: session.phase(),
        round_number: session.round_number(),
        max_rounds: session.rules().max_rounds,
        winning_score: session.rules().winning_score,
        players: build_player_views(session),
        round: build_round_view(session),
        winners: if session.is_game_over() {
            session.winners()
        } else {
            Vec::new()
        },
    }
}
