use serde::{Deserialize, Serialize};

use crate::domain::round::RoundRecord;
use crate::domain::stats::PlayerStats;
use crate::domain::token::Denomination;
use crate::domain::{PlayerId, RoundNumber};
use crate::engine::{EngineError, GameSession, Phase};

use super::dto::{build_player_views, build_session_view, PlayerViewDto, SessionViewDto};
use super::errors::ApiError;

/// Запросы "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Query {
    Phase,
    Scores,
    /// Токены игрока по номиналам.
    Tokens { player_id: PlayerId },
    RoundNumber,
    Statistics,
    /// Полное состояние сессии.
    Snapshot,
    /// Завершённые раунды.
    History,
    /// Итоговая таблица (по убыванию счёта).
    Standings,
}

/// Результат запроса "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum QueryResponse {
    Phase(Phase),
    Scores(Vec<(PlayerId, u32)>),
    Tokens(Vec<(Denomination, u32)>),
    RoundNumber(RoundNumber),
    Statistics(Vec<(PlayerId, PlayerStats)>),
    Snapshot(SessionViewDto),
    History(Vec<RoundRecord>),
    Standings(Vec<PlayerViewDto>),
}

pub fn run_query(session: &GameSession, query: &Query) -> Result<QueryResponse, ApiError> {
    let response = match query {
        Query::Phase => QueryResponse::Phase(session.phase()),
        Query::Scores => QueryResponse::Scores(session.scores()),
        Query::Tokens { player_id } => {
            let inventory = session
                .inventory(*player_id)
                .ok_or(EngineError::UnknownPlayer(*player_id))?;
            QueryResponse::Tokens(inventory.iter().collect())
        }
        Query::RoundNumber => QueryResponse::RoundNumber(session.round_number()),
        Query::Statistics => QueryResponse::Statistics(
            session
                .players()
                .iter()
                .map(|p| (p.id, session.stats().get(p.id)))
                .collect(),
        ),
        Query::Snapshot => QueryResponse::Snapshot(build_session_view(session)),
        Query::History => QueryResponse::History(session.records().to_vec()),
        Query::Standings => {
            let views = build_player_views(session);
            let standings = session
                .final_standings()
                .into_iter()
                .filter_map(|p| views.iter().find(|v| v.player_id == p.id).cloned())
                .collect();
            QueryResponse::Standings(standings)
        }
    };

    Ok(response)
}
