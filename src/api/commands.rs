use serde::{Deserialize, Serialize};

use crate::domain::catalog::Prompt;
use crate::domain::rules::RuleConfig;
use crate::domain::token::Denomination;
use crate::domain::{CategoryId, ItemId, PlayerId};
use crate::engine::{GameSession, RandomSource};
use crate::infra::catalog::CatalogAdapter;

use super::dto::{build_session_view, CommandResponse};
use super::errors::ApiError;

/// Команда верхнего уровня: всё, что меняет состояние сессии.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Command {
    /// Выбрать категорию раунда (задание выбирается случайно).
    ChooseCategory { category: CategoryId },

    /// Заменить задание до вытягивания пула.
    SetPrompt { prompt: Prompt },

    /// Вытянуть пул и открыть торги.
    DrawPool,

    /// Ставка: текущая + 1.
    PlaceBid { player_id: PlayerId },

    Pass { player_id: PlayerId },

    SpendBlockToken {
        player_id: PlayerId,
        denomination: Denomination,
        item_id: ItemId,
    },

    SkipBlock { player_id: PlayerId },

    SelectItem { player_id: PlayerId, item_id: ItemId },

    SubmitRanking { ranking: Vec<ItemId> },

    /// Открыть следующую карточку.
    Reveal,

    ScoreRound,

    AdvanceRound,

    /// Новая партия с теми же игроками; статистика сохраняется.
    StartNewGame,

    /// Заменить правила (только на границе партии).
    ApplyRules { rules: RuleConfig },

    ResetStatistics,
}

/// Разобрать команду из JSON.
pub fn parse_command(raw: &str) -> Result<Command, ApiError> {
    serde_json::from_str(raw).map_err(|e| ApiError::bad_request(e.to_string()))
}

/// Выполнить команду над сессией.
pub fn execute<C, R>(
    session: &mut GameSession,
    catalog: &C,
    rng: &mut R,
    command: Command,
) -> Result<CommandResponse, ApiError>
where
    C: CatalogAdapter + ?Sized,
    R: RandomSource,
{
    let response = match command {
        Command::ChooseCategory { category } => {
            CommandResponse::PromptChosen(session.choose_category(catalog, &category, rng)?)
        }
        Command::SetPrompt { prompt } => {
            session.set_prompt(catalog, prompt)?;
            CommandResponse::State(build_session_view(session))
        }
        Command::DrawPool => CommandResponse::PoolDrawn(session.draw_pool(catalog, rng)?),
        Command::PlaceBid { player_id } => CommandResponse::BidAccepted {
            amount: session.place_bid(player_id)?,
        },
        Command::Pass { player_id } => CommandResponse::Passed(session.pass(player_id)?),
        Command::SpendBlockToken {
            player_id,
            denomination,
            item_id,
        } => {
            session.spend_block_token(player_id, denomination, &item_id)?;
            CommandResponse::State(build_session_view(session))
        }
        Command::SkipBlock { player_id } => {
            session.skip_block(player_id)?;
            CommandResponse::State(build_session_view(session))
        }
        Command::SelectItem { player_id, item_id } => {
            CommandResponse::ItemSelected(session.select_item(player_id, &item_id)?)
        }
        Command::SubmitRanking { ranking } => {
            session.submit_ranking(catalog, ranking)?;
            CommandResponse::State(build_session_view(session))
        }
        Command::Reveal => CommandResponse::Revealed(session.reveal()?),
        Command::ScoreRound => CommandResponse::RoundScored(session.score_round()?),
        Command::AdvanceRound => CommandResponse::Advanced(session.advance_round()?),
        Command::StartNewGame => {
            session.start_new_game();
            CommandResponse::State(build_session_view(session))
        }
        Command::ApplyRules { rules } => {
            session.apply_rules(rules)?;
            CommandResponse::State(build_session_view(session))
        }
        Command::ResetStatistics => {
            session.reset_statistics();
            CommandResponse::State(build_session_view(session))
        }
    };

    Ok(response)
}
