//! Начисление очков по итогам раунда и бонусы конца партии.
//!
//! Успех биддера: он получает очки за ставку, каждый блокер отдаёт ему
//! токен того номинала, которым блокировал (1:1).
//! Провал: биддер без штрафа, каждый блокер получает номинал токена
//! в очки и оставляет токен себе; при `token_ownership` заблокированная
//! карточка уходит блокеру во владение.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::player::Player;
use crate::domain::round::{BlockRecord, RoundOutcome};
use crate::domain::rules::RuleConfig;
use crate::domain::PlayerId;
use crate::engine::errors::EngineError;
use crate::engine::history::{RoundEventKind, RoundHistory};
use crate::engine::ledger::TokenLedger;
use crate::engine::stats::{StatEvent, StatisticsTracker};

/// Всё, что нужно скорингу от раунда.
#[derive(Clone, Debug)]
pub struct ScoringInput<'a> {
    pub bidder: PlayerId,
    pub bid: u32,
    pub category: &'a str,
    pub blocks: &'a [BlockRecord],
    pub outcome: RoundOutcome,
    /// Сколько карточек биддер реально отранжировал (0 при нехватке пула).
    pub ranked_count: u32,
}

/// Изменившееся в результате скоринга.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoringReport {
    /// (игрок, полученные очки), только ненулевые.
    pub points: Vec<(PlayerId, u32)>,
    pub transferred_tokens: u32,
    /// Блоки, для которых у блокера не нашлось токена.
    pub missing_tokens: u32,
    pub ownership_granted: Vec<(PlayerId, String)>,
}

/// Изменяемые части сессии, с которыми работает скоринг.
pub struct ScoringContext<'a> {
    pub rules: &'a RuleConfig,
    pub players: &'a mut [Player],
    pub ledger: &'a mut TokenLedger,
    pub stats: &'a mut StatisticsTracker,
    pub history: &'a mut RoundHistory,
}

fn add_points(players: &mut [Player], player_id: PlayerId, points: u32) -> Result<(), EngineError> {
    let player = players
        .iter_mut()
        .find(|p| p.id == player_id)
        .ok_or(EngineError::UnknownPlayer(player_id))?;
    player.score = player.score.saturating_add(points);
    Ok(())
}

/// Применить итог раунда. Повторный вызов для того же раунда отсекает сессия.
pub fn apply_round_scoring(
    ctx: &mut ScoringContext<'_>,
    input: &ScoringInput<'_>,
) -> Result<ScoringReport, EngineError> {
    let mut report = ScoringReport::default();

    if input.outcome.success {
        let points = ctx.rules.bid_points(input.bid);
        add_points(ctx.players, input.bidder, points)?;
        if points > 0 {
            report.points.push((input.bidder, points));
        }

        ctx.stats.record(input.bidder, StatEvent::RankingSucceeded);

        for block in input.blocks {
            if ctx.ledger.count(block.player_id, block.denomination) == 0 {
                warn!(
                    blocker = block.player_id,
                    denomination = %block.denomination,
                    "у блокера нет токена для передачи биддеру"
                );
                report.missing_tokens += 1;
                continue;
            }

            ctx.ledger
                .transfer(block.player_id, input.bidder, block.denomination)?;
            ctx.stats.record(block.player_id, StatEvent::TokenLost);
            ctx.stats.record(input.bidder, StatEvent::TokenGained);
            ctx.history.push(RoundEventKind::TokenTransferred {
                from: block.player_id,
                to: input.bidder,
                denomination: block.denomination,
            });
            report.transferred_tokens += 1;

            // Владение за любой блок, если успех блока не обязателен.
            if ctx.rules.token_ownership && !ctx.rules.require_successful_block {
                grant(ctx, block, &mut report, input.category);
            }
        }
    } else {
        for block in input.blocks {
            let points = block.denomination.points();
            add_points(ctx.players, block.player_id, points)?;
            ctx.stats
                .record(block.player_id, StatEvent::BlockingPoints(points));
            report.points.push((block.player_id, points));

            if ctx.rules.token_ownership {
                grant(ctx, block, &mut report, input.category);
            }
        }
    }

    if input.ranked_count > 0 {
        ctx.stats
            .record(input.bidder, StatEvent::ItemsRanked(input.ranked_count));
    }

    debug!(
        bidder = input.bidder,
        bid = input.bid,
        success = input.outcome.success,
        "раунд посчитан"
    );

    Ok(report)
}

fn grant(
    ctx: &mut ScoringContext<'_>,
    block: &BlockRecord,
    report: &mut ScoringReport,
    category: &str,
) {
    if ctx
        .ledger
        .grant_ownership(block.player_id, category, &block.item_id)
    {
        ctx.stats.record(block.player_id, StatEvent::ItemOwned);
        ctx.history.push(RoundEventKind::OwnershipGranted {
            player_id: block.player_id,
            item_id: block.item_id.clone(),
        });
        report
            .ownership_granted
            .push((block.player_id, block.item_id.clone()));
    }
}

/// Бонусы конца партии: за карточки во владении и за оставшиеся токены.
/// Возвращает (игрок, бонус) для всех игроков в порядке рассадки.
pub fn apply_end_game_bonuses(
    rules: &RuleConfig,
    players: &mut [Player],
    ledger: &TokenLedger,
    history: &mut RoundHistory,
) -> Vec<(PlayerId, u32)> {
    let mut awarded = Vec::with_capacity(players.len());

    for player in players.iter_mut() {
        let owned_bonus = if rules.token_ownership {
            ledger
                .owned_count(player.id)
                .saturating_mul(rules.end_game_owned_item_points)
        } else {
            0
        };
        let token_bonus = ledger
            .inventory(player.id)
            .map(|inv| inv.total())
            .unwrap_or(0)
            .saturating_mul(rules.end_game_token_points);

        let bonus = owned_bonus.saturating_add(token_bonus);
        if bonus > 0 {
            player.score = player.score.saturating_add(bonus);
            history.push(RoundEventKind::EndGameBonus {
                player_id: player.id,
                points: bonus,
            });
        }
        awarded.push((player.id, bonus));
    }

    awarded
}
