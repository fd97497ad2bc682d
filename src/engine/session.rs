//! `GameSession`: единственный владелец изменяемого состояния партии.
//!
//! Все команды идут через методы сессии: сначала проверка фазы и
//! аргументов, потом мутация. Отклонённая команда состояние не меняет.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::catalog::Prompt;
use crate::domain::player::{Player, PlayerProfile};
use crate::domain::round::{FailureReason, RoundOutcome, RoundRecord};
use crate::domain::rules::RuleConfig;
use crate::domain::token::{Denomination, TokenInventory};
use crate::domain::{CategoryId, ItemId, PlayerId, RoundNumber, SessionId};
use crate::engine::actions::{PlayerAction, PlayerActionKind};
use crate::engine::bidding::{BidOutcome, BiddingState, PassOutcome};
use crate::engine::blocking::{blocking_order, BlockingState};
use crate::engine::errors::EngineError;
use crate::engine::history::{RoundEventKind, RoundHistory};
use crate::engine::ledger::TokenLedger;
use crate::engine::phase::Phase;
use crate::engine::reveal::{RankedItem, RevealMark, RevealStatus, RevealValidator};
use crate::engine::scoring::{self, ScoringContext, ScoringInput, ScoringReport};
use crate::engine::selection::{pool_covers_bid, SelectionSource, SelectionState};
use crate::engine::stats::{StatEvent, StatisticsTracker};
use crate::engine::validation::{ensure_phase, ensure_player, ensure_transition, required_phase};
use crate::engine::RandomSource;
use crate::infra::catalog::CatalogAdapter;
use crate::infra::ids::IdGenerator;

/// Состояние текущего раунда. Сбрасывается при выборе новой категории.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoundState {
    pub category: Option<CategoryId>,
    pub prompt: Option<Prompt>,
    pub pool: Vec<ItemId>,
    pub bidding: BiddingState,
    pub blocking: BlockingState,
    pub selection: Option<SelectionState>,
    pub ranking: Vec<ItemId>,
    pub reveal: Option<RevealValidator>,
    pub outcome: Option<RoundOutcome>,
    /// Раунд уже посчитан (защита от повторного скоринга).
    pub scored: bool,
}

impl RoundState {
    pub fn new(max_bid: u32) -> Self {
        Self {
            category: None,
            prompt: None,
            pool: Vec::new(),
            bidding: BiddingState::new(max_bid),
            blocking: BlockingState::disabled(),
            selection: None,
            ranking: Vec::new(),
            reveal: None,
            outcome: None,
            scored: false,
        }
    }

    /// Пул минус заблокированные карточки (в порядке пула).
    pub fn available_items(&self) -> Vec<ItemId> {
        self.pool
            .iter()
            .filter(|id| !self.blocking.is_blocked(id))
            .cloned()
            .collect()
    }
}

/// Партия: игроки, правила, токены, текущий раунд и история.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GameSession {
    id: SessionId,
    rules: RuleConfig,
    /// Порядок рассадки.
    players: Vec<Player>,
    ledger: TokenLedger,
    stats: StatisticsTracker,
    phase: Phase,
    round_number: RoundNumber,
    round: RoundState,
    records: Vec<RoundRecord>,
    history: RoundHistory,
    /// Карточки, выбывшие из колоды категории до конца партии.
    retired: BTreeMap<CategoryId, BTreeSet<ItemId>>,
    end_bonus_applied: bool,
}

impl GameSession {
    /// Новая партия. Правила проверяются сразу, игроков минимум двое,
    /// id и имена уникальны.
    pub fn new(
        id: SessionId,
        rules: RuleConfig,
        profiles: Vec<PlayerProfile>,
    ) -> Result<Self, EngineError> {
        rules.validate()?;

        if profiles.len() < 2 {
            return Err(EngineError::NotEnoughPlayers);
        }

        let mut seen_ids = BTreeSet::new();
        let mut seen_names = BTreeSet::new();
        for p in &profiles {
            if !seen_ids.insert(p.id) || !seen_names.insert(p.name.as_str()) {
                return Err(EngineError::DuplicatePlayer(p.id));
            }
        }

        let players: Vec<Player> = profiles.into_iter().map(Player::new).collect();
        let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();

        info!(session = id, players = players.len(), "новая партия");

        Ok(Self {
            id,
            ledger: TokenLedger::new(&ids, rules.starting_tokens_per_denomination),
            stats: StatisticsTracker::new(&ids),
            phase: Phase::CategoryChoice,
            round_number: 1,
            round: RoundState::new(rules.max_bid),
            records: Vec::new(),
            history: RoundHistory::new(),
            retired: BTreeMap::new(),
            end_bonus_applied: false,
            rules,
            players,
        })
    }

    /// Партия по списку имён; id раздаёт `IdGenerator`.
    pub fn with_names(
        rules: RuleConfig,
        names: &[&str],
        ids: &IdGenerator,
    ) -> Result<Self, EngineError> {
        let profiles = names
            .iter()
            .map(|name| PlayerProfile::new(ids.next_player_id(), *name))
            .collect();
        Self::new(ids.next_session_id(), rules, profiles)
    }

    // ---------- чтение ----------

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round_number(&self) -> RoundNumber {
        self.round_number
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn ledger(&self) -> &TokenLedger {
        &self.ledger
    }

    pub fn stats(&self) -> &StatisticsTracker {
        &self.stats
    }

    pub fn records(&self) -> &[RoundRecord] {
        &self.records
    }

    pub fn history(&self) -> &RoundHistory {
        &self.history
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Счёт в порядке рассадки.
    pub fn scores(&self) -> Vec<(PlayerId, u32)> {
        self.players.iter().map(|p| (p.id, p.score)).collect()
    }

    pub fn score(&self, player_id: PlayerId) -> Option<u32> {
        self.player(player_id).map(|p| p.score)
    }

    pub fn inventory(&self, player_id: PlayerId) -> Option<&TokenInventory> {
        self.ledger.inventory(player_id)
    }

    pub fn token_count(&self, player_id: PlayerId, denomination: Denomination) -> u32 {
        self.ledger.count(player_id, denomination)
    }

    pub fn current_bid(&self) -> u32 {
        self.round.bidding.current_bid
    }

    pub fn high_bidder(&self) -> Option<PlayerId> {
        self.round.bidding.high_bidder
    }

    /// Победитель торгов текущего раунда.
    pub fn bidder(&self) -> Option<PlayerId> {
        self.round.bidding.winner().map(|(bidder, _)| bidder)
    }

    pub fn current_blocker(&self) -> Option<PlayerId> {
        if self.phase == Phase::Blocking {
            self.round.blocking.current_blocker()
        } else {
            None
        }
    }

    pub fn retired_items(&self, category: &str) -> Vec<ItemId> {
        self.retired
            .get(category)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }

    // ---------- внутренние помощники ----------

    fn transition(&mut self, to: Phase) -> Result<(), EngineError> {
        ensure_transition(self.phase, to)?;
        let from = self.phase;
        self.phase = to;
        self.history.push(RoundEventKind::PhaseChanged { from, to });
        info!(round = self.round_number, %from, %to, "смена фазы");
        Ok(())
    }

    /// Сброс в начало партии из любой фазы, мимо таблицы переходов.
    fn restart_phase(&mut self) {
        let from = self.phase;
        let to = Phase::CategoryChoice;
        self.phase = to;
        self.history.push(RoundEventKind::PhaseChanged { from, to });
        info!(%from, %to, "сброс фазы");
    }

    fn category(&self) -> Result<CategoryId, EngineError> {
        self.round
            .category
            .clone()
            .ok_or(EngineError::Internal("категория раунда не выбрана"))
    }

    fn winning_bid(&self) -> Result<(PlayerId, u32), EngineError> {
        self.round
            .bidding
            .winner()
            .ok_or(EngineError::Internal("торги не закрыты"))
    }

    // ---------- категория и пул ----------

    /// Выбрать категорию; задание берётся случайно из заданий категории.
    pub fn choose_category<C, R>(
        &mut self,
        catalog: &C,
        category: &str,
        rng: &mut R,
    ) -> Result<Prompt, EngineError>
    where
        C: CatalogAdapter + ?Sized,
        R: RandomSource,
    {
        ensure_phase(self.phase, Phase::CategoryChoice)?;

        if catalog.item_ids(category).is_none() {
            return Err(EngineError::UnknownCategory(category.to_string()));
        }
        let prompts = catalog
            .prompts(category)
            .ok_or_else(|| EngineError::UnknownCategory(category.to_string()))?;
        if prompts.is_empty() {
            return Err(EngineError::UnknownPrompt(category.to_string()));
        }

        let mut order: Vec<usize> = (0..prompts.len()).collect();
        rng.shuffle(&mut order);
        let prompt = prompts[order[0]].clone();

        let mut round = RoundState::new(self.rules.max_bid);
        round.category = Some(category.to_string());
        round.prompt = Some(prompt.clone());
        self.round = round;

        self.history.push(RoundEventKind::RoundStarted {
            round: self.round_number,
            category: category.to_string(),
            attribute: prompt.attribute.clone(),
        });
        self.transition(Phase::Drawing)?;

        Ok(prompt)
    }

    /// Заменить задание до вытягивания пула (только задания этой категории).
    pub fn set_prompt<C>(&mut self, catalog: &C, prompt: Prompt) -> Result<(), EngineError>
    where
        C: CatalogAdapter + ?Sized,
    {
        ensure_phase(self.phase, Phase::Drawing)?;

        let category = self.category()?;
        let known = catalog
            .prompts(&category)
            .ok_or_else(|| EngineError::UnknownCategory(category.clone()))?;
        if !known.contains(&prompt) {
            return Err(EngineError::UnknownPrompt(category));
        }

        debug!(attribute = %prompt.attribute, "задание заменено");
        self.round.prompt = Some(prompt);
        Ok(())
    }

    /// Вытянуть пул: без карточек во владении и выбывших. Открывает торги.
    pub fn draw_pool<C, R>(&mut self, catalog: &C, rng: &mut R) -> Result<Vec<ItemId>, EngineError>
    where
        C: CatalogAdapter + ?Sized,
        R: RandomSource,
    {
        ensure_phase(self.phase, Phase::Drawing)?;

        let category = self.category()?;
        let all = catalog
            .item_ids(&category)
            .ok_or_else(|| EngineError::UnknownCategory(category.clone()))?;

        let owned = self.ledger.owned_by_anyone(&category);
        let retired = self.retired.get(&category);
        let mut candidates: Vec<ItemId> = all
            .into_iter()
            .filter(|id| !owned.contains(id))
            .filter(|id| retired.map_or(true, |r| !r.contains(id)))
            .collect();

        rng.shuffle(&mut candidates);
        candidates.truncate(self.rules.pool_size as usize);

        if candidates.len() < self.rules.pool_size as usize {
            warn!(
                category = %category,
                drawn = candidates.len(),
                wanted = self.rules.pool_size,
                "в колоде категории меньше карточек, чем размер пула"
            );
        }

        self.round.pool = candidates.clone();
        let participants = self.players.iter().map(|p| p.id).collect();
        self.round.bidding.open(participants);

        self.history.push(RoundEventKind::PoolDrawn {
            items: candidates.clone(),
        });
        self.transition(Phase::Bidding)?;

        Ok(candidates)
    }

    // ---------- торги ----------

    /// Ставка игрока: всегда текущая + 1. Возвращает принятую ставку.
    pub fn place_bid(&mut self, player_id: PlayerId) -> Result<u32, EngineError> {
        ensure_phase(self.phase, Phase::Bidding)?;
        ensure_player(&self.players, player_id)?;

        let amount = self.round.bidding.next_bid();
        let outcome = self.round.bidding.bid(player_id, amount)?;

        self.stats.record(player_id, StatEvent::BidPlaced);
        self.history
            .push(RoundEventKind::BidPlaced { player_id, amount });
        debug!(player = player_id, amount, "ставка");

        if let BidOutcome::Resolved { bidder, amount } = outcome {
            self.on_bidding_resolved(bidder, amount)?;
        }

        Ok(amount)
    }

    pub fn pass(&mut self, player_id: PlayerId) -> Result<PassOutcome, EngineError> {
        ensure_phase(self.phase, Phase::Bidding)?;
        ensure_player(&self.players, player_id)?;

        let outcome = self.round.bidding.pass(player_id)?;

        self.stats.record(player_id, StatEvent::Passed);
        self.history.push(RoundEventKind::Passed { player_id });
        debug!(player = player_id, "пас");

        match outcome {
            PassOutcome::Continue => {}
            PassOutcome::Restarted => {
                self.history.push(RoundEventKind::BiddingRestarted);
                info!(round = self.round_number, "все спасовали без ставок, торги заново");
            }
            PassOutcome::Resolved { bidder, amount } => {
                self.on_bidding_resolved(bidder, amount)?;
            }
        }

        Ok(outcome)
    }

    fn on_bidding_resolved(&mut self, bidder: PlayerId, amount: u32) -> Result<(), EngineError> {
        self.history
            .push(RoundEventKind::BiddingResolved { bidder, amount });
        info!(round = self.round_number, bidder, amount, "торги закрыты");

        let order = if self.rules.allow_blocking {
            blocking_order(&self.players, bidder)
        } else {
            Vec::new()
        };
        self.round.blocking = BlockingState::new(order);
        self.transition(Phase::Blocking)?;

        if self.round.blocking.is_complete() {
            self.finish_blocking()?;
        }
        Ok(())
    }

    // ---------- блокировка ----------

    pub fn spend_block_token(
        &mut self,
        player_id: PlayerId,
        denomination: Denomination,
        item_id: &str,
    ) -> Result<(), EngineError> {
        ensure_phase(self.phase, Phase::Blocking)?;
        ensure_player(&self.players, player_id)?;

        let inventory = self
            .ledger
            .inventory(player_id)
            .ok_or(EngineError::UnknownPlayer(player_id))?;
        let record = self.round.blocking.block(
            player_id,
            denomination,
            item_id,
            &self.round.pool,
            inventory,
        )?;

        self.stats.record(player_id, StatEvent::BlockMade);
        self.history.push(RoundEventKind::ItemBlocked {
            player_id,
            item_id: record.item_id,
            denomination,
        });
        debug!(player = player_id, item = item_id, %denomination, "блок");

        if self.round.blocking.is_complete() {
            self.finish_blocking()?;
        }
        Ok(())
    }

    pub fn skip_block(&mut self, player_id: PlayerId) -> Result<(), EngineError> {
        ensure_phase(self.phase, Phase::Blocking)?;
        ensure_player(&self.players, player_id)?;

        self.round.blocking.skip(player_id)?;

        self.history.push(RoundEventKind::BlockSkipped { player_id });
        debug!(player = player_id, "пропуск блока");

        if self.round.blocking.is_complete() {
            self.finish_blocking()?;
        }
        Ok(())
    }

    /// Конец блокировки: либо автоматический провал, либо выбор карточек.
    fn finish_blocking(&mut self) -> Result<(), EngineError> {
        let (bidder, bid) = self.winning_bid()?;
        let available = self.round.available_items();

        if !pool_covers_bid(available.len(), bid) {
            info!(
                round = self.round_number,
                remaining = available.len(),
                bid,
                "карточек меньше ставки, автоматический провал"
            );
            self.round.outcome = Some(RoundOutcome::insufficient_pool());
            return self.transition(Phase::Scoring);
        }

        let owned_available = if self.rules.token_ownership && self.rules.allow_owned_in_selection {
            let category = self.category()?;
            self.ledger.owned_in_category(bidder, &category)
        } else {
            Vec::new()
        };

        self.round.selection = Some(SelectionState::new(bid, available, owned_available));
        self.transition(Phase::Selection)
    }

    // ---------- выбор ----------

    /// Биддер берёт карточку. Карточка из коллекции сгорает сразу.
    pub fn select_item(
        &mut self,
        player_id: PlayerId,
        item_id: &str,
    ) -> Result<SelectionSource, EngineError> {
        ensure_phase(self.phase, Phase::Selection)?;
        ensure_player(&self.players, player_id)?;

        let (bidder, _) = self.winning_bid()?;
        if player_id != bidder {
            return Err(EngineError::NotPlayersTurn(player_id));
        }
        let category = self.category()?;

        let selection = self
            .round
            .selection
            .as_mut()
            .ok_or(EngineError::Internal("нет состояния выбора"))?;
        let source = selection.select(item_id)?;
        let complete = selection.is_complete();

        if source == SelectionSource::Owned {
            self.ledger.consume_owned(bidder, &category, item_id);
            // Использованная карточка из коллекции в колоду не возвращается.
            self.retired
                .entry(category)
                .or_default()
                .insert(item_id.to_string());
        }

        self.history.push(RoundEventKind::ItemSelected {
            item_id: item_id.to_string(),
            from_owned: source == SelectionSource::Owned,
        });
        debug!(player = player_id, item = item_id, ?source, "карточка выбрана");

        if complete {
            self.transition(Phase::Ranking)?;
        }
        Ok(source)
    }

    // ---------- ранжирование и вскрытие ----------

    /// Порядок биддера: перестановка выбранных карточек.
    pub fn submit_ranking<C>(&mut self, catalog: &C, ordering: Vec<ItemId>) -> Result<(), EngineError>
    where
        C: CatalogAdapter + ?Sized,
    {
        ensure_phase(self.phase, Phase::Ranking)?;

        let selection = self
            .round
            .selection
            .as_ref()
            .ok_or(EngineError::Internal("нет состояния выбора"))?;

        let mut expected: Vec<&ItemId> = selection.selected.iter().collect();
        let mut got: Vec<&ItemId> = ordering.iter().collect();
        expected.sort();
        got.sort();
        if expected != got {
            return Err(EngineError::RankingMismatch);
        }

        let prompt = self
            .round
            .prompt
            .clone()
            .ok_or(EngineError::Internal("задание раунда не выбрано"))?;

        let ranked = ordering
            .iter()
            .map(|id| {
                catalog
                    .attribute(id, &prompt.attribute)
                    .map(|value| RankedItem {
                        item_id: id.clone(),
                        value,
                    })
                    .ok_or_else(|| EngineError::MissingAttribute {
                        item: id.clone(),
                        attribute: prompt.attribute.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let validator = RevealValidator::new(ranked, prompt.direction);
        let already_terminal = validator.is_terminal();

        self.round.ranking = ordering.clone();
        self.round.reveal = Some(validator);
        self.history
            .push(RoundEventKind::RankingSubmitted { ranking: ordering });
        self.transition(Phase::Reveal)?;

        if already_terminal {
            self.round.outcome = Some(RoundOutcome::succeeded());
            self.transition(Phase::Scoring)?;
        }
        Ok(())
    }

    /// Открыть следующую карточку. После вердикта: no-op.
    pub fn reveal(&mut self) -> Result<RevealStatus, EngineError> {
        if self.phase != Phase::Reveal {
            if let Some(validator) = self.round.reveal.as_ref() {
                if validator.is_terminal()
                    && matches!(
                        self.phase,
                        Phase::Scoring | Phase::RoundComplete | Phase::GameOver
                    )
                {
                    return Ok(validator.status);
                }
            }
            ensure_phase(self.phase, Phase::Reveal)?;
        }

        let validator = self
            .round
            .reveal
            .as_mut()
            .ok_or(EngineError::Internal("нет валидатора вскрытия"))?;

        let index = validator.revealed;
        let status = validator.reveal();
        let in_sequence = validator.marks.get(index) == Some(&RevealMark::InSequence);
        let break_index = validator.break_index;

        self.history
            .push(RoundEventKind::ItemRevealed { index, in_sequence });
        debug!(index, in_sequence, "карточка открыта");

        if status.is_terminal() {
            let outcome = match (status, break_index) {
                (RevealStatus::Failed, Some(i)) => RoundOutcome::sequence_break(i),
                (RevealStatus::Failed, None) => {
                    return Err(EngineError::Internal("провал без позиции разрыва"))
                }
                _ => RoundOutcome::succeeded(),
            };
            self.round.outcome = Some(outcome);
            self.transition(Phase::Scoring)?;
        }

        Ok(status)
    }

    /// Вскрыть всё до вердикта.
    pub fn reveal_all(&mut self) -> Result<RevealStatus, EngineError> {
        loop {
            let status = self.reveal()?;
            if status.is_terminal() {
                return Ok(status);
            }
        }
    }

    // ---------- скоринг и переход раундов ----------

    /// Начислить очки за раунд. Второй вызов: `RoundAlreadyScored`.
    pub fn score_round(&mut self) -> Result<ScoringReport, EngineError> {
        if self.round.scored {
            return Err(EngineError::RoundAlreadyScored(self.round_number));
        }
        ensure_phase(self.phase, Phase::Scoring)?;

        let outcome = self
            .round
            .outcome
            .ok_or(EngineError::Internal("нет итога раунда"))?;
        let (bidder, bid) = self.winning_bid()?;
        let category = self.category()?;
        let prompt = self
            .round
            .prompt
            .clone()
            .ok_or(EngineError::Internal("задание раунда не выбрано"))?;

        let selected = self
            .round
            .selection
            .as_ref()
            .map(|s| s.selected.clone())
            .unwrap_or_default();
        let ranked_count = if outcome.reason == Some(FailureReason::InsufficientPool) {
            0
        } else {
            selected.len() as u32
        };
        let blocks = self.round.blocking.blocks.clone();

        let report = {
            let mut ctx = ScoringContext {
                rules: &self.rules,
                players: &mut self.players,
                ledger: &mut self.ledger,
                stats: &mut self.stats,
                history: &mut self.history,
            };
            let input = ScoringInput {
                bidder,
                bid,
                category: &category,
                blocks: &blocks,
                outcome,
                ranked_count,
            };
            scoring::apply_round_scoring(&mut ctx, &input)?
        };

        self.stats.record(bidder, StatEvent::BidWon);

        if !self.rules.refresh_used_items && !selected.is_empty() {
            self.retired
                .entry(category.clone())
                .or_default()
                .extend(selected.iter().cloned());
        }

        self.records.push(RoundRecord {
            number: self.round_number,
            category,
            prompt,
            bidder,
            bid,
            pool: self.round.pool.clone(),
            blocks,
            selected,
            ranking: self.round.ranking.clone(),
            outcome,
        });
        self.round.scored = true;
        self.history.push(RoundEventKind::RoundScored {
            round: self.round_number,
            outcome,
        });

        self.ledger.verify_conservation()?;

        info!(
            round = self.round_number,
            bidder,
            bid,
            success = outcome.success,
            "раунд завершён"
        );
        self.transition(Phase::RoundComplete)?;

        Ok(report)
    }

    /// Закончена ли партия по лимиту раундов или по очкам.
    pub fn should_end(&self) -> bool {
        self.round_number >= self.rules.max_rounds
            || self
                .players
                .iter()
                .any(|p| p.score >= self.rules.winning_score)
    }

    /// Следующий раунд или конец партии.
    pub fn advance_round(&mut self) -> Result<Phase, EngineError> {
        ensure_phase(self.phase, Phase::RoundComplete)?;

        if self.should_end() {
            self.apply_end_game_bonuses();
            self.transition(Phase::GameOver)?;

            let winners = self.winners();
            self.history.push(RoundEventKind::GameFinished {
                winners: winners.clone(),
            });
            info!(rounds = self.round_number, ?winners, "партия окончена");
        } else {
            self.round_number += 1;
            self.round = RoundState::new(self.rules.max_bid);
            self.transition(Phase::CategoryChoice)?;
        }

        Ok(self.phase)
    }

    /// Бонусы конца партии. Применяются один раз; повторный вызов: пустой результат.
    pub fn apply_end_game_bonuses(&mut self) -> Vec<(PlayerId, u32)> {
        if self.end_bonus_applied {
            return Vec::new();
        }
        self.end_bonus_applied = true;
        scoring::apply_end_game_bonuses(
            &self.rules,
            &mut self.players,
            &self.ledger,
            &mut self.history,
        )
    }

    /// Победители: все, кто набрал порог и делит максимальный счёт,
    /// в порядке рассадки. Пусто, если порог не набрал никто.
    pub fn winners(&self) -> Vec<PlayerId> {
        let threshold = self.rules.winning_score;
        let top = self
            .players
            .iter()
            .filter(|p| p.score >= threshold)
            .map(|p| p.score)
            .max();

        match top {
            Some(top) => self
                .players
                .iter()
                .filter(|p| p.score == top)
                .map(|p| p.id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Итоговая таблица по убыванию счёта, при равенстве по рассадке.
    pub fn final_standings(&self) -> Vec<&Player> {
        let mut standings: Vec<&Player> = self.players.iter().collect();
        standings.sort_by(|a, b| b.score.cmp(&a.score));
        standings
    }

    // ---------- управление партией ----------

    /// Новая партия с теми же игроками и правилами. Статистика сохраняется.
    pub fn start_new_game(&mut self) {
        let ids: Vec<PlayerId> = self.players.iter().map(|p| p.id).collect();
        for p in &mut self.players {
            p.score = 0;
        }
        self.ledger = TokenLedger::new(&ids, self.rules.starting_tokens_per_denomination);
        self.retired.clear();
        self.records.clear();
        self.history.clear();
        self.round_number = 1;
        self.round = RoundState::new(self.rules.max_bid);
        self.end_bonus_applied = false;
        self.restart_phase();

        info!(session = self.id, "новая партия с теми же игроками");
    }

    /// Полный сброс статистики.
    pub fn reset_statistics(&mut self) {
        self.stats.reset();
    }

    /// Заменить правила. Только до первого раунда или после конца партии.
    pub fn apply_rules(&mut self, rules: RuleConfig) -> Result<(), EngineError> {
        rules.validate()?;

        let before_first_round = self.phase == Phase::CategoryChoice
            && self.round_number == 1
            && self.records.is_empty();
        if !before_first_round && self.phase != Phase::GameOver {
            return Err(EngineError::RulesLocked);
        }

        self.rules = rules;
        if before_first_round {
            let ids: Vec<PlayerId> = self.players.iter().map(|p| p.id).collect();
            self.ledger = TokenLedger::new(&ids, self.rules.starting_tokens_per_denomination);
            self.round = RoundState::new(self.rules.max_bid);
        }

        info!(session = self.id, "правила обновлены");
        Ok(())
    }

    /// Единая точка входа для действий игроков.
    pub fn apply_action(&mut self, action: PlayerAction) -> Result<(), EngineError> {
        ensure_phase(self.phase, required_phase(&action.kind))?;

        match action.kind {
            PlayerActionKind::Bid => self.place_bid(action.player_id).map(|_| ()),
            PlayerActionKind::Pass => self.pass(action.player_id).map(|_| ()),
            PlayerActionKind::Block {
                denomination,
                item_id,
            } => self.spend_block_token(action.player_id, denomination, &item_id),
            PlayerActionKind::SkipBlock => self.skip_block(action.player_id),
            PlayerActionKind::SelectItem(item_id) => {
                self.select_item(action.player_id, &item_id).map(|_| ())
            }
        }
    }
}
