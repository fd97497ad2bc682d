use std::collections::BTreeMap;
use std::env;

use outrank_engine::domain::catalog::SortDirection;
use outrank_engine::domain::rules::RuleConfig;
use outrank_engine::domain::{ItemId, PlayerId};
use outrank_engine::engine::{EngineError, GameSession, Phase, RevealStatus};
use outrank_engine::infra::{CatalogAdapter, DeterministicRng, IdGenerator, InMemoryCatalog};
use tracing_subscriber::EnvFilter;

const CATEGORY: &str = "countries";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // outrank_dev_cli [preset] [seed]
    let args: Vec<String> = env::args().collect();
    let preset = args.get(1).map(String::as_str).unwrap_or("classic");
    let seed = args
        .get(2)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);

    println!("outrank_dev_cli: пресет `{preset}`, seed {seed}");

    if let Err(e) = run(preset, seed) {
        eprintln!("[CLI] ОШИБКА: {e} ({})", e.code());
        std::process::exit(1);
    }
}

fn run(preset: &str, seed: u64) -> Result<(), EngineError> {
    let rules = RuleConfig::preset(preset)?;
    let ids = IdGenerator::new();
    let catalog = InMemoryCatalog::demo();
    let mut rng = DeterministicRng::from_seed(seed);

    let mut session = GameSession::with_names(rules, &["Анна", "Борис", "Вера"], &ids)?;

    // Потолок ставки каждого бота: чем позже сел, тем смелее.
    let caps: BTreeMap<PlayerId, u32> = session
        .players()
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id, 2 + i as u32))
        .collect();

    while !session.is_game_over() {
        play_round(&mut session, &catalog, &mut rng, &caps)?;
        session.advance_round()?;
    }

    println!();
    println!("=== Итог партии ===");
    for p in session.final_standings() {
        let stats = session.stats().get(p.id);
        println!(
            "  {:<6} {:>3} очк. | ставок выиграно {}, успешных {}, блоков {}",
            p.name, p.score, stats.bids_won, stats.successful_rankings, stats.blocks_made
        );
    }
    let winners = session.winners();
    if winners.is_empty() {
        println!("Порог победы не набрал никто.");
    } else {
        let names: Vec<&str> = winners
            .iter()
            .filter_map(|id| session.player(*id).map(|p| p.name.as_str()))
            .collect();
        println!("Победа: {}", names.join(", "));
    }

    Ok(())
}

fn play_round(
    session: &mut GameSession,
    catalog: &InMemoryCatalog,
    rng: &mut DeterministicRng,
    caps: &BTreeMap<PlayerId, u32>,
) -> Result<(), EngineError> {
    let prompt = session.choose_category(catalog, CATEGORY, rng)?;
    let pool = session.draw_pool(catalog, rng)?;

    println!();
    println!(
        "--- Раунд {} | {} | пул: {} карточек ---",
        session.round_number(),
        prompt.label,
        pool.len()
    );

    // 1. Торги.
    let order: Vec<PlayerId> = session.players().iter().map(|p| p.id).collect();
    while session.phase() == Phase::Bidding {
        for &pid in &order {
            if session.phase() != Phase::Bidding {
                break;
            }
            if session.round().bidding.passed.contains(&pid) || session.high_bidder() == Some(pid) {
                continue;
            }
            let cap = caps.get(&pid).copied().unwrap_or(1);
            if session.round().bidding.next_bid() <= cap {
                session.place_bid(pid)?;
            } else {
                session.pass(pid)?;
            }
        }
    }

    let bidder = session
        .bidder()
        .ok_or(EngineError::Internal("торги не закрыты"))?;
    println!(
        "[BID] ставку {} выиграл {}",
        session.current_bid(),
        name_of(session, bidder)
    );

    // 2. Блокировка: самый крупный токен на первую свободную карточку.
    while let Some(blocker) = session.current_blocker() {
        let denomination = session
            .inventory(blocker)
            .and_then(|inv| inv.iter().filter(|(_, n)| *n > 0).map(|(d, _)| d).last());
        let target = session.round().available_items().into_iter().next();

        match (denomination, target) {
            (Some(d), Some(item)) => {
                session.spend_block_token(blocker, d, &item)?;
                println!("[BLOCK] {} блокирует {} токеном {}", name_of(session, blocker), item, d);
            }
            _ => {
                session.skip_block(blocker)?;
                println!("[BLOCK] {} пропускает", name_of(session, blocker));
            }
        }
    }

    // 3. Выбор и ранжирование.
    if session.phase() == Phase::Selection {
        let bid = session.current_bid() as usize;
        let picks: Vec<ItemId> = session.round().available_items().into_iter().take(bid).collect();
        for item in &picks {
            session.select_item(bidder, item)?;
        }

        let ranking = rank_like_a_bot(session, catalog, picks);
        session.submit_ranking(catalog, ranking.clone())?;
        println!("[RANK] {}: {}", name_of(session, bidder), ranking.join(" > "));

        match session.reveal_all()? {
            RevealStatus::Succeeded => println!("[REVEAL] порядок верный"),
            _ => println!(
                "[REVEAL] разрыв на позиции {:?}",
                session.round().reveal.as_ref().and_then(|v| v.break_index)
            ),
        }
    } else {
        println!("[AUTO-FAIL] после блоков карточек меньше ставки");
    }

    // 4. Очки.
    let report = session.score_round()?;
    for (pid, points) in &report.points {
        println!("[SCORE] {} +{}", name_of(session, *pid), points);
    }
    let scores: Vec<String> = session
        .players()
        .iter()
        .map(|p| format!("{}={}", p.name, p.score))
        .collect();
    println!("[SCORE] итого: {}", scores.join(", "));

    Ok(())
}

/// Биддер знает ответ наполовину: сортирует по атрибуту только нечётные раунды.
fn rank_like_a_bot(
    session: &GameSession,
    catalog: &InMemoryCatalog,
    mut picks: Vec<ItemId>,
) -> Vec<ItemId> {
    if session.round_number() % 2 == 0 {
        return picks;
    }
    if let Some(prompt) = session.round().prompt.as_ref() {
        let value = |id: &ItemId| catalog.attribute(id, &prompt.attribute).unwrap_or(0.0);
        picks.sort_by(|a, b| match prompt.direction {
            SortDirection::Descending => value(b).total_cmp(&value(a)),
            SortDirection::Ascending => value(a).total_cmp(&value(b)),
        });
    }
    picks
}

fn name_of(session: &GameSession, player_id: PlayerId) -> String {
    session
        .player(player_id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| format!("#{player_id}"))
}
