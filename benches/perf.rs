use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use kleague_ignobel::aggregate;
use kleague_ignobel::awards;
use kleague_ignobel::loader::RawEventRow;
use kleague_ignobel::metrics::Level;
use kleague_ignobel::model::Event;
use kleague_ignobel::preprocess;
use kleague_ignobel::scoring;
use kleague_ignobel::zones;

const TYPES: &[(&str, &str)] = &[
    ("Pass", "Successful"),
    ("Pass Received", ""),
    ("Tackle", "Unsuccessful"),
    ("Duel", "Successful"),
    ("Clearance", "Successful"),
    ("Shot", "Off Target"),
    ("Foul", "Yellow_Card"),
    ("Interception", "Successful"),
    ("Cross", "Unsuccessful"),
    ("Block", "Successful"),
];

fn synthetic_season(games: u64, events_per_game: u64) -> Vec<Event> {
    let mut rows = Vec::new();
    for game in 0..games {
        for i in 0..events_per_game {
            let team = 100 + ((game + i) % 12) as u32;
            let (type_name, result) = TYPES[(i as usize * 7 + game as usize) % TYPES.len()];
            let x = (i * 13 % 105) as f64;
            let y = (i * 7 % 68) as f64;
            rows.push(RawEventRow {
                game_id: game,
                period_id: if i < events_per_game / 2 { 1 } else { 2 },
                time_seconds: Some((i % 2700) as f64),
                action_id: i,
                team_id: team,
                player_id: Some((team * 100 + (i % 14) as u32) as f64),
                player_name_ko: Some(format!("P{}", i % 14)),
                team_name_ko: Some(format!("T{team}")),
                type_name: type_name.to_string(),
                result_name: (!result.is_empty()).then(|| result.to_string()),
                start_x: Some(x),
                start_y: Some(y),
                end_x: Some((x + 5.0).min(105.0)),
                end_y: Some(y),
            });
        }
    }
    preprocess::preprocess_events(&rows).0
}

fn bench_aggregate_players(c: &mut Criterion) {
    let events = synthetic_season(40, 1500);
    c.bench_function("aggregate_players", |b| {
        b.iter(|| {
            let players = aggregate::aggregate_players(black_box(&events));
            black_box(players.len());
        })
    });
}

fn bench_score_awards(c: &mut Criterion) {
    let events = synthetic_season(40, 1500);
    let players = aggregate::aggregate_players(&events);
    c.bench_function("score_player_awards", |b| {
        b.iter(|| {
            let scores = scoring::score_awards(awards::for_level(Level::Player), black_box(&players));
            black_box(scores.len());
        })
    });
}

fn bench_zone_profile(c: &mut Criterion) {
    let events = synthetic_season(40, 1500);
    c.bench_function("team_zone_profile", |b| {
        b.iter(|| {
            let zoned = zones::zoned_key_events(black_box(&events));
            let rows = zones::team_zone_profile(&zoned);
            black_box(rows.len());
        })
    });
}

criterion_group!(
    benches,
    bench_aggregate_players,
    bench_score_awards,
    bench_zone_profile
);
criterion_main!(benches);
