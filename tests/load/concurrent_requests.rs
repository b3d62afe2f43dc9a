//! Concurrency tests: many tasks sharing one engine and store

use crate::fixtures::{day, TestNight, ACCOUNT};
use game_night::store::ScoreStore;
use game_night::types::NewScore;
use game_night::TeamRequest;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_test::assert_ok;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reads_and_writes() {
    let night = Arc::new(TestNight::new());
    let game = night.game("Dominion");
    let players: Vec<_> = (0..20).map(|i| night.player(&format!("p{}", i))).collect();

    let start = Instant::now();
    let mut handles = Vec::new();
    for (i, player) in players.iter().enumerate() {
        let night = night.clone();
        let player_id = player.id;
        let game_id = game.id;
        handles.push(tokio::spawn(async move {
            for round in 0..5 {
                night.store.append_score(
                    player_id,
                    NewScore {
                        game_id,
                        value: (i * 10 + round) as f64,
                        recorded_at: day(round as i64),
                    },
                )?;
                night.engine.skill_level(ACCOUNT, player_id, game_id)?;
                night.engine.leaderboard(ACCOUNT)?;
            }
            anyhow::Ok(())
        }));
    }

    let results = futures::future::join_all(handles).await;
    for result in results {
        let inner = result.expect("task panicked");
        assert_ok!(inner);
    }
    assert!(start.elapsed() < Duration::from_secs(30));

    let stats = night.store.stats().unwrap();
    assert_eq!(stats.score_events, 100);

    let leaderboard = night.engine.leaderboard(ACCOUNT).unwrap();
    assert_eq!(leaderboard.len(), 20);
    assert_eq!(leaderboard[0].username, "p19");
    assert_eq!(leaderboard[0].points, 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_team_generation() {
    let night = Arc::new(TestNight::new());
    let game = night.game("Codenames");
    let ids: Vec<_> = (0..12)
        .map(|i| {
            let player = night.player(&format!("agent{}", i));
            night.score(player.id, game.id, i as f64 + 1.0, 1);
            player.id
        })
        .collect();

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let night = night.clone();
            let request = TeamRequest {
                participants: ids.clone(),
                team_count: 2 + i % 3,
                game_id: game.id,
            };
            tokio::spawn(async move { night.engine.generate_teams(ACCOUNT, &request) })
        })
        .collect();

    for result in futures::future::join_all(handles).await {
        let assignment = result.expect("task panicked").unwrap();
        assert_eq!(assignment.buckets.len(), 12);
        assert_eq!(assignment.rows.len(), 12 / assignment.team_count);
    }
}
