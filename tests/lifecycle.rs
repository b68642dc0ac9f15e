use std::time::Duration;

use snake_arena::game::{Direction, Game, GameConfig, JoinError, Snake, Vector2};
use tokio::time::{sleep, timeout};

fn config() -> GameConfig {
    GameConfig::new(16, 30).with_seed(42)
}

async fn wait_for_game_over(game: &Game) {
    timeout(Duration::from_secs(60), async {
        while !game.is_game_over().await {
            sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("round should end");
}

#[tokio::test(start_paused = true)]
async fn test_names_are_unique_ignoring_case() {
    let game = Game::new(config());
    game.add_player("Alice").await.unwrap();

    assert!(matches!(
        game.add_player("alice").await,
        Err(JoinError::DuplicateName(_))
    ));
    assert_eq!(game.player_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_roster_caps_at_four() {
    let game = Game::new(config());
    for name in ["One", "Two", "Three", "Four"] {
        game.add_player(name).await.unwrap();
    }

    assert_eq!(
        game.add_player("Five").await.unwrap_err(),
        JoinError::RosterFull(4)
    );
    assert_eq!(game.player_count().await, 4);
}

#[tokio::test(start_paused = true)]
async fn test_tiny_board_rejects_players() {
    let game = Game::new(GameConfig::new(7, 7));

    assert_eq!(
        game.add_player("Alice").await.unwrap_err(),
        JoinError::NoSpawnRoom
    );
    assert_eq!(game.player_count().await, 0);
    assert!(!game.is_game_over().await);
}

#[test]
fn test_snake_moves_and_grows_from_the_tail() {
    let mut snake = Snake::new(Vector2::new(5, 5));

    snake.advance(Direction::Right.delta());
    assert_eq!(snake.head(), Vector2::new(6, 5));
    assert_eq!(snake.len(), 1);

    snake.grow_on_next_move();
    snake.advance(Direction::Right.delta());
    assert_eq!(snake.len(), 2);
    assert_eq!(snake.segments(), &[Vector2::new(7, 5), Vector2::new(6, 5)]);
}

#[tokio::test(start_paused = true)]
async fn test_lone_player_round_ends_and_resets() {
    let game = Game::new(config());
    let alice = game.add_player("Alice").await.unwrap();
    // a straight line always reaches a wall
    alice.set_direction(Some(Direction::Left));

    let runner = game.clone();
    let simulation = tokio::spawn(async move { runner.start().await });

    wait_for_game_over(&game).await;
    let snapshot = game.snapshot().await;
    assert!(snapshot.game_over);
    assert!(!snapshot.players[0].alive);

    // the loop keeps idling on game over until told otherwise
    sleep(Duration::from_millis(500)).await;
    assert!(!simulation.is_finished());

    assert!(game.reset(true).await);
    assert!(!game.reset(true).await);
    let snapshot = game.snapshot().await;
    assert!(!snapshot.game_over);
    assert_eq!(snapshot.round, 1);
    assert_eq!(snapshot.players[0].score, 0);
    assert!(snapshot.food.is_empty());

    game.quit(true);
    timeout(Duration::from_millis(100), simulation)
        .await
        .expect("quit should cut the grace period short")
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_tron_round_has_no_food_and_long_trails() {
    let game = Game::new(config().with_tron(true));
    let alice = game.add_player("Alice").await.unwrap();
    game.add_player("Bob").await.unwrap();
    alice.set_direction(Some(Direction::Up));

    let runner = game.clone();
    let simulation = tokio::spawn(async move { runner.start().await });

    sleep(Duration::from_millis(900)).await;
    let snapshot = game.snapshot().await;
    assert!(snapshot.food.is_empty());
    for player in snapshot.players.iter().filter(|player| player.alive) {
        assert!(player.segments.len() > 1);
    }

    game.quit(true);
    simulation.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_scores_never_drop_while_running() {
    let game = Game::new(config());
    for name in ["A", "B", "C"] {
        game.add_player(name).await.unwrap();
    }

    let runner = game.clone();
    let simulation = tokio::spawn(async move { runner.start().await });

    let mut last = vec![0u32; 3];
    for _ in 0..100 {
        sleep(Duration::from_millis(50)).await;
        let snapshot = game.snapshot().await;
        if snapshot.game_over {
            break;
        }
        for (index, player) in snapshot.players.iter().enumerate() {
            assert!(player.score >= last[index]);
            last[index] = player.score;
        }
    }

    game.quit(true);
    simulation.await.unwrap();
}
