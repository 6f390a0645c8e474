use std::sync::Arc;
use std::time::Duration;

use sssp_trace::graph::samples::simple_graph;
use sssp_trace::runner::SideBySide;
use sssp_trace::{AlgorithmKind, Error, PlaybackConfig, Player, StepRunner};

fn classic_runner() -> StepRunner<f64> {
    StepRunner::initialize(Arc::new(simple_graph().unwrap()), "A", AlgorithmKind::Classic).unwrap()
}

#[test]
fn test_initialize_caches_first_step() {
    let runner = classic_runner();
    assert_eq!(runner.cursor(), 0);
    assert_eq!(runner.steps().len(), 1);
    assert_eq!(runner.current_step().unwrap().tag(), "init");
    assert!(!runner.is_exhausted());
    assert!(!runner.is_complete());
}

#[test]
fn test_initialize_rejects_unknown_source() {
    let graph = Arc::new(simple_graph().unwrap());
    let err = StepRunner::initialize(graph, "Q", AlgorithmKind::PivotReduced).unwrap_err();
    assert!(matches!(err, Error::UnknownSource(_)));
}

#[test]
fn test_forward_and_backward_reuse_cache() {
    let mut runner = classic_runner();
    assert!(!runner.step_backward());

    for _ in 0..4 {
        assert!(runner.step_forward());
    }
    assert_eq!(runner.cursor(), 4);
    assert_eq!(runner.steps().len(), 5);
    let fourth = runner.current_step().unwrap().clone();

    assert!(runner.step_backward());
    assert!(runner.step_backward());
    assert_eq!(runner.cursor(), 2);

    // Moving forward again replays cached steps without pulling new ones
    assert!(runner.step_forward());
    assert!(runner.step_forward());
    assert_eq!(runner.steps().len(), 5);
    assert_eq!(runner.current_step().unwrap().kind, fourth.kind);
}

#[test]
fn test_go_to_only_reaches_cached_steps() {
    let mut runner = classic_runner();
    runner.step_forward();
    runner.step_forward();

    assert!(runner.go_to(0));
    assert_eq!(runner.cursor(), 0);
    assert!(runner.go_to(2));
    assert!(!runner.go_to(3));
    assert_eq!(runner.cursor(), 2);
}

#[test]
fn test_run_to_completion_and_reset() {
    let mut runner = classic_runner();
    runner.run_to_completion();

    assert!(runner.is_exhausted());
    assert!(runner.is_complete());
    let total = runner.steps().len();
    assert_eq!(runner.cursor(), total - 1);
    assert!(!runner.step_forward());
    assert_eq!(runner.cursor(), total - 1);

    runner.reset().unwrap();
    assert_eq!(runner.cursor(), 0);
    assert_eq!(runner.steps().len(), 1);
    assert!(!runner.is_exhausted());

    // A fresh sequence yields the same run
    runner.run_to_completion();
    assert_eq!(runner.steps().len(), total);
}

#[test]
fn test_side_by_side_lockstep() {
    let graph = Arc::new(simple_graph().unwrap());
    let mut both = SideBySide::new(graph, "A").unwrap();

    assert!(both.step_forward());
    assert_eq!(both.classic().cursor(), 1);
    assert_eq!(both.pivot().cursor(), 1);

    // The pivot run is shorter; it waits on done while the classic run continues
    while both.step_forward() {}
    assert!(both.is_complete());
    assert!(both.pivot().steps().len() < both.classic().steps().len());
    assert_eq!(both.classic().cursor(), both.classic().steps().len() - 1);

    both.reset().unwrap();
    assert_eq!(both.classic().cursor(), 0);
    assert!(!both.is_complete());

    both.run_to_completion();
    assert!(both.is_complete());
    assert!(both.step_backward());
}

#[tokio::test(start_paused = true)]
async fn test_player_advances_once_per_interval() {
    let mut player = Player::new(classic_runner(), PlaybackConfig::default());
    let runner = player.runner();

    player.play();
    assert!(player.is_playing());

    tokio::time::sleep(Duration::from_millis(1510)).await;
    assert_eq!(runner.lock().unwrap().cursor(), 3);

    player.pause();
    assert!(!player.is_playing());
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(runner.lock().unwrap().cursor(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_player_stops_at_end() {
    let mut player = Player::new(
        classic_runner(),
        PlaybackConfig::with_interval(Duration::from_millis(50)),
    );
    player.play();

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(!player.is_playing());

    let runner = player.runner();
    let runner = runner.lock().unwrap();
    assert!(runner.is_complete());
    assert!(runner.is_exhausted());
}

#[tokio::test(start_paused = true)]
async fn test_player_interval_change_restarts_timer() {
    let mut player = Player::new(classic_runner(), PlaybackConfig::default());
    player.play();
    player.set_interval(Duration::from_millis(100));
    assert!(player.is_playing());
    assert_eq!(player.config().interval, Duration::from_millis(100));

    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(player.runner().lock().unwrap().cursor(), 3);
}
