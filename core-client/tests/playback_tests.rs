//! Playback scenarios driven tick by tick against the in-memory gateway.

use std::sync::Arc;

use core_client::{
    InteractionKind, InteractionState, MockGateway, PlaybackEngine, Track, TrackId,
};

fn track(id: &str, title: &str, duration: u32) -> Track {
    Track {
        id: TrackId::from(id),
        title: title.to_string(),
        artist: "Artist".to_string(),
        album: "Album".to_string(),
        cover_url: "/image.jpeg".to_string(),
        duration_seconds: duration,
        popularity: None,
        explicit: None,
        genre: None,
        state: InteractionState::None,
    }
}

fn two_track_queue() -> Vec<Track> {
    vec![track("a", "First", 30), track("b", "Second", 40)]
}

#[tokio::test]
async fn queue_plays_through_to_the_end() {
    let gateway = Arc::new(MockGateway::new());
    let engine = PlaybackEngine::without_timer(gateway.clone());
    let queue = two_track_queue();
    engine.play_track(queue[0].clone(), Some(queue)).await;

    // First track: 30 seconds, then auto-advance.
    for _ in 0..30 {
        engine.tick(1.0).await;
    }
    let state = engine.state().await;
    assert_eq!(state.current_track.as_ref().unwrap().id, TrackId::from("b"));
    assert_eq!(state.queue_index, Some(1));
    assert!(state.is_playing);

    // Second track: 40 seconds, then nothing left; playback stops.
    for _ in 0..40 {
        engine.tick(1.0).await;
    }
    let state = engine.state().await;
    assert!(!state.is_playing);
    assert_eq!(state.position_seconds, 40.0);
    assert_eq!(state.current_track.as_ref().unwrap().id, TrackId::from("b"));

    assert_eq!(
        gateway.interactions_for(&TrackId::from("a")).await,
        vec![
            InteractionKind::Play,
            InteractionKind::Completed,
            InteractionKind::Skip
        ]
    );
    assert_eq!(
        gateway.interactions_for(&TrackId::from("b")).await,
        vec![InteractionKind::Play, InteractionKind::Completed]
    );
}

#[tokio::test]
async fn repeat_pins_the_current_track() {
    let gateway = Arc::new(MockGateway::new());
    let engine = PlaybackEngine::without_timer(gateway.clone());
    let queue = two_track_queue();
    engine.play_track(queue[0].clone(), Some(queue)).await;
    assert!(engine.toggle_repeat().await);

    // Loop the 30-second track twice.
    for _ in 0..60 {
        engine.tick(1.0).await;
    }
    let state = engine.state().await;
    assert!(state.is_playing);
    assert_eq!(state.current_track.as_ref().unwrap().id, TrackId::from("a"));
    assert_eq!(state.queue_index, Some(0));
    assert_eq!(
        gateway.interactions_for(&TrackId::from("a")).await,
        vec![
            InteractionKind::Play,
            InteractionKind::Completed,
            InteractionKind::Repeat,
            InteractionKind::Completed,
            InteractionKind::Repeat
        ]
    );
    assert!(gateway.interactions_for(&TrackId::from("b")).await.is_empty());

    // Turning repeat off lets the queue advance at the next boundary.
    assert!(!engine.toggle_repeat().await);
    for _ in 0..30 {
        engine.tick(1.0).await;
    }
    let state = engine.state().await;
    assert_eq!(state.current_track.as_ref().unwrap().id, TrackId::from("b"));
}

#[tokio::test]
async fn previous_steps_back_then_guards_the_queue_head() {
    let gateway = Arc::new(MockGateway::new());
    let engine = PlaybackEngine::without_timer(gateway.clone());
    let queue = two_track_queue();
    engine.play_track(queue[1].clone(), Some(queue)).await;

    // Anywhere past the first queue entry, previous steps back.
    engine.tick(10.0).await;
    engine.play_previous().await;
    let state = engine.state().await;
    assert_eq!(state.current_track.as_ref().unwrap().id, TrackId::from("a"));
    assert_eq!(state.queue_index, Some(0));
    assert_eq!(state.position_seconds, 0.0);

    // At the head, early in the track: nothing happens.
    engine.tick(2.0).await;
    engine.play_previous().await;
    let state = engine.state().await;
    assert_eq!(state.queue_index, Some(0));
    assert_eq!(state.position_seconds, 2.0);

    // At the head, deep into the track: previous restarts it in place.
    engine.tick(4.0).await;
    engine.play_previous().await;
    let state = engine.state().await;
    assert_eq!(state.queue_index, Some(0));
    assert_eq!(state.position_seconds, 0.0);
    assert_eq!(state.current_track.as_ref().unwrap().id, TrackId::from("a"));
}

#[tokio::test]
async fn fractional_ticks_accumulate_like_the_wall_clock() {
    let gateway = Arc::new(MockGateway::new());
    let engine = PlaybackEngine::without_timer(gateway);
    engine.play_track(track("a", "Short", 2), None).await;

    // 19 timer ticks of 0.1 s keep us short of the end.
    for _ in 0..19 {
        engine.tick(0.1).await;
    }
    let state = engine.state().await;
    assert!(state.is_playing);
    assert!(state.position_seconds < 2.0);

    // A couple more cross the boundary; position clamps to the duration.
    for _ in 0..3 {
        engine.tick(0.1).await;
    }
    let state = engine.state().await;
    assert!(!state.is_playing);
    assert_eq!(state.position_seconds, 2.0);
}

#[tokio::test]
async fn queue_editing_during_playback() {
    let gateway = Arc::new(MockGateway::new());
    let engine = PlaybackEngine::without_timer(gateway);
    engine.play_track(track("a", "First", 30), Some(vec![])).await;

    // The playing track is not in the queue; appending one makes it the
    // next stop.
    engine.add_to_queue(track("b", "Second", 40)).await;
    engine.play_next().await;
    let state = engine.state().await;
    assert_eq!(state.current_track.as_ref().unwrap().id, TrackId::from("b"));
    assert_eq!(state.queue_index, Some(0));

    engine.clear_queue().await;
    let state = engine.state().await;
    assert!(state.queue.is_empty());
    assert_eq!(state.queue_index, None);
    assert!(state.is_playing);
}
