//! Session, catalog, and playlist flows through the fully wired client.

use std::sync::Arc;

use bridge_desktop::MemoryStateStore;
use core_client::{
    AuthError, ClientError, InteractionKind, InteractionState, MockGateway, StreamingClient,
    TrackId, SESSION_STORAGE_KEY,
};
use bridge_traits::StateStore;

fn client_with(gateway: Arc<MockGateway>, storage: Arc<MemoryStateStore>) -> StreamingClient {
    StreamingClient::with_gateway(gateway, storage)
}

#[tokio::test]
async fn session_survives_a_restart() {
    let gateway = Arc::new(MockGateway::with_sample_catalog());
    let storage = Arc::new(MemoryStateStore::default());

    let first = client_with(gateway.clone(), storage.clone());
    let session = first.session().register("ada", "pw").await.unwrap();

    // A fresh client over the same storage picks the session back up.
    let second = client_with(gateway, storage);
    assert!(!second.session().is_authenticated());
    let restored = second.session().restore().await.unwrap();
    assert_eq!(restored, Some(session));
    assert!(second.session().is_authenticated());
}

#[tokio::test]
async fn corrupt_session_blob_degrades_to_logged_out() {
    let gateway = Arc::new(MockGateway::new());
    let storage = Arc::new(MemoryStateStore::default());
    storage
        .set(SESSION_STORAGE_KEY, "definitely not json")
        .await
        .unwrap();

    let client = client_with(gateway, storage.clone());
    assert_eq!(client.session().restore().await.unwrap(), None);
    assert!(!client.session().is_authenticated());
    assert_eq!(storage.get(SESSION_STORAGE_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn wrong_credentials_map_to_auth_errors() {
    let gateway = Arc::new(MockGateway::new());
    let client = client_with(gateway, Arc::new(MemoryStateStore::default()));

    client.session().register("ada", "pw").await.unwrap();
    client.session().logout().await;

    let err = client.session().login("ada", "nope").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Auth(AuthError::InvalidCredentials)
    ));

    let err = client.session().register("ada", "pw").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Auth(AuthError::DuplicateUsername)
    ));
}

#[tokio::test]
async fn like_then_unlike_roundtrips_through_the_backend() {
    let gateway = Arc::new(MockGateway::with_sample_catalog());
    let client = client_with(gateway.clone(), Arc::new(MemoryStateStore::default()));
    client.catalog().load().await.unwrap();
    let id = TrackId::from("s1");

    assert_eq!(
        client.catalog().toggle_like(&id).await.unwrap(),
        InteractionState::Liked
    );
    // The mock backend applied the state, so a reload agrees with the cache.
    let reloaded = client.catalog().load().await.unwrap();
    let track = reloaded.iter().find(|t| t.id == id).unwrap();
    assert!(track.state.is_liked());

    assert_eq!(
        client.catalog().toggle_like(&id).await.unwrap(),
        InteractionState::None
    );
    assert_eq!(
        gateway.interactions_for(&id).await,
        vec![InteractionKind::Like, InteractionKind::Unlike]
    );
}

#[tokio::test]
async fn playlist_membership_roundtrip() {
    let gateway = Arc::new(MockGateway::with_sample_catalog());
    let client = client_with(gateway.clone(), Arc::new(MemoryStateStore::default()));

    let playlist = client.playlists().create("Focus", "deep work").await.unwrap();
    let track = TrackId::from("s3");

    let members = client
        .playlists()
        .add_track(&playlist.id, &track)
        .await
        .unwrap();
    assert_eq!(members.len(), 1);

    // A second add is idempotent.
    let members = client
        .playlists()
        .add_track(&playlist.id, &track)
        .await
        .unwrap();
    assert_eq!(members.len(), 1);

    let members = client
        .playlists()
        .remove_track(&playlist.id, &track)
        .await
        .unwrap();
    assert!(members.is_empty());

    assert_eq!(
        gateway.interactions_for(&track).await,
        vec![
            InteractionKind::AddToPlaylist,
            InteractionKind::AddToPlaylist,
            InteractionKind::RemoveFromPlaylist
        ]
    );

    client.playlists().delete(&playlist.id).await.unwrap();
    assert!(client.playlists().playlists().await.is_empty());
}

#[tokio::test]
async fn interaction_outage_does_not_break_the_stores() {
    let gateway = Arc::new(MockGateway::with_sample_catalog());
    let client = client_with(gateway.clone(), Arc::new(MemoryStateStore::default()));
    client.catalog().load().await.unwrap();
    let playlist = client.playlists().create("Robust", "").await.unwrap();

    gateway.set_fail_interactions(true);

    // Membership changes still go through; only the telemetry is lost.
    let members = client
        .playlists()
        .add_track(&playlist.id, &TrackId::from("s1"))
        .await
        .unwrap();
    assert_eq!(members.len(), 1);

    // Like toggles, by contrast, are the interaction; they surface the error
    // and leave the cache unchanged.
    let id = TrackId::from("s2");
    assert!(client.catalog().toggle_like(&id).await.is_err());
    assert_eq!(
        client.catalog().get(&id).await.unwrap().state,
        InteractionState::None
    );
}
