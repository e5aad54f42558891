use crate::helpers::TestApp;
use dexrank_api::domain::{RankedItem, SessionState};

#[actix_rt::test]
async fn reset_clears_all_progress() {
    // Arrange
    let app = TestApp::spawn().await;
    app.play_battle().await;
    app.play_battle().await;

    // Act
    let response = app.post("session/reset", String::new()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let view: Vec<RankedItem> = app.get_ranking().await.json().await.unwrap();
    assert!(view.iter().all(|item| item.battle_count == 0));
    let state: SessionState = app.get("session/state").await.json().await.unwrap();
    assert_eq!(state.battle_counter, 0);
    assert!(state.ratings.is_empty());
}

#[actix_rt::test]
async fn exported_state_can_be_imported_elsewhere() {
    // Arrange
    let source = TestApp::spawn().await;
    for _ in 0..3 {
        source.play_battle().await;
    }
    let exported: serde_json::Value = source.get("session/state").await.json().await.unwrap();
    let target = TestApp::spawn().await;

    // Act
    let response = target.post_json("session/state", &exported).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let imported: serde_json::Value = target.get("session/state").await.json().await.unwrap();
    assert_eq!(imported, exported);
    let source_view: Vec<RankedItem> = source.get_ranking().await.json().await.unwrap();
    let target_view: Vec<RankedItem> = target.get_ranking().await.json().await.unwrap();
    assert_eq!(source_view, target_view);
}

#[actix_rt::test]
async fn import_returns_a_400_for_unknown_items() {
    // Arrange
    let app = TestApp::spawn().await;
    let state = serde_json::json!({
        "ratings": [{ "item_id": 9999, "rating": { "mu": 30.0, "sig": 2.0 }, "battle_count": 4 }],
        "battle_counter": 2,
        "refinement_queue": []
    });

    // Act
    let response = app.post_json("session/state", &state).await;

    // Assert
    assert_eq!(400, response.status().as_u16());
    let exported: SessionState = app.get("session/state").await.json().await.unwrap();
    assert_eq!(exported.battle_counter, 0);
}
