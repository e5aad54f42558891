use crate::helpers::TestApp;
use dexrank_api::domain::MilestoneState;

#[actix_rt::test]
async fn milestone_starts_unblocked() {
    let app = TestApp::spawn().await;

    let response = app.get_milestone().await;

    assert_eq!(200, response.status().as_u16());
    let state: MilestoneState = response.json().await.expect("Failed to parse as JSON");
    assert!(!state.blocked);
    assert_eq!(state.crossed_count, 0);
    assert_eq!(state.next_threshold, Some(10));
}

#[actix_rt::test]
async fn dismissed_milestone_unblocks_after_the_grace_delay() {
    // Arrange
    let app = TestApp::spawn_with(|c| {
        c.session.thresholds = vec![2, 5];
        c.session.grace_delay_ms = 300;
    })
    .await;
    app.play_battle().await;
    app.play_battle().await;

    let state: MilestoneState = app.get_milestone().await.json().await.unwrap();
    assert!(state.blocked);
    assert_eq!(state.crossed_count, 1);
    assert_eq!(409, app.post_next_battle().await.status().as_u16());

    // Act
    let response = app.post_dismiss().await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let state: MilestoneState = response.json().await.expect("Failed to parse as JSON");
    assert!(state.blocked);
    assert_eq!(state.unblock_due_ms, Some(app.clock_ms() + 300));

    app.clock.advance(299);
    assert_eq!(409, app.post_next_battle().await.status().as_u16());
    app.clock.advance(1);
    assert_eq!(200, app.post_next_battle().await.status().as_u16());
    let state: MilestoneState = app.get_milestone().await.json().await.unwrap();
    assert!(!state.blocked);
    assert_eq!(state.next_threshold, Some(5));
}
