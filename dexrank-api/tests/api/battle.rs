use crate::helpers::TestApp;
use dexrank_api::domain::{ComparisonResult, ComparisonSet};

#[actix_rt::test]
async fn next_battle_returns_a_pair_from_the_catalog() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app.post_next_battle().await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let set: ComparisonSet = response.json().await.expect("Failed to parse as JSON");
    assert_eq!(set.arity, 2);
    assert_eq!(set.ids.len(), 2);
    assert_ne!(set.ids[0], set.ids[1]);
}

#[actix_rt::test]
async fn next_battle_is_reissued_until_answered() {
    let app = TestApp::spawn().await;

    let first: ComparisonSet = app.post_next_battle().await.json().await.unwrap();
    let second: ComparisonSet = app.post_next_battle().await.json().await.unwrap();

    assert_eq!(first.ids, second.ids);
}

#[actix_rt::test]
async fn choice_returns_a_200_then_202_for_a_double_click() {
    // Arrange
    let app = TestApp::spawn().await;
    let set: ComparisonSet = app.post_next_battle().await.json().await.unwrap();

    // Act
    let first = app.post_choice(&set.ids[..1]).await;
    app.clock.advance(40);
    let second = app.post_choice(&set.ids[..1]).await;

    // Assert
    assert_eq!(200, first.status().as_u16());
    let result: ComparisonResult = first.json().await.expect("Failed to parse as JSON");
    assert_eq!(result.winner_id(), Some(set.ids[0]));
    assert_eq!(202, second.status().as_u16());
}

#[actix_rt::test]
async fn choice_returns_a_400_for_malformed_picks() {
    // Arrange
    let app = TestApp::spawn().await;
    let set: ComparisonSet = app.post_next_battle().await.json().await.unwrap();
    let test_cases = vec![
        (vec![], "no ids"),
        (vec![set.ids[0], set.ids[0]], "a repeated id"),
        (vec![1, 2, 3, 4], "too many ids"),
        (set.ids.clone(), "both ids of a pair"),
        (vec![9_999], "an id that was not presented"),
    ];

    for (ids, description) in test_cases {
        // Act
        let response = app.post_choice(&ids).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the choice had {}.",
            description
        );
    }
}

#[actix_rt::test]
async fn next_battle_returns_a_409_at_a_milestone() {
    // Arrange
    let app = TestApp::spawn_with(|c| c.session.thresholds = vec![1]).await;
    app.play_battle().await;

    // Act
    let response = app.post_next_battle().await;

    // Assert
    assert_eq!(409, response.status().as_u16());
}

#[actix_rt::test]
async fn next_battle_returns_a_422_without_enough_items() {
    // Arrange
    let app =
        TestApp::spawn_with(|c| c.catalog.path = "tests/data/single_item.csv".into()).await;

    // Act
    let response = app.post_next_battle().await;

    // Assert
    assert_eq!(422, response.status().as_u16());
}
