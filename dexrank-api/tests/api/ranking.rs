use crate::helpers::TestApp;
use dexrank_api::domain::RankedItem;

#[actix_rt::test]
async fn ranking_lists_the_whole_catalog() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app.get_ranking().await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let view: Vec<RankedItem> = response.json().await.expect("Failed to parse as JSON");
    assert_eq!(view.len(), 14);
    assert!(view.iter().enumerate().all(|(i, item)| item.rank == i + 1));
    assert!(view.iter().all(|item| item.battle_count == 0));
}

#[actix_rt::test]
async fn winners_rise_in_the_ranking() {
    // Arrange
    let app = TestApp::spawn().await;
    let played = app.play_battle().await;

    // Act
    let view: Vec<RankedItem> = app.get_ranking().await.json().await.unwrap();

    // Assert
    assert_eq!(view[0].id, played[0]);
    assert_eq!(view[0].battle_count, 1);
    assert_eq!(view.last().map(|item| item.id), Some(played[1]));
}

#[actix_rt::test]
async fn move_puts_the_item_where_it_was_dropped() {
    // Arrange
    let app = TestApp::spawn().await;
    let view: Vec<RankedItem> = app.get_ranking().await.json().await.unwrap();
    let moved = view[9].id;

    // Act
    let response = app.post_move(format!("item_id={}&from=9&to=2", moved)).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let view: Vec<RankedItem> = response.json().await.expect("Failed to parse as JSON");
    assert_eq!(view[2].id, moved);
    assert_eq!(view[2].battle_count, 7);
}

#[actix_rt::test]
async fn move_returns_a_400_for_invalid_moves() {
    // Arrange
    let app = TestApp::spawn().await;
    let view: Vec<RankedItem> = app.get_ranking().await.json().await.unwrap();
    let test_cases = vec![
        (format!("item_id={}&from=0&to=14", view[0].id), "destination out of range"),
        (format!("item_id={}&from=1&to=0", view[0].id), "wrong source position"),
        (format!("item_id={}&from=0", view[0].id), "missing destination"),
        ("item_id=abc&from=0&to=1".to_string(), "non-numeric id"),
    ];

    for (body, description) in test_cases {
        // Act
        let response = app.post_move(body).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload had {}.",
            description
        );
    }
}
