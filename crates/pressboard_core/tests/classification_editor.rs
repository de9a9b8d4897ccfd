mod common;

use common::{classified_item, plain_item, week, FakeNewsRepository, FakeWeekRepository};
use pressboard_core::{
    ClassificationEditor, EditOrdering, EditorError, NewsItem, NotificationKind,
    NotificationLog, RepoError, ValidationError, ViewFilter, VocabularyMismatch,
};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

type Editor = ClassificationEditor<FakeNewsRepository, FakeWeekRepository>;

fn editor_with(items: Vec<NewsItem>, ordering: EditOrdering) -> (Editor, Arc<NotificationLog>) {
    let log = Arc::new(NotificationLog::new());
    let editor = ClassificationEditor::new(
        FakeNewsRepository::with_items(items),
        FakeWeekRepository::with_weeks(vec![
            week(1, "Social", "A"),
            week(1, "Social", "B"),
            week(2, "Saúde", "C"),
        ]),
        log.clone(),
        ordering,
    );
    editor.load_items(None, ViewFilter::All).unwrap();
    editor.reload_vocabulary().unwrap();
    (editor, log)
}

fn editor(items: Vec<NewsItem>) -> (Editor, Arc<NotificationLog>) {
    editor_with(items, EditOrdering::LastWriteWins)
}

fn assert_cascade_holds(item: &NewsItem) {
    assert!(item.validate().is_ok(), "cascade broken: {item:?}");
}

#[test]
fn unmarking_clears_children_in_a_single_request() {
    let item = classified_item(3, "Educação", "Escolas");
    let id = item.id;
    let (editor, log) = editor(vec![item]);

    let confirmed = editor.set_strategic(id, false).unwrap();
    assert!(!confirmed.is_strategic);
    assert_eq!(
        (
            confirmed.cycle,
            confirmed.category.as_deref(),
            confirmed.subcategory.as_deref()
        ),
        (None, None, None)
    );

    let requests = editor.news_repository().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].1,
        serde_json::json!({
            "isStrategic": false,
            "cycle": null,
            "category": null,
            "subcategory": null
        })
    );

    let stored = editor.item(id).unwrap();
    assert_eq!(stored, confirmed);

    let notifications = log.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Success);
}

#[test]
fn clearing_cycle_clears_category_and_subcategory() {
    let item = classified_item(2, "Saúde", "Postos");
    let id = item.id;
    let (editor, log) = editor(vec![item]);

    editor.set_cycle(id, None).unwrap();

    let stored = editor.item(id).unwrap();
    assert!(stored.is_strategic);
    assert_eq!(
        (stored.cycle, stored.category.as_deref(), stored.subcategory.as_deref()),
        (None, None, None)
    );
    assert_eq!(
        editor.news_repository().requests()[0].1,
        serde_json::json!({ "cycle": null, "category": null, "subcategory": null })
    );
    assert!(log.is_empty(), "successful field saves are silent");
}

#[test]
fn failed_category_save_leaves_state_unchanged_with_one_notification() {
    let item = classified_item(1, "Social", "A");
    let id = item.id;
    let (editor, log) = editor(vec![item.clone()]);

    editor.news_repository().fail_next_update(500);
    let err = editor
        .set_category(id, Some("Saúde".to_string()))
        .unwrap_err();
    assert!(matches!(err, EditorError::Repo(RepoError::Api(_))));

    assert_eq!(editor.item(id).unwrap(), item);
    let notifications = log.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Destructive);
    assert!(notifications[0].title.contains("category"));
}

#[test]
fn failed_strategic_toggle_keeps_previous_flag() {
    let item = plain_item("sem classificação");
    let id = item.id;
    let (editor, log) = editor(vec![item]);

    editor.news_repository().fail_next_update(503);
    assert!(editor.set_strategic(id, true).is_err());
    assert!(!editor.item(id).unwrap().is_strategic);
    assert_eq!(log.len(), 1);
}

#[test]
fn category_options_empty_and_control_disabled_without_cycle() {
    let mut item = plain_item("nota");
    item.is_strategic = true;
    let id = item.id;
    let (editor, _log) = editor(vec![item]);

    assert!(editor.available_categories(None).is_empty());
    assert!(editor.available_categories(Some(42)).is_empty());

    let controls = editor.controls(id).unwrap();
    assert!(controls.strategic.enabled);
    assert!(controls.cycle.enabled);
    assert!(!controls.category.enabled);
    assert!(!controls.subcategory.enabled);
}

#[test]
fn vocabulary_derivations_follow_week_set() {
    let (editor, _log) = editor(vec![]);
    assert_eq!(editor.available_cycles(), vec![1, 2]);
    assert_eq!(
        editor.available_subcategories(Some(1), Some("Social")),
        vec!["A".to_string(), "B".to_string()]
    );
    assert!(editor
        .available_subcategories(Some(2), Some("Social"))
        .is_empty());
    assert!(editor.available_subcategories(Some(1), None).is_empty());
}

#[test]
fn reloading_weeks_replaces_derived_options() {
    let (editor, _log) = editor(vec![]);
    editor
        .week_repository()
        .replace_weeks(vec![week(5, "Economia", "Empregos")]);

    assert_eq!(editor.reload_vocabulary().unwrap(), 1);
    assert_eq!(editor.available_cycles(), vec![5]);
    assert!(editor.available_categories(Some(1)).is_empty());
    assert_eq!(
        editor.available_categories(Some(5)),
        vec!["Economia".to_string()]
    );
}

#[test]
fn failed_vocabulary_reload_keeps_previous_set() {
    let (editor, log) = editor(vec![]);
    editor.week_repository().fail_next(500);

    assert!(editor.reload_vocabulary().is_err());
    assert_eq!(editor.available_cycles(), vec![1, 2]);
    assert_eq!(log.len(), 1);
}

#[test]
fn full_cascade_walk_keeps_invariant_after_every_step() {
    let item = plain_item("matéria");
    let id = item.id;
    let (editor, _log) = editor(vec![item]);

    assert_cascade_holds(&editor.set_strategic(id, true).unwrap());
    assert_cascade_holds(&editor.set_cycle(id, Some(1)).unwrap());
    assert_cascade_holds(&editor.set_category(id, Some("Social".to_string())).unwrap());
    let leaf = editor.set_subcategory(id, Some("B".to_string())).unwrap();
    assert_cascade_holds(&leaf);
    assert_eq!(leaf.subcategory.as_deref(), Some("B"));

    let cleared_leaf = editor.set_subcategory(id, None).unwrap();
    assert_eq!(cleared_leaf.category.as_deref(), Some("Social"));
    assert_eq!(cleared_leaf.subcategory, None);

    editor.set_subcategory(id, Some("A".to_string())).unwrap();
    let cleared_category = editor.set_category(id, None).unwrap();
    assert_eq!(cleared_category.cycle, Some(1));
    assert_eq!(cleared_category.subcategory, None);
    assert_cascade_holds(&cleared_category);

    let controls = editor.controls(id).unwrap();
    assert!(controls.category.enabled);
    assert!(!controls.subcategory.enabled);
}

#[test]
fn stale_strategic_flag_forces_children_null_on_cycle_save() {
    let item = plain_item("desatualizada");
    let id = item.id;
    let (editor, _log) = editor(vec![item.clone()]);

    let mut server_view = item;
    server_view.cycle = Some(2);
    server_view.category = Some("Saúde".to_string());
    server_view.subcategory = Some("C".to_string());
    editor.news_repository().respond_next_with(server_view);

    let confirmed = editor.set_cycle(id, Some(2)).unwrap();
    assert_eq!(confirmed.category, None);
    assert_eq!(confirmed.subcategory, None);
    assert_cascade_holds(&confirmed);
}

#[test]
fn stale_strategic_flag_forces_subcategory_null_on_category_save() {
    let item = plain_item("desatualizada");
    let id = item.id;
    let (editor, _log) = editor(vec![item.clone()]);

    let mut server_view = item;
    server_view.is_strategic = true;
    server_view.cycle = Some(1);
    server_view.category = Some("Social".to_string());
    server_view.subcategory = Some("A".to_string());
    editor.news_repository().respond_next_with(server_view);

    let confirmed = editor
        .set_category(id, Some("Social".to_string()))
        .unwrap();
    assert!(confirmed.is_strategic);
    assert_eq!(confirmed.cycle, Some(1));
    assert_eq!(confirmed.category.as_deref(), Some("Social"));
    assert_eq!(confirmed.subcategory, None);
    assert_eq!(editor.item(id).unwrap(), confirmed);
}

#[test]
fn zero_cycle_is_rejected_before_any_request() {
    let item = classified_item(1, "Social", "A");
    let id = item.id;
    let (editor, log) = editor(vec![item.clone()]);

    let err = editor.set_cycle(id, Some(0)).unwrap_err();
    assert!(matches!(
        err,
        EditorError::Invalid(ValidationError::NonPositiveCycle)
    ));
    assert!(editor.news_repository().requests().is_empty());
    assert_eq!(editor.item(id).unwrap(), item);

    let notifications = log.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Destructive);
    assert_eq!(notifications[0].title, "Could not save cycle");
}

#[test]
fn server_response_breaking_cascade_is_clamped() {
    let item = classified_item(1, "Social", "A");
    let id = item.id;
    let (editor, _log) = editor(vec![item.clone()]);

    let mut broken = item;
    broken.cycle = None;
    editor.news_repository().respond_next_with(broken);

    let confirmed = editor.set_subcategory(id, Some("B".to_string())).unwrap();
    assert_eq!(confirmed.category, None);
    assert_eq!(confirmed.subcategory, None);
    assert_cascade_holds(&editor.item(id).unwrap());
}

#[test]
fn unmarking_in_strategic_only_view_hides_row() {
    let strategic = classified_item(1, "Social", "A");
    let other = classified_item(2, "Saúde", "C");
    let id = strategic.id;
    let (editor, _log) = editor(vec![strategic, other.clone(), plain_item("fora")]);
    editor.load_items(None, ViewFilter::StrategicOnly).unwrap();
    assert_eq!(editor.visible_items().len(), 2);

    editor.set_strategic(id, false).unwrap();
    let visible = editor.visible_items();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, other.id);
    assert!(!editor.item(id).unwrap().is_strategic);
}

#[test]
fn unmarking_in_full_view_keeps_row_visible() {
    let item = classified_item(1, "Social", "A");
    let id = item.id;
    let (editor, _log) = editor(vec![item]);

    editor.set_strategic(id, false).unwrap();
    assert_eq!(editor.visible_items().len(), 1);
}

#[test]
fn editing_unloaded_item_reports_not_found() {
    let (editor, log) = editor(vec![]);
    let err = editor
        .set_cycle(uuid::Uuid::new_v4(), Some(1))
        .unwrap_err();
    assert!(matches!(err, EditorError::ItemNotFound(_)));
    assert!(editor.news_repository().requests().is_empty());
    assert_eq!(log.len(), 1);
}

#[test]
fn vocabulary_mismatch_is_reported_not_repaired() {
    let item = classified_item(9, "Cultura", "Festas");
    let id = item.id;
    let (editor, _log) = editor(vec![item.clone()]);

    assert_eq!(
        editor.vocabulary_mismatch(id),
        Some(VocabularyMismatch::Cycle(9))
    );
    assert_eq!(editor.item(id).unwrap(), item);
}

#[test]
fn same_field_edit_is_rejected_while_saving() {
    let item = classified_item(1, "Social", "A");
    let id = item.id;
    let (editor, _log) = editor(vec![item]);
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    editor
        .news_repository()
        .hold_next_update(entered_tx, release_rx);

    thread::scope(|scope| {
        let first = scope.spawn(|| editor.set_cycle(id, Some(2)));
        entered_rx.recv().unwrap();

        let controls = editor.controls(id).unwrap();
        assert!(controls.cycle.saving);
        assert!(!controls.cycle.enabled);
        assert!(controls.category.enabled);

        let err = editor.set_cycle(id, Some(1)).unwrap_err();
        assert!(matches!(err, EditorError::SaveInProgress { .. }));

        release_tx.send(()).unwrap();
        assert_eq!(first.join().unwrap().unwrap().cycle, Some(2));
    });

    assert!(!editor.controls(id).unwrap().cycle.saving);
    assert_eq!(editor.news_repository().requests().len(), 1);
}

#[test]
fn per_item_ordering_queues_edits_to_other_fields() {
    let item = classified_item(1, "Social", "A");
    let id = item.id;
    let (editor, _log) = editor_with(vec![item], EditOrdering::PerItem);
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    editor
        .news_repository()
        .hold_next_update(entered_tx, release_rx);

    thread::scope(|scope| {
        let first = scope.spawn(|| editor.set_subcategory(id, Some("B".to_string())));
        entered_rx.recv().unwrap();

        let second = scope.spawn(|| editor.set_category(id, None));
        thread::sleep(Duration::from_millis(50));
        assert!(
            editor.news_repository().requests().is_empty(),
            "second edit must wait for the first request"
        );

        release_tx.send(()).unwrap();
        first.join().unwrap().unwrap();
        second.join().unwrap().unwrap();
    });

    let requests = editor.news_repository().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].1, serde_json::json!({ "subcategory": "B" }));
    assert_eq!(
        requests[1].1,
        serde_json::json!({ "category": null, "subcategory": null })
    );
    assert_eq!(editor.item(id).unwrap().subcategory, None);
}

#[test]
fn load_clamps_invalid_rows_and_counts_sentiment() {
    let mut broken = plain_item("quebrada");
    broken.cycle = Some(3);
    broken.sentiment = Some(pressboard_core::Sentiment::Negative);
    let id = broken.id;
    let mut positive = plain_item("boa");
    positive.sentiment = Some(pressboard_core::Sentiment::Positive);
    let (editor, _log) = editor(vec![broken, positive]);

    assert_eq!(editor.item(id).unwrap().cycle, None);
    let breakdown = editor.sentiment_totals().breakdown();
    assert_eq!(breakdown.total, 2);
    assert_eq!(breakdown.negative_pct, 50.0);
}
