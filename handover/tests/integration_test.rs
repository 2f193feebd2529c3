//! Integration tests for the handover board
//!
//! These tests drive the public services against a real database file:
//! - Note lifecycle across reopening the board
//! - Custom ordering persisted per day
//! - Rows written by older clients rendered with defaults

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use handover_board::app::AppState;
use handover_board::clock::FixedClock;
use handover_board::database::{create_pool, Category, HandoverUpdate, NewHandover, Shift};
use handover_board::services::ViewDefaults;
use handover_board::view::{CategoryFilter, QuickFilter, SortMode, ViewState};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn noon() -> NaiveDateTime {
    day().and_hms_opt(12, 0, 0).unwrap()
}

async fn open_board(dir: &Path) -> AppState {
    AppState::initialize_with_clock(dir.to_path_buf(), Arc::new(FixedClock(noon())))
        .await
        .unwrap()
}

fn draft(text: &str) -> NewHandover {
    NewHandover {
        date: day(),
        text: text.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_note_lifecycle_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();

    let (overdue_id, plain_id) = {
        let state = open_board(temp_dir.path()).await;

        state.schedule.add_person("Ana", Some("#f59e0b")).await.unwrap();
        state.schedule.add_person("Ben", None).await.unwrap();
        state
            .schedule
            .set_day_schedule(day(), Shift::B, vec!["Ana".to_string(), "Ben".to_string()])
            .await
            .unwrap();

        let overdue = state
            .notes
            .create_note(NewHandover {
                category: Category::Complaint,
                room: "214".to_string(),
                followup: true,
                due_date: Some(day()),
                due_time: NaiveTime::from_hms_opt(11, 15, 0),
                ..draft("AC not cooling")
            })
            .await
            .unwrap();
        let plain = state.notes.create_note(draft("Lost umbrella at desk")).await.unwrap();

        assert_eq!(overdue.added_by, "Ana & Ben");
        assert_eq!(overdue.shift, Some(Shift::B));

        (overdue.id, plain.id)
    };

    let state = open_board(temp_dir.path()).await;

    let view = ViewState::default().with_sort(SortMode::Priority);
    let board = state.board.render(day(), view).await.unwrap();

    assert_eq!(board.total_notes, 2);
    assert_eq!(board.shift, Shift::B);
    assert_eq!(board.shift_people, "Ana & Ben");
    assert_eq!(board.groups.unresolved[0].id, overdue_id);
    assert_eq!(board.groups.general[0].id, plain_id);
    assert_eq!(board.due_label(&overdue_id).unwrap().text, "OVERDUE by 45m");

    let edited = state
        .notes
        .edit_note(
            &overdue_id,
            HandoverUpdate {
                text: Some("AC fixed, guest informed".to_string()),
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.edited_by, "Ana & Ben");

    let view = ViewState::default().with_category(CategoryFilter::Completed);
    let board = state.board.render(day(), view).await.unwrap();
    assert_eq!(board.groups.len(), 1);
    assert_eq!(board.groups.completed[0].text, "AC fixed, guest informed");

    state.notes.delete_note(&plain_id).await.unwrap();
    let record = state.notes.day_record(day()).await.unwrap();
    assert_eq!(record.sort_order, vec![overdue_id]);
}

#[tokio::test]
async fn test_custom_order_persists() {
    let temp_dir = TempDir::new().unwrap();

    let ids = {
        let state = open_board(temp_dir.path()).await;
        let mut ids = Vec::new();
        for text in ["first", "second", "third"] {
            ids.push(state.notes.create_note(draft(text)).await.unwrap().id);
        }
        state.notes.move_note(day(), &ids[2], 0).await.unwrap();
        ids
    };

    let state = open_board(temp_dir.path()).await;
    let late = state.notes.create_note(draft("fourth")).await.unwrap();

    let view = ViewState::default().with_sort(SortMode::Custom);
    let board = state.board.render(day(), view).await.unwrap();
    let order: Vec<String> = board
        .groups
        .into_concat()
        .into_iter()
        .map(|n| n.id)
        .collect();

    assert_eq!(
        order,
        vec![ids[2].clone(), ids[0].clone(), ids[1].clone(), late.id]
    );
}

#[tokio::test]
async fn test_legacy_rows_render_with_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let state = open_board(temp_dir.path()).await;

    let pool = create_pool(&temp_dir.path().join("handover.db")).await.unwrap();
    sqlx::query(
        r#"
        INSERT INTO handovers (id, date, category, text, attachments_json, due_date, due_time,
                               timestamp, shift)
        VALUES ('legacy-1', '2024-03-01', 'lost-and-found', 'Keys left in lobby', 'not json',
                '2024-03-01', 'noon', '2024-03-01T08:00:00Z', 'Z')
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let view = ViewState::default().with_quick(QuickFilter::MyShift);
    let board = state.board.render(day(), view).await.unwrap();

    assert_eq!(board.groups.general.len(), 1);
    let note = &board.groups.general[0];
    assert_eq!(note.category, Category::Info);
    assert_eq!(note.added_by, "Staff");
    assert_eq!(note.shift, None);
    assert!(note.attachments.is_empty());
    assert!(note.due_at().is_none());
    assert_eq!(board.due_label("legacy-1").unwrap().text, "No Due Date");

    let record = state.notes.day_record(day()).await.unwrap();
    assert_eq!(record.sort_order, vec!["legacy-1".to_string()]);
}

#[tokio::test]
async fn test_saved_view_defaults_apply_on_open() {
    let temp_dir = TempDir::new().unwrap();
    let state = open_board(temp_dir.path()).await;

    state
        .settings
        .update_view_defaults(ViewDefaults {
            sort: SortMode::Room,
            category: CategoryFilter::Pending,
            quick: QuickFilter::None,
        })
        .await
        .unwrap();

    for room in ["1010", "205", ""] {
        state
            .notes
            .create_note(NewHandover {
                room: room.to_string(),
                ..draft("Turndown service")
            })
            .await
            .unwrap();
    }

    let view = state.board.initial_view(day()).await.unwrap();
    let board = state.board.render(day(), view).await.unwrap();
    let rooms: Vec<&str> = board
        .groups
        .general
        .iter()
        .map(|n| n.room.as_str())
        .collect();

    assert_eq!(rooms, vec!["", "205", "1010"]);
}
