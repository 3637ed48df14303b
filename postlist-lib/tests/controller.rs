//! End-to-end tests of the table controller against in-memory providers.

use std::sync::Arc;

use postlist_lib::api::InMemoryProvider;
use postlist_lib::api::Operation;
use postlist_lib::cache::CacheConfig;
use postlist_lib::cache::CachedProvider;
use postlist_lib::error::FieldValidationError;
use postlist_lib::error::ProviderError;
use postlist_lib::model::Post;
use postlist_lib::model::PostId;
use postlist_lib::model::PostStatus;
use postlist_lib::table::CheckState;
use postlist_lib::table::EditSession;
use postlist_lib::table::NoticeKind;
use postlist_lib::table::TableEvent;
use postlist_lib::{Error, TableConfig, TableController};

fn store(count: u64) -> Arc<InMemoryProvider> {
    let statuses = [PostStatus::Published, PostStatus::Draft, PostStatus::Rejected];
    Arc::new(InMemoryProvider::new("posts").with_posts((1..=count).map(|i| {
        Post::new(
            i,
            format!("Post {}", i),
            statuses[(i % 3) as usize],
            format!("2024-01-{:02}T00:00:00Z", i % 28 + 1),
        )
    })))
}

async fn loaded(store: &Arc<InMemoryProvider>) -> TableController<InMemoryProvider> {
    let mut table = TableController::new(store.clone(), TableConfig::default());
    table.load();
    table.settle().await;
    table
}

fn row_ids(table: &TableController<impl postlist_lib::api::DataProvider + 'static>) -> Vec<u64> {
    table.state().rows().iter().map(|post| post.id.0).collect()
}

// =============================================================================
// Query
// =============================================================================

#[tokio::test]
async fn test_first_page_on_load() {
    let store = store(25);
    let table = loaded(&store).await;

    assert_eq!(row_ids(&table), (1..=10).collect::<Vec<_>>());
    assert_eq!(table.state().page_count(), 3);
    assert_eq!(table.state().page_label(), "Page 1 of 3");
    assert!(!table.state().is_loading());
}

#[tokio::test]
async fn test_next_event_reports_load() {
    let store = store(5);
    let mut table = TableController::new(store, TableConfig::default());
    table.load();

    assert_eq!(table.next_event().await, Some(TableEvent::Listed { seq: 1, applied: true }));
    assert_eq!(table.outstanding(), 0);
}

#[tokio::test]
async fn test_page_index_clamps_to_last_page() {
    let store = store(25);
    let mut table = loaded(&store).await;

    assert!(table.set_page_index(5));
    assert_eq!(table.state().query().page_index(), 2);
    table.settle().await;

    assert_eq!(row_ids(&table), (21..=25).collect::<Vec<_>>());
    assert_eq!(table.state().page_label(), "Page 3 of 3");
    assert!(!table.next_page());
}

#[tokio::test]
async fn test_page_size_change() {
    let store = store(25);
    let mut table = loaded(&store).await;
    table.next_page();
    table.settle().await;

    assert!(table.set_page_size(20).unwrap());
    table.settle().await;
    assert_eq!(table.state().rows().len(), 20);
    assert_eq!(table.state().page_label(), "Page 1 of 2");

    assert!(matches!(table.set_page_size(7), Err(Error::InvalidPageSize { size: 7, .. })));
}

#[tokio::test]
async fn test_filter_set_then_cleared() {
    let store = store(25);
    let mut table = loaded(&store).await;

    assert!(table.set_filter("title", "post 1").unwrap());
    table.settle().await;
    assert_eq!(table.state().query().total_count(), Some(11));
    assert_eq!(table.state().query().params().filter("title").map(|f| f.value.as_str()), Some("post 1"));

    assert!(table.set_filter("title", "").unwrap());
    assert!(table.state().query().params().filter("title").is_none());
    table.settle().await;
    assert_eq!(table.state().query().total_count(), Some(25));
}

#[tokio::test]
async fn test_narrowing_filter_returns_to_valid_page() {
    let store = store(25);
    let mut table = loaded(&store).await;
    table.last_page();
    table.settle().await;

    table.set_filter("title", "post 2").unwrap();
    table.settle().await;

    // "Post 2" and "Post 20".."Post 25" fit on one page.
    assert_eq!(table.state().query().page_index(), 0);
    assert_eq!(row_ids(&table), vec![2, 20, 21, 22, 23, 24, 25]);
}

#[tokio::test]
async fn test_sort_toggle() {
    let store = store(25);
    let mut table = loaded(&store).await;

    table.toggle_sort("title").unwrap();
    table.toggle_sort("title").unwrap();
    table.settle().await;
    assert_eq!(row_ids(&table)[0], 9);

    table.toggle_sort("title").unwrap();
    table.settle().await;
    assert_eq!(row_ids(&table)[0], 1);
    assert!(matches!(table.toggle_sort("actions"), Err(Error::NotSortable(_))));
}

// =============================================================================
// Editing
// =============================================================================

#[tokio::test]
async fn test_empty_title_sends_nothing() {
    let store = store(25);
    let mut table = loaded(&store).await;

    table.begin_edit(PostId(1)).unwrap();
    table.set_draft_title("").unwrap();
    table.set_draft_status("draft").unwrap();

    assert!(matches!(table.submit_edit(), Err(Error::Validation(_))));
    assert_eq!(table.outstanding(), 0);
    let row = table.state().edit().row().unwrap();
    assert_eq!(row.errors.for_field("title").unwrap().message, "Title is required");
    assert_eq!(store.get(PostId(1)).unwrap().title, "Post 1");
}

#[tokio::test]
async fn test_save_closes_edit_and_refetches() {
    let store = store(25);
    let mut table = loaded(&store).await;

    table.begin_edit(PostId(3)).unwrap();
    table.set_draft_title("Renamed").unwrap();
    table.set_draft_status("published").unwrap();
    table.submit_edit().unwrap();

    let events = table.settle().await;
    assert!(events.contains(&TableEvent::Updated { id: PostId(3), ok: true }));
    assert!(events.contains(&TableEvent::Invalidated));
    assert_eq!(table.state().edit(), &EditSession::Idle);

    let post = &table.state().rows()[2];
    assert_eq!(post.title, "Renamed");
    assert_eq!(post.status, PostStatus::Published);
}

#[tokio::test]
async fn test_failed_save_keeps_draft() {
    let store = store(25);
    let mut table = loaded(&store).await;

    table.begin_edit(PostId(3)).unwrap();
    table.set_draft_title("Renamed").unwrap();
    store.fail_next(
        Operation::Update,
        ProviderError::Validation(FieldValidationError::new("title", "Title already taken").into()),
    );
    table.submit_edit().unwrap();
    table.settle().await;

    let row = table.state().edit().row().unwrap();
    assert_eq!(row.draft.title, "Renamed");
    assert!(!row.submitting);
    assert_eq!(row.errors.for_field("title").unwrap().message, "Title already taken");
    assert_eq!(table.state().rows()[2].title, "Post 3");
    assert_eq!(table.take_notice().map(|n| n.kind), Some(NoticeKind::Update));
}

// =============================================================================
// Deleting
// =============================================================================

#[tokio::test]
async fn test_delete_row_being_edited() {
    let store = store(50);
    let mut table = loaded(&store).await;
    table.set_page_index(4);
    table.settle().await;

    table.begin_edit(PostId(42)).unwrap();
    assert!(table.request_delete_one(PostId(42)).is_some());
    table.confirm_delete().unwrap();
    let events = table.settle().await;

    assert_eq!(events[0], TableEvent::Deleted { ids: vec![PostId(42)], ok: true });
    assert_eq!(table.state().edit(), &EditSession::Idle);
    assert_eq!(row_ids(&table), vec![41, 43, 44, 45, 46, 47, 48, 49, 50]);
    assert!(store.get(PostId(42)).is_none());
}

#[tokio::test]
async fn test_cancelled_delete_sends_nothing() {
    let store = store(25);
    let mut table = loaded(&store).await;

    table.request_delete_one(PostId(5));
    assert!(table.cancel_delete());
    assert_eq!(table.confirm_delete(), Err(Error::NoPendingDelete));
    assert_eq!(table.outstanding(), 0);
    assert_eq!(store.len(), 25);
}

#[tokio::test]
async fn test_delete_selected_clears_selection() {
    let store = store(25);
    let mut table = loaded(&store).await;

    table.toggle_row(PostId(1)).unwrap();
    table.toggle_row(PostId(2)).unwrap();
    assert_eq!(table.state().header_state(), CheckState::Indeterminate);
    assert!(table.state().can_delete_selected());

    let pending = table.request_delete_selected().unwrap();
    assert_eq!(pending.ids, vec![PostId(1), PostId(2)]);
    table.confirm_delete().unwrap();
    table.settle().await;

    assert!(table.state().selection().is_empty());
    assert_eq!(row_ids(&table)[0], 3);
    assert_eq!(table.state().query().total_count(), Some(23));
    assert!(!table.state().can_delete_selected());
}

#[tokio::test]
async fn test_delete_one_clears_whole_selection() {
    let store = store(25);
    let mut table = loaded(&store).await;

    for id in 1..=3 {
        table.toggle_row(PostId(id)).unwrap();
    }
    table.request_delete_one(PostId(2));
    table.confirm_delete().unwrap();
    table.settle().await;

    assert!(table.state().selection().is_empty());
    assert_eq!(table.state().header_state(), CheckState::Unchecked);
    assert_eq!(&row_ids(&table)[..3], &[1, 3, 4]);
}

#[tokio::test]
async fn test_failed_delete_keeps_state() {
    let store = store(25);
    let mut table = loaded(&store).await;

    table.toggle_all();
    table.request_delete_selected();
    store.fail_next(Operation::Delete, ProviderError::transport("connection reset"));
    table.confirm_delete().unwrap();
    let events = table.settle().await;

    assert_eq!(events.len(), 1);
    assert_eq!(table.state().header_state(), CheckState::Checked);
    assert_eq!(table.state().rows().len(), 10);
    assert_eq!(store.len(), 25);
    let notice = table.take_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Delete);
    assert!(notice.to_string().contains("connection reset"));
}

#[tokio::test]
async fn test_failed_load_keeps_page() {
    let store = store(25);
    let mut table = loaded(&store).await;

    store.fail_next(Operation::List, ProviderError::transport("timeout"));
    table.next_page();
    table.settle().await;

    assert_eq!(row_ids(&table)[0], 1);
    assert_eq!(table.take_notice().map(|n| n.kind), Some(NoticeKind::List));

    table.refresh();
    table.settle().await;
    assert_eq!(row_ids(&table)[0], 11);
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn test_cached_provider_refetches_after_change() {
    let store = store(25);
    let cached = Arc::new(CachedProvider::new(store.clone(), CacheConfig::default()));
    let mut table = TableController::new(cached.clone(), TableConfig::default());
    table.load();
    table.settle().await;
    assert_eq!(cached.cache().len(), 1);

    table.begin_edit(PostId(1)).unwrap();
    table.set_draft_title("Fresh").unwrap();
    table.submit_edit().unwrap();
    table.settle().await;

    assert_eq!(table.state().rows()[0].title, "Fresh");
}
