use std::cell::Cell;
use todo_core::db::{open_db_in_memory, DbError, DbResult};
use todo_core::{
    EditOutcome, EditState, ErrorMessage, FilteringMode, LocalStorage,
    LocalStorageTodoRepository, MemoryLocalStorage, RepoError, SqliteLocalStorage, TodoListView,
    TodoPatch, TodoRepository,
};

/// Memory storage that counts writes and can be told to fail them.
#[derive(Default)]
struct RecordingStorage {
    inner: MemoryLocalStorage,
    writes: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl RecordingStorage {
    fn writes(&self) -> usize {
        self.writes.get()
    }

    fn reset_writes(&self) {
        self.writes.set(0);
    }
}

impl LocalStorage for RecordingStorage {
    fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        if self.fail_writes.get() {
            return Err(DbError::MissingRequiredTable("local_storage"));
        }
        self.writes.set(self.writes.get() + 1);
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> DbResult<()> {
        self.inner.remove_item(key)
    }
}

fn recording_view<'a>(
    storage: &'a RecordingStorage,
    titles: &[&str],
) -> TodoListView<LocalStorageTodoRepository<&'a RecordingStorage>> {
    let mut view = TodoListView::load(LocalStorageTodoRepository::new(storage)).unwrap();
    for title in titles {
        view.set_new_title(*title);
        assert!(view.submit_new_todo().unwrap());
    }
    storage.reset_writes();
    view
}

type MemoryView = TodoListView<LocalStorageTodoRepository<MemoryLocalStorage>>;

fn view_with(titles: &[&str]) -> MemoryView {
    let mut view =
        TodoListView::load(LocalStorageTodoRepository::new(MemoryLocalStorage::new())).unwrap();
    for title in titles {
        view.set_new_title(*title);
        assert!(view.submit_new_todo().unwrap());
    }
    view
}

fn ids(view: &MemoryView) -> Vec<i64> {
    view.todos().iter().map(|todo| todo.id).collect()
}

fn completed_flags(view: &MemoryView) -> Vec<bool> {
    view.todos().iter().map(|todo| todo.completed).collect()
}

#[test]
fn submit_adds_item_and_clears_input() {
    let mut view = view_with(&[]);
    view.set_new_title("buy milk");

    assert!(view.submit_new_todo().unwrap());
    assert_eq!(view.new_title(), "");
    assert_eq!(view.todos().len(), 1);
    assert_eq!(view.todos()[0].title, "buy milk");
    assert_eq!(view.error_message(), None);
    assert_eq!(view.repo().list_todos().unwrap(), view.todos());
}

#[test]
fn empty_submit_surfaces_validation_message() {
    let mut view = view_with(&["a"]);
    view.set_new_title("");

    assert!(!view.submit_new_todo().unwrap());
    assert_eq!(view.error_message(), Some(ErrorMessage::EmptyTitle));
    assert_eq!(
        view.error_message().unwrap().to_string(),
        "title must not be empty"
    );
    assert_eq!(view.todos().len(), 1);
}

#[test]
fn visible_todos_follow_filter_mode() {
    let mut view = view_with(&["a", "b", "c"]);
    let all = ids(&view);
    view.toggle(all[1]).unwrap();

    view.set_filtering_mode(FilteringMode::Active);
    let active: Vec<i64> = view.visible_todos().iter().map(|t| t.id).collect();
    assert_eq!(active, vec![all[0], all[2]]);

    view.set_filtering_mode(FilteringMode::Completed);
    let completed: Vec<i64> = view.visible_todos().iter().map(|t| t.id).collect();
    assert_eq!(completed, vec![all[1]]);

    // Filter follows the latest collection without any explicit recompute.
    view.toggle(all[0]).unwrap();
    let completed: Vec<i64> = view.visible_todos().iter().map(|t| t.id).collect();
    assert_eq!(completed, vec![all[0], all[1]]);

    view.set_filtering_mode(FilteringMode::All);
    assert_eq!(view.visible_todos().len(), 3);
}

#[test]
fn toggle_inverts_single_item() {
    let mut view = view_with(&["a", "b"]);
    let first = ids(&view)[0];

    assert!(view.toggle(first).unwrap());
    assert_eq!(completed_flags(&view), vec![true, false]);
    assert!(view.toggle(first).unwrap());
    assert_eq!(completed_flags(&view), vec![false, false]);

    assert!(!view.toggle(first + 10_000).unwrap());
    assert_eq!(completed_flags(&view), vec![false, false]);
}

#[test]
fn toggle_all_completes_remaining_then_uncompletes_all() {
    let mut view = view_with(&["a", "b", "c"]);
    view.toggle(ids(&view)[1]).unwrap();

    view.toggle_all().unwrap();
    assert_eq!(completed_flags(&view), vec![true, true, true]);
    assert!(view.all_completed());

    view.toggle_all().unwrap();
    assert_eq!(completed_flags(&view), vec![false, false, false]);

    view.toggle_all().unwrap();
    assert_eq!(completed_flags(&view), vec![true, true, true]);
    assert_eq!(view.repo().list_todos().unwrap(), view.todos());
}

#[test]
fn toggle_all_on_empty_list_is_noop() {
    let mut view = view_with(&[]);
    view.toggle_all().unwrap();
    assert!(view.todos().is_empty());
    assert!(view.repo().storage().is_empty());
}

#[test]
fn delete_and_clear_completed() {
    let mut view = view_with(&["a", "b", "c", "d"]);
    let all = ids(&view);

    view.delete(all[0]).unwrap();
    assert_eq!(ids(&view), vec![all[1], all[2], all[3]]);

    view.toggle(all[1]).unwrap();
    view.toggle(all[3]).unwrap();
    assert!(view.has_completed());
    assert_eq!(view.items_left(), 1);

    view.clear_completed().unwrap();
    assert_eq!(ids(&view), vec![all[2]]);
    assert!(!view.has_completed());
    assert_eq!(view.repo().list_todos().unwrap(), view.todos());
}

#[test]
fn edit_commit_renames_item() {
    let mut view = view_with(&["draft"]);
    let id = ids(&view)[0];

    assert!(view.begin_edit(id));
    assert_eq!(
        view.edit_state(),
        &EditState::Editing {
            id,
            buffer: "draft".to_string()
        }
    );

    view.update_edit_buffer("final");
    // Buffered only; storage still has the old title.
    assert_eq!(view.repo().list_todos().unwrap()[0].title, "draft");

    assert_eq!(view.commit_edit().unwrap(), Some(EditOutcome::Renamed));
    assert_eq!(view.edit_state(), &EditState::Viewing);
    assert_eq!(view.todos()[0].title, "final");
    assert!(!view.todos()[0].completed);
}

#[test]
fn edit_commit_unchanged_writes_nothing() {
    let mut view = view_with(&["same"]);
    let id = ids(&view)[0];
    let before = view.todos().to_vec();

    view.begin_edit(id);
    assert_eq!(view.commit_edit().unwrap(), Some(EditOutcome::Unchanged));
    assert_eq!(view.edit_state(), &EditState::Viewing);
    assert_eq!(view.todos(), before.as_slice());
}

#[test]
fn edit_commit_with_empty_text_deletes_item() {
    let mut view = view_with(&["a", "b"]);
    let all = ids(&view);

    view.begin_edit(all[0]);
    view.update_edit_buffer("   ");
    assert_eq!(view.commit_edit().unwrap(), Some(EditOutcome::Deleted));
    assert_eq!(ids(&view), vec![all[1]]);
    assert_eq!(view.edit_state(), &EditState::Viewing);
}

#[test]
fn edit_cancel_discards_buffer() {
    let mut view = view_with(&["keep"]);
    let id = ids(&view)[0];

    view.begin_edit(id);
    view.update_edit_buffer("discarded");
    view.cancel_edit();

    assert_eq!(view.edit_state(), &EditState::Viewing);
    assert_eq!(view.todos()[0].title, "keep");
    assert_eq!(view.commit_edit().unwrap(), None);
}

#[test]
fn only_one_item_is_edited_at_a_time() {
    let mut view = view_with(&["a", "b"]);
    let all = ids(&view);

    view.begin_edit(all[0]);
    view.update_edit_buffer("changed a");
    view.begin_edit(all[1]);

    assert_eq!(view.edit_state().editing_id(), Some(all[1]));
    assert_eq!(view.commit_edit().unwrap(), Some(EditOutcome::Unchanged));
    assert_eq!(view.todos()[0].title, "a");
}

#[test]
fn deleting_edited_item_leaves_edit_mode() {
    let mut view = view_with(&["a"]);
    let id = ids(&view)[0];

    view.begin_edit(id);
    view.delete(id).unwrap();
    assert_eq!(view.edit_state(), &EditState::Viewing);
}

#[test]
fn view_reload_picks_up_sqlite_state() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteLocalStorage::try_new(&conn).unwrap();

    let mut writer = TodoListView::load(LocalStorageTodoRepository::new(&storage)).unwrap();
    let mut reader = TodoListView::load(LocalStorageTodoRepository::new(&storage)).unwrap();

    writer.set_new_title("shared");
    writer.submit_new_todo().unwrap();
    assert!(reader.todos().is_empty());

    reader.reload().unwrap();
    assert_eq!(reader.todos(), writer.todos());
}

#[test]
fn mass_actions_write_storage_once() {
    let storage = RecordingStorage::default();
    let mut view = recording_view(&storage, &["a", "b", "c", "d"]);

    view.toggle_all().unwrap();
    assert!(view.all_completed());
    assert_eq!(storage.writes(), 1);

    storage.reset_writes();
    view.clear_completed().unwrap();
    assert!(view.todos().is_empty());
    assert_eq!(storage.writes(), 1);
}

#[test]
fn unknown_id_mutations_do_not_write() {
    let storage = RecordingStorage::default();
    let view = recording_view(&storage, &["a", "b"]);
    let missing = view.todos()[1].id + 1_000;
    let before = view.todos().to_vec();

    assert_eq!(view.repo().delete_todo(missing).unwrap(), before);
    assert_eq!(
        view.repo()
            .patch_todo(missing, &TodoPatch::completed(true))
            .unwrap(),
        before
    );
    assert_eq!(view.repo().delete_todos(&[missing]).unwrap(), before);
    assert_eq!(storage.writes(), 0);
}

#[test]
fn failed_commit_keeps_edit_buffer() {
    let storage = RecordingStorage::default();
    let mut view = recording_view(&storage, &["draft"]);
    let id = view.todos()[0].id;

    view.begin_edit(id);
    view.update_edit_buffer("final");
    storage.fail_writes.set(true);

    let err = view.commit_edit().unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(
        view.edit_state(),
        &EditState::Editing {
            id,
            buffer: "final".to_string()
        }
    );
    assert_eq!(view.todos()[0].title, "draft");

    storage.fail_writes.set(false);
    assert_eq!(view.commit_edit().unwrap(), Some(EditOutcome::Renamed));
    assert_eq!(view.todos()[0].title, "final");
}
