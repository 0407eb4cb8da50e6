//! Plain-text rendering of the list view.

use std::io::{self, Write};
use todo_core::{EditState, TodoListView, TodoRepository};

/// Writes the visible items, the edit line and the footer.
pub fn render<R: TodoRepository>(out: &mut impl Write, view: &TodoListView<R>) -> io::Result<()> {
    let toggle_all = if view.all_completed() && !view.todos().is_empty() {
        "[all done]"
    } else {
        "[toggle-all]"
    };
    writeln!(out, "{toggle_all} filter={}", view.filtering_mode())?;

    let editing = view.edit_state().editing_id();
    for todo in view.visible_todos() {
        let mark = if todo.completed { 'x' } else { ' ' };
        let suffix = if editing == Some(todo.id) { "  (editing)" } else { "" };
        writeln!(out, "  [{mark}] {} {}{suffix}", todo.id, todo.title)?;
    }

    if let EditState::Editing { buffer, .. } = view.edit_state() {
        writeln!(out, "  edit> {buffer}")?;
    }

    let left = view.items_left();
    let noun = if left == 1 { "item" } else { "items" };
    write!(out, "{left} {noun} left")?;
    if view.has_completed() {
        write!(out, "  (clear completed)")?;
    }
    writeln!(out)?;

    if let Some(message) = view.error_message() {
        writeln!(out, "error: {message}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::render;
    use todo_core::{LocalStorageTodoRepository, MemoryLocalStorage, TodoListView};

    #[test]
    fn renders_items_footer_and_error() {
        let mut view =
            TodoListView::load(LocalStorageTodoRepository::new(MemoryLocalStorage::new()))
                .unwrap();
        view.set_new_title("buy milk");
        view.submit_new_todo().unwrap();
        let id = view.todos()[0].id;
        view.toggle(id).unwrap();
        view.set_new_title("");
        view.submit_new_todo().unwrap();

        let mut out = Vec::new();
        render(&mut out, &view).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains(&format!("[x] {id} buy milk")));
        assert!(text.contains("0 items left  (clear completed)"));
        assert!(text.contains("error: title must not be empty"));
        assert!(text.starts_with("[all done] filter=all"));
    }

    #[test]
    fn renders_edit_buffer_under_edited_item() {
        let mut view =
            TodoListView::load(LocalStorageTodoRepository::new(MemoryLocalStorage::new()))
                .unwrap();
        view.set_new_title("draft");
        view.submit_new_todo().unwrap();
        let id = view.todos()[0].id;
        view.begin_edit(id);
        view.update_edit_buffer("final");

        let mut out = Vec::new();
        render(&mut out, &view).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains(&format!("[ ] {id} draft  (editing)")));
        assert!(text.contains("  edit> final\n"));
        assert!(text.starts_with("[toggle-all] filter=all"));
    }
}
