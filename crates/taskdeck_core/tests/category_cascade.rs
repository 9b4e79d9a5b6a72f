use taskdeck_core::{
    AppState, CategoryDraft, CategoryStore, InMemoryKvRepository, KeyValueRepository, TaskDraft,
    TaskPatch, TaskStore, NO_CATEGORY_LABEL,
};

#[test]
fn deleting_a_category_detaches_referencing_tasks() {
    let repo = InMemoryKvRepository::new();
    let mut categories = CategoryStore::load(repo.clone());
    let mut tasks = TaskStore::load(repo.clone());

    let work = categories.create(CategoryDraft::named("Work")).unwrap();
    let mut ids = Vec::new();
    for title in ["standup", "review"] {
        let mut draft = TaskDraft::titled(title);
        draft.category_id = Some(work.id);
        ids.push(tasks.create(draft).unwrap().id);
    }
    let unrelated = tasks.create(TaskDraft::titled("groceries")).unwrap();

    assert!(categories.delete(work.id, &mut tasks));

    for id in &ids {
        assert_eq!(tasks.get(*id).unwrap().category_id, None);
    }
    assert_eq!(tasks.get(unrelated.id).unwrap(), &unrelated);
    assert!(categories.get(work.id).is_none());
    assert!(categories.is_empty());

    // Both writes reached storage.
    let stored_tasks = TaskStore::load(repo.clone());
    assert!(stored_tasks.tasks().iter().all(|t| t.category_id.is_none()));
    assert!(CategoryStore::load(repo).is_empty());
}

#[test]
fn dangling_reference_reads_as_no_category_and_is_repaired_by_delete() {
    let repo = InMemoryKvRepository::new();
    let mut state = AppState::load(repo.clone());
    let home = state.create_category(CategoryDraft::named("Home")).unwrap();
    let mut draft = TaskDraft::titled("fix sink");
    draft.category_id = Some(home.id);
    let task = state.create_task(draft).unwrap();

    // Simulate an interrupted delete: the category list was rewritten but the
    // task list was not.
    repo.set("categories", "[]").unwrap();
    let mut state = AppState::load(repo);

    let stored = state.tasks().get(task.id).unwrap();
    assert_eq!(stored.category_id, Some(home.id));
    assert!(state.categories().resolve(stored.category_id).is_none());
    assert_eq!(state.categories().name_of(stored.category_id), NO_CATEGORY_LABEL);
    assert_eq!(state.tasks().by_category(home.id).len(), 1);

    let removal = state.delete_category(home.id);
    assert!(!removal.removed);
    assert_eq!(removal.detached_tasks, 1);
    assert_eq!(state.tasks().get(task.id).unwrap().category_id, None);

    let again = state.delete_category(home.id);
    assert!(!again.changed());
}

#[test]
fn reassigning_category_through_update() {
    let mut state = AppState::load(InMemoryKvRepository::new());
    let a = state.create_category(CategoryDraft::named("A")).unwrap();
    let b = state.create_category(CategoryDraft::named("B")).unwrap();
    let mut draft = TaskDraft::titled("move me");
    draft.category_id = Some(a.id);
    let task = state.create_task(draft).unwrap();

    let patch = TaskPatch {
        category_id: Some(Some(b.id)),
        ..TaskPatch::default()
    };
    state.update_task(task.id, patch).unwrap().unwrap();

    assert!(state.tasks().by_category(a.id).is_empty());
    assert_eq!(state.tasks().by_category(b.id).len(), 1);
    assert_eq!(state.categories().name_of(Some(b.id)), "B");
}
