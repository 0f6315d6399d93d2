use famly::commands::*;
use famly::error::FamlyError;
use famly::models::{ResetInterval, Session};
use famly::storage::{load_session, load_store, session_path};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

// Use a mutex to ensure tests run serially since they modify the environment variable
static TEST_MUTEX: Mutex<()> = Mutex::new(());

fn with_test_db<F>(test_name: &str, f: F)
where
    F: FnOnce(PathBuf),
{
    let _guard = TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

    let mut dir = env::temp_dir();
    dir.push(format!("famly_test_{}", test_name));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    let db_path = dir.join("store.json");

    env::set_var("FAMLY_DB", db_path.to_str().unwrap());

    f(db_path.clone());

    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    env::remove_var("FAMLY_DB");
}

fn family_id() -> u64 {
    load_session().unwrap().family_id.expect("a current family")
}

#[test]
fn test_login_and_create_family() {
    with_test_db("create_family", |path| {
        cmd_login("alice".into(), Some("Alice".into()), None, true);
        cmd_family_create("Smiths".into(), true);

        assert!(path.exists());
        let store = load_store().unwrap();
        assert_eq!(store.families.len(), 1);
        assert_eq!(store.families[0].name, "Smiths");
        assert_eq!(store.families[0].created_by, "alice");
        assert_eq!(store.users[0].display_name, "Alice");

        let session = load_session().unwrap();
        assert_eq!(session.uid.as_deref(), Some("alice"));
        assert_eq!(session.family_id, Some(store.families[0].id));
    });
}

#[test]
fn test_create_family_without_login_changes_nothing() {
    with_test_db("no_login", |path| {
        cmd_family_create("Smiths".into(), true);
        assert!(!path.exists());
        assert!(load_store().unwrap().families.is_empty());
    });
}

#[test]
fn test_join_family_by_code() {
    with_test_db("join", |_path| {
        cmd_login("alice".into(), None, None, true);
        cmd_family_create("Smiths".into(), true);
        let code = load_store().unwrap().families[0].join_code.clone();

        cmd_login("bob".into(), None, None, true);
        assert_eq!(load_session().unwrap().family_id, None);
        cmd_family_join(code.to_lowercase(), true);

        let store = load_store().unwrap();
        assert_eq!(store.families[0].members, vec!["alice".to_string(), "bob".to_string()]);
        assert_eq!(family_id(), store.families[0].id);
    });
}

#[test]
fn test_task_list_workflow() {
    with_test_db("tasks", |_path| {
        cmd_login("alice".into(), None, None, true);
        cmd_family_create("Smiths".into(), true);

        cmd_tasks_add("Kitchen".into(), Some("Daily".into()), true);
        cmd_tasks_add("Garden".into(), None, true);
        cmd_tasks_add("Attic".into(), Some("yearly".into()), true);
        cmd_task_add(1, "Dishes".into(), true);
        cmd_task_add(1, "Floor".into(), true);
        cmd_task_toggle(1, 1, true);

        let store = load_store().unwrap();
        let family = &store.families[0];
        assert_eq!(family.task_lists.len(), 2);
        assert_eq!(family.task_lists[0].reset_interval, ResetInterval::Daily);
        assert_eq!(family.task_lists[1].reset_interval, ResetInterval::Weekly);
        assert!(family.task_lists[0].items[0].is_checked);
        assert!(!family.task_lists[0].items[1].is_checked);

        cmd_tasks_reset(Some(1), true);
        let store = load_store().unwrap();
        assert!(store.families[0].task_lists[0].items.iter().all(|i| !i.is_checked));
        assert!(store.families[0].task_lists[0].last_reset.is_some());

        cmd_tasks_interval(2, "custom".into(), true);
        cmd_task_remove(1, 2, true);
        cmd_tasks_remove(2, true);
        let store = load_store().unwrap();
        assert_eq!(store.families[0].task_lists.len(), 1);
        assert_eq!(store.families[0].task_lists[0].items.len(), 1);
    });
}

#[test]
fn test_shopping_workflow() {
    with_test_db("shopping", |_path| {
        cmd_login("alice".into(), None, None, true);
        cmd_family_create("Smiths".into(), true);

        cmd_shopping_add("Groceries".into(), true);
        cmd_shopping_item_add(1, "Milk".into(), true);
        cmd_shopping_item_add(1, "Bread".into(), true);
        cmd_shopping_item_toggle(1, 2, true);
        cmd_shopping_item_remove(1, 1, true);

        let store = load_store().unwrap();
        let items = &store.families[0].shopping_lists[0].items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Bread");
        assert!(items[0].is_checked);

        cmd_shopping_remove(1, true);
        assert!(load_store().unwrap().families[0].shopping_lists.is_empty());
    });
}

#[test]
fn test_recipes_and_meal_plans() {
    with_test_db("meals", |_path| {
        cmd_login("alice".into(), None, None, true);
        cmd_family_create("Smiths".into(), true);

        cmd_recipe_add("Lasagne".into(), Some("Layers".into()), None, true);
        cmd_meal_set("2024-03-12".into(), Some(1), true);
        cmd_meal_set("not a date".into(), Some(1), true);
        cmd_meal_set("2024-03-13".into(), Some(7), true);

        let store = load_store().unwrap();
        let family = &store.families[0];
        assert_eq!(family.recipes[0].description.as_deref(), Some("Layers"));
        assert_eq!(family.meal_plans.len(), 1);
        assert_eq!(family.meal_plans[0].recipe_id, Some(1));

        cmd_recipe_remove(1, true);
        let store = load_store().unwrap();
        assert!(store.families[0].recipes.is_empty());
        assert!(store.families[0].meal_plans.is_empty());
    });
}

#[test]
fn test_use_family_and_logout() {
    with_test_db("use_logout", |_path| {
        cmd_login("alice".into(), None, None, true);
        cmd_family_create("Smiths".into(), true);
        let first = family_id();
        cmd_family_create("Cabin".into(), true);
        assert_ne!(family_id(), first);

        cmd_family_use(first, true);
        assert_eq!(family_id(), first);

        cmd_logout(true);
        let session = load_session().unwrap();
        assert_eq!(session.uid, None);
        assert_eq!(session.family_id, None);
    });
}

#[test]
fn test_corrupt_store_is_an_error_and_left_alone() {
    with_test_db("corrupt_store", |path| {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(load_store(), Err(FamlyError::Json(_))));

        cmd_login("alice".into(), None, None, true);
        cmd_family_create("Smiths".into(), true);
        cmd_tasks_add("Kitchen".into(), None, true);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");
        assert!(!session_path().exists());
    });
}

#[test]
fn test_logout_recovers_from_corrupt_session() {
    with_test_db("corrupt_session", |path| {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(session_path(), "garbage").unwrap();
        assert!(matches!(load_session(), Err(FamlyError::Json(_))));

        cmd_logout(true);
        assert_eq!(load_session().unwrap(), Session::default());
    });
}
