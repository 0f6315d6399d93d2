use std::io::{self, Write};
use chrono::{Local, NaiveDate, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use crate::error::FamlyError;
use crate::membership::{members_of, visible_families_for};
use crate::models::{Item, ResetInterval, Session, Store};
use crate::planner::{current_week_dates, meals_planned_in, week_plan};
use crate::schedule::reset_label;
use crate::stats::{progress_ratio, summarize, unchecked_count, ListSummary};
use crate::storage::{delete_database, load_session, load_store, save_session, save_store};

/// Loads the store and session, applies `f`, and saves both if it succeeded.
fn with_household<T>(f: impl FnOnce(&mut Store, &mut Session) -> Result<T, FamlyError>) -> Result<T, FamlyError> {
    let mut store = load_store()?;
    let mut session = load_session()?;
    let out = f(&mut store, &mut session)?;
    save_store(&store)?;
    save_session(&session)?;
    Ok(out)
}

/// Loads the store and session read-only.
fn snapshot() -> Result<(Store, Session), FamlyError> {
    Ok((load_store()?, load_session()?))
}

fn report<T>(result: Result<T, FamlyError>, silent: bool, on_ok: impl FnOnce(T)) {
    match result {
        Ok(v) => {
            if !silent { on_ok(v); }
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            if !silent { eprintln!("{}", e); }
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, FamlyError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| FamlyError::InvalidDate(s.to_string()))
}

fn bold(s: &str) -> Cell {
    Cell::new(s).add_attribute(Attribute::Bold)
}

/// Signs in as `uid`, registering the user on first use.
pub fn cmd_login(uid: String, name: Option<String>, email: Option<String>, silent: bool) {
    let res = with_household(|store, session| {
        store.sign_in(session, &uid, name, email)?;
        Ok(session.family_id)
    });
    report(res, silent, |family| match family {
        Some(id) => println!("Signed in as {} (family {}).", uid, id),
        None => println!("Signed in as {}. Create or join a family next.", uid),
    });
}

pub fn cmd_logout(silent: bool) {
    let res = save_session(&Session::default());
    report(res, silent, |_| println!("Signed out."));
}

/// Creates a family owned by the signed-in user.
pub fn cmd_family_create(name: String, silent: bool) {
    let res = with_household(|store, session| {
        let f = store.create_family(session, &name, Utc::now())?;
        Ok((f.id, f.join_code.clone()))
    });
    report(res, silent, |(id, code)| println!("Family '{}' created (id = {}). Join code: {}", name, id, code));
}

/// Joins the family with the given join code.
pub fn cmd_family_join(code: String, silent: bool) {
    let res = with_household(|store, session| {
        let f = store.join_by_code(session, &code)?;
        Ok((f.id, f.name.clone()))
    });
    report(res, silent, |(id, name)| println!("Joined family '{}' (id = {}).", name, id));
}

/// Switches the current family.
pub fn cmd_family_use(id: u64, silent: bool) {
    let res = with_household(|store, session| Ok(store.use_family(session, id)?.name.clone()));
    report(res, silent, |name| println!("Now using family '{}'.", name));
}

/// Lists the families the signed-in user belongs to.
pub fn cmd_family_list() {
    let res = snapshot().and_then(|(store, session)| {
        let uid = session.require_user()?.to_string();
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec![bold("ID"), bold("Name"), bold("Join Code"), bold("Members"), bold("")]);
        let families = visible_families_for(&store.families, &uid);
        if families.is_empty() {
            return Ok(None);
        }
        for f in families {
            let current = if session.family_id == Some(f.id) { "current" } else { "" };
            table.add_row(vec![
                Cell::new(f.id),
                Cell::new(&f.name),
                Cell::new(&f.join_code),
                Cell::new(f.members.len()),
                Cell::new(current).fg(Color::Green),
            ]);
        }
        Ok(Some(table))
    });
    report(res, false, |table| match table {
        Some(t) => println!("{t}"),
        None => println!("You are not in any family yet."),
    });
}

/// Lists the members of the current family with their roles.
pub fn cmd_family_members() {
    let res = snapshot().and_then(|(store, session)| {
        let family = store.current_family(&session)?;
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec![bold("Name"), bold("Email"), bold("Role")]);
        for m in members_of(family, &store.users) {
            table.add_row(vec![m.display_name, m.email, m.role.to_string()]);
        }
        Ok(table)
    });
    report(res, false, |table| println!("{table}"));
}

/// Adds a task list. The reset interval defaults to weekly.
pub fn cmd_tasks_add(title: String, reset: Option<String>, silent: bool) {
    let res = with_household(|store, session| {
        let interval = match reset {
            Some(r) => r.parse::<ResetInterval>()?,
            None => ResetInterval::default(),
        };
        store.current_family_mut(session)?.add_task_list(&title, interval, Utc::now())
    });
    report(res, silent, |id| println!("Task list added (id = {})", id));
}

/// Lists task lists with what is left and when each resets.
pub fn cmd_tasks_list() {
    let res = snapshot().and_then(|(store, session)| {
        let family = store.current_family(&session)?;
        if family.task_lists.is_empty() {
            return Ok(None);
        }
        let now = Local::now();
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![bold("ID"), bold("Title"), bold("Left"), bold("Total"), bold("Interval"), bold("Reset")]);
        for l in &family.task_lists {
            let left = unchecked_count(l);
            table.add_row(vec![
                Cell::new(l.id),
                Cell::new(&l.title),
                Cell::new(left).fg(if left > 0 { Color::Yellow } else { Color::Green }),
                Cell::new(l.items.len()),
                Cell::new(l.reset_interval),
                Cell::new(reset_label(&now, l.reset_interval)),
            ]);
        }
        Ok(Some(table))
    });
    report(res, false, |table| match table {
        Some(t) => println!("{t}"),
        None => println!("No task lists found."),
    });
}

fn items_table(items: &[Item]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![bold("ID"), bold("Name"), bold("Status")]);
    for i in items {
        let (status, color) = if i.is_checked { ("Done", Color::Green) } else { ("Open", Color::Yellow) };
        table.add_row(vec![Cell::new(i.id), Cell::new(&i.name), Cell::new(status).fg(color)]);
    }
    table
}

/// Shows the items of one task list.
pub fn cmd_tasks_show(list: u64) {
    let res = snapshot().and_then(|(store, session)| {
        let l = store.current_family(&session)?.task_list(list)?;
        Ok((l.title.clone(), l.reset_interval, items_table(&l.items)))
    });
    report(res, false, |(title, interval, table)| {
        println!("{} ({}, {})", title, interval, reset_label(&Local::now(), interval));
        println!("{table}");
    });
}

pub fn cmd_tasks_remove(list: u64, silent: bool) {
    let res = with_household(|store, session| store.current_family_mut(session)?.remove_task_list(list));
    report(res, silent, |l| println!("Task list '{}' removed.", l.title));
}

/// Changes how often a task list resets.
pub fn cmd_tasks_interval(list: u64, interval: String, silent: bool) {
    let res = with_household(|store, session| {
        let interval = interval.parse::<ResetInterval>()?;
        store.current_family_mut(session)?.set_reset_interval(list, interval)?;
        Ok(interval)
    });
    report(res, silent, |interval| println!("Task list {} now resets {}.", list, interval));
}

pub fn cmd_task_add(list: u64, name: String, silent: bool) {
    let res = with_household(|store, session| store.current_family_mut(session)?.add_task(list, &name));
    report(res, silent, |id| println!("Task added (id = {})", id));
}

pub fn cmd_task_toggle(list: u64, item: u64, silent: bool) {
    let res = with_household(|store, session| store.current_family_mut(session)?.toggle_task(list, item));
    report(res, silent, |checked| {
        println!("Task {} marked as {}.", item, if checked { "done" } else { "open" });
    });
}

pub fn cmd_task_remove(list: u64, item: u64, silent: bool) {
    let res = with_household(|store, session| store.current_family_mut(session)?.remove_task(list, item));
    report(res, silent, |i| println!("Task '{}' removed.", i.name));
}

/// Resets one list now, or with no list every list whose reset is due.
pub fn cmd_tasks_reset(list: Option<u64>, silent: bool) {
    let now = Local::now();
    let res = with_household(|store, session| {
        let family = store.current_family_mut(session)?;
        match list {
            Some(id) => {
                family.reset_task_list(id, now.date_naive())?;
                Ok(vec![id])
            }
            None => Ok(family.reset_due_task_lists(&now)),
        }
    });
    report(res, silent, |ids| {
        if ids.is_empty() {
            println!("No task lists due for a reset.");
        } else {
            let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
            println!("Reset task lists: {}", ids.join(", "));
        }
    });
}

pub fn cmd_shopping_add(title: String, silent: bool) {
    let res = with_household(|store, session| store.current_family_mut(session)?.add_shopping_list(&title, Utc::now()));
    report(res, silent, |id| println!("Shopping list added (id = {})", id));
}

pub fn cmd_shopping_list() {
    let res = snapshot().and_then(|(store, session)| {
        let family = store.current_family(&session)?;
        if family.shopping_lists.is_empty() {
            return Ok(None);
        }
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec![bold("ID"), bold("Title"), bold("To Buy"), bold("Total")]);
        for l in &family.shopping_lists {
            let left = unchecked_count(l);
            table.add_row(vec![
                Cell::new(l.id),
                Cell::new(&l.title),
                Cell::new(left).fg(if left > 0 { Color::Yellow } else { Color::Green }),
                Cell::new(l.items.len()),
            ]);
        }
        Ok(Some(table))
    });
    report(res, false, |table| match table {
        Some(t) => println!("{t}"),
        None => println!("No shopping lists found."),
    });
}

pub fn cmd_shopping_show(list: u64) {
    let res = snapshot().and_then(|(store, session)| {
        let l = store.current_family(&session)?.shopping_list(list)?;
        Ok((l.title.clone(), items_table(&l.items)))
    });
    report(res, false, |(title, table)| {
        println!("{}", title);
        println!("{table}");
    });
}

pub fn cmd_shopping_remove(list: u64, silent: bool) {
    let res = with_household(|store, session| store.current_family_mut(session)?.remove_shopping_list(list));
    report(res, silent, |l| println!("Shopping list '{}' removed.", l.title));
}

pub fn cmd_shopping_item_add(list: u64, name: String, silent: bool) {
    let res = with_household(|store, session| store.current_family_mut(session)?.add_shopping_item(list, &name));
    report(res, silent, |id| println!("Item added (id = {})", id));
}

pub fn cmd_shopping_item_toggle(list: u64, item: u64, silent: bool) {
    let res = with_household(|store, session| store.current_family_mut(session)?.toggle_shopping_item(list, item));
    report(res, silent, |checked| {
        println!("Item {} marked as {}.", item, if checked { "bought" } else { "to buy" });
    });
}

pub fn cmd_shopping_item_remove(list: u64, item: u64, silent: bool) {
    let res = with_household(|store, session| store.current_family_mut(session)?.remove_shopping_item(list, item));
    report(res, silent, |i| println!("Item '{}' removed.", i.name));
}

pub fn cmd_recipe_add(title: String, description: Option<String>, link: Option<String>, silent: bool) {
    let res = with_household(|store, session| {
        store.current_family_mut(session)?.add_recipe(&title, description, link, Utc::now())
    });
    report(res, silent, |id| println!("Recipe added (id = {})", id));
}

pub fn cmd_recipe_list() {
    let res = snapshot().and_then(|(store, session)| {
        let family = store.current_family(&session)?;
        if family.recipes.is_empty() {
            return Ok(None);
        }
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![bold("ID"), bold("Title"), bold("Description"), bold("Link")]);
        for r in &family.recipes {
            table.add_row(vec![
                Cell::new(r.id),
                Cell::new(&r.title),
                Cell::new(r.description.as_deref().unwrap_or("-")),
                Cell::new(r.link.as_deref().unwrap_or("-")),
            ]);
        }
        Ok(Some(table))
    });
    report(res, false, |table| match table {
        Some(t) => println!("{t}"),
        None => println!("No recipes found."),
    });
}

/// Removes a recipe; meals planned with it are cleared too.
pub fn cmd_recipe_remove(id: u64, silent: bool) {
    let res = with_household(|store, session| store.current_family_mut(session)?.remove_recipe(id));
    report(res, silent, |r| println!("Recipe '{}' removed.", r.title));
}

/// Plans a recipe for a date (YYYY-MM-DD), or clears the date when `recipe` is `None`.
pub fn cmd_meal_set(date: String, recipe: Option<u64>, silent: bool) {
    let res = with_household(|store, session| {
        let date = parse_date(&date)?;
        store.current_family_mut(session)?.set_meal_plan(date, recipe)?;
        Ok(date)
    });
    report(res, silent, |date| match recipe {
        Some(id) => println!("Recipe {} planned for {}.", id, date),
        None => println!("Cleared meal plan for {}.", date),
    });
}

/// Shows the meal plan of the week containing `date` (default: today).
pub fn cmd_meal_week(date: Option<String>) {
    let res = snapshot().and_then(|(store, session)| {
        let day = match &date {
            Some(d) => parse_date(d)?,
            None => Local::now().date_naive(),
        };
        let family = store.current_family(&session)?;
        let week = current_week_dates(day);
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec![bold("Day"), bold("Date"), bold("Meal")]);
        for (d, recipe) in week_plan(family, &week) {
            let meal = match recipe {
                Some(r) => Cell::new(&r.title),
                None => Cell::new("-").fg(Color::Grey),
            };
            let highlight = if d == day { Attribute::Bold } else { Attribute::NormalIntensity };
            table.add_row(vec![Cell::new(d.format("%A")).add_attribute(highlight), Cell::new(d), meal]);
        }
        Ok(table)
    });
    report(res, false, |table| println!("{table}"));
}

fn summary_line(kind: &str, summary: &ListSummary, ratio: f64) -> String {
    let next = if summary.first_list_name.is_empty() {
        "all done".to_string()
    } else {
        format!("next: {} ({} left)", summary.first_list_name, summary.first_list_items_left)
    };
    format!(
        "{}: {} lists, {}/{} open, {:.0}% done, {}",
        kind,
        summary.active_lists_count,
        summary.unchecked_items,
        summary.total_items,
        ratio * 100.0,
        next
    )
}

/// Prints the home dashboard for the current family.
pub fn cmd_home() {
    let res = snapshot().and_then(|(store, session)| {
        let family = store.current_family(&session)?;
        let today = Local::now().date_naive();
        let week = current_week_dates(today);
        let shopping = summarize(&family.shopping_lists);
        let tasks = summarize(&family.task_lists);

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec![bold(&family.name), bold("")]);
        table.add_row(vec![Cell::new("Items to buy"), Cell::new(shopping.unchecked_items)]);
        table.add_row(vec![Cell::new("Tasks due"), Cell::new(tasks.unchecked_items)]);
        table.add_row(vec![
            Cell::new("Meals planned this week"),
            Cell::new(format!("{}/7", meals_planned_in(&family.meal_plans, &week))),
        ]);
        table.add_row(vec![Cell::new("Join code"), Cell::new(&family.join_code)]);

        let mut lines = vec![
            summary_line("Shopping", &shopping, progress_ratio(&family.shopping_lists)),
            summary_line("Tasks", &tasks, progress_ratio(&family.task_lists)),
        ];
        for m in members_of(family, &store.users) {
            lines.push(format!("  {} ({})", m.display_name, m.role));
        }
        Ok((table, lines))
    });
    report(res, false, |(table, lines)| {
        println!("{table}");
        for (i, l) in lines.iter().enumerate() {
            if i == 2 { println!("Members:"); }
            println!("{}", l);
        }
    });
}

/// Deletes all stored data and the session.
pub fn cmd_wipe(force: bool) {
    if !force {
        print!("Are you sure you want to delete all families, lists and recipes? This cannot be undone. [y/N] ");
        let _ = io::stdout().flush();
        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() || input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = delete_database() {
        eprintln!("Failed to wipe database: {}", e);
    } else {
        println!("Database wiped.");
    }
}
