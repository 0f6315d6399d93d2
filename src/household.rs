//! Mutations of the household snapshot.
//!
//! Every operation that depends on who is signed in takes the [`Session`] explicitly;
//! nothing here reads global state, the clock, or the disk.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::info;
use crate::error::FamlyError;
use crate::membership::{self, find_by_join_code, generate_join_code, is_member, is_valid_join_code, normalize_join_code};
use crate::models::{Family, Item, MealPlan, Recipe, ResetInterval, Session, ShoppingList, Store, TaskList, User};
use crate::schedule::apply_reset;

fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().unwrap_or(0) + 1
}

fn non_blank(value: &str, what: &'static str) -> Result<String, FamlyError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FamlyError::Blank(what));
    }
    Ok(value.to_string())
}

impl Store {
    pub fn family(&self, id: u64) -> Result<&Family, FamlyError> {
        self.families.iter().find(|f| f.id == id).ok_or(FamlyError::FamilyNotFound(id))
    }

    fn family_mut(&mut self, id: u64) -> Result<&mut Family, FamlyError> {
        self.families.iter_mut().find(|f| f.id == id).ok_or(FamlyError::FamilyNotFound(id))
    }

    /// The session's current family, provided the session user still belongs to it.
    pub fn current_family(&self, session: &Session) -> Result<&Family, FamlyError> {
        let uid = session.require_user()?;
        let family = self.family(session.require_family()?)?;
        if !is_member(family, uid) {
            return Err(FamlyError::NotAMember(family.id));
        }
        Ok(family)
    }

    pub fn current_family_mut(&mut self, session: &Session) -> Result<&mut Family, FamlyError> {
        let uid = session.require_user()?;
        let family = self.family_mut(session.require_family()?)?;
        if !is_member(family, uid) {
            return Err(FamlyError::NotAMember(family.id));
        }
        Ok(family)
    }

    pub fn user(&self, uid: &str) -> Option<&User> {
        self.users.iter().find(|u| u.uid == uid)
    }

    pub fn join_codes(&self) -> HashSet<String> {
        self.families.iter().map(|f| f.join_code.clone()).collect()
    }

    /// Registers the user (or updates their profile) and makes them the session user.
    ///
    /// The current family is kept only if the user is a member of it.
    pub fn sign_in(
        &mut self,
        session: &mut Session,
        uid: &str,
        display_name: Option<String>,
        email: Option<String>,
    ) -> Result<(), FamlyError> {
        let uid = non_blank(uid, "user id")?;
        match self.users.iter_mut().find(|u| u.uid == uid) {
            Some(user) => {
                if let Some(n) = display_name { user.display_name = n; }
                if let Some(e) = email { user.email = e; }
            }
            None => {
                self.users.push(User {
                    uid: uid.clone(),
                    display_name: display_name.unwrap_or_default(),
                    email: email.unwrap_or_default(),
                });
                info!(%uid, "registered user");
            }
        }
        let keep_family = session
            .family_id
            .and_then(|id| self.family(id).ok())
            .is_some_and(|f| is_member(f, &uid));
        if !keep_family {
            session.family_id = None;
        }
        session.uid = Some(uid);
        Ok(())
    }

    /// Creates a family owned by the session user and makes it current.
    pub fn create_family(&mut self, session: &mut Session, name: &str, now: DateTime<Utc>) -> Result<&Family, FamlyError> {
        let uid = session.require_user()?.to_string();
        let name = non_blank(name, "family name")?;
        let id = next_id(self.families.iter().map(|f| f.id));
        let join_code = generate_join_code(&self.join_codes());
        info!(id, %name, %join_code, owner = %uid, "created family");
        self.families.push(Family::new(id, name, join_code, uid, now));
        session.family_id = Some(id);
        self.family(id)
    }

    /// Adds the session user to the family with this join code and makes it current.
    pub fn join_by_code(&mut self, session: &mut Session, code: &str) -> Result<&Family, FamlyError> {
        let uid = session.require_user()?.to_string();
        let code = normalize_join_code(code);
        if !is_valid_join_code(&code) {
            return Err(FamlyError::InvalidJoinCode(code));
        }
        let id = find_by_join_code(&self.families, &code)
            .map(|f| f.id)
            .ok_or_else(|| FamlyError::UnknownJoinCode(code.clone()))?;
        let family = self.family_mut(id)?;
        *family = membership::join_family(family.clone(), &uid);
        info!(family = id, %uid, "joined family");
        session.family_id = Some(id);
        self.family(id)
    }

    /// Switches the current family. Only families the user belongs to may be chosen.
    pub fn use_family(&self, session: &mut Session, id: u64) -> Result<&Family, FamlyError> {
        let uid = session.require_user()?;
        let family = self.family(id)?;
        if !is_member(family, uid) {
            return Err(FamlyError::NotAMember(id));
        }
        session.family_id = Some(id);
        Ok(family)
    }
}

fn add_item(items: &mut Vec<Item>, name: &str) -> Result<u64, FamlyError> {
    let name = non_blank(name, "item name")?;
    let id = next_id(items.iter().map(|i| i.id));
    items.push(Item { id, name, is_checked: false });
    Ok(id)
}

fn toggle_item(items: &mut [Item], list: u64, item: u64) -> Result<bool, FamlyError> {
    let entry = items
        .iter_mut()
        .find(|i| i.id == item)
        .ok_or(FamlyError::ItemNotFound { list, item })?;
    entry.is_checked = !entry.is_checked;
    Ok(entry.is_checked)
}

fn remove_item(items: &mut Vec<Item>, list: u64, item: u64) -> Result<Item, FamlyError> {
    let pos = items
        .iter()
        .position(|i| i.id == item)
        .ok_or(FamlyError::ItemNotFound { list, item })?;
    Ok(items.remove(pos))
}

impl Family {
    pub fn task_list(&self, id: u64) -> Result<&TaskList, FamlyError> {
        self.task_lists.iter().find(|l| l.id == id).ok_or(FamlyError::ListNotFound(id))
    }

    fn task_list_mut(&mut self, id: u64) -> Result<&mut TaskList, FamlyError> {
        self.task_lists.iter_mut().find(|l| l.id == id).ok_or(FamlyError::ListNotFound(id))
    }

    pub fn shopping_list(&self, id: u64) -> Result<&ShoppingList, FamlyError> {
        self.shopping_lists.iter().find(|l| l.id == id).ok_or(FamlyError::ListNotFound(id))
    }

    fn shopping_list_mut(&mut self, id: u64) -> Result<&mut ShoppingList, FamlyError> {
        self.shopping_lists.iter_mut().find(|l| l.id == id).ok_or(FamlyError::ListNotFound(id))
    }

    pub fn add_task_list(&mut self, title: &str, interval: ResetInterval, now: DateTime<Utc>) -> Result<u64, FamlyError> {
        let title = non_blank(title, "list title")?;
        let id = next_id(self.task_lists.iter().map(|l| l.id));
        info!(family = self.id, list = id, %title, %interval, "added task list");
        self.task_lists.push(TaskList {
            id,
            title,
            reset_interval: interval,
            items: Vec::new(),
            created_at: now,
            last_reset: None,
        });
        Ok(id)
    }

    /// Removes a task list together with its items.
    pub fn remove_task_list(&mut self, id: u64) -> Result<TaskList, FamlyError> {
        let pos = self.task_lists.iter().position(|l| l.id == id).ok_or(FamlyError::ListNotFound(id))?;
        info!(family = self.id, list = id, "removed task list");
        Ok(self.task_lists.remove(pos))
    }

    pub fn set_reset_interval(&mut self, list: u64, interval: ResetInterval) -> Result<(), FamlyError> {
        self.task_list_mut(list)?.reset_interval = interval;
        Ok(())
    }

    pub fn add_task(&mut self, list: u64, name: &str) -> Result<u64, FamlyError> {
        add_item(&mut self.task_list_mut(list)?.items, name)
    }

    /// Flips an item's checked state and returns the new state.
    pub fn toggle_task(&mut self, list: u64, item: u64) -> Result<bool, FamlyError> {
        toggle_item(&mut self.task_list_mut(list)?.items, list, item)
    }

    pub fn remove_task(&mut self, list: u64, item: u64) -> Result<Item, FamlyError> {
        remove_item(&mut self.task_list_mut(list)?.items, list, item)
    }

    /// Unchecks every item of a list regardless of its schedule.
    pub fn reset_task_list(&mut self, list: u64, today: NaiveDate) -> Result<(), FamlyError> {
        let list = self.task_list_mut(list)?;
        for item in list.items.iter_mut() {
            item.is_checked = false;
        }
        list.last_reset = Some(today);
        info!(list = list.id, "reset task list");
        Ok(())
    }

    /// Resets every list whose scheduled reset has passed by `now`, judged in `now`'s timezone.
    /// Returns the ids of the lists reset.
    pub fn reset_due_task_lists<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Vec<u64> {
        let reset: Vec<u64> = self
            .task_lists
            .iter_mut()
            .filter_map(|l| apply_reset(l, now).then_some(l.id))
            .collect();
        if !reset.is_empty() {
            info!(family = self.id, lists = ?reset, "reset due task lists");
        }
        reset
    }

    pub fn add_shopping_list(&mut self, title: &str, now: DateTime<Utc>) -> Result<u64, FamlyError> {
        let title = non_blank(title, "list title")?;
        let id = next_id(self.shopping_lists.iter().map(|l| l.id));
        info!(family = self.id, list = id, %title, "added shopping list");
        self.shopping_lists.push(ShoppingList { id, title, items: Vec::new(), created_at: now });
        Ok(id)
    }

    /// Removes a shopping list together with its items.
    pub fn remove_shopping_list(&mut self, id: u64) -> Result<ShoppingList, FamlyError> {
        let pos = self.shopping_lists.iter().position(|l| l.id == id).ok_or(FamlyError::ListNotFound(id))?;
        info!(family = self.id, list = id, "removed shopping list");
        Ok(self.shopping_lists.remove(pos))
    }

    pub fn add_shopping_item(&mut self, list: u64, name: &str) -> Result<u64, FamlyError> {
        add_item(&mut self.shopping_list_mut(list)?.items, name)
    }

    pub fn toggle_shopping_item(&mut self, list: u64, item: u64) -> Result<bool, FamlyError> {
        toggle_item(&mut self.shopping_list_mut(list)?.items, list, item)
    }

    pub fn remove_shopping_item(&mut self, list: u64, item: u64) -> Result<Item, FamlyError> {
        remove_item(&mut self.shopping_list_mut(list)?.items, list, item)
    }

    pub fn add_recipe(
        &mut self,
        title: &str,
        description: Option<String>,
        link: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<u64, FamlyError> {
        let title = non_blank(title, "recipe title")?;
        let id = next_id(self.recipes.iter().map(|r| r.id));
        info!(family = self.id, recipe = id, %title, "added recipe");
        self.recipes.push(Recipe {
            id,
            title,
            description: description.filter(|d| !d.trim().is_empty()),
            link: link.filter(|l| !l.trim().is_empty()),
            created_at: now,
        });
        Ok(id)
    }

    /// Removes a recipe and every meal plan that pointed at it.
    pub fn remove_recipe(&mut self, id: u64) -> Result<Recipe, FamlyError> {
        let pos = self.recipes.iter().position(|r| r.id == id).ok_or(FamlyError::RecipeNotFound(id))?;
        self.meal_plans.retain(|p| p.recipe_id != Some(id));
        info!(family = self.id, recipe = id, "removed recipe");
        Ok(self.recipes.remove(pos))
    }

    /// Plans `recipe` for `date`, replacing any earlier choice. `None` clears the date.
    pub fn set_meal_plan(&mut self, date: NaiveDate, recipe: Option<u64>) -> Result<(), FamlyError> {
        if let Some(id) = recipe {
            if self.recipe(id).is_none() {
                return Err(FamlyError::RecipeNotFound(id));
            }
        }
        self.meal_plans.retain(|p| p.date != date);
        if recipe.is_some() {
            self.meal_plans.push(MealPlan { date, recipe_id: recipe });
            self.meal_plans.sort_by_key(|p| p.date);
        }
        info!(family = self.id, %date, ?recipe, "set meal plan");
        Ok(())
    }
}
