use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FamlyError;

/// How often a task list's checked state is expected to clear.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResetInterval {
    Daily,
    #[default]
    Weekly,
    Monthly,
    /// No scheduled reset.
    Custom,
}

impl fmt::Display for ResetInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResetInterval::Daily => "daily",
            ResetInterval::Weekly => "weekly",
            ResetInterval::Monthly => "monthly",
            ResetInterval::Custom => "custom",
        };
        f.write_str(s)
    }
}

impl FromStr for ResetInterval {
    type Err = FamlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(ResetInterval::Daily),
            "weekly" => Ok(ResetInterval::Weekly),
            "monthly" => Ok(ResetInterval::Monthly),
            "custom" => Ok(ResetInterval::Custom),
            _ => Err(FamlyError::InvalidInterval(s.to_string())),
        }
    }
}

/// A single entry of a task or shopping list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Item {
    /// Unique within the owning list.
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub is_checked: bool,
}

/// A recurring chore list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskList {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub reset_interval: ResetInterval,
    #[serde(default)]
    pub items: Vec<Item>,
    pub created_at: DateTime<Utc>,
    /// Date the items were last cleared by a reset, if ever.
    #[serde(default)]
    pub last_reset: Option<NaiveDate>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ShoppingList {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub items: Vec<Item>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The meal chosen for one calendar date.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MealPlan {
    pub date: NaiveDate,
    #[serde(default)]
    pub recipe_id: Option<u64>,
}

/// A household group. Owns every list, recipe and meal plan beneath it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Family {
    pub id: u64,
    pub name: String,
    pub join_code: String,
    /// Member uids in join order, without duplicates.
    pub members: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub task_lists: Vec<TaskList>,
    #[serde(default)]
    pub shopping_lists: Vec<ShoppingList>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub meal_plans: Vec<MealPlan>,
}

impl Family {
    /// A new family whose only member is its creator.
    pub fn new(id: u64, name: String, join_code: String, created_by: String, created_at: DateTime<Utc>) -> Family {
        Family {
            id,
            name,
            join_code,
            members: vec![created_by.clone()],
            created_by,
            created_at,
            task_lists: Vec::new(),
            shopping_lists: Vec::new(),
            recipes: Vec::new(),
            meal_plans: Vec::new(),
        }
    }

    pub fn recipe(&self, id: u64) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub uid: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
}

/// Derived from `Family::created_by`; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Owner,
    Member,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Owner => f.write_str("Owner"),
            Role::Member => f.write_str("Member"),
        }
    }
}

/// A family member as shown to other members.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberView {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}

/// The materialised snapshot of everything stored.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Store {
    #[serde(default)]
    pub families: Vec<Family>,
    #[serde(default)]
    pub users: Vec<User>,
}

/// Who is signed in and which family they are looking at.
///
/// Passed explicitly to every operation that needs a current user or family.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Session {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub family_id: Option<u64>,
}

impl Session {
    pub fn require_user(&self) -> Result<&str, FamlyError> {
        self.uid.as_deref().ok_or(FamlyError::NotSignedIn)
    }

    pub fn require_family(&self) -> Result<u64, FamlyError> {
        self.family_id.ok_or(FamlyError::NoCurrentFamily)
    }
}
