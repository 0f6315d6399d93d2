use chrono::{Datelike, Duration, NaiveDate};
use crate::models::{Family, MealPlan, Recipe};

/// Monday through Sunday of the week containing `today`.
pub fn current_week_dates(today: NaiveDate) -> [NaiveDate; 7] {
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    std::array::from_fn(|i| monday + Duration::days(i as i64))
}

/// How many dates of `week` have a recipe planned.
pub fn meals_planned_in(plans: &[MealPlan], week: &[NaiveDate]) -> usize {
    plans
        .iter()
        .filter(|p| p.recipe_id.is_some() && week.contains(&p.date))
        .count()
}

/// Each date of `week` with its planned recipe, if any.
pub fn week_plan<'a>(family: &'a Family, week: &[NaiveDate]) -> Vec<(NaiveDate, Option<&'a Recipe>)> {
    week.iter()
        .map(|date| {
            let recipe = family
                .meal_plans
                .iter()
                .find(|p| p.date == *date)
                .and_then(|p| p.recipe_id)
                .and_then(|id| family.recipe(id));
            (*date, recipe)
        })
        .collect()
}
