// ABOUTME: System prompts for the Sgt Chef cooking assistant and the accountability coach
// ABOUTME: Prompts embed today's date and the relevant calendar period
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;

use crate::calendar::{iso_week_of, InstanceKey};

/// System prompt for Sgt Chef; the planning week is the ISO week of `today`
#[must_use]
pub fn chef_system_prompt(today: NaiveDate) -> String {
    let (year, week_number) = iso_week_of(today);
    format!(
        "You are Sgt Chef, a no-nonsense but warm kitchen drill sergeant who helps plan \
meals, manage recipes and keep the shopping list honest.\n\
\n\
Today is {today} ({weekday}). The current planning week is week {week_number} of {year}.\n\
\n\
Guidelines:\n\
- Use the tools to read and change the plan. Never invent recipes, weeks or IDs; \
look them up first.\n\
- When planning meals, call get_current_week or get_week_plan to find the week ID, \
then plan_cook / plan_prep / add_shopping_item.\n\
- Prefer linking cooks to saved recipes. Save new recipes with create_recipe when \
the user asks for one.\n\
- Keep answers short and practical. Use bullet lists for plans and shopping lists.\n\
- If a tool returns an error, explain what went wrong and what you need from the user.",
        weekday = today.format("%A"),
    )
}

/// System prompt for the accountability coach bound to one instance
#[must_use]
pub fn coach_system_prompt(instance: &InstanceKey, today: NaiveDate) -> String {
    let start = instance.start_date;
    let end = instance.end_date();
    format!(
        "You are an accountability coach. You help the user stick to their habits, \
meals, workouts and weight goals with encouragement and honest follow-up.\n\
\n\
Today is {today}. This conversation is about {label} (instance `{key}`, \
{start} to {end}).\n\
\n\
Guidelines:\n\
- Call get_session and list_logs before summarizing progress.\n\
- Record what the user reports: use create_log for habits, meals and workouts, \
and record_weight for weigh-ins.\n\
- Always pass the instance `{key}` unless the user clearly means another period.\n\
- Be brief. Celebrate wins, name misses without judgment, and end with one \
concrete next step.",
        label = instance.label(),
        key = instance,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_chef_prompt_mentions_week() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
        let prompt = chef_system_prompt(today);
        assert!(prompt.contains("week 8 of 2026"));
        assert!(prompt.contains("Wednesday"));
    }

    #[test]
    fn test_chef_prompt_week_follows_date_across_week_boundary() {
        let sunday = NaiveDate::from_ymd_opt(2026, 2, 22).unwrap();
        let prompt = chef_system_prompt(sunday);
        assert!(prompt.contains("Today is 2026-02-22 (Sunday)"));
        assert!(prompt.contains("week 8 of 2026"));

        let monday = sunday.succ_opt().unwrap();
        let prompt = chef_system_prompt(monday);
        assert!(prompt.contains("Today is 2026-02-23 (Monday)"));
        assert!(prompt.contains("week 9 of 2026"));
    }

    #[test]
    fn test_chef_prompt_uses_iso_year_at_new_year() {
        // 2027-01-01 is a Friday in ISO week 53 of 2026
        let today = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        let prompt = chef_system_prompt(today);
        assert!(prompt.contains("week 53 of 2026"));
    }

    #[test]
    fn test_coach_prompt_mentions_instance() {
        let key: InstanceKey = "week202608".parse().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
        let prompt = coach_system_prompt(&key, today);
        assert!(prompt.contains("`week202608`"));
        assert!(prompt.contains("2026-02-16 to 2026-02-22"));
    }
}
