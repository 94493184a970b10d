// ABOUTME: Human-readable summaries for every stored entity
// ABOUTME: Shared by list endpoints and by tool results rendered back to the model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Summary formatters
//!
//! Tool results go back to the model as plain text, so every entity renders
//! to a compact one-line summary, and a week renders to a multi-line plan.
//! IDs are included so the model can refer back to records in later calls.

use std::fmt::Write as _;

use crate::database::{
    Cook, Log, PhotoLog, Prep, Project, Recipe, Session, Shop, StartingStatus, Week,
};
use crate::models::DayOfWeek;

/// One-line human-readable rendering
pub trait Summary {
    /// Render the summary
    fn summary(&self) -> String;
}

impl Summary for Week {
    fn summary(&self) -> String {
        let mut out = format!("Week {} of {} [id: {}]", self.week_number, self.year, self.id);
        if let Some(notes) = &self.notes {
            let _ = write!(out, " - {notes}");
        }
        out
    }
}

impl Summary for Recipe {
    fn summary(&self) -> String {
        let mut out = format!("{} [id: {}]", self.name, self.id);
        if let Some(servings) = self.servings {
            let _ = write!(out, ", serves {servings}");
        }
        if let Some(total) = self.total_time_mins() {
            let _ = write!(out, ", {total} min");
        }
        if !self.tags.is_empty() {
            let _ = write!(out, " ({})", self.tags.join(", "));
        }
        out
    }
}

impl Summary for Project {
    fn summary(&self) -> String {
        let mut out = format!("{} [{}] [id: {}]", self.name, self.status, self.id);
        if let Some(description) = &self.description {
            let _ = write!(out, " - {description}");
        }
        out
    }
}

impl Summary for Cook {
    fn summary(&self) -> String {
        let check = if self.completed { "x" } else { " " };
        let when = self
            .day
            .map_or_else(|| "Unscheduled".to_owned(), |d| d.display_name().to_owned());
        let mut out = format!("[{check}] {when} {}: {} [id: {}]", self.meal, self.title, self.id);
        if let Some(servings) = self.servings {
            let _ = write!(out, ", {servings} servings");
        }
        if let Some(notes) = &self.notes {
            let _ = write!(out, " - {notes}");
        }
        out
    }
}

impl Summary for Prep {
    fn summary(&self) -> String {
        let check = if self.completed { "x" } else { " " };
        let when = self
            .day
            .map_or_else(|| "Anytime".to_owned(), |d| d.display_name().to_owned());
        format!("[{check}] {when}: {} [id: {}]", self.description, self.id)
    }
}

impl Summary for Shop {
    fn summary(&self) -> String {
        let check = if self.purchased { "x" } else { " " };
        let mut out = format!("[{check}] {}", self.item);
        if let Some(quantity) = &self.quantity {
            let _ = write!(out, " ({quantity})");
        }
        if let Some(store) = &self.store {
            let _ = write!(out, " @ {store}");
        }
        let _ = write!(out, " [id: {}]", self.id);
        out
    }
}

impl Summary for StartingStatus {
    fn summary(&self) -> String {
        let mut out = if self.inventory.is_empty() {
            "On hand: nothing recorded".to_owned()
        } else {
            format!("On hand: {}", self.inventory.join(", "))
        };
        if let Some(notes) = &self.notes {
            let _ = write!(out, " - {notes}");
        }
        out
    }
}

impl Summary for Session {
    fn summary(&self) -> String {
        let mut out = format!("Session {} ({} messages)", self.instance, self.messages.len());
        if let Some(weight) = self.weight {
            let _ = write!(out, ", weight {weight}");
        }
        out
    }
}

impl Summary for Log {
    fn summary(&self) -> String {
        let mut out = format!("{} [{}] {}", self.instance, self.category, self.content);
        if let Some(value) = self.value {
            let _ = write!(out, " ({value})");
        }
        let _ = write!(out, " [id: {}]", self.id);
        out
    }
}

impl Summary for PhotoLog {
    fn summary(&self) -> String {
        let caption = self.caption.as_deref().unwrap_or("(no caption)");
        format!("{} photo: {caption} <{}>", self.instance, self.image_url)
    }
}

/// Render a list as bullet lines, or `empty` when there is nothing to show
pub fn summarize_list<T: Summary>(items: &[T], empty: &str) -> String {
    if items.is_empty() {
        return empty.to_owned();
    }
    items
        .iter()
        .map(|item| format!("- {}", item.summary()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line plan for a week: cooks by day, preps, shopping list, starting status
#[must_use]
pub fn week_plan_summary(
    week: &Week,
    cooks: &[Cook],
    preps: &[Prep],
    shops: &[Shop],
    status: Option<&StartingStatus>,
) -> String {
    let mut out = week.summary();
    out.push('\n');

    if let Some(status) = status {
        let _ = writeln!(out, "{}", status.summary());
    }

    out.push_str("\nMeals:\n");
    if cooks.is_empty() {
        out.push_str("  (none planned)\n");
    } else {
        let mut ordered: Vec<&Cook> = cooks.iter().collect();
        ordered.sort_by_key(|c| c.day.map_or(DayOfWeek::ALL.len(), day_index));
        for cook in ordered {
            let _ = writeln!(out, "  {}", cook.summary());
        }
    }

    out.push_str("\nPrep:\n");
    if preps.is_empty() {
        out.push_str("  (none planned)\n");
    } else {
        for prep in preps {
            let _ = writeln!(out, "  {}", prep.summary());
        }
    }

    out.push_str("\nShopping:\n");
    if shops.is_empty() {
        out.push_str("  (empty)\n");
    } else {
        let remaining = shops.iter().filter(|s| !s.purchased).count();
        for shop in shops {
            let _ = writeln!(out, "  {}", shop.summary());
        }
        let _ = writeln!(out, "  {remaining} of {} still to buy", shops.len());
    }

    out.trim_end().to_owned()
}

fn day_index(day: DayOfWeek) -> usize {
    DayOfWeek::ALL
        .iter()
        .position(|d| *d == day)
        .unwrap_or(DayOfWeek::ALL.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::MealSlot;

    fn week() -> Week {
        Week {
            id: Uuid::new_v4(),
            year: 2026,
            week_number: 8,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn cook(week_id: Uuid, title: &str, day: Option<DayOfWeek>) -> Cook {
        Cook {
            id: Uuid::new_v4(),
            week_id,
            recipe_id: None,
            title: title.to_owned(),
            day,
            meal: MealSlot::Dinner,
            servings: Some(4),
            notes: None,
            completed: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_plan_orders_cooks_by_day() {
        let w = week();
        let cooks = vec![
            cook(w.id, "Tacos", Some(DayOfWeek::Friday)),
            cook(w.id, "Leftovers", None),
            cook(w.id, "Chili", Some(DayOfWeek::Monday)),
        ];
        let plan = week_plan_summary(&w, &cooks, &[], &[], None);
        let chili = plan.find("Chili").unwrap();
        let tacos = plan.find("Tacos").unwrap();
        let leftovers = plan.find("Leftovers").unwrap();
        assert!(chili < tacos && tacos < leftovers);
        assert!(plan.contains("Week 8 of 2026"));
        assert!(plan.contains("Shopping:\n  (empty)"));
    }

    #[test]
    fn test_summarize_list_empty() {
        let empty: Vec<Week> = Vec::new();
        assert_eq!(summarize_list(&empty, "No weeks yet."), "No weeks yet.");
    }

    #[test]
    fn test_shop_summary() {
        let shop = Shop {
            id: Uuid::nil(),
            week_id: Uuid::nil(),
            item: "Onions".to_owned(),
            quantity: Some("3".to_owned()),
            store: Some("Market".to_owned()),
            purchased: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(shop.summary().starts_with("[x] Onions (3) @ Market"));
    }
}
