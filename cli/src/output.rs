//! Plain-text rendering for terminal output.

use diary::calendar::WEEKDAY_HEADERS;
use diary::{DayGroup, DiaryStats, FoodEntry, MealSection, MonthGrid, labels};
use time::{Date, UtcOffset};

const CELL_WIDTH: usize = 4;

/// `  8:05 AM  🍳 Breakfast  eggs  [id]`
pub fn entry_line(entry: &FoodEntry, offset: UtcOffset) -> String {
    let meal = entry.meal_type;
    format!(
        "{time:>8}  {emoji} {label:<9}  {text}  [{id}]",
        time = labels::entry_time(entry.logged_at, offset),
        emoji = meal.emoji(),
        label = meal.label(),
        text = entry.food_text,
        id = entry.id,
    )
}

fn entry_lines(out: &mut String, entries: &[FoodEntry], offset: UtcOffset) {
    for entry in entries {
        out.push_str("  ");
        out.push_str(&entry_line(entry, offset));
        out.push('\n');
    }
}

/// Day-grouped timeline, newest day first.
pub fn timeline(groups: &[DayGroup], today: Date, offset: UtcOffset) -> String {
    if groups.is_empty() {
        return "No entries yet. Log your first meal with `heynom-cli add`.".to_owned();
    }
    let mut out = String::new();
    for group in groups {
        out.push_str(&format!(
            "{} · {}\n",
            labels::date_header(group.date, today),
            labels::entry_count(group.entries.len())
        ));
        entry_lines(&mut out, &group.entries, offset);
        out.push('\n');
    }
    out.trim_end().to_owned()
}

/// One day split into meal sections.
pub fn day(date: Date, today: Date, sections: &[MealSection], offset: UtcOffset) -> String {
    let mut out = format!("{}\n", labels::nav_date(date, today));
    if sections.is_empty() {
        out.push_str(if date == today { "Nothing logged yet today." } else { "Nothing logged this day." });
        return out;
    }
    for section in sections {
        out.push_str(&format!("\n{} {}\n", section.meal_type.emoji(), section.meal_type.label()));
        entry_lines(&mut out, &section.entries, offset);
    }
    out.trim_end().to_owned()
}

/// Month grid. `*` marks days with entries, `>` the selected day.
pub fn calendar(grid: &MonthGrid, selected: Date, selected_entries: &[FoodEntry], offset: UtcOffset) -> String {
    let mut out = format!("{}\n", labels::month_title(grid.year, grid.month));
    for header in WEEKDAY_HEADERS {
        out.push_str(&format!("{header:>width$}", width = CELL_WIDTH));
    }
    out.push('\n');

    for week in &grid.weeks {
        let mut line = String::new();
        for day in week {
            if day.in_month {
                let pointer = if day.is_selected { '>' } else { ' ' };
                let mark = if day.has_entries { '*' } else { ' ' };
                line.push_str(&format!("{pointer}{:>2}{mark}", day.date.day()));
            } else {
                line.push_str(&" ".repeat(CELL_WIDTH));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(&format!("\n{}\n", labels::long_date(selected)));
    if selected_entries.is_empty() {
        out.push_str("No entries for this day");
    } else {
        entry_lines(&mut out, selected_entries, offset);
    }
    out.trim_end().to_owned()
}

pub fn stats(stats: DiaryStats) -> String {
    format!("Today: {}\nDay streak: {}", stats.today_count, stats.streak)
}

#[cfg(test)]
#[path = "output_test.rs"]
mod tests;
