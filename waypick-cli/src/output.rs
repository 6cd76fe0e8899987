/// Output formatting: terminal tables and JSON.
use serde::Serialize;
use waypick_core::{win_probabilities, Item};

use crate::store::UserRecord;

#[derive(Serialize)]
struct JsonWay {
    way: String,
    score: Option<i64>,
    tickets: usize,
    probability: f64,
}

#[derive(Serialize)]
struct JsonPick {
    choice: String,
    ways: Vec<JsonWay>,
}

#[derive(Serialize)]
struct JsonSession {
    index: usize,
    phase: String,
    ways: Vec<String>,
    sorted: bool,
    last_pick: Option<String>,
}

/// Odds table for a weighted draw, with the winner marked.
pub fn render_pick_table(items: &[Item], winner: usize) -> String {
    let probs = win_probabilities(items);
    let name_width = items.iter().map(|i| i.text.chars().count()).max().unwrap_or(3).max(3);

    let mut out = String::new();
    out.push_str(&format!("   | {:<name_width$} | Score | Tickets |   Odds\n", "Way"));
    out.push_str(&format!("---|-{}-|-------|---------|-------\n", "-".repeat(name_width)));
    for (k, (item, p)) in items.iter().zip(&probs).enumerate() {
        let marker = if k == winner { ">>" } else { "" };
        let score = if item.is_scored() { item.score.to_string() } else { "-".to_string() };
        out.push_str(&format!(
            "{:>2} | {:<name_width$} | {:>5} | {:>7} | {:>5.1}%\n",
            marker,
            item.text,
            score,
            item.tickets(),
            p * 100.0,
        ));
    }
    out.push_str(&format!("\nYour way: {}", items[winner].text));
    out
}

pub fn render_pick_json(items: &[Item], winner: usize) -> String {
    let probs = win_probabilities(items);
    let output = JsonPick {
        choice: items[winner].text.clone(),
        ways: items
            .iter()
            .zip(probs)
            .map(|(item, probability)| JsonWay {
                way: item.text.clone(),
                score: item.is_scored().then_some(item.score),
                tickets: item.tickets(),
                probability,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|e| crate::bail(format!("Failed to encode JSON: {e}")))
}

pub fn render_history_table(record: &UserRecord) -> String {
    if record.sessions.is_empty() {
        return format!("No saved decisions for {}.", record.user);
    }
    let mut out = format!("Decisions for {}:\n", record.user);
    for (k, session) in record.sessions.iter().enumerate() {
        let ways: Vec<&str> = session.items().iter().map(|i| i.text.as_str()).collect();
        let pick = session
            .last_pick()
            .map(|p| format!(" -> {p}"))
            .unwrap_or_default();
        out.push_str(&format!(
            "\n{:>3}. [{}] {}{}",
            k + 1,
            session.phase(),
            if ways.is_empty() { "(no ways)".to_string() } else { ways.join(", ") },
            pick,
        ));
    }
    out
}

pub fn render_history_json(record: &UserRecord) -> String {
    let sessions: Vec<JsonSession> = record
        .sessions
        .iter()
        .enumerate()
        .map(|(k, session)| JsonSession {
            index: k + 1,
            phase: session.phase().to_string(),
            ways: session.items().iter().map(|i| i.text.clone()).collect(),
            sorted: session.is_sorted(),
            last_pick: session.last_pick().map(str::to_string),
        })
        .collect();
    serde_json::to_string_pretty(&sessions).unwrap_or_else(|e| crate::bail(format!("Failed to encode JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ways() -> Vec<Item> {
        vec![Item::with_score("Sea", 9), Item::new("Home")]
    }

    #[test]
    fn test_pick_table_marks_winner() {
        let table = render_pick_table(&ways(), 0);
        let sea_line = table.lines().find(|l| l.contains("Sea")).unwrap();
        assert!(sea_line.starts_with(">>"));
        assert!(sea_line.contains("90.0%"));
        let home_line = table.lines().find(|l| l.contains("Home") && l.contains('|')).unwrap();
        assert!(home_line.contains("10.0%"));
        assert!(table.ends_with("Your way: Sea"));
    }

    #[test]
    fn test_pick_table_aligns_non_ascii_ways() {
        let items = vec![Item::with_score("Море", 3), Item::new("Sea")];
        let table = render_pick_table(&items, 0);
        let bars: Vec<Vec<usize>> = table
            .lines()
            .filter(|l| l.contains('|'))
            .map(|l| l.chars().enumerate().filter(|&(_, c)| c == '|').map(|(k, _)| k).collect())
            .collect();
        assert_eq!(bars.len(), 4);
        assert!(bars.iter().all(|b| *b == bars[0]));
        // Name column is exactly as wide as the longest way, in characters.
        assert_eq!(bars[0][1] - bars[0][0], " Море ".chars().count() + 1);
    }

    #[test]
    fn test_pick_json() {
        let json: serde_json::Value = serde_json::from_str(&render_pick_json(&ways(), 1)).unwrap();
        assert_eq!(json["choice"], "Home");
        assert_eq!(json["ways"][0]["tickets"], 9);
        assert_eq!(json["ways"][1]["score"], serde_json::Value::Null);
        assert_eq!(json["ways"][1]["tickets"], 1);
    }

    #[test]
    fn test_empty_history() {
        let record = UserRecord::new("ann");
        assert_eq!(render_history_table(&record), "No saved decisions for ann.");
        assert_eq!(render_history_json(&record).trim(), "[]");
    }

    #[test]
    fn test_history_lists_sessions() {
        let mut record = UserRecord::new("ann");
        let s = record.begin();
        s.start_adding().unwrap();
        s.add_way("Sea").unwrap();
        let table = render_history_table(&record);
        assert!(table.contains("1. [adding ways] Sea"));

        let json: serde_json::Value = serde_json::from_str(&render_history_json(&record)).unwrap();
        assert_eq!(json[0]["ways"][0], "Sea");
        assert_eq!(json[0]["sorted"], false);
    }
}
