/// Parsing of user input: item lists from files or flags, and the short
/// replies typed during a conversation.
use waypick_core::Item;

use crate::bail;

/// Parse a string as either a JSON array of strings or plain text (one item per line).
pub fn parse_items_from_str(content: &str) -> Vec<String> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        let items: Vec<String> = serde_json::from_str(trimmed)
            .unwrap_or_else(|e| bail(format!("File looks like JSON but failed to parse: {e}")));
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    } else {
        trimmed
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Parse `text:score` into a scored item. Without a trailing integer after
/// the last colon the whole string is the text and the item stays unscored,
/// so "Option: the cheap one" keeps its colon.
pub fn parse_scored_item(raw: &str) -> Item {
    let raw = raw.trim();
    if let Some((text, score)) = raw.rsplit_once(':') {
        if let Ok(score) = score.trim().parse::<i64>() {
            let text = text.trim();
            if !text.is_empty() {
                return Item::with_score(text, score);
            }
        }
    }
    Item::new(raw)
}

/// What the user asked for at the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Sort,
    Score,
    Answer,
    /// Leave now; the session is kept and resumed next time.
    Quit,
    /// Throw the current decision away.
    Cancel,
}

pub fn parse_menu_choice(line: &str) -> Option<MenuChoice> {
    match line.trim().to_lowercase().as_str() {
        "s" | "sort" => Some(MenuChoice::Sort),
        "c" | "score" => Some(MenuChoice::Score),
        "a" | "answer" | "again" => Some(MenuChoice::Answer),
        "q" | "quit" | "exit" => Some(MenuChoice::Quit),
        "x" | "cancel" => Some(MenuChoice::Cancel),
        _ => None,
    }
}

/// A reply to "which of these two do you prefer?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonReply {
    First,
    Second,
    Quit,
    Cancel,
}

pub fn parse_comparison(line: &str) -> Option<ComparisonReply> {
    match line.trim().to_lowercase().as_str() {
        "1" => Some(ComparisonReply::First),
        "2" => Some(ComparisonReply::Second),
        "q" | "quit" | "exit" => Some(ComparisonReply::Quit),
        "x" | "cancel" => Some(ComparisonReply::Cancel),
        _ => None,
    }
}

/// Words that end the adding stage instead of being added as a way.
pub fn is_done_marker(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.eq_ignore_ascii_case("done")
}

/// Words that abandon the decision in free-text stages.
pub fn is_cancel(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "x" | "cancel")
}

pub fn is_quit(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "q" | "quit" | "exit")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines() {
        let items = parse_items_from_str("\n  Sea \n\nMountains\n  \n");
        assert_eq!(items, vec!["Sea", "Mountains"]);
    }

    #[test]
    fn test_parse_json_array() {
        let items = parse_items_from_str(r#"  ["Sea", " ", "Mountains:3"] "#);
        assert_eq!(items, vec!["Sea", "Mountains:3"]);
    }

    #[test]
    fn test_parse_scored_item() {
        let item = parse_scored_item("Sea: 9");
        assert_eq!(item.text, "Sea");
        assert_eq!(item.score, 9);

        let item = parse_scored_item("Option: the cheap one");
        assert_eq!(item.text, "Option: the cheap one");
        assert!(!item.is_scored());

        let item = parse_scored_item("Stay home");
        assert_eq!(item.text, "Stay home");
        assert!(!item.is_scored());

        let item = parse_scored_item(":5");
        assert_eq!(item.text, ":5");
    }

    #[test]
    fn test_menu_choices() {
        assert_eq!(parse_menu_choice(" S "), Some(MenuChoice::Sort));
        assert_eq!(parse_menu_choice("score"), Some(MenuChoice::Score));
        assert_eq!(parse_menu_choice("again"), Some(MenuChoice::Answer));
        assert_eq!(parse_menu_choice("x"), Some(MenuChoice::Cancel));
        assert_eq!(parse_menu_choice("maybe"), None);
    }

    #[test]
    fn test_comparison_replies() {
        assert_eq!(parse_comparison("1"), Some(ComparisonReply::First));
        assert_eq!(parse_comparison(" 2\n"), Some(ComparisonReply::Second));
        assert_eq!(parse_comparison("3"), None);
        assert_eq!(parse_comparison("cancel"), Some(ComparisonReply::Cancel));
    }

    #[test]
    fn test_markers() {
        assert!(is_done_marker(""));
        assert!(is_done_marker(" DONE "));
        assert!(!is_done_marker("done deal"));
        assert!(is_cancel("Cancel"));
        assert!(is_quit("q"));
    }
}
