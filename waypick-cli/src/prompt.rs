/// Message texts shown during an interactive decision.

pub fn greeting() -> &'static str {
    "Meow! Ready to help you make your choice."
}

pub fn enter_first_way() -> &'static str {
    "Add one of your ways (one per line). Type `x` to cancel."
}

/// Shown after each added way.
pub fn add_more_ways(count: usize, can_finish: bool) -> String {
    if can_finish {
        format!(
            "Great, {count} ways so far. Add more, press Enter on an empty line when there are no more, \
             or type `x` to cancel."
        )
    } else {
        "Great! Add at least one more. Every problem has at least two solutions, \
         even if you like neither."
            .to_string()
    }
}

pub fn need_more_ways(have: usize, need: usize) -> String {
    format!("You have {have} way(s); at least {need} are needed to continue.")
}

/// The "what next?" menu.
pub fn menu(sorted: bool, decided: bool) -> String {
    if decided {
        return "[a] draw again   [s] sort   [c] score   [q] quit   [x] cancel".to_string();
    }
    let hint = if sorted {
        "Sorted. Scoring next will make the draw reflect how much you like each way."
    } else {
        "What next? I suggest sorting your ways first, then scoring them. The choice is always yours."
    };
    format!("{hint}\n[s] sort   [c] score   [a] give me the answer   [q] quit   [x] cancel")
}

pub fn compare(first: &str, second: &str) -> String {
    format!("Pick one of these:\n\n  1: {first}\n  2: {second}\n\n[1] [2]   [q] quit   [x] cancel")
}

/// Shown once a sorting pass finishes.
pub fn sorted(ways: &[String]) -> String {
    let mut text = String::from("All sorted. Here is your list:\n");
    for (pos, way) in ways.iter().enumerate() {
        text.push_str(&format!("\n  {}. {way}", pos + 1));
    }
    text
}

pub fn score_intro() -> &'static str {
    "Next you will rate each way with a whole, positive number.\n\
     The bigger the number, the more likely that way comes out in the end.\n\
     For example, if A scores 9 and B scores 1, then over many draws A comes up nine times for every B."
}

pub fn score(way: &str) -> String {
    format!("Rate this way:\n\n  {way}\n\n[a] give me the answer now   [q] quit   [x] cancel")
}

pub fn all_scored() -> &'static str {
    "Cool, everything is rated. On to the sacred Random!"
}

pub fn result(way: &str) -> String {
    format!("Drumroll...\n\nYour way:\n\n  ** {way} **")
}

pub fn resumed(phase: &str) -> String {
    format!("Picking up where you left off ({phase}).")
}

pub fn not_understood() -> &'static str {
    "Sorry, I did not get that."
}

pub fn saved_for_later() -> &'static str {
    "Saved. Run `waypick decide` again to continue."
}

pub fn cancelled() -> &'static str {
    "Cancelled. Come back any time."
}
