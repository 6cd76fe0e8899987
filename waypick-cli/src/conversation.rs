/// The interactive decision conversation.
///
/// Reads one reply per line, feeds it to the user's `DecisionSession`, prints
/// what the session asks for next, and saves the record after every step so a
/// closed terminal loses nothing. Generic over the reader and writer so tests
/// can script a whole conversation.
use std::fmt::Display;
use std::io::{self, BufRead, Write};

use rand::Rng;
use thiserror::Error;
use tracing::{debug, warn};
use waypick_core::{parse_score, DecisionSession, Phase, ScoreStep, SortStep};

use crate::parse::{
    is_cancel, is_done_marker, is_quit, parse_comparison, parse_menu_choice, ComparisonReply,
    MenuChoice,
};
use crate::prompt;
use crate::store::{StoreError, UserRecord};

#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How a conversation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user left after drawing this way.
    Decided(String),
    /// The user left (or input ended) mid-decision; the session is kept.
    Paused,
    /// The user threw the decision away.
    Cancelled,
}

enum Flow {
    Continue,
    Done(Outcome),
}

pub struct Conversation<'a, R, W, G, S> {
    input: R,
    out: W,
    rng: &'a mut G,
    save: S,
}

impl<'a, R, W, G, S> Conversation<'a, R, W, G, S>
where
    R: BufRead,
    W: Write,
    G: Rng,
    S: FnMut(&UserRecord) -> Result<(), StoreError>,
{
    pub fn new(input: R, out: W, rng: &'a mut G, save: S) -> Self {
        Conversation { input, out, rng, save }
    }

    /// Talk to the user until they leave. Resumes the user's unfinished
    /// session unless `fresh` is set.
    pub fn run(&mut self, record: &mut UserRecord, fresh: bool) -> Result<Outcome, ConversationError> {
        self.say(prompt::greeting())?;

        let resumable = if fresh { None } else { record.unfinished().map(DecisionSession::phase) };
        match resumable {
            Some(phase) => self.say(prompt::resumed(&phase.to_string()))?,
            None => {
                let session = record.begin();
                if let Err(e) = session.start_adding() {
                    warn!(error = %e, "fresh session refused to start");
                }
                self.say(prompt::enter_first_way())?;
            }
        }
        (self.save)(record)?;

        loop {
            let flow = match record.current_mut() {
                Some(session) => self.step(session)?,
                None => Flow::Done(Outcome::Cancelled),
            };
            (self.save)(record)?;
            if let Flow::Done(outcome) = flow {
                debug!(?outcome, "conversation finished");
                return Ok(outcome);
            }
        }
    }

    fn step(&mut self, session: &mut DecisionSession) -> io::Result<Flow> {
        match session.phase() {
            Phase::Idle => Ok(Flow::Done(Outcome::Cancelled)),
            Phase::AddingWays => self.adding_step(session),
            Phase::Choosing | Phase::Decided => self.menu_step(session),
            Phase::Sorting => self.sorting_step(session),
            Phase::Scoring => self.scoring_step(session),
        }
    }

    fn adding_step(&mut self, session: &mut DecisionSession) -> io::Result<Flow> {
        let Some(line) = self.read_line()? else {
            return Ok(Flow::Done(Outcome::Paused));
        };
        if is_cancel(&line) {
            return self.cancel(session);
        }
        if is_quit(&line) {
            return self.pause();
        }

        if is_done_marker(&line) {
            match session.finish_adding() {
                Ok(()) => self.show_menu(session)?,
                Err(_) => self.say(prompt::need_more_ways(
                    session.items().len(),
                    waypick_core::constants::MIN_WAYS,
                ))?,
            }
            return Ok(Flow::Continue);
        }

        match session.add_way(&line) {
            Ok(count) => self.say(prompt::add_more_ways(count, session.can_finish_adding()))?,
            Err(e) => self.say(e)?,
        }
        Ok(Flow::Continue)
    }

    fn menu_step(&mut self, session: &mut DecisionSession) -> io::Result<Flow> {
        let Some(line) = self.read_line()? else {
            return Ok(Flow::Done(Outcome::Paused));
        };

        match parse_menu_choice(&line) {
            Some(MenuChoice::Sort) => match session.start_sorting(&mut *self.rng) {
                Ok(step) => self.show_sort_step(session, step)?,
                Err(e) => self.say(e)?,
            },
            Some(MenuChoice::Score) => {
                if session.items().iter().all(|item| !item.is_scored()) {
                    self.say(prompt::score_intro())?;
                }
                match session.start_scoring(&mut *self.rng) {
                    Ok(step) => self.show_score_step(session, step)?,
                    Err(e) => self.say(e)?,
                }
            }
            Some(MenuChoice::Answer) => self.answer(session)?,
            Some(MenuChoice::Quit) => return self.pause_after(session),
            Some(MenuChoice::Cancel) => return self.cancel(session),
            None => {
                self.say(prompt::not_understood())?;
                self.show_menu(session)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn sorting_step(&mut self, session: &mut DecisionSession) -> io::Result<Flow> {
        let Some((a, b)) = session.pending_pair() else {
            warn!("sorting without a pending pair, dropping session");
            return self.cancel(session);
        };
        let (Some(first), Some(second)) = (session.items().get(a), session.items().get(b)) else {
            warn!(a, b, ways = session.items().len(), "pending pair out of range, dropping session");
            return self.cancel(session);
        };
        let text = prompt::compare(&first.text, &second.text);
        self.say(text)?;

        let Some(line) = self.read_line()? else {
            return Ok(Flow::Done(Outcome::Paused));
        };
        let prefers_first = match parse_comparison(&line) {
            Some(ComparisonReply::First) => true,
            Some(ComparisonReply::Second) => false,
            Some(ComparisonReply::Quit) => return self.pause(),
            Some(ComparisonReply::Cancel) => return self.cancel(session),
            None => {
                self.say(prompt::not_understood())?;
                return Ok(Flow::Continue);
            }
        };

        match session.judge(prefers_first, &mut *self.rng) {
            Ok(step) => self.show_sort_step(session, step)?,
            Err(e) => self.say(e)?,
        }
        Ok(Flow::Continue)
    }

    fn scoring_step(&mut self, session: &mut DecisionSession) -> io::Result<Flow> {
        let Some(k) = session.score_target() else {
            warn!("scoring without a target, dropping session");
            return self.cancel(session);
        };
        let Some(way) = session.items().get(k) else {
            warn!(way = k, ways = session.items().len(), "score target out of range, dropping session");
            return self.cancel(session);
        };
        let text = prompt::score(&way.text);
        self.say(text)?;

        let Some(line) = self.read_line()? else {
            return Ok(Flow::Done(Outcome::Paused));
        };
        if is_cancel(&line) {
            return self.cancel(session);
        }
        if is_quit(&line) {
            return self.pause();
        }
        if parse_menu_choice(&line) == Some(MenuChoice::Answer) {
            self.answer(session)?;
            return Ok(Flow::Continue);
        }
        if parse_score(&line) < 0 {
            self.say(prompt::not_understood())?;
        }

        match session.submit_score(&line, &mut *self.rng) {
            Ok(step) => self.show_score_step(session, step)?,
            Err(e) => self.say(e)?,
        }
        Ok(Flow::Continue)
    }

    fn show_sort_step(&mut self, session: &DecisionSession, step: SortStep) -> io::Result<()> {
        // A pending comparison is printed by the next sorting step.
        if let SortStep::Sorted(ways) = step {
            self.say(prompt::sorted(&ways))?;
            self.show_menu(session)?;
        }
        Ok(())
    }

    fn show_score_step(&mut self, session: &DecisionSession, step: ScoreStep) -> io::Result<()> {
        if step == ScoreStep::AllScored {
            self.say(prompt::all_scored())?;
            self.show_menu(session)?;
        }
        Ok(())
    }

    fn answer(&mut self, session: &mut DecisionSession) -> io::Result<()> {
        match session.decide(&mut *self.rng) {
            Ok(way) => {
                let text = prompt::result(way);
                self.say(text)?;
                self.show_menu(session)
            }
            Err(e) => self.say(e),
        }
    }

    fn show_menu(&mut self, session: &DecisionSession) -> io::Result<()> {
        self.say(prompt::menu(session.is_sorted(), session.phase() == Phase::Decided))
    }

    fn pause(&mut self) -> io::Result<Flow> {
        self.say(prompt::saved_for_later())?;
        Ok(Flow::Done(Outcome::Paused))
    }

    fn pause_after(&mut self, session: &DecisionSession) -> io::Result<Flow> {
        match session.last_pick() {
            Some(way) if session.phase() == Phase::Decided => {
                Ok(Flow::Done(Outcome::Decided(way.to_string())))
            }
            _ => self.pause(),
        }
    }

    fn cancel(&mut self, session: &mut DecisionSession) -> io::Result<Flow> {
        session.cancel();
        self.say(prompt::cancelled())?;
        Ok(Flow::Done(Outcome::Cancelled))
    }

    fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.out, "{text}\n")?;
        self.out.flush()
    }

    /// Next reply with the line ending stripped, or `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        write!(self.out, "> ")?;
        self.out.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim_end_matches(['\n', '\r']).to_string()))
    }
}
