// ═══════════════════════════════════════════════════════════════════════
// Human Policy — console prompts by territory code, re-asking until the
// answer is legal. When input runs out the player turns passive.
// ═══════════════════════════════════════════════════════════════════════

use conquest_engine::{combat, navigation, render};
use conquest_engine::{Board, FortifyMove, MatchRng, PlayerId, Policy, TerrId};
use std::fmt::Display;
use std::io::{self, BufRead, Stdout, StdinLock, Write};

pub struct HumanPolicy<R, W> {
    input: R,
    output: W,
    color: bool,
    closed: bool,
}

impl HumanPolicy<StdinLock<'static>, Stdout> {
    pub fn stdio(color: bool) -> Self {
        HumanPolicy::new(io::stdin().lock(), io::stdout(), color)
    }
}

impl<R: BufRead, W: Write> HumanPolicy<R, W> {
    pub fn new(input: R, output: W, color: bool) -> Self {
        HumanPolicy { input, output, color, closed: false }
    }

    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // Console output is best-effort; a broken terminal shows up as EOF
    // on the next read.
    fn say(&mut self, msg: impl Display) {
        let _ = writeln!(self.output, "{}", msg);
    }

    fn show_board(&mut self, board: &Board) {
        let text = if self.color {
            render::ansi(board, 3)
        } else {
            render::plain(board, true, true, 4)
        };
        let _ = write!(self.output, "\n{}", text);
    }

    /// One trimmed line, or None once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        if self.closed {
            return None;
        }
        let _ = write!(self.output, "{}", prompt);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => {
                self.closed = true;
                self.say("\nInput closed; playing passively from here.");
                None
            }
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn read_yes_no(&mut self, prompt: &str) -> Option<bool> {
        loop {
            let line = self.read_line(&format!("{} (y/n): ", prompt))?;
            match line.chars().next().map(|c| c.to_ascii_lowercase()) {
                Some('y') => return Some(true),
                Some('n') => return Some(false),
                Some(_) => self.say("Please enter 'y' or 'n'."),
                None => {}
            }
        }
    }

    fn read_int_in_range(&mut self, prompt: &str, min: u32, max: u32) -> Option<u32> {
        loop {
            let line = self.read_line(&format!("{} [{}-{}]: ", prompt, min, max))?;
            if line.is_empty() {
                self.say("Please enter a number.");
                continue;
            }
            match line.parse::<i64>() {
                Err(_) => self.say("Invalid number. Try again."),
                Ok(x) if x < min as i64 || x > max as i64 => self.say("Out of range. Try again."),
                Ok(x) => return Some(x as u32),
            }
        }
    }

    fn read_territory(&mut self, board: &Board, prompt: &str) -> Option<TerrId> {
        loop {
            let line = self.read_line(prompt)?;
            let Some(c) = line.chars().next() else {
                self.say("Enter a territory code (e.g., A, B, C...).");
                continue;
            };
            match board.find_by_code(c) {
                Some(id) => return Some(id),
                None => self.say("No such territory code on the board. Try again."),
            }
        }
    }

    fn read_owned(&mut self, board: &Board, player: PlayerId, prompt: &str) -> Option<TerrId> {
        loop {
            let id = self.read_territory(board, prompt)?;
            if board.territory(id).is_owned_by(player) {
                return Some(id);
            }
            self.say("You do not own that territory. Try again.");
        }
    }
}

impl<R: BufRead, W: Write> Policy for HumanPolicy<R, W> {
    fn name(&self) -> &str { "Human" }

    fn choose_reinforcement(&mut self, board: &Board, player: PlayerId, owned: &[TerrId], amount: u32, _rng: &mut MatchRng) -> TerrId {
        if !self.closed {
            self.show_board(board);
            self.say(format!("{}: you have {} reinforcements.", player, amount));
        }
        self.read_owned(board, player, "Territory to reinforce: ")
            .or_else(|| owned.first().copied())
            .unwrap_or_default()
    }

    fn choose_attack(&mut self, board: &Board, player: PlayerId, candidates: &[(TerrId, TerrId)], _attacks_made: u32, _rng: &mut MatchRng) -> Option<(TerrId, TerrId)> {
        if candidates.is_empty() || self.closed {
            return None;
        }
        self.show_board(board);
        if !self.read_yes_no("Attack?")? {
            return None;
        }
        loop {
            let from = self.read_owned(board, player, "Attack from: ")?;
            let to = self.read_territory(board, "Attack target: ")?;
            match combat::check_attack(board, from, to, player) {
                Ok(()) => return Some((from, to)),
                Err(e) => self.say(format!("That attack is not legal: {}. Try again.", e)),
            }
        }
    }

    fn choose_transfer_amount(&mut self, board: &Board, _from: TerrId, to: TerrId, min: u32, max: u32, _rng: &mut MatchRng) -> u32 {
        if min >= max {
            return min;
        }
        self.say(format!("You captured {}!", board.territory(to).code));
        self.read_int_in_range("Armies to move in", min, max).unwrap_or(min)
    }

    fn choose_fortify(&mut self, board: &Board, player: PlayerId, _owned: &[TerrId], _rng: &mut MatchRng) -> Option<FortifyMove> {
        if self.closed || navigation::fortify_pairs(board, player).is_empty() {
            return None;
        }
        self.show_board(board);
        if !self.read_yes_no("Fortify?")? {
            return None;
        }
        let (from, to) = loop {
            let from = self.read_owned(board, player, "Fortify from: ")?;
            let to = self.read_owned(board, player, "Fortify to: ")?;
            match navigation::check_fortify(board, from, to, player) {
                Ok(()) => break (from, to),
                Err(e) => self.say(format!("Invalid fortify: {}. Try again.", e)),
            }
        };
        let amount = self.read_int_in_range("Armies to move", 1, board.armies(from) - 1)?;
        Some(FortifyMove { from, to, amount })
    }
}
