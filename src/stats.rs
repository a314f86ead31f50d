use std::fmt;

/// How one finished game ended, from the driver's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    AiWin,
    HumanWin,
    Draw,
}

/// Running tally for one process run. Nothing is persisted; a restart
/// starts from zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GameStats {
    ai_wins: u32,
    human_wins: u32,
    draws: u32,
}

impl GameStats {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::AiWin => self.ai_wins += 1,
            Outcome::HumanWin => self.human_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.ai_wins + self.human_wins + self.draws
    }
}

impl fmt::Display for GameStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let total = self.total();
        if total == 0 {
            return write!(f, "No games played yet!");
        }
        let percent = |count: u32| count as f64 / total as f64 * 100.0;
        writeln!(f, "GAME STATISTICS (total: {})", total)?;
        writeln!(f, "  AI wins:    {:2} ({:.1}%)", self.ai_wins, percent(self.ai_wins))?;
        writeln!(f, "  Human wins: {:2} ({:.1}%)", self.human_wins, percent(self.human_wins))?;
        write!(f, "  Draws:      {:2} ({:.1}%)", self.draws, percent(self.draws))
    }
}
