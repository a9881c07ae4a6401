// Session-level score tracking across a fixed number of rounds.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundResult {
    pub distance_km: f64,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    current_round: u32,
    total_score: u64,
    total_rounds: u32,
    max_score_per_round: u32,
}

impl GameSession {
    pub fn new(total_rounds: u32, max_score_per_round: u32) -> Self {
        debug_assert!(total_rounds > 0, "a session needs at least one round");
        Self {
            current_round: 1,
            total_score: 0,
            total_rounds,
            max_score_per_round,
        }
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    pub fn max_score(&self) -> u64 {
        self.total_rounds as u64 * self.max_score_per_round as u64
    }

    /// Adds a round's points. The running total only ever grows.
    pub fn record(&mut self, result: RoundResult) {
        debug_assert!(
            result.points <= self.max_score_per_round,
            "round points {} exceed the per-round maximum {}",
            result.points,
            self.max_score_per_round
        );
        self.total_score += result.points as u64;
    }

    /// Moves to the next round. Returns false once the final round has been played.
    pub fn advance(&mut self) -> bool {
        if self.is_final_round() {
            return false;
        }
        self.current_round += 1;
        true
    }

    pub fn is_final_round(&self) -> bool {
        self.current_round >= self.total_rounds
    }

    /// Starts over for "play again".
    pub fn reset(&mut self) {
        self.current_round = 1;
        self.total_score = 0;
    }

    pub fn percent(&self) -> u64 {
        let max = self.max_score();
        if max == 0 {
            return 0;
        }
        (100.0 * self.total_score as f64 / max as f64).round() as u64
    }

    /// Summary text consumed by the share/copy surfaces.
    pub fn share_text(&self) -> String {
        format!(
            "IP GeoGuesser\nScore: {} / {} ({}%)\n\nCan you guess the location from an IP address?",
            group_thousands(self.total_score),
            group_thousands(self.max_score()),
            self.percent()
        )
    }
}

/// Formats an integer with comma thousands separators.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
