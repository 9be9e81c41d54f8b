/// One unit of remaining tolerance for misses (a star on screen).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifeToken {
    /// Position in the initial row of stars, left to right.
    pub slot: u32,
}

/// Result of consuming a life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeOutcome {
    /// A token was removed and some remain.
    Lost { token: LifeToken, remaining: usize },
    /// The final token was removed. Reported exactly once.
    Depleted { token: LifeToken },
    /// Already at zero; nothing changed.
    AlreadyDepleted,
}

/// Remaining lives. Never refilled.
#[derive(Debug, Clone)]
pub struct LifeTracker {
    tokens: Vec<LifeToken>,
}

impl LifeTracker {
    pub fn new(num_lives: u32) -> Self {
        Self {
            tokens: (0..num_lives).map(|slot| LifeToken { slot }).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_depleted(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[LifeToken] {
        &self.tokens
    }

    /// Removes the most recently added token.
    pub fn consume(&mut self) -> LifeOutcome {
        match self.tokens.pop() {
            Some(token) if self.tokens.is_empty() => LifeOutcome::Depleted { token },
            Some(token) => LifeOutcome::Lost {
                token,
                remaining: self.tokens.len(),
            },
            None => LifeOutcome::AlreadyDepleted,
        }
    }
}
