use crate::board::HoldingsEncoding;

/// Per-game settings: how pools are written and which automatic draws apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOptions {
    pub holdings_encoding: HoldingsEncoding,
    /// End the game when a position occurs for the third time
    pub detect_repetition: bool,
    /// End the game after 100 plies without a capture or pawn move
    pub detect_fifty_moves: bool,
    /// End the game when neither side can mate
    pub detect_insufficient_material: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        GameOptions {
            holdings_encoding: HoldingsEncoding::Bracket,
            detect_repetition: true,
            detect_fifty_moves: true,
            detect_insufficient_material: true,
        }
    }
}

impl GameOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn holdings_encoding(mut self, encoding: HoldingsEncoding) -> Self {
        self.holdings_encoding = encoding;
        self
    }

    #[must_use]
    pub fn detect_repetition(mut self, enabled: bool) -> Self {
        self.detect_repetition = enabled;
        self
    }

    #[must_use]
    pub fn detect_fifty_moves(mut self, enabled: bool) -> Self {
        self.detect_fifty_moves = enabled;
        self
    }

    #[must_use]
    pub fn detect_insufficient_material(mut self, enabled: bool) -> Self {
        self.detect_insufficient_material = enabled;
        self
    }

    /// Options with every automatic draw turned off
    #[must_use]
    pub fn without_automatic_draws() -> Self {
        Self::default()
            .detect_repetition(false)
            .detect_fifty_moves(false)
            .detect_insufficient_material(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_setters() {
        let options = GameOptions::new()
            .holdings_encoding(HoldingsEncoding::Xfen)
            .detect_repetition(false);
        assert_eq!(options.holdings_encoding, HoldingsEncoding::Xfen);
        assert!(!options.detect_repetition);
        assert!(options.detect_fifty_moves);

        let quiet = GameOptions::without_automatic_draws();
        assert!(!quiet.detect_fifty_moves && !quiet.detect_insufficient_material);
    }
}
