use super::board::Board;
use super::dice::DiceDistribution;
use super::error::GameResult;
use super::globals::*;

/// Estimates how much a player stands to pay on their next roll.
#[derive(Copy, Clone, Debug)]
pub struct TerrainValuator<'a> {
    board: &'a Board,
    distribution: &'a DiceDistribution,
}

impl<'a> TerrainValuator<'a> {
    pub fn new(board: &'a Board, distribution: &'a DiceDistribution) -> Self {
        Self {
            board,
            distribution,
        }
    }

    /// The amount `token` would be charged by the tile at `index`.
    /// Players never owe anything on their own tiles.
    fn charge(&self, index: usize, token: &Token) -> GameResult<Money> {
        let tile = self.board.tile(index)?;

        if tile.owner() == Some(token) {
            return Ok(0);
        }

        self.board.rent_due(index)
    }

    /// The probability-weighted charge over every tile the next roll can reach.
    ///
    /// The reachable window runs from `position + min_move` to `position + max_move`,
    /// wrapping around the board. Turns that end in jail land on a static tile
    /// and contribute nothing.
    pub fn expected_exposure(&self, token: &Token) -> GameResult<f64> {
        let position = self.board.position(token)?;
        let mut exposure = 0.;

        for steps in self.distribution.min_move()..=self.distribution.max_move() {
            let probability = self.distribution.probability(steps);
            if probability == 0. {
                continue;
            }

            let index = (position + steps as usize) % BOARD_SIZE;
            exposure += probability * self.charge(index, token)? as f64;
        }

        Ok(exposure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::dice::Dice;

    fn tokens() -> Vec<Token> {
        ["apple", "boot"].map(Token::from).to_vec()
    }

    #[test]
    fn test_empty_board_only_charges_taxes() {
        let board = Board::standard(&tokens()).unwrap();
        let dice = Dice::standard();
        let valuator = TerrainValuator::new(&board, dice.distribution());
        let dist = dice.distribution();

        // From 'Go', Income Tax (4) is in reach but Luxury Tax (38) is not
        assert_eq!(dist.probability(38), 0.);
        let expected = dist.probability(4) * 2000.;
        let exposure = valuator.expected_exposure(&Token::from("apple")).unwrap();

        assert!((exposure - expected).abs() < 1e-9);
        assert!(exposure > 0.);
    }

    #[test]
    fn test_own_tiles_are_free() {
        let mut board = Board::standard(&tokens()).unwrap();
        let apple = Token::from("apple");
        let boot = Token::from("boot");
        let dice = Dice::standard();

        let before = TerrainValuator::new(&board, dice.distribution())
            .expected_exposure(&apple)
            .unwrap();

        // Apple's own railroad doesn't change apple's exposure
        board.assign_owner(5, &apple).unwrap();
        let own = TerrainValuator::new(&board, dice.distribution())
            .expected_exposure(&apple)
            .unwrap();
        assert!((own - before).abs() < 1e-9);

        // Boot's railroad does
        board.assign_owner(15, &boot).unwrap();
        let after = TerrainValuator::new(&board, dice.distribution())
            .expected_exposure(&apple)
            .unwrap();
        let expected = before + dice.distribution().probability(15) * 250.;
        assert!((after - expected).abs() < 1e-9);
    }

    #[test]
    fn test_window_wraps_around_go() {
        let mut board = Board::standard(&tokens()).unwrap();
        let apple = Token::from("apple");
        let boot = Token::from("boot");
        let dice = Dice::standard();

        board.move_to_index(&apple, 35).unwrap();
        board.assign_owner(1, &boot).unwrap();

        let exposure = TerrainValuator::new(&board, dice.distribution())
            .expected_exposure(&apple)
            .unwrap();

        // From 35: Luxury Tax is 3 steps away, Income Tax 9, Geylang Road 6
        let dist = dice.distribution();
        let expected = dist.probability(3) * 1000.
            + dist.probability(9) * 2000.
            + dist.probability(6) * 20.;
        assert!((exposure - expected).abs() < 1e-9);
    }
}
