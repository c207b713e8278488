use std::collections::VecDeque;

use super::globals::Token;

#[derive(Clone, Debug, Default)]
/// Whose turn it is. Players take turns in a fixed cycle.
pub struct Rotation {
    order: VecDeque<Token>,
}

impl Rotation {
    pub fn new(tokens: &[Token]) -> Self {
        Self {
            order: tokens.iter().cloned().collect(),
        }
    }

    /// Return the player whose turn it is, and move them to the back of the line.
    pub fn issue_next(&mut self) -> Option<Token> {
        let token = self.order.pop_front()?;
        self.order.push_back(token.clone());
        Some(token)
    }

    /// Take a player out of the rotation. The others keep their order.
    pub fn remove(&mut self, token: &Token) -> bool {
        match self.order.iter().position(|t| t == token) {
            Some(i) => self.order.remove(i).is_some(),
            None => false,
        }
    }

    /// Players still taking turns, starting with whoever is next.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
