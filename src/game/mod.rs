pub mod globals;
use globals::*;

pub mod agent;
pub mod board;
pub mod config;
pub mod deck;
pub mod dice;
pub mod error;
pub mod ledger;
pub mod liquidation;
pub mod rng;
pub mod rotation;
pub mod schema;
pub mod tile;
pub mod turn;
pub mod valuator;

pub use agent::{create_agent, AgentKind, Strategy};
pub use board::{Board, Movement};
pub use config::{GameConfig, PlayerConfig};
pub use dice::Dice;
pub use error::{GameError, GameResult};
pub use ledger::{Ledger, Party, Receipt};
pub use schema::BoardSchema;
pub use tile::Action;
pub use turn::{TurnOutcome, TurnResolver};

use std::fmt;

use tracing::{debug, info, warn};

use deck::EventDeck;
use rng::GameRng;
use rotation::Rotation;
use valuator::TerrainValuator;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Everything that happened during one player's turn.
pub struct TurnReport {
    pub token: Token,
    /// Every roll made this turn, in order.
    pub rolls: Vec<Vec<u8>>,
    /// `None` when the player went bankrupt before rolling.
    pub outcome: Option<TurnOutcome>,
    /// Every move of the token, including card moves and trips to jail.
    pub path: Vec<Movement>,
    /// Text of the cards drawn.
    pub cards: Vec<&'static str>,
    /// Optional actions the player chose and carried out.
    pub choices: Vec<Action>,
    /// Tiles the player had to sell to cover payments.
    pub sold: Vec<usize>,
    /// Players who went bankrupt during this turn.
    pub bankrupt: Vec<Token>,
}

impl TurnReport {
    fn new(token: Token) -> Self {
        Self {
            token,
            rolls: vec![],
            outcome: None,
            path: vec![],
            cards: vec![],
            choices: vec![],
            sold: vec![],
            bankrupt: vec![],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A player's place at the end of the game.
pub struct Standing {
    pub token: Token,
    pub net_worth: Money,
    pub bankrupt: bool,
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bankrupt {
            write!(f, "{} \x1b[31mbankrupt\x1b[0m", self.token)
        } else {
            write!(f, "{} \x1b[32m${}\x1b[0m", self.token, self.net_worth)
        }
    }
}

/// A simulation of Monopoly.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    board: Board,
    /// Balances, titles, and the agents playing for each player.
    ledger: Ledger,
    dice: Dice,
    rng: GameRng,
    chance: EventDeck,
    community_chest: EventDeck,
    /// Players still in the game, in turn order.
    rotation: Rotation,
    /// Rounds played so far.
    round: u32,
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Round \x1b[33m{}\x1b[0m", self.round)?;
        write!(f, "{}", self.board)?;

        for player in self.ledger.players() {
            writeln!(f, "{}", player)?;
        }

        Ok(())
    }
}

impl Game {
    /*********        INITIALISATION INTERFACES        *********/

    /// Return a new game on the board described by `schema`.
    pub fn new(config: GameConfig, schema: &BoardSchema) -> GameResult<Self> {
        config.validate()?;

        let dice = Dice::new(config.dice_faces, config.dice_count)?;
        let mut rng = GameRng::new(config.seed);
        let chance = EventDeck::shuffled(DeckKind::Chance, &mut rng);
        let community_chest = EventDeck::shuffled(DeckKind::CommunityChest, &mut rng);

        let tokens = config.tokens();
        let board = Board::new(&tokens, schema)?;

        let mut ledger = Ledger::new();
        for seat in &config.players {
            ledger.seat(
                seat.token.clone(),
                config.starting_balance,
                create_agent(seat.agent),
            );
        }

        Ok(Self {
            rotation: Rotation::new(&tokens),
            config,
            board,
            ledger,
            dice,
            rng,
            chance,
            community_chest,
            round: 0,
        })
    }

    /// Return a new game on the Singapore-edition board.
    pub fn standard(config: GameConfig) -> GameResult<Self> {
        Game::new(config, &BoardSchema::standard()?)
    }

    /// Replace the strategy playing for `token`.
    pub fn set_agent(&mut self, token: &Token, agent: Box<dyn Strategy>) -> GameResult<()> {
        self.ledger.set_agent(token, agent)
    }

    /*********        GETTERS        *********/

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn dice(&self) -> &Dice {
        &self.dice
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Players still in the game, starting with whoever plays next.
    pub fn active_players(&self) -> Vec<Token> {
        self.rotation.tokens().cloned().collect()
    }

    pub fn is_active(&self, token: &Token) -> bool {
        self.ledger.player(token).map_or(false, |p| !p.bankrupt)
    }

    /// The game ends when at most one player is left.
    pub fn is_over(&self) -> bool {
        self.rotation.len() <= 1
    }

    /// How much `token` can expect to pay on their next roll.
    pub fn expected_exposure(&self, token: &Token) -> GameResult<f64> {
        TerrainValuator::new(&self.board, self.dice.distribution()).expected_exposure(token)
    }

    /// Every player ranked by net worth, richest first. Bankrupt players come last.
    pub fn standings(&self) -> GameResult<Vec<Standing>> {
        let mut standings = self
            .ledger
            .players()
            .map(|player| {
                Ok(Standing {
                    token: player.token.clone(),
                    net_worth: self.ledger.net_worth(&self.board, &player.token)?,
                    bankrupt: player.bankrupt,
                })
            })
            .collect::<GameResult<Vec<_>>>()?;

        standings.sort_by(|a, b| {
            a.bankrupt
                .cmp(&b.bankrupt)
                .then(b.net_worth.cmp(&a.net_worth))
                .then(a.token.cmp(&b.token))
        });

        Ok(standings)
    }

    /*********        LEDGER SHORTCUTS        *********/

    /// Buy an unowned title for `token` outside of the turn order.
    pub fn acquire(&mut self, token: &Token, index: usize) -> GameResult<Receipt> {
        self.ledger.acquire(&mut self.board, token, index)
    }

    /// Build on a property `token` owns outside of the turn order.
    pub fn build(&mut self, token: &Token, index: usize, kind: ConstructKind) -> GameResult<Receipt> {
        self.ledger.build(&mut self.board, token, index, kind)
    }

    /// Move money between two parties, liquidating the payer's assets if needed.
    /// A bankrupt payer is taken out of the rotation.
    pub fn transact(&mut self, payer: &Party, payee: &Party, amount: Money) -> GameResult<Receipt> {
        let result = self.ledger.transact(&mut self.board, payer, payee, amount);

        if let Err(GameError::Bankruptcy { token, .. }) = &result {
            self.rotation.remove(token);
        }

        result
    }

    /*********        PLAYING        *********/

    /// Play rounds until one player is left or the round limit is reached.
    /// Return the final standings.
    pub fn play(&mut self) -> GameResult<Vec<Standing>> {
        info!(
            seed = self.rng.seed(),
            players = self.rotation.len(),
            max_rounds = self.config.max_rounds,
            "game started"
        );

        while !self.is_over() && self.round < self.config.max_rounds {
            self.play_round()?;
        }

        info!(rounds = self.round, players = self.rotation.len(), "game over");
        self.standings()
    }

    /// Give every player still in the game one turn.
    pub fn play_round(&mut self) -> GameResult<Vec<TurnReport>> {
        let order = self.active_players();
        let mut reports = vec![];

        for token in order {
            if self.is_over() {
                break;
            }
            // Knocked out earlier this round
            if !self.is_active(&token) {
                continue;
            }

            reports.push(self.play_turn()?);
        }

        self.round += 1;
        debug!(round = self.round, players = self.rotation.len(), "round finished");

        Ok(reports)
    }

    /// Play the turn of whoever is next, rolling the game's dice.
    pub fn play_turn(&mut self) -> GameResult<TurnReport> {
        self.take_turn(&mut |dice, rng| dice.roll(rng))
    }

    /// Play the turn of whoever is next, taking rolls from `rolls` instead of the dice.
    pub fn play_turn_with(&mut self, mut rolls: impl FnMut() -> Vec<u8>) -> GameResult<TurnReport> {
        self.take_turn(&mut |_, _| rolls())
    }

    fn take_turn(
        &mut self,
        roll: &mut dyn FnMut(&Dice, &mut GameRng) -> Vec<u8>,
    ) -> GameResult<TurnReport> {
        let token = self
            .rotation
            .issue_next()
            .ok_or_else(|| GameError::Configuration("no players left".to_string()))?;
        let mut report = TurnReport::new(token.clone());

        if self.ledger.player(&token)?.in_jail {
            self.release_from_jail(&mut report)?;
            if !self.is_active(&token) {
                return Ok(report);
            }
        }

        // Roll phase
        let mut resolver = TurnResolver::new();
        let (dice, rng) = (&self.dice, &mut self.rng);
        let outcome = resolver.resolve_with(|| roll(dice, &mut *rng));
        report.rolls = resolver.rolls().to_vec();
        report.outcome = Some(outcome);

        match outcome {
            TurnOutcome::Jail => self.jail(&mut report)?,
            TurnOutcome::Move { steps } => {
                let movement = self.board.move_by_steps(&token, steps)?;
                self.arrive(&mut report, movement)?;
                self.resolve_landing(&mut report, true)?;
            }
        }

        Ok(report)
    }

    /*********        TURN HELPERS        *********/

    /// Spend a favor card if the player has one, otherwise pay the fine.
    fn release_from_jail(&mut self, report: &mut TurnReport) -> GameResult<()> {
        let token = report.token.clone();
        let player = self.ledger.player_mut(&token)?;
        player.in_jail = false;

        if player.favors > 0 {
            player.favors -= 1;
            info!(%token, "favor card spent to leave jail");
            return Ok(());
        }

        info!(%token, fine = self.config.jail_fine, "fine paid to leave jail");
        self.settle(report, Party::Player(token), Party::Bank, self.config.jail_fine)
    }

    /// Record a move and pay the salary if it went past 'Go'.
    fn arrive(&mut self, report: &mut TurnReport, movement: Movement) -> GameResult<()> {
        report.path.push(movement);

        if movement.passed_go {
            let payee = Party::Player(report.token.clone());
            self.settle(report, Party::Bank, payee, self.config.go_salary)?;
        }

        Ok(())
    }

    fn jail(&mut self, report: &mut TurnReport) -> GameResult<()> {
        let token = report.token.clone();
        report.path.push(self.board.send_to_jail(&token)?);
        self.ledger.player_mut(&token)?.in_jail = true;

        info!(%token, "sent to jail");
        Ok(())
    }

    /// Carry out the mandatory actions of the tile the player landed on, then
    /// let their agent pick one of the optional ones. `may_chain` allows a card
    /// that moves the player to resolve the tile it moves them to.
    fn resolve_landing(&mut self, report: &mut TurnReport, may_chain: bool) -> GameResult<()> {
        let token = report.token.clone();
        let (mandatory, optional): (Vec<Action>, Vec<Action>) = self
            .board
            .landing_actions(&token)?
            .into_iter()
            .partition(Action::is_mandatory);

        for action in mandatory {
            match action {
                Action::PayRent { owner, amount, .. } => {
                    self.settle(report, Party::Player(token.clone()), Party::Player(owner), amount)?
                }
                Action::PayTax { amount, .. } => {
                    self.settle(report, Party::Player(token.clone()), Party::Bank, amount)?
                }
                Action::DrawCard(kind) => return self.draw_card(report, kind, may_chain),
                Action::GoToJail => return self.jail(report),
                _ => (),
            }

            if !self.is_active(&token) {
                return Ok(());
            }
        }

        self.offer_choices(report, optional)
    }

    /// Ask the player's agent to pick one of the optional actions they can afford.
    fn offer_choices(&mut self, report: &mut TurnReport, optional: Vec<Action>) -> GameResult<()> {
        let token = report.token.clone();
        let balance = self.ledger.balance(&token)?;

        let choices: Vec<Action> = optional
            .into_iter()
            .filter(|action| match action {
                Action::Acquire { price, .. } | Action::AddConstruct { price, .. } => {
                    *price <= balance
                }
                _ => true,
            })
            .collect();

        // Nothing to decide
        if choices.iter().all(|action| *action == Action::Pass) {
            return Ok(());
        }

        let choice = self.ledger.agent_mut(&token)?.choose_action(&choices);
        let Some(action) = choices.get(choice).cloned() else {
            warn!(%token, choice, offered = choices.len(), "agent chose an action that wasn't offered");
            return Ok(());
        };

        let result = match &action {
            Action::Acquire { tile, .. } => self.ledger.acquire(&mut self.board, &token, *tile),
            Action::AddConstruct { tile, kind, .. } => {
                self.ledger.build(&mut self.board, &token, *tile, *kind)
            }
            _ => return Ok(()),
        };

        match result {
            Ok(_) => report.choices.push(action),
            Err(
                err @ (GameError::InsufficientFunds { .. }
                | GameError::InvalidConstructOperation { .. }),
            ) => {
                warn!(%token, ?action, %err, "agent's choice was rejected");
            }
            Err(err) => return Err(err),
        }

        Ok(())
    }

    fn draw_card(&mut self, report: &mut TurnReport, kind: DeckKind, may_chain: bool) -> GameResult<()> {
        let deck = match kind {
            DeckKind::Chance => &mut self.chance,
            DeckKind::CommunityChest => &mut self.community_chest,
        };
        let Some(card) = deck.draw() else {
            return Ok(());
        };

        info!(token = %report.token, ?kind, card = card.text, "card drawn");
        report.cards.push(card.text);
        self.apply_card(report, card.effect, may_chain)
    }

    fn apply_card(&mut self, report: &mut TurnReport, effect: CardEffect, may_chain: bool) -> GameResult<()> {
        let token = report.token.clone();
        let me = Party::Player(token.clone());

        match effect {
            CardEffect::Collect(amount) => self.settle(report, Party::Bank, me, amount)?,
            CardEffect::Pay(amount) => self.settle(report, me, Party::Bank, amount)?,
            CardEffect::AdvanceTo(index) => {
                let movement = self.board.move_to_index(&token, index)?;
                self.arrive(report, movement)?;

                if may_chain && self.is_active(&token) {
                    self.resolve_landing(report, false)?;
                }
            }
            CardEffect::MoveBack(steps) => {
                let movement = self.board.move_back(&token, steps)?;
                self.arrive(report, movement)?;

                if may_chain {
                    self.resolve_landing(report, false)?;
                }
            }
            CardEffect::GoToJail => self.jail(report)?,
            CardEffect::GetOutOfJail => self.ledger.player_mut(&token)?.favors += 1,
            CardEffect::PayEachPlayer(amount) => {
                for other in self.opponents(&token) {
                    if !self.is_active(&token) {
                        break;
                    }
                    self.settle(report, me.clone(), Party::Player(other), amount)?;
                }
            }
            CardEffect::CollectFromEachPlayer(amount) => {
                for other in self.opponents(&token) {
                    self.settle(report, Party::Player(other), me.clone(), amount)?;
                }
            }
            CardEffect::Repairs {
                per_house,
                per_hotel,
            } => {
                let bill = self.repair_bill(&token, per_house, per_hotel)?;
                if bill > 0 {
                    self.settle(report, me, Party::Bank, bill)?;
                }
            }
        }

        Ok(())
    }

    /// What `token` owes for every house and hotel they own.
    fn repair_bill(&self, token: &Token, per_house: Money, per_hotel: Money) -> GameResult<Money> {
        let mut bill = 0;

        for index in self.ledger.player(token)?.asset_positions() {
            if let Some(constructs) = self.board.tile(index)?.constructs() {
                bill += Money::from(constructs.houses) * per_house
                    + Money::from(constructs.hotels) * per_hotel;
            }
        }

        Ok(bill)
    }

    /// Every other player still in the game, in turn order.
    fn opponents(&self, token: &Token) -> Vec<Token> {
        self.rotation
            .tokens()
            .filter(|&t| t != token)
            .cloned()
            .collect()
    }

    /// Move money through the ledger, taking bankrupt payers out of the rotation.
    fn settle(&mut self, report: &mut TurnReport, payer: Party, payee: Party, amount: Money) -> GameResult<()> {
        match self.ledger.transact(&mut self.board, &payer, &payee, amount) {
            Ok(receipt) => {
                if payer == Party::Player(report.token.clone()) {
                    report.sold.extend(receipt.sold);
                }
                Ok(())
            }
            Err(GameError::Bankruptcy { token, .. }) => {
                self.rotation.remove(&token);
                report.bankrupt.push(token);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
