//! Account state definitions for the Liquidity Relay
//!
//! This module contains all on-chain account structures used by the relay,
//! plus the order lifecycle transition table.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::RelayerError;
use crate::instructions::OrderParams;
use crate::interfaces::pair::PairState;
use crate::oracle::{self, CumulativePrices, Observation, OracleWindow, PriceDirection};

/// Relayer configuration account
/// Stores the DEX programs, oracle geometry and order counters
#[account]
#[derive(Default)]
pub struct Relayer {
    /// Owner who creates and cancels orders
    pub owner: Pubkey,
    /// Primary factory program (owns pair accounts)
    pub factory: Pubkey,
    /// Router program paired with `factory`
    pub router: Pubkey,
    /// Counterpart factory program
    pub counterpart_factory: Pubkey,
    /// Router program paired with `counterpart_factory`
    pub counterpart_router: Pubkey,
    /// Signer allowed to refresh oracle buffers outside of an order
    pub oracle_authority: Pubkey,
    /// Oracle window in seconds
    pub window_size: i64,
    /// Buckets per window
    pub granularity: u16,
    /// Seconds per bucket
    pub period_size: i64,
    /// Lamports paid to the executor of an order
    pub execution_bounty: u64,
    /// Next order ID to assign (starts at 1)
    pub next_order_id: u64,
    /// Next oracle tracking key to assign (starts at 1)
    pub next_oracle_id: u64,
    /// Total orders created
    pub total_orders: u64,
    /// Total orders executed
    pub total_executed: u64,
    /// Bump seed for PDA derivation
    pub bump: u8,
    /// Reserved for future use
    pub _reserved: [u8; 32],
}

impl Relayer {
    pub const LEN: usize = 8 + // discriminator
        32 + // owner
        32 + // factory
        32 + // router
        32 + // counterpart_factory
        32 + // counterpart_router
        32 + // oracle_authority
        8 +  // window_size
        2 +  // granularity
        8 +  // period_size
        8 +  // execution_bounty
        8 +  // next_order_id
        8 +  // next_oracle_id
        8 +  // total_orders
        8 +  // total_executed
        1 +  // bump
        32;  // reserved

    pub fn window(&self) -> Result<OracleWindow> {
        OracleWindow::new(self.window_size, self.granularity)
    }

    /// Router paired with `factory`, if the factory is configured
    pub fn router_for(&self, factory: &Pubkey) -> Option<Pubkey> {
        if *factory == self.factory {
            Some(self.router)
        } else if *factory == self.counterpart_factory {
            Some(self.counterpart_router)
        } else {
            None
        }
    }

    /// Check `router` is the one paired with `factory` and return it
    pub fn ensure_router(&self, factory: &Pubkey, router: &Pubkey) -> Result<Pubkey> {
        let expected = self.router_for(factory).ok_or(RelayerError::InvalidFactory)?;
        require_keys_eq!(*router, expected, RelayerError::InvalidRouter);
        Ok(expected)
    }

    pub fn ensure_oracle_authority(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(*signer, self.oracle_authority, RelayerError::InvalidOracleAuthority);
        Ok(())
    }

    /// Hand out the next order ID and oracle key
    pub fn allocate_ids(&mut self) -> Result<(u64, u64)> {
        let order_id = self.next_order_id;
        let oracle_id = self.next_oracle_id;

        self.next_order_id = order_id.checked_add(1).ok_or(RelayerError::MathOverflow)?;
        self.next_oracle_id = oracle_id.checked_add(1).ok_or(RelayerError::MathOverflow)?;
        self.total_orders = self
            .total_orders
            .checked_add(1)
            .ok_or(RelayerError::MathOverflow)?;

        Ok((order_id, oracle_id))
    }
}

/// Liquidity order account
#[account]
#[derive(Default)]
pub struct Order {
    /// Unique order ID (incrementing)
    pub order_id: u64,
    /// Provision or removal
    pub kind: OrderKind,
    /// Current lifecycle status
    pub status: OrderStatus,
    /// Relayer owner at creation; refunds go to this key's token accounts
    pub owner: Pubkey,
    /// Lower mint of the pair
    pub token_a: Pubkey,
    /// Higher mint of the pair
    pub token_b: Pubkey,
    /// LP mint of the pair (custodied for removals)
    pub lp_mint: Pubkey,
    /// Token A to provide, or minimum token A expected back
    pub amount_a: u64,
    /// Token B to provide, or minimum token B expected back
    pub amount_b: u64,
    /// LP tokens to burn (removal only)
    pub liquidity_amount: u64,
    /// Allowed deviation from the oracle price in ppm
    pub price_tolerance: u32,
    /// Minimum pool reserve of token A for oracle updates
    pub min_reserve_a: u64,
    /// Minimum pool reserve of token B for oracle updates
    pub min_reserve_b: u64,
    /// Minimum span covered by the oracle updates (seconds)
    pub max_window_time: i64,
    /// Unix timestamp after which the order cannot progress
    pub deadline: i64,
    /// Factory owning `pair`
    pub factory: Pubkey,
    /// Router invoked on execution
    pub router: Pubkey,
    /// Pair account
    pub pair: Pubkey,
    /// Oracle buffer tracking this order
    pub oracle_id: u64,
    /// Oracle updates recorded for this order
    pub observations: u8,
    /// Timestamp of the first oracle update
    pub first_observation_at: i64,
    /// Timestamp of the latest oracle update
    pub last_observation_at: i64,
    /// Order creation timestamp
    pub created_at: i64,
    /// Execution timestamp (0 until executed)
    pub executed_at: i64,
    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl Order {
    pub const LEN: usize = 8 + // discriminator
        8 +  // order_id
        1 +  // kind
        1 +  // status
        32 + // owner
        32 + // token_a
        32 + // token_b
        32 + // lp_mint
        8 +  // amount_a
        8 +  // amount_b
        8 +  // liquidity_amount
        4 +  // price_tolerance
        8 +  // min_reserve_a
        8 +  // min_reserve_b
        8 +  // max_window_time
        8 +  // deadline
        32 + // factory
        32 + // router
        32 + // pair
        8 +  // oracle_id
        1 +  // observations
        8 +  // first_observation_at
        8 +  // last_observation_at
        8 +  // created_at
        8 +  // executed_at
        1;   // bump

    /// Fill a freshly initialized order account
    #[allow(clippy::too_many_arguments)]
    pub fn open(
        &mut self,
        order_id: u64,
        kind: OrderKind,
        owner: Pubkey,
        params: &OrderParams,
        router: Pubkey,
        pair: Pubkey,
        lp_mint: Pubkey,
        liquidity_amount: u64,
        oracle_id: u64,
        now: i64,
    ) {
        self.order_id = order_id;
        self.kind = kind;
        self.status = OrderStatus::Pending;
        self.owner = owner;
        self.token_a = params.token_a;
        self.token_b = params.token_b;
        self.lp_mint = lp_mint;
        self.amount_a = params.amount_a;
        self.amount_b = params.amount_b;
        self.liquidity_amount = liquidity_amount;
        self.price_tolerance = params.price_tolerance;
        self.min_reserve_a = params.min_reserve_a;
        self.min_reserve_b = params.min_reserve_b;
        self.max_window_time = params.max_window_time;
        self.deadline = params.deadline;
        self.factory = params.factory;
        self.router = router;
        self.pair = pair;
        self.oracle_id = oracle_id;
        self.observations = 0;
        self.first_observation_at = 0;
        self.last_observation_at = 0;
        self.created_at = now;
        self.executed_at = 0;
    }

    pub fn ensure_before_deadline(&self, now: i64) -> Result<()> {
        require!(now <= self.deadline, RelayerError::DeadlineReached);
        Ok(())
    }

    /// Check that an oracle update may be recorded for this order at `now`
    pub fn ensure_observable(&self, pair: &PairState, period_size: i64, now: i64) -> Result<()> {
        self.status.ensure_pending()?;
        self.ensure_before_deadline(now)?;

        require!(
            pair.reserve_0 >= self.min_reserve_a && pair.reserve_1 >= self.min_reserve_b,
            RelayerError::ReserveTooLow
        );

        if self.observations > 0 {
            let elapsed = now
                .checked_sub(self.last_observation_at)
                .ok_or(RelayerError::MathUnderflow)?;
            require!(elapsed >= period_size, RelayerError::PeriodNotElapsed);
        }

        Ok(())
    }

    /// Count an oracle update; returns true once the order becomes `Ready`
    ///
    /// A first sample a full window old may share its bucket with `now` and
    /// be overwritten, so the span restarts from this update.
    pub fn record_observation(&mut self, now: i64, window_size: i64) -> Result<bool> {
        if self.observations > 0 {
            let span = now
                .checked_sub(self.first_observation_at)
                .ok_or(RelayerError::MathUnderflow)?;
            if span >= window_size {
                self.observations = 0;
            }
        }
        if self.observations == 0 {
            self.first_observation_at = now;
        }
        self.last_observation_at = now;
        self.observations = self.observations.saturating_add(1);

        let span = now
            .checked_sub(self.first_observation_at)
            .ok_or(RelayerError::MathUnderflow)?;
        if self.observations >= REQUIRED_OBSERVATIONS && span >= self.max_window_time {
            self.transition(OrderEvent::ObservationWindowClosed)?;
            return Ok(true);
        }

        Ok(false)
    }

    /// Shortest history a consult may average over when executing
    pub fn min_consult_span(&self, window: &OracleWindow) -> i64 {
        self.max_window_time.max(window.period_size())
    }

    pub fn transition(&mut self, event: OrderEvent) -> Result<()> {
        self.status = self.status.apply(event)?;
        Ok(())
    }

    /// Mints and amounts held in custody for this order.
    /// Removals only custody LP tokens.
    pub fn custody_legs(&self) -> (CustodyLeg, Option<CustodyLeg>) {
        match self.kind {
            OrderKind::Provision => (
                CustodyLeg { mint: self.token_a, amount: self.amount_a },
                Some(CustodyLeg { mint: self.token_b, amount: self.amount_b }),
            ),
            OrderKind::Removal => (
                CustodyLeg { mint: self.lp_mint, amount: self.liquidity_amount },
                None,
            ),
        }
    }
}

/// Mint and amount an order keeps in pooled custody
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CustodyLeg {
    pub mint: Pubkey,
    pub amount: u64,
}

/// Liquidity action requested by an order
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum OrderKind {
    #[default]
    Provision,
    Removal,
}

impl OrderKind {
    /// Whether the order settles in the call that creates it
    ///
    /// Only provisions into a pool with no liquidity do: there is no price
    /// to protect yet, and the deposit itself sets it.
    pub fn executes_on_creation(self, pair: &PairState) -> bool {
        self == OrderKind::Provision && pair.is_empty()
    }
}

/// Order status enumeration
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum OrderStatus {
    /// Waiting on oracle updates
    #[default]
    Pending,
    /// Observation cycle complete, can be executed
    Ready,
    /// Liquidity action performed
    Executed,
    /// Cancelled by the owner, custody refunded
    Cancelled,
}

/// Inputs to the order state machine
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OrderEvent {
    /// Two spaced oracle updates now span the order's window
    ObservationWindowClosed,
    /// Provision into an empty pool, executed at creation
    ExecuteImmediately,
    Execute,
    Cancel,
}

impl OrderStatus {
    /// Transition table for the order lifecycle
    pub fn apply(self, event: OrderEvent) -> Result<OrderStatus> {
        use OrderEvent::*;
        use OrderStatus::*;

        match (self, event) {
            (Pending, ObservationWindowClosed) => Ok(Ready),
            (Pending, ExecuteImmediately) => Ok(Executed),
            (Ready, Execute) => Ok(Executed),
            (Pending | Ready, Cancel) => Ok(Cancelled),
            (Pending, Execute) => err!(RelayerError::OrderNotReady),
            (Ready, _) => err!(RelayerError::OrderNotPending),
            (Executed, _) => err!(RelayerError::OrderAlreadyExecuted),
            (Cancelled, _) => err!(RelayerError::OrderIsCancelled),
        }
    }

    pub fn ensure_pending(self) -> Result<()> {
        match self {
            OrderStatus::Pending => Ok(()),
            OrderStatus::Ready => err!(RelayerError::OrderNotPending),
            OrderStatus::Executed => err!(RelayerError::OrderAlreadyExecuted),
            OrderStatus::Cancelled => err!(RelayerError::OrderIsCancelled),
        }
    }
}

/// Circular observation buffer for one oracle key
#[account]
#[derive(Default)]
pub struct OracleObservations {
    /// Oracle tracking key
    pub oracle_id: u64,
    /// Factory owning `pair`
    pub factory: Pubkey,
    /// Pair account sampled by this buffer
    pub pair: Pubkey,
    /// Pair token 0
    pub token_0: Pubkey,
    /// Pair token 1
    pub token_1: Pubkey,
    /// Bump seed
    pub bump: u8,
    /// One bucket per period, `granularity` long
    pub observations: Vec<Observation>,
}

impl OracleObservations {
    pub const BASE_LEN: usize = 8 + // discriminator
        8 +  // oracle_id
        32 + // factory
        32 + // pair
        32 + // token_0
        32 + // token_1
        1 +  // bump
        4;   // observations vec prefix

    pub fn space(granularity: u16) -> usize {
        Self::BASE_LEN + granularity as usize * Observation::LEN
    }

    /// Fill a freshly initialized buffer with empty buckets
    pub fn open(
        &mut self,
        oracle_id: u64,
        factory: Pubkey,
        pair_key: Pubkey,
        pair: &PairState,
        granularity: u16,
        bump: u8,
    ) {
        self.oracle_id = oracle_id;
        self.factory = factory;
        self.pair = pair_key;
        self.token_0 = pair.token_0_mint;
        self.token_1 = pair.token_1_mint;
        self.bump = bump;
        self.observations = vec![Observation::default(); granularity as usize];
    }

    /// Resolve which accumulator answers `token_in -> token_out`
    pub fn direction(&self, token_in: &Pubkey, token_out: &Pubkey) -> Result<PriceDirection> {
        if *token_in == self.token_0 && *token_out == self.token_1 {
            Ok(PriceDirection::ZeroForOne)
        } else if *token_in == self.token_1 && *token_out == self.token_0 {
            Ok(PriceDirection::OneForZero)
        } else {
            err!(RelayerError::InvalidToken)
        }
    }

    /// Sample the pair into the bucket for `now`; false if the bucket was fresh
    pub fn update(&mut self, window: &OracleWindow, pair: &PairState, now: i64) -> Result<bool> {
        oracle::record_observation(
            &mut self.observations,
            window,
            oracle::current_cumulative_prices(pair, now),
            now,
        )
    }

    /// Time-weighted amount out, averaged over at least `min_elapsed` seconds
    #[allow(clippy::too_many_arguments)]
    pub fn consult(
        &self,
        window: &OracleWindow,
        pair: &PairState,
        now: i64,
        min_elapsed: i64,
        token_in: &Pubkey,
        amount_in: u64,
        token_out: &Pubkey,
    ) -> Result<u64> {
        let direction = self.direction(token_in, token_out)?;
        let current: CumulativePrices = oracle::current_cumulative_prices(pair, now);
        oracle::consult_buffer(
            &self.observations,
            window,
            current,
            now,
            min_elapsed,
            direction,
            amount_in,
        )
    }
}

/// Pooled custody for one mint
#[account]
#[derive(Default)]
pub struct Custody {
    /// Custodied mint
    pub mint: Pubkey,
    /// Vault token account (authority: relayer PDA)
    pub vault: Pubkey,
    /// Sum of amounts backing orders not yet executed or cancelled
    pub committed: u64,
    /// Bump seed
    pub bump: u8,
    /// Vault bump seed
    pub vault_bump: u8,
}

impl Custody {
    pub const LEN: usize = 8 + // discriminator
        32 + // mint
        32 + // vault
        8 +  // committed
        1 +  // bump
        1;   // vault_bump

    pub fn ensure_matches(&self, mint: &Pubkey, vault: &Pubkey) -> Result<()> {
        require_keys_eq!(self.mint, *mint, RelayerError::CustodyMismatch);
        require_keys_eq!(self.vault, *vault, RelayerError::CustodyMismatch);
        Ok(())
    }

    pub fn commit(&mut self, amount: u64) -> Result<()> {
        self.committed = self
            .committed
            .checked_add(amount)
            .ok_or(RelayerError::MathOverflow)?;
        Ok(())
    }

    pub fn release(&mut self, amount: u64) -> Result<()> {
        self.committed = self
            .committed
            .checked_sub(amount)
            .ok_or(RelayerError::CommittedFundsExceeded)?;
        Ok(())
    }

    /// Vault must still cover every outstanding commitment
    pub fn ensure_backed(&self, vault_balance: u64) -> Result<()> {
        require!(
            vault_balance >= self.committed,
            RelayerError::CommittedFundsExceeded
        );
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;
    const WINDOW: i64 = 3600;

    fn order(max_window_time: i64) -> Order {
        Order {
            order_id: 1,
            token_a: Pubkey::new_unique(),
            token_b: Pubkey::new_unique(),
            amount_a: 1_000,
            amount_b: 2_000,
            min_reserve_a: 100,
            min_reserve_b: 100,
            max_window_time,
            deadline: NOW + 86_400,
            ..Order::default()
        }
    }

    fn pair(reserve_0: u64, reserve_1: u64) -> PairState {
        PairState {
            reserve_0,
            reserve_1,
            block_timestamp_last: NOW,
            ..PairState::default()
        }
    }

    #[test]
    fn transition_table() {
        use OrderEvent::*;
        use OrderStatus::*;

        assert_eq!(Pending.apply(ObservationWindowClosed).unwrap(), Ready);
        assert_eq!(Pending.apply(ExecuteImmediately).unwrap(), Executed);
        assert_eq!(Ready.apply(Execute).unwrap(), Executed);
        assert_eq!(Pending.apply(Cancel).unwrap(), Cancelled);
        assert_eq!(Ready.apply(Cancel).unwrap(), Cancelled);

        assert_eq!(Pending.apply(Execute).unwrap_err(), RelayerError::OrderNotReady.into());
        assert_eq!(
            Ready.apply(ObservationWindowClosed).unwrap_err(),
            RelayerError::OrderNotPending.into()
        );
        assert_eq!(
            Ready.apply(ExecuteImmediately).unwrap_err(),
            RelayerError::OrderNotPending.into()
        );
        for event in [ObservationWindowClosed, ExecuteImmediately, Execute, Cancel] {
            assert_eq!(
                Executed.apply(event).unwrap_err(),
                RelayerError::OrderAlreadyExecuted.into()
            );
            assert_eq!(
                Cancelled.apply(event).unwrap_err(),
                RelayerError::OrderIsCancelled.into()
            );
        }
    }

    #[test]
    fn becomes_ready_after_two_spaced_updates() {
        let mut order = order(600);
        let pair = pair(1_000, 1_000);

        order.ensure_observable(&pair, 600, NOW).unwrap();
        assert!(!order.record_observation(NOW, WINDOW).unwrap());
        assert_eq!(order.status, OrderStatus::Pending);

        assert_eq!(
            order.ensure_observable(&pair, 600, NOW + 599).unwrap_err(),
            RelayerError::PeriodNotElapsed.into()
        );

        order.ensure_observable(&pair, 600, NOW + 600).unwrap();
        assert!(order.record_observation(NOW + 600, WINDOW).unwrap());
        assert_eq!(order.status, OrderStatus::Ready);
        assert_eq!(order.first_observation_at, NOW);
        assert_eq!(order.last_observation_at, NOW + 600);

        assert_eq!(
            order.ensure_observable(&pair, 600, NOW + 1200).unwrap_err(),
            RelayerError::OrderNotPending.into()
        );
    }

    #[test]
    fn stays_pending_until_window_time_is_covered() {
        let mut order = order(1800);

        order.record_observation(NOW, WINDOW).unwrap();
        assert!(!order.record_observation(NOW + 600, WINDOW).unwrap());
        assert_eq!(order.status, OrderStatus::Pending);

        assert!(order.record_observation(NOW + 1800, WINDOW).unwrap());
        assert_eq!(order.observations, 3);
        assert_eq!(order.status, OrderStatus::Ready);
    }

    #[test]
    fn update_a_full_window_later_restarts_the_span() {
        let mut order = order(300);

        order.record_observation(NOW, WINDOW).unwrap();
        // Same bucket as the first sample: only one sample survives
        assert!(!order.record_observation(NOW + WINDOW, WINDOW).unwrap());
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.observations, 1);
        assert_eq!(order.first_observation_at, NOW + WINDOW);

        assert!(order.record_observation(NOW + WINDOW + 600, WINDOW).unwrap());
        assert_eq!(order.status, OrderStatus::Ready);
    }

    #[test]
    fn consult_span_is_at_least_one_period() {
        let window = OracleWindow::new(WINDOW, 6).unwrap();
        assert_eq!(order(0).min_consult_span(&window), 600);
        assert_eq!(order(1800).min_consult_span(&window), 1800);
    }

    #[test]
    fn reserve_too_low_leaves_progress_unchanged() {
        let mut order = order(600);
        order.record_observation(NOW, WINDOW).unwrap();
        let before = order.clone();

        assert_eq!(
            order.ensure_observable(&pair(99, 1_000), 600, NOW + 600).unwrap_err(),
            RelayerError::ReserveTooLow.into()
        );
        assert_eq!(
            order.ensure_observable(&pair(1_000, 99), 600, NOW + 600).unwrap_err(),
            RelayerError::ReserveTooLow.into()
        );
        assert_eq!(order.observations, before.observations);
        assert_eq!(order.last_observation_at, before.last_observation_at);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn expired_order_cannot_be_observed() {
        let order = order(600);
        assert_eq!(
            order
                .ensure_observable(&pair(1_000, 1_000), 600, order.deadline + 1)
                .unwrap_err(),
            RelayerError::DeadlineReached.into()
        );
    }

    #[test]
    fn only_provisions_into_empty_pools_execute_on_creation() {
        let empty = pair(0, 0);
        assert!(OrderKind::Provision.executes_on_creation(&empty));
        assert!(!OrderKind::Removal.executes_on_creation(&empty));

        let live = pair(1_000, 4_000);
        assert!(!OrderKind::Provision.executes_on_creation(&live));
        assert!(!OrderKind::Removal.executes_on_creation(&live));
    }

    #[test]
    fn removal_custodies_lp_only() {
        let lp_mint = Pubkey::new_unique();
        let order = Order {
            kind: OrderKind::Removal,
            lp_mint,
            liquidity_amount: 500,
            ..order(600)
        };
        let (leg, other) = order.custody_legs();
        assert_eq!(leg, CustodyLeg { mint: lp_mint, amount: 500 });
        assert!(other.is_none());
    }

    #[test]
    fn oracle_direction_requires_pair_tokens() {
        let oracle = OracleObservations {
            token_0: Pubkey::new_unique(),
            token_1: Pubkey::new_unique(),
            ..OracleObservations::default()
        };
        assert_eq!(
            oracle.direction(&oracle.token_0, &oracle.token_1).unwrap(),
            PriceDirection::ZeroForOne
        );
        assert_eq!(
            oracle.direction(&oracle.token_1, &oracle.token_0).unwrap(),
            PriceDirection::OneForZero
        );
        assert_eq!(
            oracle.direction(&oracle.token_0, &Pubkey::new_unique()).unwrap_err(),
            RelayerError::InvalidToken.into()
        );
    }

    #[test]
    fn relayer_routes_both_factories() {
        let relayer = Relayer {
            factory: Pubkey::new_unique(),
            router: Pubkey::new_unique(),
            counterpart_factory: Pubkey::new_unique(),
            counterpart_router: Pubkey::new_unique(),
            next_order_id: 1,
            next_oracle_id: 1,
            ..Relayer::default()
        };
        assert_eq!(relayer.router_for(&relayer.factory), Some(relayer.router));
        assert_eq!(
            relayer.router_for(&relayer.counterpart_factory),
            Some(relayer.counterpart_router)
        );
        assert_eq!(relayer.router_for(&Pubkey::new_unique()), None);

        // Each factory only accepts its own router
        assert_eq!(
            relayer.ensure_router(&relayer.factory, &relayer.router).unwrap(),
            relayer.router
        );
        assert_eq!(
            relayer
                .ensure_router(&relayer.factory, &relayer.counterpart_router)
                .unwrap_err(),
            RelayerError::InvalidRouter.into()
        );
        assert_eq!(
            relayer
                .ensure_router(&Pubkey::new_unique(), &relayer.router)
                .unwrap_err(),
            RelayerError::InvalidFactory.into()
        );

        let mut relayer = relayer;
        assert_eq!(relayer.allocate_ids().unwrap(), (1, 1));
        assert_eq!(relayer.allocate_ids().unwrap(), (2, 2));
        assert_eq!(relayer.total_orders, 2);
    }

    #[test]
    fn only_oracle_authority_refreshes_buffers() {
        let relayer = Relayer {
            owner: Pubkey::new_unique(),
            oracle_authority: Pubkey::new_unique(),
            ..Relayer::default()
        };
        relayer.ensure_oracle_authority(&relayer.oracle_authority).unwrap();
        assert_eq!(
            relayer.ensure_oracle_authority(&relayer.owner).unwrap_err(),
            RelayerError::InvalidOracleAuthority.into()
        );
    }

    #[test]
    fn custody_tracks_commitments() {
        let mut custody = Custody::default();
        custody.commit(300).unwrap();
        custody.commit(200).unwrap();
        custody.ensure_backed(500).unwrap();
        assert_eq!(
            custody.ensure_backed(499).unwrap_err(),
            RelayerError::CommittedFundsExceeded.into()
        );

        custody.release(300).unwrap();
        assert_eq!(custody.committed, 200);
        assert_eq!(
            custody.release(201).unwrap_err(),
            RelayerError::CommittedFundsExceeded.into()
        );
    }
}
