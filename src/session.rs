// 🛒 Booking Session - Debounced quote engine
//
// A session exclusively owns its line items, date range and guest count for
// the duration of a checkout flow. Every edit submits a numbered snapshot to
// a worker task; the worker waits for a quiet window (so rapid edits coalesce
// into one computation), aggregates, and publishes the quote on a watch
// channel. A result whose generation is no longer the latest is discarded,
// never published: only the most recently initiated computation can reach
// displayed state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::booking::{aggregate, BookingDetails, BookingQuote, DateRange, LineItem};
use crate::config::AppConfig;
use crate::error::BookingError;
use crate::tax::{TaxContext, TaxRateSource};

// ============================================================================
// SESSION STATE
// ============================================================================

/// Immutable snapshot of a session's booking inputs.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub items: Vec<LineItem>,
    pub date_range: Option<DateRange>,
    pub guests: u32,
}

// ============================================================================
// QUOTE ENGINE
// ============================================================================

/// Debounced, last-write-wins quote computation.
pub struct QuoteEngine {
    tx: mpsc::UnboundedSender<(u64, SessionState)>,
    generation: Arc<AtomicU64>,
    quote_rx: watch::Receiver<Option<BookingQuote>>,
}

impl QuoteEngine {
    /// Spawn the engine worker. `debounce` is the quiet window edits must
    /// survive before a computation fires.
    pub fn spawn(ctx: TaxContext, source: Arc<dyn TaxRateSource>, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (quote_tx, quote_rx) = watch::channel(None);
        let generation = Arc::new(AtomicU64::new(0));

        tokio::spawn(run_worker(
            rx,
            quote_tx,
            ctx,
            source,
            debounce,
            Arc::clone(&generation),
        ));

        QuoteEngine {
            tx,
            generation,
            quote_rx,
        }
    }

    /// Submit a new snapshot. Implicitly cancels interest in any prior one.
    pub fn submit(&self, state: SessionState) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        // Send fails only when the worker is gone, i.e. the session is dead.
        let _ = self.tx.send((generation, state));
    }

    /// Watch channel carrying the latest published quote.
    pub fn quotes(&self) -> watch::Receiver<Option<BookingQuote>> {
        self.quote_rx.clone()
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<(u64, SessionState)>,
    quote_tx: watch::Sender<Option<BookingQuote>>,
    ctx: TaxContext,
    source: Arc<dyn TaxRateSource>,
    debounce: Duration,
    generation: Arc<AtomicU64>,
) {
    while let Some((mut current_gen, mut state)) = rx.recv().await {
        // Debounce: keep absorbing edits until the channel stays quiet
        // for the full window.
        loop {
            tokio::select! {
                next = rx.recv() => match next {
                    Some((gen, newer)) => {
                        current_gen = gen;
                        state = newer;
                    }
                    None => return,
                },
                _ = tokio::time::sleep(debounce) => break,
            }
        }

        let quote = aggregate(
            &state.items,
            state.date_range.as_ref(),
            state.guests,
            &ctx,
            source.as_ref(),
        )
        .await;

        // A newer snapshot may have arrived while the aggregation was
        // suspended on the rate source. Its computation is pending in the
        // queue; this result is stale and must not reach displayed state.
        if current_gen == generation.load(Ordering::SeqCst) {
            let _ = quote_tx.send(Some(quote));
        } else {
            debug!(generation = current_gen, "discarding stale quote");
        }
    }
}

// ============================================================================
// BOOKING SESSION
// ============================================================================

pub struct BookingSession {
    /// Stable session identity.
    pub id: String,

    state: SessionState,
    min_guests: u32,
    max_guests: u32,
    ctx: TaxContext,
    source: Arc<dyn TaxRateSource>,
    engine: QuoteEngine,
}

impl BookingSession {
    pub fn new(config: &AppConfig, ctx: TaxContext, source: Arc<dyn TaxRateSource>) -> Self {
        let engine = QuoteEngine::spawn(
            ctx.clone(),
            Arc::clone(&source),
            Duration::from_millis(config.debounce_ms),
        );

        BookingSession {
            id: uuid::Uuid::new_v4().to_string(),
            state: SessionState {
                items: Vec::new(),
                date_range: None,
                guests: config.default_guests,
            },
            min_guests: config.min_guests,
            max_guests: config.max_guests,
            ctx,
            source,
            engine,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.state.items
    }

    pub fn date_range(&self) -> Option<&DateRange> {
        self.state.date_range.as_ref()
    }

    pub fn guests(&self) -> u32 {
        self.state.guests
    }

    /// Watch channel carrying the latest published quote for this session.
    pub fn quotes(&self) -> watch::Receiver<Option<BookingQuote>> {
        self.engine.quotes()
    }

    pub fn add_item(&mut self, item: LineItem) {
        self.state.items.push(item);
        self.touch();
    }

    pub fn update_quantity(&mut self, index: usize, quantity: u32) -> Result<(), BookingError> {
        let item = self
            .state
            .items
            .get_mut(index)
            .ok_or_else(|| BookingError::invalid_input(format!("no cart item at {}", index)))?;

        item.quantity = quantity.max(1);
        self.touch();
        Ok(())
    }

    pub fn remove_item(&mut self, index: usize) -> Result<(), BookingError> {
        if index >= self.state.items.len() {
            return Err(BookingError::invalid_input(format!(
                "no cart item at {}",
                index
            )));
        }

        self.state.items.remove(index);
        self.touch();
        Ok(())
    }

    pub fn set_dates(&mut self, check_in: NaiveDate, check_out: NaiveDate) {
        self.state.date_range = Some(DateRange::new(check_in, check_out));
        self.touch();
    }

    /// Set the guest count, clamped into the configured bounds.
    pub fn set_guests(&mut self, guests: u32) {
        self.state.guests = guests.clamp(self.min_guests, self.max_guests);
        self.touch();
    }

    fn touch(&self) {
        self.engine.submit(self.state.clone());
    }

    /// Compute a quote immediately, bypassing the debounce window.
    pub async fn quote_now(&self) -> BookingQuote {
        aggregate(
            &self.state.items,
            self.state.date_range.as_ref(),
            self.state.guests,
            &self.ctx,
            self.source.as_ref(),
        )
        .await
    }

    /// Confirm the booking from a fresh quote.
    pub async fn confirm(&self) -> Result<BookingDetails, BookingError> {
        let quote = self.quote_now().await;
        BookingDetails::from_quote(&self.state.items, self.state.date_range.as_ref(), &quote)
    }
}

// ============================================================================
// TESTS
// ============================================================================
