use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::domain::address::{AddressGenerator, AddressSource};
use crate::domain::errors::{AddressExhausted, DirectoryLoadError, LookupFailure};
use crate::domain::geo::{Bounds, Coordinate};
use crate::domain::ports::{CountryDataSource, CountryLookup, MapView, MarkerKind, TextSlot};
use crate::domain::{CountryCode, CountryRecord, CountryTable};

pub(crate) fn code(value: &str) -> CountryCode {
    CountryCode::parse(value).expect("valid test country code")
}

pub(crate) fn record(value: &str, name: &str, lat: f64, lon: f64) -> CountryRecord {
    CountryRecord {
        code: code(value),
        name: name.to_string(),
        centroid: Coordinate::new_unchecked(lat, lon),
    }
}

pub(crate) fn sample_table() -> CountryTable {
    [
        record("US", "United States", 37.09, -95.71),
        record("DE", "Germany", 51.17, 10.45),
        record("JP", "Japan", 36.2, 138.25),
    ]
    .into_iter()
    .map(|r| (r.code, r))
    .collect()
}

// Data source that counts fetches and optionally fails.
#[derive(Clone)]
pub(crate) struct RecordingDataSource {
    table: CountryTable,
    fetches: Arc<AtomicUsize>,
    fail_first: Arc<AtomicUsize>,
}

impl RecordingDataSource {
    pub(crate) fn new(table: CountryTable) -> Self {
        Self {
            table,
            fetches: Arc::new(AtomicUsize::new(0)),
            fail_first: Arc::new(AtomicUsize::new(0)),
        }
    }

    // The first `count` fetches fail with a fetch error.
    pub(crate) fn failing_first(self, count: usize) -> Self {
        self.fail_first.store(count, Ordering::SeqCst);
        self
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CountryDataSource for RecordingDataSource {
    async fn fetch(&self) -> Result<CountryTable, DirectoryLoadError> {
        let attempt = self.fetches.fetch_add(1, Ordering::SeqCst);
        if attempt < self.fail_first.load(Ordering::SeqCst) {
            return Err(DirectoryLoadError::Fetch("dataset offline".to_string()));
        }
        Ok(self.table.clone())
    }

    fn describe(&self) -> String {
        "recording".to_string()
    }
}

pub(crate) type LookupReply = Result<Option<CountryCode>, LookupFailure>;

// Lookup that replays scripted replies and records every address it was asked about.
#[derive(Clone)]
pub(crate) struct ScriptedLookup {
    replies: Arc<Mutex<VecDeque<LookupReply>>>,
    fallback: LookupReply,
    calls: Arc<Mutex<Vec<Ipv4Addr>>>,
}

impl ScriptedLookup {
    pub(crate) fn new(replies: Vec<LookupReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            fallback: Ok(None),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn always(reply: LookupReply) -> Self {
        let mut lookup = Self::new(Vec::new());
        lookup.fallback = reply;
        lookup
    }

    pub(crate) fn calls(&self) -> Vec<Ipv4Addr> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

#[async_trait]
impl CountryLookup for ScriptedLookup {
    async fn resolve_country_code(&self, address: Ipv4Addr) -> LookupReply {
        self.calls.lock().expect("calls mutex poisoned").push(address);
        let next = self
            .replies
            .lock()
            .expect("replies mutex poisoned")
            .pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

#[derive(Clone, Default)]
pub(crate) struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub(crate) fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

// Address source wrapper that counts how many addresses were handed out.
pub(crate) struct CountingAddresses<A> {
    inner: A,
    calls: CallCounter,
}

impl<A> CountingAddresses<A> {
    pub(crate) fn new(inner: A) -> Self {
        Self {
            inner,
            calls: CallCounter::default(),
        }
    }

    pub(crate) fn counter(&self) -> CallCounter {
        self.calls.clone()
    }
}

impl<A: AddressSource> AddressSource for CountingAddresses<A> {
    fn next_address(&mut self) -> Result<Ipv4Addr, AddressExhausted> {
        self.calls.0.fetch_add(1, Ordering::SeqCst);
        self.inner.next_address()
    }
}

pub(crate) fn seeded_generator(seed: u64) -> AddressGenerator<StdRng> {
    AddressGenerator::new(StdRng::seed_from_u64(seed))
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ViewEvent {
    Clear,
    Marker(MarkerKind, Coordinate),
    Line(Coordinate, Coordinate),
    Fit(Bounds),
    Text(TextSlot, String),
}

// Map view that records everything the game loop asked it to show.
#[derive(Clone, Default)]
pub(crate) struct RecordingView {
    pub(crate) events: Arc<Mutex<Vec<ViewEvent>>>,
}

impl RecordingView {
    pub(crate) fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().expect("events mutex poisoned").clone()
    }

    pub(crate) fn texts(&self, slot: TextSlot) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ViewEvent::Text(s, text) if s == slot => Some(text),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().expect("events mutex poisoned").push(event);
    }
}

impl MapView for RecordingView {
    fn clear(&mut self) {
        self.push(ViewEvent::Clear);
    }

    fn render_marker(&mut self, kind: MarkerKind, at: Coordinate) {
        self.push(ViewEvent::Marker(kind, at));
    }

    fn render_line(&mut self, from: Coordinate, to: Coordinate) {
        self.push(ViewEvent::Line(from, to));
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.push(ViewEvent::Fit(bounds));
    }

    fn display_text(&mut self, slot: TextSlot, text: &str) {
        self.push(ViewEvent::Text(slot, text.to_string()));
    }
}
