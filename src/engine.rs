use crate::error::SimError;
use crate::hash::HashStrategy;
use crate::table::BucketTable;
use crate::token::Token;
use tracing::{debug, trace};

/// One atomic engine action. Created by the engine per unit of work,
/// consumed exactly once by the animation controller, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
    /// Insertion phase: `token` was appended to `bucket`, whose chain now
    /// holds `chain_len` tokens. `collision` is true iff the bucket was
    /// already occupied before this insertion.
    Inserted {
        bucket: usize,
        token: Token,
        chain_len: usize,
        collision: bool,
    },
    /// Resolution phase: `token` was retrieved from the front of `bucket`'s
    /// chain, leaving `remaining` tokens behind.
    Drained {
        bucket: usize,
        token: Token,
        remaining: usize,
    },
}

impl StepEvent {
    #[inline]
    pub fn bucket(&self) -> usize {
        match self {
            StepEvent::Inserted { bucket, .. } | StepEvent::Drained { bucket, .. } => *bucket,
        }
    }

    #[inline]
    pub fn token(&self) -> &Token {
        match self {
            StepEvent::Inserted { token, .. } | StepEvent::Drained { token, .. } => token,
        }
    }
}

/// Running statistics, maintained incrementally during insertion. Both
/// fields are derived and must always equal the value recomputed from the
/// table, which `recompute` does for cross-checking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Insertions that landed in an already-occupied bucket.
    pub total_collisions: usize,
    /// Buckets holding at least one token.
    pub unique_buckets_used: usize,
}

impl RunStats {
    pub fn recompute(table: &BucketTable) -> RunStats {
        let mut used = 0usize;
        let mut items = 0usize;
        for (_, chain) in table.iter() {
            if !chain.is_empty() {
                used += 1;
                items += chain.len();
            }
        }
        RunStats {
            total_collisions: items - used,
            unique_buckets_used: used,
        }
    }
}

/// The first collision observed in a run: the bucket, the token that opened
/// it, and the newcomer that collided with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstCollision {
    pub bucket: usize,
    pub first_occupant: Token,
    pub newcomer: Token,
}

/// Whether a resolution phase has any work to do. Computed once at phase
/// start so the renderer can branch on a zero-step run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStart {
    /// No bucket was occupied; the phase completes with zero steps.
    Empty,
    /// `buckets` non-empty chains were recorded for draining.
    Pending { buckets: usize },
}

#[derive(Debug)]
struct DrainCursor {
    /// Non-empty bucket indices captured at phase start, ascending. Buckets
    /// that empty mid-phase are never revisited.
    snapshot: Vec<usize>,
    pos: usize,
}

/// Orchestrates both simulation phases over an exclusively-owned table.
/// Each run constructs a fresh engine (or resets this one); nothing is
/// shared across runs.
#[derive(Debug)]
pub struct Engine {
    table: BucketTable,
    strategy: HashStrategy,
    tokens: Vec<Token>,
    stats: RunStats,
    next_token: usize,
    drain: Option<DrainCursor>,
    first_collision: Option<FirstCollision>,
}

impl Engine {
    /// Build an engine over a pre-generated token sequence. `space_size`
    /// must be at least 1; `tokens` may be empty.
    pub fn new(
        tokens: Vec<Token>,
        strategy: HashStrategy,
        space_size: usize,
    ) -> Result<Self, SimError> {
        Ok(Engine {
            table: BucketTable::new(space_size)?,
            strategy,
            tokens,
            stats: RunStats::default(),
            next_token: 0,
            drain: None,
            first_collision: None,
        })
    }

    #[inline]
    pub fn table(&self) -> &BucketTable {
        &self.table
    }

    #[inline]
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[inline]
    pub fn strategy(&self) -> HashStrategy {
        self.strategy
    }

    pub fn first_collision(&self) -> Option<&FirstCollision> {
        self.first_collision.as_ref()
    }

    /// True once every token has been processed by the insertion phase.
    #[inline]
    pub fn insertion_complete(&self) -> bool {
        self.next_token >= self.tokens.len()
    }

    /// Discard all run state: empty table, zeroed statistics, insertion
    /// cursor back at the first token. The token sequence is kept, so a
    /// restarted run replays the same inputs.
    pub fn reset(&mut self) {
        // size() >= 1 is established at construction, new() cannot fail here
        self.table = BucketTable::new(self.table.size()).unwrap_or_else(|_| unreachable!());
        self.stats = RunStats::default();
        self.next_token = 0;
        self.drain = None;
        self.first_collision = None;
        debug!(tokens = self.tokens.len(), space = self.table.size(), "engine reset");
    }

    /// Process the next token in generation order: hash it, insert it, and
    /// update the statistics. Returns `None` once all tokens are processed.
    pub fn step_insertion(&mut self) -> Option<StepEvent> {
        let token = self.tokens.get(self.next_token)?.clone();
        self.next_token += 1;

        let bucket = self.strategy.bucket_for(&token, self.table.size());
        // bucket < size by the strategy contract, insert cannot fail
        let (chain_len, collision) = self
            .table
            .insert(bucket, token.clone())
            .unwrap_or_else(|_| unreachable!());

        if collision {
            self.stats.total_collisions += 1;
            if self.first_collision.is_none() {
                let first_occupant = self
                    .table
                    .snapshot_contents(bucket)
                    .unwrap_or_else(|_| unreachable!())
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| unreachable!());
                self.first_collision = Some(FirstCollision {
                    bucket,
                    first_occupant,
                    newcomer: token.clone(),
                });
            }
        } else {
            self.stats.unique_buckets_used += 1;
        }

        trace!(%token, bucket, chain_len, collision, "insertion step");
        Some(StepEvent::Inserted {
            bucket,
            token,
            chain_len,
            collision,
        })
    }

    /// Record the set of non-empty buckets to drain, in ascending index
    /// order. The snapshot is taken once; buckets that become empty during
    /// the phase are not re-scanned.
    pub fn begin_resolution(&mut self) -> ResolutionStart {
        let snapshot = self.table.occupied_buckets();
        let start = if snapshot.is_empty() {
            ResolutionStart::Empty
        } else {
            ResolutionStart::Pending {
                buckets: snapshot.len(),
            }
        };
        debug!(buckets = snapshot.len(), "resolution snapshot taken");
        self.drain = Some(DrainCursor { snapshot, pos: 0 });
        start
    }

    /// Retrieve the next token from the current snapshot bucket, advancing
    /// to the next recorded bucket when a chain runs dry. Returns `None`
    /// when every recorded bucket is drained (or no snapshot was taken).
    pub fn step_resolution(&mut self) -> Option<StepEvent> {
        let cursor = self.drain.as_mut()?;
        while let Some(&bucket) = cursor.snapshot.get(cursor.pos) {
            // is_empty/pop cannot fail: snapshot indices came from the table
            if self.table.is_empty(bucket).unwrap_or_else(|_| unreachable!()) {
                cursor.pos += 1;
                continue;
            }
            let token = self.table.pop_front(bucket).unwrap_or_else(|_| unreachable!());
            let remaining = self.table.length(bucket).unwrap_or_else(|_| unreachable!());
            trace!(%token, bucket, remaining, "resolution step");
            return Some(StepEvent::Drained {
                bucket,
                token,
                remaining,
            });
        }
        None
    }
}

/// Lazy, finite view of the insertion phase. Constructing it resets the
/// engine, so each call replays the full token sequence from a clean table.
pub fn run_insertion_phase(engine: &mut Engine) -> InsertionPhase<'_> {
    engine.reset();
    InsertionPhase { engine }
}

pub struct InsertionPhase<'e> {
    engine: &'e mut Engine,
}

impl InsertionPhase<'_> {
    /// Read access to the table between steps, for rendering.
    pub fn table(&self) -> &BucketTable {
        self.engine.table()
    }
}

impl Iterator for InsertionPhase<'_> {
    type Item = StepEvent;

    fn next(&mut self) -> Option<StepEvent> {
        self.engine.step_insertion()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.engine.tokens.len() - self.engine.next_token;
        (left, Some(left))
    }
}

/// Lazy, finite view of the resolution phase, computed against a
/// point-in-time snapshot of the occupied buckets.
pub fn run_resolution_phase(engine: &mut Engine) -> ResolutionPhase<'_> {
    let start = engine.begin_resolution();
    ResolutionPhase { engine, start }
}

pub struct ResolutionPhase<'e> {
    engine: &'e mut Engine,
    start: ResolutionStart,
}

impl ResolutionPhase<'_> {
    /// True when no bucket was occupied at phase start; the renderer can
    /// branch on this instead of waiting for an immediately-exhausted run.
    pub fn is_empty_run(&self) -> bool {
        self.start == ResolutionStart::Empty
    }

    pub fn start(&self) -> ResolutionStart {
        self.start
    }

    pub fn table(&self) -> &BucketTable {
        self.engine.table()
    }
}

impl Iterator for ResolutionPhase<'_> {
    type Item = StepEvent;

    fn next(&mut self) -> Option<StepEvent> {
        self.engine.step_resolution()
    }
}
