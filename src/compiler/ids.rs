use crate::error::CompileError;
use ahash::AHashSet;
use uuid::Uuid;

/// Source of fresh identifiers for steps, connections and the workflow itself.
///
/// One allocator is owned by each compilation, so nothing is shared between
/// concurrent compilations.
pub trait IdAllocator: Send {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs. The default allocator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdAllocator for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic identifiers (`id-0001`, `id-0002`, ...), handy for tests and diffs.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdAllocator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{:04}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// The identifiers handed out during one compilation.
///
/// Ids supplied by the caller are reserved up front, and every fresh id is checked
/// against everything handed out so far, so no two steps or connections share one.
pub struct IdScope {
    allocator: Box<dyn IdAllocator>,
    taken: AHashSet<String>,
}

impl IdScope {
    pub fn new(allocator: Box<dyn IdAllocator>) -> Self {
        Self {
            allocator,
            taken: AHashSet::new(),
        }
    }

    /// Marks `ids` as already in use.
    pub fn with_reserved<I: IntoIterator<Item = String>>(mut self, ids: I) -> Self {
        self.taken.extend(ids);
        self
    }

    /// Draws ids from the allocator until one is free.
    ///
    /// An allocator that never repeats itself can collide at most once per reserved id;
    /// running past that means it keeps returning used values.
    pub fn fresh(&mut self) -> Result<String, CompileError> {
        let attempts = self.taken.len() + 1;
        let mut last = String::new();
        for _ in 0..attempts {
            let id = self.allocator.next_id();
            if !self.taken.contains(&id) {
                self.taken.insert(id.clone());
                return Ok(id);
            }
            tracing::debug!(id = %id, "allocated id already in use, drawing another");
            last = id;
        }
        Err(CompileError::IdentifierExhausted { id: last })
    }
}
