//! Which chunk ids have already been absorbed: one bit per planned chunk.

/// Fixed-size bit set over ids `[0, id_bound)` (LSB of byte 0 = chunk 0).
#[derive(Debug, Clone, Default)]
pub(crate) struct SettledSet {
    bytes: Vec<u8>,
    id_bound: usize,
    settled: usize,
}

impl SettledSet {
    pub(crate) fn new(id_bound: usize) -> Self {
        SettledSet {
            bytes: vec![0u8; id_bound.div_ceil(8)],
            id_bound,
            settled: 0,
        }
    }

    /// Marks `id` settled. Returns false if it already was.
    /// Caller checks `in_plan` first; ids past the plan are ignored.
    pub(crate) fn insert(&mut self, id: usize) -> bool {
        if !self.in_plan(id) || self.contains(id) {
            return false;
        }
        self.bytes[id / 8] |= 1 << (id % 8);
        self.settled += 1;
        true
    }

    pub(crate) fn contains(&self, id: usize) -> bool {
        self.bytes
            .get(id / 8)
            .map(|&b| (b & (1 << (id % 8))) != 0)
            .unwrap_or(false)
    }

    pub(crate) fn in_plan(&self, id: usize) -> bool {
        id < self.id_bound
    }

    pub(crate) fn len(&self) -> usize {
        self.settled
    }

    /// Ids below this bound can be settled.
    pub(crate) fn id_bound(&self) -> usize {
        self.id_bound
    }
}
