//! Fixed-capacity recycling pool
//!
//! All instances are built up front and never freed until the pool drops.
//! Slots move between an active list and an inactive free-stack; running out
//! of inactive slots is a normal condition, reported as `None`.

/// Stable index of a slot inside a [`Pool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolHandle(u32);

impl PoolHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Fixed-capacity allocator partitioning its slots into active and inactive sets
#[derive(Debug)]
pub struct Pool<T> {
    slots: Vec<T>,
    /// Activation order (oldest first)
    active: Vec<PoolHandle>,
    /// Free stack, last entry is handed out next
    inactive: Vec<PoolHandle>,
    /// Per-slot membership flag, keeps `release` O(1) for the idempotence check
    is_active: Vec<bool>,
}

impl<T> Pool<T> {
    /// Build `capacity` instances with `make`; all start inactive
    pub fn new(capacity: usize, mut make: impl FnMut(PoolHandle) -> T) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        let mut inactive = Vec::with_capacity(capacity);
        for i in 0..capacity {
            let handle = PoolHandle(i as u32);
            slots.push(make(handle));
            inactive.push(handle);
        }
        Self {
            slots,
            active: Vec::with_capacity(capacity),
            inactive,
            is_active: vec![false; capacity],
        }
    }

    /// Move one instance from inactive to active
    pub fn acquire(&mut self) -> Option<PoolHandle> {
        let handle = self.inactive.pop()?;
        self.is_active[handle.index()] = true;
        self.active.push(handle);
        Some(handle)
    }

    /// Move an active instance back to inactive; no-op if it is not active
    pub fn release(&mut self, handle: PoolHandle) -> bool {
        if !self.is_active(handle) {
            return false;
        }
        if let Some(pos) = self.active.iter().position(|&h| h == handle) {
            // Preserve activation order for the remaining actives
            self.active.remove(pos);
        }
        self.is_active[handle.index()] = false;
        self.inactive.push(handle);
        true
    }

    /// Release every active instance
    pub fn release_all(&mut self) {
        while let Some(handle) = self.active.pop() {
            self.is_active[handle.index()] = false;
            self.inactive.push(handle);
        }
    }

    /// Active handles in activation order.
    ///
    /// Snapshot with `to_vec()` before acquiring or releasing mid-iteration.
    pub fn active(&self) -> &[PoolHandle] {
        &self.active
    }

    /// Mutable view over every active instance
    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (PoolHandle, &mut T)> {
        let is_active = &self.is_active;
        self.slots
            .iter_mut()
            .enumerate()
            .filter(move |(i, _)| is_active[*i])
            .map(|(i, slot)| (PoolHandle(i as u32), slot))
    }

    pub fn is_active(&self, handle: PoolHandle) -> bool {
        self.is_active.get(handle.index()).copied().unwrap_or(false)
    }

    /// Handle for slot `index`, if the pool has that many slots
    pub fn handle_at(&self, index: usize) -> Option<PoolHandle> {
        (index < self.slots.len()).then_some(PoolHandle(index as u32))
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.slots.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.slots.get_mut(handle.index())
    }

    /// Every slot regardless of state (teardown, bookkeeping)
    pub fn iter_all(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (PoolHandle(i as u32), slot))
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn inactive_len(&self) -> usize {
        self.inactive.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_acquire_until_exhausted() {
        let mut pool = Pool::new(3, |h| h.index());
        assert_eq!(pool.inactive_len(), 3);

        let a = pool.acquire().unwrap();
        let _b = pool.acquire().unwrap();
        let _c = pool.acquire().unwrap();
        assert!(pool.acquire().is_none());

        assert!(pool.release(a));
        assert_eq!(pool.acquire(), Some(a));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut pool = Pool::new(2, |_| ());
        let a = pool.acquire().unwrap();
        assert!(pool.release(a));
        assert!(!pool.release(a));
        assert_eq!(pool.active_len(), 0);
        assert_eq!(pool.inactive_len(), 2);
    }

    #[test]
    fn test_release_keeps_activation_order() {
        let mut pool = Pool::new(4, |_| ());
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        let c = pool.acquire().unwrap();
        pool.release(b);
        assert_eq!(pool.active(), &[a, c]);
    }

    #[test]
    fn test_snapshot_survives_mutation() {
        let mut pool = Pool::new(4, |_| 0u32);
        for _ in 0..3 {
            pool.acquire();
        }
        let snapshot = pool.active().to_vec();
        for handle in snapshot {
            pool.release(handle);
            // Refill while scanning; the snapshot is unaffected
            pool.acquire();
        }
        assert_eq!(pool.active_len(), 3);
    }

    #[test]
    fn test_iter_active_mut_only_touches_active() {
        let mut pool = Pool::new(3, |_| 0u32);
        let a = pool.acquire().unwrap();
        for (_, value) in pool.iter_active_mut() {
            *value += 1;
        }
        assert_eq!(*pool.get(a).unwrap(), 1);
        let touched: u32 = pool.iter_all().map(|(_, v)| *v).sum();
        assert_eq!(touched, 1);
    }

    #[test]
    fn test_release_all() {
        let mut pool = Pool::new(5, |_| ());
        for _ in 0..5 {
            pool.acquire();
        }
        pool.release_all();
        assert_eq!(pool.active_len(), 0);
        assert_eq!(pool.inactive_len(), 5);
    }

    #[test]
    fn test_handle_at() {
        let mut pool = Pool::new(2, |h| h.index());
        let a = pool.acquire().unwrap();
        assert_eq!(pool.handle_at(a.index()), Some(a));
        assert!(pool.handle_at(2).is_none());
    }

    #[test]
    fn test_zero_capacity_pool() {
        let mut pool: Pool<()> = Pool::new(0, |_| ());
        assert!(pool.acquire().is_none());
        assert_eq!(pool.capacity(), 0);
    }

    proptest! {
        #[test]
        fn prop_partition_is_preserved(capacity in 0usize..32, ops in proptest::collection::vec(any::<(bool, u8)>(), 0..128)) {
            let mut pool = Pool::new(capacity, |_| ());
            for (acquire, pick) in ops {
                if acquire {
                    pool.acquire();
                } else if !pool.active().is_empty() {
                    let idx = pick as usize % pool.active_len();
                    let handle = pool.active()[idx];
                    pool.release(handle);
                }
                prop_assert_eq!(pool.active_len() + pool.inactive_len(), capacity);
            }
        }

        #[test]
        fn prop_exhaustion_then_one_more(capacity in 1usize..32) {
            let mut pool = Pool::new(capacity, |_| ());
            let handles: Vec<_> = (0..capacity).map(|_| pool.acquire()).collect();
            prop_assert!(handles.iter().all(Option::is_some));
            prop_assert!(pool.acquire().is_none());
            let released = handles[capacity / 2].unwrap();
            pool.release(released);
            prop_assert_eq!(pool.acquire(), Some(released));
        }
    }
}
