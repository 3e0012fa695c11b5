/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use crate::constants::QOIF_CACHE_SIZE;

/// Hash of a pixel, all four channels xor-ed together
#[inline(always)]
pub const fn hash(px: [u8; 4]) -> u8 {
    px[0] ^ px[1] ^ px[2] ^ px[3]
}

/// Slot a pixel lives in
#[inline(always)]
pub const fn cache_position(px: [u8; 4]) -> usize {
    hash(px) as usize % QOIF_CACHE_SIZE
}

/// Recently seen colors, indexed by [`hash`]
///
/// Encoder and decoder each keep one and must call
/// [`store`](Self::store) with the same pixels in the same
/// order, index chunks would reference different colors otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ColorCache {
    slots: [[u8; 4]; QOIF_CACHE_SIZE]
}

impl ColorCache {
    pub const fn new() -> ColorCache {
        ColorCache {
            slots: [[0; 4]; QOIF_CACHE_SIZE]
        }
    }

    /// `index` is masked to the cache size
    #[inline(always)]
    pub const fn lookup(&self, index: usize) -> [u8; 4] {
        self.slots[index % QOIF_CACHE_SIZE]
    }

    /// Whether `px` is already in its slot
    #[inline(always)]
    pub const fn contains(&self, px: [u8; 4]) -> bool {
        let slot = self.slots[cache_position(px)];

        slot[0] == px[0] && slot[1] == px[1] && slot[2] == px[2] && slot[3] == px[3]
    }

    /// Overwrite the slot for `px`, evicting whatever was there
    #[inline(always)]
    pub fn store(&mut self, px: [u8; 4]) {
        self.slots[cache_position(px)] = px;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_xor_of_channels() {
        assert_eq!(hash([0, 0, 0, 255]), 255);
        assert_eq!(hash([1, 2, 4, 8]), 15);
        assert_eq!(hash([0xff, 0xff, 0, 0]), 0);
        assert_eq!(cache_position([0, 0, 0, 255]), 63);
    }

    #[test]
    fn starts_with_zero_pixels() {
        let cache = ColorCache::new();

        for i in 0..QOIF_CACHE_SIZE {
            assert_eq!(cache.lookup(i), [0; 4]);
        }
        assert!(cache.contains([0; 4]));
        assert!(!cache.contains([0, 0, 0, 255]));
    }

    #[test]
    fn store_overwrites_colliding_slot() {
        let mut cache = ColorCache::new();
        let first = [10, 0, 0, 0];
        // same hash, 10 ^ 0 == 2 ^ 8
        let second = [2, 8, 0, 0];

        cache.store(first);
        assert!(cache.contains(first));

        cache.store(second);
        assert!(cache.contains(second));
        assert!(!cache.contains(first));
        assert_eq!(cache.lookup(10), second);
    }
}
