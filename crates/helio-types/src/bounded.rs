// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Fixed-capacity history buffer for store lists.
//!
//! The newest item always sits at the head. Once the buffer is full, every
//! insert drops the oldest item from the tail (FIFO eviction by insertion).

use serde::{Serialize, Serializer};
use std::collections::VecDeque;

/// A bounded deque that keeps the most recent `capacity` items, newest first.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundedDeque<T> {
    cap: usize,
    buf: VecDeque<T>,
}

impl<T> BoundedDeque<T> {
    /// Create an empty deque.
    ///
    /// # Arguments
    /// * `cap` - Maximum number of items to keep. If 0, inserts are no-ops.
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            buf: VecDeque::new(),
        }
    }

    /// Insert the newest item, evicting the oldest if at capacity
    pub fn push_front(&mut self, value: T) {
        if self.cap == 0 {
            return;
        }
        if self.buf.len() == self.cap {
            self.buf.pop_back();
        }
        self.buf.push_front(value);
    }

    /// Replace the whole content. `items` is taken newest first; anything past
    /// the capacity is dropped.
    pub fn replace(&mut self, items: impl IntoIterator<Item = T>) {
        self.buf.clear();
        self.buf.extend(items.into_iter().take(self.cap));
    }

    /// Keep only the items for which `keep` returns true
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.buf.retain(keep);
    }

    /// Iterate newest to oldest
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.buf.iter()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Most recently inserted item
    pub fn newest(&self) -> Option<&T> {
        self.buf.front()
    }

    /// Oldest retained item
    pub fn oldest(&self) -> Option<&T> {
        self.buf.back()
    }

    /// Get item by index (0 = newest)
    pub fn get(&self, index: usize) -> Option<&T> {
        self.buf.get(index)
    }

    /// Copy out as a Vec, newest first
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.buf.iter().cloned().collect()
    }
}

impl<'a, T> IntoIterator for &'a BoundedDeque<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter()
    }
}

impl<T: Serialize> Serialize for BoundedDeque<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.buf.iter())
    }
}
