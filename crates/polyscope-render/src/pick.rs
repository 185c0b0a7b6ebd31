//! Pick index encoding and pick buffer range allocation.
//!
//! Every pickable element is drawn into an offscreen buffer with a color that
//! encodes a flat global index. Each structure owns a contiguous range
//! `[start, start + count)` of that index space. Index 0 is the background.

use std::collections::BTreeMap;

use glam::Vec3;

use crate::error::{RenderError, RenderResult};

/// Largest index representable in a 24-bit color.
pub const MAX_PICK_INDEX: usize = 0xFF_FFFF;

/// Decodes a pick color back to an index.
///
/// The color is encoded as RGB where:
/// - R contains bits 16-23
/// - G contains bits 8-15
/// - B contains bits 0-7
#[must_use]
pub fn color_to_index(r: u8, g: u8, b: u8) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Encodes an index as a pick color.
#[must_use]
pub fn index_to_color(index: u32) -> [u8; 3] {
    [
        ((index >> 16) & 0xFF) as u8,
        ((index >> 8) & 0xFF) as u8,
        (index & 0xFF) as u8,
    ]
}

/// Encodes an index as a normalized float color, the form shaders receive.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn index_to_color_vec3(index: usize) -> Vec3 {
    let [r, g, b] = index_to_color((index & MAX_PICK_INDEX) as u32);
    Vec3::new(f32::from(r), f32::from(g), f32::from(b)) / 255.0
}

/// Decodes a normalized float color.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn color_vec3_to_index(color: Vec3) -> usize {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    color_to_index(c.x as u8, c.y as u8, c.z as u8) as usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PickRange {
    structure_type: String,
    structure_name: String,
    count: usize,
}

/// Hands out pick index ranges to structures and resolves global indices.
///
/// Released ranges go to a free list and are handed out again, so a
/// structure that re-requests its range on every refresh does not use up the
/// index space.
#[derive(Debug, Clone)]
pub struct PickRangeAllocator {
    /// Ranges keyed by their start index.
    ranges: BTreeMap<usize, PickRange>,
    /// Free blocks below `next_global_index`, start -> length. Never adjacent.
    free: BTreeMap<usize, usize>,
    next_global_index: usize,
}

impl Default for PickRangeAllocator {
    fn default() -> Self {
        Self {
            ranges: BTreeMap::new(),
            free: BTreeMap::new(),
            next_global_index: 1, // 0 is reserved for background
        }
    }
}

impl PickRangeAllocator {
    /// Creates an empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `count` indices for a structure, releasing any range it held before.
    ///
    /// A structure whose previous range still fits keeps its start index.
    pub fn allocate(
        &mut self,
        structure_type: &str,
        structure_name: &str,
        count: usize,
    ) -> RenderResult<usize> {
        if let Some(start) = self.start_of(structure_type, structure_name) {
            let held = self.ranges[&start].count;
            if count > 0 && count <= held {
                if let Some(range) = self.ranges.get_mut(&start) {
                    range.count = count;
                }
                self.free_block(start + count, held - count);
                return Ok(start);
            }
            self.ranges.remove(&start);
            self.free_block(start, held);
        }

        if count == 0 {
            return Ok(self.next_global_index);
        }

        let start = match self.take_free_block(count) {
            Some(start) => start,
            None => {
                let available = MAX_PICK_INDEX + 1 - self.next_global_index;
                if count > available {
                    return Err(RenderError::PickBufferExhausted {
                        requested: count,
                        available,
                    });
                }
                let start = self.next_global_index;
                self.next_global_index += count;
                start
            }
        };
        self.ranges.insert(
            start,
            PickRange {
                structure_type: structure_type.to_string(),
                structure_name: structure_name.to_string(),
                count,
            },
        );
        log::debug!("pick range [{start}, {}) -> {structure_name}", start + count);
        Ok(start)
    }

    /// Releases the range held by a structure, if any.
    pub fn release(&mut self, structure_type: &str, structure_name: &str) {
        if let Some(start) = self.start_of(structure_type, structure_name) {
            if let Some(range) = self.ranges.remove(&start) {
                self.free_block(start, range.count);
            }
        }
    }

    /// Resolves a global index into `(structure type, structure name, local index)`.
    pub fn lookup(&self, global_index: usize) -> Option<(&str, &str, usize)> {
        let (&start, range) = self.ranges.range(..=global_index).next_back()?;
        let local = global_index - start;
        (local < range.count).then(|| {
            (
                range.structure_type.as_str(),
                range.structure_name.as_str(),
                local,
            )
        })
    }

    /// Number of indices neither held nor free, i.e. still never handed out.
    pub fn unused(&self) -> usize {
        MAX_PICK_INDEX + 1 - self.next_global_index
    }

    /// Forgets all ranges and restarts numbering.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn start_of(&self, structure_type: &str, structure_name: &str) -> Option<usize> {
        self.ranges
            .iter()
            .find(|(_, r)| r.structure_type == structure_type && r.structure_name == structure_name)
            .map(|(&start, _)| start)
    }

    /// First-fit search of the free list.
    fn take_free_block(&mut self, count: usize) -> Option<usize> {
        let (start, len) = self
            .free
            .iter()
            .find(|(_, len)| **len >= count)
            .map(|(&start, &len)| (start, len))?;
        self.free.remove(&start);
        if len > count {
            self.free.insert(start + count, len - count);
        }
        Some(start)
    }

    /// Returns a block to the free list, merging it with its neighbours.
    fn free_block(&mut self, start: usize, len: usize) {
        if len == 0 {
            return;
        }
        let (mut start, mut len) = (start, len);
        if let Some(next_len) = self.free.remove(&(start + len)) {
            len += next_len;
        }
        let prev = self
            .free
            .range(..start)
            .next_back()
            .map(|(&s, &l)| (s, l));
        if let Some((prev_start, prev_len)) = prev {
            if prev_start + prev_len == start {
                self.free.remove(&prev_start);
                start = prev_start;
                len += prev_len;
            }
        }
        if start + len == self.next_global_index {
            self.next_global_index = start;
        } else {
            self.free.insert(start, len);
        }
    }
}
