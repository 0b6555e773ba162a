//! Circular store for the time-aligned dry signal.

/// Circular buffer holding the gained input so a dry sample can be mixed
/// against the wet output of the same block.
///
/// The tap used by the render step trails the write cursor by
/// `max_block_size + frames` samples, so capacity must cover two full
/// maximum-size blocks as well as the crossfade length.
#[derive(Debug, Clone)]
pub struct DryDelayBuffer {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DryDelayBuffer {
    /// Capacity needed for a given crossfade length and maximum block size.
    pub fn required_len(fade_time_samples: usize, max_block_size: usize) -> usize {
        (fade_time_samples + max_block_size).max(2 * max_block_size).max(1)
    }

    pub fn new(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len.max(1)],
            write_pos: 0,
        }
    }

    pub fn for_block(fade_time_samples: usize, max_block_size: usize) -> Self {
        Self::new(Self::required_len(fade_time_samples, max_block_size))
    }

    /// Store `sample` at the write cursor and advance with wraparound.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos == self.buffer.len() {
            self.write_pos = 0;
        }
    }

    /// Write a whole slice.
    #[inline]
    pub fn write_slice(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.write(sample);
        }
    }

    /// Read the sample written `offset` writes ago.
    ///
    /// `offset == 1` is the most recent write. Offsets larger than the
    /// buffer length wrap.
    #[inline]
    pub fn read_at(&self, offset: usize) -> f32 {
        let len = self.buffer.len();
        debug_assert!(offset <= len, "offset {} exceeds delay length {}", offset, len);
        let offset = offset % len;
        let index = if self.write_pos >= offset {
            self.write_pos - offset
        } else {
            len + self.write_pos - offset
        };
        self.buffer[index]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline]
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Resize to `new_len` and clear. Allocates when growing, so call it
    /// from a non-real-time context.
    pub fn set_len(&mut self, new_len: usize) {
        let new_len = new_len.max(1);
        if new_len != self.buffer.len() {
            self.buffer.resize(new_len, 0.0);
        }
        self.clear();
    }

    /// Zero the contents and reset the cursor.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
