#![allow(dead_code)]

use rand_core::RngCore;

/// Random bits that map to `height` under promotion probability `p`.
pub fn bits_for_height(p: f64, height: usize) -> u64 {
    if height == 0 {
        return 0;
    }
    let u = 1.0 - p.powf(height as f64 - 0.5);
    ((u * (1u64 << 53) as f64) as u64) << 11
}

/// Replays scripted heights, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct HeightScript {
    samples: Vec<u64>,
    pos: usize,
}

impl HeightScript {
    pub fn new(p: f64, heights: &[usize]) -> Self {
        assert!(!heights.is_empty());
        Self {
            samples: heights.iter().map(|&h| bits_for_height(p, h)).collect(),
            pos: 0,
        }
    }
}

impl RngCore for HeightScript {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let sample = self.samples[self.pos];
        self.pos = (self.pos + 1) % self.samples.len();
        sample
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
