//! Deterministic outcome stream.
//!
//! All randomness is a pure function of (server seed secret, client seed,
//! nonce). Bytes come from repeated HMAC-SHA256 keyed by the secret over
//! the message `"{client_seed}:{nonce}:{cursor}"`, with the cursor
//! incrementing each time a 32-byte block is exhausted. Every game draws
//! floats from this stream in a fixed, documented order, so replaying the
//! derivation from a disclosed seed reproduces the round bit-for-bit.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// SHA-256 of a seed string, hex-encoded. This is the commitment shown to
/// the player before play.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Byte stream for one round's derivation.
///
/// Each float consumes exactly 4 bytes (big-endian u32 / 2^32), so a game
/// that documents "n floats" consumes a fixed byte count regardless of the
/// values drawn.
pub struct OutcomeStream {
    secret: Vec<u8>,
    message_prefix: String,
    cursor: u32,
    block: [u8; 32],
    offset: usize,
}

impl OutcomeStream {
    pub fn new(server_seed: &str, client_seed: &str, nonce: u64) -> Self {
        Self {
            secret: server_seed.as_bytes().to_vec(),
            message_prefix: format!("{}:{}", client_seed, nonce),
            cursor: 0,
            block: [0u8; 32],
            // Force a refill on the first draw
            offset: 32,
        }
    }

    /// HMAC block for a given cursor, without consuming stream state.
    /// The cursor-0 block is what verification reports as `hmac`.
    pub fn block_hex(server_seed: &str, client_seed: &str, nonce: u64, cursor: u32) -> String {
        hex::encode(Self::compute_block(
            server_seed.as_bytes(),
            &format!("{}:{}", client_seed, nonce),
            cursor,
        ))
    }

    fn compute_block(secret: &[u8], message_prefix: &str, cursor: u32) -> [u8; 32] {
        let mut mac =
            HmacSha256::new_from_slice(secret).expect("HMAC-SHA256 accepts keys of any length");
        mac.update(format!("{}:{}", message_prefix, cursor).as_bytes());
        let mut block = [0u8; 32];
        block.copy_from_slice(&mac.finalize().into_bytes());
        block
    }

    fn next_u32(&mut self) -> u32 {
        if self.offset + 4 > self.block.len() {
            self.block = Self::compute_block(&self.secret, &self.message_prefix, self.cursor);
            self.cursor += 1;
            self.offset = 0;
        }
        let chunk = [
            self.block[self.offset],
            self.block[self.offset + 1],
            self.block[self.offset + 2],
            self.block[self.offset + 3],
        ];
        self.offset += 4;
        u32::from_be_bytes(chunk)
    }

    /// Uniform float in [0, 1). The unit of randomness consumed by every
    /// game transform.
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }

    /// Uniform integer in [0, max). `max` must be non-zero.
    pub fn next_below(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0);
        (self.next_f64() * max as f64) as u32
    }

    /// Draw `count` distinct values from 0..pool via a partial Fisher-Yates
    /// shuffle, consuming exactly `count` floats.
    pub fn draw_distinct(&mut self, pool: u32, count: usize) -> Vec<u32> {
        let mut cells: Vec<u32> = (0..pool).collect();
        let count = count.min(cells.len());
        for i in 0..count {
            let j = i + self.next_below(pool - i as u32) as usize;
            cells.swap(i, j);
        }
        cells.truncate(count);
        cells
    }

    /// Full Fisher-Yates shuffle of a 52-card deck, consuming 51 floats.
    /// Cards are 0-51: suit = card / 13, rank = card % 13 (0 = ace).
    pub fn shuffled_deck(&mut self) -> Vec<u8> {
        let mut deck: Vec<u8> = (0..52).collect();
        for i in (1..deck.len()).rev() {
            let j = self.next_below((i + 1) as u32) as usize;
            deck.swap(i, j);
        }
        deck
    }
}
