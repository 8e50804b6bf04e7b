use crate::{BlockKey, EntityKey};
use crc32fast::Hasher;

/// Derive a stable editor key from a session name using CRC32
///
/// The key is embedded in markup written on copy, which is how a paste can
/// recognise content that originated in the same editor session.
pub fn get_editor_key(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential key generator for blocks and entities within one session
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    seed: String,
    count: u32,
}

impl KeyGenerator {
    pub fn new(name: &str) -> Self {
        Self {
            seed: get_editor_key(name),
            count: 0,
        }
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate the next block key
    pub fn next_block_key(&mut self) -> BlockKey {
        self.count += 1;
        BlockKey::new(format!("{}-{}", self.seed, self.count))
    }

    /// Generate the next entity key
    pub fn next_entity_key(&mut self) -> EntityKey {
        self.count += 1;
        EntityKey::new(format!("{}-e{}", self.seed, self.count))
    }

    /// Never hand out `key` (or anything before it) if this generator could produce it
    pub fn reserve(&mut self, key: &str) {
        let Some(rest) = key
            .strip_prefix(self.seed.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
        else {
            return;
        };
        let digits = rest.strip_prefix('e').unwrap_or(rest);
        if let Ok(count) = digits.parse::<u32>() {
            self.count = self.count.max(count);
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
