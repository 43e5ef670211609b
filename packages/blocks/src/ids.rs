//! Block identifier generation
//!
//! Live editing uses random UUID v4 ids. Tests and tooling that need
//! reproducible output use [`SequentialIds`], which numbers ids under a seed.

use uuid::Uuid;

/// Source of fresh block ids
pub trait IdGenerator: Send {
    fn new_id(&mut self) -> String;
}

/// Random UUID v4 ids
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Sequential ids of the form `{seed}-{n}`
#[derive(Debug, Clone)]
pub struct SequentialIds {
    seed: String,
    count: u32,
}

impl SequentialIds {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl IdGenerator for SequentialIds {
    fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut gen = SequentialIds::new("blk");

        let id1 = gen.new_id();
        let id2 = gen.new_id();
        let id3 = gen.new_id();

        assert_eq!(id1, "blk-1");
        assert_eq!(id2, "blk-2");
        assert_eq!(id3, "blk-3");
        assert!(id1.starts_with(gen.seed()));
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        let mut gen = UuidGenerator;
        let a = gen.new_id();
        let b = gen.new_id();

        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }
}
