use crc32fast::Hasher;

use crate::node::NodeId;

/// Generate a document seed from a name (file path, root id) using CRC32
pub fn document_seed(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for nodes created while editing a document
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(name: &str) -> Self {
        Self::from_seed(document_seed(name))
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn next_id(&mut self) -> NodeId {
        self.count += 1;
        NodeId::new(format!("{}-{}", self.seed, self.count))
    }

    /// Generate the next ID for which `taken` returns false
    ///
    /// Loaded documents may already contain ids from an earlier session with
    /// the same seed.
    pub fn next_unused(&mut self, taken: impl Fn(&NodeId) -> bool) -> NodeId {
        loop {
            let id = self.next_id();
            if !taken(&id) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
