use std::collections::BTreeSet;

/// Set of known peer addresses.
///
/// Addresses are normalised (surrounding whitespace and trailing `/` removed)
/// so `http://host:8000/` and `http://host:8000` count as one peer. Iteration
/// is in sorted address order, which makes consensus tie-breaks reproducible.
#[derive(Debug, Default, Clone)]
pub struct PeerRegistry {
    peers: BTreeSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent add. Returns `true` if the address was not known yet.
    pub fn register(&mut self, address: &str) -> bool {
        let address = normalize_address(address);
        if address.is_empty() {
            return false;
        }
        self.peers.insert(address)
    }

    /// Register every address except `own_address`.
    pub fn extend_excluding<I, S>(&mut self, addresses: I, own_address: &str)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let own = normalize_address(own_address);
        for address in addresses {
            if normalize_address(address.as_ref()) != own {
                self.register(address.as_ref());
            }
        }
    }

    pub fn contains(&self, address: &str) -> bool {
        self.peers.contains(&normalize_address(address))
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Snapshot of the current peer set, sorted.
    pub fn to_vec(&self) -> Vec<String> {
        self.peers.iter().cloned().collect()
    }
}

pub fn normalize_address(address: &str) -> String {
    address.trim().trim_end_matches('/').to_string()
}

/// Join a peer address and an endpoint path.
pub fn peer_url(address: &str, path: &str) -> String {
    format!(
        "{}/{}",
        normalize_address(address),
        path.trim_start_matches('/')
    )
}
