use compact_str::CompactString;
use ferrous_lookup_domain::config::network::validate_hostname_pattern;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use std::collections::HashMap;

#[derive(Default)]
struct TrieNode {
    children: HashMap<CompactString, TrieNode, FxBuildHasher>,
    exact: Option<CompactString>,
    wildcard: Option<CompactString>,
}

impl TrieNode {
    fn new() -> Self {
        Self {
            children: HashMap::with_hasher(FxBuildHasher),
            exact: None,
            wildcard: None,
        }
    }
}

/// Blocked hostname patterns keyed by reversed labels.
///
/// `blocked.com` matches that name only; `*.blocked.com` matches any strictly
/// deeper name (`a.blocked.com`, `a.b.blocked.com`) but not `blocked.com`.
#[derive(Default)]
pub struct HostnameTrie {
    root: TrieNode,
    len: usize,
}

impl HostnameTrie {
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(),
            len: 0,
        }
    }

    pub fn from_patterns<I, S>(patterns: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::new();
        for pattern in patterns {
            trie.insert(pattern.as_ref())?;
        }
        Ok(trie)
    }

    pub fn insert(&mut self, pattern: &str) -> Result<(), String> {
        validate_hostname_pattern(pattern)?;

        let (domain, wildcard) = match pattern.strip_prefix("*.") {
            Some(rest) => (rest, true),
            None => (pattern, false),
        };
        let domain = normalize(domain);

        let mut node = &mut self.root;
        for label in domain.split('.').rev() {
            node = node.children.entry(CompactString::new(label)).or_default();
        }

        let slot = if wildcard {
            &mut node.wildcard
        } else {
            &mut node.exact
        };
        if slot.is_none() {
            self.len += 1;
        }
        *slot = Some(CompactString::new(pattern));
        Ok(())
    }

    /// The pattern blocking `hostname`, if any.
    pub fn find(&self, hostname: &str) -> Option<&str> {
        let hostname = normalize(hostname);
        if hostname.is_empty() {
            return None;
        }

        let labels: SmallVec<[&str; 8]> = hostname.split('.').rev().collect();
        let n = labels.len();
        let mut node = &self.root;

        for (i, label) in labels.iter().enumerate() {
            match node.children.get(*label) {
                Some(child) => {
                    if i + 1 < n {
                        if let Some(pattern) = &child.wildcard {
                            return Some(pattern.as_str());
                        }
                    } else if let Some(pattern) = &child.exact {
                        return Some(pattern.as_str());
                    }
                    node = child;
                }
                None => break,
            }
        }

        None
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn normalize(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_ascii_lowercase()
}
