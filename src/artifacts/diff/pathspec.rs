use std::collections::HashMap;

/// Restricts which deltas are rendered
///
/// A path matches when one of the pathspecs names it or one of its parent
/// directories, component by component. No pathspec matches everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pathspec {
    path_trie: Trie,
}

impl Default for Pathspec {
    fn default() -> Self {
        Pathspec {
            path_trie: Trie::with_matching(true),
        }
    }
}

impl Pathspec {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let mut paths = paths.into_iter().peekable();
        if paths.peek().is_none() {
            return Self::default();
        }

        let mut trie = Trie::default();
        for path in paths {
            trie.insert(components(path.as_ref()));
        }

        Pathspec { path_trie: trie }
    }

    pub fn matches_all(&self) -> bool {
        self.path_trie.is_matching
    }

    pub fn matches(&self, path: &str) -> bool {
        self.path_trie.contains_prefix_of(components(path))
    }
}

fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split('/')
        .filter(|component| !component.is_empty() && *component != ".")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Trie {
    is_matching: bool,
    children: HashMap<String, Trie>,
}

impl Trie {
    fn with_matching(is_matching: bool) -> Self {
        Trie {
            is_matching,
            children: HashMap::new(),
        }
    }

    fn insert<'p>(&mut self, path: impl Iterator<Item = &'p str>) {
        let mut node = self;
        for part in path {
            node = node.children.entry(part.to_string()).or_default();
        }
        node.is_matching = true;
    }

    /// True when some inserted path is a component-wise prefix of `path`
    fn contains_prefix_of<'p>(&self, path: impl Iterator<Item = &'p str>) -> bool {
        let mut node = self;
        for part in path {
            if node.is_matching {
                return true;
            }
            match node.children.get(part) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.is_matching
    }
}
