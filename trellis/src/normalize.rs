//! Schema normalization: shorthand in, canonical arena out.

use indexmap::IndexMap;
use tracing::trace;

use crate::schema::DescribeLeaf;
use crate::{Error, Schema};

/// Index of a node inside a [`Normalized`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A canonical schema node.
#[derive(Clone, Debug)]
pub enum Node<L> {
    /// Terminal transformer node.
    Leaf(L),
    /// Positional array schema.
    Seq(Vec<NodeId>),
    /// Record schema, insertion-ordered.
    Map(IndexMap<String, NodeId>),
    /// Back-reference: the node this many parent links up.
    Up(usize),
}

/// A normalized schema: an arena of [`Node`]s plus a side table of parent
/// links, so back-references can walk upward without the raw schema ever
/// being mutated.
///
/// The tree is acyclic by construction — parent links form a simple upward
/// chain, and depth is bounded by the raw schema's nesting.
#[derive(Clone, Debug)]
pub struct Normalized<L> {
    nodes: Vec<Node<L>>,
    parent: Vec<Option<NodeId>>,
    root: Option<NodeId>,
}

impl<L: Clone> Normalized<L> {
    /// Normalize a raw schema.
    ///
    /// Composites whose children all normalize to nothing are dropped;
    /// a schema that drops entirely keeps an empty root, which surfaces as
    /// a mismatch on the first walk. `Ref` shorthand must be `^` followed
    /// by digits.
    pub fn from_schema(schema: &Schema<L>) -> Result<Normalized<L>, Error> {
        let mut normalized = Normalized {
            nodes: Vec::new(),
            parent: Vec::new(),
            root: None,
        };
        normalized.root = normalized.add(schema, None)?;
        trace!(
            nodes = normalized.nodes.len(),
            empty = normalized.root.is_none(),
            "normalized schema"
        );
        Ok(normalized)
    }

    fn push(&mut self, node: Node<L>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.parent.push(parent);
        id
    }

    /// Returns `None` for composites that normalize to nothing; dropped
    /// children stay in the arena as unreachable orphans.
    fn add(&mut self, schema: &Schema<L>, parent: Option<NodeId>) -> Result<Option<NodeId>, Error> {
        match schema {
            Schema::Leaf(leaf) => Ok(Some(self.push(Node::Leaf(leaf.clone()), parent))),
            Schema::Up(steps) => Ok(Some(self.push(Node::Up(*steps), parent))),
            Schema::Ref(shorthand) => {
                let steps = parse_backref(shorthand)?;
                Ok(Some(self.push(Node::Up(steps), parent)))
            }
            Schema::Seq(items) => {
                let id = self.push(Node::Seq(Vec::new()), parent);
                let mut children = Vec::new();
                for item in items {
                    if let Some(child) = self.add(item, Some(id))? {
                        children.push(child);
                    }
                }
                if children.is_empty() {
                    return Ok(None);
                }
                self.nodes[id.0] = Node::Seq(children);
                Ok(Some(id))
            }
            Schema::Map(fields) => {
                let id = self.push(Node::Map(IndexMap::new()), parent);
                let mut children = IndexMap::new();
                for (key, value) in fields {
                    if let Some(child) = self.add(value, Some(id))? {
                        children.insert(key.clone(), child);
                    }
                }
                if children.is_empty() {
                    return Ok(None);
                }
                self.nodes[id.0] = Node::Map(children);
                Ok(Some(id))
            }
        }
    }

    /// Rebuild shorthand from the arena. `None` for an empty schema.
    /// Normalizing the result again yields an equivalent arena.
    pub fn to_schema(&self) -> Option<Schema<L>> {
        self.root.map(|id| self.rebuild(id))
    }

    fn rebuild(&self, id: NodeId) -> Schema<L> {
        match self.node(id) {
            Node::Leaf(leaf) => Schema::Leaf(leaf.clone()),
            Node::Up(steps) => Schema::Up(*steps),
            Node::Seq(children) => {
                Schema::Seq(children.iter().map(|child| self.rebuild(*child)).collect())
            }
            Node::Map(fields) => Schema::Map(
                fields
                    .iter()
                    .map(|(key, child)| (key.clone(), self.rebuild(*child)))
                    .collect(),
            ),
        }
    }
}

impl<L> Normalized<L> {
    /// The root node, if the schema did not normalize to nothing.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// The node behind an id.
    pub fn node(&self, id: NodeId) -> &Node<L> {
        &self.nodes[id.0]
    }

    /// The structural parent of a node, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent[id.0]
    }

    /// Walk `steps` parent links up from `from`; step 0 is `from` itself.
    /// Yields `None` when the walk runs past the root.
    pub fn up(&self, from: NodeId, steps: usize) -> Option<NodeId> {
        let mut current = from;
        for _ in 0..steps {
            current = self.parent(current)?;
        }
        Some(current)
    }

    /// Like [`Normalized::up`], but an exhausted walk is the
    /// wrong-back-reference error. Callers must treat an unresolved
    /// back-reference as a schema error, never skip it silently.
    pub fn resolve_up(&self, from: NodeId, steps: usize) -> Result<NodeId, Error> {
        self.up(from, steps).ok_or(Error::WrongUpRef { steps })
    }
}

impl<L: DescribeLeaf> Normalized<L> {
    /// Printable rendering of a subtree, used by mismatch errors.
    pub fn render(&self, id: NodeId) -> String {
        match self.node(id) {
            Node::Leaf(leaf) => leaf.describe(),
            Node::Up(steps) => format!("^{steps}"),
            Node::Seq(children) => {
                let inner: Vec<String> = children.iter().map(|c| self.render(*c)).collect();
                format!("[{}]", inner.join(", "))
            }
            Node::Map(fields) => {
                let inner: Vec<String> = fields
                    .iter()
                    .map(|(key, child)| format!("{key}: {}", self.render(*child)))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
        }
    }
}

fn parse_backref(shorthand: &str) -> Result<usize, Error> {
    let digits = shorthand
        .strip_prefix('^')
        .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| Error::UnknownSchema(shorthand.to_string()))?;
    digits
        .parse()
        .map_err(|_| Error::UnknownSchema(shorthand.to_string()))
}

/// What a [`SchemaBuilder`] slot receives: a leaf, or an empty composite
/// that becomes the new cursor position.
#[derive(Clone, Debug)]
pub enum Slot<L> {
    /// A terminal transformer.
    Leaf(L),
    /// An empty sequence to descend into.
    EmptySeq,
    /// An empty record to descend into.
    EmptyMap,
}

/// Imperative schema authoring over the same canonical arena.
///
/// The builder keeps a cursor: adding an empty composite moves the cursor
/// into it, [`SchemaBuilder::ascend`] moves it back up. Useful when a schema
/// is assembled from configuration rather than written as a literal.
#[derive(Clone, Debug)]
pub struct SchemaBuilder<L> {
    nodes: Vec<Node<L>>,
    parent: Vec<Option<NodeId>>,
    root: Option<NodeId>,
    current: Option<NodeId>,
}

impl<L: Clone> Default for SchemaBuilder<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Clone> SchemaBuilder<L> {
    /// An empty builder.
    pub fn new() -> SchemaBuilder<L> {
        SchemaBuilder {
            nodes: Vec::new(),
            parent: Vec::new(),
            root: None,
            current: None,
        }
    }

    fn push(&mut self, node: Node<L>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.parent.push(parent);
        id
    }

    fn materialize(&mut self, slot: Slot<L>, parent: Option<NodeId>) -> (NodeId, bool) {
        match slot {
            Slot::Leaf(leaf) => (self.push(Node::Leaf(leaf), parent), false),
            Slot::EmptySeq => (self.push(Node::Seq(Vec::new()), parent), true),
            Slot::EmptyMap => (self.push(Node::Map(IndexMap::new()), parent), true),
        }
    }

    /// Set the root. Fails with [`Error::SchemaFinalized`] when a root
    /// already exists.
    pub fn set_root(&mut self, slot: Slot<L>) -> Result<(), Error> {
        if self.root.is_some() {
            return Err(Error::SchemaFinalized);
        }
        // The cursor lands on the root either way; a leaf root makes any
        // later edit fail with SchemaFinalized.
        let (id, _) = self.materialize(slot, None);
        self.root = Some(id);
        self.current = Some(id);
        Ok(())
    }

    /// Add a field to the record under the cursor.
    pub fn add_field(&mut self, key: impl Into<String>, slot: Slot<L>) -> Result<(), Error> {
        let key = key.into();
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        let current = self.current.ok_or(Error::SchemaNotInited)?;
        let (id, descend) = match &self.nodes[current.0] {
            Node::Leaf(_) => return Err(Error::SchemaFinalized),
            Node::Seq(_) | Node::Up(_) => return Err(Error::CurrentNotRecord),
            Node::Map(fields) => {
                if fields.contains_key(&key) {
                    return Err(Error::DuplicateKey(key));
                }
                self.materialize(slot, Some(current))
            }
        };
        if let Node::Map(fields) = &mut self.nodes[current.0] {
            fields.insert(key, id);
        }
        if descend {
            self.current = Some(id);
        }
        Ok(())
    }

    /// Append an element to the sequence under the cursor.
    pub fn push_element(&mut self, slot: Slot<L>) -> Result<(), Error> {
        let current = self.current.ok_or(Error::SchemaNotInited)?;
        let (id, descend) = match &self.nodes[current.0] {
            Node::Leaf(_) => return Err(Error::SchemaFinalized),
            Node::Map(_) | Node::Up(_) => return Err(Error::CurrentNotSeq),
            Node::Seq(_) => self.materialize(slot, Some(current)),
        };
        if let Node::Seq(children) = &mut self.nodes[current.0] {
            children.push(id);
        }
        if descend {
            self.current = Some(id);
        }
        Ok(())
    }

    /// Move the cursor `steps` parent links up.
    pub fn ascend(&mut self, steps: usize) -> Result<(), Error> {
        let mut current = self.current.ok_or(Error::SchemaNotInited)?;
        for _ in 0..steps {
            current = self.parent[current.0].ok_or(Error::WrongUpRef { steps })?;
        }
        self.current = Some(current);
        Ok(())
    }

    /// Finish building. Fails when no root was ever set.
    pub fn finish(self) -> Result<Normalized<L>, Error> {
        if self.root.is_none() {
            return Err(Error::SchemaNotInited);
        }
        Ok(Normalized {
            nodes: self.nodes,
            parent: self.parent,
            root: self.root,
        })
    }
}
