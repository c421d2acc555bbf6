//! The traversal engine: walks input value and normalized schema in
//! lockstep, dispatching to a strategy at every leaf.

use tracing::trace;
use trellis_value::Value;

use crate::normalize::{Node, NodeId, Normalized};
use crate::schema::DescribeLeaf;
use crate::{Error, KeyPath, KeyStep};

/// Options shared by every walk.
#[derive(Clone, Copy, Debug)]
pub struct WalkOptions {
    /// Fail with [`Error::CircularInput`] when a composite input value is
    /// reached a second time within one run. When off, the previously
    /// registered (possibly still in-progress) shared result is reused.
    pub no_circular: bool,
    /// Walk the input's shape first: schema fields absent from the input
    /// are skipped entirely instead of being handed to the leaf as absent.
    pub input_first: bool,
    /// Keep absent-valued results produced by the array-overflow heuristic
    /// instead of suppressing the write.
    pub keep_absent: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        WalkOptions {
            no_circular: true,
            input_first: false,
            keep_absent: false,
        }
    }
}

/// The result-tree representation a strategy produces.
///
/// Both output shapes — transformed [`Value`]s and validation reports —
/// expose shared, mutable composites so the engine can register a
/// placeholder *before* descending and let cyclic input resolve to it.
pub trait Tree: Clone {
    /// A fresh shared sequence.
    fn new_seq() -> Self;
    /// A fresh shared map.
    fn new_map() -> Self;
    /// The designated "absent" element, also used to pad sequence holes.
    fn absent() -> Self;
    /// Whether this is the absent element.
    fn is_absent(&self) -> bool;
    /// Write at an index, padding any gap with absent elements.
    fn seq_write(&self, index: usize, value: Self);
    /// Append after whatever has accumulated so far.
    fn seq_append(&self, value: Self);
    /// Write under a key.
    fn map_write(&self, key: &str, value: Self);
}

impl Tree for Value {
    fn new_seq() -> Self {
        Value::new_array()
    }

    fn new_map() -> Self {
        Value::new_object()
    }

    fn absent() -> Self {
        Value::Absent
    }

    fn is_absent(&self) -> bool {
        Value::is_absent(self)
    }

    fn seq_write(&self, index: usize, value: Self) {
        if let Value::Array(elements) = self {
            let mut elements = elements.borrow_mut();
            while elements.len() <= index {
                elements.push(Value::Absent);
            }
            elements[index] = value;
        }
    }

    fn seq_append(&self, value: Self) {
        self.push(value);
    }

    fn map_write(&self, key: &str, value: Self) {
        self.set(key, value);
    }
}

/// One walk step's result: the produced subtree plus whether the walk
/// should stop here. Early-break is a deliberate short-circuit, not an
/// error, so it travels in the return value rather than as an `Err`.
#[derive(Clone, Debug)]
pub struct Outcome<T> {
    /// Stop walking siblings and ancestors' remaining children.
    pub should_break: bool,
    /// The produced subtree (possibly partial when breaking).
    pub value: T,
}

impl<T> Outcome<T> {
    /// Keep walking.
    pub fn advance(value: T) -> Outcome<T> {
        Outcome {
            should_break: false,
            value,
        }
    }

    /// Stop the run, keeping what has been gathered so far.
    pub fn halt(value: T) -> Outcome<T> {
        Outcome {
            should_break: true,
            value,
        }
    }
}

/// What a concrete front-end supplies to the engine: how to handle a leaf,
/// and (rarely overridden) whether a schema node plausibly applies to an
/// input value.
pub trait Strategy {
    /// The leaf payload carried by the schema.
    type Leaf: DescribeLeaf;
    /// The result tree this strategy produces.
    type Output: Tree;

    /// Handle a schema leaf reached at `key_path` with `input`.
    fn handle_leaf(
        &mut self,
        input: &Value,
        leaf: &Self::Leaf,
        key_path: &KeyPath,
        root_input: &Value,
    ) -> Result<Outcome<Self::Output>, Error>;

    /// Whether `node` plausibly applies to `input`. Used only to decide if a
    /// resolved back-reference should redirect the walk, and whether the
    /// array-overflow heuristic may reuse the last schema node — a rejection
    /// skips quietly instead of raising a mismatch.
    fn node_matches(&self, input: &Value, node: &Node<Self::Leaf>) -> bool {
        match node {
            Node::Leaf(_) => !input.is_absent(),
            Node::Seq(_) => input.is_array(),
            Node::Map(_) => input.is_object(),
            Node::Up(_) => false,
        }
    }
}

enum SeqSchema {
    /// A leaf applied to every element (array-of-leaf shorthand).
    Single(NodeId),
    /// A positional schema, possibly shorter than the input.
    Positional(Vec<NodeId>),
}

/// The engine. One `Walker` owns the per-run state — key path and
/// visited-input record — and borrows the normalized schema read-only.
pub struct Walker<'s, S: Strategy> {
    schema: &'s Normalized<S::Leaf>,
    strategy: S,
    options: WalkOptions,
    key_path: KeyPath,
    /// Composite input values already entered this run, paired with their
    /// (shared, possibly in-progress) results. Matched by identity, never by
    /// content: two equal-valued subtrees stay distinct.
    handled: Vec<(Value, S::Output)>,
    root_input: Value,
}

impl<'s, S: Strategy> Walker<'s, S> {
    /// A walker over `schema` driving `strategy`.
    pub fn new(schema: &'s Normalized<S::Leaf>, strategy: S, options: WalkOptions) -> Self {
        Walker {
            schema,
            strategy,
            options,
            key_path: KeyPath::new(),
            handled: Vec::new(),
            root_input: Value::Absent,
        }
    }

    /// Walk `input` against the schema root and produce the result tree.
    pub fn run(&mut self, input: &Value) -> Result<S::Output, Error> {
        self.key_path.clear();
        self.handled.clear();
        self.root_input = input.clone();
        let Some(root) = self.schema.root() else {
            return Err(Error::SchemaNotMatch {
                value: input.to_string(),
                schema: "<empty>".to_string(),
            });
        };
        let outcome = self.walk(input, root)?;
        Ok(outcome.value)
    }

    /// Consume the walker, yielding the strategy.
    pub fn into_strategy(self) -> S {
        self.strategy
    }

    fn find_handled(&self, input: &Value) -> Option<S::Output> {
        self.handled
            .iter()
            .find(|(seen, _)| seen.same_identity(input))
            .map(|(_, result)| result.clone())
    }

    fn mismatch(&self, input: &Value, node: NodeId) -> Error {
        Error::SchemaNotMatch {
            value: input.to_string(),
            schema: self.schema.render(node),
        }
    }

    fn walk(&mut self, input: &Value, node: NodeId) -> Result<Outcome<S::Output>, Error> {
        let schema = self.schema;
        if input.is_composite() {
            if let Some(previous) = self.find_handled(input) {
                if self.options.no_circular {
                    return Err(Error::CircularInput);
                }
                trace!(path = %self.key_path, "reusing result for repeated input");
                return Ok(Outcome::advance(previous));
            }
        }

        match schema.node(node) {
            Node::Leaf(leaf) => {
                if let Value::Array(elements) = input {
                    // Array-of-leaf shorthand: the leaf runs per element.
                    let out = S::Output::new_seq();
                    self.handled.push((input.clone(), out.clone()));
                    let elements = elements.borrow().clone();
                    self.walk_seq(&elements, SeqSchema::Single(node), &out)
                } else {
                    self.strategy
                        .handle_leaf(input, leaf, &self.key_path, &self.root_input)
                }
            }
            Node::Seq(children) => {
                if let Value::Array(elements) = input {
                    let out = S::Output::new_seq();
                    self.handled.push((input.clone(), out.clone()));
                    let children = children.clone();
                    let elements = elements.borrow().clone();
                    self.walk_seq(&elements, SeqSchema::Positional(children), &out)
                } else {
                    Err(self.mismatch(input, node))
                }
            }
            Node::Up(steps) => {
                let target = schema.resolve_up(node, *steps)?;
                if self.strategy.node_matches(input, schema.node(target)) {
                    trace!(path = %self.key_path, steps, "following back-reference");
                    self.walk(input, target)
                } else {
                    // The ancestor clearly cannot apply; the unresolved node
                    // itself is no record either, so this is a mismatch.
                    Err(self.mismatch(input, node))
                }
            }
            Node::Map(fields) => {
                if let Value::Object(_) = input {
                    let out = S::Output::new_map();
                    self.handled.push((input.clone(), out.clone()));
                    let fields: Vec<(String, NodeId)> = fields
                        .iter()
                        .map(|(key, child)| (key.clone(), *child))
                        .collect();
                    self.walk_map(input, &fields, &out)
                } else {
                    Err(self.mismatch(input, node))
                }
            }
        }
    }

    fn walk_element(
        &mut self,
        element: &Value,
        index: usize,
        node: NodeId,
    ) -> Result<Outcome<S::Output>, Error> {
        self.key_path.push(KeyStep::Index(index));
        let result = self.walk(element, node);
        self.key_path.pop();
        result
    }

    fn walk_seq(
        &mut self,
        elements: &[Value],
        schema: SeqSchema,
        out: &S::Output,
    ) -> Result<Outcome<S::Output>, Error> {
        match schema {
            SeqSchema::Single(leaf) => {
                for (index, element) in elements.iter().enumerate() {
                    let ret = self.walk_element(element, index, leaf)?;
                    if ret.should_break {
                        out.seq_append(ret.value);
                        return Ok(Outcome::halt(out.clone()));
                    }
                    out.seq_write(index, ret.value);
                }
                Ok(Outcome::advance(out.clone()))
            }
            SeqSchema::Positional(nodes) => {
                let mut last: Option<NodeId> = None;
                for (index, element) in elements.iter().enumerate() {
                    if let Some(node) = nodes.get(index).copied() {
                        let ret = self.walk_element(element, index, node)?;
                        if ret.should_break {
                            out.seq_append(ret.value);
                            return Ok(Outcome::halt(out.clone()));
                        }
                        out.seq_write(index, ret.value);
                        last = Some(node);
                    } else if let Some(node) = last {
                        // Schema shorter than the input: reuse the last node
                        // as far as it plausibly applies; skip, don't fail.
                        if !self.strategy.node_matches(element, self.schema.node(node)) {
                            continue;
                        }
                        let ret = self.walk_element(element, index, node)?;
                        if ret.should_break {
                            out.seq_append(ret.value);
                            return Ok(Outcome::halt(out.clone()));
                        }
                        if self.options.keep_absent || !ret.value.is_absent() {
                            out.seq_write(index, ret.value);
                        }
                    }
                }
                Ok(Outcome::advance(out.clone()))
            }
        }
    }

    fn walk_map(
        &mut self,
        input: &Value,
        fields: &[(String, NodeId)],
        out: &S::Output,
    ) -> Result<Outcome<S::Output>, Error> {
        for (field, node) in fields {
            if self.options.input_first && !input.has(field) {
                continue;
            }
            let element = input.get(field);
            self.key_path.push(KeyStep::field(field.clone()));
            let result = self.walk(&element, *node);
            self.key_path.pop();
            let ret = result?;
            out.map_write(field, ret.value);
            if ret.should_break {
                return Ok(Outcome::halt(out.clone()));
            }
        }
        Ok(Outcome::advance(out.clone()))
    }
}
