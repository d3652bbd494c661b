mod html;

use std::path::{Path, PathBuf};

/// Errors raised while loading a deck document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Root,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    children: Vec<NodeId>,
}

/// An arena-backed element tree, the view the presentation controller
/// reads slides and fragments from and toggles visual markers on.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    focused: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document containing only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                children: Vec::new(),
            }],
            focused: None,
        }
    }

    /// Parse an HTML deck. Malformed markup is recovered from, never
    /// rejected.
    pub fn parse_html(source: &str) -> Self {
        html::parse(source)
    }

    /// Read and parse an HTML deck from disk.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let source = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = Self::parse_html(&source);
        log::debug!(
            "loaded {} ({} nodes)",
            path.display(),
            document.nodes.len()
        );
        Ok(document)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append an element under `parent`. A `class` attribute is split into
    /// the element's class list.
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let attrs = attrs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self.push_element(parent, tag.to_ascii_lowercase(), attrs)
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push_node(parent, NodeKind::Text(text.to_string()))
    }

    fn push_element(&mut self, parent: NodeId, tag: String, attrs: Vec<(String, String)>) -> NodeId {
        let mut classes: Vec<String> = Vec::new();
        let mut plain: Vec<(String, String)> = Vec::with_capacity(attrs.len());
        for (name, value) in attrs {
            if name == "class" {
                for class in value.split_whitespace() {
                    if !classes.iter().any(|c| c == class) {
                        classes.push(class.to_string());
                    }
                }
            } else if !plain.iter().any(|(n, _)| *n == name) {
                // First occurrence of a duplicated attribute wins.
                plain.push((name, value));
            }
        }
        self.push_node(
            parent,
            NodeKind::Element(Element {
                tag,
                attrs: plain,
                classes,
            }),
        )
    }

    fn push_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        self.element(node).map_or(&[], |e| e.classes.as_slice())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    /// Add `class` when `force` is true, remove it otherwise. Returns whether
    /// the class list changed.
    pub fn toggle_class(&mut self, node: NodeId, class: &str, force: bool) -> bool {
        let Some(element) = self.element_mut(node) else {
            return false;
        };
        let position = element.classes.iter().position(|c| c == class);
        match (force, position) {
            (true, None) => {
                element.classes.push(class.to_string());
                true
            }
            (false, Some(index)) => {
                element.classes.remove(index);
                true
            }
            _ => false,
        }
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node.0).map_or(&[], |n| n.children.as_slice())
    }

    /// All nodes below `node` in document order, `node` itself excluded.
    pub fn descendants(&self, node: NodeId) -> Descendants<'_> {
        let stack = self.children(node).iter().rev().copied().collect();
        Descendants {
            document: self,
            stack,
        }
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .find(|&node| self.attr(node, "id") == Some(id))
    }

    pub fn descendants_with_class(&self, node: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(node)
            .filter(|&n| self.has_class(n, class))
            .collect()
    }

    pub fn descendants_with_attr(&self, node: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(node)
            .filter(|&n| self.attr(n, name).is_some())
            .collect()
    }

    /// Concatenated text below `node` with runs of whitespace collapsed.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut raw = String::new();
        if let NodeKind::Text(text) = &self.nodes[node.0].kind {
            raw.push_str(text);
        }
        for n in self.descendants(node) {
            if let NodeKind::Text(text) = &self.nodes[n.0].kind {
                raw.push(' ');
                raw.push_str(text);
            }
        }
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    pub fn focus(&mut self, node: NodeId) {
        self.focused = Some(node);
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }
}

/// Pre-order iterator returned by [`Document::descendants`].
pub struct Descendants<'a> {
    document: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        self.stack
            .extend(self.document.children(node).iter().rev().copied());
        Some(node)
    }
}
