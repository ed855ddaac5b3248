use std::collections::HashMap;

/// Handle to an element in a [`Document`]. Stays valid after removal;
/// operations on a removed element are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A single element in the tree: tag, optional id, classes, attributes,
/// a form value and display text, and child links.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    classes: Vec<String>,
    attributes: HashMap<String, String>,
    pub value: String,
    pub text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            attributes: HashMap::new(),
            value: String::new(),
            text: String::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|v| v.as_str())
    }
}

/// In-memory stand-in for the rendered page. Holds the element tree, the
/// cookie string, and the scroll target. Everything the rest of the crate
/// needs from the page goes through the narrow operations here: lookup by
/// id, element creation, class toggling, attribute access.
///
/// Removed elements leave a tombstone slot behind so stale handles (for
/// example a dismiss timer firing after manual dismissal) degrade to
/// no-ops instead of panicking or resurrecting a neighbour.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Option<Element>>,
    body: NodeId,
    pub cookie: String,
    scrolled_to: Option<NodeId>,
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            body: NodeId(0),
            cookie: String::new(),
            scrolled_to: None,
        };
        doc.body = doc.create_element("body");
        doc
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element. Attach it with [`Document::append_child`].
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Element::new(tag)));
        id
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0).and_then(|slot| slot.as_ref())
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node.0).and_then(|slot| slot.as_mut())
    }

    /// Whether the element still exists in the tree.
    pub fn is_alive(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        if let Some(el) = self.get_mut(child) {
            el.parent = Some(parent);
        }
        if let Some(el) = self.get_mut(parent) {
            el.children.push(child);
        }
    }

    /// Remove an element and its subtree. Removing an already-removed
    /// element is a no-op.
    pub fn remove(&mut self, node: NodeId) {
        let Some(el) = self.get(node) else {
            return;
        };
        let parent = el.parent;
        let children = el.children.clone();
        for child in children {
            self.remove(child);
        }
        if let Some(p) = parent {
            if let Some(pel) = self.get_mut(p) {
                pel.children.retain(|c| *c != node);
            }
        }
        self.nodes[node.0] = None;
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) {
        if let Some(el) = self.get_mut(node) {
            el.id = Some(id.to_string());
        }
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes.iter().enumerate().find_map(|(i, slot)| {
            slot.as_ref()
                .filter(|el| el.id.as_deref() == Some(id))
                .map(|_| NodeId(i))
        })
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.get_mut(node) {
            el.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node).and_then(|el| el.attr(name))
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(el) = self.get_mut(node) {
            el.value = value.to_string();
        }
    }

    pub fn value(&self, node: NodeId) -> &str {
        self.get(node).map(|el| el.value.as_str()).unwrap_or("")
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(el) = self.get_mut(node) {
            el.text = text.to_string();
        }
    }

    pub fn text(&self, node: NodeId) -> &str {
        self.get(node).map(|el| el.text.as_str()).unwrap_or("")
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.get_mut(node) {
            if !el.classes.iter().any(|c| c == class) {
                el.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.get_mut(node) {
            el.classes.retain(|c| c != class);
        }
    }

    /// Toggle a class, returning whether it is present afterwards.
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.get(node)
            .map(|el| el.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|el| el.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.get(node)
            .map(|el| el.children.clone())
            .unwrap_or_default()
    }

    /// Depth-first walk of the subtree below `root` (excluding `root`).
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = self.children(root);
        stack.reverse();
        while let Some(node) = stack.pop() {
            out.push(node);
            let mut kids = self.children(node);
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    /// All live elements with the given tag, in tree order from the body.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|n| self.get(*n).map(|el| el.tag == tag).unwrap_or(false))
            .collect()
    }

    pub fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|n| self.has_class(*n, class))
            .collect()
    }

    /// All live elements carrying `name="value"` as an attribute.
    pub fn elements_by_attr(&self, name: &str, value: &str) -> Vec<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|n| self.attr(*n, name) == Some(value))
            .collect()
    }

    /// Nearest ancestor (including `node` itself) carrying the class.
    pub fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.has_class(n, class) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    pub fn scroll_into_view(&mut self, node: NodeId) {
        if self.is_alive(node) {
            self.scrolled_to = Some(node);
        }
    }

    pub fn scrolled_to(&self) -> Option<NodeId> {
        self.scrolled_to
    }

    /// Serialize an element's subtree as markup. Used by the print view.
    pub fn outer_html(&self, node: NodeId) -> String {
        let Some(el) = self.get(node) else {
            return String::new();
        };
        let mut open = format!("<{}", el.tag);
        if let Some(id) = &el.id {
            open.push_str(&format!(" id=\"{}\"", id));
        }
        if !el.classes.is_empty() {
            open.push_str(&format!(" class=\"{}\"", el.classes.join(" ")));
        }
        let mut attrs: Vec<_> = el.attributes.iter().collect();
        attrs.sort();
        for (name, value) in attrs {
            open.push_str(&format!(" {}=\"{}\"", name, value));
        }
        open.push('>');
        let mut inner = el.text.clone();
        for child in &el.children {
            inner.push_str(&self.outer_html(*child));
        }
        format!("{}{}</{}>", open, inner, el.tag)
    }

    /// The element's text plus its children's markup, without the
    /// element's own tag.
    pub fn inner_html(&self, node: NodeId) -> String {
        let Some(el) = self.get(node) else {
            return String::new();
        };
        let mut inner = el.text.clone();
        for child in &el.children {
            inner.push_str(&self.outer_html(*child));
        }
        inner
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_div() -> (Document, NodeId) {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_id(div, "target");
        let body = doc.body();
        doc.append_child(body, div);
        (doc, div)
    }

    #[test]
    fn test_lookup_by_id() {
        let (doc, div) = doc_with_div();
        assert_eq!(doc.get_element_by_id("target"), Some(div));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut doc, div) = doc_with_div();
        doc.remove(div);
        assert!(!doc.is_alive(div));
        // Second removal must be a no-op, not a panic
        doc.remove(div);
        assert!(doc.children(doc.body()).is_empty());
    }

    #[test]
    fn test_remove_takes_subtree() {
        let (mut doc, div) = doc_with_div();
        let span = doc.create_element("span");
        doc.append_child(div, span);
        doc.remove(div);
        assert!(!doc.is_alive(span));
    }

    #[test]
    fn test_class_toggle() {
        let (mut doc, div) = doc_with_div();
        assert!(doc.toggle_class(div, "hidden"));
        assert!(doc.has_class(div, "hidden"));
        assert!(!doc.toggle_class(div, "hidden"));
        assert!(!doc.has_class(div, "hidden"));
    }

    #[test]
    fn test_add_class_deduplicates() {
        let (mut doc, div) = doc_with_div();
        doc.add_class(div, "is-invalid");
        doc.add_class(div, "is-invalid");
        assert_eq!(doc.get(div).unwrap().classes().len(), 1);
    }

    #[test]
    fn test_ops_on_removed_element_are_noops() {
        let (mut doc, div) = doc_with_div();
        doc.remove(div);
        doc.add_class(div, "x");
        doc.set_value(div, "y");
        doc.scroll_into_view(div);
        assert!(!doc.has_class(div, "x"));
        assert_eq!(doc.value(div), "");
        assert_eq!(doc.scrolled_to(), None);
    }

    #[test]
    fn test_descendants_in_tree_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let form = doc.create_element("form");
        let a = doc.create_element("input");
        let b = doc.create_element("input");
        doc.append_child(body, form);
        doc.append_child(form, a);
        doc.append_child(form, b);
        assert_eq!(doc.descendants(body), vec![form, a, b]);
    }

    #[test]
    fn test_outer_html_nests_children() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_id(div, "invoice");
        let p = doc.create_element("p");
        doc.set_text(p, "Total: 100");
        doc.append_child(div, p);
        assert_eq!(
            doc.outer_html(div),
            "<div id=\"invoice\"><p>Total: 100</p></div>"
        );
    }
}
