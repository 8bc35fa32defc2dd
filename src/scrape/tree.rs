use scraper::{ElementRef, Html, Node};

/// Read-only view of one node in a parsed page.
///
/// Search and extraction only ever see this trait, so any markup parser can
/// sit behind it.
pub trait PageNode: Clone {
    fn is_text(&self) -> bool;

    /// Tag name for elements, empty for text nodes.
    fn tag(&self) -> &str;

    /// Payload for text nodes, empty for elements.
    fn text(&self) -> &str;

    fn attr(&self, key: &str) -> Option<&str>;

    fn children(&self) -> Vec<Self>;

    fn parent(&self) -> Option<Self>;

    fn is_element(&self) -> bool {
        !self.is_text()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Element,
    Text,
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Arena copy of a parsed HTML document holding only elements and text.
#[derive(Debug)]
pub struct PageTree {
    nodes: Vec<NodeData>,
}

impl PageTree {
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let mut tree = PageTree { nodes: Vec::new() };
        tree.push_element(document.root_element(), None);
        tree
    }

    pub fn root(&self) -> TreeNode<'_> {
        TreeNode { tree: self, id: 0 }
    }

    fn push(&mut self, data: NodeData) -> usize {
        let id = self.nodes.len();
        if let Some(parent) = data.parent {
            self.nodes[parent].children.push(id);
        }
        self.nodes.push(data);
        id
    }

    fn push_element(&mut self, element: ElementRef<'_>, parent: Option<usize>) -> usize {
        let value = element.value();
        let id = self.push(NodeData {
            kind: NodeKind::Element,
            tag: value.name().to_string(),
            attrs: value
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            text: String::new(),
            parent,
            children: Vec::new(),
        });

        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    let payload: &str = text;
                    self.push(NodeData {
                        kind: NodeKind::Text,
                        tag: String::new(),
                        attrs: Vec::new(),
                        text: payload.to_string(),
                        parent: Some(id),
                        children: Vec::new(),
                    });
                }
                Node::Element(_) => {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        self.push_element(child_element, Some(id));
                    }
                }
                // comments, doctypes and processing instructions carry no page data
                _ => {}
            }
        }

        id
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TreeNode<'a> {
    tree: &'a PageTree,
    id: usize,
}

impl<'a> TreeNode<'a> {
    fn data(&self) -> &'a NodeData {
        &self.tree.nodes[self.id]
    }
}

impl PartialEq for TreeNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for TreeNode<'_> {}

impl PageNode for TreeNode<'_> {
    fn is_text(&self) -> bool {
        self.data().kind == NodeKind::Text
    }

    fn tag(&self) -> &str {
        &self.data().tag
    }

    fn text(&self) -> &str {
        &self.data().text
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.data()
            .attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn children(&self) -> Vec<Self> {
        self.data()
            .children
            .iter()
            .map(|&id| TreeNode {
                tree: self.tree,
                id,
            })
            .collect()
    }

    fn parent(&self) -> Option<Self> {
        self.data().parent.map(|id| TreeNode {
            tree: self.tree,
            id,
        })
    }
}

/// Pre-order depth-first search. Returns the first node, in document order,
/// for which `predicate` holds.
pub fn find_first<N, P>(root: &N, predicate: P) -> Option<N>
where
    N: PageNode,
    P: Fn(&N) -> bool,
{
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if predicate(&node) {
            return Some(node);
        }
        stack.extend(node.children().into_iter().rev());
    }
    None
}

/// Joins every text payload under `root` (inclusive) with newlines, in
/// document order. `None` when there is no text node at all.
pub fn collect_text<N: PageNode>(root: &N) -> Option<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if node.is_text() {
            chunks.push(node.text().to_string());
        }
        stack.extend(node.children().into_iter().rev());
    }

    if chunks.is_empty() {
        None
    } else {
        Some(chunks.join("\n"))
    }
}

/// True when the node's `class` attribute lists `class` as one of its tokens.
pub fn has_class<N: PageNode>(node: &N, class: &str) -> bool {
    node.is_element()
        && node
            .attr("class")
            .map_or(false, |value| value.split_whitespace().any(|c| c == class))
}

pub fn element_children<N: PageNode>(node: &N) -> Vec<N> {
    node.children()
        .into_iter()
        .filter(|child| child.is_element())
        .collect()
}

pub fn last_element_child<N: PageNode>(node: &N) -> Option<N> {
    element_children(node).pop()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_id<'a>(tree: &'a PageTree, id: &str) -> TreeNode<'a> {
        find_first(&tree.root(), |n| n.attr("id") == Some(id)).unwrap()
    }

    #[test]
    fn test_find_first_single_match() {
        let tree = PageTree::parse(
            r#"<html><body><div><p class="a">x</p><p class="target">y</p></div></body></html>"#,
        );
        let found = find_first(&tree.root(), |n| has_class(n, "target")).unwrap();
        assert_eq!(found.tag(), "p");
        assert_eq!(collect_text(&found).as_deref(), Some("y"));
    }

    #[test]
    fn test_find_first_no_match() {
        let tree = PageTree::parse("<html><body><p>nothing here</p></body></html>");
        assert!(find_first(&tree.root(), |n| has_class(n, "sample-test")).is_none());
    }

    #[test]
    fn test_find_first_prefers_earlier_subtree() {
        let tree = PageTree::parse(
            r#"<body><div>
                <section><p class="x" id="deep">1</p></section>
                <p class="x" id="later">2</p>
            </div></body>"#,
        );
        let found = find_first(&tree.root(), |n| has_class(n, "x")).unwrap();
        assert_eq!(found.attr("id"), Some("deep"));
        assert_eq!(found, by_id(&tree, "deep"));
    }

    #[test]
    fn test_find_first_earlier_sibling_wins() {
        let tree = PageTree::parse(
            r#"<body><div class="title" id="one">A</div><div class="title" id="two">B</div></body>"#,
        );
        let found = find_first(&tree.root(), |n| has_class(n, "title")).unwrap();
        assert_eq!(found.attr("id"), Some("one"));
    }

    #[test]
    fn test_collect_text_joins_in_document_order() {
        let tree = PageTree::parse(
            r#"<body><div id="t"><span>a</span><span>b</span><p>c</p></div></body>"#,
        );
        let node = by_id(&tree, "t");
        assert_eq!(collect_text(&node).as_deref(), Some("a\nb\nc"));
    }

    #[test]
    fn test_collect_text_empty_subtree() {
        let tree = PageTree::parse(r#"<body><div id="t"><br><img src="x.png"></div></body>"#);
        let node = by_id(&tree, "t");
        assert_eq!(collect_text(&node), None);
    }

    #[test]
    fn test_collect_text_on_text_node_includes_root() {
        let tree = PageTree::parse(r#"<body><p id="t">only</p></body>"#);
        let text = by_id(&tree, "t").children().pop().unwrap();
        assert!(text.is_text());
        assert_eq!(collect_text(&text).as_deref(), Some("only"));
    }

    #[test]
    fn test_comments_are_dropped() {
        let tree = PageTree::parse(r#"<body><p id="t"><!-- hidden -->shown</p></body>"#);
        assert_eq!(collect_text(&by_id(&tree, "t")).as_deref(), Some("shown"));
    }

    #[test]
    fn test_has_class_matches_tokens() {
        let tree = PageTree::parse(r#"<body><div id="t" class="input sample">x</div></body>"#);
        let node = by_id(&tree, "t");
        assert!(has_class(&node, "input"));
        assert!(has_class(&node, "sample"));
        assert!(!has_class(&node, "inp"));
    }

    #[test]
    fn test_parent_and_last_element_child() {
        let tree = PageTree::parse(
            r#"<body><div id="t"><div class="title">Input</div><pre>1 2</pre> </div></body>"#,
        );
        let node = by_id(&tree, "t");
        let pre = last_element_child(&node).unwrap();
        assert_eq!(pre.tag(), "pre");
        assert_eq!(pre.parent(), Some(node));
        assert_eq!(element_children(&node).len(), 2);
    }
}
