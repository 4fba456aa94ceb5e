use tracing::trace;

#[derive(Debug, Clone, Copy)]
struct Node {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    used: bool,
    right: Option<usize>,
    down: Option<usize>,
}

impl Node {
    fn free(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            used: false,
            right: None,
            down: None,
        }
    }
}

/// Growing binary tree bin packer for a single page.
///
/// The root starts out exactly as large as the first item and is replaced by a bigger root
/// whenever an item does not fit, growing right or down while staying within `limit`.
/// Nodes live in an arena and refer to their children by index.
pub struct GrowingTree {
    nodes: Vec<Node>,
    root: usize,
    limit: u32,
    stack: Vec<usize>,
}

impl GrowingTree {
    /// Starts a tree whose root fits a `w`x`h` item. `capacity` pre-sizes the node arena.
    pub fn new(w: u32, h: u32, limit: u32, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(Node::free(0, 0, w, h));
        Self {
            nodes,
            root: 0,
            limit,
            stack: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.nodes[self.root].w
    }

    pub fn height(&self) -> u32 {
        self.nodes[self.root].h
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Places a `w`x`h` item and returns its top-left corner, or `None` when the tree
    /// can neither fit nor grow around it.
    pub fn insert(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        let node = match self.find(w, h) {
            Some(idx) => idx,
            None => self.grow(w, h)?,
        };
        Some(self.split(node, w, h))
    }

    /// First free node that fits, depth-first with right subtrees before down subtrees.
    fn find(&mut self, w: u32, h: u32) -> Option<usize> {
        self.stack.clear();
        self.stack.push(self.root);
        while let Some(idx) = self.stack.pop() {
            let node = self.nodes[idx];
            if node.used {
                if let Some(down) = node.down {
                    self.stack.push(down);
                }
                if let Some(right) = node.right {
                    self.stack.push(right);
                }
            } else if w <= node.w && h <= node.h {
                return Some(idx);
            }
        }
        None
    }

    fn split(&mut self, idx: usize, w: u32, h: u32) -> (u32, u32) {
        let node = self.nodes[idx];
        let down = (node.h > h).then(|| self.push(Node::free(node.x, node.y + h, node.w, node.h - h)));
        let right = (node.w > w).then(|| self.push(Node::free(node.x + w, node.y, node.w - w, h)));
        let slot = &mut self.nodes[idx];
        slot.used = true;
        slot.down = down;
        slot.right = right;
        (node.x, node.y)
    }

    fn grow(&mut self, w: u32, h: u32) -> Option<usize> {
        let root = self.nodes[self.root];
        let can_right = h <= root.h && root.w + w <= self.limit;
        let can_down = w <= root.w && root.h + h <= self.limit;
        // keep the page roughly square
        let should_right = can_right && root.h >= root.w + w;
        let should_down = can_down && root.w >= root.h + h;

        if should_right {
            Some(self.grow_right(w))
        } else if should_down {
            Some(self.grow_down(h))
        } else if can_right {
            Some(self.grow_right(w))
        } else if can_down {
            Some(self.grow_down(h))
        } else {
            None
        }
    }

    fn grow_right(&mut self, w: u32) -> usize {
        let old_root = self.root;
        let old = self.nodes[old_root];
        let strip = self.push(Node::free(old.w, 0, w, old.h));
        let root = self.push(Node {
            x: 0,
            y: 0,
            w: old.w + w,
            h: old.h,
            used: true,
            right: Some(strip),
            down: Some(old_root),
        });
        self.root = root;
        trace!(width = old.w + w, height = old.h, "tree grew right");
        strip
    }

    fn grow_down(&mut self, h: u32) -> usize {
        let old_root = self.root;
        let old = self.nodes[old_root];
        let strip = self.push(Node::free(0, old.h, old.w, h));
        let root = self.push(Node {
            x: 0,
            y: 0,
            w: old.w,
            h: old.h + h,
            used: true,
            right: Some(old_root),
            down: Some(strip),
        });
        self.root = root;
        trace!(width = old.w, height = old.h + h, "tree grew down");
        strip
    }

    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}
