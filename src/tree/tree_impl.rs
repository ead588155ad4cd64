use std::collections::HashMap;

use ptree::{print_tree, TreeBuilder};
use thiserror::Error;

use super::node::Node;
use super::NodeId;
use crate::shape::{check_print_depth, Shape, ShapeError};

/// Errors that can occur when building, manipulating and converting [`Tree`] structs.
#[derive(Error, Debug)]
pub enum TreeError {
    /// The tree is empty and we are trying to do something that require at least one node
    #[error("This tree is empty.")]
    IsEmpty,
    /// No root node was found in the tree and we are trying to do something
    /// that requires a root node
    #[error("No root node found")]
    RootNotFound,
    /// The requested node with index [`NodeId`] does not exist in the tree
    #[error("There is no node with index: {0}")]
    NodeNotFound(NodeId),
    /// There was a [`ShapeError`] when converting the tree to a shape
    #[error("Could not build shape")]
    ShapeError(#[from] ShapeError),
    /// There was a [`std::io::Error`] when printing the tree
    #[error("Error printing tree: {0}")]
    IoError(#[from] std::io::Error),
}

/// A labeled rooted tree.
///
/// This is the boundary between named leaves and the unlabeled [`Shape`] engine:
/// leaf labels are stripped by [`Tree::to_shape`] and generated by [`Tree::from_shape`].
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

/// Base methods to add and get [`Node`] objects to and from the [`Tree`].
///
/// ----
/// ----
impl Tree {
    /// Create a new empty Tree object
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    // ############################
    // # ADDING AND GETTING NODES #
    // ############################

    /// Add a new node to the tree.
    pub fn add(&mut self, node: Node) -> NodeId {
        let idx = self.nodes.len();
        let mut node = node;
        node.id = idx;
        self.nodes.push(node);

        idx
    }

    /// Add a child to one of the tree's nodes.
    ///
    /// # Example
    /// ```
    /// use treeshape::tree::{Tree, Node};
    ///
    /// // Create the tree and add a root node
    /// let mut tree = Tree::new();
    /// let root_id = tree.add(Node::new());
    ///
    /// // Add children to the root
    /// let left = tree.add_child(Node::new(), root_id).unwrap();
    /// let right = tree.add_child(Node::new(), root_id).unwrap();
    ///
    /// assert_eq!(tree.get(&root_id).unwrap().children, vec![left, right]);
    /// assert_eq!(tree.get(&left).unwrap().parent, Some(root_id));
    /// ```
    pub fn add_child(&mut self, node: Node, parent: NodeId) -> Result<NodeId, TreeError> {
        self.get(&parent)?;

        let mut node = node;
        node.set_parent(parent);

        let id = self.add(node);
        self.get_mut(&parent)?.add_child(id);

        Ok(id)
    }

    /// Get a reference to a specific Node of the tree
    pub fn get(&self, id: &NodeId) -> Result<&Node, TreeError> {
        self.nodes.get(*id).ok_or(TreeError::NodeNotFound(*id))
    }

    /// Get a mutable reference to a specific Node of the tree
    pub fn get_mut(&mut self, id: &NodeId) -> Result<&mut Node, TreeError> {
        self.nodes.get_mut(*id).ok_or(TreeError::NodeNotFound(*id))
    }

    /// Gets the root node.
    pub fn get_root(&self) -> Result<NodeId, TreeError> {
        if self.is_empty() {
            return Err(TreeError::IsEmpty);
        }
        self.nodes
            .iter()
            .find(|&node| node.is_root())
            .map(|node| node.id)
            .ok_or(TreeError::RootNotFound)
    }

    /// Returns a [`Vec`] containing the Node IDs of leaf nodes of the tree
    /// ```
    /// use treeshape::tree::{Tree, Node};
    ///
    /// let mut tree = Tree::new();
    /// let root_idx = tree.add(Node::new());
    /// let left = tree.add_child(Node::new(), root_idx).unwrap();
    /// let right = tree.add_child(Node::new(), root_idx).unwrap();
    ///
    /// assert_eq!(tree.get_leaves(), vec![left, right]);
    /// ```
    pub fn get_leaves(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|&node| node.is_tip())
            .map(|node| node.id)
            .collect()
    }

    /// Returns a [`Vec`] containing the Names of the leaf nodes of the tree
    pub fn get_leaf_names(&self) -> Vec<Option<String>> {
        self.nodes
            .iter()
            .filter(|&node| node.is_tip())
            .map(|node| node.name.clone())
            .collect()
    }
}

/// Methods to traverse the [`Tree`]
///
/// ----
/// ----
impl Tree {
    // ###################
    // # TREE TRAVERSALS #
    // ###################

    /// Returns a vector containing node ids in the same order as the
    /// [preorder](https://en.wikipedia.org/wiki/Tree_traversal#Pre-order,_NLR) tree traversal
    pub fn preorder(&self, root: &NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut indices = vec![];
        let mut stack = vec![*root];

        while let Some(id) = stack.pop() {
            indices.push(id);
            stack.extend(self.get(&id)?.children.iter().rev());
        }

        Ok(indices)
    }

    /// Returns a vector containing node ids in the same order as the
    /// [postorder](https://en.wikipedia.org/wiki/Tree_traversal#Post-order,_LRN ) tree traversal
    pub fn postorder(&self, root: &NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut indices = vec![];
        let mut stack = vec![(*root, false)];

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                indices.push(id);
                continue;
            }
            stack.push((id, true));
            for child in self.get(&id)?.children.iter().rev() {
                stack.push((*child, false));
            }
        }

        Ok(indices)
    }
}

/// Methods that compute characteristics of the [`Tree`]
///
/// ----
/// ----
impl Tree {
    // #######################################
    // # GETTING CHARACTERISTICS OF THE TREE #
    // #######################################

    /// Check if every node of the tree has at most two children
    pub fn is_binary(&self) -> bool {
        self.nodes
            .iter()
            .all(|node| node.children.len() <= 2)
    }

    /// Check if the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns the number of nodes in the tree
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaves in the tree
    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|&node| node.is_tip())
            .count()
    }
}

/// Methods to convert [`Tree`] objects to and from unlabeled [`Shape`] objects.
///
/// ----
/// ----
impl Tree {
    // ##############################
    // # CONVERT TO AND FROM SHAPES #
    // ##############################

    /// Strip the labels of the tree and return its canonical [`Shape`].
    /// Nodes with a single child are collapsed into that child.
    /// ```
    /// use treeshape::shape::Shape;
    /// use treeshape::tree::{Tree, Node};
    ///
    /// let mut tree = Tree::new();
    /// let root = tree.add(Node::new());
    /// let inner = tree.add_child(Node::new(), root).unwrap();
    /// tree.add_child(Node::new_named("A"), root).unwrap();
    /// tree.add_child(Node::new_named("B"), inner).unwrap();
    /// tree.add_child(Node::new_named("C"), inner).unwrap();
    ///
    /// let shape = tree.to_shape().unwrap();
    /// assert_eq!(shape.to_string(), "(*,(*,*))");
    /// assert!(shape.is_canonical());
    /// ```
    pub fn to_shape(&self) -> Result<Shape, TreeError> {
        let root = self.get_root()?;
        let mut shapes: HashMap<NodeId, Shape> = HashMap::new();

        for id in self.postorder(&root)? {
            let node = self.get(&id)?;
            let shape = match node.children.len() {
                0 => Shape::leaf(),
                1 => shapes
                    .remove(&node.children[0])
                    .ok_or(TreeError::NodeNotFound(node.children[0]))?,
                _ => {
                    let children = node
                        .children
                        .iter()
                        .map(|child| shapes.remove(child).ok_or(TreeError::NodeNotFound(*child)))
                        .collect::<Result<Vec<_>, _>>()?;
                    Shape::sorted_node(children)?
                }
            };
            shapes.insert(id, shape);
        }

        shapes.remove(&root).ok_or(TreeError::NodeNotFound(root))
    }

    /// Build a tree with the topology of a [`Shape`], leaves are
    /// named `Tip_0`, `Tip_1`, ... from left to right.
    /// ```
    /// use treeshape::shape::generator::comb;
    /// use treeshape::tree::Tree;
    ///
    /// let tree = Tree::from_shape(&comb(3).unwrap());
    /// let names: Vec<_> = tree.get_leaf_names().into_iter().flatten().collect();
    ///
    /// assert_eq!(names, vec!["Tip_0", "Tip_1", "Tip_2"]);
    /// assert_eq!(tree.size(), 5);
    /// ```
    pub fn from_shape(shape: &Shape) -> Self {
        let mut tree = Tree::new();
        let mut n_tips = 0;

        let mut root = Node::new();
        if shape.is_leaf() {
            root.set_name("Tip_0".to_string());
        }
        let root_id = tree.add(root);

        let mut stack: Vec<(&Shape, NodeId)> = shape
            .children()
            .iter()
            .rev()
            .map(|child| (child, root_id))
            .collect();

        while let Some((subtree, parent)) = stack.pop() {
            let mut node = Node::new();
            if subtree.is_leaf() {
                node.set_name(format!("Tip_{n_tips}"));
                n_tips += 1;
            }
            // Parents are always pushed to the arena before their children
            node.set_parent(parent);
            let id = tree.add(node);
            tree.nodes[parent].add_child(id);

            stack.extend(subtree.children().iter().rev().map(|child| (child, id)));
        }

        tree
    }
}

/// Methods to display [`Tree`] objects.
///
/// ----
/// ----
impl Tree {
    /// Returns the number of edges between the root and the deepest leaf
    fn depth(&self, root: &NodeId) -> Result<usize, TreeError> {
        let mut deepest = 0;
        let mut stack = vec![(*root, 0)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(self.get(&id)?.children.iter().map(|child| (*child, depth + 1)));
        }
        Ok(deepest)
    }

    /// Print the tree to the console.
    ///
    /// Trees deeper than [`MAX_PRINT_DEPTH`](crate::shape::MAX_PRINT_DEPTH) are rejected
    /// with an [`IoError`](TreeError::IoError).
    pub fn print(&self) -> Result<(), TreeError> {
        let root = self.get_root()?;
        check_print_depth(self.depth(&root)?)?;

        let mut builder = TreeBuilder::new(format!("{}", self.get(&root)?));
        let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];

        while let Some((id, next)) = stack.pop() {
            let children = &self.get(&id)?.children;
            if next < children.len() {
                stack.push((id, next + 1));
                let child = self.get(&children[next])?;
                if child.is_tip() {
                    builder.add_empty_child(format!("{child}"));
                } else {
                    builder.begin_child(format!("{child}"));
                    stack.push((child.id, 0));
                }
            } else if !stack.is_empty() {
                builder.end_child();
            }
        }

        let tree = builder.build();
        print_tree(&tree)?;
        Ok(())
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{
        generator::{comb, max_balanced, star, ShapeGenerator},
        MAX_PRINT_DEPTH,
    };

    /// Generates example tree from the tree traversal wikipedia page
    /// https://en.wikipedia.org/wiki/Tree_traversal#Depth-first_search
    /// The difference is that I is the left child of G since this tree structure
    /// cannot represent a right child only.
    fn build_simple_tree() -> Result<Tree, TreeError> {
        let mut tree = Tree::new();
        tree.add(Node::new_named("F")); // 0
        tree.add_child(Node::new_named("B"), 0)?; // 1
        tree.add_child(Node::new_named("G"), 0)?; // 2
        tree.add_child(Node::new_named("A"), 1)?; // 3
        tree.add_child(Node::new_named("D"), 1)?; // 4
        tree.add_child(Node::new_named("I"), 2)?; // 5
        tree.add_child(Node::new_named("C"), 4)?; // 6
        tree.add_child(Node::new_named("E"), 4)?; // 7
        tree.add_child(Node::new_named("H"), 5)?; // 8

        Ok(tree)
    }

    fn get_names(indices: &[NodeId], tree: &Tree) -> Vec<String> {
        indices
            .iter()
            .filter_map(|idx| tree.get(idx).unwrap().name.clone())
            .collect()
    }

    #[test]
    fn traversals() {
        let tree = build_simple_tree().unwrap();
        let root = tree.get_root().unwrap();

        assert_eq!(
            get_names(&tree.preorder(&root).unwrap(), &tree),
            vec!["F", "B", "A", "D", "C", "E", "G", "I", "H"]
        );
        assert_eq!(
            get_names(&tree.postorder(&root).unwrap(), &tree),
            vec!["A", "C", "E", "D", "B", "H", "I", "G", "F"]
        );
    }

    #[test]
    fn test_tips() {
        let mut tree = Tree::new();
        tree.add(Node::new_named("root"));
        assert_eq!(tree.get_leaves(), vec![0]);

        tree.add_child(Node::new_named("A"), 0).unwrap(); // 1
        tree.add_child(Node::new_named("B"), 0).unwrap(); // 2
        tree.add_child(Node::new_named("E"), 0).unwrap(); // 3

        assert_eq!(tree.get_leaves(), vec![1, 2, 3]);

        tree.add_child(Node::new_named("C"), 3).unwrap(); // 4
        tree.add_child(Node::new_named("D"), 3).unwrap(); // 5

        assert_eq!(tree.get_leaves(), vec![1, 2, 4, 5]);
        assert_eq!(tree.n_leaves(), 4);
        assert_eq!(tree.get(&5).unwrap().parent, Some(3));
    }

    #[test]
    fn test_binary() {
        let mut tree = Tree::new();
        tree.add(Node::new_named("root"));

        tree.add_child(Node::new_named("0L"), 0).unwrap(); //1
        tree.add_child(Node::new_named("0R"), 0).unwrap(); //2

        assert!(tree.is_binary());

        tree.add_child(Node::new_named("1L"), 1).unwrap(); //3
        tree.add_child(Node::new_named("1R"), 1).unwrap(); //4

        assert!(tree.is_binary());

        tree.add_child(Node::new_named("1?"), 1).unwrap(); //5
        assert!(!tree.is_binary());
    }

    #[test]
    fn missing_nodes() {
        let mut tree = Tree::new();
        assert!(matches!(tree.get_root(), Err(TreeError::IsEmpty)));
        assert!(matches!(tree.to_shape(), Err(TreeError::IsEmpty)));
        assert!(matches!(tree.get(&0), Err(TreeError::NodeNotFound(0))));
        assert!(matches!(
            tree.add_child(Node::new(), 3),
            Err(TreeError::NodeNotFound(3))
        ));

        tree.add(Node::new());
        assert!(matches!(tree.get_mut(&1), Err(TreeError::NodeNotFound(1))));
        assert_eq!(tree.to_shape().unwrap(), Shape::leaf());
    }

    #[test]
    fn unary_nodes_are_collapsed() {
        let tree = build_simple_tree().unwrap();
        // G -> I -> H collapses to a single leaf
        assert_eq!(tree.to_shape().unwrap(), comb(4).unwrap());

        // root -> X -> (A, Y -> B)
        let mut tree = Tree::new();
        let root = tree.add(Node::new_named("root"));
        let x = tree.add_child(Node::new_named("X"), root).unwrap();
        tree.add_child(Node::new_named("A"), x).unwrap();
        let y = tree.add_child(Node::new_named("Y"), x).unwrap();
        tree.add_child(Node::new_named("B"), y).unwrap();
        assert_eq!(tree.to_shape().unwrap(), Shape::cherry());

        // a path of unary nodes is a single leaf
        let mut tree = Tree::new();
        let mut parent = tree.add(Node::new());
        for _ in 0..5 {
            parent = tree.add_child(Node::new(), parent).unwrap();
        }
        assert_eq!(tree.to_shape().unwrap(), Shape::leaf());
    }

    #[test]
    fn print_depth_limit() {
        let tree = Tree::from_shape(&comb(MAX_PRINT_DEPTH + 2).unwrap());
        assert!(matches!(tree.print(), Err(TreeError::IoError(_))));
        assert!(Tree::new().print().is_err());
    }

    #[test]
    fn shapes_are_canonical() {
        let mut tree = Tree::new();
        let root = tree.add(Node::new());
        let left = tree.add_child(Node::new(), root).unwrap();
        for _ in 0..3 {
            tree.add_child(Node::new(), left).unwrap();
        }
        tree.add_child(Node::new(), root).unwrap();
        tree.add_child(Node::new(), root).unwrap();

        let shape = tree.to_shape().unwrap();
        assert!(shape.is_canonical());
        assert_eq!(shape.to_string(), "(*,*,(*,*,*))");
    }

    #[test]
    fn shape_round_trip() {
        let generator = ShapeGenerator::new();
        for n in 1..=7 {
            for shape in generator.all_shapes(n).iter() {
                let tree = Tree::from_shape(shape);
                assert_eq!(tree.n_leaves(), n);
                assert_eq!(tree.to_shape().unwrap(), *shape);
            }
        }
    }

    #[test]
    fn tip_names() {
        let tree = Tree::from_shape(&Shape::leaf());
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.get_leaf_names(), vec![Some("Tip_0".to_string())]);

        let tree = Tree::from_shape(&max_balanced(4).unwrap());
        assert_eq!(tree.size(), 7);
        assert!(tree.is_binary());
        let leaves = tree.get_leaves();
        assert_eq!(
            get_names(&leaves, &tree),
            vec!["Tip_0", "Tip_1", "Tip_2", "Tip_3"]
        );
        assert!(leaves.iter().all(|id| {
            let parent = tree.get(id).unwrap().parent.unwrap();
            tree.get(&parent).unwrap().parent == Some(0)
        }));

        let tree = Tree::from_shape(&star(5).unwrap());
        assert!(!tree.is_binary());
        let leaves = tree.get_leaves();
        assert_eq!(get_names(&leaves, &tree)[4], "Tip_4");
        assert!(leaves.iter().all(|id| tree.get(id).unwrap().parent == Some(0)));
    }

    #[test]
    fn deep_trees() {
        let n = 5000;
        let shape = comb(n).unwrap();
        let tree = Tree::from_shape(&shape);
        assert_eq!(tree.size(), 2 * n - 1);
        assert_eq!(tree.to_shape().unwrap(), shape);
    }
}
