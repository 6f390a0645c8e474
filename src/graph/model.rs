use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::graph::traits::Weight;
use crate::{Error, Result};

/// A vertex with display coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A weighted edge between two node ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<W> {
    pub id: String,
    pub source: String,
    pub target: String,
    pub weight: W,
}

/// Unvalidated, serializable description of a graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSpec<W> {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge<W>>,
    #[serde(default = "default_directed")]
    pub directed: bool,
}

fn default_directed() -> bool {
    true
}

/// One traversable direction of a stored edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutEdge<W> {
    /// Index of the neighbor vertex
    pub target: usize,
    pub weight: W,
    /// Index of the stored edge this direction belongs to
    pub edge: usize,
}

/// A validated, immutable weighted graph.
///
/// Vertices are addressed by their position in [`Graph::nodes`]. For undirected
/// graphs every stored edge is traversable in both directions, and both
/// directions report the same edge index.
#[derive(Debug, Clone)]
pub struct Graph<W: Weight> {
    nodes: Vec<Node>,
    edges: Vec<Edge<W>>,
    directed: bool,
    /// node id -> vertex index
    index: HashMap<String, usize>,
    /// (source, target) vertex indices per stored edge
    endpoints: Vec<(usize, usize)>,
    /// Outgoing traversals per vertex
    adjacency: Vec<Vec<OutEdge<W>>>,
}

impl<W: Weight> Graph<W> {
    /// Validates and builds a graph. Fails on duplicate ids, dangling edge
    /// endpoints, and negative or NaN weights.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge<W>>, directed: bool) -> Result<Self> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), i).is_some() {
                return Err(Error::DuplicateNode(node.id.clone()));
            }
        }

        let mut edge_ids = HashMap::with_capacity(edges.len());
        let mut endpoints = Vec::with_capacity(edges.len());
        let mut adjacency = vec![Vec::new(); nodes.len()];

        for (i, edge) in edges.iter().enumerate() {
            if edge_ids.insert(edge.id.as_str(), i).is_some() {
                return Err(Error::DuplicateEdge(edge.id.clone()));
            }
            if edge.weight.is_nan() || edge.weight < W::zero() {
                return Err(Error::NegativeWeight {
                    edge: edge.id.clone(),
                    weight: edge.weight.to_f64().unwrap_or(f64::NAN),
                });
            }

            let lookup = |id: &str| {
                index.get(id).copied().ok_or_else(|| Error::UnknownEndpoint {
                    edge: edge.id.clone(),
                    node: id.to_string(),
                })
            };
            let from = lookup(&edge.source)?;
            let to = lookup(&edge.target)?;

            endpoints.push((from, to));
            adjacency[from].push(OutEdge { target: to, weight: edge.weight, edge: i });
            if !directed {
                adjacency[to].push(OutEdge { target: from, weight: edge.weight, edge: i });
            }
        }

        Ok(Graph {
            nodes,
            edges,
            directed,
            index,
            endpoints,
            adjacency,
        })
    }

    /// Starts a [`GraphBuilder`]
    pub fn builder() -> GraphBuilder<W> {
        GraphBuilder::new()
    }

    /// Returns the number of vertices in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of stored edges in the graph
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge<W>] {
        &self.edges
    }

    pub fn node(&self, vertex: usize) -> Option<&Node> {
        self.nodes.get(vertex)
    }

    pub fn edge(&self, edge: usize) -> Option<&Edge<W>> {
        self.edges.get(edge)
    }

    /// Returns the vertex index for a node id
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Returns the node id of a vertex index.
    ///
    /// Panics if `vertex` is out of range.
    pub fn node_id(&self, vertex: usize) -> &str {
        &self.nodes[vertex].id
    }

    /// Returns the edge id of an edge index.
    ///
    /// Panics if `edge` is out of range.
    pub fn edge_id(&self, edge: usize) -> &str {
        &self.edges[edge].id
    }

    /// Returns the (source, target) vertex indices of a stored edge
    pub fn endpoints(&self, edge: usize) -> Option<(usize, usize)> {
        self.endpoints.get(edge).copied()
    }

    /// Returns the outgoing traversals of a vertex, including the reverse
    /// direction of undirected edges
    pub fn outgoing_edges(&self, vertex: usize) -> &[OutEdge<W>] {
        self.adjacency.get(vertex).map_or(&[], |edges| edges.as_slice())
    }

    /// Returns the unvalidated, serializable form of the graph
    pub fn to_spec(&self) -> GraphSpec<W> {
        GraphSpec {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            directed: self.directed,
        }
    }
}

impl<W: Weight + DeserializeOwned> Graph<W> {
    /// Parses and validates a graph from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: GraphSpec<W> = serde_json::from_str(json)?;
        Self::try_from(spec)
    }
}

impl<W: Weight> TryFrom<GraphSpec<W>> for Graph<W> {
    type Error = Error;

    fn try_from(spec: GraphSpec<W>) -> Result<Self> {
        Graph::new(spec.nodes, spec.edges, spec.directed)
    }
}

/// Incremental construction of a [`Graph`]; validation happens in [`GraphBuilder::build`]
#[derive(Debug, Clone)]
pub struct GraphBuilder<W> {
    nodes: Vec<Node>,
    edges: Vec<Edge<W>>,
    directed: bool,
}

impl<W: Weight> GraphBuilder<W> {
    /// Creates an empty, directed builder
    pub fn new() -> Self {
        GraphBuilder {
            nodes: Vec::new(),
            edges: Vec::new(),
            directed: true,
        }
    }

    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Adds a node labelled with its id
    pub fn node(mut self, id: &str, x: f64, y: f64) -> Self {
        self.nodes.push(Node {
            id: id.to_string(),
            x,
            y,
            label: Some(id.to_string()),
        });
        self
    }

    /// Adds an edge; endpoints are checked when the graph is built
    pub fn edge(mut self, id: &str, source: &str, target: &str, weight: W) -> Self {
        self.edges.push(Edge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            weight,
        });
        self
    }

    pub fn build(self) -> Result<Graph<W>> {
        Graph::new(self.nodes, self.edges, self.directed)
    }
}

impl<W: Weight> Default for GraphBuilder<W> {
    fn default() -> Self {
        Self::new()
    }
}
