//! Two-group structure of a graph: validating the groups stored on the
//! vertices, and deriving them from a 2-colouring.

use std::collections::HashMap;
use std::collections::VecDeque;

use itertools::Itertools;

use crate::error::Error;
use crate::error::Result;
use crate::graph::Graph;
use crate::graph::VertexId;

/// The two group labels carried by the vertices, ascending. Every vertex must
/// carry one of exactly two labels, and every edge must join vertices of
/// different groups (edge direction is ignored).
pub fn groups(graph: &Graph) -> Result<(i64, i64)> {
  let mut labels = Vec::new();
  for (id, vertex) in graph.iter_vertices() {
    let group = vertex.group().ok_or_else(|| {
      Error::NotBipartite(format!("vertex {:?} has no group", id))
    })?;
    labels.push(group);
  }

  let labels: Vec<i64> = labels.into_iter().unique().sorted().collect();
  let &[a, b] = labels.as_slice() else {
    return Err(Error::NotBipartite(format!(
      "expected exactly two groups, found {:?}",
      labels,
    )));
  };

  for (id, edge) in graph.iter_edges() {
    let (x, y) = edge.vertices();
    if graph.vertex(x)?.group() == graph.vertex(y)?.group() {
      return Err(Error::NotBipartite(format!(
        "edge {:?} joins two vertices of the same group",
        id,
      )));
    }
  }

  Ok((a, b))
}

/// Whether the vertices can be split into two groups with no edge inside a
/// group. Stored group labels are ignored.
#[must_use]
pub fn is_bipartite(graph: &Graph) -> bool {
  colors(graph).is_ok()
}

/// Clone of `graph` with group 0 or 1 assigned to every vertex by a
/// breadth-first 2-colouring; the lowest vertex of every component gets 0.
pub fn assign_groups(graph: &Graph) -> Result<Graph> {
  let colors = colors(graph)?;

  let mut result = graph.clone();
  for (vertex, color) in colors {
    result.vertex_mut(vertex)?.set_group(Some(color));
  }

  Ok(result)
}

fn colors(graph: &Graph) -> Result<HashMap<VertexId, i64>> {
  let mut colors: HashMap<VertexId, i64> = HashMap::new();

  for root in graph.vertices() {
    if colors.contains_key(&root) {
      continue;
    }

    let mut queue: VecDeque<(VertexId, i64)> = VecDeque::new();
    queue.push_back((root, 0));
    colors.insert(root, 0);

    while let Some((vertex, color)) = queue.pop_front() {
      for &id in graph.vertex(vertex)?.edges() {
        let (x, y) = graph.edge(id)?.vertices();
        let neighbor = if x == vertex { y } else { x };

        match colors.get(&neighbor) {
          None => {
            colors.insert(neighbor, 1 - color);
            queue.push_back((neighbor, 1 - color));
          }
          Some(&neighbor_color) if neighbor_color == color => {
            return Err(Error::NotBipartite(format!(
              "odd cycle through edge {:?}",
              id,
            )));
          }
          Some(_) => {}
        }
      }
    }
  }

  Ok(colors)
}
