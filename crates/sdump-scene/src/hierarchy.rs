//! Hierarchy resolver
//!
//! Links one scene's transforms into a forest and walks it preorder. All
//! lookups are scoped to the records passed in, which must come from a single
//! document.

use crate::ids::FileId;
use crate::record::{GameObjectRecord, TransformRecord};
use crate::segment::tags;
use petgraph::algo::kosaraju_scc;
use petgraph::graphmap::DiGraphMap;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display, Formatter};
use std::io::{self, Write};

/// Indentation per depth level in dumps
pub const INDENT_MARKER: &str = "--";

/// One printed node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyLine {
    /// Distance from the root (roots are 0)
    pub depth: usize,
    /// Owning game object's name, `None` when it could not be resolved
    pub name: Option<String>,
    /// Transform that produced this line
    pub transform: FileId,
}

/// Structural problem found in a scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuralFault {
    /// Transforms whose child links form a cycle
    Cycle {
        /// Members of the strongly connected component, sorted
        members: Vec<FileId>,
    },
    /// A transform reached a second time during traversal
    Revisit {
        /// Transform listing the child
        parent: FileId,
        /// Transform already printed
        child: FileId,
    },
    /// Two blocks of the same kind share a fileID; the first one is used
    DuplicateFileId {
        /// The shared fileID
        file_id: FileId,
        /// Type tag of the blocks
        tag: String,
    },
    /// Block closed by end of file rather than a delimiter
    UnterminatedBlock {
        /// Header fileID
        file_id: FileId,
        /// Type tag
        tag: String,
        /// 1-based header line
        header_line: usize,
    },
}

impl StructuralFault {
    /// Faults that lose nothing and are expected in well-formed files
    #[must_use]
    pub fn is_notice(&self) -> bool {
        matches!(self, Self::UnterminatedBlock { .. })
    }
}

impl Display for StructuralFault {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cycle { members } => {
                let ids: Vec<&str> = members.iter().map(FileId::as_str).collect();
                write!(f, "transform cycle through [{}]", ids.join(", "))
            }
            Self::Revisit { parent, child } => {
                write!(f, "transform &{child} revisited from &{parent}")
            }
            Self::DuplicateFileId { file_id, tag } => {
                write!(f, "duplicate fileID &{file_id} for tag {tag}")
            }
            Self::UnterminatedBlock {
                file_id,
                tag,
                header_line,
            } => write!(
                f,
                "block &{file_id} (tag {tag}, line {header_line}) ends at end of file"
            ),
        }
    }
}

/// Rendered scene hierarchy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hierarchy {
    /// Preorder lines
    pub lines: Vec<HierarchyLine>,
    /// Faults found while resolving
    pub faults: Vec<StructuralFault>,
}

impl Hierarchy {
    /// `(depth, name)` pairs, unresolved names as empty text
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.lines
            .iter()
            .map(|line| (line.depth, line.name.as_deref().unwrap_or_default()))
    }

    /// Write the indented dump, one name per line
    ///
    /// # Errors
    /// Propagates writer failures.
    pub fn write_dump<W: Write>(&self, mut out: W) -> io::Result<()> {
        for (depth, name) in self.entries() {
            writeln!(out, "{}{name}", INDENT_MARKER.repeat(depth))?;
        }
        Ok(())
    }

    /// The dump as a string
    #[must_use]
    pub fn to_dump(&self) -> String {
        let mut out = String::new();
        for (depth, name) in self.entries() {
            out.push_str(&INDENT_MARKER.repeat(depth));
            out.push_str(name);
            out.push('\n');
        }
        out
    }
}

fn index_by_id<'r, T>(
    records: &'r [T],
    id: impl Fn(&'r T) -> &'r FileId,
    tag: &str,
    faults: &mut Vec<StructuralFault>,
) -> HashMap<&'r FileId, &'r T> {
    let mut index = HashMap::with_capacity(records.len());
    for record in records {
        let file_id = id(record);
        if index.contains_key(file_id) {
            faults.push(StructuralFault::DuplicateFileId {
                file_id: file_id.clone(),
                tag: tag.to_string(),
            });
        } else {
            index.insert(file_id, record);
        }
    }
    index
}

/// Cycles in the child graph, each as sorted member ids
///
/// Covers every transform, including ones no root reaches. The component
/// search keeps its own stack, so chain depth is bounded by memory only.
#[must_use]
pub fn find_cycles(transforms: &[TransformRecord]) -> Vec<Vec<FileId>> {
    let known: HashSet<&str> = transforms.iter().map(|t| t.file_id.as_str()).collect();
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for transform in transforms {
        graph.add_node(transform.file_id.as_str());
    }
    for transform in transforms {
        for child in transform.children.iter().flatten() {
            if known.contains(child.as_str()) {
                graph.add_edge(transform.file_id.as_str(), child.as_str(), ());
            }
        }
    }

    let mut cycles: Vec<Vec<FileId>> = kosaraju_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .map(|scc| {
            let mut members: Vec<FileId> = scc.into_iter().map(FileId::new).collect();
            members.sort();
            members
        })
        .collect();
    cycles.sort();
    cycles
}

/// Walk every root preorder and name each transform by its game object
///
/// Missing game objects print as empty names; children that are unresolved
/// or not present in `transforms` are skipped. A transform is printed at most
/// once.
#[must_use]
pub fn render(game_objects: &[GameObjectRecord], transforms: &[TransformRecord]) -> Hierarchy {
    let mut faults = Vec::new();
    let objects = index_by_id(game_objects, |g| &g.file_id, tags::GAME_OBJECT, &mut faults);
    let nodes = index_by_id(transforms, |t| &t.file_id, tags::TRANSFORM, &mut faults);

    let cycles = find_cycles(transforms);
    let in_cycle: HashSet<FileId> = cycles.iter().flatten().cloned().collect();
    faults.extend(
        cycles
            .into_iter()
            .map(|members| StructuralFault::Cycle { members }),
    );

    let mut lines = Vec::new();
    let mut visited: HashSet<&FileId> = HashSet::new();

    let roots = transforms
        .iter()
        .filter(|t| t.is_root())
        .filter(|t| nodes.get(&t.file_id).is_some_and(|kept| std::ptr::eq(*kept, *t)));

    for root in roots {
        let mut stack: Vec<(Option<&FileId>, &TransformRecord, usize)> = vec![(None, root, 0)];

        while let Some((parent, node, depth)) = stack.pop() {
            if !visited.insert(&node.file_id) {
                if let Some(parent) = parent {
                    if !in_cycle.contains(&node.file_id) {
                        faults.push(StructuralFault::Revisit {
                            parent: parent.clone(),
                            child: node.file_id.clone(),
                        });
                    }
                }
                continue;
            }

            lines.push(HierarchyLine {
                depth,
                name: owner_name(node, &objects),
                transform: node.file_id.clone(),
            });

            for child in node.children.iter().rev() {
                match child {
                    Ok(id) => match nodes.get(id) {
                        Some(child_node) => stack.push((Some(&node.file_id), *child_node, depth + 1)),
                        None => tracing::debug!(
                            transform = %node.file_id,
                            child = %id,
                            "child transform not in scene, skipped"
                        ),
                    },
                    Err(unresolved) => tracing::debug!(
                        transform = %node.file_id,
                        %unresolved,
                        "unresolved child reference, skipped"
                    ),
                }
            }
        }
    }

    Hierarchy { lines, faults }
}

fn owner_name(node: &TransformRecord, objects: &HashMap<&FileId, &GameObjectRecord>) -> Option<String> {
    match &node.game_object {
        Ok(id) => {
            let owner = objects.get(id);
            if owner.is_none() {
                tracing::debug!(transform = %node.file_id, game_object = %id, "owning game object not found");
            }
            owner.and_then(|g| g.name.clone())
        }
        Err(unresolved) => {
            tracing::debug!(transform = %node.file_id, %unresolved, "unresolved game object reference");
            None
        }
    }
}
