//! Parsing of CATMAID skeleton exports into an [`Arbor`] plus synapse counts.
//!
//! Both exports are JSON arrays whose first element lists the skeleton nodes as
//! `[node, parent | null, user, x, y, z, ...]` rows and whose third element, when present, maps
//! tag names to tagged nodes. They differ in the second element:
//!
//! - `compact-skeleton`: connector rows `[node, connector, type, ...]`, type 0 for an output
//!   (presynaptic) and 1 for an input (postsynaptic). Other types are not synaptic and skipped.
//! - `compact-arbor`: synapse rows with the node at index 0, the connector at 2, the partner
//!   skeleton at 5 and the type at 6.

use crate::arbor::{Arbor, HashMap};
use crate::error::{Error, Result};
use crate::Positions;
use nalgebra::Point3;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Tag name → tagged nodes.
pub type Tags = BTreeMap<String, Vec<u64>>;

pub const NOT_A_BRANCH_TAG: &str = "not a branch";
pub const SOMA_TAG: &str = "soma";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    CompactSkeleton,
    CompactArbor,
}

impl ExportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportKind::CompactSkeleton => "compact-skeleton",
            ExportKind::CompactArbor => "compact-arbor",
        }
    }
}

impl std::str::FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "compact-skeleton" => Ok(ExportKind::CompactSkeleton),
            "compact-arbor" => Ok(ExportKind::CompactArbor),
            other => Err(format!("unknown export kind: {other}")),
        }
    }
}

/// A parsed skeleton: its arbor, node positions and per-node synapse counts.
#[derive(Debug, Clone, Default)]
pub struct ArborParser {
    pub arbor: Arbor<u64>,
    pub positions: Positions<u64>,
    pub inputs: HashMap<u64, u32>,
    pub outputs: HashMap<u64, u32>,
    pub n_inputs: Option<u64>,
    /// Number of postsynaptic targets of the output connectors (compact-arbor only).
    pub n_outputs: Option<u64>,
    /// Number of output connectors (compact-skeleton only).
    pub n_presynaptic_sites: Option<u64>,
    pub input_partners: BTreeSet<u64>,
    pub output_partners: BTreeSet<u64>,
    pub n_input_connectors: Option<usize>,
    pub n_output_connectors: Option<usize>,
}

impl ArborParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole export. Returns the parser and the tags, empty when the export has none.
    pub fn init(kind: ExportKind, json: &Value) -> Result<(Self, Tags)> {
        let parts = json.as_array().ok_or(Error::NotAnExport)?;
        let rows = |i: usize| -> Result<&[Value]> {
            match parts.get(i) {
                None | Some(Value::Null) => Ok(&[]),
                Some(Value::Array(rows)) => Ok(rows.as_slice()),
                Some(_) => Err(Error::NotAnExport),
            }
        };

        let mut parser = Self::new();
        parser.tree(rows(0)?)?;
        match kind {
            ExportKind::CompactSkeleton => parser.connectors(rows(1)?)?,
            ExportKind::CompactArbor => parser.synapses(rows(1)?, false)?,
        };
        let tags = match parts.get(2) {
            None | Some(Value::Null) => Tags::new(),
            Some(v) => serde_json::from_value(v.clone())?,
        };
        tracing::debug!(
            kind = kind.as_str(),
            nodes = parser.arbor.count_nodes(),
            inputs = parser.inputs.len(),
            outputs = parser.outputs.len(),
            "parsed skeleton"
        );
        Ok((parser, tags))
    }

    /// Read skeleton rows. A row without parent (or with parent 0) is the root.
    pub fn tree(&mut self, rows: &[Value]) -> Result<&mut Self> {
        let mut arbor = Arbor::new();
        let mut positions: Positions<u64> = HashMap::default();
        let mut root: Option<u64> = None;

        for (index, row) in rows.iter().enumerate() {
            let row = Row::new("node", index, row)?;
            let node = row.id(0)?;
            match row.optional_id(1)?.filter(|&p| p != 0) {
                Some(parent) => {
                    arbor.set_edge(node, parent);
                }
                None => {
                    if let Some(first) = root {
                        return Err(Error::MultipleRoots {
                            first,
                            second: node,
                        });
                    }
                    root = Some(node);
                }
            }
            positions.insert(
                node,
                Point3::new(row.coord(3)?, row.coord(4)?, row.coord(5)?),
            );
        }

        match root {
            Some(root) => {
                arbor.set_root(root);
            }
            None if !rows.is_empty() => return Err(Error::MissingRoot),
            None => {}
        }

        self.arbor = arbor;
        self.positions = positions;
        Ok(self)
    }

    /// Read compact-skeleton connector rows.
    pub fn connectors(&mut self, rows: &[Value]) -> Result<&mut Self> {
        let mut outputs: HashMap<u64, u32> = HashMap::default();
        let mut inputs: HashMap<u64, u32> = HashMap::default();
        let (mut n_pre, mut n_post) = (0u64, 0u64);

        for (index, row) in rows.iter().enumerate() {
            let row = Row::new("connector", index, row)?;
            let counts = match row.value(2).and_then(Value::as_u64) {
                Some(0) => {
                    n_pre += 1;
                    &mut outputs
                }
                Some(1) => {
                    n_post += 1;
                    &mut inputs
                }
                _ => continue,
            };
            *counts.entry(row.id(0)?).or_insert(0) += 1;
        }

        self.n_presynaptic_sites = Some(n_pre);
        self.n_inputs = Some(n_post);
        self.outputs = outputs;
        self.inputs = inputs;
        Ok(self)
    }

    /// Read compact-arbor synapse rows. With `only_in_arbor`, synapses on nodes outside the
    /// arbor are skipped.
    pub fn synapses(&mut self, rows: &[Value], only_in_arbor: bool) -> Result<&mut Self> {
        #[derive(Default)]
        struct Side {
            counts: HashMap<u64, u32>,
            total: u64,
            partners: BTreeSet<u64>,
            connectors: BTreeSet<u64>,
        }
        let mut sides = [Side::default(), Side::default()];

        for (index, row) in rows.iter().enumerate() {
            let row = Row::new("synapse", index, row)?;
            let side = match row.value(6).and_then(Value::as_u64) {
                Some(t @ (0 | 1)) => &mut sides[t as usize],
                _ => continue,
            };
            let node = row.id(0)?;
            if only_in_arbor && !self.arbor.contains(node) {
                continue;
            }
            *side.counts.entry(node).or_insert(0) += 1;
            side.total += 1;
            side.partners.insert(row.id(5)?);
            side.connectors.insert(row.id(2)?);
        }

        let [output, input] = sides;
        self.n_outputs = Some(output.total);
        self.n_inputs = Some(input.total);
        self.n_output_connectors = Some(output.connectors.len());
        self.n_input_connectors = Some(input.connectors.len());
        self.output_partners = output.partners;
        self.input_partners = input.partners;
        self.outputs = output.counts;
        self.inputs = input.counts;
        Ok(self)
    }

    /// Inputs plus outputs per node.
    pub fn create_synapse_map(&self) -> HashMap<u64, u32> {
        let mut synapses = self.inputs.clone();
        for (&node, &n) in &self.outputs {
            *synapses.entry(node).or_insert(0) += n;
        }
        synapses
    }

    /// Remove terminal branches whose end node is tagged "not a branch", moving their synapses
    /// to the branch node they hang from (the root for an unbranched arbor).
    pub fn collapse_artifactual_branches(&mut self, tags: &Tags) -> &mut Self {
        let Some(tagged) = tags.get(NOT_A_BRANCH_TAG) else {
            return self;
        };
        let tagged: BTreeSet<u64> = tagged.iter().copied().collect();
        let be = self.arbor.find_branch_and_end_nodes();
        let mut collapsed = 0usize;

        for &end in be.ends.iter().filter(|end| tagged.contains(end)) {
            let (mut n_inputs, mut n_outputs) = (0u32, 0u32);
            let mut node = Some(end);
            while let Some(current) = node.filter(|&n| !be.is_branch(n)) {
                n_inputs += self.inputs.remove(&current).unwrap_or(0);
                n_outputs += self.outputs.remove(&current).unwrap_or(0);
                node = self.arbor.remove_edge(current);
            }
            let Some(target) = node.or(self.arbor.root()) else {
                continue;
            };
            if n_inputs > 0 {
                *self.inputs.entry(target).or_insert(0) += n_inputs;
            }
            if n_outputs > 0 {
                *self.outputs.entry(target).or_insert(0) += n_outputs;
            }
            collapsed += 1;
        }

        tracing::debug!(collapsed, "collapsed artifactual branches");
        self
    }

    /// Reroot at the node tagged "soma" when exactly one node carries the tag.
    pub fn reroot_at_soma(&mut self, tags: &Tags) -> &mut Self {
        if let Some([soma]) = tags.get(SOMA_TAG).map(Vec::as_slice) {
            if self.arbor.root() != Some(*soma) && self.arbor.contains(*soma) {
                tracing::debug!(soma, "rerooting at soma");
                self.arbor.reroot(*soma);
            }
        }
        self
    }
}

/// One row of an export table, with the context needed for error messages.
struct Row<'a> {
    table: &'static str,
    index: usize,
    cells: &'a [Value],
}

impl<'a> Row<'a> {
    fn new(table: &'static str, index: usize, value: &'a Value) -> Result<Self> {
        let cells = value.as_array().ok_or_else(|| Error::MalformedRow {
            table,
            index,
            message: "not an array".to_string(),
        })?;
        Ok(Self {
            table,
            index,
            cells,
        })
    }

    fn value(&self, column: usize) -> Option<&'a Value> {
        self.cells.get(column)
    }

    fn malformed(&self, message: String) -> Error {
        Error::MalformedRow {
            table: self.table,
            index: self.index,
            message,
        }
    }

    fn id(&self, column: usize) -> Result<u64> {
        self.optional_id(column)?
            .ok_or_else(|| self.malformed(format!("missing ID in column {column}")))
    }

    fn optional_id(&self, column: usize) -> Result<Option<u64>> {
        match self.value(column) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v
                .as_u64()
                .map(Some)
                .ok_or_else(|| self.malformed(format!("column {column} is not an ID: {v}"))),
        }
    }

    fn coord(&self, column: usize) -> Result<f64> {
        self.value(column)
            .and_then(Value::as_f64)
            .ok_or_else(|| self.malformed(format!("column {column} is not a coordinate")))
    }
}
