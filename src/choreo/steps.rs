use crate::foundation::error::{CastError, CastResult};

/// One display row of a step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Row<T> {
    /// New content for the row.
    Concrete(T),
    /// Keep whatever the row showed in the previous step.
    Unchanged,
    /// The row shows nothing in this step.
    Removed,
}

impl<T> From<T> for Row<T> {
    fn from(value: T) -> Self {
        Self::Concrete(value)
    }
}

impl<T> Row<T> {
    /// Map the concrete payload.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Row<U>, E> {
        Ok(match self {
            Self::Concrete(v) => Row::Concrete(f(v)?),
            Self::Unchanged => Row::Unchanged,
            Self::Removed => Row::Removed,
        })
    }
}

/// One evaluation step: rows stacked top to bottom, the last row being the top of the call stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step<T> {
    /// Rows in display order.
    pub rows: Vec<Row<T>>,
    /// Morph into the new rows (`true`) or swap them in instantly (`false`).
    pub transform: bool,
}

impl<T> Step<T> {
    /// Animated step.
    pub fn new(rows: impl IntoIterator<Item = Row<T>>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            transform: true,
        }
    }

    /// Instant step, used to regroup a formula without changing what it shows.
    pub fn cut(rows: impl IntoIterator<Item = Row<T>>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            transform: false,
        }
    }

    /// Map every concrete payload.
    pub fn try_map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<Step<U>, E> {
        Ok(Step {
            rows: self
                .rows
                .into_iter()
                .map(|r| r.try_map(&mut f))
                .collect::<Result<_, _>>()?,
            transform: self.transform,
        })
    }
}

/// What a step does to one row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowOp<H> {
    /// Draw a new object into an empty row.
    Appear {
        /// Row index.
        row: usize,
        /// New object.
        object: H,
    },
    /// Retire the row's object.
    Disappear {
        /// Row index.
        row: usize,
        /// Retired object.
        object: H,
    },
    /// Content-aware morph of the row's object into a new one.
    Morph {
        /// Row index.
        row: usize,
        /// Object leaving.
        from: H,
        /// Object arriving.
        to: H,
    },
    /// Instant swap without correspondence.
    Cut {
        /// Row index.
        row: usize,
        /// Object removed, if the row showed one.
        from: Option<H>,
        /// Object shown, if the row gets one.
        to: Option<H>,
    },
}

impl<H> RowOp<H> {
    /// Row the operation applies to.
    pub fn row(&self) -> usize {
        match self {
            Self::Appear { row, .. }
            | Self::Disappear { row, .. }
            | Self::Morph { row, .. }
            | Self::Cut { row, .. } => *row,
        }
    }
}

/// The running stack of displayed rows. `None` marks an empty row below a shown one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallStack<H> {
    rows: Vec<Option<H>>,
}

impl<H> Default for CallStack<H> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<H> CallStack<H> {
    /// Check that every `Unchanged` row of `step` has an object to keep.
    ///
    /// Lets callers reject a step before creating anything for its concrete rows.
    pub fn check<T>(&self, step: &Step<T>) -> CastResult<()> {
        let orphan = step.rows.iter().enumerate().find(|(row, entry)| {
            matches!(entry, Row::Unchanged) && !matches!(self.rows.get(*row), Some(Some(_)))
        });
        match orphan {
            Some((row, _)) => Err(CastError::choreography(format!(
                "row {row} is marked unchanged but the previous step shows nothing there"
            ))),
            None => Ok(()),
        }
    }
}

impl<H: Clone + PartialEq> CallStack<H> {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current rows.
    pub fn rows(&self) -> &[Option<H>] {
        &self.rows
    }

    /// Whether no row shows anything.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Diff `step` against the running stack and make it the new stack.
    ///
    /// On error the stack is left unchanged.
    pub fn apply(&mut self, step: Step<H>) -> CastResult<Vec<RowOp<H>>> {
        self.check(&step)?;
        let transform = step.transform;
        let mut next = Vec::with_capacity(step.rows.len());
        let mut ops = Vec::new();

        for (row, entry) in step.rows.into_iter().enumerate() {
            let prior = self.rows.get(row).cloned().flatten();
            match entry {
                Row::Concrete(object) => {
                    let op = match (prior, transform) {
                        (None, true) => RowOp::Appear {
                            row,
                            object: object.clone(),
                        },
                        (Some(from), true) => RowOp::Morph {
                            row,
                            from,
                            to: object.clone(),
                        },
                        (from, false) => RowOp::Cut {
                            row,
                            from,
                            to: Some(object.clone()),
                        },
                    };
                    ops.push(op);
                    next.push(Some(object));
                }
                Row::Unchanged => next.push(prior),
                Row::Removed => {
                    if let Some(object) = prior {
                        ops.push(retire(row, object, transform));
                    }
                    next.push(None);
                }
            }
        }

        for (row, prior) in self.rows.iter().enumerate().skip(next.len()) {
            if let Some(object) = prior {
                ops.push(retire(row, object.clone(), transform));
            }
        }

        while matches!(next.last(), Some(None)) {
            next.pop();
        }
        self.rows = next;
        Ok(ops)
    }

    /// Empty the stack, returning one Disappear per shown row.
    pub fn teardown(&mut self) -> Vec<RowOp<H>> {
        std::mem::take(&mut self.rows)
            .into_iter()
            .enumerate()
            .filter_map(|(row, o)| o.map(|object| RowOp::Disappear { row, object }))
            .collect()
    }
}

fn retire<H>(row: usize, object: H, transform: bool) -> RowOp<H> {
    if transform {
        RowOp::Disappear { row, object }
    } else {
        RowOp::Cut {
            row,
            from: Some(object),
            to: None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/choreo/steps.rs"]
mod tests;
