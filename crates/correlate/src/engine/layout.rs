use crate::{Error, Result};
use correlate_core::stmt::{Value, ValueRecord};

use std::ops::Range;

/// Column positions of a correlated query's result rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RowLayout {
    /// View-root id of the primary row a sub-select row was joined through
    pub(crate) discriminator: Option<usize>,

    /// Parent id, when it is not the batched key
    pub(crate) parent: Option<usize>,

    /// The key the row correlates to. Absent when a query binds one key.
    pub(crate) key: Option<usize>,

    /// Map key
    pub(crate) index: Option<usize>,

    /// Columns making up the correlated element
    pub(crate) elements: Range<usize>,

    /// Assemble the element columns into a record
    pub(crate) subview: bool,
}

/// One result row split into its parts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResultRow {
    pub(crate) discriminator: Option<Value>,
    pub(crate) parent: Option<Value>,
    pub(crate) key: Option<Value>,
    pub(crate) index: Option<Value>,
    pub(crate) element: Value,
}

/// Appends columns to a layout in select order.
#[derive(Debug, Default)]
pub(crate) struct LayoutBuilder {
    width: usize,
    layout: Option<RowLayout>,
}

impl RowLayout {
    pub(crate) fn builder() -> LayoutBuilder {
        LayoutBuilder::default()
    }

    pub(crate) fn width(&self) -> usize {
        self.elements.end
    }

    pub(crate) fn split(&self, row: Value) -> Result<ResultRow> {
        let Value::Record(record) = row else {
            return Err(Error::invalid_result(format!(
                "expected a record of {} fields; actual={row:?}",
                self.width()
            )));
        };

        if record.len() != self.width() {
            return Err(Error::invalid_result(format!(
                "expected {} fields, got {}",
                self.width(),
                record.len()
            )));
        }

        let mut fields = record.into_vec();

        // The parent may share the discriminator's column
        let parent = self.parent.map(|i| fields[i].clone().into_key());

        let mut take = |column: Option<usize>| column.map(|i| fields[i].take());

        let discriminator = take(self.discriminator);
        let key = take(self.key).map(Value::into_key);
        let index = take(self.index);

        let element = if self.subview {
            let fields: ValueRecord = fields.drain(self.elements.clone()).collect();

            if fields.first().is_none_or(Value::is_null) {
                Value::Null
            } else {
                Value::Record(fields)
            }
        } else {
            fields[self.elements.start].take()
        };

        Ok(ResultRow {
            discriminator,
            parent,
            key,
            index,
            element,
        })
    }
}

impl LayoutBuilder {
    fn next(&mut self) -> usize {
        let column = self.width;
        self.width += 1;
        column
    }

    fn layout(&mut self) -> &mut RowLayout {
        let elements = self.width..self.width;
        self.layout.get_or_insert_with(|| RowLayout {
            discriminator: None,
            parent: None,
            key: None,
            index: None,
            elements,
            subview: false,
        })
    }

    pub(crate) fn discriminator(&mut self) -> &mut Self {
        let column = self.next();
        self.layout().discriminator = Some(column);
        self
    }

    /// Reads the parent from an already added column.
    pub(crate) fn parent_at(&mut self, column: usize) -> &mut Self {
        assert!(column < self.width, "parent column {column} not selected");
        self.layout().parent = Some(column);
        self
    }

    pub(crate) fn parent(&mut self) -> &mut Self {
        let column = self.next();
        self.parent_at(column)
    }

    pub(crate) fn key(&mut self) -> &mut Self {
        let column = self.next();
        self.layout().key = Some(column);
        self
    }

    pub(crate) fn index(&mut self) -> &mut Self {
        let column = self.next();
        self.layout().index = Some(column);
        self
    }

    /// Finishes the layout with `count` element columns.
    pub(crate) fn elements(&mut self, count: usize, subview: bool) -> RowLayout {
        assert!(count > 0, "a correlated row selects at least one element column");

        let start = self.width;
        let mut layout = self.layout().clone();
        layout.elements = start..start + count;
        layout.subview = subview;
        layout
    }
}
