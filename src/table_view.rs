//! A representation of tables as title row and body rows of strings,
//! independent of serialisation format (terminal, CSV).

use std::borrow::Cow;

pub type TableViewRows<'s> = Box<dyn Iterator<Item = Vec<Cow<'s, str>>> + 's>;

/// A full table. dyn compatible.
pub trait TableView {
    fn table_name(&self) -> Cow<'_, str>;

    /// Column names, including the one for the key column.
    fn table_view_header(&self) -> Vec<Cow<'_, str>>;

    /// Each row has the same number of entries as the header.
    fn table_view_body(&self) -> TableViewRows<'_>;
}
