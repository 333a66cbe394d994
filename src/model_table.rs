//! A square matrix indexed by model × model. Rows are the best-effort
//! (BE) model, columns the high-priority (HP) model; the diagonal (a
//! model paired with itself) holds regular values.

use std::{borrow::Cow, fmt::Display};

use crate::{
    model_name::ModelName,
    table_view::{TableView, TableViewRows},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ModelTable<T> {
    models: Vec<ModelName>,
    /// Row-major, `models.len()` squared entries
    cells: Vec<T>,
}

impl<T> ModelTable<T> {
    /// Build the table by calling `f(be, hp)` for every cell, row by
    /// row.
    pub fn from_fn(models: &[ModelName], mut f: impl FnMut(&ModelName, &ModelName) -> T) -> Self {
        let mut cells = Vec::with_capacity(models.len() * models.len());
        for be in models {
            for hp in models {
                cells.push(f(be, hp));
            }
        }
        Self {
            models: models.to_owned(),
            cells,
        }
    }

    /// Like `from_fn` but `f` receives the (row, column) indices.
    pub fn from_index_fn(models: &[ModelName], mut f: impl FnMut(usize, usize) -> T) -> Self {
        let n = models.len();
        let cells = (0..n * n).map(|i| f(i / n, i % n)).collect();
        Self {
            models: models.to_owned(),
            cells,
        }
    }

    /// Like `from_fn`, stopping at the first error.
    pub fn try_from_fn<E>(
        models: &[ModelName],
        mut f: impl FnMut(&ModelName, &ModelName) -> Result<T, E>,
    ) -> Result<Self, E> {
        let mut cells = Vec::with_capacity(models.len() * models.len());
        for be in models {
            for hp in models {
                cells.push(f(be, hp)?);
            }
        }
        Ok(Self {
            models: models.to_owned(),
            cells,
        })
    }

    /// `cells` must be row-major and have `models.len()` squared
    /// entries, or None is returned.
    pub fn from_cells(models: Vec<ModelName>, cells: Vec<T>) -> Option<Self> {
        if cells.len() == models.len() * models.len() {
            Some(Self { models, cells })
        } else {
            None
        }
    }

    pub fn models(&self) -> &[ModelName] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn index_of(&self, model: &ModelName) -> Option<usize> {
        self.models.iter().position(|m| m == model)
    }

    /// Panics if `row` or `col` are out of range.
    pub fn at(&self, row: usize, col: usize) -> &T {
        let n = self.len();
        assert!(row < n && col < n, "index ({row}, {col}) out of range {n}");
        &self.cells[row * n + col]
    }

    pub fn get(&self, be: &ModelName, hp: &ModelName) -> Option<&T> {
        let row = self.index_of(be)?;
        let col = self.index_of(hp)?;
        Some(self.at(row, col))
    }

    pub fn row(&self, row: usize) -> &[T] {
        let n = self.len();
        &self.cells[row * n..(row + 1) * n]
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = &T> + '_ {
        (0..self.len()).map(move |row| self.at(row, col))
    }

    pub fn rows(&self) -> impl Iterator<Item = (&ModelName, &[T])> + '_ {
        self.models
            .iter()
            .enumerate()
            .map(|(i, model)| (model, self.row(i)))
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> ModelTable<U> {
        ModelTable {
            models: self.models.clone(),
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// Combine two tables over the same models cell by cell. None if
    /// the model lists differ.
    pub fn zip_with<U, V>(
        &self,
        other: &ModelTable<U>,
        mut f: impl FnMut(&T, &U) -> V,
    ) -> Option<ModelTable<V>> {
        if self.models != other.models {
            return None;
        }
        Some(ModelTable {
            models: self.models.clone(),
            cells: self
                .cells
                .iter()
                .zip(&other.cells)
                .map(|(a, b)| f(a, b))
                .collect(),
        })
    }
}

/// A `ModelTable` with a name, for display and serialisation.
pub struct NamedModelTable<'t, T> {
    pub name: Cow<'t, str>,
    pub table: &'t ModelTable<T>,
}

impl<'t, T: Display> TableView for NamedModelTable<'t, T> {
    fn table_name(&self) -> Cow<'_, str> {
        self.name.as_ref().into()
    }

    fn table_view_header(&self) -> Vec<Cow<'_, str>> {
        // The key column is unlabeled
        let mut header: Vec<Cow<str>> = vec!["".into()];
        header.extend(self.table.models().iter().map(|m| Cow::from(m.as_str())));
        header
    }

    fn table_view_body(&self) -> TableViewRows<'_> {
        Box::new(self.table.rows().map(|(model, cells)| {
            let mut row: Vec<Cow<str>> = Vec::with_capacity(cells.len() + 1);
            row.push(model.as_str().into());
            row.extend(cells.iter().map(|c| Cow::from(c.to_string())));
            row
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn models() -> Vec<ModelName> {
        ["A", "B", "C"].iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn t_orientation() {
        let models = models();
        let table = ModelTable::from_fn(&models, |be, hp| format!("{be}{hp}"));
        // rows are BE, columns HP
        assert_eq!(table.at(0, 1), "AB");
        assert_eq!(table.get(&models[2], &models[0]).unwrap(), "CA");
        assert_eq!(table.row(1), ["BA", "BB", "BC"]);
        let col: Vec<_> = table.column(2).cloned().collect();
        assert_eq!(col, ["AC", "BC", "CC"]);

        let by_index = ModelTable::from_index_fn(&models, |row, col| {
            format!("{}{}", models[row], models[col])
        });
        assert_eq!(by_index, table);
    }

    #[test]
    fn t_try_from_fn_stops_at_error() {
        let models = models();
        let mut calls = 0;
        let r: Result<ModelTable<()>, &str> = ModelTable::try_from_fn(&models, |be, _hp| {
            calls += 1;
            if be.as_str() == "B" {
                Err("fail")
            } else {
                Ok(())
            }
        });
        assert_eq!(r, Err("fail"));
        assert_eq!(calls, 4);
    }

    #[test]
    fn t_zip_with() {
        let models = models();
        let a = ModelTable::from_fn(&models, |_, _| 6.);
        let b = ModelTable::from_fn(&models, |_, _| 3.);
        let c = a.zip_with(&b, |x, y| x / y).unwrap();
        assert!(c.column(0).all(|v| *v == 2.));

        let other = ModelTable::from_fn(&models[..2], |_, _| 1.);
        assert!(a.zip_with(&other, |x, y| x + y).is_none());
    }

    #[test]
    fn t_from_cells() {
        assert!(ModelTable::from_cells(models(), vec![0; 9]).is_some());
        assert!(ModelTable::from_cells(models(), vec![0; 8]).is_none());
    }

    #[test]
    fn t_table_view() {
        let models = models();
        let table = ModelTable::from_fn(&models, |be, hp| format!("{be}/{hp}"));
        let view = NamedModelTable {
            name: "test".into(),
            table: &table,
        };
        assert_eq!(view.table_view_header(), ["", "A", "B", "C"]);
        let body: Vec<Vec<String>> = view
            .table_view_body()
            .map(|row| row.into_iter().map(|s| s.into_owned()).collect())
            .collect();
        assert_eq!(body[1], ["B", "B/A", "B/B", "B/C"]);
    }
}
