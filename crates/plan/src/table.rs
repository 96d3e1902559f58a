use crate::errors::{PlanError, Result};
use ndarray::{Array1, Axis};
use std::fmt;

/// Values of one factor over all the runs of a design
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    /// Values of a linear or log factor
    Numbers(Array1<f64>),
    /// Option labels of a categorical factor
    Labels(Vec<String>),
}

impl Column {
    /// Number of values
    pub fn len(&self) -> usize {
        match self {
            Column::Numbers(v) => v.len(),
            Column::Labels(v) => v.len(),
        }
    }

    /// Whether the column holds no value
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at the given row
    pub fn get(&self, row: usize) -> Option<Value<'_>> {
        match self {
            Column::Numbers(v) => v.get(row).map(|&x| Value::Number(x)),
            Column::Labels(v) => v.get(row).map(|s| Value::Label(s)),
        }
    }

    fn select(&self, rows: &[usize]) -> Column {
        match self {
            Column::Numbers(v) => Column::Numbers(v.select(Axis(0), rows)),
            Column::Labels(v) => Column::Labels(rows.iter().map(|&i| v[i].clone()).collect()),
        }
    }
}

/// A cell of a design table
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value<'a> {
    /// Numerical value in the factor real domain
    Number(f64),
    /// Categorical option label
    Label(&'a str),
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(x) => write!(f, "{x}"),
            Value::Label(s) => write!(f, "{s}"),
        }
    }
}

/// Experiment plan: one row per run, one named column per factor
#[derive(Clone, Debug, PartialEq)]
pub struct DesignTable {
    names: Vec<String>,
    columns: Vec<Column>,
    nrows: usize,
}

impl DesignTable {
    /// Assembles a table, every column must have the same number of rows
    pub(crate) fn new(names: Vec<String>, columns: Vec<Column>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(PlanError::InvalidConfig(format!(
                "{} column names for {} columns",
                names.len(),
                columns.len()
            )));
        }
        let nrows = columns.first().map_or(0, Column::len);
        if let Some((name, col)) = names
            .iter()
            .zip(&columns)
            .find(|(_, col)| col.len() != nrows)
        {
            return Err(PlanError::InvalidConfig(format!(
                "column '{name}' has {} rows, expected {nrows}",
                col.len()
            )));
        }
        Ok(DesignTable {
            names,
            columns,
            nrows,
        })
    }

    /// Number of runs
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of factors
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Column names, i.e. factor names in declaration order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Column of the given factor
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|j| &self.columns[j])
    }

    /// Numerical values of the given factor, `None` if unknown or categorical
    pub fn numbers(&self, name: &str) -> Option<&Array1<f64>> {
        match self.column(name)? {
            Column::Numbers(v) => Some(v),
            Column::Labels(_) => None,
        }
    }

    /// Labels of the given factor, `None` if unknown or numerical
    pub fn labels(&self, name: &str) -> Option<&[String]> {
        match self.column(name)? {
            Column::Labels(v) => Some(v),
            Column::Numbers(_) => None,
        }
    }

    /// Cell at the given run for the given factor
    pub fn value(&self, row: usize, name: &str) -> Option<Value<'_>> {
        self.column(name)?.get(row)
    }

    /// Cells of the given run in column order
    pub fn row(&self, row: usize) -> Option<Vec<Value<'_>>> {
        if row >= self.nrows {
            return None;
        }
        self.columns.iter().map(|c| c.get(row)).collect()
    }

    /// Iterator over the runs
    pub fn rows(&self) -> impl Iterator<Item = Vec<Value<'_>>> + '_ {
        (0..self.nrows).filter_map(move |i| self.row(i))
    }

    /// Table with runs reordered (or subset) by the given row indices
    pub(crate) fn select_rows(&self, rows: &[usize]) -> DesignTable {
        DesignTable {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.select(rows)).collect(),
            nrows: rows.len(),
        }
    }
}

impl fmt::Display for DesignTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.names.join("\t"))?;
        for row in self.rows() {
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn table() -> DesignTable {
        DesignTable::new(
            vec!["A".to_string(), "B".to_string()],
            vec![
                Column::Numbers(array![0., 5., 10.]),
                Column::Labels(vec!["x".into(), "y".into(), "x".into()]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_access() {
        let t = table();
        assert_eq!((t.nrows(), t.ncols()), (3, 2));
        assert_eq!(t.names(), ["A", "B"]);
        assert_eq!(t.value(1, "A"), Some(Value::Number(5.)));
        assert_eq!(t.value(1, "B"), Some(Value::Label("y")));
        assert_eq!(t.value(3, "A"), None);
        assert_eq!(t.value(0, "C"), None);
        assert_eq!(t.numbers("A").unwrap(), &array![0., 5., 10.]);
        assert!(t.numbers("B").is_none());
        assert_eq!(t.labels("B").unwrap(), ["x", "y", "x"]);
        assert_eq!(t.rows().count(), 3);
        assert_eq!(t.row(2).unwrap(), vec![Value::Number(10.), Value::Label("x")]);
    }

    #[test]
    fn test_select_rows() {
        let t = table().select_rows(&[2, 0, 1]);
        assert_eq!(t.numbers("A").unwrap(), &array![10., 0., 5.]);
        assert_eq!(t.labels("B").unwrap(), ["x", "x", "y"]);
    }

    #[test]
    fn test_ragged_columns() {
        let t = DesignTable::new(
            vec!["A".to_string(), "B".to_string()],
            vec![
                Column::Numbers(array![0., 1.]),
                Column::Labels(vec!["x".into()]),
            ],
        );
        assert!(t.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(table().to_string(), "A\tB\n0\tx\n5\ty\n10\tx\n");
    }
}
