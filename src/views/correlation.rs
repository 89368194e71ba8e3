use crate::utils::require_columns;
use crate::views::error::ViewError;
use log::debug;
use polars::prelude::*;

/// Name of the label column in [`CorrelationMatrix::to_frame`].
pub const COL_LABEL: &str = "column";

/// Pairwise Pearson correlation between a set of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Correlation between `row` and `column`, `None` if either is not in the matrix.
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let row = self.columns.iter().position(|name| name == row)?;
        let column = self.columns.iter().position(|name| name == column)?;
        Some(self.values[row][column])
    }

    /// The matrix as a frame: a `column` label column followed by one `f64` column per input.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Column::new(COL_LABEL.into(), self.columns.clone()));
        for (idx, name) in self.columns.iter().enumerate() {
            let values: Vec<f64> = self.values.iter().map(|row| row[idx]).collect();
            columns.push(Column::new(name.as_str().into(), values));
        }
        DataFrame::new(columns)
    }
}

/// Pearson correlation of every pair of `columns`.
///
/// Each pair uses only the rows where both values are present. A pair with fewer
/// than two such rows, or where either side has zero variance, is `NaN`. The
/// diagonal is `1.0` for columns with nonzero variance.
pub fn correlation_matrix(df: &DataFrame, columns: &[&str]) -> Result<CorrelationMatrix, ViewError> {
    require_columns(df, "correlation", columns)?;
    debug!("Correlating {:?}", columns);

    let data = columns
        .iter()
        .map(|name| -> PolarsResult<Vec<Option<f64>>> {
            let values = df.column(name)?.cast(&DataType::Float64)?;
            let finite = values
                .f64()?
                .into_iter()
                .map(|value| value.filter(|v| v.is_finite()))
                .collect();
            Ok(finite)
        })
        .collect::<PolarsResult<Vec<_>>>()?;

    let size = columns.len();
    let mut values = vec![vec![f64::NAN; size]; size];
    for row in 0..size {
        for column in row..size {
            let r = pearson(&data[row], &data[column]);
            values[row][column] = r;
            values[column][row] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.iter().map(|name| name.to_string()).collect(),
        values,
    })
}

fn pearson(left: &[Option<f64>], right: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = left
        .iter()
        .zip(right)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    // Identical inputs are exactly 1 rather than 1 +- rounding
    if left == right {
        return 1.0;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}
