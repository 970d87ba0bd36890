//! In-memory tables: the raw grid pulled out of a page, the per-season
//! normalized table and the concatenated dataset that gets written out.

/// `None` marks a missing value.
pub type Cell = Option<String>;

pub const YEAR_COLUMN: &str = "Year";
/// Placeholder prefix given to header cells without any text.
pub const ARTIFACT_MARKER: &str = "Unnamed";

/// Source header -> canonical header. Exact, case-sensitive matches only.
const RENAME_MAP: [(&str, &str); 7] = [
    ("Player", "Player"),
    ("Tm", "Team"),
    ("Pos", "Pos"),
    ("FPTS", "Points"),
    ("FPTS/G", "Points/G"),
    ("GP", "Games"),
    ("G", "Games"),
];

#[inline]
pub fn canonical_name(header: &str) -> &str {
    RENAME_MAP
        .iter()
        .find(|(from, _)| *from == header)
        .map_or(header, |(_, to)| *to)
}

/// First free `name.N`, counting from 1.
fn suffixed(taken: &[String], name: &str) -> String {
    (1..)
        .map(|n| format!("{name}.{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}

#[inline]
fn is_missing(cell: &Cell) -> bool {
    cell.as_deref().map_or(true, |s| s.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTable {
    year: u16,
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl NormalizedTable {
    /// Turns a raw table into the season table:
    /// trimmed headers, a leading `Year` column, canonical names,
    /// and no rows with a missing second column.
    ///
    /// Returns a reason string when nothing usable is left, the caller attaches the year.
    pub fn from_raw(raw: RawTable, year: u16) -> Result<Self, String> {
        let year_cell = Some(year.to_string());

        let mut columns: Vec<String> = Vec::with_capacity(raw.headers.len() + 1);
        columns.push(YEAR_COLUMN.to_string());
        let mut keep = Vec::with_capacity(raw.headers.len() + 1);
        keep.push(true);

        for header in &raw.headers {
            let header = header.trim();
            let name = canonical_name(header);
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
                keep.push(true);
            } else if name != header {
                // Two source columns renamed onto the same canonical name
                // (`GP` and `G` both become `Games`). The first one wins.
                keep.push(false);
            } else {
                // A source column clashing with `Year` keeps its data under a suffixed name.
                columns.push(suffixed(&columns, name));
                keep.push(true);
            }
        }

        if columns.len() < 2 {
            return Err("table has no data columns".into());
        }

        let rows: Vec<Vec<Cell>> = raw
            .rows
            .into_iter()
            .map(|row| {
                std::iter::once(year_cell.clone())
                    .chain(row)
                    .chain(std::iter::repeat(None))
                    .zip(keep.iter())
                    .filter_map(|(cell, keep)| keep.then_some(cell))
                    .collect::<Vec<_>>()
            })
            .filter(|row| !row.get(1).map_or(true, is_missing))
            .collect();

        if rows.is_empty() {
            return Err("no rows left after dropping rows without a second column".into());
        }

        Ok(Self {
            year,
            columns,
            rows,
        })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }
}

/// Every scraped season stacked together, columns aligned by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Concatenates the tables in the given order.
    /// Column order is first appearance; rows missing a column get `None` there.
    pub fn concat(tables: Vec<NormalizedTable>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for name in &table.columns {
                if !columns.contains(name) {
                    columns.push(name.clone());
                }
            }
        }

        let total = tables.iter().map(|t| t.rows.len()).sum();
        let mut rows = Vec::with_capacity(total);
        for table in tables {
            let positions: Vec<Option<usize>> = columns
                .iter()
                .map(|name| table.columns.iter().position(|c| c == name))
                .collect();

            for mut row in table.rows {
                let aligned = positions
                    .iter()
                    .map(|pos| pos.and_then(|i| row.get_mut(i).and_then(Option::take)))
                    .collect();
                rows.push(aligned);
            }
        }

        Self { columns, rows }
    }

    /// Removes every column whose name carries the header-parsing placeholder.
    pub fn drop_artifact_columns(&mut self) {
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|c| !c.contains(ARTIFACT_MARKER))
            .collect();
        if keep.iter().all(|k| *k) {
            return;
        }

        let mut k = keep.iter();
        self.columns.retain(|_| *k.next().unwrap_or(&true));
        for row in &mut self.rows {
            let mut k = keep.iter();
            row.retain(|_| *k.next().unwrap_or(&true));
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Serializes the dataset as CSV: header row, no index column, missing cells empty.
    pub fn to_csv_bytes(&self) -> crate::Result<Vec<u8>> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
        }
        wtr.into_inner()
            .map_err(|e| crate::Error::Io(e.into_error()))
    }
}
