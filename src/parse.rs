use scraper::{ElementRef, Html, Selector};

use crate::table::{Cell, NormalizedTable, RawTable, ARTIFACT_MARKER};
use crate::{Error, Result};

/// Parses a leaderboard page and returns the normalized table for `year`.
/// The table with the most `<th>` cells wins, the first one on a tie.
/// `url` is only used for error reporting.
pub fn parse_year_table(html: &str, year: u16, url: &str) -> Result<NormalizedTable> {
    let doc = Html::parse_document(html);

    let table_selector = create_selector("table")?;
    let th_selector = create_selector("th")?;

    let widest = select_widest(doc.select(&table_selector), &th_selector).ok_or_else(|| {
        Error::NotFound {
            year,
            url: url.to_string(),
        }
    })?;

    let raw = table_to_raw(widest).map_err(|reason| Error::parse(year, reason))?;
    NormalizedTable::from_raw(raw, year).map_err(|reason| Error::parse(year, reason))
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}

fn select_widest<'a>(
    tables: impl Iterator<Item = ElementRef<'a>>,
    th_selector: &Selector,
) -> Option<ElementRef<'a>> {
    let mut widest: Option<(usize, ElementRef<'a>)> = None;
    for table in tables {
        let th_count = table.select(th_selector).count();
        // strictly greater, so the earlier table keeps a tie
        if widest.as_ref().map_or(true, |(best, _)| th_count > *best) {
            widest = Some((th_count, table));
        }
    }
    widest.map(|(_, table)| table)
}

struct Row {
    in_thead: bool,
    all_th: bool,
    cells: Vec<Cell>,
}

/// Converts a `<table>` into headers + rows.
/// Returns the reason as a `String` when the table can't be used.
fn table_to_raw(table: ElementRef) -> core::result::Result<RawTable, String> {
    let rows: Vec<Row> = own_rows(table)
        .map(|tr| {
            let (cells, all_th) = row_cells(tr);
            Row {
                in_thead: inside_thead(tr),
                all_th,
                cells,
            }
        })
        .filter(|row| !row.cells.is_empty())
        .collect();

    let header_len = if rows.iter().any(|r| r.in_thead) {
        rows.iter().take_while(|r| r.in_thead).count()
    } else {
        rows.iter().take_while(|r| r.all_th).count()
    };
    let (header_rows, body_rows) = rows.split_at(header_len);

    if body_rows.is_empty() {
        return Err("table has no body rows".into());
    }

    // With several header rows the last one is the most specific.
    let headers: Vec<String> = match header_rows.last() {
        Some(row) => row
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                cell.clone()
                    .unwrap_or_else(|| format!("{ARTIFACT_MARKER}: {i}"))
            })
            .collect(),
        None => {
            let width = body_rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
            (0..width).map(|i| i.to_string()).collect()
        }
    };
    let headers = dedup_headers(headers);
    let width = headers.len();

    let mut out = Vec::with_capacity(body_rows.len());
    for (i, row) in body_rows.iter().enumerate() {
        if row.cells.len() > width {
            return Err(format!(
                "row {i} has {} cells but the header has {width}",
                row.cells.len()
            ));
        }
        let mut cells = row.cells.clone();
        cells.resize(width, None);
        out.push(cells);
    }

    Ok(RawTable { headers, rows: out })
}

/// Repeated names get a `.N` suffix (`Stats`, `Stats.1`, `Stats.2`), skipping any name already taken.
fn dedup_headers(headers: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(headers.len());
    for name in headers {
        if !out.contains(&name) {
            out.push(name);
            continue;
        }
        let mut n = 1;
        let mut candidate = format!("{name}.{n}");
        while out.contains(&candidate) {
            n += 1;
            candidate = format!("{name}.{n}");
        }
        out.push(candidate);
    }
    out
}

/// `<tr>` elements that belong to `table` itself, not to a table nested inside it.
fn own_rows<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    let table_id = table.id();
    table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
        .filter(move |tr| {
            tr.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|el| el.value().name() == "table")
                .map(|t| t.id())
                == Some(table_id)
        })
}

fn inside_thead(tr: ElementRef) -> bool {
    tr.ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|el| el.value().name() != "table")
        .any(|el| el.value().name() == "thead")
}

/// Cells of a row with `colspan` expanded, and whether every cell was a `<th>`.
fn row_cells(tr: ElementRef) -> (Vec<Cell>, bool) {
    let mut cells = Vec::new();
    let mut all_th = true;
    for cell in tr.children().filter_map(ElementRef::wrap) {
        let name = cell.value().name();
        if name != "th" && name != "td" {
            continue;
        }
        all_th &= name == "th";

        let span = cell
            .value()
            .attr("colspan")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);
        let text = cell_text(cell);
        cells.extend(std::iter::repeat(text).take(span));
    }
    (cells, all_th)
}

/// Whitespace collapsed and trimmed. Empty text is a missing value.
fn cell_text(cell: ElementRef) -> Cell {
    let text = cell
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/ppr.php?year=2020";

    fn raw_of(html: &str) -> core::result::Result<RawTable, String> {
        let doc = Html::parse_document(html);
        let table_sel = create_selector("table").unwrap();
        let th_sel = create_selector("th").unwrap();
        let table = select_widest(doc.select(&table_sel), &th_sel).unwrap();
        table_to_raw(table)
    }

    #[test]
    fn leaderboard_page_is_normalized() {
        let html = r#"
            <html><body>
              <table id="nav"><tr><th>Menu</th></tr><tr><td>Home</td></tr></table>
              <table id="data">
                <thead>
                  <tr><th>Rank</th><th>Player</th><th>Tm</th><th>Pos</th><th>FPTS</th><th>FPTS/G</th><th>GP</th></tr>
                </thead>
                <tbody>
                  <tr><td>1</td><td><a href="/p/1">Christian  McCaffrey</a></td><td>SF</td><td>RB</td><td>391.3</td><td>24.5</td><td>16</td></tr>
                  <tr><td>2</td><td>CeeDee Lamb</td><td>DAL</td><td>WR</td><td>403.2</td><td>23.7</td><td>17</td></tr>
                </tbody>
              </table>
            </body></html>"#;

        let table = parse_year_table(html, 2023, URL).unwrap();

        assert_eq!(
            table.columns(),
            ["Year", "Rank", "Player", "Team", "Pos", "Points", "Points/G", "Games"]
        );
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[0][2].as_deref(), Some("Christian McCaffrey"));
        assert!(table
            .rows()
            .iter()
            .all(|r| r[0].as_deref() == Some("2023")));
    }

    #[test]
    fn no_table_is_not_found() {
        let err = parse_year_table("<html><p>maintenance</p></html>", 2020, URL).unwrap_err();
        match err {
            Error::NotFound { year, url } => {
                assert_eq!(year, 2020);
                assert_eq!(url, URL);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn tie_goes_to_first_table() {
        let html = r#"
            <table><tr><th>Player</th><th>Tm</th></tr><tr><td>First</td><td>A</td></tr></table>
            <table><tr><th>Player</th><th>Tm</th></tr><tr><td>Second</td><td>B</td></tr></table>"#;
        let raw = raw_of(html).unwrap();
        assert_eq!(raw.rows[0][0].as_deref(), Some("First"));
    }

    #[test]
    fn widest_table_wins_over_earlier_ones() {
        let html = r#"
            <table><tr><th>A</th></tr><tr><td>narrow</td></tr></table>
            <table><tr><th>A</th><th>B</th><th>C</th></tr><tr><td>wide</td><td>1</td><td>2</td></tr></table>"#;
        let raw = raw_of(html).unwrap();
        assert_eq!(raw.headers, ["A", "B", "C"]);
        assert_eq!(raw.rows[0][0].as_deref(), Some("wide"));
    }

    #[test]
    fn nested_table_rows_are_ignored() {
        let html = r#"
            <table>
              <tr><th>Player</th><th>Tm</th></tr>
              <tr><td>A<table><tr><td>x</td><td>y</td><td>z</td></tr></table></td><td>KC</td></tr>
            </table>"#;
        let raw = raw_of(html).unwrap();
        assert_eq!(raw.rows.len(), 1);
        assert_eq!(raw.rows[0][1].as_deref(), Some("KC"));
    }

    #[test]
    fn empty_header_cells_get_placeholder_names() {
        let html = r#"
            <table>
              <thead><tr><th></th><th>Player</th><th> </th></tr></thead>
              <tbody><tr><td>1</td><td>A</td><td>*</td></tr></tbody>
            </table>"#;
        let raw = raw_of(html).unwrap();
        assert_eq!(raw.headers, ["Unnamed: 0", "Player", "Unnamed: 2"]);
    }

    #[test]
    fn colspan_is_expanded_and_short_rows_padded() {
        let html = r#"
            <table>
              <tr><th>Player</th><th colspan="2">Stats</th></tr>
              <tr><td>A</td><td>1</td><td>2</td></tr>
              <tr><td>B</td></tr>
            </table>"#;
        let raw = raw_of(html).unwrap();
        assert_eq!(raw.headers, ["Player", "Stats", "Stats.1"]);
        assert_eq!(raw.rows[1], [Some("B".to_string()), None, None]);
    }

    #[test]
    fn repeated_headers_are_suffixed() {
        let headers = ["A", "B", "A", "A", "B.1", "B"]
            .map(String::from)
            .to_vec();
        assert_eq!(
            dedup_headers(headers),
            ["A", "B", "A.1", "A.2", "B.1", "B.2"]
        );
    }

    #[test]
    fn both_halves_of_a_spanned_header_keep_their_values() {
        let html = r#"
            <table>
              <tr><th>Player</th><th>Tm</th><th colspan="2">FPTS</th></tr>
              <tr><td>A</td><td>KC</td><td>10</td><td>20</td></tr>
            </table>"#;

        let table = parse_year_table(html, 2020, URL).unwrap();

        assert_eq!(table.columns(), ["Year", "Player", "Team", "Points", "FPTS.1"]);
        assert_eq!(
            table.rows()[0],
            ["2020", "A", "KC", "10", "20"].map(|c| Some(c.to_string()))
        );
    }

    #[test]
    fn last_header_row_names_columns() {
        let html = r#"
            <table>
              <thead>
                <tr><th colspan="2">Misc</th><th>Scoring</th></tr>
                <tr><th>Player</th><th>Pos</th><th>FPTS</th></tr>
              </thead>
              <tbody><tr><td>A</td><td>QB</td><td>5</td></tr></tbody>
            </table>"#;
        let raw = raw_of(html).unwrap();
        assert_eq!(raw.headers, ["Player", "Pos", "FPTS"]);
        assert_eq!(raw.rows.len(), 1);
    }

    #[test]
    fn headerless_table_gets_positional_names() {
        let html = "<table><tr><td>1</td><td>A</td></tr><tr><td>2</td><td>B</td></tr></table>";
        let raw = raw_of(html).unwrap();
        assert_eq!(raw.headers, ["0", "1"]);
        assert_eq!(raw.rows.len(), 2);
    }

    #[test]
    fn malformed_tables_are_parse_errors() {
        let too_wide = r#"
            <table>
              <tr><th>Player</th><th>Tm</th></tr>
              <tr><td>A</td><td>KC</td><td>extra</td></tr>
            </table>"#;
        let err = parse_year_table(too_wide, 2021, URL).unwrap_err();
        assert!(matches!(err, Error::Parse { year: 2021, .. }));

        let header_only = "<table><tr><th>Player</th><th>Tm</th></tr></table>";
        let err = parse_year_table(header_only, 2022, URL).unwrap_err();
        assert!(matches!(err, Error::Parse { year: 2022, .. }));
    }
}
