//! Table builders for the statement pages.
//!
//! These map aggregate views onto [`TableElement`]s: numeric cells are
//! formatted with separators and right-aligned, losses are painted red,
//! and total rows get their tinted backgrounds here.

use super::style::{format_amount, format_int, LOSS_RED, SUMMARY_TINT, TOTAL_TINT};
use crate::aggregate::{
    combine_rollups, CategoryRollup, CombinedHoldings, InvestmentSummary, PortfolioAllocation,
    ROLLUP_COLUMNS,
};
use crate::elements::{CellAlign, CellElement, RowElement, TableElement, TableStyle};
use crate::geometry::Rect;
use crate::table::Numeric;

const PROFIT_LOSS_COLUMN: &str = "PandL";

/// Equal column fractions.
pub fn equal_widths(n: usize) -> Vec<f64> {
    vec![1.0 / n.max(1) as f64; n.max(1)]
}

/// Column fractions with a double-width first column for labels.
pub fn label_weighted_widths(n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![1.0];
    }
    let unit = 1.0 / (n + 1) as f64;
    let mut widths = vec![unit; n];
    widths[0] = unit * 2.0;
    widths
}

/// Format a raw cell: parsed numbers become grouped amounts, everything
/// else passes through as text.
fn data_cell(raw: &str, red_when_negative: bool) -> CellElement {
    match Numeric::parse(raw) {
        Numeric::Parsed(v) => {
            let cell = CellElement::new(format_amount(v)).align(CellAlign::Right);
            if red_when_negative && v < 0.0 {
                cell.color(LOSS_RED)
            } else {
                cell
            }
        },
        Numeric::Defaulted => {
            // Some exports write losses as "(1,234.00)".
            let trimmed = raw.trim();
            let cell = CellElement::new(raw);
            if red_when_negative && trimmed.starts_with('(') && trimmed.ends_with(')') {
                cell.align(CellAlign::Right).color(LOSS_RED)
            } else {
                cell
            }
        },
    }
}

fn header_cells(columns: &[String]) -> Vec<CellElement> {
    columns
        .iter()
        .map(|c| CellElement::new(c.clone()).align(CellAlign::Center))
        .collect()
}

/// Portfolio composition table with a tinted grand total row.
///
/// Allocation values are whole-rupee figures; decimals are dropped.
pub fn allocation_table(allocation: &PortfolioAllocation, rect: Rect) -> TableElement {
    let header = vec![
        CellElement::new("Particulars").align(CellAlign::Center),
        CellElement::new("Portfolio Value").align(CellAlign::Center),
    ];
    let mut table = TableElement::new(rect, vec![0.6, 0.4], header);
    for (name, value) in &allocation.components {
        table.push_row(RowElement::new(vec![
            CellElement::new(name.clone()),
            CellElement::new(format_int(*value)).align(CellAlign::Right),
        ]));
    }
    table.push_row(RowElement::new(vec![
        CellElement::new("Grand Total").bold().background(SUMMARY_TINT),
        CellElement::new(format_int(allocation.grand_total))
            .align(CellAlign::Right)
            .bold()
            .background(SUMMARY_TINT),
    ]));
    table
}

/// Combined holdings table: each subcategory's rows sorted by the
/// aggregate and followed by its tinted `<Subcategory> Total` row, with
/// one `Grand Total` row at the bottom summing the per-subcategory
/// sums.
pub fn combined_rollup_table(rollups: &[CategoryRollup], rect: Rect) -> TableElement {
    let columns: Vec<String> = rollups
        .first()
        .map(|r| r.columns.clone())
        .unwrap_or_default();
    let numeric: Vec<bool> = columns
        .iter()
        .map(|c| ROLLUP_COLUMNS.contains(&c.as_str()))
        .collect();

    let mut table = TableElement::new(
        rect,
        label_weighted_widths(columns.len()),
        header_cells(&columns),
    );

    for rollup in rollups {
        for row in &rollup.rows {
            let cells = row
                .iter()
                .zip(&columns)
                .zip(&numeric)
                .map(|((raw, column), is_numeric)| {
                    if *is_numeric {
                        data_cell(raw, column == PROFIT_LOSS_COLUMN)
                    } else {
                        CellElement::new(raw.clone())
                    }
                })
                .collect();
            table.push_row(RowElement::new(cells));
        }
        table.push_row(total_row(
            &rollup.total_label(),
            &columns,
            &rollup.totals,
            TOTAL_TINT,
        ));
    }

    let refs: Vec<&CategoryRollup> = rollups.iter().collect();
    table.push_row(grand_total_row(&combine_rollups(&refs), &columns));
    table
}

/// Asset-class summary: equity and debt shares with investment at cost
/// and market value in Lacs, padded with the placeholder classes, and a
/// tinted `PORTFOLIO TOTAL` row.
pub fn investment_summary_table(
    allocation: &PortfolioAllocation,
    investments: &InvestmentSummary,
    rect: Rect,
) -> TableElement {
    let header = vec![
        CellElement::new("Asset Class").align(CellAlign::Center),
        CellElement::new("% of Portfolio").align(CellAlign::Center),
        CellElement::new("Investment at Cost").align(CellAlign::Center),
        CellElement::new("Market Value").align(CellAlign::Center),
    ];
    let mut table = TableElement::new(rect, vec![0.3, 0.2, 0.25, 0.25], header);

    let value_row = |label: &str, share: i64, invested: f64, value: f64| {
        RowElement::new(vec![
            CellElement::new(label),
            CellElement::new(format!("{:.2}", share as f64)).align(CellAlign::Right),
            CellElement::new(format_amount(invested)).align(CellAlign::Right),
            CellElement::new(format_amount(value)).align(CellAlign::Right),
        ])
    };
    let placeholder_row = |label: &str| {
        RowElement::new(vec![
            CellElement::new(label),
            CellElement::new("-").align(CellAlign::Right),
            CellElement::new("-").align(CellAlign::Right),
            CellElement::new("-").align(CellAlign::Right),
        ])
    };

    table.push_row(value_row(
        "EQUITY",
        allocation.equity_allocation_pct,
        investments.equity_invested_lacs,
        investments.equity_value_lacs,
    ));
    table.push_row(placeholder_row("MULTI ASSET"));
    table.push_row(value_row(
        "DEBT",
        allocation.cash_equivalent_pct,
        investments.debt_invested_lacs,
        investments.debt_value_lacs,
    ));
    table.push_row(placeholder_row("ALTERNATE QUOTED"));
    table.push_row(placeholder_row("CASH"));
    table.push_row(placeholder_row("ALTERNATE UNQUOTED"));

    table.push_row(RowElement::new(vec![
        CellElement::new("PORTFOLIO TOTAL").bold(),
        CellElement::new("100.00")
            .align(CellAlign::Right)
            .bold()
            .background(SUMMARY_TINT),
        CellElement::new(format_amount(investments.total_invested_lacs()))
            .align(CellAlign::Right)
            .bold()
            .background(SUMMARY_TINT),
        CellElement::new(format_amount(investments.total_value_lacs()))
            .align(CellAlign::Right)
            .bold()
            .background(SUMMARY_TINT),
    ]));
    table
}

/// Grand total row across categories, appended under the last holdings
/// table. Zero totals render blank.
pub fn grand_total_row(combined: &CombinedHoldings, columns: &[String]) -> RowElement {
    total_row("Grand Total", columns, &combined.totals, SUMMARY_TINT)
}

fn total_row(label: &str, columns: &[String], totals: &[f64], tint: crate::elements::Color) -> RowElement {
    let cells = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let cell = if i == 0 {
                CellElement::new(label).bold()
            } else {
                match ROLLUP_COLUMNS.iter().position(|c| c == column) {
                    Some(slot) if totals.get(slot).copied().unwrap_or(0.0) != 0.0 => {
                        let value = totals[slot];
                        let cell = CellElement::new(format_amount(value))
                            .align(CellAlign::Right)
                            .bold();
                        if column == PROFIT_LOSS_COLUMN && value < 0.0 {
                            cell.color(LOSS_RED)
                        } else {
                            cell
                        }
                    },
                    _ => CellElement::new(""),
                }
            };
            cell.background(tint)
        })
        .collect();
    RowElement::new(cells)
}

/// Generic detail table for the FNO and realized-gain pages.
///
/// Columns named in `numeric_columns` are parsed and right-aligned;
/// `red_columns` additionally paint negatives red.
pub fn data_table(
    columns: &[String],
    rows: &[Vec<String>],
    rect: Rect,
    numeric_columns: &[&str],
    red_columns: &[&str],
    style: TableStyle,
) -> TableElement {
    let mut table =
        TableElement::new(rect, equal_widths(columns.len()), header_cells(columns)).style(style);
    for row in rows {
        let cells = row
            .iter()
            .zip(columns)
            .map(|(raw, column)| {
                if numeric_columns.contains(&column.as_str()) {
                    data_cell(raw, red_columns.contains(&column.as_str()))
                } else {
                    CellElement::new(raw.clone())
                }
            })
            .collect();
        table.push_row(RowElement::new(cells));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate;
    use crate::table::Table;

    fn rect() -> Rect {
        Rect::new(50.0, 50.0, 1000.0, 500.0)
    }

    #[test]
    fn test_widths_sum_to_one() {
        for n in 1..8 {
            let sum: f64 = label_weighted_widths(n).iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "n={n} sum={sum}");
            let sum: f64 = equal_widths(n).iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_data_cell_formats_and_flags_losses() {
        let cell = data_cell("1234.5", false);
        assert_eq!(cell.text, "1,234.50");
        assert_eq!(cell.align, CellAlign::Right);
        let loss = data_cell("-10", true);
        assert_eq!(loss.color, LOSS_RED);
        let text = data_cell("HDFC Bank", false);
        assert_eq!(text.text, "HDFC Bank");
        assert_eq!(text.align, CellAlign::Left);
    }

    #[test]
    fn test_allocation_table_has_grand_total() {
        let pv = Table::new(
            "Portfolio Value",
            vec!["Particulars".into(), "Portfolio Value".into()],
            vec![
                vec!["Equity".into(), "7000".into()],
                vec!["Available Cash".into(), "1000".into()],
            ],
        );
        let allocation = aggregate::portfolio_allocation(&pv).unwrap();
        let table = allocation_table(&allocation, rect());
        let last = table.rows.last().unwrap();
        assert_eq!(last.cells[0].text, "Grand Total");
        assert_eq!(last.cells[1].text, "8,000");
        assert_eq!(last.cells[1].background, Some(SUMMARY_TINT));
    }

    #[test]
    fn test_combined_rollup_table_subtotals_and_grand_total() {
        let columns = vec![
            "Instrument Name".to_string(),
            "PandL".to_string(),
            "Market Value".to_string(),
        ];
        let direct = Table::new(
            "Direct Equity",
            columns.clone(),
            vec![
                vec!["A".into(), "-5".into(), "100".into()],
                vec!["B".into(), "10".into(), "200".into()],
            ],
        );
        let etf = Table::new(
            "Equity ETF",
            columns,
            vec![vec!["C".into(), "3".into(), "50".into()]],
        );
        let rollups = vec![
            aggregate::category_rollup(&direct, "Direct Equity").unwrap(),
            aggregate::category_rollup(&etf, "Equity ETF").unwrap(),
        ];
        let table = combined_rollup_table(&rollups, rect());

        // header + (2 rows + subtotal) + (1 row + subtotal) + grand total
        assert_eq!(table.rows.len(), 6);
        assert_eq!(table.rows[2].cells[0].text, "Direct Equity Total");
        assert_eq!(table.rows[2].cells[2].text, "300.00");
        assert_eq!(table.rows[2].cells[0].background, Some(TOTAL_TINT));
        assert_eq!(table.rows[4].cells[0].text, "Equity ETF Total");
        assert_eq!(table.rows[4].cells[2].text, "50.00");
        let grand = table.rows.last().unwrap();
        assert_eq!(grand.cells[0].text, "Grand Total");
        assert_eq!(grand.cells[2].text, "350.00");
        assert_eq!(grand.cells[1].text, "8.00");
        assert_eq!(grand.cells[0].background, Some(SUMMARY_TINT));
    }

    #[test]
    fn test_investment_summary_table_rows_and_total_tint() {
        let pv = Table::new(
            "Portfolio Value",
            vec!["Particulars".into(), "Portfolio Value".into()],
            vec![
                vec!["Equity".into(), "7000".into()],
                vec!["Available Cash".into(), "3000".into()],
            ],
        );
        let allocation = aggregate::portfolio_allocation(&pv).unwrap();
        let investments = aggregate::InvestmentSummary {
            equity_invested_lacs: 10.0,
            equity_value_lacs: 12.5,
            debt_invested_lacs: 4.0,
            debt_value_lacs: 4.5,
        };
        let table = investment_summary_table(&allocation, &investments, rect());

        assert_eq!(table.header.len(), 4);
        assert_eq!(table.rows[0].cells[0].text, "EQUITY");
        assert_eq!(table.rows[0].cells[1].text, "70.00");
        assert_eq!(table.rows[1].cells[0].text, "MULTI ASSET");
        assert_eq!(table.rows[1].cells[1].text, "-");
        assert_eq!(table.rows[2].cells[0].text, "DEBT");
        assert_eq!(table.rows[2].cells[1].text, "30.00");
        let total = table.rows.last().unwrap();
        assert_eq!(total.cells[0].text, "PORTFOLIO TOTAL");
        assert_eq!(total.cells[1].text, "100.00");
        assert_eq!(total.cells[2].text, "14.00");
        assert_eq!(total.cells[3].text, "17.00");
        assert_eq!(total.cells[1].background, Some(SUMMARY_TINT));
        assert_eq!(total.cells[0].background, None);
    }

    #[test]
    fn test_total_row_blanks_zero_columns() {
        let columns: Vec<String> = vec!["Name".into(), "Quantity".into(), "Market Value".into()];
        let combined = CombinedHoldings {
            totals: vec![0.0, 0.0, 0.0, 0.0, 500.0],
        };
        let row = grand_total_row(&combined, &columns);
        assert_eq!(row.cells[1].text, "");
        assert_eq!(row.cells[2].text, "500.00");
    }
}
