//! Pure table-to-view transforms.
//!
//! Everything in this module is a pure function from canonical tables to
//! immutable view structs; input tables are never mutated and no IO
//! happens here. Values stay numeric; formatting with separators is the
//! renderer's job.

use crate::error::{Error, Result};
use crate::table::{Numeric, SectionRule, Table};
use log::{debug, warn};

/// Fixed display priority for portfolio components.
pub const PORTFOLIO_ORDER: [&str; 4] = ["Available Cash", "Debt", "Equity", "Gold"];

/// Columns summed in category roll-ups, in display order.
pub const ROLLUP_COLUMNS: [&str; 5] = ["Quantity", "Buy Price", "CMP", "PandL", "Market Value"];

/// Subcategories of the Equity detail table, in display order.
pub const EQUITY_SUBCATEGORIES: [&str; 3] =
    ["Direct Equity", "Equity ETF", "Equity Mutual Fund"];

/// Subcategories of the Debt detail table, in display order.
pub const DEBT_SUBCATEGORIES: [&str; 2] = ["Debt ETF", "Debt Mutual Fund"];

const CATEGORY_COLUMN: &str = "Category";

/// Holding sections contributing unrealized gains: (product, sentinel).
pub const GAIN_SECTIONS: [(&str, &str); 2] =
    [("Equity", "Equity:-"), ("Mutual Fund", "Mutual Fund:-")];

const CLIENT_INFO_LABEL: &str = "Client Equity Code/UCID/Name";
const PORTFOLIO_VALUE_COLUMN: &str = "Portfolio Value";
const MARKET_VALUE_COLUMN: &str = "Market Value";
const TOTAL_MARKER: &str = "Total:";

// Positional columns inside the Holding table. The overview block and
// the product sections carry no headers of their own, so these are
// addressed by position per the `Unnamed: N` contract.
const HOLDING_INVESTED_COLUMN: usize = 4;
const HOLDING_VALUE_COLUMN: usize = 6;
const HOLDING_GAIN_COLUMN: usize = 10;
const SECTION_HEADER_OFFSET: usize = 2;

/// One lakh; overview sums are reported in Lacs.
pub const LACS: f64 = 100_000.0;

/// Client identity extracted from the statement header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    /// Client equity code
    pub code: String,
    /// Unique client id
    pub ucid: String,
    /// Display name
    pub name: String,
}

/// Extract the client identity from the first table that carries it.
///
/// The identity row is labelled `Client Equity Code/UCID/Name` in column
/// 0 and its column 1 must split on `/` into exactly three parts.
/// Anything else is fatal; the statement cannot be attributed.
pub fn customer_details<'a>(tables: impl IntoIterator<Item = &'a Table>) -> Result<CustomerDetails> {
    for table in tables {
        for row in 0..table.row_count() {
            if table.cell(row, 0).trim() != CLIENT_INFO_LABEL {
                continue;
            }
            let raw = table.cell(row, 1).trim();
            let parts: Vec<&str> = raw.split('/').collect();
            if parts.len() != 3 {
                return Err(Error::MalformedClientInfo(raw.to_string()));
            }
            return Ok(CustomerDetails {
                code: parts[0].trim().to_string(),
                ucid: parts[1].trim().to_string(),
                name: parts[2].trim().to_string(),
            });
        }
    }
    Err(Error::ClientInfoNotFound)
}

/// Portfolio components reordered by fixed priority, with totals and the
/// complementary allocation split.
#[derive(Debug, Clone)]
pub struct PortfolioAllocation {
    /// (component, value) in display order
    pub components: Vec<(String, f64)>,
    /// Sum of retained components
    pub grand_total: f64,
    /// Available Cash + Debt
    pub cash_equivalent: f64,
    /// Rounded cash-equivalent share of the total, in percent
    pub cash_equivalent_pct: i64,
    /// 100 - cash share; complementary by construction
    pub equity_allocation_pct: i64,
}

/// Reorder the Portfolio Value table and derive the allocation split.
///
/// Rows outside the fixed component set are dropped. Percentages always
/// sum to 100 because the equity share is defined as the complement.
pub fn portfolio_allocation(table: &Table) -> Result<PortfolioAllocation> {
    let value_col = table.column(PORTFOLIO_VALUE_COLUMN)?;

    let mut components: Vec<(String, f64)> = Vec::new();
    for name in PORTFOLIO_ORDER {
        for row in 0..table.row_count() {
            if table.cell(row, 0).trim() == name {
                components.push((name.to_string(), table.numeric(row, value_col).value()));
            }
        }
    }

    if components.is_empty() {
        return Err(Error::EmptyTable(table.name().to_string()));
    }

    let grand_total: f64 = components.iter().map(|(_, v)| v).sum();
    let cash_equivalent: f64 = components
        .iter()
        .filter(|(name, _)| name == "Available Cash" || name == "Debt")
        .map(|(_, v)| v)
        .sum();

    let cash_equivalent_pct = if grand_total != 0.0 {
        (cash_equivalent / grand_total * 100.0).round() as i64
    } else {
        warn!("portfolio grand total is zero; allocation split defaults to all-equity");
        0
    };

    Ok(PortfolioAllocation {
        components,
        grand_total,
        cash_equivalent,
        cash_equivalent_pct,
        equity_allocation_pct: 100 - cash_equivalent_pct,
    })
}

/// A category table sorted by market value with per-column sums.
#[derive(Debug, Clone)]
pub struct CategoryRollup {
    /// Category label (e.g. `Equity`)
    pub category: String,
    /// Source column names
    pub columns: Vec<String>,
    /// Non-empty rows, sorted descending by Market Value
    pub rows: Vec<Vec<String>>,
    /// Sums parallel to [`ROLLUP_COLUMNS`]; zero where the column is absent
    pub totals: Vec<f64>,
}

impl CategoryRollup {
    /// Label of the appended total row.
    pub fn total_label(&self) -> String {
        format!("{} Total", self.category)
    }

    /// Market value sum for this category.
    pub fn market_value_total(&self) -> f64 {
        // ROLLUP_COLUMNS ends with Market Value
        *self.totals.last().unwrap_or(&0.0)
    }
}

/// Roll up one category table: sort descending by Market Value and sum
/// the fixed column set.
pub fn category_rollup(table: &Table, category: &str) -> Result<CategoryRollup> {
    let mv_col = table.column(MARKET_VALUE_COLUMN)?;

    let mut rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .filter(|r| r.iter().any(|c| !c.trim().is_empty()))
        .cloned()
        .collect();

    rows.sort_by(|a, b| {
        let av = Numeric::parse(a.get(mv_col).map(String::as_str).unwrap_or("")).value();
        let bv = Numeric::parse(b.get(mv_col).map(String::as_str).unwrap_or("")).value();
        bv.total_cmp(&av)
    });

    let totals = ROLLUP_COLUMNS
        .iter()
        .map(|name| match table.column_index(name) {
            Some(col) => rows
                .iter()
                .map(|r| Numeric::parse(r.get(col).map(String::as_str).unwrap_or("")).value())
                .sum(),
            None => {
                debug!("table '{}' has no '{}' column; total is zero", table.name(), name);
                0.0
            },
        })
        .collect();

    Ok(CategoryRollup {
        category: category.to_string(),
        columns: table.columns().to_vec(),
        rows,
        totals,
    })
}

/// Split a detail table by its `Category` column and roll up each
/// subcategory separately, in the given fixed order.
///
/// A missing `Category` column is fatal. A subcategory with no rows
/// still yields a roll-up so its total row renders as zeros; rows under
/// labels outside the fixed set are dropped.
pub fn subcategory_rollups(table: &Table, subcategories: &[&str]) -> Result<Vec<CategoryRollup>> {
    let category_col = table.column(CATEGORY_COLUMN)?;
    subcategories
        .iter()
        .map(|label| {
            let rows: Vec<Vec<String>> = table
                .rows()
                .iter()
                .filter(|r| {
                    r.get(category_col)
                        .map(|c| c.trim() == *label)
                        .unwrap_or(false)
                })
                .cloned()
                .collect();
            let subset = Table::new(*label, table.columns().to_vec(), rows);
            category_rollup(&subset, label)
        })
        .collect()
}

/// Grand totals across category roll-ups.
///
/// Sums the per-category sums rather than re-summing raw rows, so the
/// grand total row always equals the sum of the category total rows.
#[derive(Debug, Clone)]
pub struct CombinedHoldings {
    /// Sums parallel to [`ROLLUP_COLUMNS`]
    pub totals: Vec<f64>,
}

/// Combine roll-ups into grand totals.
pub fn combine_rollups(rollups: &[&CategoryRollup]) -> CombinedHoldings {
    let mut totals = vec![0.0; ROLLUP_COLUMNS.len()];
    for rollup in rollups {
        for (slot, value) in totals.iter_mut().zip(&rollup.totals) {
            *slot += value;
        }
    }
    CombinedHoldings { totals }
}

/// Ordered product-to-gain mapping from the Holding table's sections.
#[derive(Debug, Clone, Default)]
pub struct UnrealizedGains {
    /// (product, gain) in section order
    pub products: Vec<(String, f64)>,
}

impl UnrealizedGains {
    /// Gain for a product, if its section was present.
    pub fn get(&self, product: &str) -> Option<f64> {
        self.products
            .iter()
            .find(|(name, _)| name == product)
            .map(|(_, gain)| *gain)
    }
}

/// Read unrealized gains per product from the Holding table.
///
/// A missing section sentinel omits the product. A present section whose
/// `Total:` row is absent, or whose gain cell is unparsable, contributes
/// zero for that product only.
pub fn unrealized_gains(holding: &Table) -> UnrealizedGains {
    let mut products = Vec::new();

    for (product, marker) in GAIN_SECTIONS {
        let rule = SectionRule {
            start_marker: marker,
            end_marker: None,
            header_offset: SECTION_HEADER_OFFSET,
        };
        let range = match holding.section(&rule) {
            Ok(range) => range,
            Err(_) => {
                debug!("holding table has no '{}' section", marker);
                continue;
            },
        };

        let gain = match holding.find_marker_from(range.start, TOTAL_MARKER) {
            Some(total_row) => holding.numeric(total_row, HOLDING_GAIN_COLUMN).value(),
            None => {
                warn!("'{}' section has no '{}' row; gain recorded as zero", marker, TOTAL_MARKER);
                0.0
            },
        };
        products.push((product.to_string(), gain));
    }

    UnrealizedGains { products }
}

/// Equity/debt investment and valuation sums from the Holding overview
/// block, expressed in Lacs.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvestmentSummary {
    /// Equity invested at cost, in Lacs
    pub equity_invested_lacs: f64,
    /// Equity market value, in Lacs
    pub equity_value_lacs: f64,
    /// Debt invested at cost, in Lacs
    pub debt_invested_lacs: f64,
    /// Debt market value, in Lacs
    pub debt_value_lacs: f64,
}

impl InvestmentSummary {
    /// Total invested at cost, in Lacs.
    pub fn total_invested_lacs(&self) -> f64 {
        self.equity_invested_lacs + self.debt_invested_lacs
    }

    /// Total market value, in Lacs.
    pub fn total_value_lacs(&self) -> f64 {
        self.equity_value_lacs + self.debt_value_lacs
    }
}

/// Sum the Holding overview rows labelled `Equity` / `Debt` and convert
/// to Lacs. The division by one lakh happens exactly once, here.
pub fn investment_summary(holding: &Table) -> InvestmentSummary {
    let mut summary = InvestmentSummary::default();
    for row in 0..holding.row_count() {
        let (invested, value) = match holding.cell(row, 0).trim() {
            "Equity" => (&mut summary.equity_invested_lacs, &mut summary.equity_value_lacs),
            "Debt" => (&mut summary.debt_invested_lacs, &mut summary.debt_value_lacs),
            _ => continue,
        };
        *invested += holding.numeric(row, HOLDING_INVESTED_COLUMN).value() / LACS;
        *value += holding.numeric(row, HOLDING_VALUE_COLUMN).value() / LACS;
    }
    summary
}

/// FNO history sorted by cumulative profit, with headline statistics.
#[derive(Debug, Clone)]
pub struct FnoSummary {
    /// Column names with any `Order` column removed
    pub columns: Vec<String>,
    /// Rows sorted ascending by `FNO Profits Till Date`
    pub rows: Vec<Vec<String>>,
    /// Cumulative profit: the last (largest) till-date value
    pub till_date_total: f64,
    /// Mean of the per-period `FNO Profits` column
    pub average_profit: f64,
    till_date_col: usize,
}

impl FnoSummary {
    /// (label, cumulative profit) points for the line graph, in row order.
    pub fn graph_points(&self) -> Vec<(String, f64)> {
        self.rows
            .iter()
            .map(|r| {
                let label = r.first().cloned().unwrap_or_default();
                let value = Numeric::parse(
                    r.get(self.till_date_col).map(String::as_str).unwrap_or(""),
                )
                .value();
                (label, value)
            })
            .collect()
    }
}

/// Summarize the FNO table.
pub fn fno_summary(table: &Table) -> Result<FnoSummary> {
    let till_col = table.column("FNO Profits Till Date")?;
    let profit_col = table.column("FNO Profits")?;
    let order_col = table.column_index("Order");

    let mut rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .filter(|r| r.iter().any(|c| !c.trim().is_empty()))
        .cloned()
        .collect();

    rows.sort_by(|a, b| {
        let av = Numeric::parse(a.get(till_col).map(String::as_str).unwrap_or("")).value();
        let bv = Numeric::parse(b.get(till_col).map(String::as_str).unwrap_or("")).value();
        av.total_cmp(&bv)
    });

    let till_date_total = rows
        .last()
        .map(|r| Numeric::parse(r.get(till_col).map(String::as_str).unwrap_or("")).value())
        .unwrap_or(0.0);

    let average_profit = if rows.is_empty() {
        0.0
    } else {
        rows.iter()
            .map(|r| Numeric::parse(r.get(profit_col).map(String::as_str).unwrap_or("")).value())
            .sum::<f64>()
            / rows.len() as f64
    };

    // Project out the Order column, remapping the till-date position.
    let keep: Vec<usize> = (0..table.columns().len())
        .filter(|&i| Some(i) != order_col)
        .collect();
    let columns = keep.iter().map(|&i| table.columns()[i].clone()).collect();
    let rows = rows
        .into_iter()
        .map(|r| {
            keep.iter()
                .map(|&i| r.get(i).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    let till_date_col = keep
        .iter()
        .position(|&i| i == till_col)
        .unwrap_or(till_col);

    Ok(FnoSummary {
        columns,
        rows,
        till_date_total,
        average_profit,
        till_date_col,
    })
}

/// Clean the realized-profit detail: drop rows with any empty cell, then
/// drop the final row (the export pre-totals it).
pub fn realized_gains(table: &Table) -> Table {
    let mut rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .filter(|r| r.iter().all(|c| !c.trim().is_empty()))
        .cloned()
        .collect();
    rows.pop();
    Table::new(table.name(), table.columns().to_vec(), rows)
}

/// Headline money-weighted return from the XIRR table, if one parses.
pub fn headline_xirr(table: &Table) -> Option<f64> {
    if let Some(col) = table
        .columns()
        .iter()
        .position(|c| c.to_ascii_lowercase().contains("xirr"))
    {
        for row in 0..table.row_count() {
            if let Numeric::Parsed(v) = table.numeric(row, col) {
                return Some(v);
            }
        }
    }
    for row in 0..table.row_count() {
        for col in 0..table.columns().len() {
            if let Numeric::Parsed(v) = table.numeric(row, col) {
                return Some(v);
            }
        }
    }
    None
}
