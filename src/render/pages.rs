//! Page templates, one per statement section.

use super::chart::{self, Slice};
use super::style::{format_amount, LOSS_RED, MAROON, PIE_GREEN, PIE_TEAL, SLATE};
use super::table::data_table;
use super::{
    apply_chrome, Branding, Page, DONUT_PAGE, FNO_PAGE, REALIZED_PAGE, STATEMENT_PAGE,
};
use crate::aggregate::{
    CategoryRollup, CustomerDetails, FnoSummary, InvestmentSummary, PortfolioAllocation,
    UnrealizedGains,
};
use crate::elements::{FontStyle, ImageElement, TableStyle, TextElement};
use crate::geometry::{Point, Rect};
use crate::table::Table;

const MARGIN: f64 = 56.0;

/// Statement disclaimer notes, printed verbatim on the final page.
pub const NOTES: [&str; 22] = [
    "This statement is generated from the holdings, valuation, and profit files exported by the brokerage back office on the date shown in the footer.",
    "Portfolio values are as of the close of the last completed trading session unless the source export states otherwise.",
    "Amounts are in Indian Rupees. Figures described as being in Lacs are the rupee amount divided by 1,00,000.",
    "Equity holdings are valued at the closing market price on the recognized exchange with the higher traded volume.",
    "Debt holdings include bonds, debentures, and debt mutual fund units, valued at the latest available NAV or quoted price.",
    "Available Cash reflects the ledger balance net of unsettled obligations and is treated as a cash equivalent.",
    "Gold holdings, where present, include sovereign gold bonds and gold ETFs at their latest traded price.",
    "The allocation split classifies Available Cash and Debt together as cash equivalents; everything else is treated as equity allocation.",
    "Allocation percentages are rounded to the nearest whole number and therefore always sum to exactly 100.",
    "Buy price denotes the weighted average acquisition cost including brokerage but excluding statutory levies.",
    "CMP denotes the current market price per unit at the valuation time.",
    "Unrealized profit and loss is the difference between market value and acquisition cost for positions still held.",
    "Realized gains are reported on a first-in-first-out basis and are shown before tax.",
    "FNO profits are the net of mark-to-market settlements, premium paid and received, and charges for the period.",
    "Cumulative FNO profit is the running total since the first recorded period in the export.",
    "XIRR is the money-weighted annualized return computed across all cash flows since inception of the account.",
    "Dividends, interest payouts, and other corporate actions are reflected only once they appear in the source exports.",
    "Securities under lock-in, pledge, or margin may be shown at full market value even though they are not freely realizable.",
    "Rounding differences of up to one rupee may appear between detail rows and their totals.",
    "Figures in this statement do not constitute an offer, solicitation, or investment advice of any kind.",
    "Past performance is not indicative of future returns; market investments are subject to market risk.",
    "Please report any discrepancy within 15 days of the statement date, after which the records will be considered accepted.",
];

fn title(page: &mut Page, text: &str) {
    let element = TextElement::new(text, 0.0, page.height - 92.0, 24.0)
        .font(FontStyle::Bold)
        .color(MAROON)
        .centered_on(page.width / 2.0);
    page.push(element);
}

/// Shrink rows so a table fits the vertical space it was given.
fn fitted_style(rows: usize, available: f64) -> TableStyle {
    let mut style = TableStyle::default();
    let needed = (rows + 1) as f64 * style.row_height;
    if needed > available {
        style.row_height = (available / (rows + 1) as f64).max(10.0);
        style.font_size = (style.row_height * 0.5).min(style.font_size);
        style.header_font_size = style.font_size;
    }
    style
}

/// Cover page: branding, customer identity, and the statement banner.
pub fn cover(details: &CustomerDetails, branding: &Branding) -> Page {
    let mut page = Page::new(STATEMENT_PAGE);
    let center = page.width / 2.0;

    if let Some(logo) = &branding.logo {
        let box_rect = Rect::new(center - 120.0, page.height - 200.0, 240.0, 120.0);
        page.push(ImageElement {
            image: logo.clone(),
            rect: logo.fit_to_box(box_rect),
        });
    }

    page.push(
        TextElement::new("CUSTOMER STATEMENT", 0.0, page.height - 300.0, 40.0)
            .font(FontStyle::Bold)
            .color(MAROON)
            .centered_on(center),
    );
    page.push(
        TextElement::new(details.name.clone(), 0.0, page.height - 360.0, 26.0)
            .font(FontStyle::Bold)
            .centered_on(center),
    );
    page.push(
        TextElement::new(format!("UCID : {}", details.ucid), 0.0, page.height - 392.0, 16.0)
            .color(SLATE)
            .centered_on(center),
    );
    page.push(
        TextElement::new(
            format!("Statement as of {}", chrono::Local::now().format("%d-%b-%Y")),
            0.0,
            page.height - 420.0,
            13.0,
        )
        .color(SLATE)
        .centered_on(center),
    );

    let slogan = [
        "Your wealth, clearly accounted.",
        "A consolidated view of everything you hold with us.",
    ];
    for (i, line) in slogan.iter().enumerate() {
        page.push(
            TextElement::new(*line, 0.0, 180.0 - 20.0 * i as f64, 13.0)
                .font(FontStyle::Oblique)
                .color(SLATE)
                .centered_on(center),
        );
    }

    apply_chrome(&mut page, branding);
    page
}

/// Summary page: composition table, allocation pie, and the asset-class
/// investment summary in Lacs.
pub fn summary(
    allocation: &PortfolioAllocation,
    investments: &InvestmentSummary,
    xirr: Option<f64>,
    branding: &Branding,
) -> Page {
    let mut page = Page::new(STATEMENT_PAGE);
    title(&mut page, "Portfolio Summary");

    let table_rect = Rect::new(MARGIN, 160.0, page.width * 0.42, page.height - 300.0);
    let rows = allocation.components.len() + 1;
    let table = super::table::allocation_table(allocation, table_rect)
        .style(fitted_style(rows, page.height - 300.0));
    let table_top = table_rect.top();
    let table_height = table.height();
    page.push(table);

    let pie_center = Point::new(page.width * 0.72, page.height * 0.55);
    let slices = [
        Slice::new(
            "Cash & Debt",
            allocation.cash_equivalent_pct as f64,
            PIE_TEAL,
        ),
        Slice::new(
            "Equity",
            allocation.equity_allocation_pct as f64,
            PIE_GREEN,
        ),
    ];
    page.extend(chart::pie_chart(pie_center, 110.0, &slices, None));

    let heading_y = table_top - table_height - 36.0;
    page.push(
        TextElement::new("Investment Summary", MARGIN, heading_y, 15.0)
            .font(FontStyle::Bold)
            .color(MAROON),
    );
    page.push(TextElement::new("(Amount in Lacs)", MARGIN + 160.0, heading_y, 10.0).color(SLATE));

    let summary_top = heading_y - 20.0;
    let summary_rect = Rect::new(MARGIN, 0.0, page.width * 0.48, summary_top);
    let summary_table =
        super::table::investment_summary_table(allocation, investments, summary_rect);
    let summary_height = summary_table.height();
    page.push(summary_table);

    if let Some(rate) = xirr {
        page.push(TextElement::new(
            format!("XIRR since inception: {:.2}%", rate),
            MARGIN,
            summary_top - summary_height - 24.0,
            12.0,
        ));
    }

    apply_chrome(&mut page, branding);
    page
}

/// Holdings page for one asset class: every subcategory's rows followed
/// by its own total, then the grand total for the page.
pub fn holdings(category: &str, rollups: &[CategoryRollup], branding: &Branding) -> Page {
    let mut page = Page::new(STATEMENT_PAGE);
    title(&mut page, &format!("{} Holdings", category));

    let available = page.height - 220.0;
    let rect = Rect::new(MARGIN, 110.0, page.width - 2.0 * MARGIN, available);
    let row_count = rollups.iter().map(|r| r.rows.len() + 1).sum::<usize>() + 1;
    let table =
        super::table::combined_rollup_table(rollups, rect).style(fitted_style(row_count, available));
    page.push(table);

    apply_chrome(&mut page, branding);
    page
}

/// FNO page: history table, headline figures, and the cumulative line.
pub fn fno(summary: &FnoSummary, branding: &Branding) -> Page {
    let mut page = Page::new(FNO_PAGE);
    title(&mut page, "Futures & Options");

    let table_space = page.height * 0.42;
    let table_rect = Rect::new(
        MARGIN,
        page.height - 130.0 - table_space,
        page.width - 2.0 * MARGIN,
        table_space,
    );
    page.push(data_table(
        &summary.columns,
        &summary.rows,
        table_rect,
        &["FNO Profits", "FNO Profits Till Date"],
        &["FNO Profits"],
        fitted_style(summary.rows.len(), table_space),
    ));

    let stats_y = table_rect.y - 36.0;
    page.push(
        TextElement::new(
            format!(
                "Cumulative FNO profit: {}",
                format_amount(summary.till_date_total)
            ),
            MARGIN,
            stats_y,
            13.0,
        )
        .font(FontStyle::Bold)
        .color(if summary.till_date_total < 0.0 { LOSS_RED } else { SLATE }),
    );
    page.push(
        TextElement::new(
            format!("Average profit per period: {}", format_amount(summary.average_profit)),
            MARGIN,
            stats_y - 22.0,
            13.0,
        )
        .color(SLATE),
    );

    let chart_rect = Rect::new(
        MARGIN + 50.0,
        90.0,
        page.width - 2.0 * MARGIN - 60.0,
        stats_y - 170.0,
    );
    page.extend(chart::line_chart(chart_rect, &summary.graph_points(), SLATE));

    apply_chrome(&mut page, branding);
    page
}

/// Realized gains detail page.
pub fn realized(profits: &Table, branding: &Branding) -> Page {
    let mut page = Page::new(REALIZED_PAGE);
    title(&mut page, "Realized Gains");

    let numeric: Vec<&str> = profits.columns().iter().map(String::as_str).collect();
    let red: Vec<&str> = profits
        .columns()
        .iter()
        .map(String::as_str)
        .filter(|c| c.contains("Profit") || c.contains("Gain") || c.contains("PandL"))
        .collect();

    let available = page.height - 220.0;
    let rect = Rect::new(MARGIN, 110.0, page.width - 2.0 * MARGIN, available);
    page.push(data_table(
        profits.columns(),
        profits.rows(),
        rect,
        &numeric,
        &red,
        fitted_style(profits.row_count(), available),
    ));

    apply_chrome(&mut page, branding);
    page
}

/// Unrealized gains donut page.
pub fn unrealized(gains: &UnrealizedGains, branding: &Branding) -> Page {
    let mut page = Page::new(DONUT_PAGE);
    page.push(
        TextElement::new("Unrealized Gains", 0.0, page.height - 40.0, 16.0)
            .font(FontStyle::Bold)
            .color(MAROON)
            .centered_on(page.width / 2.0),
    );

    let palette = [PIE_TEAL, PIE_GREEN];
    let slices: Vec<Slice> = gains
        .products
        .iter()
        .zip(palette.iter().cycle())
        .map(|((product, gain), color)| Slice::new(product.clone(), *gain, *color))
        .collect();

    let center = Point::new(page.width / 2.0, page.height / 2.0 - 16.0);
    page.extend(chart::pie_chart(center, 80.0, &slices, Some(0.7)));

    let total: f64 = gains.products.iter().map(|(_, g)| g).sum();
    page.push(
        TextElement::new(format_amount(total), 0.0, center.y - 4.0, 11.0)
            .font(FontStyle::Bold)
            .color(if total < 0.0 { LOSS_RED } else { SLATE })
            .centered_on(center.x),
    );

    apply_chrome(&mut page, branding);
    page
}

/// Notes and assumptions page.
pub fn disclaimer(branding: &Branding) -> Page {
    let mut page = Page::new(STATEMENT_PAGE);
    title(&mut page, "Notes & Assumptions");

    let top = page.height - 140.0;
    let spacing = (top - 70.0) / NOTES.len() as f64;
    for (i, note) in NOTES.iter().enumerate() {
        let y = top - spacing * i as f64;
        page.push(
            TextElement::new(format!("{}.", i + 1), MARGIN, y, 9.0).font(FontStyle::Bold),
        );
        page.push(TextElement::new(*note, MARGIN + 24.0, y, 9.0).color(SLATE));
    }

    apply_chrome(&mut page, branding);
    page
}
