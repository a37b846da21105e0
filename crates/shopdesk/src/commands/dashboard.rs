//! Dashboard handler.

use shopdesk_core::DashboardSummary;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::Console;
use super::util::Spinner;

fn detail(summary: &DashboardSummary) -> String {
    let mut out = format!(
        "Products:   {}\nCategories: {}\nUsers:      {}\nOrders:     {}\nRevenue:    {:.2}",
        summary.products, summary.categories, summary.users, summary.orders, summary.revenue,
    );
    if !summary.recent_products.is_empty() {
        out.push_str("\n\nRecent products\n");
        out.push_str(&output::render_records(
            OutputFormat::Table,
            &summary.recent_products,
        ));
    }
    out
}

pub async fn handle(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    console.require_session()?;

    let summary = {
        let _spin = Spinner::start("Loading dashboard", global.quiet);
        DashboardSummary::fetch(&console.data)
            .await
            .map_err(|e| console.fail(e))?
    };

    let out = output::render_single(global.output, &summary, detail, |s| {
        format!("{:.2}", s.revenue)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
