use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::report::chart;
use crate::series::present;
use crate::series::reconcile::CanonicalSeries;

#[derive(Debug, Clone)]
pub struct ReportInputs<'a> {
    pub series: &'a CanonicalSeries,
    pub title: &'a str,
    pub generated_at: DateTime<Utc>,
    pub recent_days: usize,
}

/// Group counter columns into report sections by their name prefix, keeping
/// column order. `views_total` and `views_unique` land under "Views",
/// `clones_*` under "Clones"; unprefixed columns get their own section.
fn section_groups(columns: &[String]) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for column in columns {
        let prefix = column.split('_').next().unwrap_or(column);
        let mut title: String = prefix.to_string();
        if let Some(first) = title.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        match groups.iter_mut().find(|(t, _)| *t == title) {
            Some((_, members)) => members.push(column.clone()),
            None => groups.push((title, vec![column.clone()])),
        }
    }
    groups
}

fn embed_block(spec: &chart::ChartSpec) -> Result<String> {
    let spec_json =
        serde_json::to_string(&spec.spec).context("failed to serialize chart spec")?;
    Ok(format!(
        "<div id=\"{id}\"></div>\n<script type=\"text/javascript\">\n  vegaEmbed('#{id}', {spec_json}, {{\"renderer\": \"svg\"}}).catch(console.error);\n</script>\n",
        id = spec.element_id,
    ))
}

/// Assemble the full Markdown report: pandoc title block, one chart section
/// per counter group, then the recent-days summary.
pub fn render(inputs: &ReportInputs<'_>) -> Result<String> {
    let mut out = String::new();

    let stamp = inputs.generated_at.format("%Y-%m-%d %H:%M UTC");
    out.push_str(&format!("% {}\n%\n% {stamp}\n\n", inputs.title));
    out.push_str(
        "This report is generated from reconciled daily traffic snapshots: \
         overlapping CSV fragments merged by taking, per day and per counter, \
         the maximum value ever observed.\n",
    );

    for (section, columns) in section_groups(inputs.series.columns()) {
        out.push_str(&format!("\n\n# {section}\n\n"));
        for column in columns {
            let spec = chart::line_chart(inputs.series, &column)
                .with_context(|| format!("no column `{column}` in reconciled series"))?;
            out.push_str(&embed_block(&spec)?);
            out.push('\n');
        }
    }

    out.push_str("\n# Summary\n\n");
    out.push_str(&format!(
        "{} days of data, per-counter totals: ",
        inputs.series.sample_count()
    ));
    let totals = present::totals(inputs.series)
        .into_iter()
        .map(|(column, sum)| format!("{column}={}", present::format_value(sum)))
        .collect::<Vec<_>>()
        .join(", ");
    out.push_str(&totals);
    out.push_str(".\n\n");

    out.push_str(&format!("Most recent {} days:\n\n", inputs.recent_days));
    out.push_str(&present::recent_table(inputs.series, inputs.recent_days));

    Ok(out)
}
